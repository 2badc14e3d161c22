//! Insertion-ordered dict of type-erased keys and values.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::value::AnyValue;

/// The value of a dict argument.
///
/// Keys keep the position of their first insertion; inserting an existing
/// key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dict {
    entries: Vec<(AnyValue, AnyValue)>,
}

impl Dict {
    /// Create an empty dict.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, overwriting the value of an equal key.
    pub fn insert(&mut self, key: AnyValue, value: AnyValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Insert every pair of `other`, in order.
    pub fn update(&mut self, other: Dict) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &AnyValue) -> Option<&AnyValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dict has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&AnyValue, &AnyValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &AnyValue> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Downcast into a typed ordered map. Returns `None` on any type mismatch.
    pub fn to_index_map<K, V>(&self) -> Option<IndexMap<K, V>>
    where
        K: Clone + Hash + Eq + 'static,
        V: Clone + 'static,
    {
        self.entries
            .iter()
            .map(|(k, v)| Some((k.downcast_ref::<K>()?.clone(), v.downcast_ref::<V>()?.clone())))
            .collect()
    }
}

impl FromIterator<(AnyValue, AnyValue)> for Dict {
    fn from_iter<I: IntoIterator<Item = (AnyValue, AnyValue)>>(iter: I) -> Self {
        let mut dict = Dict::new();
        for (key, value) in iter {
            dict.insert(key, value);
        }
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> AnyValue {
        AnyValue::new(v.to_string())
    }

    #[test]
    fn test_repeated_key_keeps_first_position() {
        let mut dict = Dict::new();
        dict.insert(s("a"), AnyValue::new(1_i64));
        dict.insert(s("b"), AnyValue::new(2_i64));
        dict.insert(s("a"), AnyValue::new(3_i64));

        let map = dict.to_index_map::<String, i64>().unwrap();
        assert_eq!(
            map.into_iter().collect::<Vec<_>>(),
            vec![("a".to_string(), 3), ("b".to_string(), 2)]
        );
    }

    #[test]
    fn test_typed_view_rejects_wrong_types() {
        let dict: Dict = [(s("a"), AnyValue::new(1_i64))].into_iter().collect();
        assert!(dict.to_index_map::<String, String>().is_none());
        assert_eq!(dict.get(&s("a")), Some(&AnyValue::new(1_i64)));
    }
}
