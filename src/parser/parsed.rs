//! Parse results.

use std::any::Any;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::error::AccessError;
use crate::spec::short_type_name;
use crate::value::{AnyValue, ArgValue};

/// The result of one parse: one entry per declared argument, keyed by
/// dest, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    values: IndexMap<String, ArgValue>,
}

fn downcast<'a, T: Any>(dest: &str, value: &'a AnyValue) -> Result<&'a T, AccessError> {
    value.downcast_ref::<T>().ok_or_else(|| AccessError::TypeMismatch {
        dest: dest.to_string(),
        expected: short_type_name::<T>(),
    })
}

impl ParsedArgs {
    pub(crate) fn new(values: IndexMap<String, ArgValue>) -> Self {
        Self { values }
    }

    /// The raw value stored under `dest`.
    pub fn value(&self, dest: &str) -> Result<&ArgValue, AccessError> {
        self.values
            .get(dest)
            .ok_or_else(|| AccessError::Unknown(dest.to_string()))
    }

    /// Whether an argument with this dest was declared.
    pub fn contains(&self, dest: &str) -> bool {
        self.values.contains_key(dest)
    }

    /// A single value, or `None` when the argument was not supplied and has
    /// no default.
    pub fn get<T: Any>(&self, dest: &str) -> Result<Option<&T>, AccessError> {
        match self.value(dest)? {
            ArgValue::Missing => Ok(None),
            ArgValue::One(value) => downcast(dest, value).map(Some),
            other => Err(AccessError::ShapeMismatch {
                dest: dest.to_string(),
                expected: "single value",
                found: other.shape(),
            }),
        }
    }

    /// A single value that must be present.
    pub fn one<T: Any>(&self, dest: &str) -> Result<&T, AccessError> {
        self.get(dest)?.ok_or_else(|| AccessError::ShapeMismatch {
            dest: dest.to_string(),
            expected: "single value",
            found: ArgValue::Missing.shape(),
        })
    }

    /// A boolean flag.
    pub fn get_flag(&self, dest: &str) -> Result<bool, AccessError> {
        Ok(self.get::<bool>(dest)?.copied().unwrap_or(false))
    }

    /// A counter; zero when never supplied.
    pub fn get_count(&self, dest: &str) -> Result<usize, AccessError> {
        Ok(self.get::<usize>(dest)?.copied().unwrap_or(0))
    }

    /// A flat list; empty when not supplied. A single value reads as a
    /// one-element list.
    pub fn get_list<T: Any + Clone>(&self, dest: &str) -> Result<Vec<T>, AccessError> {
        let items = match self.value(dest)? {
            ArgValue::Missing => return Ok(Vec::new()),
            ArgValue::One(value) => return Ok(vec![downcast::<T>(dest, value)?.clone()]),
            ArgValue::List(items) => items,
            ArgValue::Dict(_) => {
                return Err(AccessError::ShapeMismatch {
                    dest: dest.to_string(),
                    expected: "list",
                    found: "dict",
                })
            }
        };
        items
            .iter()
            .map(|item| match item {
                ArgValue::One(value) => downcast::<T>(dest, value).cloned(),
                other => Err(AccessError::ShapeMismatch {
                    dest: dest.to_string(),
                    expected: "list of single values",
                    found: other.shape(),
                }),
            })
            .collect()
    }

    /// A list of groups, as produced by `append` with a multi-value nargs.
    pub fn get_groups<T: Any + Clone>(&self, dest: &str) -> Result<Vec<Vec<T>>, AccessError> {
        match self.value(dest)? {
            ArgValue::Missing => Ok(Vec::new()),
            ArgValue::List(groups) => groups
                .iter()
                .map(|group| match group {
                    ArgValue::List(items) => items
                        .iter()
                        .map(|item| match item {
                            ArgValue::One(value) => downcast::<T>(dest, value).cloned(),
                            other => Err(AccessError::ShapeMismatch {
                                dest: dest.to_string(),
                                expected: "single value",
                                found: other.shape(),
                            }),
                        })
                        .collect(),
                    other => Err(AccessError::ShapeMismatch {
                        dest: dest.to_string(),
                        expected: "list",
                        found: other.shape(),
                    }),
                })
                .collect(),
            other => Err(AccessError::ShapeMismatch {
                dest: dest.to_string(),
                expected: "list of lists",
                found: other.shape(),
            }),
        }
    }

    /// A dict, in command-line order; empty when not supplied.
    pub fn get_dict<K, V>(&self, dest: &str) -> Result<IndexMap<K, V>, AccessError>
    where
        K: Any + Clone + Hash + Eq,
        V: Any + Clone,
    {
        match self.value(dest)? {
            ArgValue::Missing => Ok(IndexMap::new()),
            ArgValue::Dict(dict) => {
                dict.to_index_map::<K, V>()
                    .ok_or_else(|| AccessError::TypeMismatch {
                        dest: dest.to_string(),
                        expected: short_type_name::<V>(),
                    })
            }
            other => Err(AccessError::ShapeMismatch {
                dest: dest.to_string(),
                expected: "dict",
                found: other.shape(),
            }),
        }
    }

    /// Move a single value out of the results, leaving `Missing` behind.
    ///
    /// Needed for values used through `&mut`, such as file handles. Fails
    /// with [`AccessError::Shared`] when a clone of the results still holds
    /// the value; the value is left in place then.
    pub fn take_one<T: Any + Send + Sync>(&mut self, dest: &str) -> Result<Option<T>, AccessError> {
        let slot = self
            .values
            .get_mut(dest)
            .ok_or_else(|| AccessError::Unknown(dest.to_string()))?;
        let value = match std::mem::take(slot) {
            ArgValue::Missing => return Ok(None),
            ArgValue::One(value) => value,
            other => {
                let found = other.shape();
                *slot = other;
                return Err(AccessError::ShapeMismatch {
                    dest: dest.to_string(),
                    expected: "single value",
                    found,
                });
            }
        };
        if !value.is::<T>() {
            *slot = ArgValue::One(value);
            return Err(AccessError::TypeMismatch {
                dest: dest.to_string(),
                expected: short_type_name::<T>(),
            });
        }
        match value.try_unwrap::<T>() {
            Ok(typed) => Ok(Some(typed)),
            Err(value) => {
                *slot = ArgValue::One(value);
                Err(AccessError::Shared(dest.to_string()))
            }
        }
    }

    /// Dests and values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The dest to value map.
    pub fn into_inner(self) -> IndexMap<String, ArgValue> {
        self.values
    }
}
