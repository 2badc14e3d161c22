//! Values produced by parsing.

mod any;
mod dict;

pub use any::AnyValue;
pub use dict::Dict;

/// The parsed value of one argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ArgValue {
    /// Not supplied and no default.
    #[default]
    Missing,
    /// A single value.
    One(AnyValue),
    /// Several values (list arguments, multi-value nargs). Elements of an
    /// `append` with nargs > 1 are themselves lists.
    List(Vec<ArgValue>),
    /// Key/value pairs of a dict argument.
    Dict(Dict),
}

impl ArgValue {
    /// Shorthand for a single comparable value.
    pub fn one<T>(value: T) -> Self
    where
        T: std::fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        ArgValue::One(AnyValue::new(value))
    }

    /// Human name of the shape, used in error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            ArgValue::Missing => "missing value",
            ArgValue::One(_) => "single value",
            ArgValue::List(_) => "list",
            ArgValue::Dict(_) => "dict",
        }
    }

    /// `true` for `Missing`, empty lists and empty dicts.
    pub fn is_empty(&self) -> bool {
        match self {
            ArgValue::Missing => true,
            ArgValue::One(_) => false,
            ArgValue::List(items) => items.is_empty(),
            ArgValue::Dict(dict) => dict.is_empty(),
        }
    }

    /// Text used when showing this value as a default in help.
    pub fn display(&self) -> String {
        match self {
            ArgValue::Missing => String::new(),
            ArgValue::One(v) => v.display(),
            ArgValue::List(items) => items
                .iter()
                .map(ArgValue::display)
                .collect::<Vec<_>>()
                .join(", "),
            ArgValue::Dict(dict) => dict
                .iter()
                .map(|(k, v)| format!("{}={}", k.display(), v.display()))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<AnyValue> for ArgValue {
    fn from(value: AnyValue) -> Self {
        ArgValue::One(value)
    }
}

impl From<Dict> for ArgValue {
    fn from(value: Dict) -> Self {
        ArgValue::Dict(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emptiness() {
        assert!(ArgValue::Missing.is_empty());
        assert!(ArgValue::List(vec![]).is_empty());
        assert!(ArgValue::Dict(Dict::new()).is_empty());
        assert!(!ArgValue::one(0_i64).is_empty());
    }

    #[test]
    fn test_display_of_list_and_dict() {
        let list = ArgValue::List(vec![
            ArgValue::One(AnyValue::new(1_i64).with_label("1")),
            ArgValue::One(AnyValue::new(2_i64).with_label("2")),
        ]);
        assert_eq!(list.display(), "1, 2");

        let dict: Dict = [(
            AnyValue::new("k".to_string()).with_label("k"),
            AnyValue::new("v".to_string()).with_label("v"),
        )]
        .into_iter()
        .collect();
        assert_eq!(ArgValue::Dict(dict).display(), "k=v");
    }
}
