//! Settling supplied values against defaults.
//!
//! Accumulating arguments are registered with clap without a default, so
//! clap only ever sees what the user typed. The default is merged in here,
//! once per parse, from a freshly built value.

use crate::error::ValueError;
use crate::parser::Action;
use crate::value::ArgValue;

fn into_items(value: ArgValue) -> Vec<ArgValue> {
    match value {
        ArgValue::Missing => Vec::new(),
        ArgValue::List(items) => items,
        other => vec![other],
    }
}

/// Default followed by supplied values; for dicts, the default updated by
/// the supplied pairs.
fn merge(default: ArgValue, supplied: ArgValue) -> ArgValue {
    match (default, supplied) {
        (ArgValue::Dict(mut dict), ArgValue::Dict(supplied)) => {
            dict.update(supplied);
            ArgValue::Dict(dict)
        }
        (default, supplied) => {
            let mut items = into_items(default);
            items.extend(into_items(supplied));
            ArgValue::List(items)
        }
    }
}

/// Final value of one argument.
///
/// With `strict`, any supplied value replaces the default outright. Without
/// it, accumulating actions add supplied values onto the default. `default`
/// is only built when it is needed.
pub(crate) fn settle<F>(
    action: Action,
    strict: bool,
    supplied: Option<ArgValue>,
    default: F,
) -> Result<Option<ArgValue>, ValueError>
where
    F: FnOnce() -> Result<Option<ArgValue>, ValueError>,
{
    match supplied {
        None => default(),
        Some(value) if strict || !action.accumulates() => {
            if action.accumulates() {
                tracing::trace!(action = %action, "Supplied values replace the default");
            }
            Ok(Some(value))
        }
        Some(value) => Ok(Some(match default()? {
            Some(default) => {
                tracing::trace!(action = %action, "Adding supplied values to the default");
                merge(default, value)
            }
            None => value,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{AnyValue, Dict};

    fn list(items: &[i64]) -> ArgValue {
        ArgValue::List(items.iter().map(|i| ArgValue::one(*i)).collect())
    }

    fn dict(pairs: &[(&str, i64)]) -> ArgValue {
        ArgValue::Dict(
            pairs
                .iter()
                .map(|(k, v)| (AnyValue::new(k.to_string()), AnyValue::new(*v)))
                .collect::<Dict>(),
        )
    }

    #[test]
    fn test_absent_yields_default() {
        let out = settle(Action::Extend, true, None, || Ok(Some(list(&[1, 2])))).unwrap();
        assert_eq!(out, Some(list(&[1, 2])));
    }

    #[test]
    fn test_strict_drops_default() {
        let out = settle(Action::Extend, true, Some(list(&[3])), || {
            panic!("default must not be built")
        })
        .unwrap();
        assert_eq!(out, Some(list(&[3])));
    }

    #[test]
    fn test_non_strict_appends_to_default() {
        let out = settle(Action::Append, false, Some(list(&[3])), || Ok(Some(list(&[1, 2]))))
            .unwrap();
        assert_eq!(out, Some(list(&[1, 2, 3])));
    }

    #[test]
    fn test_non_strict_dict_updates_in_place() {
        let out = settle(
            Action::SetItem,
            false,
            Some(dict(&[("b", 9), ("c", 3)])),
            || Ok(Some(dict(&[("a", 1), ("b", 2)]))),
        )
        .unwrap();
        assert_eq!(out, Some(dict(&[("a", 1), ("b", 9), ("c", 3)])));
    }

    #[test]
    fn test_store_ignores_strictness() {
        let out = settle(Action::Store, false, Some(ArgValue::one(5_i64)), || {
            Ok(Some(ArgValue::one(1_i64)))
        })
        .unwrap();
        assert_eq!(out, Some(ArgValue::one(5_i64)));
    }
}
