//! Specs generated for enum types.
//!
//! A variant is named by its identifier, as printed by a derived `Debug`.
//! clap's possible-value names (kebab-case by default) are only consulted
//! for `#[value(hide)]`.

use std::fmt;

use clap::ValueEnum;

use crate::error::ValueError;
use crate::spec::{short_type_name, ArgSpec, Completer, Converter};
use crate::value::AnyValue;

/// Name of one variant, as tokens spell it.
pub(crate) fn variant_name<E: fmt::Debug>(variant: &E) -> String {
    format!("{variant:?}")
}

/// Names of the variants shown to users, in declaration order.
fn visible_names<E: ValueEnum + fmt::Debug>() -> Vec<String> {
    E::value_variants()
        .iter()
        .filter(|variant| {
            variant
                .to_possible_value()
                .is_some_and(|pv| !pv.is_hide_set())
        })
        .map(variant_name)
        .collect()
}

/// Build the spec for a `clap::ValueEnum` type.
///
/// Tokens must match a variant name exactly. Converted values carry the
/// variant name as their label, so enum defaults show by name in help.
pub fn enum_spec<E>() -> ArgSpec
where
    E: ValueEnum + fmt::Debug + PartialEq + Send + Sync + 'static,
{
    let type_name = short_type_name::<E>();
    let names = visible_names::<E>();
    let allowed = names.clone();

    let converter = Converter::new(move |token| {
        E::value_variants()
            .iter()
            .find(|variant| variant_name(*variant) == token)
            .map(|variant| AnyValue::cloneable(variant.clone()).with_label(token))
            .ok_or_else(|| ValueError::invalid_choice(token, allowed.iter().cloned()))
    });

    ArgSpec::new(converter)
        .names([type_name.to_lowercase()])
        .metavar(type_name.to_uppercase())
        .help(names.join("/"))
        .choices(names.clone())
        .completer(Completer::Candidates(names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum Shade {
        Light,
        DarkGrey,
        #[value(hide = true)]
        Hidden,
        #[value(skip)]
        #[allow(dead_code)]
        Skipped,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum E {
        A,
        B,
    }

    #[test]
    fn test_spec_fields() {
        let spec = enum_spec::<Shade>();
        assert_eq!(spec.names, vec!["shade".to_string()]);
        assert_eq!(spec.metavar.as_deref(), Some("SHADE"));
        assert_eq!(spec.help.as_deref(), Some("Light/DarkGrey"));
        assert_eq!(
            spec.choices,
            Some(vec!["Light".to_string(), "DarkGrey".to_string()])
        );
    }

    #[test]
    fn test_converter_is_case_sensitive() {
        let conv = enum_spec::<Shade>().converter.unwrap();
        let v = conv.convert("DarkGrey").unwrap();
        assert_eq!(v.downcast_ref::<Shade>(), Some(&Shade::DarkGrey));
        assert_eq!(v.label(), Some("DarkGrey"));

        for bad in ["dark-grey", "darkgrey", "light", "Skipped"] {
            let err = conv.convert(bad).unwrap_err();
            assert_eq!(err.choices(), ["Light".to_string(), "DarkGrey".to_string()]);
        }
    }

    #[test]
    fn test_hidden_variant_still_converts() {
        let conv = enum_spec::<Shade>().converter.unwrap();
        let v = conv.convert("Hidden").unwrap();
        assert_eq!(v.downcast_ref::<Shade>(), Some(&Shade::Hidden));
    }

    #[test]
    fn test_member_names_are_choices() {
        let conv = enum_spec::<E>().converter.unwrap();
        assert_eq!(conv.convert("A").unwrap().downcast_ref::<E>(), Some(&E::A));
        let err = conv.convert("C").unwrap_err();
        assert_eq!(err.choices(), ["A".to_string(), "B".to_string()]);
        assert!(err.to_string().contains("A, B"), "{err}");
    }
}
