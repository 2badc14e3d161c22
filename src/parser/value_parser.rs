//! Bridge from spec converters to clap value parsers.

use std::ffi::OsStr;

use clap::builder::{PossibleValue, TypedValueParser};
use clap::{Arg, Command};

use crate::error::ValueError;
use crate::spec::Converter;
use crate::value::AnyValue;

/// A `KEY=VALUE` item of a dict argument.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DictItem {
    pub(crate) key: AnyValue,
    pub(crate) value: AnyValue,
}

/// Converter for `KEY=VALUE` tokens, split on the first `=`.
pub(crate) fn key_value_converter(key: Converter, value: Converter) -> Converter {
    Converter::new(move |token| {
        let (k, v) = token
            .split_once('=')
            .ok_or_else(|| ValueError::new(format!("expected KEY=VALUE, got '{token}'")))?;
        Ok(AnyValue::new(DictItem {
            key: key.convert(k)?,
            value: value.convert(v)?,
        }))
    })
}

/// Value parser running a spec converter, with an optional closed set of
/// allowed tokens.
///
/// Conversion goes through clap's own closure parser, so failures render
/// as a regular `invalid value` error with usage.
#[derive(Clone)]
pub(crate) struct SpecValueParser {
    converter: Converter,
    choices: Option<Vec<String>>,
    candidates: Option<Vec<String>>,
}

impl SpecValueParser {
    pub(crate) fn new(
        converter: Converter,
        choices: Option<Vec<String>>,
        candidates: Option<Vec<String>>,
    ) -> Self {
        Self {
            converter,
            choices,
            candidates,
        }
    }
}

impl TypedValueParser for SpecValueParser {
    type Value = AnyValue;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let converter = self.converter.clone();
        let choices = self.choices.clone();
        let convert = move |token: &str| -> Result<AnyValue, ValueError> {
            if let Some(choices) = &choices {
                if !choices.iter().any(|c| c == token) {
                    return Err(ValueError::invalid_choice(token, choices.iter().cloned()));
                }
            }
            converter.convert(token)
        };
        convert.parse_ref(cmd, arg, value)
    }

    fn possible_values(&self) -> Option<Box<dyn Iterator<Item = PossibleValue> + '_>> {
        let values = self.choices.as_ref().or(self.candidates.as_ref())?;
        Some(Box::new(values.iter().map(|v| PossibleValue::new(v.clone()))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_split_on_first_equals() {
        let conv = key_value_converter(Converter::string(), Converter::string());
        let item = conv.convert("a=b=c").unwrap();
        let item = item.downcast_ref::<DictItem>().unwrap();
        assert_eq!(item.key.downcast_ref::<String>().unwrap(), "a");
        assert_eq!(item.value.downcast_ref::<String>().unwrap(), "b=c");

        assert!(conv.convert("novalue").is_err());
    }

    #[test]
    fn test_choices_rejected_with_usage_error() {
        let parser = SpecValueParser::new(
            Converter::string(),
            Some(vec!["A".into(), "B".into()]),
            None,
        );
        let cmd = Command::new("t");
        let err = parser.parse_ref(&cmd, None, OsStr::new("C")).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        let rendered = err.to_string();
        assert!(rendered.contains("A, B"), "{rendered}");

        let ok = parser.parse_ref(&cmd, None, OsStr::new("A")).unwrap();
        assert_eq!(ok.downcast_ref::<String>().unwrap(), "A");
    }

    #[test]
    fn test_possible_values_prefer_choices() {
        let parser = SpecValueParser::new(
            Converter::string(),
            None,
            Some(vec!["x".into(), "y".into()]),
        );
        let names: Vec<String> = parser
            .possible_values()
            .unwrap()
            .map(|pv| pv.get_name().to_string())
            .collect();
        assert_eq!(names, vec!["x", "y"]);
    }
}
