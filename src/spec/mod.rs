//! Argument-type specs.
//!
//! An [`ArgSpec`] bundles the registration defaults for one argument type:
//! how to convert a token, what to call the argument, how to present it.
//! Specs are templates. Per-argument overrides are merged onto a clone when
//! the argument is declared, so a registered spec is never mutated.

mod arg_type;
mod convert;
mod enums;
mod registry;

pub use arg_type::{ArgType, DeclaresSpec, TypeKey};
pub use convert::{Converter, PostProcess};
pub use enums::enum_spec;
pub use registry::SpecRegistry;

pub(crate) use convert::short_type_name;
pub(crate) use enums::variant_name;

use std::fmt;
use std::hash::Hash;

use clap::ValueHint;

use crate::error::ValueError;
use crate::value::{AnyValue, ArgValue, Dict};

/// Shell-completion hint for an argument's values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completer {
    /// Let the shell complete by kind (paths, hostnames, commands...).
    Hint(ValueHint),
    /// A fixed list of candidate values.
    Candidates(Vec<String>),
}

/// A default value, either already typed or as text converted per parse.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    /// A token run through the argument's converter on every parse.
    Raw(String),
    /// A typed value.
    Value(AnyValue),
    /// Tokens converted into a fresh list on every parse.
    RawList(Vec<String>),
    /// A typed list.
    List(Vec<AnyValue>),
    /// `(key, value)` tokens converted into a fresh dict on every parse.
    RawDict(Vec<(String, String)>),
    /// A typed dict.
    Dict(Dict),
}

impl DefaultValue {
    /// Typed single default.
    pub fn value<T>(value: T) -> Self
    where
        T: Clone + fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        DefaultValue::Value(AnyValue::cloneable(value))
    }

    /// Typed list default.
    pub fn list<T, I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        DefaultValue::List(items.into_iter().map(AnyValue::cloneable).collect())
    }

    /// Typed dict default.
    pub fn dict<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Clone + fmt::Debug + PartialEq + Hash + Send + Sync + 'static,
        V: Clone + fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        DefaultValue::Dict(
            pairs
                .into_iter()
                .map(|(k, v)| (AnyValue::cloneable(k), AnyValue::cloneable(v)))
                .collect(),
        )
    }

    /// Whether this default is a collection (list or dict).
    pub fn is_collection(&self) -> bool {
        !matches!(self, DefaultValue::Raw(_) | DefaultValue::Value(_))
    }

    /// Build the value for one parse. Raw forms go through the converters
    /// and typed forms are detached, so every call returns independent
    /// values. Typed values wrapped without a copy function stay shared.
    pub(crate) fn build(
        &self,
        converter: &Converter,
        key_converter: &Converter,
    ) -> Result<ArgValue, ValueError> {
        Ok(match self {
            DefaultValue::Raw(token) => ArgValue::One(converter.convert(token)?),
            DefaultValue::Value(value) => ArgValue::One(value.detach()),
            DefaultValue::RawList(tokens) => ArgValue::List(
                tokens
                    .iter()
                    .map(|t| converter.convert(t).map(ArgValue::One))
                    .collect::<Result<_, _>>()?,
            ),
            DefaultValue::List(items) => {
                ArgValue::List(items.iter().map(|v| ArgValue::One(v.detach())).collect())
            }
            DefaultValue::RawDict(pairs) => {
                let mut dict = Dict::new();
                for (k, v) in pairs {
                    dict.insert(key_converter.convert(k)?, converter.convert(v)?);
                }
                ArgValue::Dict(dict)
            }
            DefaultValue::Dict(dict) => ArgValue::Dict(
                dict.iter()
                    .map(|(k, v)| (k.detach(), v.detach()))
                    .collect(),
            ),
        })
    }

    /// Text shown as `[default: ...]` in help, `None` when there is nothing to show.
    pub(crate) fn display(&self) -> Option<String> {
        let text = match self {
            DefaultValue::Raw(token) => token.clone(),
            DefaultValue::Value(value) => value.display(),
            DefaultValue::RawList(tokens) => tokens.join(", "),
            DefaultValue::List(items) => items
                .iter()
                .map(AnyValue::display)
                .collect::<Vec<_>>()
                .join(", "),
            DefaultValue::RawDict(pairs) => pairs
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(", "),
            DefaultValue::Dict(dict) => ArgValue::Dict(dict.clone()).display(),
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Registration defaults for one argument type.
#[derive(Debug, Clone, Default)]
pub struct ArgSpec {
    /// Argument names used when the declaration gives none.
    pub names: Vec<String>,
    /// Default value when the argument is not required.
    pub default: Option<DefaultValue>,
    /// Token converter.
    pub converter: Option<Converter>,
    /// Hook run on the parsed value.
    pub post_process: Option<PostProcess>,
    /// Allowed tokens.
    pub choices: Option<Vec<String>>,
    /// Help text.
    pub help: Option<String>,
    /// Placeholder shown in usage.
    pub metavar: Option<String>,
    /// Shell-completion hint.
    pub completer: Option<Completer>,
}

impl ArgSpec {
    /// A spec with only a converter.
    pub fn new(converter: Converter) -> Self {
        Self {
            converter: Some(converter),
            ..Self::default()
        }
    }

    /// Set the default argument names.
    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the default value.
    pub fn default_value(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Set a textual default, converted on every parse.
    pub fn default_raw(self, token: impl Into<String>) -> Self {
        self.default_value(DefaultValue::Raw(token.into()))
    }

    /// Set the post-parse hook.
    pub fn post_process(mut self, hook: PostProcess) -> Self {
        self.post_process = Some(hook);
        self
    }

    /// Restrict tokens to a closed set.
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Set the help text.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Set the usage placeholder.
    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    /// Set the completion hint.
    pub fn completer(mut self, completer: Completer) -> Self {
        self.completer = Some(completer);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_list_default_builds_fresh_values() {
        let default = DefaultValue::RawList(vec!["1".into(), "2".into()]);
        let conv = Converter::from_str_impl::<i64>();
        let first = default.build(&conv, &Converter::string()).unwrap();
        let second = default.build(&conv, &Converter::string()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            ArgValue::List(vec![ArgValue::one(1_i64), ArgValue::one(2_i64)])
        );
    }

    #[test]
    fn test_raw_default_conversion_error() {
        let default = DefaultValue::Raw("x".into());
        let conv = Converter::from_str_impl::<i64>();
        assert!(default.build(&conv, &Converter::string()).is_err());
    }

    #[test]
    fn test_typed_default_builds_detached_values() {
        let default = DefaultValue::value(String::from("x"));
        let conv = Converter::string();
        let ArgValue::One(value) = default.build(&conv, &conv).unwrap() else {
            panic!("expected a single value");
        };
        assert_eq!(value.try_unwrap::<String>().unwrap(), "x");
    }

    #[test]
    fn test_display_of_empty_list_is_none() {
        assert_eq!(DefaultValue::List(vec![]).display(), None);
        assert_eq!(
            DefaultValue::RawDict(vec![("a".into(), "1".into())]).display(),
            Some("a=1".into())
        );
    }
}
