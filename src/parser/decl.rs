//! Per-argument declarations.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use clap::ValueEnum;

use crate::parser::{Action, Nargs};
use crate::spec::{variant_name, ArgSpec, ArgType, Completer, Converter, DefaultValue, PostProcess};
use crate::value::AnyValue;

/// Explicit settings for one argument. Anything left unset falls back to
/// the type's spec, then to the adder's defaults.
///
/// ```
/// use clap_gears::{ArgumentParser, Decl};
///
/// let mut parser = ArgumentParser::new("demo");
/// parser
///     .add_optional(Decl::new().names(["n", "count"]).typed::<u32>().default_raw("1"))
///     .unwrap();
/// let args = parser.try_parse_from(["demo", "-n", "3"]).unwrap();
/// assert_eq!(args.one::<u32>("count").unwrap(), &3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Decl {
    pub(crate) names: Vec<String>,
    pub(crate) dest: Option<String>,
    pub(crate) arg_type: Option<ArgType>,
    pub(crate) spec: Option<ArgSpec>,
    pub(crate) converter: Option<Converter>,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) const_value: Option<AnyValue>,
    pub(crate) choices: Option<Vec<String>>,
    pub(crate) help: Option<String>,
    pub(crate) metavar: Option<String>,
    pub(crate) completer: Option<Completer>,
    pub(crate) required: Option<bool>,
    pub(crate) nargs: Option<Nargs>,
    pub(crate) action: Option<Action>,
    pub(crate) strict_default: Option<bool>,
    pub(crate) post_process: Option<PostProcess>,
    pub(crate) key_type: Option<ArgType>,
    pub(crate) key_converter: Option<Converter>,
    pub(crate) key_metavar: Option<String>,
    pub(crate) negative_flag: Option<bool>,
    pub(crate) hidden: bool,
    pub(crate) hyphen_values: bool,
}

impl Decl {
    /// An empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name (positional name or option string).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Add several names.
    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Key under which the value is stored in the results.
    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    /// Value type, resolved through the parser's registry.
    pub fn with_type(mut self, arg_type: impl Into<ArgType>) -> Self {
        self.arg_type = Some(arg_type.into());
        self
    }

    /// Value type `T`, parsed with `FromStr` unless a spec is registered.
    pub fn typed<T>(self) -> Self
    where
        T: FromStr + fmt::Debug + PartialEq + Send + Sync + 'static,
        T::Err: fmt::Display,
    {
        self.with_type(ArgType::of::<T>())
    }

    /// Enum value type.
    pub fn value_enum<E>(self) -> Self
    where
        E: ValueEnum + fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        self.with_type(ArgType::value_enum::<E>())
    }

    /// Use this spec instead of resolving one from a type.
    pub fn spec(mut self, spec: ArgSpec) -> Self {
        self.spec = Some(spec);
        self
    }

    /// Explicit converter; wins over any spec.
    pub fn converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn default_value(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Textual default, converted on every parse.
    pub fn default_raw(self, token: impl Into<String>) -> Self {
        self.default_value(DefaultValue::Raw(token.into()))
    }

    /// Typed default. Each parse gets its own clone.
    pub fn default_typed<T>(self, value: T) -> Self
    where
        T: Clone + fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        self.default_value(DefaultValue::value(value))
    }

    /// Enum default, shown in help by the variant name its tokens use.
    pub fn default_variant<E>(self, variant: E) -> Self
    where
        E: ValueEnum + fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        let name = variant_name(&variant);
        self.default_value(DefaultValue::Value(
            AnyValue::cloneable(variant).with_label(name),
        ))
    }

    /// Textual list default, converted into a fresh list on every parse.
    pub fn default_list<I, S>(self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_value(DefaultValue::RawList(
            tokens.into_iter().map(Into::into).collect(),
        ))
    }

    /// Textual dict default, converted into a fresh dict on every parse.
    pub fn default_dict<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.default_value(DefaultValue::RawDict(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Typed dict default.
    pub fn default_typed_dict<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Clone + fmt::Debug + PartialEq + Hash + Send + Sync + 'static,
        V: Clone + fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        self.default_value(DefaultValue::dict(pairs))
    }

    /// Value used by `store_const`, `append_const` and a bare `nargs = ?` option.
    pub fn const_value<T>(mut self, value: T) -> Self
    where
        T: fmt::Debug + PartialEq + Send + Sync + 'static,
    {
        self.const_value = Some(AnyValue::new(value));
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    pub fn completer(mut self, completer: Completer) -> Self {
        self.completer = Some(completer);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn nargs(mut self, nargs: Nargs) -> Self {
        self.nargs = Some(nargs);
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Whether supplied values replace a collection default instead of
    /// being added to it.
    pub fn strict_default(mut self, strict: bool) -> Self {
        self.strict_default = Some(strict);
        self
    }

    pub fn post_process(mut self, hook: PostProcess) -> Self {
        self.post_process = Some(hook);
        self
    }

    /// Key type of a dict argument.
    pub fn key_type(mut self, arg_type: impl Into<ArgType>) -> Self {
        self.key_type = Some(arg_type.into());
        self
    }

    /// Key type `T` of a dict argument.
    pub fn key_typed<T>(self) -> Self
    where
        T: FromStr + fmt::Debug + PartialEq + Send + Sync + 'static,
        T::Err: fmt::Display,
    {
        self.key_type(ArgType::of::<T>())
    }

    /// Explicit key converter of a dict argument.
    pub fn key_converter(mut self, converter: Converter) -> Self {
        self.key_converter = Some(converter);
        self
    }

    /// Placeholder for the key part of `KEY=VALUE`.
    pub fn key_metavar(mut self, metavar: impl Into<String>) -> Self {
        self.key_metavar = Some(metavar.into());
        self
    }

    /// Whether a flag also gets a hidden `--no-` twin.
    pub fn negative_flag(mut self, include: bool) -> Self {
        self.negative_flag = Some(include);
        self
    }

    /// Leave the argument out of help.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Accept values that start with `-`, such as option strings given as data.
    pub fn allow_hyphen_values(mut self) -> Self {
        self.hyphen_values = true;
        self
    }
}

impl From<&str> for Decl {
    fn from(name: &str) -> Self {
        Decl::new().name(name)
    }
}

impl From<String> for Decl {
    fn from(name: String) -> Self {
        Decl::new().name(name)
    }
}

impl<const N: usize> From<[&str; N]> for Decl {
    fn from(names: [&str; N]) -> Self {
        Decl::new().names(names)
    }
}
