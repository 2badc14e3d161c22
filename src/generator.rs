//! Parsers generated from function signatures.
//!
//! A [`Signature`] describes a function's parameters; [`ParserGenerator`]
//! turns it into an [`ArgumentParser`] through the public adders, so every
//! parameter gets the same spec resolution as a hand-written declaration.
//!
//! ```
//! use clap_gears::generator::{Param, ParamKind, ParserGenerator, Signature};
//! use clap_gears::ArgType;
//!
//! let sig = Signature::new("resize")
//!     .param(Param::new("width", ParamKind::Value(ArgType::of::<u32>())))
//!     .param(Param::new("keep_ratio", ParamKind::Bool));
//! let parser = ParserGenerator::new().generate(&sig).unwrap();
//!
//! let args = parser.try_parse_from(["resize", "--width", "640", "-k"]).unwrap();
//! assert_eq!(args.one::<u32>("width").unwrap(), &640);
//! assert!(args.get_flag("keep_ratio").unwrap());
//! ```

use std::collections::{HashMap, HashSet};
use std::ffi::OsString;

use crate::config::ParserSettings;
use crate::error::{ConfigError, ParseError};
use crate::parser::{ArgumentParser, Decl, ParsedArgs};
use crate::spec::{ArgType, DefaultValue, SpecRegistry};

/// Short flags that stay reserved for clap.
const RESERVED_SHORTS: [char; 1] = ['h'];

/// The declared type of a parameter.
#[derive(Debug, Clone)]
pub enum ParamKind {
    /// A switch.
    Bool,
    /// A value; required unless the parameter has a default.
    Value(ArgType),
    /// A value that may be left out.
    Optional(ArgType),
    /// Zero or more values.
    List(ArgType),
    /// `KEY=VALUE` items.
    Dict { key: ArgType, value: ArgType },
}

/// One function parameter.
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    kind: ParamKind,
    doc: Option<String>,
    default: Option<DefaultValue>,
}

impl Param {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            doc: None,
            default: None,
        }
    }

    /// Parameter documentation, used as help text.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn default_value(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// A textual default, converted like a command-line token.
    pub fn default_raw(self, token: impl Into<String>) -> Self {
        self.default_value(DefaultValue::Raw(token.into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }
}

/// A function's name, documentation and parameters.
#[derive(Debug, Clone)]
pub struct Signature {
    name: String,
    doc: Option<String>,
    params: Vec<Param>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            params: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

/// Builds an [`ArgumentParser`] from a [`Signature`].
#[derive(Debug, Clone, Default)]
pub struct ParserGenerator {
    registry: Option<SpecRegistry>,
    settings: ParserSettings,
}

impl ParserGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `registry` instead of the built-in specs.
    pub fn with_registry(mut self, registry: SpecRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_settings(mut self, settings: ParserSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Generate the parser.
    ///
    /// `bool` parameters become flags, lists `add_list`, dicts `add_dict`,
    /// everything else `add_optional`. Long flags are the parameter names
    /// with `_` replaced by `-`. One-letter names become short flags; other
    /// parameters also get their first letter as a short flag when no other
    /// parameter claims it.
    ///
    /// # Errors
    ///
    /// Whatever the adders reject, e.g. an unknown type or a default on a
    /// `bool` parameter.
    pub fn generate(&self, signature: &Signature) -> Result<ArgumentParser, ConfigError> {
        let mut parser = ArgumentParser::with_settings(&signature.name, self.settings.clone());
        if let Some(registry) = &self.registry {
            parser = parser.with_registry(registry.clone());
        }
        if let Some(doc) = &signature.doc {
            parser = parser.about(doc.clone());
        }

        let shorts = short_flags(&signature.params);
        for param in &signature.params {
            let mut names = Vec::with_capacity(2);
            if let Some(short) = shorts.get(param.name.as_str()) {
                names.push(format!("-{short}"));
            }
            if param.name.chars().count() > 1 {
                names.push(format!("--{}", param.name.replace('_', "-")));
            }

            let mut decl = Decl::new().names(names).dest(param.name.clone());
            if let Some(doc) = &param.doc {
                decl = decl.help(doc.clone());
            }
            if let Some(default) = &param.default {
                decl = decl.default_value(default.clone());
            }

            match &param.kind {
                ParamKind::Bool => parser.add_flag(decl)?,
                ParamKind::Value(arg_type) => {
                    let required = param.default.is_none();
                    parser.add_optional(decl.with_type(arg_type.clone()).required(required))?
                }
                ParamKind::Optional(arg_type) => {
                    parser.add_optional(decl.with_type(arg_type.clone()))?
                }
                ParamKind::List(arg_type) => parser.add_list(decl.with_type(arg_type.clone()))?,
                ParamKind::Dict { key, value } => {
                    parser.add_dict(decl.with_type(value.clone()).key_type(key.clone()))?
                }
            };
            tracing::trace!(function = %signature.name, param = %param.name, "Generated argument");
        }
        Ok(parser)
    }
}

/// Short flag per parameter name.
fn short_flags(params: &[Param]) -> HashMap<&str, char> {
    let mut shorts = HashMap::new();
    let mut taken: HashSet<char> = RESERVED_SHORTS.into_iter().collect();

    for param in params {
        let mut chars = param.name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            shorts.insert(param.name.as_str(), c);
            taken.insert(c);
        }
    }

    let mut first_letters: HashMap<char, usize> = HashMap::new();
    for param in params.iter().filter(|p| !shorts.contains_key(p.name.as_str())) {
        if let Some(c) = param.name.chars().next() {
            *first_letters.entry(c).or_default() += 1;
        }
    }
    for param in params {
        let Some(c) = param.name.chars().next() else {
            continue;
        };
        if shorts.contains_key(param.name.as_str()) || !c.is_ascii_alphanumeric() {
            continue;
        }
        if first_letters.get(&c) == Some(&1) && taken.insert(c) {
            shorts.insert(param.name.as_str(), c);
        }
    }
    shorts
}

/// A generated parser bundled with the function it feeds.
pub struct SingleMain<F> {
    parser: ArgumentParser,
    func: F,
}

impl<F, R> SingleMain<F>
where
    F: Fn(&ParsedArgs) -> R,
{
    /// Generate the parser for `signature` with default settings.
    pub fn new(signature: &Signature, func: F) -> Result<Self, ConfigError> {
        Self::with_generator(&ParserGenerator::new(), signature, func)
    }

    pub fn with_generator(
        generator: &ParserGenerator,
        signature: &Signature,
        func: F,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            parser: generator.generate(signature)?,
            func,
        })
    }

    pub fn parser(&self) -> &ArgumentParser {
        &self.parser
    }

    /// Parse `args` (program name first) and call the function.
    pub fn try_run_from<I, T>(&self, args: I) -> Result<R, ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let parsed = self.parser.try_parse_from(args)?;
        Ok((self.func)(&parsed))
    }

    /// Parse the process arguments and call the function, exiting on error.
    pub fn run(&self) -> R {
        let parsed = self.parser.parse();
        (self.func)(&parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(params: &[&str]) -> Vec<Param> {
        params
            .iter()
            .map(|name| Param::new(*name, ParamKind::Bool))
            .collect()
    }

    #[test]
    fn test_short_flags_unique_first_letters() {
        let params = names(&["x", "pretty", "zoom", "zebra", "help_me", "xylophone"]);
        let shorts = short_flags(&params);
        assert_eq!(shorts.get("x"), Some(&'x'));
        assert_eq!(shorts.get("pretty"), Some(&'p'));
        assert_eq!(shorts.get("zoom"), None);
        assert_eq!(shorts.get("zebra"), None);
        assert_eq!(shorts.get("help_me"), None);
        assert_eq!(shorts.get("xylophone"), None);
    }

    #[test]
    fn test_bool_default_is_rejected() {
        let sig = Signature::new("f")
            .param(Param::new("verbose", ParamKind::Bool).default_value(DefaultValue::value(true)));
        assert!(matches!(
            ParserGenerator::new().generate(&sig),
            Err(ConfigError::IncompatibleOption { option: "default", .. })
        ));
    }
}
