//! Error types for the two phases of argument handling.
//!
//! Declaration mistakes are programmer errors and surface as [`ConfigError`]
//! before any token is read. Bad command-line input surfaces as a
//! [`ParseError`] (clap's own error type) so usage rendering and exit codes
//! stay identical to plain clap.

use thiserror::Error;

/// Errors raised by clap while parsing user input.
pub type ParseError = clap::Error;

/// Declaration-time errors: the argument definition itself is wrong.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No spec is registered for the type and no converter was given.
    #[error("unknown argument type '{0}': no spec registered and no converter given")]
    UnknownType(String),

    /// An option that the adder method does not accept.
    #[error("{option}= does not apply to {adder}")]
    IncompatibleOption {
        /// The adder that rejected the option (e.g. "flags").
        adder: &'static str,
        /// The offending option name.
        option: &'static str,
    },

    /// A nargs value that makes no sense for the argument.
    #[error("nargs={nargs} does not apply to {what}")]
    InvalidNargs {
        /// Rendered nargs value.
        nargs: String,
        /// What the argument is (e.g. "lists").
        what: &'static str,
    },

    /// No name (and no dest, for positionals) could be determined.
    #[error("name not supplied for {0}")]
    MissingName(&'static str),

    /// Positional names must not look like flags.
    #[error("name of positional must not start with '-': '{0}'")]
    DashedPositional(String),

    /// A positional was given both a name and a different dest.
    #[error("positional '{name}' was given a conflicting dest '{dest}'")]
    NameDestConflict {
        /// The positional name.
        name: String,
        /// The explicitly given dest.
        dest: String,
    },

    /// A flag string that cannot be expressed (e.g. "-xy").
    #[error("invalid option string '{0}'")]
    InvalidFlag(String),

    /// The dest is already taken by another argument.
    #[error("argument '{0}' is already registered")]
    DuplicateArgument(String),

    /// The option string is already taken by another argument.
    #[error("conflicting option string: {0}")]
    ConflictingOption(String),

    /// A positional that clap cannot place after the existing ones.
    #[error("positional '{name}' cannot follow {after}")]
    PositionalOrder {
        /// The rejected positional.
        name: String,
        /// Description of the earlier positional.
        after: String,
    },

    /// A const-based action declared without a const value.
    #[error("action {0} requires a const value")]
    MissingConst(&'static str),

    /// A textual default that the argument's converter rejects.
    #[error("invalid default for '{dest}': {source}")]
    InvalidDefault {
        /// Dest of the argument.
        dest: String,
        /// Why the converter rejected it.
        #[source]
        source: ValueError,
    },
}

/// A command-line token that could not be converted to its typed value.
///
/// Converters return this; the parser hands it to clap so it is rendered as
/// a regular `invalid value` error with usage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValueError {
    message: String,
    choices: Vec<String>,
}

impl ValueError {
    /// Create a value error with a plain message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            choices: Vec::new(),
        }
    }

    /// A token outside a closed set of allowed values.
    pub fn invalid_choice<I, S>(token: &str, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
        Self {
            message: format!(
                "'{}' is not a valid choice (possible values: {})",
                token,
                choices.join(", ")
            ),
            choices,
        }
    }

    /// The message, without choices decoration.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Allowed values, when the failure was a bad choice.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }
}

/// Errors from the typed getters on [`crate::ParsedArgs`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// No argument with this dest was declared.
    #[error("no argument named '{0}'")]
    Unknown(String),

    /// The stored value is of a different Rust type.
    #[error("argument '{dest}' does not hold a {expected}")]
    TypeMismatch {
        /// Dest of the argument.
        dest: String,
        /// Requested type name.
        expected: &'static str,
    },

    /// The stored value has a different shape (single/list/dict).
    #[error("argument '{dest}' holds a {found}, not a {expected}")]
    ShapeMismatch {
        /// Dest of the argument.
        dest: String,
        /// Requested shape.
        expected: &'static str,
        /// Actual shape.
        found: &'static str,
    },

    /// The value cannot be moved out because another handle still refers to it.
    #[error("argument '{0}' is still shared and cannot be taken")]
    Shared(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_choice_lists_allowed_values() {
        let err = ValueError::invalid_choice("C", ["A", "B"]);
        assert_eq!(err.choices(), ["A".to_string(), "B".to_string()]);
        assert!(err.to_string().contains("A, B"));
        assert!(err.to_string().contains("'C'"));
    }

    #[test]
    fn config_error_messages() {
        let err = ConfigError::IncompatibleOption {
            adder: "flags",
            option: "choices",
        };
        assert_eq!(err.to_string(), "choices= does not apply to flags");

        let err = ConfigError::InvalidNargs {
            nargs: "?".into(),
            what: "lists",
        };
        assert_eq!(err.to_string(), "nargs=? does not apply to lists");
    }
}
