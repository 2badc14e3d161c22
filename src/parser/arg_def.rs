//! Resolved argument definitions and their clap registrations.

use clap::builder::ValueParser;
use clap::{Arg, ArgAction};

use crate::error::ConfigError;
use crate::parser::flags::Flag;
use crate::parser::value_parser::SpecValueParser;
use crate::parser::{Action, Nargs};
use crate::spec::{Completer, Converter, DefaultValue, PostProcess};
use crate::value::{AnyValue, ArgValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArgKind {
    Positional,
    Optional,
}

/// One declared argument after spec resolution. Everything the parse
/// pipeline needs is here; the clap `Arg` is derived from it.
#[derive(Debug, Clone)]
pub(crate) struct ArgDef {
    pub(crate) dest: String,
    pub(crate) kind: ArgKind,
    /// Option strings with prefixes; empty for positionals.
    pub(crate) flags: Vec<String>,
    /// Hidden `--no-` option string of a boolean flag.
    pub(crate) negated: Option<String>,
    pub(crate) action: Action,
    pub(crate) nargs: Option<Nargs>,
    /// Converts single values, including textual defaults.
    pub(crate) converter: Converter,
    /// Converts dict keys.
    pub(crate) key_converter: Converter,
    /// What clap runs on each token; the `KEY=VALUE` splitter for dicts.
    pub(crate) token_converter: Converter,
    pub(crate) choices: Option<Vec<String>>,
    pub(crate) completer: Option<Completer>,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) const_value: Option<AnyValue>,
    pub(crate) required: bool,
    pub(crate) strict_default: bool,
    pub(crate) post_process: Option<PostProcess>,
    pub(crate) help: Option<String>,
    pub(crate) metavar: Option<String>,
    pub(crate) hidden: bool,
    pub(crate) hyphen_values: bool,
}

impl ArgDef {
    pub(crate) fn negated_id(&self) -> String {
        format!("{}:negated", self.dest)
    }

    /// How the argument is named in error messages.
    pub(crate) fn display_name(&self) -> String {
        match self.kind {
            ArgKind::Positional => format!(
                "<{}>",
                self.metavar.as_deref().unwrap_or(self.dest.as_str())
            ),
            ArgKind::Optional => self
                .flags
                .iter()
                .find(|f| f.starts_with("--"))
                .or_else(|| self.flags.first())
                .cloned()
                .unwrap_or_else(|| self.dest.clone()),
        }
    }

    /// Whether clap itself enforces presence. Collections that must be
    /// non-empty are checked after defaults are settled instead.
    fn clap_required(&self) -> bool {
        self.required && !self.action.requires_nonempty()
    }

    /// Whether the positional may be left out.
    pub(crate) fn is_optional_positional(&self) -> bool {
        !self.clap_required()
    }

    /// Whether the positional swallows more than one value.
    pub(crate) fn is_variadic(&self) -> bool {
        self.nargs.is_some_and(|n| n.is_variadic())
    }

    /// Value when the argument was neither supplied nor defaulted.
    pub(crate) fn fallback(&self) -> ArgValue {
        match (self.action, self.kind, self.nargs) {
            (Action::StoreTrue, ..) => ArgValue::one(false),
            (Action::StoreFalse, ..) => ArgValue::one(true),
            (Action::Store, ArgKind::Positional, Some(Nargs::ZeroOrMore | Nargs::Remainder)) => {
                ArgValue::List(Vec::new())
            }
            _ => ArgValue::Missing,
        }
    }

    fn help_text(&self) -> Option<String> {
        let shown_default = match self.action {
            Action::StoreTrue | Action::StoreFalse | Action::StoreConst | Action::AppendConst => {
                None
            }
            _ => self.default.as_ref().and_then(DefaultValue::display),
        };
        match (&self.help, shown_default) {
            (Some(help), Some(default)) => Some(format!("{help} [default: {default}]")),
            (None, Some(default)) => Some(format!("[default: {default}]")),
            (help, None) => help.clone(),
        }
    }

    fn value_parser(&self) -> ValueParser {
        let candidates = match &self.completer {
            Some(Completer::Candidates(values)) => Some(values.clone()),
            _ => None,
        };
        ValueParser::new(SpecValueParser::new(
            self.token_converter.clone(),
            self.choices.clone(),
            candidates,
        ))
    }

    fn with_flags(&self, mut arg: Arg) -> Result<Arg, ConfigError> {
        let (mut has_long, mut has_short) = (false, false);
        for flag in &self.flags {
            arg = match Flag::parse(flag)? {
                Flag::Long(long) if !has_long => {
                    has_long = true;
                    arg.long(long)
                }
                Flag::Long(long) => arg.visible_alias(long),
                Flag::Short(c) if !has_short => {
                    has_short = true;
                    arg.short(c)
                }
                Flag::Short(c) => arg.visible_short_alias(c),
            };
        }
        Ok(arg)
    }

    fn with_values(&self, mut arg: Arg) -> Arg {
        let action = match self.action {
            Action::Store => ArgAction::Set,
            _ => ArgAction::Append,
        };
        arg = arg
            .action(action)
            .value_parser(self.value_parser())
            .allow_negative_numbers(true);
        if self.hyphen_values {
            arg = arg.allow_hyphen_values(true);
        }

        arg = match (self.nargs, self.kind) {
            (None, _) => arg.num_args(1),
            (Some(Nargs::Exactly(n)), _) => arg.num_args(n),
            (Some(Nargs::Optional), ArgKind::Positional) => arg.num_args(1),
            (Some(Nargs::Optional), ArgKind::Optional) => arg.num_args(0..=1),
            (Some(Nargs::ZeroOrMore), ArgKind::Positional) => arg.num_args(1..),
            (Some(Nargs::ZeroOrMore), ArgKind::Optional) => arg.num_args(0..),
            (Some(Nargs::OneOrMore), _) => arg.num_args(1..),
            (Some(Nargs::Remainder), ArgKind::Positional) => arg
                .num_args(1..)
                .allow_hyphen_values(true)
                .trailing_var_arg(true),
            (Some(Nargs::Remainder), ArgKind::Optional) => {
                arg.num_args(0..).allow_hyphen_values(true)
            }
        };

        if let Some(metavar) = &self.metavar {
            arg = arg.value_name(metavar.clone());
        }
        match &self.completer {
            Some(Completer::Hint(hint)) => arg = arg.value_hint(*hint),
            Some(Completer::Candidates(_)) if self.choices.is_none() => {
                arg = arg.hide_possible_values(true);
            }
            _ => {}
        }
        arg
    }

    /// The clap registrations: the argument itself, plus the hidden
    /// negation of a boolean flag.
    pub(crate) fn clap_args(&self) -> Result<Vec<Arg>, ConfigError> {
        let mut arg = Arg::new(self.dest.clone())
            .required(self.clap_required())
            .hide(self.hidden);
        if let Some(help) = self.help_text() {
            arg = arg.help(help);
        }
        if self.kind == ArgKind::Optional {
            arg = self.with_flags(arg)?;
        }

        arg = match self.action {
            Action::StoreTrue | Action::StoreFalse | Action::StoreConst => {
                arg.action(ArgAction::SetTrue)
            }
            Action::AppendConst | Action::Count => arg.action(ArgAction::Count),
            Action::Store | Action::Append | Action::Extend | Action::SetItem => {
                self.with_values(arg)
            }
        };

        let Some(negated) = &self.negated else {
            return Ok(vec![arg]);
        };
        let negated_id = self.negated_id();
        let long = match Flag::parse(negated)? {
            Flag::Long(long) => long,
            Flag::Short(_) => return Err(ConfigError::InvalidFlag(negated.clone())),
        };
        let negative = Arg::new(negated_id.clone())
            .long(long)
            .action(ArgAction::SetTrue)
            .hide(true)
            .overrides_with(self.dest.clone());
        Ok(vec![arg.overrides_with(negated_id), negative])
    }
}
