//! The argument parser.
//!
//! [`ArgumentParser`] owns a `clap::Command` and a [`SpecRegistry`]. Each
//! adder resolves a [`Decl`] against the registry, checks it, and registers
//! the resulting `clap::Arg`. Parsing runs clap, then a single settle pass
//! per argument:
//!
//! 1. Collect: read what the command line supplied (`collect`)
//! 2. Settle: apply defaults, freshly built for this parse (`accumulate`)
//! 3. Check: required lists and dicts must be non-empty
//! 4. Post-process: run per-argument hooks
//!
//! Defaults never reach clap, so accumulating arguments never start from
//! a shared default.

mod accumulate;
mod action;
mod arg_def;
mod collect;
mod decl;
mod flags;
mod parsed;
mod value_parser;

pub use action::{Action, Nargs};
pub use decl::Decl;
pub use parsed::ParsedArgs;

use std::collections::HashSet;
use std::ffi::OsString;
use std::io;

use clap::error::ErrorKind;
use clap::Command;
use indexmap::IndexMap;

use crate::completion;
use crate::config::ParserSettings;
use crate::error::{ConfigError, ParseError, ValueError};
use crate::spec::{ArgSpec, Converter, DefaultValue, SpecRegistry, TypeKey};
use crate::value::Dict;

use arg_def::{ArgDef, ArgKind};
use flags::{dest_from_flags, fix_flag, is_positional, negative_flag};
use value_parser::key_value_converter;

/// An argument parser with adder methods, typed specs and dict arguments.
///
/// ```
/// use clap_gears::{ArgumentParser, Decl};
///
/// let mut parser = ArgumentParser::new("seq");
/// parser.add_positional(Decl::from("range").with_type("range")).unwrap();
/// parser.add_flag(["-r", "--reverse"]).unwrap();
/// parser.add_list(Decl::from("skip").typed::<i64>()).unwrap();
///
/// let args = parser
///     .try_parse_from(["seq", "0:10:2", "--skip", "4", "6"])
///     .unwrap();
/// assert!(!args.get_flag("reverse").unwrap());
/// assert_eq!(args.get_list::<i64>("skip").unwrap(), vec![4, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct ArgumentParser {
    command: Command,
    registry: SpecRegistry,
    settings: ParserSettings,
    args: Vec<ArgDef>,
    option_strings: HashSet<String>,
}

impl ArgumentParser {
    /// A parser with default settings and the built-in type specs.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_settings(name, ParserSettings::default())
    }

    pub fn with_settings(name: impl Into<String>, settings: ParserSettings) -> Self {
        let mut command = Command::new(name.into()).args_override_self(true);
        if let Some(width) = settings.term_width {
            command = command.term_width(width);
        }
        Self {
            command,
            registry: SpecRegistry::new(),
            settings,
            args: Vec::new(),
            option_strings: ["-h", "--help"].into_iter().map(String::from).collect(),
        }
    }

    /// Replace the spec registry.
    pub fn with_registry(mut self, registry: SpecRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.command = self.command.about(about.into());
        self
    }

    /// Set a version, which also claims `-V/--version`.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.command = self.command.version(version.into());
        self.option_strings.insert("-V".to_string());
        self.option_strings.insert("--version".to_string());
        self
    }

    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    pub fn registry(&self) -> &SpecRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SpecRegistry {
        &mut self.registry
    }

    /// Register a spec for later declarations of this parser.
    pub fn register_spec(&mut self, key: impl Into<TypeKey>, spec: ArgSpec) -> Option<ArgSpec> {
        self.registry.register(key, spec)
    }

    /// The underlying clap command.
    pub fn command(&self) -> &Command {
        &self.command
    }

    // ========================================================================
    // Adders
    // ========================================================================

    /// Add a positional argument.
    ///
    /// `action` and `required` are rejected. A default makes the positional
    /// optional (`nargs = ?`); any other nargs is then rejected.
    pub fn add_positional(&mut self, decl: impl Into<Decl>) -> Result<String, ConfigError> {
        let decl = decl.into();
        for (set, option) in [
            (decl.action.is_some(), "action"),
            (decl.required.is_some(), "required"),
        ] {
            if set {
                return Err(ConfigError::IncompatibleOption {
                    adder: "positionals",
                    option,
                });
            }
        }
        self.positional(decl)
    }

    /// Add an option taking a value. Bare names get prefixes: `x` becomes
    /// `-x`, `xx` becomes `--xx`.
    pub fn add_optional(&mut self, decl: impl Into<Decl>) -> Result<String, ConfigError> {
        let decl = decl.into();
        let spec = self.merged_spec(&decl)?;
        let flags = fixed_flags(&spec.names);
        if flags.is_empty() {
            return Err(ConfigError::MissingName("optional"));
        }
        let action = decl.action.unwrap_or(Action::Store);
        self.optional(decl, spec, flags, action, false)
    }

    /// Add a boolean flag: present gives `true`, absent `false`.
    ///
    /// Unless disabled, a hidden `--no-NAME` twin is added; the last of the
    /// two on the command line wins.
    pub fn add_flag(&mut self, decl: impl Into<Decl>) -> Result<String, ConfigError> {
        let decl = decl.into();
        let has_type = decl.arg_type.is_some() || decl.converter.is_some() || decl.spec.is_some();
        for (set, option) in [
            (decl.action.is_some(), "action"),
            (decl.nargs.is_some(), "nargs"),
            (decl.required.is_some(), "required"),
            (decl.const_value.is_some(), "const"),
            (decl.default.is_some(), "default"),
            (has_type, "type"),
            (decl.choices.is_some(), "choices"),
        ] {
            if set {
                return Err(ConfigError::IncompatibleOption {
                    adder: "flags",
                    option,
                });
            }
        }

        let flags = fixed_flags(&decl.names);
        if flags.is_empty() {
            return Err(ConfigError::MissingName("flag"));
        }
        let dest = match &decl.dest {
            Some(dest) => dest.clone(),
            None => dest_from_flags(&flags).ok_or(ConfigError::MissingName("flag"))?,
        };
        let negated = if decl.negative_flag.unwrap_or(self.settings.negative_flags) {
            negative_flag(&flags)
        } else {
            None
        };

        self.define(ArgDef {
            dest,
            kind: ArgKind::Optional,
            flags,
            negated,
            action: Action::StoreTrue,
            nargs: None,
            converter: Converter::string(),
            key_converter: Converter::string(),
            token_converter: Converter::string(),
            choices: None,
            completer: None,
            default: None,
            const_value: None,
            required: false,
            strict_default: false,
            post_process: decl.post_process,
            help: decl.help,
            metavar: None,
            hidden: decl.hidden,
            hyphen_values: false,
        })
    }

    /// Add a list option collecting values across occurrences.
    ///
    /// nargs defaults to `+`; `?` is rejected. The default is the empty list
    /// whatever the type's spec says, and `required` means non-empty.
    pub fn add_list(&mut self, decl: impl Into<Decl>) -> Result<String, ConfigError> {
        let mut decl = decl.into();
        let nargs = collection_nargs(&decl, "lists")?;
        decl.default
            .get_or_insert_with(|| DefaultValue::List(Vec::new()));
        let spec = self.merged_spec(&decl)?;
        let flags = fixed_flags(&spec.names);
        if flags.is_empty() {
            return Err(ConfigError::MissingName("list"));
        }
        decl.nargs = Some(nargs);
        self.optional(decl, spec, flags, Action::Extend, self.settings.strict_default)
    }

    /// Add a dict option collecting `KEY=VALUE` items.
    ///
    /// The type applies to values, `key_type` to keys. `choices` is
    /// rejected. The metavar defaults to `KEY=VALUE` built from the key and
    /// value metavars.
    pub fn add_dict(&mut self, decl: impl Into<Decl>) -> Result<String, ConfigError> {
        let mut decl = decl.into();
        if decl.choices.is_some() {
            return Err(ConfigError::IncompatibleOption {
                adder: "dicts",
                option: "choices",
            });
        }
        let nargs = collection_nargs(&decl, "dicts")?;
        decl.default
            .get_or_insert_with(|| DefaultValue::Dict(Dict::new()));
        let mut spec = self.merged_spec(&decl)?;
        spec.choices = None;
        let flags = fixed_flags(&spec.names);
        if flags.is_empty() {
            return Err(ConfigError::MissingName("dict"));
        }
        decl.nargs = Some(nargs);
        self.optional(decl, spec, flags, Action::SetItem, self.settings.strict_default)
    }

    /// Add an argument with full control over action and nargs.
    ///
    /// A single name without a leading dash, or no name but a dest, makes a
    /// positional; otherwise every name must be an option string. Names are
    /// taken as given. `append` keeps the default and adds to it unless
    /// `strict_default` is requested.
    pub fn add_argument(&mut self, decl: impl Into<Decl>) -> Result<String, ConfigError> {
        let decl = decl.into();
        let positional = match decl.names.as_slice() {
            [] if decl.dest.is_some() => true,
            [] => return Err(ConfigError::MissingName("argument")),
            [name] if is_positional(name) => true,
            names => {
                if let Some(bad) = names.iter().find(|n| is_positional(n)) {
                    return Err(ConfigError::InvalidFlag(bad.clone()));
                }
                false
            }
        };

        if positional {
            if decl.required.is_some() {
                return Err(ConfigError::IncompatibleOption {
                    adder: "positionals",
                    option: "required",
                });
            }
            return self.positional(decl);
        }
        let spec = self.merged_spec(&decl)?;
        let flags = decl.names.clone();
        let action = decl.action.unwrap_or(Action::Store);
        self.optional(decl, spec, flags, action, false)
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    /// Parse `args` (program name first).
    ///
    /// # Errors
    ///
    /// Returns clap's error for bad input, `--help` and `--version`.
    pub fn try_parse_from<I, T>(&self, args: I) -> Result<ParsedArgs, ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut cmd = self.command.clone();
        let matches = cmd.try_get_matches_from_mut(args)?;

        let mut values = IndexMap::with_capacity(self.args.len());
        let mut empty_required = Vec::new();
        for def in &self.args {
            let supplied = collect::collect(def, &matches).map_err(|e| {
                cmd.error(
                    ErrorKind::ValueValidation,
                    format!("{}: {e}", def.display_name()),
                )
            })?;
            let value = accumulate::settle(def.action, def.strict_default, supplied, || {
                def.default
                    .as_ref()
                    .map(|default| default.build(&def.converter, &def.key_converter))
                    .transpose()
            })
            .map_err(|e| invalid_value(&mut cmd, def, &e))?
            .unwrap_or_else(|| def.fallback());

            if def.required && def.action.requires_nonempty() && value.is_empty() {
                empty_required.push(def.display_name());
            }
            values.insert(def.dest.clone(), value);
        }

        if !empty_required.is_empty() {
            return Err(cmd.error(
                ErrorKind::MissingRequiredArgument,
                format!(
                    "the following required arguments were not provided: {}",
                    empty_required.join(", ")
                ),
            ));
        }

        for def in &self.args {
            let (Some(hook), Some(slot)) = (&def.post_process, values.get_mut(&def.dest)) else {
                continue;
            };
            let value = std::mem::take(slot);
            *slot = hook
                .apply(value)
                .map_err(|e| invalid_value(&mut cmd, def, &e))?;
        }

        Ok(ParsedArgs::new(values))
    }

    /// Parse tokens without a program name.
    pub fn try_parse_args<I, T>(&self, tokens: I) -> Result<ParsedArgs, ParseError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let program = OsString::from(self.command.get_name());
        self.try_parse_from(std::iter::once(program).chain(tokens.into_iter().map(Into::into)))
    }

    /// Parse `args`, exiting with usage on error.
    ///
    /// Answers a shell-completion request first when completion is enabled.
    pub fn parse_from<I, T>(&self, args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        self.complete_if_requested();
        self.try_parse_from(args).unwrap_or_else(|e| e.exit())
    }

    /// Parse the process arguments, exiting with usage on error.
    pub fn parse(&self) -> ParsedArgs {
        self.parse_from(std::env::args_os())
    }

    fn complete_if_requested(&self) {
        if !self.settings.auto_complete {
            return;
        }
        let Some(shell) = completion::completion_request(&self.settings.complete_env) else {
            return;
        };
        let mut cmd = self.command.clone();
        completion::write_completions(shell, &mut cmd, &mut io::stdout());
        std::process::exit(0);
    }

    /// Rendered `--help` text.
    pub fn render_help(&self) -> String {
        self.command.clone().render_help().to_string()
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Usage names of the positionals, in order.
    pub fn positional_names(&self) -> Vec<String> {
        self.of_kind(ArgKind::Positional)
            .map(ArgDef::display_name)
            .collect()
    }

    pub fn positional_dests(&self) -> Vec<&str> {
        self.of_kind(ArgKind::Positional)
            .map(|def| def.dest.as_str())
            .collect()
    }

    /// Option strings of each option, in declaration order.
    pub fn optional_names(&self) -> Vec<&[String]> {
        self.of_kind(ArgKind::Optional)
            .map(|def| def.flags.as_slice())
            .collect()
    }

    pub fn optional_dests(&self) -> Vec<&str> {
        self.of_kind(ArgKind::Optional)
            .map(|def| def.dest.as_str())
            .collect()
    }

    fn of_kind(&self, kind: ArgKind) -> impl Iterator<Item = &ArgDef> {
        self.args.iter().filter(move |def| def.kind == kind)
    }

    // ========================================================================
    // Declaration internals
    // ========================================================================

    /// Explicit settings merged over the type's spec. The spec's default is
    /// dropped for required arguments.
    fn merged_spec(&self, decl: &Decl) -> Result<ArgSpec, ConfigError> {
        let base = match (&decl.spec, &decl.arg_type) {
            (Some(spec), _) => spec.clone(),
            (None, Some(arg_type)) => match self.registry.resolve(arg_type) {
                Ok(spec) => spec,
                Err(_) if decl.converter.is_some() => ArgSpec::default(),
                Err(e) => return Err(e),
            },
            (None, None) => ArgSpec::default(),
        };
        let spec_default = if decl.required.unwrap_or(false) {
            None
        } else {
            base.default
        };
        Ok(ArgSpec {
            names: if decl.names.is_empty() {
                base.names
            } else {
                decl.names.clone()
            },
            default: decl.default.clone().or(spec_default),
            converter: decl.converter.clone().or(base.converter),
            post_process: decl.post_process.clone().or(base.post_process),
            choices: decl.choices.clone().or(base.choices),
            help: decl.help.clone().or(base.help),
            metavar: decl.metavar.clone().or(base.metavar),
            completer: decl.completer.clone().or(base.completer),
        })
    }

    fn positional(&mut self, decl: Decl) -> Result<String, ConfigError> {
        let spec = self.merged_spec(&decl)?;
        let name = spec.names.first().cloned();
        let dest = match (name, &decl.dest) {
            (Some(name), Some(dest)) if &name != dest && !decl.names.is_empty() => {
                return Err(ConfigError::NameDestConflict {
                    name,
                    dest: dest.clone(),
                })
            }
            (_, Some(dest)) => dest.clone(),
            (Some(name), None) => name,
            (None, None) => return Err(ConfigError::MissingName("positional")),
        };
        if !is_positional(&dest) {
            return Err(ConfigError::DashedPositional(dest));
        }

        let nargs = match (decl.nargs, spec.default.is_some()) {
            (None, true) => Some(Nargs::Optional),
            (Some(Nargs::Optional), true) | (_, false) => decl.nargs,
            (Some(nargs), true) => {
                return Err(ConfigError::InvalidNargs {
                    nargs: nargs.to_string(),
                    what: "a positional with a default value",
                })
            }
        };
        let required = !nargs.is_some_and(|n| n.allows_none());
        let action = decl.action.unwrap_or(Action::Store);
        let def = self.build_def(
            &decl,
            spec,
            dest,
            ArgKind::Positional,
            Vec::new(),
            action,
            nargs,
            required,
            false,
        )?;
        self.define(def)
    }

    fn optional(
        &mut self,
        decl: Decl,
        spec: ArgSpec,
        flags: Vec<String>,
        action: Action,
        strict_by_default: bool,
    ) -> Result<String, ConfigError> {
        let dest = match &decl.dest {
            Some(dest) => dest.clone(),
            None => dest_from_flags(&flags).ok_or(ConfigError::MissingName("optional"))?,
        };
        let required = decl.required.unwrap_or(false);
        let strict = decl.strict_default.unwrap_or(strict_by_default);
        let def = self.build_def(
            &decl,
            spec,
            dest,
            ArgKind::Optional,
            flags,
            action,
            decl.nargs,
            required,
            strict,
        )?;
        self.define(def)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_def(
        &self,
        decl: &Decl,
        spec: ArgSpec,
        dest: String,
        kind: ArgKind,
        flags: Vec<String>,
        action: Action,
        nargs: Option<Nargs>,
        required: bool,
        strict_default: bool,
    ) -> Result<ArgDef, ConfigError> {
        check_action(decl, kind, action, nargs)?;

        let converter = spec.converter.unwrap_or_else(Converter::string);
        // Value hints of the value type do not fit KEY=VALUE tokens.
        let completer = if action == Action::SetItem {
            decl.completer.clone()
        } else {
            spec.completer
        };
        let (key_converter, token_converter, metavar) = if action == Action::SetItem {
            let key_spec = match &decl.key_type {
                Some(key_type) => match self.registry.resolve(key_type) {
                    Ok(spec) => spec,
                    Err(_) if decl.key_converter.is_some() => ArgSpec::default(),
                    Err(e) => return Err(e),
                },
                None => ArgSpec::default(),
            };
            let key_converter = decl
                .key_converter
                .clone()
                .or(key_spec.converter)
                .unwrap_or_else(Converter::string);
            let metavar = decl.metavar.clone().unwrap_or_else(|| {
                let key = decl
                    .key_metavar
                    .as_deref()
                    .or(key_spec.metavar.as_deref())
                    .unwrap_or("KEY");
                let value = spec.metavar.as_deref().unwrap_or("VALUE");
                format!("{key}={value}")
            });
            let token = key_value_converter(key_converter.clone(), converter.clone());
            (key_converter, token, Some(metavar))
        } else {
            (Converter::string(), converter.clone(), spec.metavar)
        };

        Ok(ArgDef {
            dest,
            kind,
            flags,
            negated: None,
            action,
            nargs,
            converter,
            key_converter,
            token_converter,
            choices: spec.choices,
            completer,
            default: spec.default,
            const_value: decl.const_value.clone(),
            required,
            strict_default,
            post_process: spec.post_process,
            help: spec.help,
            metavar,
            hidden: decl.hidden,
            hyphen_values: decl.hyphen_values,
        })
    }

    /// Final checks, then hand the argument to clap.
    fn define(&mut self, def: ArgDef) -> Result<String, ConfigError> {
        let reserved = def.dest == "help"
            || (def.dest == "version" && self.command.get_version().is_some());
        if reserved || self.args.iter().any(|other| other.dest == def.dest) {
            return Err(ConfigError::DuplicateArgument(def.dest));
        }

        let mut claimed = HashSet::new();
        for flag in def.flags.iter().chain(def.negated.iter()) {
            if self.option_strings.contains(flag) || !claimed.insert(flag.clone()) {
                return Err(ConfigError::ConflictingOption(flag.clone()));
            }
        }

        if def.kind == ArgKind::Positional {
            self.check_positional_order(&def)?;
        }

        if let Some(default) = &def.default {
            default
                .build(&def.converter, &def.key_converter)
                .map_err(|source| ConfigError::InvalidDefault {
                    dest: def.dest.clone(),
                    source,
                })?;
        }

        let clap_args = def.clap_args()?;
        let mut command = std::mem::take(&mut self.command);
        for arg in clap_args {
            command = command.arg(arg);
        }
        self.command = command;
        self.option_strings.extend(claimed);

        tracing::debug!(
            dest = %def.dest,
            action = %def.action,
            strict_default = def.strict_default,
            "Registered argument"
        );
        let dest = def.dest.clone();
        self.args.push(def);
        Ok(dest)
    }

    /// clap places positionals by index: nothing may follow a variadic
    /// positional, and a required one may not follow an optional one.
    fn check_positional_order(&self, def: &ArgDef) -> Result<(), ConfigError> {
        for earlier in self.of_kind(ArgKind::Positional) {
            if earlier.is_variadic() {
                return Err(ConfigError::PositionalOrder {
                    name: def.dest.clone(),
                    after: format!("variadic positional '{}'", earlier.dest),
                });
            }
            if earlier.is_optional_positional() && !def.is_optional_positional() {
                return Err(ConfigError::PositionalOrder {
                    name: def.dest.clone(),
                    after: format!("optional positional '{}'", earlier.dest),
                });
            }
        }
        Ok(())
    }
}

fn fixed_flags(names: &[String]) -> Vec<String> {
    names.iter().map(|name| fix_flag(name)).collect()
}

fn invalid_value(cmd: &mut Command, def: &ArgDef, err: &ValueError) -> ParseError {
    cmd.error(
        ErrorKind::ValueValidation,
        format!("invalid value for '{}': {err}", def.display_name()),
    )
}

/// nargs of a list or dict adder: `+` unless given, never `?`.
fn collection_nargs(decl: &Decl, what: &'static str) -> Result<Nargs, ConfigError> {
    if decl.action.is_some() {
        return Err(ConfigError::IncompatibleOption {
            adder: what,
            option: "action",
        });
    }
    match decl.nargs.unwrap_or(Nargs::OneOrMore) {
        Nargs::Optional => Err(ConfigError::InvalidNargs {
            nargs: Nargs::Optional.to_string(),
            what,
        }),
        nargs => Ok(nargs),
    }
}

/// Options that make no sense for the action.
fn check_action(
    decl: &Decl,
    kind: ArgKind,
    action: Action,
    nargs: Option<Nargs>,
) -> Result<(), ConfigError> {
    if kind == ArgKind::Positional && !action.takes_values() {
        return Err(ConfigError::IncompatibleOption {
            adder: "positionals",
            option: "action",
        });
    }
    if !action.takes_values() {
        let has_type = decl.arg_type.is_some() || decl.converter.is_some() || decl.spec.is_some();
        for (set, option) in [
            (nargs.is_some(), "nargs"),
            (decl.choices.is_some(), "choices"),
            (has_type, "type"),
        ] {
            if set {
                return Err(ConfigError::IncompatibleOption {
                    adder: action.what(),
                    option,
                });
            }
        }
    }
    if nargs == Some(Nargs::Exactly(0)) {
        return Err(ConfigError::InvalidNargs {
            nargs: "0".to_string(),
            what: action.what(),
        });
    }
    if action.uses_const() && decl.const_value.is_none() {
        return Err(ConfigError::MissingConst(action.name()));
    }
    if decl.const_value.is_some() && !action.uses_const() && nargs != Some(Nargs::Optional) {
        return Err(ConfigError::IncompatibleOption {
            adder: action.what(),
            option: "const",
        });
    }
    if action == Action::SetItem && decl.choices.is_some() {
        return Err(ConfigError::IncompatibleOption {
            adder: "dicts",
            option: "choices",
        });
    }
    Ok(())
}
