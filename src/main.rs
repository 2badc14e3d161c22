//! `clap-gears`: build a parser holding a single argument described on the
//! command line, then parse the remaining tokens with it.
//!
//! ```text
//! clap-gears list dates --type date -- --dates 2020-03-03 2022-04-08
//! clap-gears list foo --default "['aa', 'bb']" --no-strict-default -- --foo cc
//! clap-gears argument --foo --action append --default "['aa', 'bb']" -- --foo cc
//! ```

use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ValueEnum;

use clap_gears::logging::init_tracing;
use clap_gears::types::Literal;
use clap_gears::{
    Action, ArgType, ArgValue, ArgumentParser, Decl, DefaultValue, Nargs, ParsedArgs,
    ParserSettings,
};

/// Which adder declares the argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ArgForm {
    Positional,
    Optional,
    Flag,
    List,
    Dict,
    Argument,
}

impl ArgForm {
    fn names() -> impl Iterator<Item = String> {
        Self::value_variants()
            .iter()
            .filter_map(|form| form.to_possible_value())
            .map(|pv| pv.get_name().to_string())
    }
}

/// Forms are spelled in lowercase on the command line.
impl FromStr for ArgForm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, false)
    }
}

fn meta_parser(settings: &ParserSettings) -> Result<ArgumentParser> {
    let mut parser = ArgumentParser::with_settings(env!("CARGO_PKG_NAME"), settings.clone())
        .about("Declare a single argument and parse the tokens after -- with it")
        .version(env!("CARGO_PKG_VERSION"));

    parser.add_positional(
        Decl::from("form")
            .typed::<ArgForm>()
            .choices(ArgForm::names())
            .metavar("FORM"),
    )?;
    parser.add_positional(
        Decl::from("name")
            .allow_hyphen_values()
            .help("argument name or option string"),
    )?;
    parser.add_optional(Decl::from("nargs").typed::<Nargs>().metavar("NARGS"))?;
    parser.add_optional(
        Decl::from("default")
            .with_type("literal")
            .help("default value, e.g. \"['aa', 'bb']\""),
    )?;
    parser.add_optional(Decl::from("type").metavar("TYPE").help("value type or alias"))?;
    parser.add_optional(Decl::from("key-type").metavar("TYPE").help("key type of a dict"))?;
    parser.add_optional(Decl::from("arghelp").dest("arg_help").help("help text of the argument"))?;
    parser.add_optional("metavar")?;
    parser.add_optional("dest")?;
    parser.add_optional(Decl::from("action").typed::<Action>())?;
    parser.add_optional(Decl::from("const").with_type("literal"))?;
    parser.add_list(Decl::from("choices").help("allowed tokens"))?;
    parser.add_flag(Decl::from("required").negative_flag(false))?;
    parser.add_flag(Decl::from("strict-default").negative_flag(false))?;
    parser.add_flag(Decl::from("no-strict-default").negative_flag(false))?;
    parser.add_positional(
        Decl::from("args")
            .nargs(Nargs::ZeroOrMore)
            .metavar("ARGS")
            .help("tokens for the generated parser (after --)"),
    )?;
    Ok(parser)
}

/// Type names understood by `--type`; anything else is a registry alias.
fn arg_type(name: &str) -> ArgType {
    match name {
        "int" | "i64" => ArgType::of::<i64>(),
        "float" | "f64" => ArgType::of::<f64>(),
        "str" | "string" => ArgType::of::<String>(),
        "bool" => ArgType::of::<bool>(),
        "char" => ArgType::of::<char>(),
        "pathbuf" => ArgType::of::<PathBuf>(),
        alias => ArgType::alias(alias),
    }
}

/// Textual tokens of a literal, converted by the argument's own type.
fn token(literal: &Literal) -> String {
    match literal {
        Literal::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

fn literal_default(literal: &Literal) -> DefaultValue {
    match literal {
        Literal::List(items) | Literal::Tuple(items) | Literal::Set(items) => {
            DefaultValue::RawList(items.iter().map(token).collect())
        }
        Literal::Dict(pairs) => {
            DefaultValue::RawDict(pairs.iter().map(|(k, v)| (token(k), token(v))).collect())
        }
        scalar => DefaultValue::Raw(token(scalar)),
    }
}

fn target_decl(meta: &ParsedArgs) -> Result<Decl> {
    let name = meta.one::<String>("name")?;
    let mut decl = Decl::from(name.as_str());

    if let Some(dest) = meta.get::<String>("dest")? {
        decl = decl.dest(dest.clone());
    }
    if let Some(nargs) = meta.get::<Nargs>("nargs")? {
        decl = decl.nargs(*nargs);
    }
    if let Some(default) = meta.get::<Literal>("default")? {
        decl = decl.default_value(literal_default(default));
    }
    if let Some(name) = meta.get::<String>("type")? {
        decl = decl.with_type(arg_type(name));
    }
    if let Some(name) = meta.get::<String>("key_type")? {
        decl = decl.key_type(arg_type(name));
    }
    if let Some(help) = meta.get::<String>("arg_help")? {
        decl = decl.help(help.clone());
    }
    if let Some(metavar) = meta.get::<String>("metavar")? {
        decl = decl.metavar(metavar.clone());
    }
    if let Some(action) = meta.get::<Action>("action")? {
        decl = decl.action(*action);
    }
    if let Some(value) = meta.get::<Literal>("const")? {
        decl = decl.const_value(value.clone());
    }
    let choices = meta.get_list::<String>("choices")?;
    if !choices.is_empty() {
        decl = decl.choices(choices);
    }
    if meta.get_flag("required")? {
        decl = decl.required(true);
    }
    if meta.get_flag("strict_default")? {
        decl = decl.strict_default(true);
    } else if meta.get_flag("no_strict_default")? {
        decl = decl.strict_default(false);
    }
    Ok(decl)
}

fn declare(parser: &mut ArgumentParser, form: ArgForm, decl: Decl) -> Result<String> {
    let dest = match form {
        ArgForm::Positional => parser.add_positional(decl),
        ArgForm::Optional => parser.add_optional(decl),
        ArgForm::Flag => parser.add_flag(decl),
        ArgForm::List => parser.add_list(decl),
        ArgForm::Dict => parser.add_dict(decl),
        ArgForm::Argument => parser.add_argument(decl),
    }
    .with_context(|| format!("declaring {form:?} argument"))?;
    Ok(dest)
}

fn render(value: &ArgValue) -> String {
    match value {
        ArgValue::Missing => "None".to_string(),
        ArgValue::One(v) => format!("{v:?}"),
        ArgValue::List(items) => format!(
            "[{}]",
            items.iter().map(render).collect::<Vec<_>>().join(", ")
        ),
        ArgValue::Dict(dict) => format!(
            "{{{}}}",
            dict.iter()
                .map(|(k, v)| format!("{k:?}: {v:?}"))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn main() -> Result<()> {
    init_tracing();

    let settings = ParserSettings::load().context("loading parser settings")?;
    let meta = meta_parser(&settings)?.parse();

    let form = *meta.one::<ArgForm>("form")?;
    let tokens = meta.get_list::<String>("args")?;

    let mut target = ArgumentParser::with_settings("target", settings)
        .about("Parser generated from the clap-gears command line");
    let dest = declare(&mut target, form, target_decl(&meta)?)?;
    tracing::debug!(%dest, form = ?form, "Declared target argument");

    let program = OsString::from(target.command().get_name());
    let args = target.parse_from(std::iter::once(program).chain(tokens.into_iter().map(OsString::from)));

    println!("# ARGS: {:?}", meta.get_list::<String>("args")?);
    for (dest, value) in args.iter() {
        println!("{dest} = {}", render(value));
    }
    Ok(())
}
