//! Built-in argument types.
//!
//! Every built-in is registered under its Rust type and under one or more
//! string aliases:
//!
//! | alias | type |
//! |---|---|
//! | `date` | [`chrono::NaiveDate`] |
//! | `datetime` | [`chrono::NaiveDateTime`] |
//! | `path` | [`std::path::PathBuf`] |
//! | `ipaddress`, `ip` | [`std::net::IpAddr`] |
//! | `regex` | [`regex::Regex`] |
//! | `range` | [`ArgRange`] |
//! | `log_level` | [`tracing::level_filters::LevelFilter`] |
//! | `literal` | [`Literal`] |
//! | `outfile`, `infile` | [`LazyFile`] in write / read mode |

mod datetime;
mod file;
mod file_input;
mod literal;
mod log_level;
mod range;

pub use datetime::{parse_date, parse_datetime, DATE_FORMAT};
pub use file::{lazy_file, FileMode, LazyFile, STDIO_PATH};
pub use file_input::{file_input, FileInput};
pub use literal::Literal;
pub use log_level::parse_log_level;
pub use range::{ArgRange, RangeIter};

use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueHint;
use regex::Regex;
use tracing::level_filters::LevelFilter;

use crate::error::ValueError;
use crate::spec::{ArgSpec, Completer, Converter, SpecRegistry};
use crate::value::AnyValue;

/// Converter whose values are labelled with the token they came from.
fn labelled<T, E, F>(func: F) -> Converter
where
    F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    T: fmt::Debug + PartialEq + Send + Sync + 'static,
    E: fmt::Display,
{
    Converter::new(move |token| {
        func(token)
            .map(|value| AnyValue::new(value).with_label(token))
            .map_err(|e| ValueError::new(e.to_string()))
    })
}

pub(crate) fn register_builtins(registry: &mut SpecRegistry) {
    registry.register_with_aliases::<NaiveDate>(
        &["date"],
        ArgSpec::new(labelled(parse_date))
            .names(["date", "d"])
            .metavar("DATE")
            .help("a date (YYYY-MM-DD)"),
    );

    registry.register_with_aliases::<NaiveDateTime>(
        &["datetime"],
        ArgSpec::new(labelled(parse_datetime))
            .names(["timestamp", "t"])
            .metavar("TIMESTAMP")
            .help("a timestamp (YYYY-MM-DDTHH:MM:SS[.micros][Z])"),
    );

    registry.register_with_aliases::<PathBuf>(
        &["path"],
        ArgSpec::new(labelled(|token: &str| token.parse::<PathBuf>()))
            .names(["path"])
            .metavar("PATH")
            .completer(Completer::Hint(ValueHint::AnyPath)),
    );

    registry.register_with_aliases::<IpAddr>(
        &["ipaddress", "ip"],
        ArgSpec::new(labelled(|token: &str| {
            token
                .parse::<IpAddr>()
                .map_err(|e| format!("invalid IP address '{token}': {e}"))
        }))
        .names(["ip"])
        .metavar("IP"),
    );

    registry.register_with_aliases::<Regex>(
        &["regex"],
        ArgSpec::new(Converter::new(|token| {
            Regex::new(token)
                .map(|re| AnyValue::opaque(re).with_label(token))
                .map_err(|e| ValueError::new(e.to_string()))
        }))
        .names(["regex"])
        .metavar("REGEX"),
    );

    registry.register_with_aliases::<ArgRange>(
        &["range"],
        ArgSpec::new(labelled(|token: &str| token.parse::<ArgRange>()))
            .metavar("RANGE")
            .help("a range (STOP, START:STOP or START:STOP:STEP)"),
    );

    registry.register_with_aliases::<LevelFilter>(
        &["log_level"],
        ArgSpec::new(labelled(parse_log_level))
            .names(["log-level", "L"])
            .metavar("LEVEL")
            .completer(Completer::Candidates(
                ["off", "error", "warn", "info", "debug", "trace"]
                    .map(String::from)
                    .to_vec(),
            )),
    );

    registry.register_with_aliases::<Literal>(
        &["literal"],
        ArgSpec::new(labelled(|token: &str| token.parse::<Literal>())).metavar("LITERAL"),
    );

    registry.register_with_aliases::<LazyFile>(&["outfile"], lazy_file(FileMode::WRITE));
    registry.register("infile", lazy_file(FileMode::READ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ArgType, TypeKey};

    fn convert(registry: &SpecRegistry, alias: &str, token: &str) -> Result<AnyValue, ValueError> {
        let spec = registry.resolve(&ArgType::alias(alias)).unwrap();
        spec.converter.unwrap().convert(token)
    }

    #[test]
    fn test_type_and_alias_share_spec() {
        let registry = SpecRegistry::new();
        let by_type = registry.get(&TypeKey::of::<NaiveDate>()).unwrap();
        let by_alias = registry.get(&TypeKey::alias("date")).unwrap();
        assert_eq!(by_type.names, by_alias.names);
        assert_eq!(by_alias.names, vec!["date".to_string(), "d".to_string()]);
    }

    #[test]
    fn test_builtin_conversions() {
        let registry = SpecRegistry::new();
        let ip = convert(&registry, "ip", "127.0.0.1").unwrap();
        assert_eq!(ip.downcast_ref::<IpAddr>().unwrap().to_string(), "127.0.0.1");
        assert!(convert(&registry, "ipaddress", "300.0.0.1").is_err());

        let re = convert(&registry, "regex", "^a+$").unwrap();
        assert!(re.downcast_ref::<Regex>().unwrap().is_match("aaa"));
        assert!(convert(&registry, "regex", "(").is_err());

        let level = convert(&registry, "log_level", "Info").unwrap();
        assert_eq!(level.downcast_ref::<LevelFilter>(), Some(&LevelFilter::INFO));

        let range = convert(&registry, "range", "0:100:10").unwrap();
        assert_eq!(range.label(), Some("0:100:10"));
        assert!(convert(&registry, "range", "1:2:3:4").is_err());
    }

    #[test]
    fn test_infile_and_outfile_modes() {
        let registry = SpecRegistry::new();
        let out = convert(&registry, "outfile", "-").unwrap();
        assert_eq!(out.downcast_ref::<LazyFile>().unwrap().mode(), FileMode::WRITE);
        let input = convert(&registry, "infile", "-").unwrap();
        assert_eq!(input.downcast_ref::<LazyFile>().unwrap().mode(), FileMode::READ);
    }
}
