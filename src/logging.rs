//! Tracing setup for programs built on this crate.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "info";

fn base_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn install(filter: EnvFilter) {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
}

/// Install the global subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    install(base_filter());
}

#[cfg(feature = "log-levels")]
pub use overrides::{add_log_levels_option, init_tracing_with, LogLevelOverrides};

#[cfg(feature = "log-levels")]
mod overrides {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::filter::Directive;

    use crate::error::{ConfigError, ValueError};
    use crate::parser::{ArgumentParser, Decl};
    use crate::spec::PostProcess;
    use crate::value::{AnyValue, ArgValue};

    /// Per-target levels from `-L/--log-levels`, in command-line order.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct LogLevelOverrides {
        levels: Vec<(String, LevelFilter)>,
    }

    impl LogLevelOverrides {
        pub fn new() -> Self {
            Self::default()
        }

        /// Set the level for `target`, replacing an earlier one.
        pub fn set(&mut self, target: impl Into<String>, level: LevelFilter) {
            let target = target.into();
            match self.levels.iter_mut().find(|(t, _)| *t == target) {
                Some(entry) => entry.1 = level,
                None => self.levels.push((target, level)),
            }
        }

        pub fn get(&self, target: &str) -> Option<LevelFilter> {
            self.levels
                .iter()
                .find(|(t, _)| t == target)
                .map(|(_, level)| *level)
        }

        pub fn iter(&self) -> impl Iterator<Item = (&str, LevelFilter)> {
            self.levels.iter().map(|(t, level)| (t.as_str(), *level))
        }

        pub fn is_empty(&self) -> bool {
            self.levels.is_empty()
        }

        /// `target=level` filter directives.
        pub fn directives(&self) -> Vec<String> {
            self.levels
                .iter()
                .map(|(target, level)| format!("{target}={}", level.to_string().to_lowercase()))
                .collect()
        }

        fn from_value(value: ArgValue) -> Result<Self, ValueError> {
            let mut overrides = Self::new();
            let ArgValue::Dict(dict) = value else {
                return Ok(overrides);
            };
            for (key, level) in dict.iter() {
                let target = key
                    .downcast_ref::<String>()
                    .ok_or_else(|| ValueError::new("log target must be a string"))?;
                let level = level
                    .downcast_ref::<LevelFilter>()
                    .ok_or_else(|| ValueError::new("expected a log level"))?;
                overrides.set(target.clone(), *level);
            }
            Ok(overrides)
        }
    }

    /// Add `-L/--log-levels TARGET=LEVEL` to `parser`; the parsed value is a
    /// [`LogLevelOverrides`] under dest `log_levels`.
    pub fn add_log_levels_option(parser: &mut ArgumentParser) -> Result<String, ConfigError> {
        parser.add_dict(
            Decl::new()
                .names(["L", "log-levels"])
                .with_type("log_level")
                .key_metavar("TARGET")
                .help("Log level per target, e.g. clap_gears=debug")
                .post_process(PostProcess::new(|value| {
                    LogLevelOverrides::from_value(value).map(|o| ArgValue::One(AnyValue::new(o)))
                })),
        )
    }

    /// [`super::init_tracing`] with per-target levels folded into the filter.
    pub fn init_tracing_with(overrides: &LogLevelOverrides) {
        let mut filter = super::base_filter();
        let mut rejected = Vec::new();
        for directive in overrides.directives() {
            match directive.parse::<Directive>() {
                Ok(parsed) => filter = filter.add_directive(parsed),
                Err(_) => rejected.push(directive),
            }
        }
        super::install(filter);

        for (target, level) in overrides.iter() {
            tracing::debug!(target_name = %target, level = %level, "Log level override");
        }
        for directive in rejected {
            tracing::warn!(%directive, "Ignoring invalid log level override");
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_option_yields_overrides() {
            let mut parser = ArgumentParser::new("demo");
            assert_eq!(add_log_levels_option(&mut parser).unwrap(), "log_levels");

            let args = parser
                .try_parse_from(["demo", "-L", "hyper=warn", "app=3", "--log-levels", "hyper=trace"])
                .unwrap();
            let overrides = args.one::<LogLevelOverrides>("log_levels").unwrap();
            assert_eq!(overrides.get("hyper"), Some(LevelFilter::TRACE));
            assert_eq!(overrides.get("app"), Some(LevelFilter::INFO));
            assert_eq!(
                overrides.directives(),
                vec!["hyper=trace".to_string(), "app=info".to_string()]
            );
        }

        #[test]
        fn test_absent_option_is_empty() {
            let mut parser = ArgumentParser::new("demo");
            add_log_levels_option(&mut parser).unwrap();
            let args = parser.try_parse_from(["demo"]).unwrap();
            assert!(args.one::<LogLevelOverrides>("log_levels").unwrap().is_empty());
        }

        #[test]
        fn test_bad_level_is_rejected() {
            let mut parser = ArgumentParser::new("demo");
            add_log_levels_option(&mut parser).unwrap();
            assert!(parser.try_parse_from(["demo", "-L", "app=loud"]).is_err());
        }
    }
}
