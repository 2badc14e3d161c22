//! Log levels for `tracing` filters.

use tracing::level_filters::LevelFilter;

use crate::error::ValueError;

/// Levels indexed by their numeric form: 0 = off ... 5 = trace.
const LEVELS: [LevelFilter; 6] = [
    LevelFilter::OFF,
    LevelFilter::ERROR,
    LevelFilter::WARN,
    LevelFilter::INFO,
    LevelFilter::DEBUG,
    LevelFilter::TRACE,
];

/// Parse a level name (any case; `warning`, `critical` and `fatal` are
/// accepted as aliases) or a number from 0 (off) to 5 (trace).
pub fn parse_log_level(s: &str) -> Result<LevelFilter, ValueError> {
    let token = s.trim();
    if let Ok(n) = token.parse::<usize>() {
        return LEVELS
            .get(n)
            .copied()
            .ok_or_else(|| ValueError::new(format!("invalid log level '{s}': expected 0-5")));
    }
    let level = match token.to_ascii_lowercase().as_str() {
        "off" | "none" => LevelFilter::OFF,
        "error" | "critical" | "fatal" => LevelFilter::ERROR,
        "warn" | "warning" => LevelFilter::WARN,
        "info" => LevelFilter::INFO,
        "debug" => LevelFilter::DEBUG,
        "trace" => LevelFilter::TRACE,
        _ => {
            return Err(ValueError::invalid_choice(
                s,
                ["off", "error", "warn", "info", "debug", "trace"],
            ))
        }
    };
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_aliases() {
        assert_eq!(parse_log_level("debug").unwrap(), LevelFilter::DEBUG);
        assert_eq!(parse_log_level("WARNING").unwrap(), LevelFilter::WARN);
        assert_eq!(parse_log_level("critical").unwrap(), LevelFilter::ERROR);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_log_level("0").unwrap(), LevelFilter::OFF);
        assert_eq!(parse_log_level("5").unwrap(), LevelFilter::TRACE);
        assert!(parse_log_level("6").is_err());
    }

    #[test]
    fn test_unknown_lists_choices() {
        let err = parse_log_level("loud").unwrap_err();
        assert!(err.choices().contains(&"trace".to_string()));
    }
}
