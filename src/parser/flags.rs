//! Option-string handling: prefixes, dests and negative flags.
//!
//! Pure functions over strings; the parser decides what to do with them.

use crate::error::ConfigError;

/// An option string split into the parts clap registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Flag {
    Short(char),
    Long(String),
}

impl Flag {
    /// Parse `-x` or `--name`.
    pub(crate) fn parse(flag: &str) -> Result<Flag, ConfigError> {
        if let Some(long) = flag.strip_prefix("--") {
            if long.is_empty() || long.starts_with('-') || long.contains('=') {
                return Err(ConfigError::InvalidFlag(flag.to_string()));
            }
            return Ok(Flag::Long(long.to_string()));
        }
        let mut chars = flag.strip_prefix('-').unwrap_or_default().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c != '-' => Ok(Flag::Short(c)),
            _ => Err(ConfigError::InvalidFlag(flag.to_string())),
        }
    }
}

/// Whether a name is a positional name (no leading dash).
pub(crate) fn is_positional(name: &str) -> bool {
    !name.starts_with('-')
}

/// Add the missing prefix: `x` becomes `-x`, `xx` becomes `--xx`.
pub(crate) fn fix_flag(flag: &str) -> String {
    if flag.is_empty() || flag.starts_with('-') {
        flag.to_string()
    } else if flag.chars().count() == 1 {
        format!("-{flag}")
    } else {
        format!("--{flag}")
    }
}

/// Dest derived from option strings: the first long flag with dashes turned
/// into underscores, else the first short flag.
pub(crate) fn dest_from_flags(flags: &[String]) -> Option<String> {
    let chosen = flags
        .iter()
        .find(|f| f.starts_with("--"))
        .or_else(|| flags.first())?;
    let dest = chosen.trim_start_matches('-').replace('-', "_");
    (!dest.is_empty()).then_some(dest)
}

/// The hidden negation of a boolean flag: `--foo` gives `--no-foo`, and
/// with only short flags `-f` gives `--no-f`.
pub(crate) fn negative_flag(flags: &[String]) -> Option<String> {
    let chosen = flags
        .iter()
        .find(|f| f.starts_with("--"))
        .or_else(|| flags.first())?;
    Some(format!("--no-{}", chosen.trim_start_matches('-')))
}
