use serde::{Deserialize, Serialize};

/// Behaviour switches shared by every parser built with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Supplied list/dict values replace a non-empty default (default: true).
    pub strict_default: bool,
    /// Boolean flags get a hidden `--no-` twin (default: true).
    pub negative_flags: bool,
    /// `parse()` answers completion requests (default: true).
    pub auto_complete: bool,
    /// Environment variable holding the shell to complete for (default: "COMPLETE").
    pub complete_env: String,
    /// Help wrapping width; clap picks one when unset.
    pub term_width: Option<usize>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            strict_default: true,
            negative_flags: true,
            auto_complete: true,
            complete_env: default_complete_env(),
            term_width: None,
        }
    }
}

fn default_complete_env() -> String {
    "COMPLETE".to_string()
}
