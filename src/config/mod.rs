//! Parser settings loaded from disk.

mod loader;
mod types;

pub use loader::SettingsError;
pub use types::ParserSettings;
