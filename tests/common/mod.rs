//! Shared test utilities.

#![allow(dead_code, unused_imports)]

use std::path::PathBuf;

use clap_gears::{ArgumentParser, ParseError, ParsedArgs, ParserSettings};
use tempfile::TempDir;

/// A parser named `test` with default settings.
pub fn parser() -> ArgumentParser {
    ArgumentParser::new("test")
}

/// A parser named `test` with negative flags turned off.
pub fn plain_parser() -> ArgumentParser {
    let settings = ParserSettings {
        negative_flags: false,
        ..ParserSettings::default()
    };
    ArgumentParser::with_settings("test", settings)
}

fn tokens(line: &str) -> Vec<String> {
    std::iter::once("test".to_string())
        .chain(line.split_whitespace().map(String::from))
        .collect()
}

/// Parse a whitespace-separated command line.
pub fn parse(parser: &ArgumentParser, line: &str) -> ParsedArgs {
    parser
        .try_parse_from(tokens(line))
        .unwrap_or_else(|e| panic!("failed to parse '{line}': {e}"))
}

/// Parse a command line that must be rejected.
pub fn parse_err(parser: &ArgumentParser, line: &str) -> ParseError {
    match parser.try_parse_from(tokens(line)) {
        Ok(args) => panic!("'{line}' should have been rejected, got {args:?}"),
        Err(e) => e,
    }
}

/// Write a settings file into a fresh temp dir.
pub fn temp_settings(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("settings.toml");
    std::fs::write(&path, content).expect("Failed to write settings");
    (temp_dir, path)
}
