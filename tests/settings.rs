//! Tests for loading parser settings.

mod common;

use clap_gears::{ArgumentParser, Decl, ParserSettings, SettingsError};
use common::{parse, parse_err, temp_settings};
use tempfile::TempDir;

/// Test that a missing file gives the defaults.
#[test]
fn test_missing_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let settings = ParserSettings::load_from(&temp_dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings, ParserSettings::default());
    assert!(settings.strict_default);
    assert!(settings.negative_flags);
    assert!(settings.auto_complete);
    assert_eq!(settings.complete_env, "COMPLETE");
    assert_eq!(settings.term_width, None);
}

/// Test that unset keys keep their defaults.
#[test]
fn test_partial_file() {
    let (_dir, path) = temp_settings("negative_flags = false\nterm_width = 100\n");
    let settings = ParserSettings::load_from(&path).unwrap();
    assert!(!settings.negative_flags);
    assert_eq!(settings.term_width, Some(100));
    assert!(settings.strict_default);
    assert_eq!(settings.complete_env, "COMPLETE");
}

/// Test that malformed TOML is reported with its path.
#[test]
fn test_invalid_toml() {
    let (_dir, path) = temp_settings("strict_default = maybe");
    let err = ParserSettings::load_from(&path).unwrap_err();
    assert!(matches!(err, SettingsError::ParseError { .. }));
    assert!(err.to_string().contains("settings.toml"));
}

/// Test that values failing validation are rejected.
#[test]
fn test_validation() {
    let (_dir, path) = temp_settings("complete_env = \"NOT VALID\"");
    assert!(matches!(
        ParserSettings::load_from(&path),
        Err(SettingsError::ValidationError { .. })
    ));

    let (_dir, path) = temp_settings("term_width = 5");
    let err = ParserSettings::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("too narrow"));
}

/// Test that loaded settings drive the parser.
#[test]
fn test_loaded_settings_apply() {
    let (_dir, path) = temp_settings("negative_flags = false\nstrict_default = false\n");
    let settings = ParserSettings::load_from(&path).unwrap();

    let mut p = ArgumentParser::with_settings("test", settings);
    p.add_flag("verbose").unwrap();
    p.add_list(Decl::from("tag").default_list(["base"])).unwrap();

    parse_err(&p, "--no-verbose");
    assert_eq!(
        parse(&p, "--tag extra").get_list::<String>("tag").unwrap(),
        vec!["base".to_string(), "extra".to_string()]
    );
    assert!(!p.settings().negative_flags);
}
