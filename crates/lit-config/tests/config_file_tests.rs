//! Config file loading and validation tests

use lit_config::{ConfigError, ConfigFile, FormatSpec};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_config_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let config_path = dir.join(name);
    fs::write(&config_path, content).unwrap();
    config_path
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_suite_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(
        temp_dir.path(),
        "lit.toml",
        r#"
name = "root"
suffixes = [".txt"]

[format]
kind = "suffix"
"#,
    );

    let config = ConfigFile::load_from_file(&path).unwrap();

    assert_eq!(config.name.as_deref(), Some("root"));
    assert_eq!(config.suffixes, Some(vec![".txt".to_string()]));
    assert_eq!(config.format, Some(FormatSpec::Suffix));
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result = ConfigFile::load_from_file(&temp_dir.path().join("lit.toml"));

    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_load_local_config_with_only_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(
        temp_dir.path(),
        "lit.local.toml",
        r#"
extra_excludes = ["big-inputs"]
unsupported = true
"#,
    );

    let config = ConfigFile::load_from_file(&path).unwrap();

    assert_eq!(config.name, None);
    assert_eq!(config.excludes, None);
    assert_eq!(config.extra_excludes, vec!["big-inputs".to_string()]);
    assert_eq!(config.unsupported, Some(true));
}

#[test]
fn test_format_none_clears() {
    let config = ConfigFile::parse("[format]\nkind = \"none\"\n", Path::new("lit.local.toml"))
        .unwrap();
    assert_eq!(config.format, Some(FormatSpec::None));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_syntax_error_names_file() {
    let err = ConfigFile::parse("name = ", Path::new("/suite/lit.toml")).unwrap_err();

    match err {
        ConfigError::TomlParseError { file, .. } => {
            assert_eq!(file, PathBuf::from("/suite/lit.toml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_key_is_rejected() {
    let result = ConfigFile::parse("test_format = \"sh\"\n", Path::new("lit.toml"));
    assert!(matches!(result, Err(ConfigError::TomlParseError { .. })));
}

#[test]
fn test_unknown_format_kind_is_rejected() {
    let result = ConfigFile::parse("[format]\nkind = \"gtest\"\n", Path::new("lit.toml"));
    assert!(matches!(result, Err(ConfigError::TomlParseError { .. })));
}

#[rstest]
#[case::empty_name("name = \"  \"", "name")]
#[case::empty_suffix("suffixes = [\"\"]", "suffixes")]
#[case::nested_exclude("excludes = [\"a/b\"]", "excludes")]
#[case::dotdot_extra_exclude("extra_excludes = [\"..\"]", "extra_excludes")]
#[case::bad_env_key("[environment]\n\"A=B\" = \"1\"", "environment")]
#[case::empty_load("load = \"\"", "load")]
#[case::empty_format_suffix(
    "[format]\nkind = \"executable\"\nsuffixes = [\"\"]",
    "format.suffixes"
)]
fn test_invalid_values(#[case] content: &str, #[case] expected_field: &str) {
    let err = ConfigFile::parse(content, Path::new("lit.toml")).unwrap_err();

    match err {
        ConfigError::InvalidValue { field, .. } => assert_eq!(field, expected_field),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_error_display_includes_reason() {
    let err = ConfigFile::parse("excludes = [\"a/b\"]", Path::new("lit.toml")).unwrap_err();
    let message = err.to_string();

    assert!(message.contains("excludes"));
    assert!(message.contains("lit.toml"));
    assert!(message.contains("plain file or directory name"));
}
