//! Integration tests for Settings config loading.
//!
//! Precedence: compiled defaults, then the config file, then `KIFU2SGF_*`
//! environment variables. These tests pass an explicit config file so the
//! user's global config is never read.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use kifu2sgf::application::ApplicationError;
use kifu2sgf::config::{expand_env_vars, Settings};

#[test]
fn given_config_file_when_load_then_file_values_override_defaults() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("kifu2sgf.toml");
    fs::write(
        &path,
        r#"
output_extension = "SGF"
overwrite = true

[encodings]
UGF = "cp932"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.output_extension, "SGF");
    assert!(settings.overwrite);
    assert!(settings.output_dir.is_none());
    assert_eq!(settings.encoding_override("ugf"), Some("cp932"));
}

#[test]
fn given_partial_config_when_load_then_missing_keys_keep_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("kifu2sgf.toml");
    fs::write(&path, "overwrite = true\n").unwrap();

    let settings = Settings::load(Some(&path)).unwrap();

    assert_eq!(settings.output_extension, "sgf");
    assert!(settings.encodings.is_empty());
}

#[test]
fn given_output_dir_with_tilde_when_load_then_expanded() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("kifu2sgf.toml");
    fs::write(&path, "output_dir = \"~/sgf\"\n").unwrap();

    let settings = Settings::load(Some(&path)).unwrap();

    let expected = PathBuf::from(expand_env_vars("~/sgf"));
    assert_eq!(settings.output_dir, Some(expected));
    assert!(!settings.output_dir.unwrap().to_string_lossy().starts_with('~'));
}

#[test]
fn given_missing_explicit_config_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();

    let result = Settings::load(Some(&temp.path().join("absent.toml")));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("kifu2sgf.toml");
    fs::write(&path, "overwrite = \"maybe\n").unwrap();

    let result = Settings::load(Some(&path));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_template_when_written_and_loaded_then_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("kifu2sgf.toml");
    fs::write(&path, Settings::template()).unwrap();

    let settings = Settings::load(Some(&path)).unwrap();

    assert_eq!(settings, Settings::default());
}
