//! Tests for ConversionService against real temp directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use encoding_rs::{EUC_KR, SHIFT_JIS};
use tempfile::TempDir;

use kifu2sgf::application::services::ConversionService;
use kifu2sgf::application::ApplicationError;
use kifu2sgf::config::Settings;
use kifu2sgf::infrastructure::traits::RealFileSystem;
use kifu2sgf::util::testing::{init_test_setup, records_dir};

fn service(settings: Settings) -> ConversionService {
    init_test_setup();
    ConversionService::new(Arc::new(RealFileSystem), Arc::new(settings))
}

/// Copy a fixture into `dir`, returning its new path.
fn copy_fixture(dir: &Path, name: &str) -> PathBuf {
    let target = dir.join(name);
    fs::copy(records_dir().join(name), &target).unwrap();
    target
}

// ============================================================
// convert_file() tests
// ============================================================

#[test]
fn given_record_when_convert_file_then_writes_sibling_sgf() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let input = copy_fixture(temp.path(), "handicap.gib");
    let service = service(Settings::default());

    // Act
    let output = service.convert_file(&input).unwrap();

    // Assert
    assert_eq!(output, temp.path().join("handicap.sgf"));
    let sgf = fs::read_to_string(&output).unwrap();
    assert!(sgf.starts_with("(;FF[4]GM[1]CA[UTF-8]AP["));
    assert!(sgf.contains("HA[2]"));
    assert!(sgf.contains("AB[pd][dp]"));
    assert!(sgf.ends_with(";W[pp];B[cc])\n"));
}

#[test]
fn given_existing_output_when_convert_file_then_refuses_to_overwrite() {
    let temp = TempDir::new().unwrap();
    let input = copy_fixture(temp.path(), "even.ugf");
    let existing = temp.path().join("even.sgf");
    fs::write(&existing, "keep me").unwrap();
    let service = service(Settings::default());

    let result = service.convert_file(&input);

    assert!(matches!(result, Err(ApplicationError::OutputExists(p)) if p == existing));
    assert_eq!(fs::read_to_string(&existing).unwrap(), "keep me");
}

#[test]
fn given_overwrite_enabled_when_convert_file_then_replaces_output() {
    let temp = TempDir::new().unwrap();
    let input = copy_fixture(temp.path(), "even.ugf");
    let existing = temp.path().join("even.sgf");
    fs::write(&existing, "stale").unwrap();
    let service = service(Settings {
        overwrite: true,
        ..Settings::default()
    });

    service.convert_file(&input).unwrap();

    assert!(fs::read_to_string(&existing).unwrap().contains(";B[ee];W[cc];B[]"));
}

#[test]
fn given_output_dir_and_extension_when_convert_file_then_writes_there() {
    let temp = TempDir::new().unwrap();
    let input = copy_fixture(temp.path(), "handicap.ngf");
    let out_dir = temp.path().join("out/nested");
    let service = service(Settings {
        output_dir: Some(out_dir.clone()),
        output_extension: "txt".into(),
        ..Settings::default()
    });

    let output = service.convert_file(&input).unwrap();

    assert_eq!(output, out_dir.join("handicap.txt"));
    assert!(output.exists());
}

#[test]
fn given_unknown_extension_when_convert_file_then_unknown_format() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("notes.txt");
    fs::write(&input, "hello").unwrap();
    let service = service(Settings::default());

    let result = service.convert_file(&input);

    assert!(matches!(result, Err(ApplicationError::UnknownFormat(_))));
    assert!(!temp.path().join("notes.sgf").exists());
}

#[test]
fn given_unparsable_record_when_convert_file_then_no_output_written() {
    let temp = TempDir::new().unwrap();
    let input = copy_fixture(temp.path(), "broken.ngf");
    let service = service(Settings::default());

    let result = service.convert_file(&input);

    assert!(matches!(result, Err(ApplicationError::Domain(_))));
    assert!(!temp.path().join("broken.sgf").exists());
}

#[test]
fn given_uppercase_extension_when_convert_file_then_detected() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("GAME.UGI");
    fs::copy(records_dir().join("handicap.ugi"), &input).unwrap();
    let service = service(Settings::default());

    let output = service.convert_file(&input).unwrap();

    assert_eq!(output, temp.path().join("GAME.sgf"));
}

// ============================================================
// Legacy encodings
// ============================================================

#[test]
fn given_euc_kr_gib_when_converted_then_names_are_decoded() {
    let temp = TempDir::new().unwrap();
    let text = "\\[GAMEBLACKNAME=이세돌 (9D)\\]\n\\[GAMEWHITENAME=조훈현 (9D)\\]\nSTO 0 1 1 15 3\n";
    let (bytes, _, had_errors) = EUC_KR.encode(text);
    assert!(!had_errors);
    let input = temp.path().join("korean.gib");
    fs::write(&input, &bytes).unwrap();
    let service = service(Settings::default());

    let sgf = service.render(&input).unwrap();

    assert!(sgf.contains("PB[이세돌]BR[9D]"));
    assert!(sgf.contains("PW[조훈현]WR[9D]"));
}

#[test]
fn given_shift_jis_ugf_when_converted_then_names_are_decoded() {
    let temp = TempDir::new().unwrap();
    let text = "[Header]\nSize=19\nHdcp=0,6.5\nPlayerB=井山裕太,9p\nPlayerW=趙治勲,9p\n[Data]\nPD,B1,1,0\n";
    let (bytes, _, had_errors) = SHIFT_JIS.encode(text);
    assert!(!had_errors);
    let input = temp.path().join("japanese.ugf");
    fs::write(&input, &bytes).unwrap();
    let service = service(Settings::default());

    let tree = service.load_tree(&input).unwrap();

    assert_eq!(tree.first(tree.root(), "PB"), Some("井山裕太"));
    assert_eq!(tree.first(tree.root(), "PW"), Some("趙治勲"));
}

#[test]
fn given_encoding_override_when_converted_then_override_is_used() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("unicode.gib");
    fs::write(&input, "\\[GAMEBLACKNAME=Ünal (2k)\\]\nSTO 0 1 1 3 3\n").unwrap();
    let mut settings = Settings::default();
    settings.encodings.insert("gib".into(), "utf-8".into());
    let service = service(settings);

    let sgf = service.render(&input).unwrap();

    assert!(sgf.contains("PB[Ünal]"));
}

#[test]
fn given_unknown_encoding_label_when_converted_then_error() {
    let temp = TempDir::new().unwrap();
    let input = copy_fixture(temp.path(), "handicap.gib");
    let mut settings = Settings::default();
    settings.encodings.insert("gib".into(), "klingon".into());
    let service = service(settings);

    let result = service.render(&input);

    assert!(matches!(result, Err(ApplicationError::UnknownEncoding { .. })));
}

// ============================================================
// convert_all() tests
// ============================================================

#[test]
fn given_directory_when_convert_all_then_converts_only_recognized_records() {
    let temp = TempDir::new().unwrap();
    let records = temp.path().join("records");
    fs::create_dir_all(records.join("deeper")).unwrap();
    copy_fixture(&records, "handicap.gib");
    copy_fixture(&records.join("deeper"), "even.ugf");
    fs::write(records.join("README.md"), "not a record").unwrap();
    let service = service(Settings::default());

    let outcomes = service.convert_all(&[records.clone()]);

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.is_ok()));
    assert!(records.join("handicap.sgf").exists());
    assert!(records.join("deeper/even.sgf").exists());
}

#[test]
fn given_failing_file_when_convert_all_then_others_still_convert_in_order() {
    let temp = TempDir::new().unwrap();
    let broken = copy_fixture(temp.path(), "broken.ngf");
    let good = copy_fixture(temp.path(), "handicap.ngf");
    let unknown = temp.path().join("notes.txt");
    fs::write(&unknown, "hello").unwrap();
    let service = service(Settings::default());

    let outcomes = service.convert_all(&[broken.clone(), unknown.clone(), good.clone()]);

    let inputs: Vec<&Path> = outcomes.iter().map(|o| o.input.as_path()).collect();
    assert_eq!(inputs, vec![broken.as_path(), unknown.as_path(), good.as_path()]);
    assert!(!outcomes[0].is_ok());
    assert!(matches!(
        outcomes[1].result,
        Err(ApplicationError::UnknownFormat(_))
    ));
    assert!(outcomes[2].is_ok());
    assert!(temp.path().join("handicap.sgf").exists());
}
