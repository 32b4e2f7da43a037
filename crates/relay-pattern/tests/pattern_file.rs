//! Integration tests for loading pattern files from disk.

use relay_pattern::{PatternError, RelayBoardPattern};
use std::io::Write;
use std::path::PathBuf;

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn test_load_single_pattern_file() {
    let pattern = RelayBoardPattern::from_file(data_path("example_pattern_single.json"))
        .expect("Failed to load pattern file");

    let serial_numbers = pattern.serial_numbers();
    assert_eq!(serial_numbers, vec!["RB90FJ7SIHYU1F"]);

    // only one pattern, so it is picked without naming it
    let state = pattern
        .pattern_for(&serial_numbers[0], None)
        .expect("Pattern should resolve");
    assert_eq!(state.open, vec![1, 2, 3]);
    assert_eq!(state.close, vec![4]);
}

#[test]
fn test_load_multiple_pattern_file() {
    let pattern = RelayBoardPattern::from_file(data_path("example_pattern_multiple.json"))
        .expect("Failed to load pattern file");

    assert_eq!(
        pattern.serial_numbers(),
        vec!["RB90FJ7SIHYU1F", "RB15H4FVGAZ726", "RB4OJQ4KUYSV0X"]
    );
    assert_eq!(pattern.alias_by_serial_number("RB4OJQ4KUYSV0X").unwrap(), "probe");

    let probe = pattern.pattern_by_alias("probe", Some("P2")).unwrap();
    assert_eq!(probe.close, vec![5, 6, 7, 8]);

    let load = pattern.pattern_by_alias("load", Some("P2")).unwrap();
    assert!(load.is_empty());

    assert!(matches!(
        pattern.pattern_by_alias("probe", None),
        Err(PatternError::Undetermined(_))
    ));
}

#[test]
fn test_missing_file() {
    let result = RelayBoardPattern::from_file(data_path("does_not_exist.json"));
    assert!(matches!(result, Err(PatternError::Io(_))));
}

#[test]
fn test_malformed_file() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(file, "{{ \"aliases\": ").unwrap();

    let result = RelayBoardPattern::from_file(file.path());
    assert!(matches!(result, Err(PatternError::Json(_))));
}

#[test]
fn test_saved_file_reloads() {
    let pattern = RelayBoardPattern::from_file(data_path("example_pattern_multiple.json")).unwrap();

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(pattern.to_json_pretty().unwrap().as_bytes())
        .unwrap();

    let reloaded = RelayBoardPattern::from_file(file.path()).unwrap();
    assert_eq!(reloaded, pattern);
    assert_eq!(reloaded.pattern_names(), vec!["P1", "P2"]);
}
