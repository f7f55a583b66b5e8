//! Integration tests for offset database loading and lookup

use relokit::{Id, LookupMode, OffsetDatabase, RelocError, VersionKey};
use std::fs;
use tempfile::TempDir;

const IDENTITY: &str = "9f2cabe1";

fn write_db(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn sample_json() -> String {
    format!(
        r#"{{
            "format": 2,
            "identity": "{IDENTITY}",
            "entries": [
                {{ "id": 42, "version": "1.0.0.0", "offset": 256 }},
                {{ "id": 42, "version": "2.0.0.0", "offset": 384 }},
                {{ "id": 7,  "version": "1.0.0.0", "offset": 64 }}
            ]
        }}"#
    )
}

#[test]
fn test_load_happy_path() {
    let dir = TempDir::new().unwrap();
    let path = write_db(&dir, "offsets.json", &sample_json());

    let db = OffsetDatabase::load(&path, IDENTITY).unwrap();
    assert_eq!(db.len(), 3);
    assert_eq!(db.identity(), IDENTITY);

    let v2: VersionKey = "2.0.0.0".parse().unwrap();
    assert_eq!(db.lookup(Id::new(42), v2).unwrap(), 0x180);
}

#[test]
fn test_load_accepts_uppercase_identity() {
    let dir = TempDir::new().unwrap();
    let json = sample_json().replace(IDENTITY, "9F2CABE1");
    let path = write_db(&dir, "offsets.json", &json);

    let db = OffsetDatabase::load(&path, IDENTITY).unwrap();
    assert_eq!(db.identity(), IDENTITY);
}

#[test]
fn test_missing_file_is_distinct_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("does-not-exist.json");

    let err = OffsetDatabase::load(&path, IDENTITY).unwrap_err();
    assert!(matches!(err, RelocError::DatabaseMissing { .. }));
    assert!(err.is_database_load_failure());
}

#[test]
fn test_corrupt_json_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_db(&dir, "offsets.json", "{ not json");

    let err = OffsetDatabase::load(&path, IDENTITY).unwrap_err();
    assert!(matches!(err, RelocError::DatabaseCorrupt { .. }));
}

#[test]
fn test_format_version_mismatch_rejected() {
    let dir = TempDir::new().unwrap();
    let json = sample_json().replace("\"format\": 2", "\"format\": 1");
    let path = write_db(&dir, "offsets.json", &json);

    let err = OffsetDatabase::load(&path, IDENTITY).unwrap_err();
    match err {
        RelocError::DatabaseFormatMismatch { expected, found } => {
            assert_eq!(expected, 2);
            assert_eq!(found, 1);
        }
        other => panic!("expected DatabaseFormatMismatch, got {other:?}"),
    }
}

#[test]
fn test_identity_mismatch_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_db(&dir, "offsets.json", &sample_json());

    let err = OffsetDatabase::load(&path, "deadbeef").unwrap_err();
    assert!(matches!(err, RelocError::IdentityMismatch { .. }));
}

#[test]
fn test_duplicate_entries_reject_whole_load() {
    let dir = TempDir::new().unwrap();
    let json = format!(
        r#"{{
            "format": 2,
            "identity": "{IDENTITY}",
            "entries": [
                {{ "id": 42, "version": "1.0.0.0", "offset": 256 }},
                {{ "id": 42, "version": "1.0.0.0", "offset": 999 }}
            ]
        }}"#
    );
    let path = write_db(&dir, "offsets.json", &json);

    let err = OffsetDatabase::load(&path, IDENTITY).unwrap_err();
    assert!(matches!(err, RelocError::DuplicateEntry { .. }));
}

#[test]
fn test_strict_and_nearest_modes_on_loaded_db() {
    let dir = TempDir::new().unwrap();
    let path = write_db(&dir, "offsets.json", &sample_json());
    let db = OffsetDatabase::load(&path, IDENTITY).unwrap();

    let v1_5: VersionKey = "1.5.0.0".parse().unwrap();

    // strict: between-version lookup fails
    assert!(matches!(
        db.lookup(Id::new(42), v1_5).unwrap_err(),
        RelocError::UnresolvedId { .. }
    ));

    // nearest: explicit opt-in substitutes the closest covered version below
    assert_eq!(
        db.lookup_with(LookupMode::Nearest, Id::new(42), v1_5).unwrap(),
        0x100
    );
}

#[test]
fn test_versions_for_reports_coverage() {
    let dir = TempDir::new().unwrap();
    let path = write_db(&dir, "offsets.json", &sample_json());
    let db = OffsetDatabase::load(&path, IDENTITY).unwrap();

    let covered = db.versions_for(Id::new(42));
    assert_eq!(covered.len(), 2);
    assert_eq!(covered[0], "1.0.0.0".parse().unwrap());
    assert_eq!(covered[1], "2.0.0.0".parse().unwrap());
}
