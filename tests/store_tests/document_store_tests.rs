//! Tests for DocumentStore
//!
//! These tests verify:
//! - Reading an absent file yields an empty document
//! - Writes create the directory and replace the file atomically
//! - Fail-open vs strict handling of corrupt files
//! - On-disk field names (and legacy PascalCase input)
//! - Transactions exclude other readers/writers

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use paramkv::store::DocumentStore;
use paramkv::{Document, ParamError, Parameter, ReadPolicy};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_store(policy: ReadPolicy) -> (TempDir, PathBuf, DocumentStore) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data").join("parameters.json");
    let store = DocumentStore::new(&path, policy);
    (temp_dir, path, store)
}

fn make_parameter(namespace: &str, key: &str, value: &str) -> Parameter {
    let now = Utc::now();
    Parameter {
        id: format!("id-{}-{}", namespace, key),
        namespace: namespace.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        value_type: "string".to_string(),
        description: None,
        created_at: now,
        updated_at: now,
    }
}

fn make_document(entries: &[(&str, &str, &str)]) -> Document {
    Document::from(
        entries
            .iter()
            .map(|(ns, key, value)| make_parameter(ns, key, value))
            .collect::<Vec<_>>(),
    )
}

// =============================================================================
// Read Tests
// =============================================================================

#[test]
fn test_read_absent_file_returns_empty() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::FailOpen);

    let document = store.read().unwrap();

    assert!(document.is_empty());
    assert!(!path.exists());
    assert!(!path.parent().unwrap().exists(), "read must not create the directory");
}

#[test]
fn test_read_absent_file_strict_returns_empty() {
    let (_temp, _path, store) = setup_temp_store(ReadPolicy::Strict);

    assert!(store.read().unwrap().is_empty());
}

#[test]
fn test_read_empty_file_returns_empty() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::Strict);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "  \n").unwrap();

    assert!(store.read().unwrap().is_empty());
}

#[test]
fn test_read_null_document_returns_empty() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::Strict);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "null").unwrap();

    assert!(store.read().unwrap().is_empty());
}

#[test]
fn test_read_corrupt_file_fail_open_returns_empty() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::FailOpen);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{\"parameters\": [ {\"id\": ").unwrap();

    let document = store.read().unwrap();

    assert!(document.is_empty());
    // The corrupt file is left alone until the next write
    assert!(path.exists());
}

#[test]
fn test_read_corrupt_file_strict_returns_parse_error() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::Strict);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "not json at all").unwrap();

    let result = store.read();

    assert!(matches!(result, Err(ParamError::Parse(_))));
}

#[test]
fn test_read_legacy_pascal_case_document() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::Strict);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{
  "Parameters": [
    {
      "Id": "5b1f6a0e-0000-4000-8000-000000000001",
      "Namespace": "media",
      "Key": "volume",
      "Value": null,
      "Type": "number",
      "Description": null,
      "CreatedAt": "2024-03-01T08:30:00Z",
      "UpdatedAt": "2024-03-02T09:00:00.5Z"
    }
  ]
}"#,
    )
    .unwrap();

    let document = store.read().unwrap();

    assert_eq!(document.len(), 1);
    let parameter = &document.parameters[0];
    assert_eq!(parameter.id, "5b1f6a0e-0000-4000-8000-000000000001");
    assert_eq!(parameter.namespace, "media");
    assert_eq!(parameter.key, "volume");
    assert_eq!(parameter.value, "");
    assert_eq!(parameter.value_type, "number");
    assert_eq!(parameter.description, None);
    assert!(parameter.updated_at > parameter.created_at);
}

#[test]
fn test_read_missing_type_defaults_to_string() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::Strict);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{"parameters":[{"id":"x","namespace":"ns","key":"k","value":"v",
            "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}]}"#,
    )
    .unwrap();

    let document = store.read().unwrap();

    assert_eq!(document.parameters[0].value_type, "string");
}

#[test]
fn test_read_missing_timestamps_default_to_epoch() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::Strict);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{"parameters":[
            {"id":"a","namespace":"ns","key":"k1","value":"v"},
            {"id":"b","namespace":"ns","key":"k2","value":"v","createdAt":null,
             "updatedAt":"2024-01-01T00:00:00Z"}]}"#,
    )
    .unwrap();

    let document = store.read().unwrap();

    assert_eq!(document.len(), 2);
    let epoch = chrono::DateTime::<Utc>::default();
    assert_eq!(document.parameters[0].created_at, epoch);
    assert_eq!(document.parameters[0].updated_at, epoch);
    assert_eq!(document.parameters[1].created_at, epoch);
    assert!(document.parameters[1].updated_at > epoch);
}

// =============================================================================
// Write Tests
// =============================================================================

#[test]
fn test_write_creates_directory() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::FailOpen);
    assert!(!path.parent().unwrap().exists());

    store.write(&make_document(&[("ns", "k", "v")])).unwrap();

    assert!(path.parent().unwrap().is_dir());
    assert!(path.is_file());
}

#[test]
fn test_write_then_read_roundtrip() {
    let (_temp, _path, store) = setup_temp_store(ReadPolicy::Strict);
    let mut document = make_document(&[("ns", "a", "1"), ("ns", "b", "2"), ("other", "a", "3")]);
    document.parameters[1].description = Some("second".to_string());
    document.parameters[2].value_type = "json".to_string();

    store.write(&document).unwrap();
    let loaded = store.read().unwrap();

    assert_eq!(loaded, document);
}

#[test]
fn test_write_replaces_whole_document() {
    let (_temp, _path, store) = setup_temp_store(ReadPolicy::Strict);

    store.write(&make_document(&[("ns", "a", "1"), ("ns", "b", "2")])).unwrap();
    store.write(&make_document(&[("ns", "c", "3")])).unwrap();

    let loaded = store.read().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.parameters[0].key, "c");
}

#[test]
fn test_write_leaves_no_temp_file() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::FailOpen);

    store.write(&make_document(&[("ns", "a", "1")])).unwrap();
    store.write(&make_document(&[("ns", "b", "2")])).unwrap();

    let names: Vec<String> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["parameters.json".to_string()]);
}

#[test]
fn test_write_over_corrupt_file_recovers() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::FailOpen);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "garbage").unwrap();

    store.write(&make_document(&[("ns", "k", "v")])).unwrap();

    let loaded = store.read().unwrap();
    assert_eq!(loaded.len(), 1);
}

#[test]
fn test_write_uses_camel_case_field_names() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::FailOpen);
    let mut document = make_document(&[("ns", "k", "v")]);
    document.parameters[0].description = Some("note".to_string());

    store.write(&document).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let entry = &raw["parameters"][0];
    for field in ["id", "namespace", "key", "value", "type", "description", "createdAt", "updatedAt"] {
        assert!(entry.get(field).is_some(), "missing field {}", field);
    }
    assert_eq!(entry["type"], "string");
    assert!(entry["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_write_into_file_path_fails_with_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "i am a file").unwrap();
    let store = DocumentStore::new(blocker.join("parameters.json"), ReadPolicy::FailOpen);

    let result = store.write(&make_document(&[("ns", "k", "v")]));

    assert!(matches!(result, Err(ParamError::Io(_))));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "i am a file");
}

#[test]
fn test_failed_rename_removes_temp_file_and_keeps_target() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::FailOpen);
    // A non-empty directory where the document should be
    fs::create_dir_all(&path).unwrap();
    fs::write(path.join("keep.txt"), "untouched").unwrap();

    let result = store.write(&make_document(&[("ns", "k", "v")]));

    assert!(matches!(result, Err(ParamError::Io(_))));
    assert!(!path.parent().unwrap().join(".parameters.json.tmp").exists());
    assert!(path.is_dir());
    assert_eq!(fs::read_to_string(path.join("keep.txt")).unwrap(), "untouched");
}

#[test]
fn test_write_fails_when_directory_cannot_be_created() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "i am a file").unwrap();
    let store = DocumentStore::new(
        blocker.join("nested").join("parameters.json"),
        ReadPolicy::FailOpen,
    );

    let result = store.write(&make_document(&[("ns", "k", "v")]));

    assert!(matches!(result, Err(ParamError::Io(_))));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "i am a file");
}

// =============================================================================
// Transaction Tests
// =============================================================================

#[test]
fn test_transaction_read_modify_write() {
    let (_temp, _path, store) = setup_temp_store(ReadPolicy::Strict);
    store.write(&make_document(&[("ns", "a", "1")])).unwrap();

    {
        let mut txn = store.transaction();
        let mut document = txn.read().unwrap();
        document.parameters.push(make_parameter("ns", "b", "2"));
        txn.write(&document).unwrap();
    }

    assert_eq!(store.read().unwrap().len(), 2);
}

#[test]
fn test_transaction_blocks_other_readers() {
    let (_temp, _path, store) = setup_temp_store(ReadPolicy::FailOpen);
    let store = Arc::new(store);
    let reader_done = Arc::new(AtomicBool::new(false));

    let txn = store.transaction();

    let handle = {
        let store = Arc::clone(&store);
        let reader_done = Arc::clone(&reader_done);
        thread::spawn(move || {
            store.read().unwrap();
            reader_done.store(true, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert!(
        !reader_done.load(Ordering::SeqCst),
        "reader must wait while a transaction is open"
    );

    drop(txn);
    handle.join().unwrap();
    assert!(reader_done.load(Ordering::SeqCst));
}

// =============================================================================
// Accessor Tests
// =============================================================================

#[test]
fn test_store_accessors() {
    let (_temp, path, store) = setup_temp_store(ReadPolicy::Strict);

    assert_eq!(store.path(), path.as_path());
    assert_eq!(store.read_policy(), ReadPolicy::Strict);
    assert_eq!(store.transaction().path(), path.as_path());
}
