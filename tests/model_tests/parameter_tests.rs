//! Tests for the model types
//!
//! These tests verify:
//! - Namespace normalization
//! - Keyword matching rules
//! - Document lookup order (first match wins)
//! - Batch action parsing

use chrono::{Duration, Utc};
use paramkv::model::{normalize_namespace, BatchAction, BatchOp, DEFAULT_NAMESPACE};
use paramkv::{Document, NewParameter, Parameter};

// =============================================================================
// Helper Functions
// =============================================================================

fn make_parameter(namespace: &str, key: &str, value: &str, description: Option<&str>) -> Parameter {
    let now = Utc::now();
    Parameter {
        id: format!("{}:{}:{}", namespace, key, value),
        namespace: namespace.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        value_type: "string".to_string(),
        description: description.map(str::to_string),
        created_at: now - Duration::seconds(5),
        updated_at: now,
    }
}

// =============================================================================
// Namespace Tests
// =============================================================================

#[test]
fn test_normalize_empty_namespace() {
    assert_eq!(normalize_namespace(""), DEFAULT_NAMESPACE);
    assert_eq!(DEFAULT_NAMESPACE, "default");
}

#[test]
fn test_normalize_keeps_non_empty_namespace() {
    assert_eq!(normalize_namespace("media"), "media");
    assert_eq!(normalize_namespace("default"), "default");
    // Whitespace is a real namespace, not an omitted one
    assert_eq!(normalize_namespace(" "), " ");
}

// =============================================================================
// Keyword Matching Tests
// =============================================================================

#[test]
fn test_matches_keyword_on_each_field() {
    let parameter = make_parameter("Media", "VolumeLevel", "Loud", Some("Living Room"));

    assert!(parameter.matches_keyword("media"));
    assert!(parameter.matches_keyword("volume"));
    assert!(parameter.matches_keyword("loud"));
    assert!(parameter.matches_keyword("living"));
    assert!(!parameter.matches_keyword("kitchen"));
}

#[test]
fn test_matches_keyword_without_description() {
    let parameter = make_parameter("ns", "key", "value", None);

    assert!(parameter.matches_keyword("val"));
    assert!(!parameter.matches_keyword("note"));
}

#[test]
fn test_qualified_name() {
    let parameter = make_parameter("ns", "color", "red", None);
    assert_eq!(parameter.qualified_name(), "ns.color");
}

// =============================================================================
// Document Lookup Tests
// =============================================================================

#[test]
fn test_document_find_first_match_wins() {
    let document = Document::from(vec![
        make_parameter("ns", "other", "x", None),
        make_parameter("ns", "dup", "first", None),
        make_parameter("ns", "dup", "second", None),
    ]);

    assert_eq!(document.position("ns", "dup"), Some(1));
    assert_eq!(document.find("ns", "dup").unwrap().value, "first");
    assert!(document.contains("ns", "other"));
    assert!(!document.contains("other", "dup"));
}

#[test]
fn test_document_find_mut_edits_first_match() {
    let mut document = Document::from(vec![
        make_parameter("ns", "dup", "first", None),
        make_parameter("ns", "dup", "second", None),
    ]);

    document.find_mut("ns", "dup").unwrap().value = "edited".to_string();

    assert_eq!(document.parameters[0].value, "edited");
    assert_eq!(document.parameters[1].value, "second");
}

#[test]
fn test_empty_document() {
    let document = Document::new();

    assert!(document.is_empty());
    assert_eq!(document.len(), 0);
    assert!(document.find("ns", "k").is_none());
}

// =============================================================================
// Builder Tests
// =============================================================================

#[test]
fn test_new_parameter_builder() {
    let new = NewParameter::new("ns", "retries", "3")
        .with_type("number")
        .with_description("retry budget");

    assert_eq!(new.namespace, "ns");
    assert_eq!(new.key, "retries");
    assert_eq!(new.value, "3");
    assert_eq!(new.value_type.as_deref(), Some("number"));
    assert_eq!(new.description.as_deref(), Some("retry budget"));
}

#[test]
fn test_batch_op_constructors() {
    let create = BatchOp::create("ns", "a", "1").with_type("json");
    let update = BatchOp::update("ns", "a", "2").with_description("bumped");
    let delete = BatchOp::delete("ns", "a");

    assert_eq!(create.action, BatchAction::Create);
    assert_eq!(create.value_type.as_deref(), Some("json"));
    assert_eq!(update.action, BatchAction::Update);
    assert_eq!(update.description.as_deref(), Some("bumped"));
    assert_eq!(delete.action, BatchAction::Delete);
    assert_eq!(delete.value, "");
}

// =============================================================================
// Batch Action Parsing Tests
// =============================================================================

#[test]
fn test_batch_action_parse_is_case_insensitive() {
    assert_eq!("create".parse::<BatchAction>().unwrap(), BatchAction::Create);
    assert_eq!("Update".parse::<BatchAction>().unwrap(), BatchAction::Update);
    assert_eq!("DELETE".parse::<BatchAction>().unwrap(), BatchAction::Delete);
}

#[test]
fn test_batch_action_parse_rejects_unknown() {
    let err = "upsert".parse::<BatchAction>().unwrap_err();
    assert!(err.to_string().contains("upsert"));
}

#[test]
fn test_batch_action_display() {
    assert_eq!(BatchAction::Create.to_string(), "create");
    assert_eq!(BatchAction::Delete.as_str(), "delete");
}
