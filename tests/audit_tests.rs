//! Audit Tests
//!
//! Tests for audit entries and the audit logger.

use std::sync::Arc;

use recordhub::audit::{AuditEntry, AuditLogger};
use recordhub::protocol::Action;
use recordhub::storage::Backend;

#[test]
fn test_entry_uses_wire_field_names() {
    let entry = AuditEntry::new("c1", Action::Set, "X1");
    let value = serde_json::to_value(&entry).unwrap();

    assert_eq!(value["CPUid"], "c1");
    assert_eq!(value["action"], "set");
    assert_eq!(value["extra"], "X1");
    assert_eq!(value["id"], entry.id.to_string());
    assert_ne!(value["sessionid"], value["id"]);

    let back: AuditEntry = serde_json::from_value(value).unwrap();
    assert_eq!(back, entry);
}

#[test]
fn test_timestamp_has_second_precision() {
    let entry = AuditEntry::new("c1", Action::Get, "X1");
    let value = serde_json::to_value(&entry).unwrap();

    let timestamp = value["timestamp"].as_str().unwrap();
    assert!(chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok());
}

#[test]
fn test_record_returns_stored_log_id() {
    let backend = Arc::new(Backend::in_memory());
    let logger = AuditLogger::new(Arc::clone(&backend));

    let log_id = logger.record("c1", Action::List, "").unwrap();
    let entry = backend.audit().get(&log_id.to_string()).unwrap().unwrap();

    assert_eq!(entry.action, "list");
    assert_eq!(entry.extra, "");
    assert_eq!(entry.client_id, "c1");
}
