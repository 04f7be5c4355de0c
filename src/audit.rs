//! Audit trail
//!
//! Every operation that reaches routing leaves exactly one immutable
//! [`AuditEntry`] behind. The entry id is returned to the dispatcher so it
//! can be embedded in the response as `log_id`, which makes the trail
//! discoverable through `get_log`.
//!
//! The audit table is a forensic record only; nothing reads it back to
//! rebuild primary data.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::protocol::Action;
use crate::storage::Backend;

/// One processed operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Log id, the key of the entry
    pub id: Uuid,

    /// Identity the client claimed in its request (untrusted)
    #[serde(rename = "CPUid")]
    pub client_id: String,

    /// Fresh for every entry, not tied to the connection
    #[serde(rename = "sessionid")]
    pub session_id: Uuid,

    /// Local wall clock time, second precision
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,

    pub action: String,

    /// Record id the operation touched, empty for `list` and `subscribe`
    pub extra: String,
}

impl AuditEntry {
    /// New entry stamped with the current local time
    pub fn new(client_id: &str, action: Action, extra: &str) -> Self {
        let now = Local::now().naive_local();
        Self {
            id: Uuid::new_v4(),
            client_id: client_id.to_string(),
            session_id: Uuid::new_v4(),
            timestamp: now.with_nanosecond(0).unwrap_or(now),
            action: action.as_str().to_string(),
            extra: extra.to_string(),
        }
    }
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Appends audit entries to the backend's audit table
#[derive(Clone)]
pub struct AuditLogger {
    backend: Arc<Backend>,
}

impl AuditLogger {
    pub fn new(backend: Arc<Backend>) -> Self {
        Self { backend }
    }

    /// Record one operation and return its log id
    ///
    /// # Errors
    /// Fails only when the audit table rejects the write.
    pub fn record(&self, client_id: &str, action: Action, extra: &str) -> Result<Uuid> {
        let entry = AuditEntry::new(client_id, action, extra);
        self.backend.audit().put(&entry)?;
        tracing::debug!(
            log_id = %entry.id,
            client = client_id,
            action = action.as_str(),
            "Audit entry recorded"
        );
        Ok(entry.id)
    }
}
