//! In-memory tables
//!
//! BTreeMap-based tables with RwLock for concurrency.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::audit::AuditEntry;
use crate::error::Result;
use crate::record::Record;

use super::{record_key, AuditStore, RecordStore};

/// Both tables held in memory
///
/// ## Concurrency:
/// - Each table has its own RwLock (many concurrent readers, exclusive writer)
/// - All methods use `&self`
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, Record>>,
    audit: RwLock<BTreeMap<String, AuditEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<Record>> {
        Ok(self.records.read().get(id).cloned())
    }

    fn put(&self, record: &Record) -> Result<()> {
        let key = record_key(record)?.to_string();
        self.records.write().insert(key, record.clone());
        Ok(())
    }

    fn scan(&self) -> Result<Vec<Record>> {
        Ok(self.records.read().values().cloned().collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }
}

impl AuditStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<AuditEntry>> {
        Ok(self.audit.read().get(id).cloned())
    }

    fn put(&self, entry: &AuditEntry) -> Result<()> {
        self.audit.write().insert(entry.id.to_string(), entry.clone());
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.audit.read().len())
    }
}
