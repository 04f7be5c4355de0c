//! Sled-backed tables
//!
//! One sled database, one tree per table. Keys are the raw id bytes and
//! values are the JSON encoding of the record or audit entry.

use std::path::Path;

use crate::audit::AuditEntry;
use crate::error::Result;
use crate::record::Record;

use super::{record_key, AuditStore, RecordStore};

const RECORDS_TREE: &str = "records";
const AUDIT_TREE: &str = "audit";

/// Persistent tables stored in a sled database
pub struct SledStore {
    /// Kept so the database lives as long as its trees
    _db: sled::Db,
    records: sled::Tree,
    audit: sled::Tree,
}

impl SledStore {
    /// Open or create the database in the given directory
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path)?;
        let records = db.open_tree(RECORDS_TREE)?;
        let audit = db.open_tree(AUDIT_TREE)?;
        Ok(Self {
            _db: db,
            records,
            audit,
        })
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.records.flush()?;
        self.audit.flush()?;
        Ok(())
    }
}

impl RecordStore for SledStore {
    fn get(&self, id: &str) -> Result<Option<Record>> {
        match self.records.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&self, record: &Record) -> Result<()> {
        let key = record_key(record)?;
        let value = serde_json::to_vec(record)?;
        self.records.insert(key.as_bytes(), value)?;
        Ok(())
    }

    fn scan(&self) -> Result<Vec<Record>> {
        let mut records = Vec::with_capacity(self.records.len());
        for item in self.records.iter() {
            let (_, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}

impl AuditStore for SledStore {
    fn get(&self, id: &str) -> Result<Option<AuditEntry>> {
        match self.audit.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn put(&self, entry: &AuditEntry) -> Result<()> {
        let value = serde_json::to_vec(entry)?;
        self.audit.insert(entry.id.to_string().as_bytes(), value)?;
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.audit.len())
    }
}
