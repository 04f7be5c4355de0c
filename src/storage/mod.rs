//! Storage Module
//!
//! The backing store behind the dispatcher: a record table and an audit
//! table.
//!
//! ## Responsibilities
//! - Point lookups and full scans of records, keyed by `id`
//! - Append and look up audit entries, keyed by their log id
//! - Propagate backend failures to the caller (no retries)
//!
//! ## Implementations
//! - [`MemoryStore`]: both tables in `RwLock<BTreeMap>`s, lost at exit
//! - [`SledStore`]: one sled database with a `records` and an `audit` tree,
//!   values encoded as JSON
//!
//! A [`Backend`] is built once at startup and shared by every connection
//! handler through an `Arc`.

mod memory;
mod sled_store;

use std::sync::Arc;

use crate::audit::AuditEntry;
use crate::config::Config;
use crate::error::{HubError, Result};
use crate::record::Record;

pub use memory::MemoryStore;
pub use sled_store::SledStore;

/// The primary data table
pub trait RecordStore: Send + Sync {
    /// Get a record by id
    fn get(&self, id: &str) -> Result<Option<Record>>;

    /// Insert or overwrite a record under its `id`
    fn put(&self, record: &Record) -> Result<()>;

    /// All records, ordered by id
    fn scan(&self) -> Result<Vec<Record>>;

    /// Number of stored records
    fn count(&self) -> Result<usize>;
}

/// The append-only audit table
pub trait AuditStore: Send + Sync {
    /// Get an audit entry by its log id
    fn get(&self, id: &str) -> Result<Option<AuditEntry>>;

    /// Append an entry
    fn put(&self, entry: &AuditEntry) -> Result<()>;

    /// Number of stored entries
    fn count(&self) -> Result<usize>;
}

/// Primary key of a record about to be stored
///
/// Records without a string `id` cannot be stored.
pub(crate) fn record_key(record: &Record) -> Result<&str> {
    record.id().ok_or_else(|| {
        HubError::Storage("record is missing the string key 'id'".to_string())
    })
}

/// Handle to both tables
pub struct Backend {
    records: Arc<dyn RecordStore>,
    audit: Arc<dyn AuditStore>,
}

impl Backend {
    /// Open the backend described by `config`
    ///
    /// Uses a sled database under `config.data_dir` when set, the in-memory
    /// store otherwise.
    pub fn open(config: &Config) -> Result<Self> {
        match &config.data_dir {
            Some(dir) => {
                tracing::debug!("Opening sled backend at {}", dir.display());
                let store = Arc::new(SledStore::open(dir)?);
                Ok(Self::with_stores(store.clone(), store))
            }
            None => {
                tracing::debug!("Creating in-memory backend");
                Ok(Self::in_memory())
            }
        }
    }

    /// Backend with both tables in memory
    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_stores(store.clone(), store)
    }

    /// Backend over arbitrary table implementations
    pub fn with_stores(records: Arc<dyn RecordStore>, audit: Arc<dyn AuditStore>) -> Self {
        Self { records, audit }
    }

    pub fn records(&self) -> &dyn RecordStore {
        self.records.as_ref()
    }

    pub fn audit(&self) -> &dyn AuditStore {
        self.audit.as_ref()
    }
}
