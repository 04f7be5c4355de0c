//! # recordhub
//!
//! A TCP record store with:
//! - One-shot `get`, `set`, `list` and `get_log` requests
//! - An append-only audit trail, one entry per operation
//! - Push notifications of every write to subscribed clients
//! - In-memory or sled-backed tables
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │            (one handler thread per connection)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Dispatcher                               │
//! │         (validate → store → audit → respond)                 │
//! └──────────┬──────────────────┬──────────────────┬────────────┘
//!            │                  │                  │
//!            ▼                  ▼                  ▼
//!   ┌─────────────┐     ┌─────────────┐    ┌──────────────┐
//!   │   Records   │     │    Audit    │    │ Subscribers  │
//!   │   (store)   │     │  (append)   │    │ (broadcast)  │
//!   └─────────────┘     └─────────────┘    └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod storage;
pub mod audit;
pub mod subscribers;
pub mod protocol;
pub mod dispatcher;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{HubError, Result};
pub use config::Config;
pub use dispatcher::Dispatcher;
pub use storage::Backend;
pub use record::Record;
pub use client::HubClient;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of recordhub
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
