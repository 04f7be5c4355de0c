//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One handler thread per connection, optionally capped
//! - Requests routed through the Dispatcher

mod server;
mod connection;

pub use server::{Server, ACCEPT_BACKOFF};
pub use connection::Connection;
