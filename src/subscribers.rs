//! Subscriber Registry
//!
//! Keeps one open outbound channel per client id and fans every written
//! record out to all of them.
//!
//! ## Delivery rules
//! - Best effort: a failed send is logged and the subscriber is dropped
//! - Never blocks the registry while sending: the map is snapshotted, the
//!   sends happen outside the lock, and dead entries are removed in one
//!   exclusive section afterwards
//! - A later `subscribe` with the same client id replaces the earlier
//!   channel; the old one is abandoned without notice

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::record::Record;

/// Outbound half of a subscriber connection
pub type Sink = Box<dyn Write + Send>;

type SharedSink = Arc<Mutex<Sink>>;

/// Registry of subscriber connections keyed by client id
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: Mutex<HashMap<String, SharedSink>>,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `sink` for `client_id`, replacing any earlier registration
    pub fn subscribe(&self, client_id: &str, sink: Sink) {
        let replaced = self
            .subscribers
            .lock()
            .insert(client_id.to_string(), Arc::new(Mutex::new(sink)));

        if replaced.is_some() {
            tracing::debug!("Subscriber {} re-registered, previous connection abandoned", client_id);
        }
        tracing::info!("Client {} subscribed", client_id);
    }

    /// Send `record` to every registered subscriber
    ///
    /// Returns the number of subscribers that received it.
    pub fn broadcast(&self, record: &Record) -> usize {
        let payload = match serde_json::to_vec(record) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Could not encode broadcast record: {}", e);
                return 0;
            }
        };

        let snapshot: Vec<(String, SharedSink)> = self
            .subscribers
            .lock()
            .iter()
            .map(|(id, sink)| (id.clone(), Arc::clone(sink)))
            .collect();

        let mut delivered = 0;
        let mut dead = Vec::new();
        for (client_id, sink) in snapshot {
            let sent = {
                let mut sink = sink.lock();
                sink.write_all(&payload).and_then(|_| sink.flush())
            };
            match sent {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!("Could not notify subscriber {}: {}", client_id, e);
                    dead.push((client_id, sink));
                }
            }
        }

        if !dead.is_empty() {
            let mut subscribers = self.subscribers.lock();
            for (client_id, sink) in dead {
                // the id may have re-subscribed with a new connection meanwhile
                if subscribers
                    .get(&client_id)
                    .is_some_and(|current| Arc::ptr_eq(current, &sink))
                {
                    subscribers.remove(&client_id);
                    tracing::debug!("Subscriber {} removed", client_id);
                }
            }
        }

        delivered
    }

    pub fn contains(&self, client_id: &str) -> bool {
        self.subscribers.lock().contains_key(client_id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.lock().is_empty()
    }
}
