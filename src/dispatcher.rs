//! Dispatcher Module
//!
//! Routes one parsed request to its operation and builds the response.
//!
//! ## Responsibilities
//! - Validate the fields each action requires
//! - Run the store operation, then write the audit entry
//! - Attach the audit `log_id` to the response
//! - Hand written records to the subscriber registry
//!
//! ## Routing Table
//! | action    | requires | store op   | audit (action, extra) |
//! |-----------|----------|------------|-----------------------|
//! | subscribe | -        | -          | subscribe, ""         |
//! | get       | ID       | get        | get, id               |
//! | list      | -        | scan       | list, ""              |
//! | set       | DATA     | put        | set, record id        |
//! | get_log   | ID       | audit get  | get, id               |
//!
//! Validation failures never touch the store or the audit table. Store
//! failures are reported to the client and leave no audit entry, because
//! the audit write only follows a successful store operation.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use crate::audit::AuditLogger;
use crate::error::{HubError, Result};
use crate::protocol::{Action, Request, Response, NOT_FOUND};
use crate::record::{Record, LOG_ID_FIELD};
use crate::storage::Backend;
use crate::subscribers::{Sink, SubscriberRegistry};

/// What the connection handler has to do with a routed request
#[derive(Debug)]
pub enum Routed {
    /// Send `response` and close. A `broadcast` record goes out to the
    /// subscribers once the response has been sent.
    Reply {
        response: Response,
        broadcast: Option<Record>,
    },

    /// Keep the connection open and register it for `client_id`
    Subscribe { client_id: String },
}

impl Routed {
    fn reply(response: Response) -> Self {
        Routed::Reply {
            response,
            broadcast: None,
        }
    }
}

/// Request dispatcher shared by all connection handlers
pub struct Dispatcher {
    backend: Arc<Backend>,
    audit: AuditLogger,
    subscribers: SubscriberRegistry,
}

impl Dispatcher {
    pub fn new(backend: Arc<Backend>) -> Self {
        Self {
            audit: AuditLogger::new(Arc::clone(&backend)),
            backend,
            subscribers: SubscriberRegistry::new(),
        }
    }

    /// Route a request to its operation
    ///
    /// Every outcome except `subscribe` carries exactly one response.
    pub fn route(&self, request: &Request) -> Routed {
        let action = match request.action() {
            Ok(action) => action,
            Err(e) => {
                tracing::debug!("Rejected request from {}: {}", request.client_id, e);
                return Routed::reply(Response::error(&e.to_string()));
            }
        };

        tracing::debug!("Request from {}: {}", request.client_id, action);

        let result = match action {
            Action::Subscribe => {
                return Routed::Subscribe {
                    client_id: request.client_id.clone(),
                }
            }
            Action::Get => self.get(request).map(Routed::reply),
            Action::List => self.list(request).map(Routed::reply),
            Action::Set => self.set(request),
            Action::GetLog => self.get_log(request).map(Routed::reply),
        };

        result.unwrap_or_else(|e| {
            match &e {
                HubError::Validation(_) => {
                    tracing::debug!("Rejected {} from {}: {}", action, request.client_id, e)
                }
                _ => tracing::error!("Error in action {}: {}", action, e),
            }
            Routed::reply(Response::error(&e.to_string()))
        })
    }

    /// Register a subscriber connection and audit the subscription
    pub fn subscribe(&self, client_id: &str, sink: Sink) -> Result<Uuid> {
        self.subscribers.subscribe(client_id, sink);
        self.audit.record(client_id, Action::Subscribe, "")
    }

    /// Push a written record to every subscriber, best effort
    pub fn broadcast(&self, record: &Record) -> usize {
        self.subscribers.broadcast(record)
    }

    pub fn backend(&self) -> &Arc<Backend> {
        &self.backend
    }

    pub fn subscribers(&self) -> &SubscriberRegistry {
        &self.subscribers
    }

    // =========================================================================
    // Operations
    // =========================================================================

    fn get(&self, request: &Request) -> Result<Response> {
        let id = request.require_id()?;
        let found = self.backend.records().get(id)?;
        let log_id = self.audit.record(&request.client_id, Action::Get, id)?;

        let body = match found {
            Some(record) => serde_json::to_value(record)?,
            None => Response::error(NOT_FOUND).into_body(),
        };
        Ok(Response::ok(attach_log_id(body, log_id)))
    }

    /// Only the first element carries the `log_id`. An empty store answers
    /// with an empty list; the audit entry is still written.
    fn list(&self, request: &Request) -> Result<Response> {
        let records = self.backend.records().scan()?;
        let log_id = self.audit.record(&request.client_id, Action::List, "")?;

        let mut items = records
            .into_iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<Value>, _>>()?;
        if let Some(first) = items.first_mut() {
            *first = attach_log_id(first.take(), log_id);
        }
        Ok(Response::ok(Value::Array(items)))
    }

    fn set(&self, request: &Request) -> Result<Routed> {
        let record = request.require_data()?;
        self.backend.records().put(record)?;
        let log_id = self
            .audit
            .record(&request.client_id, Action::Set, record.id().unwrap_or(""))?;

        let written = record.clone().with_log_id(log_id);
        Ok(Routed::Reply {
            response: Response::ok(serde_json::to_value(&written)?),
            broadcast: Some(written),
        })
    }

    /// The lookup itself is audited under the `get` action.
    fn get_log(&self, request: &Request) -> Result<Response> {
        let id = request.require_id()?;
        let found = self.backend.audit().get(id)?;
        self.audit.record(&request.client_id, Action::Get, id)?;

        match found {
            Some(entry) => Ok(Response::ok(serde_json::to_value(entry)?)),
            None => Ok(Response::error(NOT_FOUND)),
        }
    }
}

fn attach_log_id(mut body: Value, log_id: Uuid) -> Value {
    if let Value::Object(fields) = &mut body {
        fields.insert(LOG_ID_FIELD.to_string(), Value::String(log_id.to_string()));
    }
    body
}
