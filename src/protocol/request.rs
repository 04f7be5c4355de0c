//! Request definitions
//!
//! Represents the single request a client sends after connecting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::HubError;
use crate::record::Record;

use super::response::{MISSING_ACTION, MISSING_DATA, MISSING_ID, UNKNOWN_ACTION};

/// Client identity used when a request carries no `UUID`
pub const UNKNOWN_CLIENT: &str = "unknown";

/// The operations a client can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Subscribe,
    Get,
    List,
    Set,
    GetLog,
}

impl Action {
    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Subscribe => "subscribe",
            Action::Get => "get",
            Action::List => "list",
            Action::Set => "set",
            Action::GetLog => "get_log",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscribe" => Ok(Action::Subscribe),
            "get" => Ok(Action::Get),
            "list" => Ok(Action::List),
            "set" => Ok(Action::Set),
            "get_log" => Ok(Action::GetLog),
            _ => Err(HubError::Validation(UNKNOWN_ACTION.to_string())),
        }
    }
}

fn unknown_client() -> String {
    UNKNOWN_CLIENT.to_string()
}

/// Any scalar is accepted as a client id; `null` means unknown
fn lenient_client_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => unknown_client(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// A parsed request
///
/// ```text
/// {"ACTION": "set", "UUID": "c1", "DATA": {"id": "X1", "val": 5}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "ACTION", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Identity claimed by the client, never verified
    #[serde(
        rename = "UUID",
        default = "unknown_client",
        deserialize_with = "lenient_client_id"
    )]
    pub client_id: String,

    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "DATA", default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Record>,
}

impl Default for Request {
    fn default() -> Self {
        Self {
            action: None,
            client_id: unknown_client(),
            id: None,
            data: None,
        }
    }
}

impl Request {
    /// Request for the given action from the unknown client
    pub fn new(action: Action) -> Self {
        Self {
            action: Some(action.as_str().to_string()),
            ..Self::default()
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_data(mut self, data: Record) -> Self {
        self.data = Some(data);
        self
    }

    /// The requested action
    ///
    /// # Errors
    /// `Validation` when `ACTION` is missing or empty, or names no known action.
    pub fn action(&self) -> Result<Action, HubError> {
        match self.action.as_deref() {
            None | Some("") => Err(HubError::Validation(MISSING_ACTION.to_string())),
            Some(name) => name.parse(),
        }
    }

    /// The `ID` field, required by `get` and `get_log`
    pub fn require_id(&self) -> Result<&str, HubError> {
        match self.id.as_deref() {
            None | Some("") => Err(HubError::Validation(MISSING_ID.to_string())),
            Some(id) => Ok(id),
        }
    }

    /// The `DATA` record, required by `set`
    pub fn require_data(&self) -> Result<&Record, HubError> {
        match &self.data {
            Some(data) if !data.is_empty() => Ok(data),
            _ => Err(HubError::Validation(MISSING_DATA.to_string())),
        }
    }
}
