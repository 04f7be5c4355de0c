//! Response definitions
//!
//! Represents responses to clients. A response is a single JSON document:
//! a record, a list of records, an audit entry, or an error object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Error texts clients match on
pub const MISSING_ACTION: &str = "Falta campo ACTION";
pub const UNKNOWN_ACTION: &str = "Accion no reconocida";
pub const MISSING_ID: &str = "Falta ID para accion get";
pub const MISSING_DATA: &str = "Falta campo DATA";
pub const NOT_FOUND: &str = "ID no encontrado";

/// Key of the error message in error responses
pub const ERROR_FIELD: &str = "Error";

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Response(Value);

impl Response {
    /// Create a successful response carrying `body`
    pub fn ok(body: Value) -> Self {
        Self(body)
    }

    /// Create an `{"Error": message}` response
    pub fn error(message: &str) -> Self {
        let mut body = Map::new();
        body.insert(ERROR_FIELD.to_string(), Value::from(message));
        Self(Value::Object(body))
    }

    /// The error message, if this is an error response
    pub fn error_message(&self) -> Option<&str> {
        self.0.get(ERROR_FIELD).and_then(Value::as_str)
    }

    pub fn is_error(&self) -> bool {
        self.error_message().is_some()
    }

    pub fn body(&self) -> &Value {
        &self.0
    }

    pub fn into_body(self) -> Value {
        self.0
    }
}
