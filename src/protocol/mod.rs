//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Request Format
//! ```text
//! {"ACTION": <action>, "UUID"?: <client id>, "ID"?: <id>, "DATA"?: <record>}
//! ```
//!
//! ### Actions
//! - `subscribe`: keep the connection open and receive every written record
//! - `get`:       read a record by `ID`
//! - `list`:      read every record
//! - `set`:       write the `DATA` record
//! - `get_log`:   read an audit entry by `ID`
//!
//! ## Response Format
//! The record, list or audit entry as JSON, with the audit `log_id`
//! attached where the operation defines one. Errors are always
//! `{"Error": <message>}`.

mod request;
mod response;
mod codec;

pub use request::{Action, Request, UNKNOWN_CLIENT};
pub use response::{
    Response, ERROR_FIELD, MISSING_ACTION, MISSING_DATA, MISSING_ID, NOT_FOUND, UNKNOWN_ACTION,
};
pub use codec::{
    decode_request, encode_request, read_request, read_response, write_request, write_response,
};
