//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//! Plain JSON documents with no length prefix or delimiter.
//!
//! - A request is read with a single bounded receive right after connect
//! - A response is one JSON document, after which the server closes the
//!   connection
//! - Subscribers receive one JSON document per broadcast, back to back

use std::io::{Read, Write};

use serde_json::Value;

use crate::error::{HubError, Result};
use super::{Request, Response};

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request to bytes
pub fn encode_request(request: &Request) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(request)?)
}

/// Decode a request from bytes
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    if !bytes.iter().any(|b| !b.is_ascii_whitespace()) {
        return Err(HubError::Protocol("empty request".to_string()));
    }
    Ok(serde_json::from_slice(bytes)?)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one request with a single receive of at most `max_size` bytes
///
/// Returns `Ok(None)` when the peer closed the connection without sending
/// anything.
pub fn read_request<R: Read>(reader: &mut R, max_size: usize) -> Result<Option<Request>> {
    let mut buf = vec![0u8; max_size];
    let n = reader.read(&mut buf)?;
    if n == 0 {
        return Ok(None);
    }
    decode_request(&buf[..n]).map(Some)
}

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let bytes = encode_request(request)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response, up to the point the server closes the stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    if bytes.is_empty() {
        return Err(HubError::Protocol(
            "connection closed without a response".to_string(),
        ));
    }
    let body: Value = serde_json::from_slice(&bytes)?;
    Ok(Response::ok(body))
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writer.flush()?;
    Ok(())
}
