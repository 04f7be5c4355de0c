//! Protocol Tests
//!
//! Tests for request parsing, field validation and stream helpers.

use std::io::{self, Cursor, Read};

use recordhub::protocol::{
    decode_request, read_request, read_response, write_response, Action, Request, Response,
    MISSING_ACTION, MISSING_DATA, MISSING_ID, UNKNOWN_ACTION, UNKNOWN_CLIENT,
};
use recordhub::HubError;
use serde_json::json;

// =============================================================================
// Request Parsing Tests
// =============================================================================

#[test]
fn test_decode_full_request() {
    let request = decode_request(
        br#"{"ACTION":"set","UUID":"c1","DATA":{"id":"X1","val":5}}"#,
    )
    .unwrap();

    assert_eq!(request.action().unwrap(), Action::Set);
    assert_eq!(request.client_id, "c1");
    assert_eq!(request.require_data().unwrap().id(), Some("X1"));
    assert_eq!(request.id, None);
}

#[test]
fn test_decode_defaults_client_id() {
    let request = decode_request(br#"{"ACTION":"get","ID":"X1"}"#).unwrap();

    assert_eq!(request.client_id, UNKNOWN_CLIENT);
    assert_eq!(request.require_id().unwrap(), "X1");
}

#[test]
fn test_decode_non_string_client_id() {
    let request = decode_request(br#"{"ACTION":"list","UUID":12345}"#).unwrap();
    assert_eq!(request.client_id, "12345");

    let request = decode_request(br#"{"ACTION":"list","UUID":null}"#).unwrap();
    assert_eq!(request.client_id, UNKNOWN_CLIENT);

    let request = decode_request(br#"{"ACTION":"list","UUID":true}"#).unwrap();
    assert_eq!(request.client_id, "true");
}

#[test]
fn test_decode_malformed_json() {
    let result = decode_request(b"{not json");
    assert!(matches!(result, Err(HubError::Serialization(_))));
}

#[test]
fn test_decode_non_object() {
    assert!(decode_request(b"[1, 2, 3]").is_err());
}

#[test]
fn test_decode_empty_payload() {
    assert!(matches!(decode_request(b"  \n"), Err(HubError::Protocol(_))));
}

#[test]
fn test_encode_skips_absent_fields() {
    let request = Request::new(Action::List).with_client_id("c1");
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(value, json!({"ACTION": "list", "UUID": "c1"}));
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_missing_action() {
    let request = decode_request(br#"{"UUID":"c1"}"#).unwrap();
    assert_eq!(request.action().unwrap_err().to_string(), MISSING_ACTION);

    let request = decode_request(br#"{"ACTION":""}"#).unwrap();
    assert_eq!(request.action().unwrap_err().to_string(), MISSING_ACTION);
}

#[test]
fn test_unknown_action() {
    let request = decode_request(br#"{"ACTION":"delete"}"#).unwrap();
    assert_eq!(request.action().unwrap_err().to_string(), UNKNOWN_ACTION);
}

#[test]
fn test_action_names() {
    for action in [
        Action::Subscribe,
        Action::Get,
        Action::List,
        Action::Set,
        Action::GetLog,
    ] {
        assert_eq!(action.as_str().parse::<Action>().unwrap(), action);
    }
    assert_eq!(Action::GetLog.to_string(), "get_log");
}

#[test]
fn test_require_id_and_data() {
    let request = decode_request(br#"{"ACTION":"get","ID":""}"#).unwrap();
    assert_eq!(request.require_id().unwrap_err().to_string(), MISSING_ID);

    let request = decode_request(br#"{"ACTION":"set","DATA":{}}"#).unwrap();
    assert_eq!(request.require_data().unwrap_err().to_string(), MISSING_DATA);

    let request = decode_request(br#"{"ACTION":"set"}"#).unwrap();
    assert!(matches!(request.require_data(), Err(HubError::Validation(_))));
}

// =============================================================================
// Stream Helper Tests
// =============================================================================

/// Reader that hands out its data in fixed-size chunks
struct Chunked {
    data: Vec<u8>,
    chunk: usize,
}

impl Read for Chunked {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data.drain(..n);
        Ok(n)
    }
}

#[test]
fn test_read_request_single_receive() {
    let mut reader = Cursor::new(br#"{"ACTION":"list"}"#.to_vec());
    let request = read_request(&mut reader, 4096).unwrap().unwrap();
    assert_eq!(request.action().unwrap(), Action::List);
}

#[test]
fn test_read_request_closed_connection() {
    let mut reader = Cursor::new(Vec::new());
    assert!(read_request(&mut reader, 4096).unwrap().is_none());
}

#[test]
fn test_read_request_reads_only_once() {
    // the rest of the message arrives after the one receive
    let mut reader = Chunked {
        data: br#"{"ACTION":"list"}"#.to_vec(),
        chunk: 5,
    };
    assert!(read_request(&mut reader, 4096).is_err());
}

#[test]
fn test_read_request_bounded() {
    let payload = format!(r#"{{"ACTION":"get","ID":"{}"}}"#, "x".repeat(100));
    let mut reader = Cursor::new(payload.into_bytes());
    assert!(read_request(&mut reader, 16).is_err());
}

#[test]
fn test_response_round_trip_through_stream() {
    let mut buf = Vec::new();
    write_response(&mut buf, &Response::error("boom")).unwrap();
    assert_eq!(buf, br#"{"Error":"boom"}"#);

    let response = read_response(&mut Cursor::new(buf)).unwrap();
    assert!(response.is_error());
    assert_eq!(response.error_message(), Some("boom"));
}

#[test]
fn test_read_response_requires_data() {
    assert!(read_response(&mut Cursor::new(Vec::new())).is_err());
}
