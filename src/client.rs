//! Client
//!
//! Blocking client for the recordhub protocol. Every one-shot operation
//! opens its own connection, sends one request and reads the response until
//! the server closes the stream.

use std::io::BufReader;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use serde_json::de::IoRead;
use serde_json::{Deserializer, StreamDeserializer};

use crate::error::{HubError, Result};
use crate::protocol::{read_response, write_request, Action, Request, Response, UNKNOWN_CLIENT};
use crate::record::Record;

/// `HubClient` talks to a recordhub server
#[derive(Debug, Clone)]
pub struct HubClient {
    addr: SocketAddr,
    client_id: String,
}

impl HubClient {
    /// Create a client for the server at `addr`
    pub fn new<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let addr = addr.to_socket_addrs()?.next().ok_or_else(|| {
            HubError::Config("server address did not resolve".to_string())
        })?;
        Ok(Self {
            addr,
            client_id: UNKNOWN_CLIENT.to_string(),
        })
    }

    /// Identify as `client_id` in every request
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Send an arbitrary request and return the raw response
    pub fn request(&self, request: &Request) -> Result<Response> {
        let mut stream = TcpStream::connect(self.addr)?;
        write_request(&mut stream, request)?;
        read_response(&mut stream)
    }

    /// Read a record by id
    pub fn get(&self, id: &str) -> Result<Response> {
        self.request(&self.new_request(Action::Get).with_id(id))
    }

    /// Write a record
    pub fn set(&self, record: Record) -> Result<Response> {
        self.request(&self.new_request(Action::Set).with_data(record))
    }

    /// Read every record
    pub fn list(&self) -> Result<Response> {
        self.request(&self.new_request(Action::List))
    }

    /// Read an audit entry by its log id
    pub fn get_log(&self, log_id: &str) -> Result<Response> {
        self.request(&self.new_request(Action::GetLog).with_id(log_id))
    }

    /// Register as a subscriber and keep the connection open
    pub fn subscribe(&self) -> Result<Subscription> {
        let mut stream = TcpStream::connect(self.addr)?;
        write_request(&mut stream, &self.new_request(Action::Subscribe))?;
        let reader = stream.try_clone()?;
        Ok(Subscription {
            stream,
            records: Deserializer::from_reader(BufReader::new(reader)).into_iter(),
        })
    }

    fn new_request(&self, action: Action) -> Request {
        Request::new(action).with_client_id(self.client_id.clone())
    }
}

/// An open subscriber connection
///
/// Iterating yields every record broadcast by the server, in write order.
/// The iterator ends when the server closes the connection.
pub struct Subscription {
    stream: TcpStream,
    records: StreamDeserializer<'static, IoRead<BufReader<TcpStream>>, Record>,
}

impl Subscription {
    /// The underlying stream, e.g. to set a read timeout
    pub fn stream(&self) -> &TcpStream {
        &self.stream
    }
}

impl Iterator for Subscription {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next().map(|r| r.map_err(HubError::from))
    }
}
