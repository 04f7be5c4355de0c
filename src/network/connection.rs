//! Connection Handler
//!
//! Handles individual client connections.
//!
//! ## Lifecycle
//! ```text
//! AWAIT_REQUEST → PARSE → VALIDATE → ROUTE → STORE → AUDIT → RESPOND
//!                                                              │
//!                                     CLOSE ◄──────────────────┤
//!                                     KEEP-OPEN (subscribe) ◄──┘
//! ```

use std::io;
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::dispatcher::{Dispatcher, Routed};
use crate::error::{HubError, Result};
use crate::protocol::{read_request, write_response, Response};

/// Handles a single client connection
pub struct Connection {
    stream: TcpStream,

    /// Shared request dispatcher
    dispatcher: Arc<Dispatcher>,

    /// Peer address for logging
    peer_addr: String,

    max_request_size: usize,

    subscriber_write_timeout: Option<Duration>,
}

impl Connection {
    /// Create a new connection handler and apply the socket settings
    pub fn new(stream: TcpStream, dispatcher: Arc<Dispatcher>, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        if config.read_timeout_ms > 0 {
            stream.set_read_timeout(Some(Duration::from_millis(config.read_timeout_ms)))?;
        }

        let subscriber_write_timeout = match config.subscriber_write_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };

        Ok(Self {
            stream,
            dispatcher,
            peer_addr,
            max_request_size: config.max_request_size,
            subscriber_write_timeout,
        })
    }

    /// Serve the one request of this connection
    ///
    /// The connection is closed on return, unless it was registered as a
    /// subscriber.
    pub fn handle(mut self) -> Result<()> {
        let request = match read_request(&mut self.stream, self.max_request_size) {
            Ok(Some(request)) => request,
            Ok(None) => {
                tracing::debug!("Client {} closed without sending a request", self.peer_addr);
                return Ok(());
            }
            Err(HubError::Io(ref e)) if is_disconnect(e) => {
                tracing::debug!("Connection from {} dropped: {}", self.peer_addr, e);
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Bad request from {}: {}", self.peer_addr, e);
                return self.respond(&Response::error(&e.to_string()));
            }
        };

        tracing::trace!("Received request from {}: {:?}", self.peer_addr, request);

        match self.dispatcher.route(&request) {
            Routed::Reply {
                response,
                broadcast,
            } => {
                let sent = self.respond(&response);
                if let Some(record) = broadcast {
                    let delivered = self.dispatcher.broadcast(&record);
                    tracing::debug!("Write broadcast to {} subscribers", delivered);
                }
                sent
            }
            Routed::Subscribe { client_id } => self.subscribe(&client_id),
        }
    }

    /// Send the response and close the connection
    fn respond(&mut self, response: &Response) -> Result<()> {
        if let Err(e) = write_response(&mut self.stream, response) {
            if let HubError::Io(ref io_err) = e {
                if is_disconnect(io_err) {
                    tracing::debug!(
                        "Client {} disconnected before response could be sent: {}",
                        self.peer_addr,
                        e
                    );
                    return Ok(());
                }
            }
            return Err(e);
        }
        let _ = self.stream.shutdown(Shutdown::Both);
        Ok(())
    }

    /// Hand a clone of the stream to the subscriber registry
    fn subscribe(&self, client_id: &str) -> Result<()> {
        let sink = self.stream.try_clone()?;
        sink.set_write_timeout(self.subscriber_write_timeout)?;

        match self.dispatcher.subscribe(client_id, Box::new(sink)) {
            Ok(log_id) => tracing::debug!(
                "Client {} at {} subscribed, log id {}",
                client_id,
                self.peer_addr,
                log_id
            ),
            Err(e) => tracing::error!("Could not audit subscription of {}: {}", client_id, e),
        }
        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
    )
}
