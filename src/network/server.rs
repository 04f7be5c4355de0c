//! TCP Server
//!
//! Accepts connections and hands each one to its own handler thread.

use std::io::{self, ErrorKind};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{HubError, Result};

use super::Connection;

/// Pause after a failed accept
pub const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// TCP server for recordhub
///
/// The listening socket is bound in [`Server::bind`], so a second instance
/// on the same address fails there with [`HubError::BindConflict`].
pub struct Server {
    config: Config,
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    gate: Option<ConnectionGate>,
}

impl Server {
    /// Bind the listening socket
    ///
    /// # Errors
    /// `BindConflict` when the address is already in use, `Io` for any
    /// other socket failure, `Config` for unusable settings.
    pub fn bind(config: Config, dispatcher: Arc<Dispatcher>) -> Result<Self> {
        config.validate()?;

        let listener = TcpListener::bind(&config.listen_addr).map_err(|e| {
            if e.kind() == ErrorKind::AddrInUse {
                HubError::BindConflict {
                    addr: config.listen_addr.clone(),
                    source: e,
                }
            } else {
                HubError::Io(e)
            }
        })?;

        tracing::info!("Listening on {}", listener.local_addr()?);

        let gate = config.max_connections.map(ConnectionGate::new);
        Ok(Self {
            config,
            listener,
            dispatcher,
            gate,
        })
    }

    /// Address the server is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Accept connections forever (blocking)
    pub fn run(&self) -> Result<()> {
        tracing::info!("Server ready, waiting for connections");
        self.serve(self.listener.incoming());
        Ok(())
    }

    /// Hand every accepted stream to a handler thread
    ///
    /// A failed accept is logged and followed by a short pause, since errors
    /// such as EMFILE repeat until some handler exits.
    pub fn serve<I>(&self, incoming: I)
    where
        I: IntoIterator<Item = io::Result<TcpStream>>,
    {
        for stream in incoming {
            match stream {
                Ok(stream) => self.spawn_handler(stream),
                Err(e) => {
                    tracing::warn!("Connection failed: {}", e);
                    thread::sleep(ACCEPT_BACKOFF);
                }
            }
        }
    }

    fn spawn_handler(&self, stream: TcpStream) {
        let permit = self.gate.as_ref().map(ConnectionGate::acquire);

        let connection = match Connection::new(stream, Arc::clone(&self.dispatcher), &self.config) {
            Ok(connection) => connection,
            Err(e) => {
                tracing::warn!("Could not set up connection: {}", e);
                return;
            }
        };

        let name = format!("conn-{}", connection.peer_addr());
        let spawned = thread::Builder::new().name(name).spawn(move || {
            let _permit = permit;
            let peer_addr = connection.peer_addr().to_string();
            if let Err(e) = connection.handle() {
                tracing::warn!("Error serving {}: {}", peer_addr, e);
            }
        });

        if let Err(e) = spawned {
            tracing::error!("Failed to spawn connection handler: {}", e);
        }
    }
}

/// Caps the number of live handlers
///
/// Each handler holds one slot of a bounded channel; the acceptor blocks
/// when all slots are taken.
struct ConnectionGate {
    slots: Sender<()>,
    released: Receiver<()>,
}

impl ConnectionGate {
    fn new(max_connections: usize) -> Self {
        let (slots, released) = channel::bounded(max_connections);
        Self { slots, released }
    }

    fn acquire(&self) -> Permit {
        if self.slots.send(()).is_err() {
            tracing::error!("Connection gate closed");
        }
        Permit {
            released: self.released.clone(),
        }
    }
}

struct Permit {
    released: Receiver<()>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        let _ = self.released.try_recv();
    }
}
