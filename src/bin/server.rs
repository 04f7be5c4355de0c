//! recordhub Server Binary
//!
//! Starts the TCP server for recordhub.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use recordhub::network::Server;
use recordhub::{Backend, Config, Dispatcher};
use tracing_subscriber::{fmt, EnvFilter};

/// recordhub Server
#[derive(Parser, Debug)]
#[command(name = "recordhub-server")]
#[command(about = "Record store with an audit trail and write notifications")]
#[command(version)]
struct Args {
    /// Listen port
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Listen host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Persist records under this directory (in memory when omitted)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Maximum concurrent connection handlers (unbounded when omitted)
    #[arg(short, long)]
    max_connections: Option<usize>,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    tracing::info!("recordhub Server v{}", recordhub::VERSION);

    // Build config from args
    let mut builder = Config::builder().listen_addr(format!("{}:{}", args.host, args.port));
    if let Some(dir) = &args.data_dir {
        tracing::info!("Data directory: {}", dir.display());
        builder = builder.data_dir(dir);
    }
    if let Some(max) = args.max_connections {
        builder = builder.max_connections(max);
    }
    let config = builder.build();

    // Open the backend once and share it with every handler
    let backend = match Backend::open(&config) {
        Ok(b) => Arc::new(b),
        Err(e) => {
            tracing::error!("Failed to open backend: {}", e);
            std::process::exit(1);
        }
    };
    let dispatcher = Arc::new(Dispatcher::new(backend));

    let server = match Server::bind(config, dispatcher) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
