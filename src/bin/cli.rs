//! recordhub CLI Client
//!
//! Command-line interface for interacting with a recordhub server.

use clap::{Parser, Subcommand};
use recordhub::{HubClient, Record, Result};

/// recordhub CLI
#[derive(Parser, Debug)]
#[command(name = "recordhub-cli")]
#[command(about = "CLI for the recordhub record store")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    /// Client identity sent with every request
    #[arg(short, long, default_value = recordhub::protocol::UNKNOWN_CLIENT)]
    uuid: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a record by id
    Get {
        /// The record id
        id: String,
    },

    /// Write a record given as a JSON object with an "id" field
    Set {
        /// The record, e.g. '{"id":"X1","val":5}'
        data: String,
    },

    /// List every record
    List,

    /// Get an audit entry by its log id
    GetLog {
        /// The log id returned in a previous response
        log_id: String,
    },

    /// Print every written record until interrupted
    Subscribe,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let client = HubClient::new(args.server.as_str())?.with_client_id(args.uuid);

    let response = match args.command {
        Commands::Get { id } => client.get(&id)?,
        Commands::Set { data } => {
            let record: Record = serde_json::from_str(&data)?;
            client.set(record)?
        }
        Commands::List => client.list()?,
        Commands::GetLog { log_id } => client.get_log(&log_id)?,
        Commands::Subscribe => {
            for record in client.subscribe()? {
                println!("{}", serde_json::to_string(&record?)?);
            }
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(response.body())?);
    Ok(())
}
