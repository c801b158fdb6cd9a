//! ParamKV CLI Client
//!
//! Command-line interface for interacting with ParamKV.

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use paramkv::client::Client;
use paramkv::protocol::{OperationItem, Request, Response};
use paramkv::{ParamError, Result};

/// ParamKV CLI
#[derive(Parser, Debug)]
#[command(name = "paramkv-cli")]
#[command(about = "CLI for the ParamKV parameter store")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List parameters, optionally filtered by namespace or keyword
    List {
        #[arg(short, long)]
        namespace: Option<String>,

        /// Case-insensitive substring search
        #[arg(short, long)]
        keyword: Option<String>,
    },

    /// Get one or more parameters by key
    Get {
        /// Keys to look up
        #[arg(required = true)]
        keys: Vec<String>,

        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Create a parameter
    Create {
        key: String,
        value: String,

        #[arg(short, long)]
        namespace: Option<String>,

        /// Type hint: string, number, boolean or json
        #[arg(short = 't', long = "type")]
        value_type: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Update a parameter's value (and optionally its description)
    Update {
        key: String,
        value: String,

        #[arg(short, long)]
        namespace: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete one or more parameters
    Del {
        #[arg(required = true)]
        keys: Vec<String>,

        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Apply a JSON array of batch operations from a file ("-" for stdin)
    Batch {
        file: String,
    },

    /// Show parameter count and advisory limit
    Stats,

    /// Ping the server
    Ping,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(response) => {
            match serde_json::to_string_pretty(&response) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to render response: {}", e),
            }
            if response.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<Response> {
    let request = build_request(args.command)?;
    let mut client = Client::connect(&args.server)?;
    client.send(&request)
}

fn build_request(command: Commands) -> Result<Request> {
    let request = match command {
        Commands::List { namespace, keyword } => Request::List { namespace, keyword },
        Commands::Get { mut keys, namespace } => {
            if keys.len() == 1 {
                Request::Query {
                    namespace,
                    key: keys.pop(),
                    keys: None,
                }
            } else {
                Request::Query {
                    namespace,
                    key: None,
                    keys: Some(keys),
                }
            }
        }
        Commands::Create {
            key,
            value,
            namespace,
            value_type,
            description,
        } => Request::Create {
            namespace,
            key: Some(key),
            value: Some(value),
            value_type,
            description,
            parameters: None,
        },
        Commands::Update {
            key,
            value,
            namespace,
            description,
        } => Request::Update {
            namespace,
            key: Some(key),
            value: Some(value),
            description,
            parameters: None,
        },
        Commands::Del { mut keys, namespace } => {
            if keys.len() == 1 {
                Request::Delete {
                    namespace,
                    key: keys.pop(),
                    keys: None,
                    parameters: None,
                }
            } else {
                Request::Delete {
                    namespace,
                    key: None,
                    keys: Some(keys),
                    parameters: None,
                }
            }
        }
        Commands::Batch { file } => Request::Batch {
            operations: read_operations(&file)?,
        },
        Commands::Stats => Request::Stats,
        Commands::Ping => Request::Ping,
    };
    Ok(request)
}

fn read_operations(file: &str) -> Result<Vec<OperationItem>> {
    let text = if file == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(file)
            .map_err(|e| ParamError::InvalidRequest(format!("Cannot read {}: {}", file, e)))?
    };
    Ok(serde_json::from_str(&text)?)
}
