//! ParamKV Server Binary
//!
//! Starts the TCP server for ParamKV.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use clap::Parser;
use paramkv::network::Server;
use paramkv::{Config, Engine, ReadPolicy};
use tracing_subscriber::{fmt, EnvFilter};

/// ParamKV Server
#[derive(Parser, Debug)]
#[command(name = "paramkv-server")]
#[command(about = "Persistent namespaced parameter store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./paramkv_data")]
    data_dir: String,

    /// Document file name inside the data directory
    #[arg(short, long, default_value = "parameters.json")]
    file_name: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    listen: String,

    /// Maximum queued connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Worker threads serving connections
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Advisory parameter limit (logged, not enforced)
    #[arg(long, default_value = "10000")]
    max_parameters: usize,

    /// Refuse to start on an unreadable document instead of treating it as empty
    #[arg(long)]
    strict: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .file_name(&args.file_name)
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .worker_threads(args.workers)
        .max_parameter_count(args.max_parameters)
        .read_policy(if args.strict {
            ReadPolicy::Strict
        } else {
            ReadPolicy::FailOpen
        })
        .enable_logging(!args.quiet)
        .build();

    // Initialize tracing/logging
    let default_filter = if config.enable_logging {
        "info,paramkv=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    tracing::info!("ParamKV Server v{}", paramkv::VERSION);
    tracing::info!("Data file: {}", config.data_file().display());
    tracing::info!("Listen address: {}", config.listen_addr);

    // Open engine
    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Engine initialized successfully");

    let server = match Server::bind(config, engine) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    // Set up Ctrl+C handler
    let shutdown_flag = server.shutdown_flag();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, initiating shutdown...");
        shutdown_flag.store(true, Ordering::Relaxed);
    }) {
        tracing::warn!("Failed to install Ctrl+C handler: {}", e);
    }

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
