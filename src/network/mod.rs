//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor thread (non-blocking accept loop, polls shutdown flag)
//! - Fixed worker pool fed through a bounded channel
//! - Requests routed through `RequestService` to the Engine

mod server;
mod connection;

pub use server::Server;
pub use connection::Connection;
