//! Connection-oriented (TCP) echo client and server
//!
//! The server accepts exactly one connection per run and performs a single
//! request/reply exchange before closing both sockets; the client performs
//! the inverse single exchange.

pub mod client;
pub mod config;
pub mod server;

pub use client::StreamEchoClient;
pub use config::{StreamClientConfig, StreamServerConfig};
pub use server::{BoundStreamServer, Exchange, StreamEchoServer};
