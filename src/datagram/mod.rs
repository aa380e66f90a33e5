//! Connectionless (UDP) echo client and server
//!
//! The server binds once and answers every datagram at the sender's own
//! endpoint until shut down; the client performs a single send/receive
//! exchange against a fixed destination.

pub mod client;
pub mod config;
pub mod server;

pub use client::DatagramEchoClient;
pub use config::{DatagramClientConfig, DatagramServerConfig};
pub use server::{BoundDatagramServer, DatagramEchoServer};
