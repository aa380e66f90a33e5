use std::net::AddrParseError;
use thiserror::Error;

/// Error types for the echopair library
///
/// Setup failures (`Resource`, `Address`, `Connectivity`) are fatal to the
/// component that hit them; `Transfer` is fatal everywhere except inside the
/// datagram server's receive loop, which logs it and keeps serving.
#[derive(Error, Debug)]
pub enum EchoError {
    /// Socket creation failed (OS resource exhaustion or permissions)
    #[error("could not create socket: {0}")]
    Resource(#[source] std::io::Error),

    /// Destination address string is not a well-formed IPv4 literal
    #[error("invalid IPv4 address {0:?}: {1}")]
    Address(String, #[source] AddrParseError),

    /// Bind, listen, connect, or accept failed
    #[error("{0} failed: {1}")]
    Connectivity(&'static str, #[source] std::io::Error),

    /// Send or receive returned an OS-level failure
    #[error("{0} failed: {1}")]
    Transfer(&'static str, #[source] std::io::Error),
}

/// Result type for the echopair library
pub type Result<T> = std::result::Result<T, EchoError>;

/// Outcome of the receive half of an exchange.
///
/// A zero-byte receive is a normal terminal event, not an error: on a stream
/// socket it means the peer closed the connection; the datagram client
/// reports it the same way when a reply datagram carries no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    /// The peer answered with a payload.
    Bytes(Vec<u8>),
    /// The peer closed the connection (stream) or replied with no data.
    PeerClosed,
}

impl Received {
    /// Returns the payload if one was received.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Received::Bytes(data) => Some(data),
            Received::PeerClosed => None,
        }
    }
}

pub mod datagram;
pub mod stream;

// Re-export main types for convenience
pub use datagram::{
    DatagramClientConfig, DatagramEchoClient, DatagramEchoServer, DatagramServerConfig,
};
pub use stream::{StreamClientConfig, StreamEchoClient, StreamEchoServer, StreamServerConfig};
