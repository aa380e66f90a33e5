use std::net::SocketAddr;

/// Request sent by the datagram client when none is configured.
pub const DATAGRAM_REQUEST: &[u8] = b"Hello from UDP client!";

/// Reply sent by the datagram server when none is configured.
pub const DATAGRAM_REPLY: &[u8] = b"Hello from UDP server!";

/// Configuration for the datagram echo server
///
/// # Examples
///
/// ```
/// use echopair::datagram::DatagramServerConfig;
///
/// let config = DatagramServerConfig::default();
/// assert_eq!(config.buffer_size, 1024);
/// assert!(config.reuse_addr);
/// ```
#[derive(Debug, Clone)]
pub struct DatagramServerConfig {
    /// Address to bind the socket to (wildcard by default)
    pub bind_addr: SocketAddr,
    /// Buffer size for receiving datagrams; one slot is reserved for a
    /// display-only terminator, so at most `buffer_size - 1` bytes are read
    pub buffer_size: usize,
    /// Set SO_REUSEADDR before binding (helps with quick restarts)
    pub reuse_addr: bool,
    /// Reply payload sent to each sender
    pub reply: Vec<u8>,
}

impl Default for DatagramServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".parse().unwrap(),
            buffer_size: 1024,
            reuse_addr: true,
            reply: DATAGRAM_REPLY.to_vec(),
        }
    }
}

impl DatagramServerConfig {
    /// Maximum number of datagram bytes accepted in one receive; anything
    /// longer is truncated by the receiver.
    pub fn max_message_len(&self) -> usize {
        self.buffer_size.saturating_sub(1)
    }
}

/// Configuration for the datagram echo client
#[derive(Debug, Clone)]
pub struct DatagramClientConfig {
    /// Destination IPv4 address, as text (loopback by default)
    pub server_ip: String,
    /// Destination port
    pub port: u16,
    /// Buffer size for receiving the reply; at most `buffer_size - 1` bytes
    /// are read
    pub buffer_size: usize,
    /// Request payload sent to the destination
    pub request: Vec<u8>,
}

impl Default for DatagramClientConfig {
    fn default() -> Self {
        Self {
            server_ip: "127.0.0.1".to_string(),
            port: 8080,
            buffer_size: 1024,
            request: DATAGRAM_REQUEST.to_vec(),
        }
    }
}

impl DatagramClientConfig {
    /// Maximum number of reply bytes accepted in one receive.
    pub fn max_message_len(&self) -> usize {
        self.buffer_size.saturating_sub(1)
    }
}
