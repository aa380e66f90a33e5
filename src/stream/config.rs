use std::net::SocketAddr;

/// Request sent by the stream client when none is configured.
pub const STREAM_REQUEST: &[u8] = b"Hello from TCP client!";

/// Reply sent by the stream server when none is configured.
pub const STREAM_REPLY: &[u8] = b"Hello from TCP server!";

/// Configuration for the stream echo server
///
/// # Examples
///
/// ```
/// use echopair::stream::StreamServerConfig;
///
/// let config = StreamServerConfig::default();
/// assert_eq!(config.backlog, 5);
/// assert_eq!(config.buffer_size, 1024);
/// ```
#[derive(Debug, Clone)]
pub struct StreamServerConfig {
    /// Address to bind the listening socket to (wildcard by default)
    pub bind_addr: SocketAddr,
    /// Pending-connection queue length for the listening socket
    pub backlog: u32,
    /// Buffer size for receiving data; one slot is reserved for a
    /// display-only terminator, so at most `buffer_size - 1` bytes are read
    pub buffer_size: usize,
    /// Set SO_REUSEADDR before binding (helps with quick restarts)
    pub reuse_addr: bool,
    /// Reply payload sent after a non-empty request
    pub reply: Vec<u8>,
}

impl Default for StreamServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".parse().unwrap(),
            backlog: 5,
            buffer_size: 1024,
            reuse_addr: true,
            reply: STREAM_REPLY.to_vec(),
        }
    }
}

impl StreamServerConfig {
    /// Maximum number of request bytes accepted in one receive; anything
    /// longer is truncated by the receiver.
    pub fn max_message_len(&self) -> usize {
        self.buffer_size.saturating_sub(1)
    }
}

/// Configuration for the stream echo client
///
/// The destination is kept as a textual IPv4 literal and validated when the
/// client runs, so a malformed address surfaces as an address error rather
/// than a panic.
///
/// # Examples
///
/// ```
/// use echopair::stream::StreamClientConfig;
///
/// let config = StreamClientConfig::default();
/// assert_eq!(config.server_ip, "127.0.0.1");
/// assert_eq!(config.port, 8080);
/// ```
#[derive(Debug, Clone)]
pub struct StreamClientConfig {
    /// Destination IPv4 address, as text (loopback by default)
    pub server_ip: String,
    /// Destination port
    pub port: u16,
    /// Buffer size for receiving the reply; at most `buffer_size - 1` bytes
    /// are read
    pub buffer_size: usize,
    /// Request payload sent after connecting
    pub request: Vec<u8>,
}

impl Default for StreamClientConfig {
    fn default() -> Self {
        Self {
            server_ip: "127.0.0.1".to_string(),
            port: 8080,
            buffer_size: 1024,
            request: STREAM_REQUEST.to_vec(),
        }
    }
}

impl StreamClientConfig {
    /// Maximum number of reply bytes accepted in one receive.
    pub fn max_message_len(&self) -> usize {
        self.buffer_size.saturating_sub(1)
    }
}
