use super::config::StreamClientConfig;
use crate::{EchoError, Received, Result};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpSocket,
};
use tracing::info;

/// Stream echo client that performs a single request/reply exchange
///
/// The client connects to the configured server endpoint, sends one request,
/// waits for one reply, and closes the socket. The socket is released on
/// every exit path, including after any failure.
///
/// # Examples
///
/// ```no_run
/// use echopair::stream::{StreamEchoClient, StreamClientConfig};
/// use echopair::Received;
///
/// #[tokio::main]
/// async fn main() -> echopair::Result<()> {
///     let client = StreamEchoClient::new(StreamClientConfig::default());
///     match client.run().await? {
///         Received::Bytes(reply) => println!("{}", String::from_utf8_lossy(&reply)),
///         Received::PeerClosed => println!("server closed the connection"),
///     }
///     Ok(())
/// }
/// ```
pub struct StreamEchoClient {
    config: StreamClientConfig,
}

impl StreamEchoClient {
    /// Creates a new stream echo client with the given configuration
    pub fn new(config: StreamClientConfig) -> Self {
        Self { config }
    }

    /// Validates the textual destination address as an IPv4 literal
    fn server_addr(&self) -> Result<SocketAddr> {
        let ip: Ipv4Addr = self
            .config
            .server_ip
            .parse()
            .map_err(|e| EchoError::Address(self.config.server_ip.clone(), e))?;
        Ok(SocketAddr::from((ip, self.config.port)))
    }

    /// Connects, sends the configured request, and waits for one reply
    ///
    /// A zero-byte receive means the server closed without replying; this is
    /// reported as [`Received::PeerClosed`], not as an error. Replies longer
    /// than `buffer_size - 1` bytes are truncated by the receiver.
    pub async fn run(&self) -> Result<Received> {
        let addr = self.server_addr()?;

        let socket = TcpSocket::new_v4().map_err(EchoError::Resource)?;
        let mut stream = socket
            .connect(addr)
            .await
            .map_err(|e| EchoError::Connectivity("connect", e))?;

        info!(%addr, "connected to server");

        stream
            .write_all(&self.config.request)
            .await
            .map_err(|e| EchoError::Transfer("send", e))?;
        stream
            .flush()
            .await
            .map_err(|e| EchoError::Transfer("send", e))?;

        let preview = String::from_utf8_lossy(&self.config.request);
        info!(size = self.config.request.len(), preview = %preview, "request sent");

        let mut buffer = vec![0u8; self.config.buffer_size];
        let cap = self.config.max_message_len();
        let n = stream
            .read(&mut buffer[..cap])
            .await
            .map_err(|e| EchoError::Transfer("receive", e))?;

        if n == 0 {
            info!("server closed the connection");
            return Ok(Received::PeerClosed);
        }

        let preview = String::from_utf8_lossy(&buffer[..n]);
        info!(size = n, preview = %preview, "reply received");

        Ok(Received::Bytes(buffer[..n].to_vec()))
    }
}
