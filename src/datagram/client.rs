use super::config::DatagramClientConfig;
use crate::{EchoError, Received, Result};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::info;

/// Datagram echo client that performs a single send/receive exchange
///
/// There is no connect step: the client binds an ephemeral socket, sends one
/// datagram to the configured destination, and waits for one reply. The
/// socket is released on every exit path.
///
/// # Examples
///
/// ```no_run
/// use echopair::datagram::{DatagramEchoClient, DatagramClientConfig};
/// use echopair::Received;
///
/// #[tokio::main]
/// async fn main() -> echopair::Result<()> {
///     let client = DatagramEchoClient::new(DatagramClientConfig::default());
///     match client.run().await? {
///         Received::Bytes(reply) => println!("{}", String::from_utf8_lossy(&reply)),
///         Received::PeerClosed => println!("no data received"),
///     }
///     Ok(())
/// }
/// ```
pub struct DatagramEchoClient {
    config: DatagramClientConfig,
}

impl DatagramEchoClient {
    /// Creates a new datagram echo client with the given configuration
    pub fn new(config: DatagramClientConfig) -> Self {
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

    /// Sends the configured request and waits for one reply datagram
    ///
    /// The replying endpoint is captured per receive, logged, and discarded.
    /// A zero-byte reply is reported as [`Received::PeerClosed`] ("no data
    /// received"), not as an error. Replies longer than `buffer_size - 1`
    /// bytes are truncated by the receiver.
    pub async fn run(&self) -> Result<Received> {
        let addr = self.server_addr()?;

        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .map_err(EchoError::Resource)?;

        socket
            .send_to(&self.config.request, addr)
            .await
            .map_err(|e| EchoError::Transfer("send", e))?;

        let preview = String::from_utf8_lossy(&self.config.request);
        info!(%addr, size = self.config.request.len(), preview = %preview, "request sent");

        let mut buffer = vec![0u8; self.config.buffer_size];
        let cap = self.config.max_message_len();
        let (n, from) = socket
            .recv_from(&mut buffer[..cap])
            .await
            .map_err(|e| EchoError::Transfer("receive", e))?;

        if n == 0 {
            info!(%from, "no data received");
            return Ok(Received::PeerClosed);
        }

        let preview = String::from_utf8_lossy(&buffer[..n]);
        info!(%from, size = n, preview = %preview, "reply received");

        Ok(Received::Bytes(buffer[..n].to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn malformed_address_is_an_address_error() {
        let config = DatagramClientConfig {
            server_ip: "256.1.1.1".to_string(),
            ..Default::default()
        };
        let client = DatagramEchoClient::new(config);
        assert!(matches!(client.run().await, Err(EchoError::Address(_, _))));
    }
}
