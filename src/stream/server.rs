use super::config::StreamServerConfig;
use crate::{EchoError, Received, Result};
use std::net::SocketAddr;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpSocket},
};
use tracing::{info, warn};

/// The single request/reply exchange observed by [`StreamEchoServer`].
#[derive(Debug)]
pub struct Exchange {
    /// Endpoint of the peer that connected.
    pub peer: SocketAddr,
    /// Request received, or [`Received::PeerClosed`] if the peer
    /// disconnected without sending anything (in which case no reply is
    /// sent).
    pub request: Received,
}

/// Stream echo server that accepts exactly one connection per run
///
/// The server binds a listening socket, accepts a single peer, performs one
/// request/reply exchange, and closes the accepted socket followed by the
/// listening socket. Serving more than one connection is intentionally out
/// of scope; run the server again for the next exchange.
///
/// # Examples
///
/// ```no_run
/// use echopair::stream::{StreamEchoServer, StreamServerConfig};
///
/// #[tokio::main]
/// async fn main() -> echopair::Result<()> {
///     let server = StreamEchoServer::new(StreamServerConfig::default());
///     let exchange = server.run().await?;
///     println!("served {}", exchange.peer);
///     Ok(())
/// }
/// ```
pub struct StreamEchoServer {
    config: StreamServerConfig,
}

impl StreamEchoServer {
    /// Creates a new stream echo server with the given configuration
    pub fn new(config: StreamServerConfig) -> Self {
        Self { config }
    }

    /// Creates the listening socket: socket creation, optional address
    /// reuse, bind, and listen are distinct steps so each failure is
    /// reported at the point of detection.
    pub async fn bind(&self) -> Result<BoundStreamServer> {
        let socket = TcpSocket::new_v4().map_err(EchoError::Resource)?;

        if self.config.reuse_addr {
            if let Err(e) = socket.set_reuseaddr(true) {
                warn!(error = %e, "setting SO_REUSEADDR failed, continuing without it");
            }
        }

        socket
            .bind(self.config.bind_addr)
            .map_err(|e| EchoError::Connectivity("bind", e))?;
        let listener = socket
            .listen(self.config.backlog)
            .map_err(|e| EchoError::Connectivity("listen", e))?;

        info!(address = %self.config.bind_addr, backlog = self.config.backlog, "stream echo server listening");

        Ok(BoundStreamServer {
            listener,
            config: self.config.clone(),
        })
    }

    /// Binds and serves the single exchange in one call
    pub async fn run(&self) -> Result<Exchange> {
        self.bind().await?.serve_one().await
    }
}

/// A stream echo server whose listening socket is already bound
///
/// Splitting bind from serve lets callers learn the actual local address
/// (useful when binding to port 0) before the blocking accept starts.
pub struct BoundStreamServer {
    listener: TcpListener,
    config: StreamServerConfig,
}

impl BoundStreamServer {
    /// Returns the address the listening socket is bound to
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts one connection, performs one request/reply exchange, and
    /// closes both sockets
    ///
    /// Blocks until a peer connects. A zero-byte receive means the peer
    /// closed without sending: the reply is suppressed and the exchange
    /// reports [`Received::PeerClosed`]. Requests longer than
    /// `buffer_size - 1` bytes are truncated by the receiver. Both sockets
    /// are released on every exit path, the accepted one first.
    pub async fn serve_one(self) -> Result<Exchange> {
        let (mut stream, peer) = self
            .listener
            .accept()
            .await
            .map_err(|e| EchoError::Connectivity("accept", e))?;

        info!(%peer, "accepted connection");

        let mut buffer = vec![0u8; self.config.buffer_size];
        let cap = self.config.max_message_len();
        let n = stream
            .read(&mut buffer[..cap])
            .await
            .map_err(|e| EchoError::Transfer("receive", e))?;

        if n == 0 {
            info!(%peer, "client disconnected without sending");
            return Ok(Exchange {
                peer,
                request: Received::PeerClosed,
            });
        }

        let preview = String::from_utf8_lossy(&buffer[..n]);
        info!(%peer, size = n, preview = %preview, "received request");

        stream
            .write_all(&self.config.reply)
            .await
            .map_err(|e| EchoError::Transfer("send", e))?;
        stream
            .flush()
            .await
            .map_err(|e| EchoError::Transfer("send", e))?;

        info!(%peer, size = self.config.reply.len(), "response sent");

        // Accepted socket released before the listening socket.
        drop(stream);
        drop(self.listener);
        info!("stream echo server closed");

        Ok(Exchange {
            peer,
            request: Received::Bytes(buffer[..n].to_vec()),
        })
    }
}
