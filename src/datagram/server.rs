use super::config::DatagramServerConfig;
use crate::{EchoError, Result};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::UdpSocket, signal};
use tracing::{error, info, warn};

/// Datagram echo server that answers every sender at its own endpoint
///
/// The server binds once; setup failures are fatal. The receive loop then
/// runs until shut down: per-iteration receive or send failures are logged
/// and the loop continues, so one bad peer never takes the server down.
/// Each reply goes to the endpoint captured at receive time, never a cached
/// one.
///
/// # Examples
///
/// Server with graceful shutdown:
///
/// ```no_run
/// use echopair::datagram::{DatagramEchoServer, DatagramServerConfig};
///
/// #[tokio::main]
/// async fn main() -> echopair::Result<()> {
///     let server = DatagramEchoServer::new(DatagramServerConfig::default());
///     let shutdown = server.shutdown_signal();
///
///     let handle = tokio::spawn(async move { server.run().await });
///
///     // ... later
///     let _ = shutdown.send(());
///     handle.await.expect("server task panicked")?;
///     Ok(())
/// }
/// ```
pub struct DatagramEchoServer {
    config: DatagramServerConfig,
    shutdown_signal: Arc<tokio::sync::broadcast::Sender<()>>,
}

impl DatagramEchoServer {
    /// Creates a new datagram echo server with the given configuration
    pub fn new(config: DatagramServerConfig) -> Self {
        let (shutdown_signal, _) = tokio::sync::broadcast::channel(1);
        Self {
            config,
            shutdown_signal: Arc::new(shutdown_signal),
        }
    }

    /// Returns a shutdown signal sender that can be used to stop the
    /// receive loop
    pub fn shutdown_signal(&self) -> tokio::sync::broadcast::Sender<()> {
        self.shutdown_signal.as_ref().clone()
    }

    /// Creates and binds the datagram socket
    ///
    /// Socket creation and bind are distinct steps so each failure is
    /// reported at the point of detection; both are fatal. SO_REUSEADDR is
    /// set before bind when configured, with a warning when the option
    /// cannot be set.
    pub async fn bind(&self) -> Result<BoundDatagramServer> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(EchoError::Resource)?;

        if self.config.reuse_addr {
            if let Err(e) = socket.set_reuse_address(true) {
                warn!(error = %e, "setting SO_REUSEADDR failed, continuing without it");
            }
        }

        socket
            .bind(&self.config.bind_addr.into())
            .map_err(|e| EchoError::Connectivity("bind", e))?;
        socket.set_nonblocking(true).map_err(EchoError::Resource)?;
        let socket = UdpSocket::from_std(socket.into()).map_err(EchoError::Resource)?;

        info!(address = %self.config.bind_addr, "datagram echo server listening");

        Ok(BoundDatagramServer {
            socket,
            config: self.config.clone(),
            shutdown_rx: self.shutdown_signal.subscribe(),
        })
    }

    /// Binds and runs the receive loop in one call
    pub async fn run(&self) -> Result<()> {
        self.bind().await?.serve().await
    }
}

/// A datagram echo server whose socket is already bound
pub struct BoundDatagramServer {
    socket: UdpSocket,
    config: DatagramServerConfig,
    shutdown_rx: tokio::sync::broadcast::Receiver<()>,
}

impl BoundDatagramServer {
    /// Returns the address the socket is bound to
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Runs the receive loop until a shutdown signal or ctrl-c
    ///
    /// One datagram is handled per iteration, strictly sequentially. A
    /// zero-length datagram is logged and skipped without a reply; receive
    /// and send failures are logged and the loop continues. Datagrams longer
    /// than `buffer_size - 1` bytes are truncated by the receiver.
    pub async fn serve(mut self) -> Result<()> {
        let mut buffer = vec![0u8; self.config.buffer_size];
        let cap = self.config.max_message_len();

        loop {
            tokio::select! {
                recv_result = self.socket.recv_from(&mut buffer[..cap]) => {
                    match recv_result {
                        Ok((0, addr)) => {
                            info!(%addr, "received empty datagram, skipping");
                        }
                        Ok((n, addr)) => {
                            let preview = String::from_utf8_lossy(&buffer[..n]);
                            info!(%addr, size = n, preview = %preview, "received datagram");

                            // Reply to the endpoint captured on this receive.
                            if let Err(e) = self.socket.send_to(&self.config.reply, addr).await {
                                error!(%addr, error = %e, "failed to send echo response");
                            } else {
                                info!(%addr, size = self.config.reply.len(), "response sent");
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "failed to receive datagram");
                        }
                    }
                }
                _ = signal::ctrl_c() => {
                    info!("received shutdown signal, stopping server");
                    break;
                }
                _ = self.shutdown_rx.recv() => {
                    info!("received internal shutdown signal, stopping server");
                    break;
                }
            }
        }

        info!("datagram echo server stopped");
        Ok(())
    }
}
