use color_eyre::eyre::{Result, WrapErr};
use echopair::datagram::{DatagramClientConfig, DatagramEchoClient, DatagramEchoServer, DatagramServerConfig};
use echopair::stream::{StreamClientConfig, StreamEchoClient, StreamEchoServer, StreamServerConfig};
use echopair::Received;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("echopair=info")
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let role = args
        .get(1)
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "stream-server".to_string());

    let port = args
        .get(2)
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    match role.as_str() {
        "stream-server" => {
            let config = StreamServerConfig {
                bind_addr: format!("0.0.0.0:{}", port).parse().unwrap(),
                ..Default::default()
            };
            info!(address = %config.bind_addr, backlog = config.backlog, "Starting stream echo server");
            let server = StreamEchoServer::new(config);
            server
                .run()
                .await
                .wrap_err("Failed to run stream echo server")?;
        }
        "stream-client" => {
            let config = StreamClientConfig {
                port,
                ..Default::default()
            };
            info!(server_ip = %config.server_ip, port = config.port, "Starting stream echo client");
            let client = StreamEchoClient::new(config);
            match client
                .run()
                .await
                .wrap_err("Failed to run stream echo client")?
            {
                Received::Bytes(reply) => {
                    info!(reply = %String::from_utf8_lossy(&reply), "Exchange complete");
                }
                Received::PeerClosed => {
                    info!("Server closed the connection without replying");
                }
            }
        }
        "datagram-server" => {
            let config = DatagramServerConfig {
                bind_addr: format!("0.0.0.0:{}", port).parse().unwrap(),
                ..Default::default()
            };
            info!(address = %config.bind_addr, "Starting datagram echo server");
            let server = DatagramEchoServer::new(config);
            server
                .run()
                .await
                .wrap_err("Failed to run datagram echo server")?;
        }
        "datagram-client" => {
            let config = DatagramClientConfig {
                port,
                ..Default::default()
            };
            info!(server_ip = %config.server_ip, port = config.port, "Starting datagram echo client");
            let client = DatagramEchoClient::new(config);
            match client
                .run()
                .await
                .wrap_err("Failed to run datagram echo client")?
            {
                Received::Bytes(reply) => {
                    info!(reply = %String::from_utf8_lossy(&reply), "Exchange complete");
                }
                Received::PeerClosed => {
                    info!("No data received");
                }
            }
        }
        _ => {
            eprintln!(
                "Usage: {} [stream-server|stream-client|datagram-server|datagram-client] [port]",
                args[0]
            );
            eprintln!("  role: which side of which transport to run (default: stream-server)");
            eprintln!("  port: service port to bind to or connect to (default: 8080)");
            eprintln!();
            eprintln!("Examples:");
            eprintln!("  {} stream-server 8080     # Serve one TCP exchange on port 8080", args[0]);
            eprintln!("  {} stream-client 8080     # Send one TCP request to 127.0.0.1:8080", args[0]);
            eprintln!("  {} datagram-server 9090   # Echo UDP datagrams on port 9090 until ctrl-c", args[0]);
            eprintln!("  {} datagram-client 9090   # Send one UDP datagram to 127.0.0.1:9090", args[0]);
            std::process::exit(1);
        }
    }

    Ok(())
}
