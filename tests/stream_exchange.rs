use echopair::stream::config::{STREAM_REPLY, STREAM_REQUEST};
use echopair::stream::{StreamClientConfig, StreamEchoClient, StreamEchoServer, StreamServerConfig};
use echopair::{EchoError, Received};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::timeout;

fn server_config() -> StreamServerConfig {
    StreamServerConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        ..Default::default()
    }
}

fn client_config(port: u16) -> StreamClientConfig {
    StreamClientConfig {
        port,
        ..Default::default()
    }
}

/// Runs one full server/client exchange on an ephemeral port and returns
/// what each side observed.
async fn run_exchange(
    server_config: StreamServerConfig,
    mut client_config: StreamClientConfig,
) -> (echopair::stream::Exchange, Received) {
    let bound = StreamEchoServer::new(server_config).bind().await.unwrap();
    client_config.port = bound.local_addr().unwrap().port();
    let server = tokio::spawn(bound.serve_one());

    let client = StreamEchoClient::new(client_config);
    let reply = timeout(Duration::from_secs(5), client.run())
        .await
        .expect("client timed out")
        .unwrap();

    let exchange = timeout(Duration::from_secs(5), server)
        .await
        .expect("server timed out")
        .unwrap()
        .unwrap();

    (exchange, reply)
}

/// Scenario A: the fixed greetings cross the wire byte-for-byte in both
/// directions and both sides complete.
#[tokio::test]
async fn fixed_greetings_round_trip() {
    let (exchange, reply) = run_exchange(server_config(), client_config(0)).await;

    assert_eq!(exchange.request, Received::Bytes(STREAM_REQUEST.to_vec()));
    assert_eq!(reply, Received::Bytes(STREAM_REPLY.to_vec()));
}

#[tokio::test]
async fn request_of_exactly_max_len_is_intact() {
    let config = server_config();
    let max = config.max_message_len();
    let data: Vec<u8> = (0..max).map(|i| (i % 256) as u8).collect();

    let client_config = StreamClientConfig {
        request: data.clone(),
        ..client_config(0)
    };
    let (exchange, reply) = run_exchange(config, client_config).await;

    assert_eq!(exchange.request, Received::Bytes(data));
    assert_eq!(reply, Received::Bytes(STREAM_REPLY.to_vec()));
}

#[tokio::test]
async fn oversized_request_is_truncated_by_the_receiver() {
    let config = server_config();
    let max = config.max_message_len();
    let data: Vec<u8> = (0..2 * config.buffer_size).map(|i| (i % 251) as u8).collect();

    let bound = StreamEchoServer::new(config).bind().await.unwrap();
    let addr = bound.local_addr().unwrap();
    let server = tokio::spawn(bound.serve_one());

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream.write_all(&data).await.unwrap();

    let exchange = timeout(Duration::from_secs(5), server)
        .await
        .expect("server timed out")
        .unwrap()
        .unwrap();
    assert_eq!(exchange.request, Received::Bytes(data[..max].to_vec()));
    drop(stream);
}

/// Scenario C: a second server on an occupied port must fail to bind with a
/// connectivity error, never silently succeed or block.
#[tokio::test]
async fn bind_to_occupied_port_fails() {
    let first = StreamEchoServer::new(server_config()).bind().await.unwrap();
    let addr = first.local_addr().unwrap();

    let second = StreamEchoServer::new(StreamServerConfig {
        bind_addr: addr,
        ..Default::default()
    });
    match second.bind().await {
        Err(EchoError::Connectivity(op, e)) => {
            assert_eq!(op, "bind");
            assert_eq!(e.kind(), std::io::ErrorKind::AddrInUse);
        }
        other => panic!("expected bind failure, got {:?}", other.map(|_| ())),
    }
}

/// Successive runs against freshly started servers carry no residual state.
#[tokio::test]
async fn repeated_runs_are_independent() {
    for _ in 0..3 {
        let (exchange, reply) = run_exchange(server_config(), client_config(0)).await;
        assert_eq!(exchange.request, Received::Bytes(STREAM_REQUEST.to_vec()));
        assert_eq!(reply, Received::Bytes(STREAM_REPLY.to_vec()));
    }
}

/// A server that reads the request and closes without replying is reported
/// as a closed peer by the client, not as an error.
#[tokio::test]
async fn client_reports_peer_closed_when_server_does_not_reply() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buffer = [0u8; 1024];
        let _ = stream.read(&mut buffer).await.unwrap();
        // Close without sending anything.
    });

    let client = StreamEchoClient::new(client_config(addr.port()));
    let reply = timeout(Duration::from_secs(5), client.run())
        .await
        .expect("client timed out")
        .unwrap();
    assert_eq!(reply, Received::PeerClosed);
}

#[tokio::test]
async fn connect_to_closed_port_is_a_connectivity_error() {
    // Bind and immediately drop to find a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = StreamEchoClient::new(client_config(addr.port()));
    match client.run().await {
        Err(EchoError::Connectivity(op, _)) => assert_eq!(op, "connect"),
        other => panic!("expected connect failure, got {:?}", other.map(|_| ())),
    }
}

/// The server replies with whatever payload it was configured with, not a
/// cached constant.
#[tokio::test]
async fn configured_reply_is_sent_verbatim() {
    let reply_payload = b"custom reply".to_vec();
    let config = StreamServerConfig {
        reply: reply_payload.clone(),
        ..server_config()
    };
    let bound = StreamEchoServer::new(config).bind().await.unwrap();
    let addr = bound.local_addr().unwrap();
    let server = tokio::spawn(bound.serve_one());

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"hello").await.unwrap();

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).await.unwrap();
    assert_eq!(reply, reply_payload);

    server.await.unwrap().unwrap();
}
