//! Adapter server tests - handshake, roles, command routing

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

use tui_reef::adapter::{
    run_server, ClientCommand, GridShape, InboundCommand, OutboundMessage, ServerConfig,
};
use tui_reef::types::{GameAction, Pos};

type Lines = tokio::io::Lines<BufReader<tokio::net::tcp::OwnedReadHalf>>;

async fn start_test_server() -> (
    std::net::SocketAddr,
    mpsc::Receiver<InboundCommand>,
    mpsc::UnboundedSender<OutboundMessage>,
    Arc<AtomicUsize>,
) {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_pending_commands: 8,
        log_path: None,
        grid: GridShape {
            width: 7,
            height: 9,
        },
    };
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (ready_tx, ready_rx) = oneshot::channel();
    let count = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&count);
    tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx), counter).await;
    });

    let addr = ready_rx.await.expect("server should report its address");
    (addr, cmd_rx, out_tx, count)
}

async fn connect(addr: std::net::SocketAddr) -> (Lines, tokio::net::tcp::OwnedWriteHalf) {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, write_half) = stream.into_split();
    (BufReader::new(read_half).lines(), write_half)
}

fn hello_line(seq: u64, name: &str) -> String {
    format!(
        "{{\"type\":\"hello\",\"seq\":{},\"ts\":1,\"client\":{{\"name\":\"{}\",\"version\":\"1.0\"}},\"protocol_version\":\"1.0.0\",\"requested\":{{\"stream_observations\":true}}}}\n",
        seq, name
    )
}

#[tokio::test]
async fn test_first_client_becomes_controller() {
    let (addr, _cmd_rx, _out_tx, count) = start_test_server().await;

    let (mut lines, mut writer) = connect(addr).await;
    writer.write_all(hello_line(1, "first").as_bytes()).await.unwrap();

    let welcome = lines.next_line().await.unwrap().unwrap();
    assert!(welcome.contains(r#""type":"welcome""#));
    assert!(welcome.contains(r#""role":"controller""#));
    assert!(welcome.contains(r#""width":7"#));

    let (mut lines2, mut writer2) = connect(addr).await;
    writer2.write_all(hello_line(1, "second").as_bytes()).await.unwrap();

    let welcome2 = lines2.next_line().await.unwrap().unwrap();
    assert!(welcome2.contains(r#""role":"observer""#));

    // Both connections are counted.
    assert_eq!(count.load(Ordering::Relaxed), 2);
}

#[tokio::test]
async fn test_swap_command_reaches_game_loop() {
    let (addr, mut cmd_rx, out_tx, _count) = start_test_server().await;

    let (mut lines, mut writer) = connect(addr).await;
    writer.write_all(hello_line(1, "bot").as_bytes()).await.unwrap();
    let _welcome = lines.next_line().await.unwrap().unwrap();

    writer
        .write_all(
            b"{\"type\":\"command\",\"seq\":2,\"ts\":5,\"mode\":\"swap\",\"swap\":{\"ax\":2,\"ay\":0,\"bx\":2,\"by\":1}}\n",
        )
        .await
        .unwrap();

    let inbound = cmd_rx.recv().await.expect("command should be forwarded");
    assert_eq!(inbound.seq, 2);
    match inbound.command {
        ClientCommand::Swap { a, b } => {
            assert_eq!(a, Pos::new(2, 0));
            assert_eq!(b, Pos::new(2, 1));
        }
        other => panic!("expected swap, got {:?}", other),
    }

    // The game loop's reply is routed back to the commanding client.
    out_tx
        .send(OutboundMessage::ToClient {
            client_id: inbound.client_id,
            line: r#"{"type":"ack","seq":2,"ts":6,"status":"ok","rounds":1,"score_delta":10}"#
                .to_string(),
        })
        .unwrap();

    let ack = lines.next_line().await.unwrap().unwrap();
    assert!(ack.contains(r#""status":"ok""#));
}

#[tokio::test]
async fn test_action_command_parses_to_game_action() {
    let (addr, mut cmd_rx, _out_tx, _count) = start_test_server().await;

    let (mut lines, mut writer) = connect(addr).await;
    writer.write_all(hello_line(1, "bot").as_bytes()).await.unwrap();
    let _welcome = lines.next_line().await.unwrap().unwrap();

    writer
        .write_all(b"{\"type\":\"command\",\"seq\":3,\"ts\":5,\"mode\":\"action\",\"action\":\"pause\"}\n")
        .await
        .unwrap();

    let inbound = cmd_rx.recv().await.unwrap();
    assert!(matches!(
        inbound.command,
        ClientCommand::Action(GameAction::Pause)
    ));
}

#[tokio::test]
async fn test_observer_cannot_command() {
    let (addr, mut cmd_rx, _out_tx, _count) = start_test_server().await;

    let (mut lines, mut writer) = connect(addr).await;
    writer.write_all(hello_line(1, "first").as_bytes()).await.unwrap();
    let _ = lines.next_line().await.unwrap().unwrap();

    let (mut lines2, mut writer2) = connect(addr).await;
    writer2.write_all(hello_line(1, "second").as_bytes()).await.unwrap();
    let _ = lines2.next_line().await.unwrap().unwrap();

    writer2
        .write_all(b"{\"type\":\"command\",\"seq\":2,\"ts\":5,\"mode\":\"action\",\"action\":\"pause\"}\n")
        .await
        .unwrap();

    let error = lines2.next_line().await.unwrap().unwrap();
    assert!(error.contains(r#""type":"error""#));
    assert!(error.contains("not_controller"));

    // Nothing reaches the game loop.
    assert!(cmd_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_command_before_hello_is_rejected() {
    let (addr, mut cmd_rx, _out_tx, _count) = start_test_server().await;

    let (mut lines, mut writer) = connect(addr).await;
    writer
        .write_all(b"{\"type\":\"command\",\"seq\":1,\"ts\":5,\"mode\":\"action\",\"action\":\"pause\"}\n")
        .await
        .unwrap();

    let error = lines.next_line().await.unwrap().unwrap();
    assert!(error.contains("not_handshaken"));
    assert!(cmd_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_broadcast_reaches_streaming_clients() {
    let (addr, _cmd_rx, out_tx, _count) = start_test_server().await;

    let (mut lines, mut writer) = connect(addr).await;
    writer.write_all(hello_line(1, "watcher").as_bytes()).await.unwrap();
    let _ = lines.next_line().await.unwrap().unwrap();

    out_tx
        .send(OutboundMessage::Broadcast {
            line: r#"{"type":"observation","seq":9,"ts":1,"level":1}"#.to_string(),
        })
        .unwrap();

    let observation = lines.next_line().await.unwrap().unwrap();
    assert!(observation.contains(r#""type":"observation""#));
}

#[tokio::test]
async fn test_invalid_json_gets_error() {
    let (addr, _cmd_rx, _out_tx, _count) = start_test_server().await;

    let (mut lines, mut writer) = connect(addr).await;
    writer.write_all(b"this is not json\n").await.unwrap();

    let error = lines.next_line().await.unwrap().unwrap();
    assert!(error.contains("invalid_json"));
}
