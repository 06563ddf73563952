//! TCP server - accepts remote-control clients and routes protocol messages.
//!
//! One listener, many clients. The first client to complete the hello
//! handshake becomes the controller; everyone else observes. Commands flow to
//! the game loop through a bounded channel, responses and observations come
//! back through [`OutboundMessage`].

use std::collections::HashMap;
use std::io::Write as _;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::protocol::{
    build_error, AssignedRole, CommandMessage, CommandMode, GridShape, HelloMessage,
    WelcomeMessage, WelcomeType, PROTOCOL_VERSION,
};
use crate::runtime::{ClientCommand, InboundCommand, OutboundMessage};
use crate::types::{GameAction, Pos};

/// Server configuration, sourced from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_pending_commands: usize,
    pub log_path: Option<String>,
    pub grid: GridShape,
}

impl ServerConfig {
    /// Read configuration from `REEF_AI_*` environment variables.
    pub fn from_env(grid_width: u8, grid_height: u8) -> Self {
        let host = std::env::var("REEF_AI_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("REEF_AI_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(7711);
        let log_path = std::env::var("REEF_AI_LOG").ok();

        Self {
            host,
            port,
            max_pending_commands: 32,
            log_path,
            grid: GridShape {
                width: grid_width,
                height: grid_height,
            },
        }
    }

    /// Whether `REEF_AI_DISABLED` turns the adapter off entirely.
    pub fn is_disabled() -> bool {
        matches!(
            std::env::var("REEF_AI_DISABLED").as_deref(),
            Ok("1") | Ok("true") | Ok("TRUE")
        )
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Per-client bookkeeping held by the server.
struct ClientHandle {
    id: usize,
    is_controller: bool,
    handshaken: bool,
    stream_observations: bool,
    tx: mpsc::UnboundedSender<String>,
}

struct ServerState {
    config: ServerConfig,
    clients: Mutex<HashMap<usize, ClientHandle>>,
    next_id: AtomicUsize,
    client_count: Arc<AtomicUsize>,
    log: Option<std::sync::Mutex<std::fs::File>>,
}

impl ServerState {
    fn new(config: ServerConfig, client_count: Arc<AtomicUsize>) -> Self {
        let log = config.log_path.as_ref().and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
                .map(std::sync::Mutex::new)
        });
        Self {
            config,
            clients: Mutex::new(HashMap::new()),
            next_id: AtomicUsize::new(1),
            client_count,
            log,
        }
    }

    fn log_line(&self, direction: &str, line: &str) {
        if let Some(log) = &self.log {
            if let Ok(mut file) = log.lock() {
                let _ = writeln!(file, "{{\"dir\":\"{}\",\"line\":{}}}", direction, line);
            }
        }
    }

    async fn update_count(&self) {
        let n = self.clients.lock().await.len();
        self.client_count.store(n, Ordering::Relaxed);
    }
}

/// Wall-clock milliseconds for message timestamps.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Run the adapter server until the outbound channel closes.
///
/// `ready` (if given) receives the bound address once the listener is up -
/// tests use it to connect to an OS-assigned port.
pub async fn run_server(
    config: ServerConfig,
    cmd_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready: Option<oneshot::Sender<SocketAddr>>,
    client_count: Arc<AtomicUsize>,
) -> Result<()> {
    let listener = TcpListener::bind(config.socket_addr()).await?;
    if let Some(ready) = ready {
        let _ = ready.send(listener.local_addr()?);
    }

    let state = Arc::new(ServerState::new(config, client_count));

    // Outbound dispatcher: routes game-loop messages to client writers.
    let dispatch_state = Arc::clone(&state);
    tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            let clients = dispatch_state.clients.lock().await;
            match msg {
                OutboundMessage::ToClient { client_id, line } => {
                    dispatch_state.log_line("out", &line);
                    if let Some(client) = clients.get(&client_id) {
                        let _ = client.tx.send(line);
                    }
                }
                OutboundMessage::Broadcast { line } => {
                    dispatch_state.log_line("out", &line);
                    for client in clients.values() {
                        if client.handshaken && client.stream_observations {
                            let _ = client.tx.send(line.clone());
                        }
                    }
                }
            }
        }
    });

    loop {
        let (stream, _addr) = listener.accept().await?;
        let id = state.next_id.fetch_add(1, Ordering::Relaxed);
        let (reader, writer) = stream.into_split();
        let (tx, rx) = mpsc::unbounded_channel::<String>();

        state.clients.lock().await.insert(
            id,
            ClientHandle {
                id,
                is_controller: false,
                handshaken: false,
                stream_observations: false,
                tx,
            },
        );
        state.update_count().await;

        tokio::spawn(write_lines(writer, rx));

        let client_state = Arc::clone(&state);
        let client_cmd_tx = cmd_tx.clone();
        tokio::spawn(async move {
            let _ = handle_client(client_state, id, reader, client_cmd_tx).await;
        });
    }
}

async fn write_lines(mut writer: OwnedWriteHalf, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(line) = rx.recv().await {
        if writer.write_all(line.as_bytes()).await.is_err() {
            break;
        }
        if writer.write_all(b"\n").await.is_err() {
            break;
        }
    }
}

async fn handle_client(
    state: Arc<ServerState>,
    id: usize,
    reader: tokio::net::tcp::OwnedReadHalf,
    cmd_tx: mpsc::Sender<InboundCommand>,
) -> Result<()> {
    let mut lines = BufReader::new(reader).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        state.log_line("in", &line);

        let value: serde_json::Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(_) => {
                send_error(&state, id, 0, "invalid_json", "could not parse message").await;
                continue;
            }
        };
        let seq = value.get("seq").and_then(|s| s.as_u64()).unwrap_or(0);

        match value.get("type").and_then(|t| t.as_str()) {
            Some("hello") => match serde_json::from_value::<HelloMessage>(value) {
                Ok(hello) => handle_hello(&state, id, hello).await,
                Err(_) => {
                    send_error(&state, id, seq, "invalid_hello", "malformed hello message").await
                }
            },
            Some("command") => match serde_json::from_value::<CommandMessage>(value) {
                Ok(command) => handle_command(&state, id, command, &cmd_tx).await,
                Err(_) => {
                    send_error(&state, id, seq, "invalid_command", "malformed command message")
                        .await
                }
            },
            _ => send_error(&state, id, seq, "unknown_type", "unsupported message type").await,
        }
    }

    // Disconnect: drop the handle; if the controller left, the oldest
    // surviving handshaken client inherits control.
    let mut clients = state.clients.lock().await;
    let was_controller = clients.remove(&id).map(|c| c.is_controller).unwrap_or(false);
    if was_controller {
        if let Some(next) = clients
            .values_mut()
            .filter(|c| c.handshaken)
            .min_by_key(|c| c.id)
        {
            next.is_controller = true;
        }
    }
    drop(clients);
    state.update_count().await;
    Ok(())
}

async fn handle_hello(state: &Arc<ServerState>, id: usize, hello: HelloMessage) {
    let mut clients = state.clients.lock().await;
    let controller_taken = clients.values().any(|c| c.is_controller);

    let Some(client) = clients.get_mut(&id) else {
        return;
    };
    client.handshaken = true;
    client.stream_observations = hello.requested.stream_observations;
    client.is_controller = !controller_taken;

    let role = if client.is_controller {
        AssignedRole::Controller
    } else {
        AssignedRole::Observer
    };

    let welcome = WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq: hello.seq,
        ts: now_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        role,
        grid: state.config.grid,
    };
    if let Ok(line) = serde_json::to_string(&welcome) {
        state.log_line("out", &line);
        let _ = client.tx.send(line);
    }
}

async fn handle_command(
    state: &Arc<ServerState>,
    id: usize,
    command: CommandMessage,
    cmd_tx: &mpsc::Sender<InboundCommand>,
) {
    {
        let clients = state.clients.lock().await;
        let Some(client) = clients.get(&id) else {
            return;
        };
        if !client.handshaken {
            drop(clients);
            send_error(state, id, command.seq, "not_handshaken", "hello required first").await;
            return;
        }
        if !client.is_controller {
            drop(clients);
            send_error(state, id, command.seq, "not_controller", "observer cannot command").await;
            return;
        }
    }

    let payload = match (command.mode, command.swap, command.action.as_deref()) {
        (CommandMode::Swap, Some(swap), _) => ClientCommand::Swap {
            a: Pos::new(swap.ax, swap.ay),
            b: Pos::new(swap.bx, swap.by),
        },
        (CommandMode::Action, _, Some(action)) => match GameAction::from_str(action) {
            Some(action) => ClientCommand::Action(action),
            None => {
                send_error(state, id, command.seq, "invalid_action", "unknown action name").await;
                return;
            }
        },
        _ => {
            send_error(state, id, command.seq, "invalid_command", "missing command payload").await;
            return;
        }
    };

    let inbound = InboundCommand {
        client_id: id,
        seq: command.seq,
        command: payload,
    };
    if cmd_tx.send(inbound).await.is_err() {
        send_error(state, id, command.seq, "shutting_down", "game loop is gone").await;
    }
}

async fn send_error(state: &Arc<ServerState>, id: usize, seq: u64, code: &str, message: &str) {
    let error = build_error(seq, now_ms(), code, message);
    if let Ok(line) = serde_json::to_string(&error) {
        state.log_line("out", &line);
        let clients = state.clients.lock().await;
        if let Some(client) = clients.get(&id) {
            let _ = client.tx.send(line);
        }
    }
}
