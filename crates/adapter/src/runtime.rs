//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server. The tokio runtime
//! lives here; the game loop polls `try_recv` once per frame and pushes
//! outbound lines without ever blocking.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::server::{run_server, ServerConfig};
use crate::types::{GameAction, Pos};

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub command: ClientCommand,
}

/// Command payload.
#[derive(Debug, Clone)]
pub enum ClientCommand {
    Swap { a: Pos, b: Pos },
    Action(GameAction),
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    Broadcast { line: String },
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    client_count: Arc<AtomicUsize>,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns None if `REEF_AI_DISABLED` is set or the runtime cannot start.
    pub fn start_from_env(grid_width: u8, grid_height: u8) -> Option<Self> {
        if ServerConfig::is_disabled() {
            return None;
        }

        let config = ServerConfig::from_env(grid_width, grid_height);
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let client_count = Arc::new(AtomicUsize::new(0));

        let rt = Runtime::new().ok()?;
        let counter = Arc::clone(&client_count);
        rt.spawn(async move {
            let _ = run_server(config, cmd_tx, out_rx, None, counter).await;
        });

        Some(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            client_count,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    /// Currently connected clients (for the UI status line).
    pub fn client_count(&self) -> usize {
        self.client_count.load(Ordering::Relaxed)
    }
}
