//! Adapter module - remote control via TCP socket with JSON protocol
//!
//! This module enables external clients (bots, test harnesses, spectators) to
//! drive and observe a play session over a **line-delimited JSON protocol**:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7711)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Observation Streaming**: Server sends session snapshots after every
//!    state change
//! 5. **Commanding**: Controller submits swaps or UI actions
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and requested capabilities
//! - **command**: `swap` mode (two cell coordinates) or `action` mode
//!   (pause / restart / nextLevel)
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello with assigned role and grid shape
//! - **observation**: Full session snapshot (grid, goals, score, timer, ...)
//! - **ack**: Command acknowledgment with the swap outcome
//! - **error**: Error response with code and message
//! - **session_end**: Terminal outcome once the timer expires
//!
//! # Environment Variables
//!
//! - `REEF_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `REEF_AI_PORT`: Port number (default: 7711)
//! - `REEF_AI_DISABLED`: Set to "1" or "true" to disable the adapter entirely
//! - `REEF_AI_LOG`: Path for an optional JSON-lines protocol log
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1,"client":{"name":"bot","version":"1.0"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":2,"protocol_version":"1.0.0","role":"controller","grid":{"width":7,"height":9}}
//! Server -> Client: {"type":"observation","seq":2,"ts":3,...}
//! Client -> Server: {"type":"command","seq":2,"ts":4,"mode":"swap","swap":{"ax":2,"ay":0,"bx":2,"by":1}}
//! Server -> Client: {"type":"ack","seq":3,"ts":5,"status":"ok","rounds":1,"score_delta":10}
//! ```
//!
//! # Implementation
//!
//! - Uses **tokio** for async networking; the runtime lives inside
//!   [`runtime::Adapter`] and bridges to the sync game loop over channels
//! - Multiple clients can connect (only one controller at a time; the oldest
//!   surviving client inherits control when the controller disconnects)
//! - See [`protocol`] for message structure definitions
//! - See [`server`] for the TCP server implementation

pub mod protocol;
pub mod runtime;
pub mod server;

pub use tui_reef_core as core;
pub use tui_reef_types as types;

pub use protocol::*;
pub use runtime::{Adapter, ClientCommand, InboundCommand, OutboundMessage};
pub use server::{now_ms, run_server, ServerConfig};
