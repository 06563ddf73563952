//! Protocol module - JSON message types for the remote-control adapter
//!
//! Implements the line-delimited JSON protocol. All messages have: type,
//! seq (sequence number), ts (timestamp in ms).

use serde::{Deserialize, Serialize};

use crate::core::{Achievement, SessionSnapshot};
use crate::types::{Element, Outcome};

/// Protocol version spoken by this adapter
pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Message type tags ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HelloType {
    #[serde(rename = "hello")]
    #[default]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CommandType {
    #[serde(rename = "command")]
    #[default]
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    #[default]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AckType {
    #[serde(rename = "ack")]
    #[default]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ErrorType {
    #[serde(rename = "error")]
    #[default]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    #[default]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SessionEndType {
    #[serde(rename = "session_end")]
    #[default]
    SessionEnd,
}

// ============== Client -> Game Messages ==============

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    pub stream_observations: bool,
}

/// Command message (controller only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub mode: CommandMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap: Option<SwapCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandMode {
    #[serde(rename = "swap")]
    Swap,
    #[serde(rename = "action")]
    Action,
}

/// A swap request: cell A at (ax, ay), cell B at (bx, by)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCommand {
    pub ax: u8,
    pub ay: u8,
    pub bx: u8,
    pub by: u8,
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub role: AssignedRole,
    pub grid: GridShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignedRole {
    #[serde(rename = "controller")]
    Controller,
    #[serde(rename = "observer")]
    Observer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub width: u8,
    pub height: u8,
}

/// Command acknowledgment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    /// "ok" or "rejected"
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Cascade rounds resolved by an accepted swap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_delta: Option<u32>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: String,
    pub message: String,
}

/// Full session snapshot for observers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub level: u32,
    pub score: u32,
    pub time_left: u32,
    pub playing: bool,
    pub paused: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    pub grid: GridObservation,
    pub goals: Vec<GoalObservation>,
    pub achievements: Vec<AchievementObservation>,
    pub seed: u32,
}

/// The grid as rows of element keys (`null` for an empty cell)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridObservation {
    pub width: u8,
    pub height: u8,
    pub rows: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalObservation {
    pub element: String,
    pub target: u32,
    pub collected: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementObservation {
    pub id: String,
    pub element: String,
    pub current_tier: usize,
    pub tiers: usize,
    pub unlocked: bool,
    pub mastered: bool,
}

/// Terminal outcome notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEndMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: SessionEndType,
    pub seq: u64,
    pub ts: u64,
    pub outcome: String,
    pub level: u32,
    pub score: u32,
}

// ============== Builders ==============

/// Encode any protocol message as one line of the wire format.
pub fn to_line<T: Serialize>(msg: &T) -> Option<String> {
    serde_json::to_string(msg).ok()
}

fn achievement_observation(achievement: &Achievement) -> AchievementObservation {
    AchievementObservation {
        id: achievement.id.to_string(),
        element: achievement.element.as_str().to_string(),
        current_tier: achievement.current_tier,
        tiers: achievement.tiers.len(),
        unlocked: achievement.unlocked,
        mastered: achievement.mastered(),
    }
}

/// Map a session snapshot into an observation message
pub fn build_observation(seq: u64, ts: u64, snap: &SessionSnapshot) -> ObservationMessage {
    let rows = snap
        .grid
        .to_rows()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|e| e.map(|e: Element| e.as_str().to_string()))
                .collect()
        })
        .collect();

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts,
        level: snap.level,
        score: snap.score,
        time_left: snap.time_left,
        playing: snap.playing,
        paused: snap.paused,
        outcome: snap.outcome.map(|o| o.as_str().to_string()),
        grid: GridObservation {
            width: snap.grid.width(),
            height: snap.grid.height(),
            rows,
        },
        goals: snap
            .goals
            .iter()
            .map(|g| GoalObservation {
                element: g.element.as_str().to_string(),
                target: g.target,
                collected: g.collected,
                completed: g.completed,
            })
            .collect(),
        achievements: snap.achievements.iter().map(achievement_observation).collect(),
        seed: snap.seed,
    }
}

pub fn build_ack_ok(seq: u64, ts: u64, rounds: u32, score_delta: u32) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts,
        status: "ok".to_string(),
        code: None,
        message: None,
        rounds: Some(rounds),
        score_delta: Some(score_delta),
    }
}

pub fn build_ack_rejected(seq: u64, ts: u64, code: &str, message: &str) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts,
        status: "rejected".to_string(),
        code: Some(code.to_string()),
        message: Some(message.to_string()),
        rounds: None,
        score_delta: None,
    }
}

pub fn build_error(seq: u64, ts: u64, code: &str, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts,
        code: code.to_string(),
        message: message.to_string(),
    }
}

pub fn build_session_end(seq: u64, ts: u64, outcome: Outcome, level: u32, score: u32) -> SessionEndMessage {
    SessionEndMessage {
        msg_type: SessionEndType::SessionEnd,
        seq,
        ts,
        outcome: outcome.as_str().to_string(),
        level,
        score,
    }
}
