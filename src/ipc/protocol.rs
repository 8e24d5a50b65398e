//! IPC message protocol definitions
//!
//! All messages are JSON-encoded, prefixed with a 4-byte little-endian length.

use serde::{Deserialize, Serialize};

use crate::intent::{IntentCategory, IntentDecision};

/// Requests from a turn-taking controller to the service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Classify one utterance
    Evaluate { text: String, agent_speaking: bool },

    /// Request current service status
    GetStatus,

    /// Ping to check connectivity
    Ping,

    /// Subscribe to decision notifications
    Subscribe,
}

/// Responses from service to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Classification of an `Evaluate` request
    Decision(IntentDecision),

    /// Current service status
    Status(ServiceStatus),

    /// Pong response to ping
    Pong,

    /// Subscription confirmed
    Subscribed,

    /// Error response
    Error { code: String, message: String },
}

impl Response {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Response::Error {
            code: "bad_request".to_string(),
            message: message.into(),
        }
    }
}

/// Number of utterances classified into each category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub agent_idle: u64,
    pub command: u64,
    pub acknowledgement: u64,
    pub meaningful_input: u64,
}

impl CategoryCounts {
    pub fn record(&mut self, category: IntentCategory) {
        let slot = match category {
            IntentCategory::AgentIdle => &mut self.agent_idle,
            IntentCategory::Command => &mut self.command,
            IntentCategory::Acknowledgement => &mut self.acknowledgement,
            IntentCategory::MeaningfulInput => &mut self.meaningful_input,
        };
        *slot += 1;
    }
}

/// Full service status snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// Service version
    pub version: String,

    /// Uptime in seconds
    pub uptime_secs: u64,

    /// Size of the active acknowledgement set
    pub acknowledgement_phrases: usize,

    /// Size of the active command set
    pub command_phrases: usize,

    /// Decisions made since startup
    pub counts: CategoryCounts,
}

impl Default for ServiceStatus {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: 0,
            acknowledgement_phrases: 0,
            command_phrases: 0,
            counts: CategoryCounts::default(),
        }
    }
}
