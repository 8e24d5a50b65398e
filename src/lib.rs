//! speech-intent: decide whether an utterance heard over agent speech
//! should interrupt the agent
//!
//! The classifier lives in [`intent`] and has no I/O. The remaining
//! modules wrap it as a local service:
//! - Environment-driven configuration with optional lexicon overrides
//! - IPC server speaking length-prefixed JSON over a Unix socket
//! - Decision events pushed to subscribed clients
//! - Signal handling for graceful shutdown

pub mod config;
pub mod events;
pub mod intent;
pub mod ipc;
pub mod lifecycle;
