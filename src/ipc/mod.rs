//! IPC module for serving classifications to out-of-process controllers

mod protocol;
mod server;

pub use protocol::{CategoryCounts, Request, Response, ServiceStatus};
pub use server::Server;
