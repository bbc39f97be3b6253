//! Link module: the message channel between the pilot and the simulator.
//!
//! The flight loop only talks to a [`TelemetryLink`]; the WebSocket transport is
//! one implementation of it.

#[cfg(test)]
pub mod mock;
pub mod websocket;

pub use websocket::WsLink;

use serde::Deserialize;
use std::fmt;

use crate::policy::Command;

/// Status value the simulator sends once the drone has crashed.
pub const CRASHED_STATUS: &str = "crashed";

/// One message received from the simulator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InboundMessage {
    /// Telemetry record; empty when the server omitted it.
    #[serde(default)]
    pub telemetry: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl InboundMessage {
    pub fn is_crashed(&self) -> bool {
        self.status.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(CRASHED_STATUS))
    }
}

/// Half-duplex channel to the simulator.
///
/// Implementations suspend in `receive` until a full message is available. There are
/// no timeouts: a silent server keeps the caller waiting.
#[allow(async_fn_in_trait)]
pub trait TelemetryLink {
    /// Wait for the next message from the simulator.
    async fn receive(&mut self) -> Result<InboundMessage, LinkError>;

    /// Send one command to the simulator.
    async fn send(&mut self, command: &Command) -> Result<(), LinkError>;

    /// Release the connection. Errors are logged, not returned.
    async fn close(&mut self);
}

/// Transport failures. All of them end the flight.
#[derive(Debug)]
pub enum LinkError {
    Io(std::io::Error),
    WebSocket(tungstenite::Error),
    /// A text frame that is not a valid inbound message.
    Protocol(serde_json::Error),
    /// The server closed the connection.
    Closed,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Io(e) => write!(f, "I/O error: {}", e),
            LinkError::WebSocket(e) => write!(f, "WebSocket error: {}", e),
            LinkError::Protocol(e) => write!(f, "Malformed message: {}", e),
            LinkError::Closed => write!(f, "Connection closed by server"),
        }
    }
}

impl std::error::Error for LinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LinkError::Io(e) => Some(e),
            LinkError::WebSocket(e) => Some(e),
            LinkError::Protocol(e) => Some(e),
            LinkError::Closed => None,
        }
    }
}

impl From<std::io::Error> for LinkError {
    fn from(e: std::io::Error) -> Self {
        LinkError::Io(e)
    }
}

impl From<tungstenite::Error> for LinkError {
    fn from(e: tungstenite::Error) -> Self {
        match e {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => LinkError::Closed,
            tungstenite::Error::Io(io) => LinkError::Io(io),
            other => LinkError::WebSocket(other),
        }
    }
}

impl From<serde_json::Error> for LinkError {
    fn from(e: serde_json::Error) -> Self {
        LinkError::Protocol(e)
    }
}
