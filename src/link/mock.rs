use std::collections::VecDeque;

use super::{InboundMessage, LinkError, TelemetryLink};
use crate::policy::Command;

/// In-memory link that replays a fixed list of inbound messages and records what was sent.
///
/// Once the script is exhausted `receive` reports the connection as closed.
#[derive(Default)]
pub struct ScriptedLink {
    inbound: VecDeque<Result<InboundMessage, LinkError>>,
    pub sent: Vec<Command>,
    /// Fail the send after this many commands went through.
    pub fail_send_after: Option<usize>,
    pub closed: bool,
}

impl ScriptedLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn telemetry(mut self, telemetry: &str) -> Self {
        self.inbound.push_back(Ok(InboundMessage {
            telemetry: telemetry.to_string(),
            status: None,
        }));
        self
    }

    pub fn json(mut self, json: &str) -> Self {
        self.inbound.push_back(serde_json::from_str(json).map_err(LinkError::from));
        self
    }

    pub fn error(mut self, error: LinkError) -> Self {
        self.inbound.push_back(Err(error));
        self
    }

    /// Messages the loop never got to.
    pub fn remaining(&self) -> usize {
        self.inbound.len()
    }
}

impl TelemetryLink for ScriptedLink {
    async fn receive(&mut self) -> Result<InboundMessage, LinkError> {
        self.inbound.pop_front().unwrap_or(Err(LinkError::Closed))
    }

    async fn send(&mut self, command: &Command) -> Result<(), LinkError> {
        if self.fail_send_after.is_some_and(|limit| self.sent.len() >= limit) {
            return Err(LinkError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "send failed")));
        }
        self.sent.push(*command);
        Ok(())
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}
