//! WebSocket transport to the simulator.
//!
//! The socket is switched to non-blocking mode after the handshake. Reads that would
//! block yield to the executor with a short `Timer` and retry, so the flight task only
//! suspends while no frame is available.

use embassy_time::{Duration, Timer};
use std::io;
use std::net::TcpStream;
use tungstenite::handshake::HandshakeError;
use tungstenite::{Message, WebSocket};

use super::{InboundMessage, LinkError, TelemetryLink};
use crate::config::FlightConfig;
use crate::policy::Command;

/// Flush attempts while closing before the connection is dropped anyway.
const CLOSE_FLUSH_ATTEMPTS: usize = 50;

/// WebSocket connection to the simulator.
pub struct WsLink {
    socket: WebSocket<TcpStream>,
    poll_interval: Duration,
    closed: bool,
}

impl WsLink {
    /// Open the TCP connection and perform the WebSocket handshake.
    ///
    /// Blocks until the handshake completes.
    pub fn connect(config: &FlightConfig) -> Result<Self, LinkError> {
        let stream = TcpStream::connect((config.host.as_str(), config.port))?;
        stream.set_nodelay(true)?;

        let (socket, response) = tungstenite::client(config.url(), stream).map_err(|e| match e {
            HandshakeError::Failure(e) => LinkError::from(e),
            HandshakeError::Interrupted(_) => {
                LinkError::Io(io::Error::new(io::ErrorKind::WouldBlock, "WebSocket handshake interrupted"))
            }
        })?;
        log::debug!("Handshake completed with status {}", response.status());

        socket.get_ref().set_nonblocking(true)?;

        Ok(Self {
            socket,
            poll_interval: config.poll_interval(),
            closed: false,
        })
    }
}

fn would_block(e: &tungstenite::Error) -> bool {
    matches!(e, tungstenite::Error::Io(err) if err.kind() == io::ErrorKind::WouldBlock)
}

impl TelemetryLink for WsLink {
    async fn receive(&mut self) -> Result<InboundMessage, LinkError> {
        loop {
            match self.socket.read() {
                Ok(Message::Text(text)) => return Ok(serde_json::from_str(&text)?),
                Ok(Message::Close(frame)) => {
                    log::debug!("Close frame received: {:?}", frame);
                    return Err(LinkError::Closed);
                }
                Ok(other) => log::trace!("Ignoring non-text frame: {:?}", other),
                Err(e) if would_block(&e) => Timer::after(self.poll_interval).await,
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn send(&mut self, command: &Command) -> Result<(), LinkError> {
        let payload = serde_json::to_string(command)?;

        // A WouldBlock send leaves the frame queued; flushing completes it.
        let mut result = self.socket.send(Message::text(payload));
        loop {
            match result {
                Ok(()) => return Ok(()),
                Err(e) if would_block(&e) => {
                    Timer::after(self.poll_interval).await;
                    result = self.socket.flush();
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.socket.close(None) {
            if !would_block(&e) {
                log::debug!("Close skipped: {}", e);
                return;
            }
        }

        for _ in 0..CLOSE_FLUSH_ATTEMPTS {
            match self.socket.flush() {
                Err(e) if would_block(&e) => Timer::after(self.poll_interval).await,
                Ok(()) => return,
                Err(e) => {
                    log::debug!("Close flush ended: {}", e);
                    return;
                }
            }
        }
        log::warn!("Gave up flushing close frame");
    }
}

impl Drop for WsLink {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.socket.close(None);
            let _ = self.socket.flush();
        }
    }
}
