//! Type definitions for the flight control loop.

use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

use crate::policy::Command;
use crate::telemetry::DecodeError;

/// Why a flight ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The simulator reported a crash.
    Crashed,
    /// Telemetry reported a battery charge of exactly zero.
    BatteryDepleted,
    /// The link failed while sending or receiving.
    ConnectionError,
    /// The first message could not be decoded, so no safe command exists.
    InitialDecodeFailure,
}

impl Termination {
    /// Process exit code. Ends signalled by the simulator count as success.
    pub fn exit_code(self) -> i32 {
        match self {
            Termination::Crashed | Termination::BatteryDepleted => 0,
            Termination::ConnectionError | Termination::InitialDecodeFailure => 1,
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Crashed => write!(f, "crashed"),
            Termination::BatteryDepleted => write!(f, "battery depleted"),
            Termination::ConnectionError => write!(f, "connection error"),
            Termination::InitialDecodeFailure => write!(f, "initial telemetry undecodable"),
        }
    }
}

/// Control loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    /// Waiting for the first telemetry message.
    AwaitingInitial,
    Running,
    Terminated(Termination),
}

/// What the loop should do with the message it just received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Send(Command),
    /// Telemetry was malformed mid-flight; nothing is sent for this tick.
    Skip(DecodeError),
    Terminate(Termination),
}

/// Summary of one flight, logged when the loop ends.
#[derive(Debug, Clone)]
pub struct FlightReport {
    pub termination: Termination,
    pub commands_sent: u64,
    /// Ticks skipped because of malformed telemetry.
    pub skipped_ticks: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl FlightReport {
    pub fn duration(&self) -> TimeDelta {
        self.finished_at - self.started_at
    }
}

impl fmt::Display for FlightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Flight ended ({}) after {:.1}s: {} commands sent, {} ticks skipped",
            self.termination,
            self.duration().num_milliseconds() as f64 / 1000.0,
            self.commands_sent,
            self.skipped_ticks
        )
    }
}
