//! Flight module: the control loop that turns telemetry into commands.
//!
//! - `controller`: state machine from inbound message to [`types::Step`]
//! - `task`: async loop driving a [`crate::link::TelemetryLink`]
//! - `types`: states, steps, termination reasons and the flight report

pub mod controller;
pub mod task;
pub mod types;

pub use task::flight_task;
pub use types::{FlightReport, Termination};
