//! Async flight loop.
//!
//! Runs on the Embassy executor and drives the receive → decode → decide → send cycle
//! until the controller reaches a terminal state or the link fails.

use chrono::Utc;
use embassy_time::{Duration, Timer};
use std::sync::mpsc;

use crate::link::{TelemetryLink, WsLink};

use super::controller::FlightController;
use super::types::{FlightReport, Step, Termination};

/// Fly until a terminal condition, then close the link.
///
/// # Parameters
///
/// * `link` - Connected link to the simulator
/// * `tick_interval` - Pause after each sent command before the next receive
///
/// # Returns
///
/// The flight summary, including why it ended.
pub async fn fly<L: TelemetryLink>(link: &mut L, tick_interval: Duration) -> FlightReport {
    let started_at = Utc::now();
    let mut controller = FlightController::new();
    let mut commands_sent = 0u64;
    let mut skipped_ticks = 0u64;

    let termination = loop {
        let message = match link.receive().await {
            Ok(message) => message,
            Err(e) => {
                log::error!("Connection error while receiving: {}", e);
                break Termination::ConnectionError;
            }
        };

        match controller.handle(&message) {
            Step::Send(command) => {
                if let Err(e) = link.send(&command).await {
                    log::error!("Connection error while sending: {}", e);
                    break Termination::ConnectionError;
                }
                commands_sent += 1;
                log::debug!(
                    "Sent speed={} altitude={} movement={:?}",
                    command.speed,
                    command.altitude,
                    command.movement
                );

                Timer::after(tick_interval).await;
            }
            Step::Skip(_) => skipped_ticks += 1,
            Step::Terminate(reason) => break reason,
        }
    };

    link.close().await;

    FlightReport {
        termination,
        commands_sent,
        skipped_ticks,
        started_at,
        finished_at: Utc::now(),
    }
}

/// Executor task owning the WebSocket link for the lifetime of the flight.
///
/// The report goes back to the main thread, which decides the process exit code.
#[embassy_executor::task]
pub async fn flight_task(mut link: WsLink, tick_interval: Duration, report_tx: mpsc::Sender<FlightReport>) {
    log::info!("Flight task started");

    let report = fly(&mut link, tick_interval).await;
    drop(link);

    if report_tx.send(report).is_err() {
        log::error!("Flight report receiver went away");
    }
}
