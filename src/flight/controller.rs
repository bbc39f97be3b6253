//! Flight state machine.
//!
//! Pure decision logic: one inbound message in, one [`Step`] out. The async task in
//! `flight::task` owns the link and performs the I/O the step asks for.

use crate::link::InboundMessage;
use crate::policy::Command;
use crate::telemetry::decode_telemetry;

use super::types::{FlightState, Step, Termination};

/// Battery charge at which the flight is over.
pub const DEPLETED_BATTERY: u32 = 0;

/// Tracks the control loop state across messages.
#[derive(Debug)]
pub struct FlightController {
    state: FlightState,
}

impl FlightController {
    pub const fn new() -> Self {
        Self {
            state: FlightState::AwaitingInitial,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> FlightState {
        self.state
    }

    /// Process one inbound message and advance the state machine.
    pub fn handle(&mut self, message: &InboundMessage) -> Step {
        let step = match self.state {
            FlightState::AwaitingInitial => self.handle_initial(message),
            FlightState::Running => self.handle_running(message),
            FlightState::Terminated(reason) => Step::Terminate(reason),
        };

        self.state = match step {
            Step::Terminate(reason) => FlightState::Terminated(reason),
            Step::Send(_) | Step::Skip(_) => FlightState::Running,
        };
        step
    }

    fn handle_initial(&self, message: &InboundMessage) -> Step {
        if message.is_crashed() {
            log::warn!("Drone reported crashed before the first command");
            return Step::Terminate(Termination::Crashed);
        }

        match decode_telemetry(&message.telemetry) {
            Ok(reading) => {
                log::info!("Initial telemetry: {}", reading);
                Step::Send(Command::from_reading(&reading))
            }
            Err(e) => {
                log::error!("Initial telemetry {:?} could not be decoded: {}", message.telemetry, e);
                Step::Terminate(Termination::InitialDecodeFailure)
            }
        }
    }

    fn handle_running(&self, message: &InboundMessage) -> Step {
        if message.is_crashed() {
            log::warn!("Drone crashed");
            return Step::Terminate(Termination::Crashed);
        }

        let reading = match decode_telemetry(&message.telemetry) {
            Ok(reading) => reading,
            Err(e) => {
                log::warn!("Skipping tick, malformed telemetry {:?}: {}", message.telemetry, e);
                return Step::Skip(e);
            }
        };

        if reading.battery == DEPLETED_BATTERY {
            log::info!("Battery depleted at x={} y={}", reading.x, reading.y);
            return Step::Terminate(Termination::BatteryDepleted);
        }

        Step::Send(Command::from_reading(&reading))
    }
}

impl Default for FlightController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Movement;
    use crate::telemetry::DecodeError;

    fn telemetry(s: &str) -> InboundMessage {
        InboundMessage {
            telemetry: s.to_string(),
            status: None,
        }
    }

    fn running() -> FlightController {
        let mut controller = FlightController::new();
        controller.handle(&telemetry("X-0-Y-0-BAT-100-GYR-[0,0]-WIND-0-DUST-0-SENS-GREEN"));
        assert_eq!(controller.state(), FlightState::Running);
        controller
    }

    #[test]
    fn test_initial_state() {
        assert_eq!(FlightController::new().state(), FlightState::AwaitingInitial);
    }

    #[test]
    fn test_initial_message_sends_first_command() {
        let mut controller = FlightController::new();
        let step = controller.handle(&telemetry("X-0-Y-2-BAT-75-GYR-[0,0]-WIND-1-DUST-1-SENS-GREEN"));

        assert_eq!(
            step,
            Step::Send(Command {
                speed: 5,
                altitude: 0,
                movement: Movement::Fwd
            })
        );
        assert_eq!(controller.state(), FlightState::Running);
    }

    #[test]
    fn test_initial_decode_failure_is_fatal() {
        let mut controller = FlightController::new();
        let step = controller.handle(&telemetry("hello"));

        assert_eq!(step, Step::Terminate(Termination::InitialDecodeFailure));
        assert_eq!(
            controller.state(),
            FlightState::Terminated(Termination::InitialDecodeFailure)
        );
    }

    #[test]
    fn test_initial_depleted_battery_still_commands() {
        let mut controller = FlightController::new();
        let step = controller.handle(&telemetry("X-0-Y-0-BAT-0-GYR-[0,0]-WIND-0-DUST-0-SENS-RED"));

        assert!(matches!(step, Step::Send(Command { speed: 0, altitude: 1, .. })));
    }

    #[test]
    fn test_running_yellow_ceiling() {
        let mut controller = running();
        let step = controller.handle(&telemetry("X-0-Y-1000-BAT-30-GYR-[0,0]-WIND-1-DUST-1-SENS-YELLOW"));

        assert_eq!(
            step,
            Step::Send(Command {
                speed: 3,
                altitude: -1,
                movement: Movement::Fwd
            })
        );
    }

    #[test]
    fn test_crash_status_terminates() {
        let mut controller = running();
        let step = controller.handle(&InboundMessage {
            telemetry: "X-0-Y-2-BAT-75-GYR-[0,0]-WIND-1-DUST-1-SENS-GREEN".to_string(),
            status: Some("crashed".to_string()),
        });

        assert_eq!(step, Step::Terminate(Termination::Crashed));
        assert_eq!(controller.state(), FlightState::Terminated(Termination::Crashed));
    }

    #[test]
    fn test_crash_status_on_first_message() {
        let mut controller = FlightController::new();
        let step = controller.handle(&InboundMessage {
            telemetry: String::new(),
            status: Some("crashed".to_string()),
        });

        assert_eq!(step, Step::Terminate(Termination::Crashed));
    }

    #[test]
    fn test_depleted_battery_terminates() {
        let mut controller = running();
        let step = controller.handle(&telemetry("X-4-Y-2-BAT-0-GYR-[0,0]-WIND-1-DUST-1-SENS-GREEN"));

        assert_eq!(step, Step::Terminate(Termination::BatteryDepleted));
    }

    #[test]
    fn test_malformed_telemetry_mid_flight_is_skipped() {
        let mut controller = running();
        let step = controller.handle(&telemetry("X-4-Y-2-BAT-"));

        assert!(matches!(step, Step::Skip(DecodeError::InvalidNumber { field: "battery", .. })));
        assert_eq!(controller.state(), FlightState::Running);

        let step = controller.handle(&telemetry("X-0-Y-0-BAT-9-GYR-[0,0]-WIND-0-DUST-0-SENS-GREEN"));
        assert!(matches!(step, Step::Send(Command { speed: 0, .. })));
    }

    #[test]
    fn test_terminated_controller_stays_terminated() {
        let mut controller = running();
        controller.handle(&telemetry("X-4-Y-2-BAT-0-GYR-[0,0]-WIND-1-DUST-1-SENS-GREEN"));

        let step = controller.handle(&telemetry("X-0-Y-0-BAT-100-GYR-[0,0]-WIND-0-DUST-0-SENS-GREEN"));
        assert_eq!(step, Step::Terminate(Termination::BatteryDepleted));
    }
}
