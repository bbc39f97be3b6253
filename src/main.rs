use anyhow::Context;
use embassy_executor::{Executor, Spawner};
use embassy_time::Duration;
use env_logger::Builder;
use log::{LevelFilter, error, info};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use crate::config::{DEFAULT_CONFIG_FILE, FlightConfig};
use crate::flight::{FlightReport, Termination};
use crate::link::WsLink;

mod config;
mod flight;
mod link;
mod policy;
mod telemetry;
#[cfg(test)]
mod test_util;

fn embassy_init(spawner: Spawner, link: WsLink, tick_interval: Duration, report_tx: mpsc::Sender<FlightReport>) {
    if let Err(e) = spawner.spawn(flight::flight_task(link, tick_interval, report_tx)) {
        error!("Failed to spawn flight task: {:?}", e);
    }
}

/// Connect, fly, and wait for the flight report.
fn run(config: &FlightConfig) -> anyhow::Result<FlightReport> {
    let url = config.url();
    info!("Connecting to {}", url);
    let link = WsLink::connect(config).with_context(|| format!("Failed to connect to {}", url))?;
    info!("Connected to {}", url);

    let (report_tx, report_rx) = mpsc::channel();
    let tick_interval = config.tick_interval();

    // Spawn Embassy executor on a dedicated background thread
    thread::Builder::new()
        .name("embassy-executor".to_string())
        .spawn(move || {
            // Leak the executor to satisfy the 'static lifetime required by run()
            let executor: &'static mut Executor = Box::leak(Box::new(Executor::new()));
            executor.run(|spawner| embassy_init(spawner, link, tick_interval, report_tx));
        })
        .context("Failed to spawn executor thread")?;

    report_rx.recv().context("Flight task ended without a report")
}

fn main() {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let config = FlightConfig::load_or_default(&config_path).unwrap_or_else(|err| {
        eprintln!("Failed to load configuration from {}: {}", config_path.display(), err);
        std::process::exit(1);
    });

    // Logging setup
    Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter(Some("drone_pilot"), config.level_filter())
        .parse_default_env()
        .init();

    info!("Starting up");

    let exit_code = match run(&config) {
        Ok(report) => {
            info!("{}", report);
            report.termination.exit_code()
        }
        Err(e) => {
            error!("{:#}", e);
            Termination::ConnectionError.exit_code()
        }
    };

    std::process::exit(exit_code);
}
