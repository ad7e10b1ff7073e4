use std::error::Error;

use clap::Parser;
use ev_sim_app::logging::init_logging;
use ev_sim_app::{run_session, RunArgs, SessionConfig};
use log::info;

const SUMMARY_SAMPLES: usize = 100;
const SUMMARY_INTERVAL_S: f64 = 1.0;

fn main() -> Result<(), Box<dyn Error>> {
    let args = RunArgs::parse();
    init_logging(args.log_level, args.log_file.as_deref())?;

    let mut config = match &args.config {
        Some(path) => {
            info!("loading session from {}", path.display());
            SessionConfig::load(path)?
        }
        None => SessionConfig::default(),
    };
    if let Some(dt) = args.dt {
        config.dt = dt;
    }
    config.validate()?;

    let telemetry = run_session(&config)?;
    telemetry.save(&args.out)?;
    info!("wrote {} rows to {}", telemetry.len(), args.out.display());

    match telemetry.average_speed(SUMMARY_SAMPLES, SUMMARY_INTERVAL_S) {
        Some(summary) => println!(
            "Average speed over {} samples (every {}s): {:.3} m/s",
            summary.samples, summary.sample_interval, summary.average_speed
        ),
        None => println!("No samples collected."),
    }

    Ok(())
}
