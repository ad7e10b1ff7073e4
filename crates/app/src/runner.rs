//! Fixed-step session loop.

use log::{debug, info, warn};
use simcore::SimContext;

use crate::config::{PowerCycle, SessionConfig};
use crate::error::AppError;
use crate::powertrain::{BatteryAlert, Powertrain};
use crate::telemetry::TelemetryLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleStage {
    Pending,
    Off,
    Done,
}

/// Drives the optional power cycle from the loop clock
struct CycleSchedule {
    cycle: Option<PowerCycle>,
    stage: CycleStage,
}

impl CycleSchedule {
    fn new(cycle: Option<PowerCycle>) -> Self {
        CycleSchedule {
            cycle,
            stage: CycleStage::Pending,
        }
    }

    fn advance(&mut self, t: f64, powertrain: &mut Powertrain) -> Result<(), AppError> {
        let Some(cycle) = self.cycle else {
            return Ok(());
        };
        match self.stage {
            CycleStage::Pending if t >= cycle.at_s => {
                info!("t={t:.3}s: vehicle switched off");
                powertrain.power_off();
                self.stage = CycleStage::Off;
                // A zero-length outage restarts on the same tick
                self.advance(t, powertrain)
            }
            CycleStage::Off if t >= cycle.at_s + cycle.off_for_s => {
                powertrain.replace_session(&cycle.params)?;
                self.stage = CycleStage::Done;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Run the configured profile to completion and return one telemetry row per tick.
///
/// Tick times are derived from the tick index so long runs do not drift.
pub fn run_session(config: &SessionConfig) -> Result<TelemetryLog, AppError> {
    config.validate()?;

    let mut powertrain = Powertrain::new(config)?;
    let mut schedule = CycleSchedule::new(config.power_cycle);
    let mut log = TelemetryLog::new();

    let dt = config.dt;
    let duration = config.profile.total_duration();
    // Tolerate quotients like 30.000000000000004 from decimal tick lengths
    let ticks = (duration / dt - 1e-9).ceil().max(0.0) as u64;
    info!("running {duration:.1}s profile in {ticks} ticks of {dt}s");

    let mut alert = powertrain.readout().alert;
    for tick in 0..ticks {
        let ctx = SimContext::new(dt, tick as f64 * dt);
        schedule.advance(ctx.t, &mut powertrain)?;

        let output = powertrain.step(ctx, config.profile.command_at(ctx.t));
        log.record(ctx.t + ctx.dt, &output);

        if output.alert != alert {
            match output.alert {
                BatteryAlert::Low => warn!("t={:.2}s: {} ({:.1}% SOC)", ctx.t, output.alert, output.soc),
                BatteryAlert::Full => info!("t={:.2}s: {}", ctx.t, output.alert),
                BatteryAlert::None => {}
            }
            alert = output.alert;
        }

        if tick % 500 == 0 {
            debug!(
                "t={:.2}s speed={:.2} soc={:.2} temp={:.2}",
                ctx.t, output.speed, output.soc, output.battery_temperature
            );
        }
    }

    Ok(log)
}
