//! Headless runner for the EV powertrain simulation.
//!
//! Plays the part of the interactive front end: it samples a scripted drive
//! profile once per tick, steps a [`Powertrain`] session and records the
//! readout as telemetry.

pub mod config;
pub mod error;
pub mod logging;
pub mod powertrain;
pub mod profile;
pub mod runner;
pub mod telemetry;

pub use config::{PowerCycle, PowertrainParams, RunArgs, SessionConfig};
pub use error::AppError;
pub use powertrain::{BatteryAlert, Powertrain, TickOutput};
pub use profile::{DriveCommand, DriveProfile, Segment};
pub use runner::run_session;
pub use telemetry::{SpeedSummary, TelemetryLog, TelemetryRow};
