//! Session configuration and command-line arguments.
//!
//! Every field of the JSON session file is optional; missing component
//! parameters fall back to the built-in defaults of each component.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use electrical::{BatteryParams, MotorParams};
use mechanics::VehicleParams;
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;

use crate::error::AppError;
use crate::logging::parse_level;
use crate::profile::DriveProfile;

pub const DEFAULT_DT: f64 = 0.016;
pub const DEFAULT_AMBIENT_TEMP_C: f64 = 25.0;

/// Parameters for one set of battery, motor and vehicle instances
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowertrainParams {
    pub battery: BatteryParams,
    pub motor: MotorParams,
    pub vehicle: VehicleParams,
}

/// Switch the vehicle off at `at_s`, and after `off_for_s` seconds start a
/// new session built from `params`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerCycle {
    pub at_s: f64,
    #[serde(default)]
    pub off_for_s: f64,
    #[serde(default)]
    pub params: PowertrainParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(flatten)]
    pub params: PowertrainParams,
    /// Fixed tick length (s). Kept small; the integrators are explicit Euler.
    pub dt: f64,
    pub ambient_temp_c: f64,
    /// Apply thermal and cycle ageing to the battery every tick
    pub track_degradation: bool,
    pub profile: DriveProfile,
    pub power_cycle: Option<PowerCycle>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            params: PowertrainParams::default(),
            dt: DEFAULT_DT,
            ambient_temp_c: DEFAULT_AMBIENT_TEMP_C,
            track_degradation: false,
            profile: DriveProfile::default(),
            power_cycle: None,
        }
    }
}

impl SessionConfig {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, AppError> {
        let config: SessionConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(AppError::Settings(format!("dt must be positive, got {}", self.dt)));
        }
        if !self.ambient_temp_c.is_finite() {
            return Err(AppError::Settings("ambient temperature must be finite".to_string()));
        }
        if let Some(cycle) = &self.power_cycle {
            if !cycle.at_s.is_finite() || cycle.at_s < 0.0 || !cycle.off_for_s.is_finite() || cycle.off_for_s < 0.0 {
                return Err(AppError::Settings(format!(
                    "power cycle timing must be non-negative, got at {} for {}",
                    cycle.at_s, cycle.off_for_s
                )));
            }
        }
        self.profile.validate()
    }
}

/// Fixed-step EV powertrain simulation.
///
/// Runs a scripted drive profile and writes per-tick telemetry as CSV.
#[derive(Debug, Clone, PartialEq, Parser)]
#[clap(author, version, about, long_about = None)]
pub struct RunArgs {
    /// Session file (JSON); built-in defaults when omitted
    #[clap(long, value_parser)]
    pub config: Option<PathBuf>,
    /// Telemetry output path (CSV)
    #[clap(long, value_parser, default_value = "output.csv")]
    pub out: PathBuf,
    /// Override the session tick length (s)
    #[clap(long, value_parser)]
    pub dt: Option<f64>,
    /// One of off, error, warn, info, debug, trace
    #[clap(long, value_parser = parse_log_level, default_value = "info")]
    pub log_level: LevelFilter,
    /// Also write the log to this file
    #[clap(long, value_parser)]
    pub log_file: Option<PathBuf>,
}

fn parse_log_level(raw: &str) -> Result<LevelFilter, String> {
    parse_level(raw).ok_or_else(|| format!("unknown level: {raw}"))
}
