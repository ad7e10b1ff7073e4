//! Per-tick telemetry rows and the post-run speed summary.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::powertrain::TickOutput;

pub const CSV_COLUMNS: [&str; 6] = ["Time", "Speed", "SOC", "BatteryTemp", "Throttle", "Brake"];

/// One CSV record. Field names map onto [`CSV_COLUMNS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRow {
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "Speed")]
    pub speed: f64,
    #[serde(rename = "SOC")]
    pub soc: f64,
    #[serde(rename = "BatteryTemp")]
    pub battery_temp: f64,
    #[serde(rename = "Throttle")]
    pub throttle: f64,
    #[serde(rename = "Brake")]
    pub brake: f64,
}

/// Average of sampled speeds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSummary {
    pub samples: usize,
    pub sample_interval: f64,
    pub average_speed: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TelemetryLog {
    rows: Vec<TelemetryRow>,
}

impl TelemetryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, time: f64, output: &TickOutput) {
        self.rows.push(TelemetryRow {
            time,
            speed: output.speed,
            soc: output.soc,
            battery_temp: output.battery_temperature,
            throttle: output.throttle,
            brake: output.brake,
        });
    }

    pub fn rows(&self) -> &[TelemetryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the header and every row. The header is written even for an empty log.
    pub fn write_csv<W: Write>(&self, out: W) -> Result<(), csv::Error> {
        let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(out);
        wtr.write_record(CSV_COLUMNS)?;
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let file = File::create(path)?;
        self.write_csv(file)?;
        Ok(())
    }

    /// Average speed over up to `sample_count` rows, taking a row only once
    /// `sample_interval` seconds have passed since the previously taken one.
    ///
    /// The first row is always taken. Returns `None` when nothing was sampled.
    pub fn average_speed(&self, sample_count: usize, sample_interval: f64) -> Option<SpeedSummary> {
        let mut last_sample_time = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut taken = 0;

        for row in &self.rows {
            if taken >= sample_count {
                break;
            }
            if row.time - last_sample_time >= sample_interval {
                sum += row.speed;
                last_sample_time = row.time;
                taken += 1;
            }
        }

        if taken == 0 {
            return None;
        }
        Some(SpeedSummary {
            samples: taken,
            sample_interval,
            average_speed: sum / taken as f64,
        })
    }
}
