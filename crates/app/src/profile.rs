//! Scripted drive profiles
//!
//! A profile is an ordered list of segments, each holding constant pedal
//! positions (and optionally a charge request) for a fixed duration. The
//! runner samples it once per tick in place of keyboard polling.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// What the driver asks for during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveCommand {
    pub throttle: f64,
    pub brake: f64,
    /// Request a charging-station session this tick
    pub charge: bool,
}

impl DriveCommand {
    pub fn released() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub duration_s: f64,
    #[serde(default)]
    pub throttle: f64,
    #[serde(default)]
    pub brake: f64,
    #[serde(default)]
    pub charge: bool,
}

impl Segment {
    pub fn throttle(duration_s: f64, throttle: f64) -> Self {
        Segment { duration_s, throttle, brake: 0.0, charge: false }
    }

    pub fn brake(duration_s: f64, brake: f64) -> Self {
        Segment { duration_s, throttle: 0.0, brake, charge: false }
    }

    pub fn coast(duration_s: f64) -> Self {
        Segment { duration_s, throttle: 0.0, brake: 0.0, charge: false }
    }

    pub fn charge(duration_s: f64) -> Self {
        Segment { duration_s, throttle: 0.0, brake: 0.0, charge: true }
    }

    fn command(&self) -> DriveCommand {
        DriveCommand {
            throttle: self.throttle,
            brake: self.brake,
            charge: self.charge,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveProfile {
    pub segments: Vec<Segment>,
}

impl Default for DriveProfile {
    /// Accelerate, coast, brake to a stop, then plug in
    fn default() -> Self {
        DriveProfile {
            segments: vec![
                Segment::throttle(10.0, 1.0),
                Segment::coast(5.0),
                Segment::brake(6.0, 1.0),
                Segment::charge(5.0),
            ],
        }
    }
}

impl DriveProfile {
    pub fn new(segments: Vec<Segment>) -> Self {
        DriveProfile { segments }
    }

    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration_s).sum()
    }

    /// Command active at time `t`. Past the end of the profile both pedals are released.
    pub fn command_at(&self, t: f64) -> DriveCommand {
        let mut start = 0.0;
        for segment in &self.segments {
            let end = start + segment.duration_s;
            if t >= start && t < end {
                return segment.command();
            }
            start = end;
        }
        DriveCommand::released()
    }

    pub fn validate(&self) -> Result<(), AppError> {
        for (i, segment) in self.segments.iter().enumerate() {
            if !segment.duration_s.is_finite() || segment.duration_s < 0.0 {
                return Err(AppError::Settings(format!(
                    "segment {} has invalid duration {}",
                    i, segment.duration_s
                )));
            }
        }
        Ok(())
    }
}
