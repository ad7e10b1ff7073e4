//! Driver Input
//!
//! Normalized throttle and brake pedal positions. Every write is clamped into
//! `[0, 1]`, so no consumer ever sees an out-of-range pedal value.

use serde::{Deserialize, Serialize};

/// Throttle and brake intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverInput {
    throttle: f64,
    brake: f64,
}

fn clamp_pedal(intensity: f64) -> f64 {
    // NaN compares false against both bounds, treat it as a released pedal
    if intensity.is_nan() {
        return 0.0;
    }
    intensity.clamp(0.0, 1.0)
}

impl DriverInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an input from raw pedal values, clamping both
    pub fn from_pedals(throttle: f64, brake: f64) -> Self {
        let mut input = Self::new();
        input.set_throttle(throttle);
        input.set_brake(brake);
        input
    }

    pub fn throttle(&self) -> f64 {
        self.throttle
    }

    pub fn brake(&self) -> f64 {
        self.brake
    }

    /// Set throttle position, clamped into `[0, 1]`
    pub fn set_throttle(&mut self, intensity: f64) {
        self.throttle = clamp_pedal(intensity);
    }

    /// Set brake position, clamped into `[0, 1]`
    pub fn set_brake(&mut self, intensity: f64) {
        self.brake = clamp_pedal(intensity);
    }

    /// True when neither pedal is pressed at all
    pub fn is_released(&self) -> bool {
        self.throttle == 0.0 && self.brake == 0.0
    }
}
