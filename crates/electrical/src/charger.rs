//! Charging station
//!
//! Two-state machine (`Idle`, `Charging`). Starting a session against a full
//! battery completes it within the same call.

use log::info;
use simcore::Model;

use crate::battery::Battery;

/// Fraction of the battery's maximum voltage applied while charging
const CHARGING_VOLTAGE_RATIO: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargerState {
    #[default]
    Idle,
    Charging,
}

#[derive(Debug, Clone)]
pub struct Charger {
    state: ChargerState,
    /// Rated output (W)
    pub max_power_output: f64,
    /// Conversion efficiency (0.0 to 1.0)
    pub efficiency: f64,
}

impl Default for Charger {
    fn default() -> Self {
        Charger {
            state: ChargerState::Idle,
            max_power_output: 10_000.0,
            efficiency: 0.9,
        }
    }
}

impl Charger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Voltage the station applies to `battery`
    pub fn charging_voltage(&self, battery: &Battery) -> f64 {
        CHARGING_VOLTAGE_RATIO * battery.voltage_max()
    }

    /// Current the station could deliver at its rated output (A)
    pub fn charging_current(&self, battery: &Battery) -> f64 {
        self.max_power_output / self.charging_voltage(battery) * self.efficiency
    }

    /// Charge `battery` for `dt` seconds, stopping once it reports full
    pub fn start_charging(&mut self, battery: &mut Battery, dt: f64) {
        self.state = ChargerState::Charging;

        let voltage = self.charging_voltage(battery);
        if battery.charge(voltage, dt).is_full() {
            info!("battery full at {:.1}% SOC, charger stopping", battery.soc());
            self.stop_charging();
        }
    }

    pub fn stop_charging(&mut self) {
        self.state = ChargerState::Idle;
    }

    pub fn is_charging(&self) -> bool {
        self.state == ChargerState::Charging
    }

    pub fn state(&self) -> ChargerState {
        self.state
    }
}

impl Model for Charger {
    fn reset(&mut self) {
        self.stop_charging();
    }
}
