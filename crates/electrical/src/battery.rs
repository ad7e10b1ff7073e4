use log::{info, warn};
use serde::{Deserialize, Serialize};
use simcore::{from_sentinel, resolve, Model, ParamError};

pub const DEFAULT_CAPACITY_AH: f64 = 150.0;
pub const DEFAULT_VOLTAGE_MAX: f64 = 420.0;
pub const DEFAULT_INTERNAL_RESISTANCE: f64 = 0.02;
pub const DEFAULT_HEAT_CAPACITY: f64 = 1000.0;

const SECONDS_PER_HOUR: f64 = 3600.0;
const INITIAL_TEMPERATURE_C: f64 = 25.0;

/// Fixed discharge, thermal and ageing coefficients of the pack chemistry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryConstant {
    /// Charge drawn per (m/s · s), scaled by 1/3600 into Ah
    pub base_discharge_rate: f64,
    /// Nominal voltage as a fraction of maximum voltage
    pub nominal_voltage_ratio: f64,
    /// Scale applied to I²R heating to keep magnitudes realistic
    pub heat_generation_scale: f64,
    /// Newtonian cooling coefficient (W/°C)
    pub heat_transfer_coeff: f64,
    /// Below this temperature discharge uses `cold_discharge_factor` (°C)
    pub cold_threshold_c: f64,
    pub cold_discharge_factor: f64,
    /// Above this temperature discharge uses `hot_discharge_factor` and health degrades (°C)
    pub hot_threshold_c: f64,
    pub hot_discharge_factor: f64,
    /// Health lost per second per degree above `hot_threshold_c`
    pub thermal_degradation_rate: f64,
    /// Health lost per full equivalent cycle
    pub cycle_degradation: f64,
}

impl Default for BatteryConstant {
    fn default() -> Self {
        BatteryConstant {
            base_discharge_rate: 10.0,
            nominal_voltage_ratio: 0.9,
            heat_generation_scale: 0.00001,
            heat_transfer_coeff: 0.6,
            cold_threshold_c: 0.0,
            cold_discharge_factor: 0.7,
            hot_threshold_c: 40.0,
            hot_discharge_factor: 1.2,
            thermal_degradation_rate: 0.001,
            cycle_degradation: 0.1,
        }
    }
}

/// Construction parameters for a [`Battery`]. `None` selects the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryParams {
    /// Maximum capacity (Ah)
    pub capacity_ah: Option<f64>,
    /// Maximum terminal voltage (V)
    pub voltage_max: Option<f64>,
    /// Internal resistance (Ω)
    pub internal_resistance: Option<f64>,
    /// Thermal mass (J/°C)
    pub heat_capacity: Option<f64>,
}

impl BatteryParams {
    /// Build params from raw values where `<= -1` means "default"
    pub fn from_sentinels(capacity_ah: f64, voltage_max: f64, internal_resistance: f64, heat_capacity: f64) -> Self {
        BatteryParams {
            capacity_ah: from_sentinel(capacity_ah),
            voltage_max: from_sentinel(voltage_max),
            internal_resistance: from_sentinel(internal_resistance),
            heat_capacity: from_sentinel(heat_capacity),
        }
    }
}

/// Outcome of a [`Battery::charge`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeStatus {
    /// Charge was added this call
    Charging,
    /// The battery was already at capacity; nothing was added
    Full,
}

impl ChargeStatus {
    pub fn is_full(self) -> bool {
        self == ChargeStatus::Full
    }
}

/// Single-cell equivalent traction battery.
///
/// Sign convention for `current`: negative while discharging, positive while charging.
#[derive(Debug, Clone)]
pub struct Battery {
    pub constants: BatteryConstant,
    params: BatteryParams,
    capacity_max: f64,
    capacity_now: f64,
    voltage_max: f64,
    voltage_now: f64,
    internal_resistance: f64,
    state_of_health: f64,
    current: f64,
    temperature: f64,
    heat_capacity: f64,
    heat_transfer_coeff: f64,
    /// Absolute charge moved since the last full equivalent cycle (Ah)
    cycle_charge: f64,
    /// Absolute charge moved in or out since the last `take_throughput` (Ah)
    throughput: f64,
}

impl Default for Battery {
    fn default() -> Self {
        Self::from_resolved(
            BatteryConstant::default(),
            BatteryParams::default(),
            DEFAULT_CAPACITY_AH,
            DEFAULT_VOLTAGE_MAX,
            DEFAULT_INTERNAL_RESISTANCE,
            DEFAULT_HEAT_CAPACITY,
        )
    }
}

fn temperature_factor(temperature: f64, constants: &BatteryConstant) -> f64 {
    if temperature < constants.cold_threshold_c {
        constants.cold_discharge_factor
    } else if temperature > constants.hot_threshold_c {
        constants.hot_discharge_factor
    } else {
        1.0
    }
}

impl Battery {
    pub fn new(params: BatteryParams) -> Result<Self, ParamError> {
        Self::with_constants(params, BatteryConstant::default())
    }

    pub fn with_constants(params: BatteryParams, constants: BatteryConstant) -> Result<Self, ParamError> {
        let capacity = resolve("battery capacity", params.capacity_ah, DEFAULT_CAPACITY_AH)?;
        let voltage_max = resolve("battery max voltage", params.voltage_max, DEFAULT_VOLTAGE_MAX)?;
        let resistance = resolve("internal resistance", params.internal_resistance, DEFAULT_INTERNAL_RESISTANCE)?;
        let heat_capacity = resolve("heat capacity", params.heat_capacity, DEFAULT_HEAT_CAPACITY)?;
        Ok(Self::from_resolved(constants, params, capacity, voltage_max, resistance, heat_capacity))
    }

    fn from_resolved(
        constants: BatteryConstant,
        params: BatteryParams,
        capacity: f64,
        voltage_max: f64,
        internal_resistance: f64,
        heat_capacity: f64,
    ) -> Self {
        Battery {
            constants,
            params,
            capacity_max: capacity,
            capacity_now: capacity,
            voltage_max,
            voltage_now: constants.nominal_voltage_ratio * voltage_max,
            internal_resistance,
            state_of_health: 1.0,
            current: 0.0,
            temperature: INITIAL_TEMPERATURE_C,
            heat_capacity,
            heat_transfer_coeff: constants.heat_transfer_coeff,
            cycle_charge: 0.0,
            throughput: 0.0,
        }
    }

    /// State of charge in percent
    pub fn soc(&self) -> f64 {
        self.capacity_now / self.capacity_max * 100.0
    }

    /// Draw charge proportional to vehicle speed over `dt` seconds.
    ///
    /// Capacity stays within `[0, capacity_max]`; an empty battery reports zero
    /// current. Negative speeds draw nothing and a non-positive `dt` is a no-op
    /// apart from zeroing the current.
    pub fn discharge(&mut self, speed: f64, dt: f64) {
        if !(dt > 0.0) {
            self.current = 0.0;
            return;
        }

        let factor = temperature_factor(self.temperature, &self.constants);
        let delta_q = self.constants.base_discharge_rate * speed.max(0.0) * dt * factor / SECONDS_PER_HOUR;
        let before = self.capacity_now;
        let had_charge = before > 0.0;

        self.capacity_now = (before - delta_q).min(self.capacity_max);
        self.current = -delta_q / dt;

        if self.capacity_now <= 0.0 {
            if had_charge {
                warn!("battery depleted, no further current can be drawn");
            }
            self.capacity_now = 0.0;
            self.current = 0.0;
        }
        self.throughput += (before - self.capacity_now).max(0.0);
    }

    /// Push charge in from an external source at `applied_voltage`.
    ///
    /// A battery already at capacity zeroes its current and reports
    /// [`ChargeStatus::Full`] without changing anything else.
    pub fn charge(&mut self, applied_voltage: f64, dt: f64) -> ChargeStatus {
        if self.capacity_now >= self.capacity_max {
            self.current = 0.0;
            return ChargeStatus::Full;
        }

        let delta_q = (dt * applied_voltage / (1000.0 * self.internal_resistance)).max(0.0);
        let before = self.capacity_now;
        self.capacity_now = (before + delta_q).min(self.capacity_max);
        self.throughput += self.capacity_now - before;
        ChargeStatus::Charging
    }

    /// Integrate resistive heating against Newtonian cooling and return the new temperature (°C)
    pub fn update_temperature(&mut self, dt: f64, ambient_temp: f64) -> f64 {
        // Q = I^2 * R * t
        let heat_generated = self.constants.heat_generation_scale * self.current * self.current * self.internal_resistance * dt;
        // Q = h * (T_batt - T_ambient) * t
        let cooling = self.heat_transfer_coeff * (self.temperature - ambient_temp) * dt;

        self.temperature += (heat_generated - cooling) / self.heat_capacity;
        self.temperature
    }

    /// Lose health while running above the hot threshold
    pub fn degrade_soh(&mut self, dt: f64) {
        let excess = self.temperature - self.constants.hot_threshold_c;
        if excess > 0.0 {
            self.state_of_health = (self.state_of_health - self.constants.thermal_degradation_rate * dt * excess).max(0.0);
        }
    }

    /// Add charge recovered by regenerative braking, capped at capacity
    pub fn recharge_from_regen(&mut self, delta_q: f64) {
        let before = self.capacity_now;
        self.capacity_now = (before + delta_q).min(self.capacity_max);
        self.throughput += (self.capacity_now - before).abs();
    }

    /// Return the charge moved by discharge, charge and regen since the last
    /// call, and start counting again from zero.
    ///
    /// Feeding this into [`Battery::degrade_with_cycle`] once per tick counts
    /// a regen tick's recovered and drawn charge separately instead of netting
    /// them out.
    pub fn take_throughput(&mut self) -> f64 {
        std::mem::take(&mut self.throughput)
    }

    /// Count charge throughput; each full equivalent cycle costs a fixed health step
    pub fn degrade_with_cycle(&mut self, delta_q: f64) {
        self.cycle_charge += delta_q.abs();

        if self.cycle_charge >= self.capacity_max {
            self.state_of_health = (self.state_of_health - self.constants.cycle_degradation).max(0.0);
            self.cycle_charge = 0.0;
            info!("full equivalent cycle completed, state of health now {:.3}", self.state_of_health);
        }
    }

    // Getters

    pub fn capacity_max(&self) -> f64 {
        self.capacity_max
    }

    pub fn capacity_now(&self) -> f64 {
        self.capacity_now
    }

    pub fn voltage_max(&self) -> f64 {
        self.voltage_max
    }

    pub fn voltage_now(&self) -> f64 {
        self.voltage_now
    }

    pub fn internal_resistance(&self) -> f64 {
        self.internal_resistance
    }

    pub fn state_of_health(&self) -> f64 {
        self.state_of_health
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn heat_capacity(&self) -> f64 {
        self.heat_capacity
    }

    pub fn heat_transfer_coeff(&self) -> f64 {
        self.heat_transfer_coeff
    }

    pub fn cycle_charge(&self) -> f64 {
        self.cycle_charge
    }

    // Setters

    pub fn set_capacity_max(&mut self, capacity: f64) {
        self.capacity_max = capacity;
    }

    pub fn set_capacity_now(&mut self, capacity: f64) {
        self.capacity_now = capacity;
    }

    pub fn set_voltage_max(&mut self, voltage: f64) {
        self.voltage_max = voltage;
    }

    pub fn set_voltage_now(&mut self, voltage: f64) {
        self.voltage_now = voltage;
    }

    pub fn set_internal_resistance(&mut self, resistance: f64) {
        self.internal_resistance = resistance;
    }

    pub fn set_state_of_health(&mut self, soh: f64) {
        self.state_of_health = soh;
    }

    pub fn set_current(&mut self, current: f64) {
        self.current = current;
    }

    pub fn set_temperature(&mut self, temperature: f64) {
        self.temperature = temperature;
    }

    pub fn set_heat_transfer_coeff(&mut self, coeff: f64) {
        self.heat_transfer_coeff = coeff;
    }

    /// Must stay positive; the thermal update divides by it.
    pub fn set_heat_capacity(&mut self, heat_capacity: f64) {
        self.heat_capacity = heat_capacity;
    }
}

impl Model for Battery {
    fn reset(&mut self) {
        let params = self.params;
        *self = Self::from_resolved(
            self.constants,
            params,
            params.capacity_ah.unwrap_or(DEFAULT_CAPACITY_AH),
            params.voltage_max.unwrap_or(DEFAULT_VOLTAGE_MAX),
            params.internal_resistance.unwrap_or(DEFAULT_INTERNAL_RESISTANCE),
            params.heat_capacity.unwrap_or(DEFAULT_HEAT_CAPACITY),
        );
    }
}
