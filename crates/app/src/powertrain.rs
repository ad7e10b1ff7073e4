//! Powertrain session
//!
//! Owns one session's battery, motor, charger, vehicle and driver input and
//! runs the per-tick control flow:
//!
//! 1. latch driver input
//! 2. motor speed update (regen, torque integration, battery discharge)
//! 3. battery temperature update
//! 4. charger session when requested
//! 5. optional battery ageing
//!
//! A vehicle that is switched off skips steps 2 to 5 entirely.

use std::fmt;

use electrical::{Battery, Charger, Motor};
use log::{debug, info};
use mechanics::Vehicle;
use simcore::{DriverInput, Model, ParamError, SimContext};

use crate::config::{PowertrainParams, SessionConfig};
use crate::profile::DriveCommand;

pub const LOW_BATTERY_SOC: f64 = 20.0;

/// Dashboard warning derived from state of charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatteryAlert {
    #[default]
    None,
    /// SOC at or above 100 %
    Full,
    /// SOC at or below [`LOW_BATTERY_SOC`]
    Low,
}

impl BatteryAlert {
    pub fn from_soc(soc: f64) -> Self {
        if soc >= 100.0 {
            BatteryAlert::Full
        } else if soc <= LOW_BATTERY_SOC {
            BatteryAlert::Low
        } else {
            BatteryAlert::None
        }
    }
}

impl fmt::Display for BatteryAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatteryAlert::None => write!(f, "battery ok"),
            BatteryAlert::Full => write!(f, "battery full"),
            BatteryAlert::Low => write!(f, "battery low"),
        }
    }
}

/// Values the front end reads back after every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    pub speed: f64,
    pub soc: f64,
    pub battery_temperature: f64,
    pub throttle: f64,
    pub brake: f64,
    pub charging: bool,
    pub alert: BatteryAlert,
}

#[derive(Debug, Clone)]
pub struct Powertrain {
    input: DriverInput,
    battery: Battery,
    motor: Motor,
    charger: Charger,
    vehicle: Vehicle,
    ambient_temp_c: f64,
    track_degradation: bool,
}

struct SessionParts {
    battery: Battery,
    motor: Motor,
    vehicle: Vehicle,
}

fn build_parts(params: &PowertrainParams) -> Result<SessionParts, ParamError> {
    Ok(SessionParts {
        battery: Battery::new(params.battery)?,
        motor: Motor::new(params.motor)?,
        vehicle: Vehicle::new(params.vehicle)?,
    })
}

impl Powertrain {
    pub fn new(config: &SessionConfig) -> Result<Self, ParamError> {
        let parts = build_parts(&config.params)?;
        debug!(
            "session built: {:.0} Ah battery, {:.0} Nm motor",
            parts.battery.capacity_max(),
            parts.motor.max_torque()
        );
        Ok(Powertrain {
            input: DriverInput::new(),
            battery: parts.battery,
            motor: parts.motor,
            charger: Charger::new(),
            vehicle: parts.vehicle,
            ambient_temp_c: config.ambient_temp_c,
            track_degradation: config.track_degradation,
        })
    }

    /// Swap in freshly built battery, motor and vehicle.
    ///
    /// Nothing is replaced unless every part builds. Must only be called
    /// between ticks.
    pub fn replace_session(&mut self, params: &PowertrainParams) -> Result<(), ParamError> {
        let parts = build_parts(params)?;
        self.battery = parts.battery;
        self.motor = parts.motor;
        self.vehicle = parts.vehicle;
        self.charger.stop_charging();
        info!(
            "new session: {:.0} Ah battery, {:.0} Nm motor, {:.2} m wheels",
            self.battery.capacity_max(),
            self.motor.max_torque(),
            simcore::WheelGeometry::wheel_radius(&self.vehicle)
        );
        Ok(())
    }

    /// Advance the session by one tick.
    ///
    /// Pedal positions are always latched so the readout reflects them; when
    /// the vehicle is off the motor, battery and charger are left untouched.
    pub fn step(&mut self, ctx: SimContext, command: DriveCommand) -> TickOutput {
        self.input.set_throttle(command.throttle);
        self.input.set_brake(command.brake);

        if !self.vehicle.is_on() {
            return self.readout();
        }

        let dt = ctx.dt;

        self.motor.update_speed(&self.input, &self.vehicle, &mut self.battery, dt);
        self.battery.update_temperature(dt, self.ambient_temp_c);

        if command.charge {
            let was_charging = self.charger.is_charging();
            self.charger.start_charging(&mut self.battery, dt);
            if was_charging && !self.charger.is_charging() {
                info!("t={:.2}s: charge session complete", ctx.t);
            }
        } else if self.charger.is_charging() {
            self.charger.stop_charging();
        }

        // Regen, draw and charging each count toward cycle wear on their own
        let moved = self.battery.take_throughput();
        if self.track_degradation {
            self.battery.degrade_soh(dt);
            self.battery.degrade_with_cycle(moved);
        }

        self.readout()
    }

    pub fn readout(&self) -> TickOutput {
        TickOutput {
            speed: self.motor.speed(),
            soc: self.battery.soc(),
            battery_temperature: self.battery.temperature(),
            throttle: self.input.throttle(),
            brake: self.input.brake(),
            charging: self.charger.is_charging(),
            alert: BatteryAlert::from_soc(self.battery.soc()),
        }
    }

    pub fn power_on(&mut self) {
        self.vehicle.power_on();
    }

    pub fn power_off(&mut self) {
        self.vehicle.power_off();
        self.charger.stop_charging();
    }

    pub fn is_on(&self) -> bool {
        self.vehicle.is_on()
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    pub fn battery_mut(&mut self) -> &mut Battery {
        &mut self.battery
    }

    pub fn motor(&self) -> &Motor {
        &self.motor
    }

    pub fn charger(&self) -> &Charger {
        &self.charger
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn input(&self) -> &DriverInput {
        &self.input
    }
}

impl Model for Powertrain {
    fn reset(&mut self) {
        self.input = DriverInput::new();
        self.battery.reset();
        self.motor.reset();
        self.charger.reset();
        self.vehicle.reset();
    }
}
