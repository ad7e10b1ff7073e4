use serde::{Deserialize, Serialize};
use simcore::{from_sentinel, resolve, DriverInput, Model, ParamError, WheelGeometry};

use crate::battery::Battery;

pub const DEFAULT_MAX_TORQUE: f64 = 200.0;
pub const DEFAULT_MAX_SPEED: f64 = 100.0;

/// Fixed drive-unit constants that are not exposed as session parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorConstant {
    /// Maximum friction braking torque (N·m)
    pub max_brake_torque: f64,
    /// Rotational inertia seen by the motor (kg·m²)
    pub inertia: f64,
    /// Fraction of braking torque recovered as regen torque
    pub regen_efficiency: f64,
    /// Ceiling on recovered power (W)
    pub max_regen_power: f64,
    /// Passive drag torque as a fraction of max torque when both pedals are released
    pub coast_drag_ratio: f64,
    /// Heat transfer coefficient for motor cooling (W/°C)
    pub heat_transfer_coeff: f64,
    /// Thermal mass (J/°C)
    pub heat_capacity: f64,
}

impl Default for MotorConstant {
    fn default() -> Self {
        MotorConstant {
            max_brake_torque: 300.0,
            inertia: 10.0,
            regen_efficiency: 0.5,
            max_regen_power: 100.0,
            coast_drag_ratio: 0.8,
            heat_transfer_coeff: 1.2,
            heat_capacity: 12.0,
        }
    }
}

/// Construction parameters for a [`Motor`]. `None` selects the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorParams {
    /// Peak drive torque (N·m)
    pub max_torque: Option<f64>,
    /// Linear speed ceiling (m/s)
    pub max_speed: Option<f64>,
}

impl MotorParams {
    /// Build params from raw values where `<= -1` means "default"
    pub fn from_sentinels(max_torque: f64, max_speed: f64) -> Self {
        MotorParams {
            max_torque: from_sentinel(max_torque),
            max_speed: from_sentinel(max_speed),
        }
    }
}

/// Torque-driven traction motor with regenerative braking.
///
/// Owns the angular speed it integrates across ticks; a new motor always
/// starts from rest.
#[derive(Debug, Clone)]
pub struct Motor {
    speed: f64,
    angular_speed: f64,
    max_speed: f64,
    max_torque: f64,
    max_brake_torque: f64,
    inertia: f64,
    regen_efficiency: f64,
    max_regen_power: f64,
    coast_drag_ratio: f64,
    temperature: f64,
    heat_capacity: f64,
    heat_transfer_coeff: f64,
}

impl Default for Motor {
    fn default() -> Self {
        Self::from_resolved(MotorConstant::default(), DEFAULT_MAX_TORQUE, DEFAULT_MAX_SPEED)
    }
}

impl Motor {
    pub fn new(params: MotorParams) -> Result<Self, ParamError> {
        Self::with_constants(params, MotorConstant::default())
    }

    pub fn with_constants(params: MotorParams, constants: MotorConstant) -> Result<Self, ParamError> {
        let max_torque = resolve("max torque", params.max_torque, DEFAULT_MAX_TORQUE)?;
        let max_speed = resolve("max speed", params.max_speed, DEFAULT_MAX_SPEED)?;
        simcore::require_positive("motor inertia", constants.inertia)?;
        Ok(Self::from_resolved(constants, max_torque, max_speed))
    }

    fn from_resolved(constants: MotorConstant, max_torque: f64, max_speed: f64) -> Self {
        Motor {
            speed: 0.0,
            angular_speed: 0.0,
            max_speed,
            max_torque,
            max_brake_torque: constants.max_brake_torque,
            inertia: constants.inertia,
            regen_efficiency: constants.regen_efficiency.clamp(0.0, 1.0),
            max_regen_power: constants.max_regen_power.max(0.0),
            coast_drag_ratio: constants.coast_drag_ratio,
            temperature: 25.0,
            heat_capacity: constants.heat_capacity,
            heat_transfer_coeff: constants.heat_transfer_coeff,
        }
    }

    /// Regen is active while the vehicle moves and the brake is pressed
    pub fn is_regenerating(&self, input: &DriverInput) -> bool {
        self.speed > 0.0 && input.brake() > 0.0
    }

    /// Recoverable braking power (W), capped at `max_regen_power`
    ///
    /// Linear speed stands in for angular velocity in this simplified model.
    pub fn calculate_regen_power(&self, input: &DriverInput) -> f64 {
        if !self.is_regenerating(input) {
            return 0.0;
        }
        let regen_torque = input.brake() * self.regen_efficiency * self.max_torque;
        (regen_torque * self.speed).min(self.max_regen_power)
    }

    /// Feed recovered braking energy back into the battery.
    ///
    /// Sets `battery.current` to the regen current. The discharge at the end of
    /// [`Motor::update_speed`] overwrites it within the same tick.
    pub fn apply_regenerative_braking(&self, input: &DriverInput, battery: &mut Battery, dt: f64) {
        if !self.is_regenerating(input) {
            return;
        }
        let regen_power = self.calculate_regen_power(input);
        if regen_power > 0.0 {
            let regen_current = regen_power / battery.voltage_max();
            let delta_q = regen_current * dt;

            battery.recharge_from_regen(delta_q);
            battery.set_current(regen_current);
        }
    }

    /// Net shaft torque for the current pedal state (N·m)
    pub fn net_torque(&self, input: &DriverInput) -> f64 {
        let throttle = input.throttle();
        let brake = input.brake();
        let mut net_torque = 0.0;

        if throttle > 0.0 {
            net_torque += throttle * self.max_torque;
        }
        if brake > 0.0 {
            net_torque -= brake * self.max_brake_torque;
        }
        if input.is_released() {
            net_torque -= self.coast_drag_ratio * self.max_torque;
        }
        net_torque
    }

    /// Advance one tick and return the new linear speed (m/s).
    ///
    /// Order is fixed: regen, torque integration, speed clamp, then an
    /// unconditional battery discharge at the new speed.
    pub fn update_speed<V: WheelGeometry + ?Sized>(
        &mut self,
        input: &DriverInput,
        vehicle: &V,
        battery: &mut Battery,
        dt: f64,
    ) -> f64 {
        if self.is_regenerating(input) {
            self.apply_regenerative_braking(input, battery, dt);
        }

        let angular_acceleration = self.net_torque(input) / self.inertia;
        self.angular_speed += angular_acceleration * dt;

        // No reverse gear
        if self.angular_speed < 0.0 {
            self.angular_speed = 0.0;
        }

        self.speed = (vehicle.wheel_radius() * self.angular_speed).min(self.max_speed);

        battery.discharge(self.speed, dt);

        self.speed
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Overwrite linear speed. Negative values are ignored and the angular
    /// accumulator is left as is, so the next update recomputes speed from it.
    pub fn set_speed(&mut self, speed: f64) {
        if speed >= 0.0 {
            self.speed = speed;
        }
    }

    pub fn angular_speed(&self) -> f64 {
        self.angular_speed
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn max_torque(&self) -> f64 {
        self.max_torque
    }

    pub fn max_brake_torque(&self) -> f64 {
        self.max_brake_torque
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn regen_efficiency(&self) -> f64 {
        self.regen_efficiency
    }

    pub fn set_max_regen_power(&mut self, power: f64) {
        self.max_regen_power = power;
    }

    pub fn max_regen_power(&self) -> f64 {
        self.max_regen_power
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
}

impl Model for Motor {
    fn reset(&mut self) {
        self.speed = 0.0;
        self.angular_speed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mechanics::{Vehicle, VehicleParams};
    use proptest::prelude::*;

    const DT: f64 = 0.016;

    fn spin_up(motor: &mut Motor, vehicle: &Vehicle, battery: &mut Battery, ticks: usize) {
        let input = DriverInput::from_pedals(1.0, 0.0);
        for _ in 0..ticks {
            motor.update_speed(&input, vehicle, battery, DT);
        }
    }

    #[test]
    fn test_defaults() {
        let motor = Motor::new(MotorParams::default()).unwrap();
        assert_eq!(motor.speed(), 0.0);
        assert_eq!(motor.angular_speed(), 0.0);
        assert_relative_eq!(motor.max_torque(), 200.0);
        assert_relative_eq!(motor.max_speed(), 100.0);
        assert_relative_eq!(motor.max_brake_torque(), 300.0);
        assert_relative_eq!(motor.inertia(), 10.0);
        assert_relative_eq!(motor.regen_efficiency(), 0.5);
        assert_relative_eq!(motor.max_regen_power(), 100.0);
        assert_relative_eq!(motor.temperature(), 25.0);
        assert_relative_eq!(motor.heat_capacity(), 12.0);
        assert_relative_eq!(motor.heat_transfer_coeff(), 1.2);
    }

    #[test]
    fn test_sentinel_params() {
        let motor = Motor::new(MotorParams::from_sentinels(-1.0, 40.0)).unwrap();
        assert_relative_eq!(motor.max_torque(), DEFAULT_MAX_TORQUE);
        assert_relative_eq!(motor.max_speed(), 40.0);

        assert!(Motor::new(MotorParams { max_torque: Some(0.0), ..Default::default() }).is_err());
    }

    #[test]
    fn test_rejects_zero_inertia() {
        let constants = MotorConstant { inertia: 0.0, ..Default::default() };
        let err = Motor::with_constants(MotorParams::default(), constants).unwrap_err();
        assert_eq!(err, ParamError::NonPositive { name: "motor inertia", value: 0.0 });
    }

    #[test]
    fn test_regen_predicate() {
        let mut motor = Motor::default();
        let braking = DriverInput::from_pedals(0.0, 0.5);
        assert!(!motor.is_regenerating(&braking));

        motor.set_speed(3.0);
        assert!(motor.is_regenerating(&braking));
        assert!(!motor.is_regenerating(&DriverInput::from_pedals(1.0, 0.0)));
    }

    #[test]
    fn test_regen_power_clamped() {
        let mut motor = Motor::default();
        motor.set_speed(5.0);
        let input = DriverInput::from_pedals(0.0, 1.0);

        // regen torque = 1 * 0.5 * 200 = 50 Nm, raw power = 50 * 5 = 250 W
        assert_relative_eq!(motor.calculate_regen_power(&input), 100.0);

        motor.set_max_regen_power(1000.0);
        assert_relative_eq!(motor.calculate_regen_power(&input), 250.0);
    }

    #[test]
    fn test_regen_power_zero_when_not_regenerating() {
        let motor = Motor::default();
        assert_eq!(motor.calculate_regen_power(&DriverInput::from_pedals(0.0, 1.0)), 0.0);
    }

    #[test]
    fn test_apply_regen_charges_battery() {
        let mut motor = Motor::default();
        motor.set_speed(5.0);
        let mut battery = Battery::default();
        battery.set_capacity_now(100.0);

        motor.apply_regenerative_braking(&DriverInput::from_pedals(0.0, 1.0), &mut battery, 1.0);

        let regen_current = 100.0 / 420.0;
        assert_relative_eq!(battery.current(), regen_current, epsilon = 1e-12);
        assert_relative_eq!(battery.capacity_now(), 100.0 + regen_current, epsilon = 1e-12);
    }

    #[test]
    fn test_apply_regen_noop_without_brake() {
        let mut motor = Motor::default();
        motor.set_speed(5.0);
        let mut battery = Battery::default();
        battery.set_capacity_now(100.0);

        motor.apply_regenerative_braking(&DriverInput::from_pedals(1.0, 0.0), &mut battery, 1.0);

        assert_relative_eq!(battery.capacity_now(), 100.0);
        assert_eq!(battery.current(), 0.0);
    }

    #[test]
    fn test_single_throttle_tick() {
        let mut motor = Motor::default();
        let vehicle = Vehicle::default();
        let mut battery = Battery::default();

        let speed = motor.update_speed(&DriverInput::from_pedals(1.0, 0.0), &vehicle, &mut battery, 1.0);

        // alpha = 200 / 10 = 20 rad/s², omega = 20 rad/s, v = 0.5 * 20 = 10 m/s
        assert_relative_eq!(motor.angular_speed(), 20.0);
        assert_relative_eq!(speed, 10.0);
        assert_relative_eq!(battery.capacity_now(), 150.0 - 100.0 / 3600.0, epsilon = 1e-12);
    }

    #[test]
    fn test_brake_and_throttle_combine() {
        let motor = Motor::default();
        let input = DriverInput::from_pedals(0.5, 0.5);
        // 0.5 * 200 - 0.5 * 300 = -50, no coast drag since pedals are pressed
        assert_relative_eq!(motor.net_torque(&input), -50.0);
        assert_relative_eq!(motor.net_torque(&DriverInput::new()), -160.0);
    }

    #[test]
    fn test_regen_current_overwritten_by_discharge() {
        let mut motor = Motor::default();
        let vehicle = Vehicle::default();
        let mut battery = Battery::default();
        spin_up(&mut motor, &vehicle, &mut battery, 200);
        battery.set_capacity_now(100.0);

        let before = battery.capacity_now();
        let speed = motor.update_speed(&DriverInput::from_pedals(0.0, 0.1), &vehicle, &mut battery, DT);

        // The discharge at the new speed is the last write to current
        let expected_draw = 10.0 * speed * DT / 3600.0;
        assert_relative_eq!(battery.current(), -expected_draw / DT, epsilon = 1e-12);
        assert!(battery.current() < 0.0);

        // Capacity still reflects the regen recharge: 0.1 * 0.5 * 200 * 32 = 320 W, capped at 100 W
        let regen = 100.0 / 420.0 * DT;
        assert_relative_eq!(battery.capacity_now(), before + regen - expected_draw, epsilon = 1e-9);
    }

    #[test]
    fn test_speed_uses_vehicle_wheel_radius() {
        let mut small = Motor::default();
        let mut large = Motor::default();
        let small_wheel = Vehicle::new(VehicleParams { wheel_radius: Some(0.25), ..Default::default() }).unwrap();
        let large_wheel = Vehicle::default();
        let mut battery = Battery::default();
        let input = DriverInput::from_pedals(0.5, 0.0);

        let v_small = small.update_speed(&input, &small_wheel, &mut battery, 0.1);
        let v_large = large.update_speed(&input, &large_wheel, &mut battery, 0.1);
        assert_relative_eq!(v_large, 2.0 * v_small);
    }

    #[test]
    fn test_new_motor_starts_from_rest() {
        let vehicle = Vehicle::default();
        let mut battery = Battery::default();
        let mut first = Motor::default();
        spin_up(&mut first, &vehicle, &mut battery, 50);
        assert!(first.speed() > 0.0);

        let mut second = Motor::default();
        assert_eq!(second.angular_speed(), 0.0);
        let v = second.update_speed(&DriverInput::new(), &vehicle, &mut battery, DT);
        assert_eq!(v, 0.0);

        first.reset();
        assert_eq!(first.speed(), 0.0);
        assert_eq!(first.angular_speed(), 0.0);
    }

    #[test]
    fn test_set_speed_ignores_negative() {
        let mut motor = Motor::default();
        motor.set_speed(4.0);
        motor.set_speed(-1.0);
        assert_relative_eq!(motor.speed(), 4.0);
    }

    #[test]
    fn test_braking_reaches_standstill() {
        let mut motor = Motor::default();
        let vehicle = Vehicle::default();
        let mut battery = Battery::default();
        spin_up(&mut motor, &vehicle, &mut battery, 100);

        let brake = DriverInput::from_pedals(0.0, 1.0);
        for _ in 0..1000 {
            motor.update_speed(&brake, &vehicle, &mut battery, DT);
        }
        assert_eq!(motor.speed(), 0.0);
        assert!(!motor.is_regenerating(&brake));
    }

    proptest! {
        #[test]
        fn coasting_decreases_monotonically(spin_ticks in 1usize..400, dt in 0.001f64..0.05) {
            let mut motor = Motor::default();
            let vehicle = Vehicle::default();
            let mut battery = Battery::default();
            spin_up(&mut motor, &vehicle, &mut battery, spin_ticks);
            prop_assert!(motor.speed() > 0.0);

            let coast = DriverInput::new();
            let mut last = motor.speed();
            for _ in 0..20_000 {
                let v = motor.update_speed(&coast, &vehicle, &mut battery, dt);
                prop_assert!(v >= 0.0);
                prop_assert!(v <= last);
                last = v;
                if v == 0.0 {
                    break;
                }
            }
            prop_assert_eq!(last, 0.0);
        }

        #[test]
        fn full_throttle_never_exceeds_max_speed(
            max_speed in 1.0f64..150.0,
            dt in 0.001f64..0.1,
            ticks in 1usize..2000,
        ) {
            let mut motor = Motor::new(MotorParams { max_speed: Some(max_speed), ..Default::default() }).unwrap();
            let vehicle = Vehicle::default();
            let mut battery = Battery::default();
            let input = DriverInput::from_pedals(1.0, 0.0);
            for _ in 0..ticks {
                let v = motor.update_speed(&input, &vehicle, &mut battery, dt);
                prop_assert!(v <= max_speed);
                prop_assert!(v >= 0.0);
            }
        }
    }
}
