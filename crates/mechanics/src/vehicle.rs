//! Vehicle - Chassis-level parameters of the simulated EV
//!
//! Only the wheel radius feeds the drivetrain today. Mass, drag coefficient and
//! frontal area are carried as configuration so a force-balance model can
//! consume them later; nothing in this crate turns them into forces.

use log::debug;
use serde::{Deserialize, Serialize};
use simcore::{resolve, resolve_non_negative, Model, ParamError, WheelGeometry};

pub const DEFAULT_WHEEL_RADIUS: f64 = 0.5;
pub const DEFAULT_MASS: f64 = 1800.0;
pub const DEFAULT_DRAG_COEFFICIENT: f64 = 0.28;
pub const DEFAULT_FRONTAL_AREA: f64 = 2.3;

/// Construction parameters for a [`Vehicle`]
///
/// `None` selects the built-in default for that field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParams {
    /// Wheel radius (m)
    pub wheel_radius: Option<f64>,
    /// Vehicle mass (kg)
    pub mass: Option<f64>,
    /// Aerodynamic drag coefficient (dimensionless)
    pub drag_coefficient: Option<f64>,
    /// Frontal area (m²)
    pub frontal_area: Option<f64>,
}

impl VehicleParams {
    /// Build params from raw values where `<= -1` means "default"
    pub fn from_sentinels(wheel_radius: f64) -> Self {
        VehicleParams {
            wheel_radius: simcore::from_sentinel(wheel_radius),
            ..Default::default()
        }
    }
}

/// The vehicle aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    on: bool,
    mass: f64,
    drag_coefficient: f64,
    frontal_area: f64,
    wheel_radius: f64,
}

impl Default for Vehicle {
    fn default() -> Self {
        Vehicle {
            on: true,
            mass: DEFAULT_MASS,
            drag_coefficient: DEFAULT_DRAG_COEFFICIENT,
            frontal_area: DEFAULT_FRONTAL_AREA,
            wheel_radius: DEFAULT_WHEEL_RADIUS,
        }
    }
}

impl Vehicle {
    pub fn new(params: VehicleParams) -> Result<Self, ParamError> {
        let vehicle = Vehicle {
            on: true,
            mass: resolve("mass", params.mass, DEFAULT_MASS)?,
            drag_coefficient: resolve_non_negative("drag coefficient", params.drag_coefficient, DEFAULT_DRAG_COEFFICIENT)?,
            frontal_area: resolve_non_negative("frontal area", params.frontal_area, DEFAULT_FRONTAL_AREA)?,
            wheel_radius: resolve("wheel radius", params.wheel_radius, DEFAULT_WHEEL_RADIUS)?,
        };
        debug!("vehicle built with wheel radius {} m", vehicle.wheel_radius);
        Ok(vehicle)
    }

    // === Power state ===
    //
    // The flag does not gate anything by itself. The powertrain tick checks it.

    pub fn power_on(&mut self) {
        self.on = true;
    }

    pub fn power_off(&mut self) {
        self.on = false;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    // === Configuration ===

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }

    pub fn drag_coefficient(&self) -> f64 {
        self.drag_coefficient
    }

    pub fn set_drag_coefficient(&mut self, coefficient: f64) {
        self.drag_coefficient = coefficient;
    }

    pub fn frontal_area(&self) -> f64 {
        self.frontal_area
    }

    pub fn set_frontal_area(&mut self, area: f64) {
        self.frontal_area = area;
    }

    pub fn set_wheel_radius(&mut self, radius: f64) {
        self.wheel_radius = radius;
    }
}

impl WheelGeometry for Vehicle {
    fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }
}

impl Model for Vehicle {
    fn reset(&mut self) {
        self.on = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let vehicle = Vehicle::new(VehicleParams::default()).unwrap();
        assert!(vehicle.is_on());
        assert_relative_eq!(vehicle.wheel_radius(), 0.5);
        assert_eq!(vehicle, Vehicle::default());
    }

    #[test]
    fn test_sentinel_wheel_radius_uses_default() {
        let vehicle = Vehicle::new(VehicleParams::from_sentinels(-1.0)).unwrap();
        assert_relative_eq!(vehicle.wheel_radius(), DEFAULT_WHEEL_RADIUS);

        let vehicle = Vehicle::new(VehicleParams::from_sentinels(0.33)).unwrap();
        assert_relative_eq!(vehicle.wheel_radius(), 0.33);
    }

    #[test]
    fn test_rejects_zero_wheel_radius() {
        let err = Vehicle::new(VehicleParams {
            wheel_radius: Some(0.0),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ParamError::NonPositive { name: "wheel radius", value: 0.0 });
    }

    #[test]
    fn test_drag_and_area_may_be_zero_but_not_negative() {
        let vehicle = Vehicle::new(VehicleParams {
            drag_coefficient: Some(0.0),
            frontal_area: Some(0.0),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(vehicle.drag_coefficient(), 0.0);
        assert_eq!(vehicle.frontal_area(), 0.0);

        let err = Vehicle::new(VehicleParams {
            frontal_area: Some(-1.5),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ParamError::Negative { name: "frontal area", value: -1.5 });

        let err = Vehicle::new(VehicleParams {
            mass: Some(0.0),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ParamError::NonPositive { name: "mass", value: 0.0 });
    }

    #[test]
    fn test_power_toggle() {
        let mut vehicle = Vehicle::default();
        vehicle.power_off();
        assert!(!vehicle.is_on());
        vehicle.power_off();
        assert!(!vehicle.is_on());
        vehicle.power_on();
        assert!(vehicle.is_on());

        vehicle.power_off();
        vehicle.reset();
        assert!(vehicle.is_on());
    }

    #[test]
    fn test_setters_are_inert_configuration() {
        let mut vehicle = Vehicle::default();
        vehicle.set_mass(2100.0);
        vehicle.set_drag_coefficient(0.31);
        vehicle.set_frontal_area(2.6);
        vehicle.set_wheel_radius(0.4);

        assert_relative_eq!(vehicle.mass(), 2100.0);
        assert_relative_eq!(vehicle.drag_coefficient(), 0.31);
        assert_relative_eq!(vehicle.frontal_area(), 2.6);
        assert_relative_eq!(vehicle.wheel_radius(), 0.4);
    }

    #[test]
    fn test_params_deserialize_with_missing_fields() {
        let params: VehicleParams = serde_json::from_str(r#"{"wheel_radius": 0.45}"#).unwrap();
        assert_eq!(params.wheel_radius, Some(0.45));
        assert_eq!(params.mass, None);
    }
}
