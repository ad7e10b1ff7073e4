//! Electrical side of the powertrain: traction battery, drive motor and the
//! external charging station.

pub mod battery;
pub mod charger;
pub mod motor;

pub use battery::{Battery, BatteryConstant, BatteryParams, ChargeStatus};
pub use charger::{Charger, ChargerState};
pub use motor::{Motor, MotorConstant, MotorParams};
