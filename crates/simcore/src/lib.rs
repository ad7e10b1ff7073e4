//! Shared simulation core for the EV powertrain crates.
//!
//! Holds the seams between subsystems: the [`Model`] lifecycle trait, the
//! per-tick [`SimContext`], the normalized [`DriverInput`] surface and the
//! parameter resolution used by every constructor.

pub mod input;
pub mod params;
pub mod traits;

pub use input::DriverInput;
pub use params::{from_sentinel, require_non_negative, require_positive, resolve, resolve_non_negative, ParamError};
pub use traits::{Model, SimContext, WheelGeometry};
