// General Traits

/// Timing information handed to every model on a tick.
///
/// `dt` is supplied by the caller and is not clamped or subdivided anywhere in
/// the core. Explicit Euler integration is only stable for small steps, so
/// keeping `dt` bounded (the runner uses ~16 ms) is the caller's contract.
#[derive(Debug, Clone, Copy)]
pub struct SimContext {
    pub dt: f64,
    pub t: f64,
}

impl SimContext {
    pub fn new(dt: f64, t: f64) -> Self {
        SimContext { dt, t }
    }
}

pub trait Model {
    /// Return to the freshly constructed state, keeping configured parameters.
    fn reset(&mut self);
}

// Mechanical Traits

/// Geometry a drive motor needs from the vehicle it is mounted in.
pub trait WheelGeometry {
    /// Wheel radius in meters, always positive.
    fn wheel_radius(&self) -> f64;
}
