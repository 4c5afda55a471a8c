use nalgebra::DMatrix;

use crate::error::Result;
use super::state_space::StateSpace;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const GRAVITY: f64 = 9.81; // m/s^2

// ---------------------------------------------------------------------------
// Beam balancing rig (linearized about level)
// ---------------------------------------------------------------------------

/// Four-state beam rig driven by a single torque input.
///
/// State: [position, velocity, beam angle, beam rate]. The rolling load
/// accelerates at g/L per radian of tilt; the beam integrates torque
/// through its inertia.
#[derive(Debug, Clone)]
pub struct BeamPlant {
    pub length: f64,  // m
    pub inertia: f64, // kg·m^2
}

impl BeamPlant {
    pub fn new(length: f64, inertia: f64) -> Self {
        Self { length, inertia }
    }

    pub fn state_matrix(&self) -> DMatrix<f64> {
        #[rustfmt::skip]
        let a = DMatrix::from_row_slice(4, 4, &[
            0.0, 1.0, 0.0,                    0.0,
            0.0, 0.0, GRAVITY / self.length,  0.0,
            0.0, 0.0, 0.0,                    1.0,
            0.0, 0.0, 0.0,                    0.0,
        ]);
        a
    }

    pub fn input_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_column_slice(4, 1, &[0.0, 0.0, 0.0, 1.0 / self.inertia])
    }

    /// Validated system; fails only for degenerate parameters (zero length or inertia).
    pub fn state_space(&self) -> Result<StateSpace> {
        StateSpace::new(self.state_matrix(), self.input_matrix())
    }
}

impl Default for BeamPlant {
    fn default() -> Self {
        Self {
            length: 0.5,
            inertia: 0.02,
        }
    }
}

// ---------------------------------------------------------------------------
// Plant builder
// ---------------------------------------------------------------------------

pub struct PlantBuilder {
    length: f64,
    inertia: f64,
}

impl PlantBuilder {
    pub fn new() -> Self {
        let d = BeamPlant::default();
        Self { length: d.length, inertia: d.inertia }
    }

    pub fn length(mut self, v: f64) -> Self { self.length = v; self }
    pub fn inertia(mut self, v: f64) -> Self { self.inertia = v; self }

    pub fn build(self) -> BeamPlant {
        BeamPlant::new(self.length, self.inertia)
    }
}

impl Default for PlantBuilder {
    fn default() -> Self {
        Self::new()
    }
}
