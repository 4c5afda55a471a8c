use nalgebra::Complex;
use thiserror::Error;

/// Everything that can stop a pole-placement design.
///
/// None of these are recoverable for the call that produced them: no gain is
/// returned alongside an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    /// A or B does not have the shape a single-input system needs.
    #[error("{what} has shape {found:?}, expected {expected}")]
    Shape {
        what: &'static str,
        expected: String,
        found: (usize, usize),
    },

    /// Number of desired poles differs from the state dimension.
    #[error("expected {expected} poles for a {expected}-state system, got {found}")]
    PoleCount { expected: usize, found: usize },

    /// A complex pole was supplied without its conjugate.
    #[error("complex pole {pole} has no conjugate partner")]
    ComplexPole { pole: Complex<f64> },

    /// Controllability matrix is rank deficient.
    #[error("system is not controllable: controllability matrix has rank {rank} < {n}")]
    Uncontrollable { rank: usize, n: usize },

    /// Controllability matrix could not be inverted reliably.
    #[error("controllability matrix is singular to working precision (rcond {rcond:e} < {limit:e})")]
    SingularMatrix { rcond: f64, limit: f64 },

    #[error("{what} contains a non-finite value")]
    NonFinite { what: &'static str },
}

pub type Result<T> = std::result::Result<T, PlacementError>;
