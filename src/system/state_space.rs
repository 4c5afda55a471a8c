use nalgebra::DMatrix;

use crate::error::{PlacementError, Result};
use crate::placement::FeedbackGain;

// ---------------------------------------------------------------------------
// Single-input continuous-time system: dx/dt = A x + B u
// ---------------------------------------------------------------------------

/// Validated (A, B) pair. A is n×n, B is n×1, n ≥ 1, all entries finite.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    a: DMatrix<f64>,
    b: DMatrix<f64>,
}

impl StateSpace {
    /// Check shapes before anything else touches the matrices.
    pub fn new(a: DMatrix<f64>, b: DMatrix<f64>) -> Result<Self> {
        let n = a.nrows();
        if n == 0 || a.ncols() != n {
            return Err(PlacementError::Shape {
                what: "state matrix A",
                expected: "a non-empty square matrix".into(),
                found: a.shape(),
            });
        }
        if b.nrows() != n || b.ncols() != 1 {
            return Err(PlacementError::Shape {
                what: "input matrix B",
                expected: format!("{}x1", n),
                found: b.shape(),
            });
        }
        if a.iter().any(|x| !x.is_finite()) {
            return Err(PlacementError::NonFinite { what: "state matrix A" });
        }
        if b.iter().any(|x| !x.is_finite()) {
            return Err(PlacementError::NonFinite { what: "input matrix B" });
        }
        Ok(Self { a, b })
    }

    /// Build from row-major slices, the way matrices are usually written down.
    pub fn from_rows(a: &[&[f64]], b: &[f64]) -> Result<Self> {
        let n = a.len();
        if let Some(row) = a.iter().find(|r| r.len() != n) {
            return Err(PlacementError::Shape {
                what: "state matrix A",
                expected: "a non-empty square matrix".into(),
                found: (n, row.len()),
            });
        }
        let a = DMatrix::from_fn(n, n, |i, j| a[i][j]);
        let b = DMatrix::from_column_slice(b.len(), 1, b);
        Self::new(a, b)
    }

    /// State dimension n.
    pub fn dim(&self) -> usize {
        self.a.nrows()
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DMatrix<f64> {
        &self.b
    }

    /// Closed-loop state matrix A - B K for u = -K x.
    pub fn closed_loop(&self, gain: &FeedbackGain) -> DMatrix<f64> {
        &self.a - &self.b * gain.to_matrix()
    }
}
