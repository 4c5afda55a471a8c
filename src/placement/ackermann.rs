use std::fmt;

use nalgebra::{Complex, DMatrix, DVector, RowDVector};

use crate::error::{PlacementError, Result};
use crate::system::StateSpace;
use super::config::PlacementConfig;
use super::controllability::{check_controllable, controllability_matrix, reciprocal_condition};
use super::poly::{characteristic_coefficients, eval_matrix_polynomial};

// ---------------------------------------------------------------------------
// Feedback gain (u = -K x)
// ---------------------------------------------------------------------------

/// 1×n state feedback row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackGain {
    k: RowDVector<f64>,
    decimals: usize,
}

impl FeedbackGain {
    pub fn new(k: RowDVector<f64>) -> Self {
        Self {
            k,
            decimals: PlacementConfig::default().display_decimals,
        }
    }

    /// Set how many decimals `Display` prints.
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn decimals(&self) -> usize {
        self.decimals
    }

    pub fn as_row(&self) -> &RowDVector<f64> {
        &self.k
    }

    pub fn as_slice(&self) -> &[f64] {
        self.k.as_slice()
    }

    pub fn len(&self) -> usize {
        self.k.len()
    }

    pub fn is_empty(&self) -> bool {
        self.k.is_empty()
    }

    /// Gain as a dynamically sized 1×n matrix.
    pub fn to_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(1, self.k.len(), self.k.as_slice())
    }

    /// Entries rounded half away from zero to `decimals` places.
    pub fn rounded(&self, decimals: usize) -> Vec<f64> {
        let factor = 10f64.powi(decimals as i32);
        self.k.iter().map(|x| (x * factor).round() / factor).collect()
    }
}

impl fmt::Display for FeedbackGain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "K = [")?;
        for (i, x) in self.rounded(self.decimals).iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.*}", self.decimals, x)?;
        }
        write!(f, "]")
    }
}

// ---------------------------------------------------------------------------
// Ackermann: K = e_n^T C^-1 phi(A)
// ---------------------------------------------------------------------------

/// Solves C^T w = e_n by LU instead of forming C^-1, then K = w^T phi(A).
pub fn extract_gain(c: &DMatrix<f64>, phi: &DMatrix<f64>) -> Result<RowDVector<f64>> {
    let n = c.nrows();
    if n == 0 || c.ncols() != n {
        return Err(PlacementError::Shape {
            what: "controllability matrix",
            expected: "a non-empty square matrix".into(),
            found: c.shape(),
        });
    }
    if phi.shape() != (n, n) {
        return Err(PlacementError::Shape {
            what: "matrix polynomial",
            expected: format!("{}x{}", n, n),
            found: phi.shape(),
        });
    }
    let mut e_n = DVector::<f64>::zeros(n);
    e_n[n - 1] = 1.0;

    let w = c
        .transpose()
        .lu()
        .solve(&e_n)
        .ok_or(PlacementError::SingularMatrix {
            rcond: 0.0,
            limit: 0.0,
        })?;
    log::trace!("last row of C^-1: {}", w.transpose());
    Ok((phi.transpose() * w).transpose())
}

/// Full pipeline: pole count, pairing, controllability, conditioning,
/// phi(A), gain.
pub fn place_poles(
    sys: &StateSpace,
    poles: &[Complex<f64>],
    config: &PlacementConfig,
) -> Result<FeedbackGain> {
    let n = sys.dim();
    if poles.len() != n {
        return Err(PlacementError::PoleCount {
            expected: n,
            found: poles.len(),
        });
    }
    let coeffs = characteristic_coefficients(poles, config)?;

    let c = controllability_matrix(sys);
    log::trace!("controllability matrix: {c}");
    check_controllable(&c, config)?;

    let rcond = reciprocal_condition(&c);
    let limit = config.min_reciprocal_condition;
    log::debug!("controllability rcond {rcond:e}");
    if rcond < limit {
        return Err(PlacementError::SingularMatrix { rcond, limit });
    }
    if rcond < limit * 1e3 {
        log::warn!("controllability matrix is poorly conditioned (rcond {rcond:e}), gain may be inaccurate");
    }

    let phi = eval_matrix_polynomial(&coeffs, sys.a())?;
    let k = extract_gain(&c, &phi).map_err(|_| PlacementError::SingularMatrix { rcond, limit })?;
    log::debug!("gain {k}");

    Ok(FeedbackGain::new(k).with_decimals(config.display_decimals))
}

/// Real poles with the default configuration.
pub fn place_real_poles(sys: &StateSpace, poles: &[f64]) -> Result<FeedbackGain> {
    let poles: Vec<Complex<f64>> = poles.iter().map(|&p| Complex::new(p, 0.0)).collect();
    place_poles(sys, &poles, &PlacementConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::poly::matrix_characteristic_polynomial;
    use crate::placement::verify::{closed_loop_poles, poles_match};
    use crate::system::BeamPlant;
    use approx::assert_relative_eq;

    fn double_integrator() -> StateSpace {
        StateSpace::from_rows(&[&[0.0, 1.0], &[0.0, 0.0]], &[0.0, 1.0]).unwrap()
    }

    #[test]
    fn double_integrator_gain() {
        // s^2 + 3s + 2 => K = [2, 3]
        let k = place_real_poles(&double_integrator(), &[-1.0, -2.0]).unwrap();
        assert_relative_eq!(k.as_slice()[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(k.as_slice()[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn reference_plant_repeated_poles() {
        let sys = BeamPlant::default().state_space().unwrap();
        let k = place_real_poles(&sys, &[-3.0; 4]).unwrap();

        // characteristic polynomial of A - BK must be (s + 3)^4
        let got = matrix_characteristic_polynomial(&sys.closed_loop(&k)).unwrap();
        for (g, w) in got.iter().zip([1.0, 12.0, 54.0, 108.0, 81.0]) {
            assert_relative_eq!(*g, w, epsilon = 1e-9, max_relative = 1e-9);
        }

        // a quadruple root is sensitive, eigenvalues only agree to ~eps^(1/4)
        let desired = vec![Complex::new(-3.0, 0.0); 4];
        assert!(poles_match(&closed_loop_poles(&sys, &k), &desired, 1e-2));

        // chain of integrators: K = [81/981, 108/981, 54/50, 12/50]
        assert_eq!(k.rounded(4), vec![0.0826, 0.1101, 1.08, 0.24]);
    }

    #[test]
    fn display_uses_fixed_decimals() {
        let sys = BeamPlant::default().state_space().unwrap();
        let k = place_real_poles(&sys, &[-3.0; 4]).unwrap();
        assert_eq!(k.to_string(), "K = [0.0826, 0.1101, 1.0800, 0.2400]");
        assert_eq!(k.with_decimals(1).to_string(), "K = [0.1, 0.1, 1.1, 0.2]");
    }

    #[test]
    fn complex_pair_placement() {
        let sys = StateSpace::from_rows(
            &[&[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0], &[-1.0, -2.0, -0.5]],
            &[0.0, 0.0, 1.0],
        )
        .unwrap();
        let poles = [
            Complex::new(-2.0, 1.5),
            Complex::new(-2.0, -1.5),
            Complex::new(-5.0, 0.0),
        ];
        let k = place_poles(&sys, &poles, &PlacementConfig::default()).unwrap();
        assert!(poles_match(&closed_loop_poles(&sys, &k), &poles, 1e-6));
    }

    #[test]
    fn deterministic() {
        let sys = BeamPlant::default().state_space().unwrap();
        let k1 = place_real_poles(&sys, &[-1.0, -2.0, -3.0, -4.0]).unwrap();
        let k2 = place_real_poles(&sys, &[-1.0, -2.0, -3.0, -4.0]).unwrap();
        assert_eq!(k1, k2);
    }

    #[test]
    fn pole_count_mismatch() {
        let sys = BeamPlant::default().state_space().unwrap();
        let err = place_real_poles(&sys, &[-3.0; 3]).unwrap_err();
        assert_eq!(err, PlacementError::PoleCount { expected: 4, found: 3 });
    }

    #[test]
    fn uncontrollable_system_produces_no_gain() {
        let sys = StateSpace::from_rows(
            &[&[-1.0, 0.0, 0.0], &[0.0, -2.0, 0.0], &[0.0, 0.0, -3.0]],
            &[1.0, 1.0, 0.0],
        )
        .unwrap();
        let err = place_real_poles(&sys, &[-4.0, -5.0, -6.0]).unwrap_err();
        assert_eq!(err, PlacementError::Uncontrollable { rank: 2, n: 3 });
    }

    #[test]
    fn ill_conditioned_rejected_by_config() {
        // controllable, but the two modes are nearly indistinguishable from B
        let sys = StateSpace::from_rows(&[&[-1.0, 0.0], &[0.0, -1.0 - 1e-6]], &[1.0, 1.0]).unwrap();
        let config = PlacementConfig {
            min_reciprocal_condition: 1e-4,
            ..PlacementConfig::default()
        };
        let poles = [Complex::new(-2.0, 0.0), Complex::new(-3.0, 0.0)];
        let err = place_poles(&sys, &poles, &config).unwrap_err();
        assert!(matches!(err, PlacementError::SingularMatrix { .. }));
    }

    #[test]
    fn extract_gain_singular() {
        let c = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let err = extract_gain(&c, &DMatrix::identity(2, 2)).unwrap_err();
        assert!(matches!(err, PlacementError::SingularMatrix { .. }));
    }

    #[test]
    fn extract_gain_empty_matrix() {
        let err = extract_gain(&DMatrix::zeros(0, 0), &DMatrix::zeros(0, 0)).unwrap_err();
        assert!(matches!(err, PlacementError::Shape { what: "controllability matrix", .. }));
    }

    #[test]
    fn extract_gain_non_square() {
        let err = extract_gain(&DMatrix::zeros(2, 3), &DMatrix::identity(3, 3)).unwrap_err();
        assert_eq!(
            err,
            PlacementError::Shape {
                what: "controllability matrix",
                expected: "a non-empty square matrix".into(),
                found: (2, 3),
            }
        );
    }

    #[test]
    fn extract_gain_phi_mismatch() {
        let err = extract_gain(&DMatrix::identity(2, 2), &DMatrix::identity(3, 3)).unwrap_err();
        assert!(matches!(err, PlacementError::Shape { what: "matrix polynomial", found: (3, 3), .. }));
    }
}
