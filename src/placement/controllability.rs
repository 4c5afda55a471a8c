use nalgebra::DMatrix;

use crate::error::{PlacementError, Result};
use crate::system::StateSpace;
use super::config::PlacementConfig;

// ---------------------------------------------------------------------------
// Controllability matrix C = [B | AB | A^2 B | ... | A^(n-1) B]
// ---------------------------------------------------------------------------

/// Column k of the result is A^k B, k ascending.
pub fn controllability_matrix(sys: &StateSpace) -> DMatrix<f64> {
    let n = sys.dim();
    let a = sys.a();
    let mut c = DMatrix::zeros(n, n);
    let mut col = sys.b().column(0).into_owned();
    for k in 0..n {
        c.set_column(k, &col);
        if k + 1 < n {
            col = a * &col;
        }
    }
    c
}

// ---------------------------------------------------------------------------
// Rank and conditioning (SVD based)
// ---------------------------------------------------------------------------

fn singular_values(m: &DMatrix<f64>) -> Vec<f64> {
    m.singular_values().iter().copied().collect()
}

/// Default rank threshold: max(rows, cols) * eps * sigma_max.
pub fn default_rank_tolerance(m: &DMatrix<f64>) -> f64 {
    let sigma_max = singular_values(m).into_iter().fold(0.0_f64, f64::max);
    m.nrows().max(m.ncols()) as f64 * f64::EPSILON * sigma_max
}

/// Number of singular values strictly above the tolerance.
pub fn numerical_rank(m: &DMatrix<f64>, tol: Option<f64>) -> usize {
    let tol = tol.unwrap_or_else(|| default_rank_tolerance(m));
    singular_values(m).into_iter().filter(|s| *s > tol).count()
}

/// sigma_min / sigma_max; zero for a zero matrix.
pub fn reciprocal_condition(m: &DMatrix<f64>) -> f64 {
    let sv = singular_values(m);
    let max = sv.iter().copied().fold(0.0_f64, f64::max);
    let min = sv.iter().copied().fold(f64::INFINITY, f64::min);
    if max > 0.0 {
        min / max
    } else {
        0.0
    }
}

/// Fails with `Uncontrollable` when C is rank deficient.
pub fn check_controllable(c: &DMatrix<f64>, config: &PlacementConfig) -> Result<()> {
    let n = c.nrows();
    let rank = numerical_rank(c, config.rank_tolerance);
    log::debug!("controllability rank {rank}/{n}");
    if rank < n {
        return Err(PlacementError::Uncontrollable { rank, n });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn double_integrator() -> StateSpace {
        StateSpace::from_rows(&[&[0.0, 1.0], &[0.0, 0.0]], &[0.0, 1.0]).unwrap()
    }

    #[test]
    fn columns_are_ascending_powers() {
        let sys = StateSpace::from_rows(
            &[&[1.0, 2.0, 0.0], &[0.0, 1.0, 3.0], &[1.0, 0.0, 1.0]],
            &[1.0, 0.0, 2.0],
        )
        .unwrap();
        let c = controllability_matrix(&sys);
        let ab = sys.a() * sys.b();
        let a2b = sys.a() * &ab;
        for i in 0..3 {
            assert_relative_eq!(c[(i, 0)], sys.b()[(i, 0)]);
            assert_relative_eq!(c[(i, 1)], ab[(i, 0)]);
            assert_relative_eq!(c[(i, 2)], a2b[(i, 0)]);
        }
    }

    #[test]
    fn double_integrator_is_controllable() {
        let c = controllability_matrix(&double_integrator());
        assert_eq!(numerical_rank(&c, None), 2);
        assert!(check_controllable(&c, &PlacementConfig::default()).is_ok());
    }

    #[test]
    fn decoupled_mode_is_uncontrollable() {
        // second state never sees the input
        let sys = StateSpace::from_rows(&[&[-1.0, 0.0], &[0.0, -2.0]], &[1.0, 0.0]).unwrap();
        let c = controllability_matrix(&sys);
        let err = check_controllable(&c, &PlacementConfig::default()).unwrap_err();
        assert_eq!(err, PlacementError::Uncontrollable { rank: 1, n: 2 });
    }

    #[test]
    fn rank_uses_tolerance_not_exact_zero() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 1e-18]);
        assert_eq!(numerical_rank(&m, None), 1);
        assert_eq!(numerical_rank(&m, Some(1e-20)), 2);
    }

    #[test]
    fn reciprocal_condition_of_identity_is_one() {
        assert_relative_eq!(reciprocal_condition(&DMatrix::identity(3, 3)), 1.0, epsilon = 1e-12);
        assert_eq!(reciprocal_condition(&DMatrix::zeros(2, 2)), 0.0);
    }
}
