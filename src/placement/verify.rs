use nalgebra::Complex;

use crate::system::StateSpace;
use super::ackermann::FeedbackGain;

/// Eigenvalues of A - B K, computed independently of the design path.
pub fn closed_loop_poles(sys: &StateSpace, gain: &FeedbackGain) -> Vec<Complex<f64>> {
    sys.closed_loop(gain).complex_eigenvalues().iter().copied().collect()
}

/// For each desired pole in order, the nearest actual pole not already
/// claimed by an earlier one. `None` once the actual poles run out.
pub fn pair_poles(actual: &[Complex<f64>], desired: &[Complex<f64>]) -> Vec<Option<Complex<f64>>> {
    let mut claimed = vec![false; actual.len()];
    desired
        .iter()
        .map(|d| {
            let (i, a) = actual
                .iter()
                .enumerate()
                .filter(|(i, _)| !claimed[*i])
                .min_by(|x, y| (x.1 - d).norm().total_cmp(&(y.1 - d).norm()))?;
            claimed[i] = true;
            Some(*a)
        })
        .collect()
}

/// Pair poles as in [`pair_poles`] and check each distance against
/// `rel_tol * max(1, |desired|)`.
pub fn poles_match(actual: &[Complex<f64>], desired: &[Complex<f64>], rel_tol: f64) -> bool {
    if actual.len() != desired.len() {
        return false;
    }
    pair_poles(actual, desired)
        .iter()
        .zip(desired)
        .all(|(a, d)| matches!(a, Some(a) if (a - d).norm() <= rel_tol * d.norm().max(1.0)))
}

/// Largest distance between a desired pole and its paired actual pole.
pub fn max_pole_error(actual: &[Complex<f64>], desired: &[Complex<f64>]) -> f64 {
    pair_poles(actual, desired)
        .iter()
        .zip(desired)
        .map(|(a, d)| a.map_or(f64::INFINITY, |a| (a - d).norm()))
        .fold(0.0_f64, f64::max)
}
