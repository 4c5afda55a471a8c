use nalgebra::{Complex, DMatrix};

use crate::error::{PlacementError, Result};
use super::config::PlacementConfig;

// ---------------------------------------------------------------------------
// Desired poles -> monic characteristic polynomial
// ---------------------------------------------------------------------------

fn scale(p: Complex<f64>) -> f64 {
    p.norm().max(1.0)
}

/// Every pole with a non-negligible imaginary part must have a distinct
/// partner equal to its conjugate.
fn check_conjugate_pairs(poles: &[Complex<f64>], tol: f64) -> Result<()> {
    let mut used = vec![false; poles.len()];
    for i in 0..poles.len() {
        let p = poles[i];
        if used[i] || p.im.abs() <= tol * scale(p) {
            continue;
        }
        let target = p.conj();
        let partner = (0..poles.len()).find(|&j| {
            j != i && !used[j] && (poles[j] - target).norm() <= tol * scale(p)
        });
        match partner {
            Some(j) => {
                used[i] = true;
                used[j] = true;
            }
            None => return Err(PlacementError::ComplexPole { pole: p }),
        }
    }
    Ok(())
}

/// Coefficients [1, a1, ..., an] of prod(s - p_i), highest power first.
pub fn characteristic_coefficients(
    poles: &[Complex<f64>],
    config: &PlacementConfig,
) -> Result<Vec<f64>> {
    if poles.iter().any(|p| !p.re.is_finite() || !p.im.is_finite()) {
        return Err(PlacementError::NonFinite { what: "desired poles" });
    }
    check_conjugate_pairs(poles, config.conjugate_tolerance)?;

    let mut coeffs = vec![Complex::new(1.0, 0.0)];
    for &p in poles {
        coeffs.push(Complex::new(0.0, 0.0));
        for k in (1..coeffs.len()).rev() {
            let prev = coeffs[k - 1];
            coeffs[k] -= p * prev;
        }
    }

    // conjugate pairs cancel; what is left in .im is rounding
    let real: Vec<f64> = coeffs.iter().map(|c| c.re).collect();
    log::debug!("characteristic coefficients {real:?}");
    Ok(real)
}

// ---------------------------------------------------------------------------
// Matrix polynomials
// ---------------------------------------------------------------------------

/// phi(A) = c0 A^n + c1 A^(n-1) + ... + cn I, evaluated in Horner form
/// (one matrix product per coefficient after the first).
pub fn eval_matrix_polynomial(coeffs: &[f64], a: &DMatrix<f64>) -> Result<DMatrix<f64>> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(PlacementError::Shape {
            what: "matrix polynomial argument",
            expected: "a square matrix".into(),
            found: a.shape(),
        });
    }
    let identity = DMatrix::<f64>::identity(n, n);
    let mut iter = coeffs.iter();
    let mut phi = match iter.next() {
        Some(&c0) => &identity * c0,
        None => return Ok(DMatrix::zeros(n, n)),
    };
    for &c in iter {
        phi = a * &phi + &identity * c;
    }
    Ok(phi)
}

/// Characteristic polynomial det(sI - M) by Faddeev-LeVerrier, highest power first.
pub fn matrix_characteristic_polynomial(m: &DMatrix<f64>) -> Result<Vec<f64>> {
    let n = m.nrows();
    if m.ncols() != n {
        return Err(PlacementError::Shape {
            what: "characteristic polynomial argument",
            expected: "a square matrix".into(),
            found: m.shape(),
        });
    }
    let identity = DMatrix::<f64>::identity(n, n);
    let mut coeffs = Vec::with_capacity(n + 1);
    coeffs.push(1.0);
    let mut aux = DMatrix::<f64>::zeros(n, n);
    for k in 1..=n {
        aux = m * &aux + &identity * coeffs[k - 1];
        let trace = (m * &aux).trace();
        coeffs.push(-trace / k as f64);
    }
    Ok(coeffs)
}
