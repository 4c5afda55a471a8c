// ---------------------------------------------------------------------------
// Placement configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PlacementConfig {
    /// Singular values at or below this count as zero in the rank test.
    /// `None` uses max(rows, cols) * eps * sigma_max.
    pub rank_tolerance: Option<f64>,
    /// Smallest sigma_min / sigma_max accepted for the controllability matrix.
    pub min_reciprocal_condition: f64,
    /// Relative tolerance for pairing conjugate poles and for treating an
    /// imaginary part as zero.
    pub conjugate_tolerance: f64,
    /// Decimal places used when displaying a gain.
    pub display_decimals: usize,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            rank_tolerance: None,
            min_reciprocal_condition: 1e-12,
            conjugate_tolerance: 1e-9,
            display_decimals: 4,
        }
    }
}
