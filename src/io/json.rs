use std::io::{self, Write};

use nalgebra::Complex;

use crate::error::Result;
use crate::placement::{
    characteristic_coefficients, closed_loop_poles, controllability_matrix, max_pole_error,
    numerical_rank, reciprocal_condition, FeedbackGain, PlacementConfig,
};
use crate::system::StateSpace;

/// Design record: inputs, gain and the closed-loop check.
#[derive(Debug, Clone)]
pub struct DesignSummary {
    pub state_dim: usize,
    pub desired_poles: Vec<Complex<f64>>,
    pub coefficients: Vec<f64>,
    pub controllability_rank: usize,
    pub controllability_rcond: f64,
    pub gain: FeedbackGain,
    pub achieved_poles: Vec<Complex<f64>>,
    pub max_pole_error: f64,
}

impl DesignSummary {
    /// Recompute diagnostics for an already designed gain.
    pub fn new(
        sys: &StateSpace,
        poles: &[Complex<f64>],
        gain: &FeedbackGain,
        config: &PlacementConfig,
    ) -> Result<Self> {
        let c = controllability_matrix(sys);
        let achieved = closed_loop_poles(sys, gain);
        Ok(DesignSummary {
            state_dim: sys.dim(),
            desired_poles: poles.to_vec(),
            coefficients: characteristic_coefficients(poles, config)?,
            controllability_rank: numerical_rank(&c, config.rank_tolerance),
            controllability_rcond: reciprocal_condition(&c),
            gain: gain.clone(),
            max_pole_error: max_pole_error(&achieved, poles),
            achieved_poles: achieved,
        })
    }
}

fn join<T>(items: &[T], fmt: impl Fn(&T) -> String) -> String {
    items.iter().map(fmt).collect::<Vec<_>>().join(", ")
}

/// JSON has no inf or NaN.
fn number_json(x: f64) -> String {
    if x.is_finite() {
        format!("{x:e}")
    } else {
        "null".into()
    }
}

fn complex_json(c: &Complex<f64>) -> String {
    format!("{{\"re\": {:.6}, \"im\": {:.6}}}", c.re, c.im)
}

/// Write a design summary as JSON to a writer.
pub fn write_design<W: Write>(writer: &mut W, summary: &DesignSummary) -> io::Result<()> {
    let decimals = summary.gain.decimals();
    writeln!(writer, "{{")?;
    writeln!(writer, "  \"state_dim\": {},", summary.state_dim)?;
    writeln!(writer, "  \"desired_poles\": [{}],", join(&summary.desired_poles, complex_json))?;
    writeln!(
        writer,
        "  \"characteristic_polynomial\": [{}],",
        join(&summary.coefficients, |c| format!("{c}"))
    )?;
    writeln!(writer, "  \"controllability\": {{")?;
    writeln!(writer, "    \"rank\": {},", summary.controllability_rank)?;
    writeln!(writer, "    \"rcond\": {}", number_json(summary.controllability_rcond))?;
    writeln!(writer, "  }},")?;
    writeln!(
        writer,
        "  \"gain\": [{}],",
        join(&summary.gain.rounded(decimals), |k| format!("{k:.decimals$}"))
    )?;
    writeln!(writer, "  \"closed_loop_poles\": [{}],", join(&summary.achieved_poles, complex_json))?;
    writeln!(writer, "  \"max_pole_error\": {}", number_json(summary.max_pole_error))?;
    writeln!(writer, "}}")?;
    Ok(())
}

/// Write a design summary JSON to a file.
pub fn write_design_file(path: &str, summary: &DesignSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_design(&mut file, summary)
}
