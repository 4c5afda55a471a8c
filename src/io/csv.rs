use std::io::{self, Write};

use nalgebra::Complex;

use crate::placement::pair_poles;

/// Write desired vs achieved closed-loop poles as CSV.
///
/// Columns: index, desired_re, desired_im, achieved_re, achieved_im, error.
/// Achieved poles are paired with the nearest desired pole, unpaired rows
/// are left empty.
pub fn write_pole_table<W: Write>(
    writer: &mut W,
    desired: &[Complex<f64>],
    achieved: &[Complex<f64>],
) -> io::Result<()> {
    writeln!(writer, "index,desired_re,desired_im,achieved_re,achieved_im,error")?;

    for (i, (d, a)) in desired.iter().zip(pair_poles(achieved, desired)).enumerate() {
        match a {
            Some(a) => writeln!(
                writer,
                "{},{:.6},{:.6},{:.6},{:.6},{:.3e}",
                i, d.re, d.im, a.re, a.im, (a - d).norm()
            )?,
            None => writeln!(writer, "{},{:.6},{:.6},,,", i, d.re, d.im)?,
        }
    }

    Ok(())
}

/// Write the pole table to a CSV file at the given path.
pub fn write_pole_table_file(
    path: &str,
    desired: &[Complex<f64>],
    achieved: &[Complex<f64>],
) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_pole_table(&mut file, desired, achieved)
}
