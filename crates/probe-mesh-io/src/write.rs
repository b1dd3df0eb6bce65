use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use nalgebra::DMatrix;

use crate::{ProbeFormat, ProbeIoError};

/// Serialize heights in `format` with six decimals.
///
/// The custom layout is `rows`, `cols`, a blank line, then one value per
/// line with a blank line after each row.
pub fn write_heights<W: Write>(
    out: &mut W,
    heights: &DMatrix<f64>,
    format: ProbeFormat,
) -> io::Result<()> {
    match format {
        ProbeFormat::Custom => {
            writeln!(out, "{}", heights.nrows())?;
            writeln!(out, "{}", heights.ncols())?;
            writeln!(out)?;
            for row in heights.row_iter() {
                for value in row.iter() {
                    writeln!(out, "{value:.6}")?;
                }
                writeln!(out)?;
            }
        }
        ProbeFormat::Csv => write_table(out, heights, ",")?,
        ProbeFormat::Whitespace => write_table(out, heights, " ")?,
    }
    Ok(())
}

fn write_table<W: Write>(out: &mut W, heights: &DMatrix<f64>, sep: &str) -> io::Result<()> {
    for row in heights.row_iter() {
        let line: Vec<String> = row.iter().map(|v| format!("{v:.6}")).collect();
        writeln!(out, "{}", line.join(sep))?;
    }
    Ok(())
}

/// Write heights to a file.
pub fn save_heights(
    path: impl AsRef<Path>,
    heights: &DMatrix<f64>,
    format: ProbeFormat,
) -> Result<(), ProbeIoError> {
    let mut out = BufWriter::new(File::create(path)?);
    write_heights(&mut out, heights, format)?;
    out.flush()?;
    Ok(())
}
