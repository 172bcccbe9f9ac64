use std::path::Path;

use ndarray::Array2;

use crate::ebl::EblInterpolator;
use crate::error::{EblError, Result};
use crate::grid::EblGrid;

/// Parses a whitespace-delimited numeric table.
///
/// Blank lines and `#` comments are skipped. Every row must have the same
/// number of columns as the first.
pub fn parse_rows(content: &str) -> Result<Vec<Vec<f64>>> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (n, line) in content.lines().enumerate() {
        let data = line.split('#').next().unwrap_or("").trim();
        if data.is_empty() {
            continue;
        }
        let row = data
            .split_whitespace()
            .map(|w| {
                w.parse::<f64>().map_err(|_| EblError::Parse {
                    line: n + 1,
                    msg: format!("'{w}' is not a number"),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        if let Some(first) = rows.first().filter(|first| first.len() != row.len()) {
            return Err(EblError::Parse {
                line: n + 1,
                msg: format!("expected {} columns, found {}", first.len(), row.len()),
            });
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Splits a parsed table into its redshift header, wavelength column and
/// intensity block, dropping the last `skip_last` columns.
pub(crate) fn split_table(
    rows: &[Vec<f64>],
    skip_last: usize,
) -> Result<(Vec<f64>, Vec<f64>, Array2<f64>)> {
    let ncols = rows.first().map_or(0, |r| r.len());
    if rows.len() < 2 || ncols < 2 + skip_last {
        return Err(EblError::Parse {
            line: 0,
            msg: format!(
                "table needs a redshift row and a wavelength column, got {} x {ncols}",
                rows.len()
            ),
        });
    }
    let last = ncols - skip_last;
    let z = rows[0][1..last].to_vec();
    let wavelength = rows[1..].iter().map(|r| r[0]).collect::<Vec<f64>>();
    let intensity = Array2::from_shape_fn((rows.len() - 1, last - 1), |(i, j)| rows[i + 1][j + 1]);
    Ok((z, wavelength, intensity))
}

/// Reads a grid laid out as: row 0 holds the redshifts, column 0 the
/// wavelengths in microns, the rest νIν in nW m^-2 sr^-1. Cell [0, 0] is
/// ignored.
pub fn parse_ascii(content: &str) -> Result<EblGrid> {
    let (z, wavelength_um, intensity) = split_table(&parse_rows(content)?, 0)?;
    EblGrid::new(z, wavelength_um, intensity)
}

pub fn read_ascii(path: impl AsRef<Path>) -> Result<EblGrid> {
    parse_ascii(&std::fs::read_to_string(path)?)
}

impl EblInterpolator {
    /// Fits a model to an ASCII grid file (see [`parse_ascii`]).
    pub fn read_ascii(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(read_ascii(path)?)
    }
}
