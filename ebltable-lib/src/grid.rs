use ndarray::{Array2, Axis};

use crate::axis;
use crate::error::{EblError, GridAxis, Result};

/// Raw tabulated EBL model: the three arrays every loader produces.
///
/// `intensity` has one row per wavelength and one column per redshift,
/// in nW m^-2 sr^-1.
#[derive(Debug, Clone, PartialEq)]
pub struct EblGrid {
    pub z: Vec<f64>,
    pub wavelength_um: Vec<f64>,
    pub intensity: Array2<f64>,
}

impl EblGrid {
    pub fn new(z: Vec<f64>, wavelength_um: Vec<f64>, intensity: Array2<f64>) -> Result<Self> {
        let grid = EblGrid {
            z,
            wavelength_um,
            intensity,
        };
        grid.check_shape()?;
        Ok(grid)
    }

    /// Builds a grid from a row-major buffer of `wavelength_um.len()` rows
    /// by `z.len()` columns.
    pub fn from_row_major(z: Vec<f64>, wavelength_um: Vec<f64>, data: Vec<f64>) -> Result<Self> {
        let shape = (wavelength_um.len(), z.len());
        if data.len() != shape.0 * shape.1 {
            return Err(EblError::DataError(format!(
                "intensity buffer holds {} values, expected {} x {}",
                data.len(),
                shape.0,
                shape.1
            )));
        }
        let intensity = Array2::from_shape_vec(shape, data)
            .map_err(|e| EblError::DataError(e.to_string()))?;
        Self::new(z, wavelength_um, intensity)
    }

    /// (wavelengths, redshifts)
    pub fn shape(&self) -> (usize, usize) {
        (self.wavelength_um.len(), self.z.len())
    }

    pub fn check_shape(&self) -> Result<()> {
        if self.intensity.dim() != self.shape() {
            return Err(EblError::ShapeMismatch {
                expected: self.shape(),
                found: self.intensity.dim(),
            });
        }
        Ok(())
    }

    /// Replaces exact zero intensities with `floor`. Negative entries are
    /// left for [`EblGrid::sanitized`] to reject.
    ///
    /// Returns the number of entries replaced.
    pub fn floor_zeros(&mut self, floor: f64) -> usize {
        let mut replaced = 0;
        self.intensity.mapv_inplace(|v| {
            if v == 0.0 {
                replaced += 1;
                floor
            } else {
                v
            }
        });
        replaced
    }

    /// Returns the grid with both axes strictly increasing and every
    /// intensity positive, reordering rows and columns as needed.
    pub fn sanitized(self) -> Result<Self> {
        self.check_shape()?;
        let (wavelength_um, rows) = axis::sanitize(&self.wavelength_um, GridAxis::Wavelength)?;
        if let Some(&first) = wavelength_um.first().filter(|&&l| l <= 0.0) {
            return Err(EblError::NonPositiveWavelength(first));
        }
        let (z, cols) = axis::sanitize(&self.z, GridAxis::Redshift)?;
        let intensity = self
            .intensity
            .select(Axis(0), &rows)
            .select(Axis(1), &cols);

        if let Some(((row, col), &value)) = intensity
            .indexed_iter()
            .find(|&(_, &v)| !(v > 0.0 && v.is_finite()))
        {
            return Err(EblError::NonPositiveIntensity { row, col, value });
        }

        Ok(EblGrid {
            z,
            wavelength_um,
            intensity,
        })
    }
}
