use std::io::Read;
use std::path::Path;

use ebltable_data::{TABLE_FORMAT_VERSION, TableColumn, TableFile, TableSection};
use ruzstd::encoding::{CompressionLevel, compress_to_vec};
use serde::{Deserialize, Serialize};

use crate::ebl::EblInterpolator;
use crate::error::{EblError, Result};
use crate::grid::EblGrid;

/// Unit annotation written for wavelength columns.
pub const WAVELENGTH_UNIT: &str = "micrometer";

/// Names of the sections and columns of a persisted EBL table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableLayout {
    /// Section holding redshifts and one intensity row per redshift.
    pub section_grid: String,
    /// Section holding the wavelength list.
    pub section_wavelength: String,
    pub col_redshift: String,
    pub col_intensity: String,
    pub col_wavelength: String,
}

impl Default for TableLayout {
    fn default() -> Self {
        TableLayout {
            section_grid: "NUINU_VS_Z".to_string(),
            section_wavelength: "WAVELENGTHS".to_string(),
            col_redshift: "REDSHIFT".to_string(),
            col_intensity: "EBL_DENS".to_string(),
            col_wavelength: "WAVELENGTH".to_string(),
        }
    }
}

/// Conversion factor from a length unit to microns. A missing unit means
/// microns.
pub fn length_unit_to_um(unit: Option<&str>) -> Result<f64> {
    let Some(unit) = unit else {
        return Ok(1.0);
    };
    match unit.trim().to_lowercase().as_str() {
        "micrometer" | "micron" | "um" | "µm" => Ok(1.0),
        "nm" | "nanometer" => Ok(1e-3),
        "angstrom" | "aa" | "å" => Ok(1e-4),
        "mm" | "millimeter" => Ok(1e3),
        "cm" | "centimeter" => Ok(1e4),
        "m" | "meter" => Ok(1e6),
        _ => Err(EblError::UnknownUnit(unit.to_string())),
    }
}

/// Serializes a table with postcard and compresses it with zstd.
pub fn encode_table(table: &TableFile) -> Result<Vec<u8>> {
    let serialized =
        postcard::to_allocvec(table).map_err(|e| EblError::DataError(e.to_string()))?;
    Ok(compress_to_vec(&serialized[..], CompressionLevel::Fastest))
}

/// Decompresses and deserializes a table, rejecting other format versions.
pub fn decode_table(bytes: &[u8]) -> Result<TableFile> {
    let mut decoder = ruzstd::decoding::StreamingDecoder::new(bytes)
        .map_err(|e| EblError::DataError(format!("zstd: {e}")))?;
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    let table: TableFile =
        postcard::from_bytes(&decompressed).map_err(|e| EblError::DataError(e.to_string()))?;
    if table.version != TABLE_FORMAT_VERSION {
        return Err(EblError::DataError(format!(
            "table format version {} (expected {TABLE_FORMAT_VERSION})",
            table.version
        )));
    }
    Ok(table)
}

fn find_column<'a>(table: &'a TableFile, section: &str, column: &str) -> Result<&'a TableColumn> {
    table
        .section(section)
        .ok_or_else(|| EblError::MissingSection(section.to_string()))?
        .column(column)
        .ok_or_else(|| EblError::MissingColumn {
            section: section.to_string(),
            column: column.to_string(),
        })
}

/// Extracts the raw grid from a table.
///
/// The intensity column holds one row per redshift; the returned grid is
/// transposed to one row per wavelength.
pub fn grid_from_table(table: &TableFile, layout: &TableLayout) -> Result<EblGrid> {
    let z_col = find_column(table, &layout.section_grid, &layout.col_redshift)?;
    let ebl_col = find_column(table, &layout.section_grid, &layout.col_intensity)?;
    let l_col = find_column(table, &layout.section_wavelength, &layout.col_wavelength)?;

    let to_um = length_unit_to_um(l_col.unit.as_deref())?;
    let wavelength_um: Vec<f64> = l_col.data.iter().map(|l| l * to_um).collect();
    let z = z_col.data.clone();

    let rows = ebl_col.rows();
    if rows != z.len() || ebl_col.width as usize != wavelength_um.len() {
        return Err(EblError::ShapeMismatch {
            expected: (wavelength_um.len(), z.len()),
            found: (ebl_col.width as usize, rows),
        });
    }
    let intensity =
        ndarray::Array2::from_shape_fn((wavelength_um.len(), z.len()), |(i, j)| ebl_col.row(j)[i]);
    EblGrid::new(z, wavelength_um, intensity)
}

/// Builds the two-section table for intensities `intensity[[i, j]]` at
/// redshift `z[i]` and wavelength `wavelength_um[j]`.
pub fn table_from_values(
    z: &[f64],
    wavelength_um: &[f64],
    intensity: &ndarray::Array2<f64>,
    layout: &TableLayout,
) -> TableFile {
    let grid = TableSection {
        name: layout.section_grid.clone(),
        columns: vec![
            TableColumn {
                name: layout.col_redshift.clone(),
                unit: None,
                width: 1,
                data: z.to_vec(),
            },
            TableColumn {
                name: layout.col_intensity.clone(),
                unit: Some("nW / (m2 sr)".to_string()),
                width: wavelength_um.len() as u32,
                data: intensity.iter().copied().collect(),
            },
        ],
    };
    let wavelengths = TableSection {
        name: layout.section_wavelength.clone(),
        columns: vec![TableColumn {
            name: layout.col_wavelength.clone(),
            unit: Some(WAVELENGTH_UNIT.to_string()),
            width: 1,
            data: wavelength_um.to_vec(),
        }],
    };
    TableFile::new(vec![grid, wavelengths])
}

pub fn read_table(path: impl AsRef<Path>, layout: &TableLayout) -> Result<EblGrid> {
    let bytes = std::fs::read(path)?;
    grid_from_table(&decode_table(&bytes)?, layout)
}

impl EblInterpolator {
    /// Fits a model to a persisted table file.
    pub fn read_table(path: impl AsRef<Path>, layout: &TableLayout) -> Result<Self> {
        Self::new(read_table(path, layout)?)
    }

    pub fn from_table_bytes(bytes: &[u8], layout: &TableLayout) -> Result<Self> {
        Self::new(grid_from_table(&decode_table(bytes)?, layout)?)
    }

    /// Evaluates the model on `z × wavelength_um` and encodes the result.
    pub fn to_table_bytes(
        &self,
        z: &[f64],
        wavelength_um: &[f64],
        layout: &TableLayout,
    ) -> Result<Vec<u8>> {
        let intensity = self.intensity_at(z, wavelength_um)?;
        encode_table(&table_from_values(z, wavelength_um, &intensity, layout))
    }

    /// Writes the model evaluated on `z × wavelength_um` to `path`,
    /// replacing any existing file.
    pub fn write_table(
        &self,
        path: impl AsRef<Path>,
        z: &[f64],
        wavelength_um: &[f64],
        layout: &TableLayout,
    ) -> Result<()> {
        let bytes = self.to_table_bytes(z, wavelength_um, layout)?;
        std::fs::write(path.as_ref(), bytes)?;
        log::debug!(
            "wrote {}x{} EBL table to {}",
            z.len(),
            wavelength_um.len(),
            path.as_ref().display()
        );
        Ok(())
    }
}
