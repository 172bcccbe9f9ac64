use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ascii::{parse_rows, split_table};
use crate::constants::{INTENSITY_FLOOR, SPEED_OF_LIGHT, UM_PER_ANGSTROM};
use crate::ebl::EblInterpolator;
use crate::error::{EblError, Result};
use crate::grid::EblGrid;

/// Tabulated EBL models shipped as ASCII files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EblModel {
    Kneiske,
    Franceschini,
    Dominguez,
    DominguezUpper,
    DominguezLower,
    Inoue,
    InoueLowPop3,
    InoueUpPop3,
    Gilmore,
    GilmoreFixed,
    Cuba,
    Finke,
}

/// (model, name, file name, publication)
const MODELS: &[(EblModel, &str, &str, &str)] = &[
    (EblModel::Kneiske, "kneiske", "ebl_nuFnu_tanja.dat", "Kneiske & Dole (2010)"),
    (EblModel::Franceschini, "franceschini", "ebl_franceschini.dat", "Franceschini et al. (2008)"),
    (EblModel::Dominguez, "dominguez", "ebl_dominguez11.out", "Dominguez et al. (2011)"),
    (
        EblModel::DominguezUpper,
        "dominguez-upper",
        "ebl_upper_uncertainties_dominguez11.out",
        "Dominguez et al. (2011), upper uncertainty",
    ),
    (
        EblModel::DominguezLower,
        "dominguez-lower",
        "ebl_lower_uncertainties_dominguez11.out",
        "Dominguez et al. (2011), lower uncertainty",
    ),
    (EblModel::Inoue, "inoue", "EBL_z_0_baseline.dat", "Inoue et al. (2013), baseline"),
    (
        EblModel::InoueLowPop3,
        "inoue-low-pop3",
        "EBL_z_0_low_pop3.dat",
        "Inoue et al. (2013), low pop 3",
    ),
    (
        EblModel::InoueUpPop3,
        "inoue-up-pop3",
        "EBL_z_0_up_pop3.dat",
        "Inoue et al. (2013), up pop 3",
    ),
    (EblModel::Gilmore, "gilmore", "eblflux_fiducial.dat", "Gilmore et al. (2012), fiducial"),
    (EblModel::GilmoreFixed, "gilmore-fixed", "eblflux_fixed.dat", "Gilmore et al. (2012), fixed"),
    (EblModel::Cuba, "cuba", "CUBA_UVB.dat", "Haardt & Madau (2012)"),
    (EblModel::Finke, "finke", "ebl_modelC_Finke.txt", "Finke et al. (2012), model C"),
];

impl EblModel {
    pub fn all() -> impl Iterator<Item = EblModel> {
        MODELS.iter().map(|&(m, ..)| m)
    }

    fn entry(self) -> &'static (EblModel, &'static str, &'static str, &'static str) {
        MODELS
            .iter()
            .find(|(m, ..)| *m == self)
            .unwrap_or_else(|| unreachable!("every model has a table entry"))
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    pub fn file_name(self) -> &'static str {
        self.entry().2
    }

    pub fn reference(self) -> &'static str {
        self.entry().3
    }

    /// The Inoue tables are only given at z = 0 and their conversion to a
    /// redshift grid is not implemented.
    pub fn is_supported(self) -> bool {
        !matches!(
            self,
            EblModel::Inoue | EblModel::InoueLowPop3 | EblModel::InoueUpPop3
        )
    }

    pub fn check_supported(self) -> Result<()> {
        if self.is_supported() {
            return Ok(());
        }
        Err(EblError::UnsupportedModelVariant {
            model: self.name().to_string(),
            reason: "Inoue models are not correctly implemented, choose another model"
                .to_string(),
        })
    }

    /// Converts a parsed model table into a grid in microns and
    /// nW m^-2 sr^-1.
    pub fn grid_from_rows(self, rows: &[Vec<f64>]) -> Result<EblGrid> {
        self.check_supported()?;
        match self {
            EblModel::Gilmore | EblModel::GilmoreFixed => {
                let (z, wavelength_aa, intensity) = split_table(rows, 0)?;
                let wavelength_um = wavelength_aa.iter().map(|l| l * UM_PER_ANGSTROM).collect();
                let mut grid = EblGrid::new(z, wavelength_um, intensity)?;
                replace_zeros(&mut grid);
                // erg s^-1 cm^-2 Å^-1 sr^-1 -> nW m^-2 sr^-1
                for (mut row, &l) in grid.intensity.rows_mut().into_iter().zip(&wavelength_aa) {
                    row *= l * 1e4 * 1e-7 * 1e9;
                }
                Ok(grid)
            }
            EblModel::Cuba => {
                // last column is not part of the redshift grid
                let (z, wavelength_aa, intensity) = split_table(rows, 1)?;
                let wavelength_um: Vec<f64> =
                    wavelength_aa.iter().map(|l| l * UM_PER_ANGSTROM).collect();
                let mut grid = EblGrid::new(z, wavelength_um.clone(), intensity)?;
                replace_zeros(&mut grid);
                // Jν in erg s^-1 cm^-2 Hz^-1 sr^-1 -> νJν in nW m^-2 sr^-1
                for (mut row, &l) in grid.intensity.rows_mut().into_iter().zip(&wavelength_um) {
                    row *= SPEED_OF_LIGHT / (l * 1e-6) * 1e6;
                }
                Ok(grid)
            }
            EblModel::Finke => {
                let (z, wavelength_aa, intensity) = split_table(rows, 0)?;
                let wavelength_um = wavelength_aa
                    .iter()
                    .rev()
                    .map(|l| l * UM_PER_ANGSTROM)
                    .collect();
                let intensity = intensity.slice(ndarray::s![..;-1, ..]).to_owned();
                EblGrid::new(z, wavelength_um, intensity)
            }
            _ => {
                let (z, wavelength_um, intensity) = split_table(rows, 0)?;
                EblGrid::new(z, wavelength_um, intensity)
            }
        }
    }
}

fn replace_zeros(grid: &mut EblGrid) {
    let replaced = grid.floor_zeros(INTENSITY_FLOOR);
    if replaced > 0 {
        log::debug!("replaced {replaced} zero intensities by {INTENSITY_FLOOR:e}");
    }
}

impl FromStr for EblModel {
    type Err = EblError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        MODELS
            .iter()
            .find(|(_, name, ..)| *name == lower)
            .map(|&(m, ..)| m)
            .ok_or_else(|| EblError::InvalidModelName(s.to_string()))
    }
}

impl fmt::Display for EblModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the model tables live on disk. The default is an empty path, so
/// tables resolve against the working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub data_dir: PathBuf,
}

impl ModelConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        ModelConfig {
            data_dir: data_dir.into(),
        }
    }

    pub fn path(&self, model: EblModel) -> PathBuf {
        self.data_dir.join(model.file_name())
    }
}

/// Reads and converts the table of a named model.
pub fn load_model(model: EblModel, config: &ModelConfig) -> Result<EblGrid> {
    model.check_supported()?;
    let path = config.path(model);
    log::debug!("reading {model} model from {}", path.display());
    let rows = parse_rows(&std::fs::read_to_string(&path)?)?;
    model.grid_from_rows(&rows)
}

impl EblInterpolator {
    /// Fits a named model from the files under `config.data_dir`.
    pub fn from_model(model: EblModel, config: &ModelConfig) -> Result<Self> {
        Self::new(load_model(model, config)?)
    }

    /// Like [`EblInterpolator::from_model`], resolving the model by name.
    pub fn from_model_name(name: &str, config: &ModelConfig) -> Result<Self> {
        Self::from_model(name.parse()?, config)
    }
}
