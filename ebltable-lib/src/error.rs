use std::fmt;

/// The two axes of an EBL grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    Redshift,
    Wavelength,
}

impl fmt::Display for GridAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redshift => f.write_str("redshift"),
            Self::Wavelength => f.write_str("wavelength"),
        }
    }
}

#[derive(Debug)]
pub enum EblError {
    InvalidModelName(String),
    UnsupportedModelVariant { model: String, reason: String },
    ShapeMismatch { expected: (usize, usize), found: (usize, usize) },
    NonMonotonicAxis { axis: GridAxis, index: usize, value: f64 },
    NonPositiveIntensity { row: usize, col: usize, value: f64 },
    NonPositiveWavelength(f64),
    InvalidDegree { axis: GridAxis, degree: usize, points: usize },
    UnsortedQuery(GridAxis),
    NonFiniteQuery { axis: GridAxis, value: f64 },
    InvalidEnergy(f64),
    InvalidIntegration(String),
    /// Non-fatal: only ever rendered into a warning log record.
    BelowDomainRange { z: f64, zmin: f64 },
    Parse { line: usize, msg: String },
    MissingSection(String),
    MissingColumn { section: String, column: String },
    UnknownUnit(String),
    DataError(String),
    Io(std::io::Error),
}

pub type Result<T> = std::result::Result<T, EblError>;

impl fmt::Display for EblError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidModelName(name) => write!(f, "unknown EBL model: {name}"),
            Self::UnsupportedModelVariant { model, reason } => {
                write!(f, "EBL model '{model}' is not supported: {reason}")
            }
            Self::ShapeMismatch { expected, found } => write!(
                f,
                "intensity grid has shape {:?}, expected {:?} (wavelengths, redshifts)",
                found, expected
            ),
            Self::NonMonotonicAxis { axis, index, value } => write!(
                f,
                "{axis} axis is not strictly increasing at index {index} (value {value})"
            ),
            Self::NonPositiveIntensity { row, col, value } => {
                write!(f, "intensity at [{row}, {col}] must be positive, got {value}")
            }
            Self::NonPositiveWavelength(l) => {
                write!(f, "wavelengths must be positive, got {l} um")
            }
            Self::InvalidDegree {
                axis,
                degree,
                points,
            } => write!(
                f,
                "spline degree {degree} along {axis} axis needs 1..=5 and more than {degree} points, got {points}"
            ),
            Self::UnsortedQuery(axis) => {
                write!(f, "{axis} query coordinates must be non-decreasing")
            }
            Self::NonFiniteQuery { axis, value } => {
                write!(f, "non-finite {axis} query value: {value}")
            }
            Self::InvalidEnergy(e) => write!(f, "photon energy must be positive, got {e} eV"),
            Self::InvalidIntegration(msg) => write!(f, "invalid integration range: {msg}"),
            Self::BelowDomainRange { z, zmin } => write!(
                f,
                "a z value ({z:.3}) is below interpolation range, zmin = {zmin:.2}"
            ),
            Self::Parse { line, msg } => write!(f, "parse error on line {line}: {msg}"),
            Self::MissingSection(name) => write!(f, "table section '{name}' not found"),
            Self::MissingColumn { section, column } => {
                write!(f, "column '{column}' not found in section '{section}'")
            }
            Self::UnknownUnit(unit) => write!(f, "unknown length unit: {unit}"),
            Self::DataError(msg) => write!(f, "data error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for EblError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EblError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
