//! Extragalactic background light (EBL) from tabulated models.
//!
//! An [`EblInterpolator`] fits a spline surface to a model grid of νIν
//! over wavelength and redshift and answers intensity, photon density and
//! integrated-intensity queries at arbitrary points.
//!
//! ```no_run
//! use ebltable::{EblInterpolator, EblModel, IntegralRange, ModelConfig};
//!
//! let config = ModelConfig::new("/path/to/ebl/data");
//! let ebl = EblInterpolator::from_model(EblModel::Dominguez, &config)?;
//! let nuinu = ebl.intensity_at(&[0.0, 0.5], &[1.0, 10.0, 100.0])?;
//! let n = ebl.density_at(&[0.1], &[0.5, 1.0])?;
//! let total = ebl.integral_at(0.0, &IntegralRange::default())?;
//! # Ok::<(), ebltable::EblError>(())
//! ```

pub mod ascii;
pub mod axis;
pub mod constants;
pub mod ebl;
pub mod error;
pub mod grid;
pub mod integrate;
pub mod models;
pub mod spline;
pub mod table;

pub use ebl::{EblInterpolator, IntegralRange};
pub use error::{EblError, GridAxis, Result};
pub use grid::EblGrid;
pub use models::{EblModel, ModelConfig};
pub use spline::BivariateSpline;
pub use table::TableLayout;
pub use ebltable_data;
