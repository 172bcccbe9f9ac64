use std::f64::consts::{LN_10, PI};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::axis::argsort;
use crate::constants::{ELEMENTARY_CHARGE, PLANCK_HC_EV_UM, SPEED_OF_LIGHT};
use crate::error::{EblError, GridAxis, Result};
use crate::grid::EblGrid;
use crate::integrate::{linspace, simpson};
use crate::spline::BivariateSpline;

/// Default spline degree along both axes.
pub const DEFAULT_DEGREE: usize = 2;

/// Wavelength range and sampling for [`EblInterpolator::integral_at`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegralRange {
    pub lmin_um: f64,
    pub lmax_um: f64,
    pub steps: usize,
}

impl Default for IntegralRange {
    fn default() -> Self {
        IntegralRange {
            lmin_um: 0.01,
            lmax_um: 1e3,
            steps: 50,
        }
    }
}

/// EBL intensity model interpolated from a tabulated grid.
///
/// The surface is a spline over (log10 wavelength, redshift) of the log10
/// intensity, so results stay positive and smooth across the many decades
/// a model spans. Instances are immutable; the `with_*` methods refit a
/// new instance from the canonical arrays.
#[derive(Debug, Clone)]
pub struct EblInterpolator {
    grid: EblGrid,
    log_wavelength: Vec<f64>,
    log_intensity: Array2<f64>,
    kx: usize,
    ky: usize,
    spline: BivariateSpline,
}

impl EblInterpolator {
    /// Fits a model with quadratic splines along both axes.
    pub fn new(grid: EblGrid) -> Result<Self> {
        Self::with_degrees_from(grid, DEFAULT_DEGREE, DEFAULT_DEGREE)
    }

    /// Fits a model with spline degree `kx` along wavelength and `ky` along
    /// redshift.
    pub fn with_degrees_from(grid: EblGrid, kx: usize, ky: usize) -> Result<Self> {
        let grid = grid.sanitized()?;
        let log_wavelength: Vec<f64> = grid.wavelength_um.iter().map(|l| l.log10()).collect();
        let log_intensity = grid.intensity.mapv(f64::log10);
        let spline = BivariateSpline::fit(&log_wavelength, &grid.z, &log_intensity, kx, ky)?;
        Ok(EblInterpolator {
            grid,
            log_wavelength,
            log_intensity,
            kx,
            ky,
            spline,
        })
    }

    /// Tabulated redshifts, ascending.
    pub fn z(&self) -> &[f64] {
        &self.grid.z
    }

    /// Tabulated wavelengths in microns, ascending.
    pub fn wavelength_um(&self) -> &[f64] {
        &self.grid.wavelength_um
    }

    /// log10 of the tabulated wavelengths, the spline's first coordinate.
    pub fn log_wavelength(&self) -> &[f64] {
        &self.log_wavelength
    }

    /// Tabulated intensities in nW m^-2 sr^-1.
    pub fn intensity(&self) -> &Array2<f64> {
        &self.grid.intensity
    }

    /// log10 of the tabulated intensities, the values the spline
    /// interpolates.
    pub fn log_intensity(&self) -> &Array2<f64> {
        &self.log_intensity
    }

    /// (kx, ky)
    pub fn degrees(&self) -> (usize, usize) {
        (self.kx, self.ky)
    }

    /// The fitted surface over (log10 λ, z).
    pub fn spline(&self) -> &BivariateSpline {
        &self.spline
    }

    /// Smallest tabulated redshift.
    pub fn zmin(&self) -> f64 {
        self.grid.z[0]
    }

    /// The canonical (sanitized) grid the spline was fitted to.
    pub fn grid(&self) -> &EblGrid {
        &self.grid
    }

    /// Refits with a new redshift axis, keeping wavelengths and intensities.
    pub fn with_redshifts(&self, z: Vec<f64>) -> Result<Self> {
        let grid = EblGrid::new(
            z,
            self.grid.wavelength_um.clone(),
            self.grid.intensity.clone(),
        )?;
        Self::with_degrees_from(grid, self.kx, self.ky)
    }

    /// Refits with a new wavelength axis (microns), keeping redshifts and
    /// intensities.
    pub fn with_wavelengths(&self, wavelength_um: Vec<f64>) -> Result<Self> {
        let grid = EblGrid::new(
            self.grid.z.clone(),
            wavelength_um,
            self.grid.intensity.clone(),
        )?;
        Self::with_degrees_from(grid, self.kx, self.ky)
    }

    /// Refits with a new intensity grid on the same axes.
    pub fn with_intensity(&self, intensity: Array2<f64>) -> Result<Self> {
        let grid = EblGrid::new(
            self.grid.z.clone(),
            self.grid.wavelength_um.clone(),
            intensity,
        )?;
        Self::with_degrees_from(grid, self.kx, self.ky)
    }

    /// Refits the same grid with other spline degrees.
    pub fn with_degrees(&self, kx: usize, ky: usize) -> Result<Self> {
        Self::with_degrees_from(self.grid.clone(), kx, ky)
    }

    /// Returns EBL intensity νIν in nW m^-2 sr^-1, shaped
    /// `(z.len(), wavelength_um.len())`.
    ///
    /// Redshifts below the table are evaluated at the lowest tabulated
    /// redshift, and a warning is logged once per call.
    pub fn intensity_at(&self, z: &[f64], wavelength_um: &[f64]) -> Result<Array2<f64>> {
        check_finite(z, GridAxis::Redshift)?;
        check_finite(wavelength_um, GridAxis::Wavelength)?;
        if let Some(&l) = wavelength_um.iter().find(|&&l| l <= 0.0) {
            return Err(EblError::NonPositiveWavelength(l));
        }
        self.warn_below_range(z);

        // The spline is only evaluated on non-decreasing coordinates.
        let z_order = argsort(z);
        let l_order = argsort(wavelength_um);
        let z_sorted: Vec<f64> = z_order.iter().map(|&i| z[i]).collect();
        let log_l_sorted: Vec<f64> = l_order.iter().map(|&i| wavelength_um[i].log10()).collect();
        let sorted = self.spline.evaluate_grid(&log_l_sorted, &z_sorted)?;

        let mut result = Array2::zeros((z.len(), wavelength_um.len()));
        for (b, &li) in l_order.iter().enumerate() {
            for (a, &zi) in z_order.iter().enumerate() {
                result[[zi, li]] = 10f64.powf(sorted[[b, a]]);
            }
        }
        Ok(result)
    }

    /// Intensity at a single (redshift, wavelength) point.
    pub fn intensity_one(&self, z: f64, wavelength_um: f64) -> Result<f64> {
        Ok(self.intensity_at(&[z], &[wavelength_um])?[[0, 0]])
    }

    /// Returns EBL photon number density in photons cm^-3 eV^-1, shaped
    /// `(z.len(), energy_ev.len())`.
    pub fn density_at(&self, z: &[f64], energy_ev: &[f64]) -> Result<Array2<f64>> {
        if let Some(&e) = energy_ev.iter().find(|&&e| !(e > 0.0 && e.is_finite())) {
            return Err(EblError::InvalidEnergy(e));
        }
        let wavelength_um: Vec<f64> = energy_ev.iter().map(|e| PLANCK_HC_EV_UM / e).collect();
        let energy_j: Vec<f64> = energy_ev.iter().map(|e| e * ELEMENTARY_CHARGE).collect();

        let mut n = self.intensity_at(z, &wavelength_um)?;
        for mut row in n.rows_mut() {
            for (v, &e) in row.iter_mut().zip(&energy_j) {
                // nW m^-2 sr^-1 -> J^-1 m^-3 -> eV^-1 cm^-3
                let per_joule = 4.0 * PI / (SPEED_OF_LIGHT * e * e) * *v * 1e-9;
                *v = per_joule * ELEMENTARY_CHARGE * 1e-6;
            }
        }
        Ok(n)
    }

    /// Photon density at a single (redshift, energy) point.
    pub fn density_one(&self, z: f64, energy_ev: f64) -> Result<f64> {
        Ok(self.density_at(&[z], &[energy_ev])?[[0, 0]])
    }

    /// Returns the EBL intensity integrated over wavelength at redshift `z`,
    /// ∫ ln(10) νIν d ln λ on log-uniform samples.
    pub fn integral_at(&self, z: f64, range: &IntegralRange) -> Result<f64> {
        let IntegralRange {
            lmin_um,
            lmax_um,
            steps,
        } = *range;
        if steps < 2 {
            return Err(EblError::InvalidIntegration(format!(
                "need at least 2 steps, got {steps}"
            )));
        }
        if !(lmin_um > 0.0 && lmax_um > lmin_um && lmax_um.is_finite()) {
            return Err(EblError::InvalidIntegration(format!(
                "wavelength range [{lmin_um}, {lmax_um}] um"
            )));
        }

        let log_l = linspace(lmin_um.log10(), lmax_um.log10(), steps);
        let wavelength_um: Vec<f64> = log_l.iter().map(|&x| 10f64.powf(x)).collect();
        let ln_l: Vec<f64> = log_l.iter().map(|x| x * LN_10).collect();
        let nuinu = self.intensity_at(&[z], &wavelength_um)?;
        let integrand: Vec<f64> = nuinu.row(0).iter().map(|v| LN_10 * v).collect();
        simpson(&integrand, &ln_l)
    }

    fn warn_below_range(&self, z: &[f64]) {
        let zmin = self.zmin();
        if let Some(&lowest) = z
            .iter()
            .filter(|&&v| v < zmin)
            .min_by(|a, b| a.total_cmp(b))
        {
            log::warn!("{}", EblError::BelowDomainRange { z: lowest, zmin });
        }
    }
}

fn check_finite(values: &[f64], axis: GridAxis) -> Result<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(EblError::NonFiniteQuery { axis, value }),
        None => Ok(()),
    }
}
