#![allow(dead_code)]

use std::cell::RefCell;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Once;

use ebltable::EblGrid;
use log::{Level, LevelFilter, Log, Metadata, Record};
use ndarray::Array2;

/// Smooth two-bump spectrum (stellar peak near 1 um, dust peak near
/// 125 um) that evolves with redshift.
pub fn synthetic_nuinu(wavelength_um: f64, z: f64) -> f64 {
    let x = wavelength_um.log10();
    let stellar = 15.0 * (-(x * x) / (2.0 * 0.35 * 0.35)).exp();
    let dust = 22.0 * (-((x - 2.1) * (x - 2.1)) / (2.0 * 0.3 * 0.3)).exp();
    (stellar * (1.0 + z).powf(1.5) + dust * (1.0 + z).powf(0.8) + 0.3) * (-z / 4.0).exp()
}

pub fn synthetic_redshifts() -> Vec<f64> {
    vec![0.0, 0.2, 0.5, 1.0, 1.5, 2.0, 3.0]
}

/// 61 log-spaced wavelengths from 0.1 to 1000 um.
pub fn synthetic_wavelengths() -> Vec<f64> {
    (0..61).map(|i| 10f64.powf(-1.0 + i as f64 / 15.0)).collect()
}

pub fn synthetic_grid() -> EblGrid {
    let z = synthetic_redshifts();
    let l = synthetic_wavelengths();
    let intensity = Array2::from_shape_fn((l.len(), z.len()), |(i, j)| synthetic_nuinu(l[i], z[j]));
    EblGrid::new(z, l, intensity).unwrap()
}

/// Renders a grid in the plain model layout: redshifts in row 0,
/// wavelengths in column 0.
pub fn plain_table_text(z: &[f64], rows: &[(f64, Vec<f64>)]) -> String {
    let mut out = String::from("# synthetic EBL table\n0.0");
    for v in z {
        write!(out, " {v:.6}").unwrap();
    }
    out.push('\n');
    for (l, values) in rows {
        write!(out, "{l:.10e}").unwrap();
        for v in values {
            write!(out, " {v:.10e}").unwrap();
        }
        out.push('\n');
    }
    out
}

/// Writes the synthetic grid as the `dominguez` model file in `dir`.
pub fn write_dominguez(dir: &Path) {
    let z = synthetic_redshifts();
    let rows: Vec<(f64, Vec<f64>)> = synthetic_wavelengths()
        .into_iter()
        .map(|l| (l, z.iter().map(|&zi| synthetic_nuinu(l, zi)).collect()))
        .collect();
    std::fs::write(dir.join("ebl_dominguez11.out"), plain_table_text(&z, &rows)).unwrap();
}

struct CaptureLogger;

thread_local! {
    static WARNINGS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if record.level() == Level::Warn {
            WARNINGS.with(|w| w.borrow_mut().push(record.args().to_string()));
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Installs the capturing logger and clears this thread's warnings.
pub fn capture_warnings() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Warn);
    });
    WARNINGS.with(|w| w.borrow_mut().clear());
}

/// Warnings logged on this thread since the last call.
pub fn take_warnings() -> Vec<String> {
    WARNINGS.with(|w| std::mem::take(&mut *w.borrow_mut()))
}
