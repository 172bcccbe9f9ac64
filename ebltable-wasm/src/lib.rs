//! WASM bindings for ebltable.
//!
//! Build with:
//! ```sh
//! wasm-pack build -p ebltable-wasm
//! ```

use js_sys::{Array, Float64Array};
use wasm_bindgen::prelude::*;

use ebltable::{EblError, EblGrid, EblInterpolator, EblModel, IntegralRange, TableLayout};

fn to_js(e: EblError) -> JsError {
    JsError::new(&e.to_string())
}

/// Converts a `(rows, cols)` array into a JS array of `Float64Array` rows.
fn rows_to_js(values: &ndarray::Array2<f64>) -> Array {
    values
        .rows()
        .into_iter()
        .map(|row| JsValue::from(Float64Array::from(row.to_vec().as_slice())))
        .collect()
}

/// A fitted EBL model.
#[wasm_bindgen]
pub struct EblHandle {
    inner: EblInterpolator,
}

#[wasm_bindgen]
impl EblHandle {
    /// Fits a model to a grid given as a row-major buffer of
    /// `wavelength_um.length` rows by `z.length` columns (nW m^-2 sr^-1).
    #[wasm_bindgen(constructor)]
    pub fn new(
        z: Vec<f64>,
        wavelength_um: Vec<f64>,
        intensity: Vec<f64>,
    ) -> Result<EblHandle, JsError> {
        let grid = EblGrid::from_row_major(z, wavelength_um, intensity).map_err(to_js)?;
        let inner = EblInterpolator::new(grid).map_err(to_js)?;
        Ok(EblHandle { inner })
    }

    /// Loads a persisted EBL table with the default section and column names.
    #[wasm_bindgen(js_name = fromTableBytes)]
    pub fn from_table_bytes(bytes: &[u8]) -> Result<EblHandle, JsError> {
        let inner =
            EblInterpolator::from_table_bytes(bytes, &TableLayout::default()).map_err(to_js)?;
        Ok(EblHandle { inner })
    }

    /// Tabulated redshifts.
    #[wasm_bindgen(getter)]
    pub fn z(&self) -> Vec<f64> {
        self.inner.z().to_vec()
    }

    /// Tabulated wavelengths in microns.
    #[wasm_bindgen(getter, js_name = wavelengthUm)]
    pub fn wavelength_um(&self) -> Vec<f64> {
        self.inner.wavelength_um().to_vec()
    }

    /// EBL intensity νIν (nW m^-2 sr^-1), one row per redshift.
    pub fn intensity(&self, z: &[f64], wavelength_um: &[f64]) -> Result<Array, JsError> {
        let values = self.inner.intensity_at(z, wavelength_um).map_err(to_js)?;
        Ok(rows_to_js(&values))
    }

    /// Photon number density (cm^-3 eV^-1), one row per redshift.
    pub fn density(&self, z: &[f64], energy_ev: &[f64]) -> Result<Array, JsError> {
        let values = self.inner.density_at(z, energy_ev).map_err(to_js)?;
        Ok(rows_to_js(&values))
    }

    /// Wavelength-integrated intensity (nW m^-2 sr^-1).
    pub fn integral(
        &self,
        z: f64,
        lmin_um: f64,
        lmax_um: f64,
        steps: usize,
    ) -> Result<f64, JsError> {
        let range = IntegralRange {
            lmin_um,
            lmax_um,
            steps,
        };
        self.inner.integral_at(z, &range).map_err(to_js)
    }

    /// Serializes the model evaluated on `z × wavelength_um` as a table file.
    #[wasm_bindgen(js_name = toTableBytes)]
    pub fn to_table_bytes(&self, z: &[f64], wavelength_um: &[f64]) -> Result<Vec<u8>, JsError> {
        self.inner
            .to_table_bytes(z, wavelength_um, &TableLayout::default())
            .map_err(to_js)
    }
}

/// Names of the tabulated models, with the unsupported ones left out.
#[wasm_bindgen(js_name = supportedModels)]
pub fn supported_models() -> Vec<String> {
    EblModel::all()
        .filter(|m| m.is_supported())
        .map(|m| m.name().to_string())
        .collect()
}
