use crate::error::{EblError, Result};

/// `n` points evenly spaced from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Trapezoidal rule over samples `y` at abscissae `x`.
pub fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| 0.5 * (xw[1] - xw[0]) * (yw[0] + yw[1]))
        .sum()
}

/// Composite Simpson's rule over samples `y` at abscissae `x`.
///
/// Intervals need not be equal. With an even number of samples the last
/// interval is integrated with the trapezoidal rule; two samples reduce to
/// a single trapezoid.
pub fn simpson(y: &[f64], x: &[f64]) -> Result<f64> {
    if y.len() != x.len() {
        return Err(EblError::InvalidIntegration(format!(
            "{} samples for {} abscissae",
            y.len(),
            x.len()
        )));
    }
    let n = y.len();
    match n {
        0 | 1 => Err(EblError::InvalidIntegration(
            "at least two samples are required".to_string(),
        )),
        2 => Ok(trapezoid(y, x)),
        _ if n % 2 == 1 => Ok(simpson_pairs(y, x)),
        _ => Ok(simpson_pairs(&y[..n - 1], &x[..n - 1]) + trapezoid(&y[n - 2..], &x[n - 2..])),
    }
}

/// Simpson over an odd number of samples, one parabola per interval pair.
fn simpson_pairs(y: &[f64], x: &[f64]) -> f64 {
    (0..y.len() - 2)
        .step_by(2)
        .map(|i| {
            let h0 = x[i + 1] - x[i];
            let h1 = x[i + 2] - x[i + 1];
            let h = h0 + h1;
            h / 6.0
                * ((2.0 - h1 / h0) * y[i]
                    + h * h / (h0 * h1) * y[i + 1]
                    + (2.0 - h0 / h1) * y[i + 2])
        })
        .sum()
}
