use crate::error::{EblError, GridAxis, Result};

/// Permutation that sorts `values` ascending (stable, NaN last).
pub fn argsort(values: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    idx
}

pub fn is_non_decreasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1])
}

/// Fails with `NonMonotonicAxis` at the first index that does not exceed
/// its predecessor.
pub fn check_strictly_increasing(values: &[f64], axis: GridAxis) -> Result<()> {
    match values.windows(2).position(|w| !(w[1] > w[0])) {
        Some(i) => Err(EblError::NonMonotonicAxis {
            axis,
            index: i + 1,
            value: values[i + 1],
        }),
        None => Ok(()),
    }
}

/// Resolves duplicated points of a sorted axis.
///
/// For every tie `x[i] == x[i+1]`, `x[i+1]` is moved halfway to `x[i+2]`.
/// A tie in the last pair, or a run of three equal values, survives this
/// pass and is left for [`check_strictly_increasing`] to reject.
/// Returns the number of points moved.
pub fn average_ties(values: &mut [f64]) -> usize {
    let mut moved = 0;
    for i in 0..values.len().saturating_sub(2) {
        if values[i + 1] == values[i] {
            values[i + 1] = 0.5 * (values[i] + values[i + 2]);
            moved += 1;
        }
    }
    moved
}

/// Sorts an axis, averages ties and validates it.
///
/// Returns the cleaned axis together with the permutation that was
/// applied, so the caller can reorder the matching grid dimension.
pub fn sanitize(values: &[f64], axis: GridAxis) -> Result<(Vec<f64>, Vec<usize>)> {
    if let Some(i) = values.iter().position(|v| !v.is_finite()) {
        return Err(EblError::NonMonotonicAxis {
            axis,
            index: i,
            value: values[i],
        });
    }
    let order = argsort(values);
    let mut sorted: Vec<f64> = order.iter().map(|&i| values[i]).collect();
    let moved = average_ties(&mut sorted);
    if moved > 0 {
        log::debug!("averaged {moved} duplicated {axis} point(s)");
    }
    check_strictly_increasing(&sorted, axis)?;
    Ok((sorted, order))
}
