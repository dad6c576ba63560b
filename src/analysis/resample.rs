use itertools::Itertools;

use crate::errors::{LapVisError, Result};

/// Linearly interpolates the piecewise-linear function `(source_x, source_y)` at every
/// value of `reference_axis`.
///
/// `source_x` must be non-decreasing; repeated x values collapse onto the later sample.
/// Queries outside `[source_x.first, source_x.last]` return the nearest endpoint value,
/// the curve is never extrapolated. Non-finite values in `source_x` or `reference_axis`
/// are rejected.
pub fn resample(reference_axis: &[f64], source_x: &[f64], source_y: &[f64]) -> Result<Vec<f64>> {
    if source_x.len() != source_y.len() {
        return Err(LapVisError::ChannelLengthMismatch {
            x_len: source_x.len(),
            y_len: source_y.len(),
        });
    }
    if source_x.is_empty() {
        return Err(LapVisError::EmptyChannel);
    }
    if let Some((index, _)) = source_x.iter().find_position(|x| !x.is_finite()) {
        return Err(LapVisError::NonFiniteAxis { index });
    }
    if let Some((index, _)) = reference_axis.iter().find_position(|x| !x.is_finite()) {
        return Err(LapVisError::NonFiniteAxis { index });
    }
    if let Some((index, _)) = source_x
        .iter()
        .tuple_windows()
        .find_position(|(prev, cur)| cur < prev)
    {
        return Err(LapVisError::NonMonotonicAxis { index: index + 1 });
    }

    let (xs, ys) = collapse_duplicates(source_x, source_y);
    Ok(reference_axis
        .iter()
        .map(|&x| interpolate(&xs, &ys, x))
        .collect())
}

fn collapse_duplicates(source_x: &[f64], source_y: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut xs: Vec<f64> = Vec::with_capacity(source_x.len());
    let mut ys: Vec<f64> = Vec::with_capacity(source_y.len());
    for (&x, &y) in source_x.iter().zip(source_y) {
        match (xs.last(), ys.last_mut()) {
            (Some(&last_x), Some(last_y)) if last_x == x => *last_y = y,
            _ => {
                xs.push(x);
                ys.push(y);
            }
        }
    }
    (xs, ys)
}

fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }
    // first index with xs[upper] > x, guaranteed in 1..=last by the checks above
    let upper = xs.partition_point(|&v| v <= x);
    let lower = upper - 1;
    let fraction = (x - xs[lower]) / (xs[upper] - xs[lower]);
    ys[lower] + (ys[upper] - ys[lower]) * fraction
}
