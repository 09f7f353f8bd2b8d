//! Degree-1 least-squares fit of value against index.

use crate::error::{EngineError, Result};

/// Closed-form linear fit of `y` against `x = 0..n`. Returns
/// `(slope, intercept)`. These numeric facts are the authoritative result of
/// the `fit_line` operation; the rendered image is a side effect.
pub fn fit_line(values: &[f64]) -> Result<(f64, f64)> {
    if values.len() < 2 {
        return Err(EngineError::Operation(
            "fit_line requires at least 2 points".into(),
        ));
    }
    let n = values.len() as f64;
    let mean_x = (values.len() - 1) as f64 / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }
    // Indices are distinct, so sxx > 0 whenever n >= 2.
    let slope = sxy / sxx;
    Ok((slope, mean_y - slope * mean_x))
}
