// Straight-line fits for the diagnostic plots

use ndarray::ArrayView1;

use crate::error::{MatbalError, Result};
use crate::series::{require_finite, require_len, require_nonempty};

/// A fitted line `y = intercept + slope * x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Ordinary least squares
///
/// $$b_1 = \frac{\sum (x - \bar{x})(y - \bar{y})}{\sum (x - \bar{x})^2} \qquad b_0 = \bar{y} - b_1 \bar{x}$$
///
/// On an F vs Eg plot the slope is the initial gas in place; on F vs
/// Eo + Boi*Efw it is the initial oil in place.
pub fn linear_regression(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Result<LinearFit> {
    let n = require_nonempty(x, "x")?;
    require_len(y, n, "y")?;
    if n < 2 {
        return Err(MatbalError::Shape {
            what: "x (a line needs two samples)",
            expected: 2,
            found: n,
        });
    }
    require_finite(x, "x")?;
    require_finite(y, "y")?;

    let mean_x = x.sum() / n as f64;
    let mean_y = y.sum() / n as f64;
    let err_x = x.mapv(|v| v - mean_x);
    let err_y = y.mapv(|v| v - mean_y);
    let numerator = (&err_x * &err_y).sum();
    let denominator = err_x.mapv(|e| e * e).sum();

    // Rounding in the mean can leave a tiny spread behind for constant x,
    // so compare the samples themselves.
    if x.iter().all(|&v| v == x[0]) || denominator <= 0.0 {
        return Err(MatbalError::domain("all x values are identical"));
    }

    let slope = numerator / denominator;
    let intercept = mean_y - slope * mean_x;
    tracing::trace!(slope, intercept, samples = n, "linear fit");
    Ok(LinearFit { slope, intercept })
}
