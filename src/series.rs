// Shape and range checks shared by the engines

use ndarray::{Array1, ArrayView1, Axis};

use crate::error::{MatbalError, Result};

/// Length of a series that must hold at least one sample.
pub fn require_nonempty(series: ArrayView1<'_, f64>, what: &'static str) -> Result<usize> {
    match series.len() {
        0 => Err(MatbalError::Empty { what }),
        n => Ok(n),
    }
}

/// Checks that `series` is indexed like a reference series of length `expected`.
pub fn require_len(series: ArrayView1<'_, f64>, expected: usize, what: &'static str) -> Result<()> {
    if series.len() != expected {
        return Err(MatbalError::Shape {
            what,
            expected,
            found: series.len(),
        });
    }
    Ok(())
}

/// Rejects negative samples. NaN passes: some PVT columns are legitimately
/// unmeasured in part of the history (e.g. Bo above the dewpoint).
pub fn require_nonnegative(series: ArrayView1<'_, f64>, what: &'static str) -> Result<()> {
    match series.iter().find(|&&v| v < 0.0) {
        Some(&value) => Err(MatbalError::Range { what, value }),
        None => Ok(()),
    }
}

pub fn require_positive(series: ArrayView1<'_, f64>, what: &'static str) -> Result<()> {
    match series.iter().find(|&&v| !(v > 0.0)) {
        Some(&value) => Err(MatbalError::Range { what, value }),
        None => Ok(()),
    }
}

pub fn require_finite(series: ArrayView1<'_, f64>, what: &'static str) -> Result<()> {
    match series.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(MatbalError::Range { what, value }),
        None => Ok(()),
    }
}

pub fn require_finite_scalar(value: f64, what: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MatbalError::Range { what, value })
    }
}

pub fn require_nonnegative_scalar(value: f64, what: &'static str) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(MatbalError::Range { what, value })
    }
}

/// Sub-series at `indices`, keeping their relative order.
pub fn gather(series: ArrayView1<'_, f64>, indices: &[usize]) -> Array1<f64> {
    series.select(Axis(0), indices)
}

/// `1 - Rv*Rs`, the common denominator of the two-phase ratio transforms.
///
/// Fails when the product is within rounding of one, or is not finite.
pub fn volatility_denominator(rv: f64, rs: f64, sample: usize) -> Result<f64> {
    let product = rv * rs;
    if !product.is_finite() {
        return Err(MatbalError::Range {
            what: "Rv*Rs",
            value: product,
        });
    }
    let denominator = 1.0 - product;
    if denominator.abs() <= f64::EPSILON * product.abs().max(1.0) {
        return Err(MatbalError::domain(format!(
            "1 - Rv*Rs vanishes at sample {} (Rv={}, Rs={})",
            sample, rv, rs
        )));
    }
    Ok(denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn empty_and_mismatched() {
        let empty: Array1<f64> = Array1::zeros(0);
        assert_eq!(
            require_nonempty(empty.view(), "p"),
            Err(MatbalError::Empty { what: "p" })
        );

        let gp = array![1.0, 2.0];
        let err = require_len(gp.view(), 3, "Gp").unwrap_err();
        assert!(err.is_shape());
    }

    #[test]
    fn nonnegative_lets_nan_through() {
        let bo = array![f64::NAN, 1.2, 1.3];
        assert!(require_nonnegative(bo.view(), "Bo").is_ok());

        let bo = array![1.2, -0.1];
        let err = require_nonnegative(bo.view(), "Bo").unwrap_err();
        assert_eq!(
            err,
            MatbalError::Range {
                what: "Bo",
                value: -0.1
            }
        );
    }

    #[test]
    fn positive_rejects_zero_and_nan() {
        assert!(require_positive(array![0.9, 0.0].view(), "z").is_err());
        assert!(require_positive(array![0.9, f64::NAN].view(), "z").is_err());
        assert!(require_positive(array![0.9, 0.85].view(), "z").is_ok());
    }

    #[test]
    fn gather_preserves_relative_order() {
        let bg = array![10.0, 11.0, 12.0, 13.0];
        assert_eq!(gather(bg.view(), &[3, 0, 2]), array![13.0, 10.0, 12.0]);
        assert_eq!(gather(bg.view(), &[]).len(), 0);
    }

    #[test]
    fn denominator_guard() {
        assert!(volatility_denominator(0.5, 2.0, 4).unwrap_err().is_domain());
        assert!(volatility_denominator(2e-4, 5000.0, 0).is_err());
        assert!((volatility_denominator(1e-4, 2000.0, 0).unwrap() - 0.8).abs() < 1e-12);
        assert_eq!(volatility_denominator(0.0, 900.0, 0).unwrap(), 1.0);
    }

    #[test]
    fn denominator_rejects_non_finite_product() {
        assert!(volatility_denominator(f64::NAN, 1550.0, 1).unwrap_err().is_range());
        assert!(volatility_denominator(1e-4, f64::NAN, 2).unwrap_err().is_range());
        assert!(volatility_denominator(f64::INFINITY, 1.0, 0).unwrap_err().is_range());
    }
}
