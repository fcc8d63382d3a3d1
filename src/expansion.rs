// Formation and connate-water expansion

use ndarray::{Array1, ArrayView1};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MatbalError, Result};
use crate::series::{
    require_finite, require_finite_scalar, require_nonempty, require_nonnegative_scalar,
};

/// Rock and connate-water properties entering the expansion term.
///
/// # Fields
/// * cf: formation (pore) compressibility in 1/psi
/// * cw: water compressibility in 1/psi
/// * swi: initial (connate) water saturation
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RockFluid {
    pub cf: f64,
    pub cw: f64,
    pub swi: f64,
}

impl RockFluid {
    pub fn new(cf: f64, cw: f64, swi: f64) -> Self {
        RockFluid { cf, cw, swi }
    }

    /// $$\frac{c_f + c_w S_{wi}}{1 - S_{wi}}$$
    ///
    /// `swi == 1` leaves no hydrocarbon pore volume and is a domain error;
    /// any other saturation outside `[0, 1]` is a range error.
    pub fn expansion_coefficient(&self) -> Result<f64> {
        require_nonnegative_scalar(self.cf, "cf")?;
        require_nonnegative_scalar(self.cw, "cw")?;
        if self.swi == 1.0 {
            return Err(MatbalError::domain("swi == 1 leaves no hydrocarbon pore volume"));
        }
        if !(0.0..1.0).contains(&self.swi) {
            return Err(MatbalError::Range {
                what: "swi",
                value: self.swi,
            });
        }
        Ok((self.cf + self.cw * self.swi) / (1.0 - self.swi))
    }

    /// Efw at every pressure in `p`, relative to the reference pressure `pi`.
    pub fn efw(&self, p: ArrayView1<'_, f64>, pi: f64) -> Result<Array1<f64>> {
        let coefficient = self.expansion_coefficient()?;
        require_nonempty(p, "p")?;
        require_finite(p, "p")?;
        let pi = require_finite_scalar(pi, "pi")?;
        Ok(p.mapv(|pressure| coefficient * (pi - pressure)))
    }

    /// Efw at a single pressure.
    pub fn efw_at(&self, p: f64, pi: f64) -> Result<f64> {
        let coefficient = self.expansion_coefficient()?;
        let p = require_finite_scalar(p, "p")?;
        let pi = require_finite_scalar(pi, "pi")?;
        Ok(coefficient * (pi - p))
    }
}

/// Formation/water expansion factor
///
/// $$E_{fw} = \frac{c_f + c_w S_{wi}}{1 - S_{wi}} \left(p_i - p\right)$$
///
/// # Arguments
/// * cf: formation compressibility in 1/psi
/// * cw: water compressibility in 1/psi
/// * swi: initial water saturation
/// * p: pressure history in psia
/// * pi: initial reservoir pressure in psia
pub fn efw(cf: f64, cw: f64, swi: f64, p: ArrayView1<'_, f64>, pi: f64) -> Result<Array1<f64>> {
    RockFluid::new(cf, cw, swi).efw(p, pi)
}
