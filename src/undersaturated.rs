// Undersaturated oil material balance, volatile and non-volatile

use std::str::FromStr;

use ndarray::{Array1, ArrayView1};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MatbalError, Result};
use crate::expansion::RockFluid;
use crate::ratio::{bto, oil_fvf_at, voidage};
use crate::report::DiagnosticPlot;
use crate::series::{
    require_finite, require_len, require_nonempty, require_nonnegative, volatility_denominator,
};

/// Whether the gas phase carries vaporized oil at a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Regime {
    /// `Rv == 0`: black oil.
    NonVolatile,
    /// `Rv != 0`: volatile oil.
    Volatile,
}

impl Regime {
    pub fn classify(rv: f64) -> Regime {
        if rv == 0.0 {
            Regime::NonVolatile
        } else {
            Regime::Volatile
        }
    }
}

/// What the `bo` column of [`OilSeries`] holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InputMode {
    /// Oil-phase FVF, Bo.
    PhaseFvf,
    /// Total (two-phase) oil FVF, Bto.
    TotalFvf,
}

impl Default for InputMode {
    fn default() -> Self {
        InputMode::PhaseFvf
    }
}

impl FromStr for InputMode {
    type Err = MatbalError;

    fn from_str(input: &str) -> std::result::Result<InputMode, Self::Err> {
        match input {
            "phase" => Ok(InputMode::PhaseFvf),
            "total" => Ok(InputMode::TotalFvf),
            _ => Err(MatbalError::UnknownMode(input.to_string())),
        }
    }
}

/// Pressure, PVT and production histories of an undersaturated oil
/// reservoir. Sample 0 is the initial state: `pi = p[0]`, `Boi = bo[0]`,
/// `Rsi = rs[0]`.
///
/// `rv` may be left out for a black oil; every sample is then non-volatile.
#[derive(Clone, Copy, Debug)]
pub struct OilSeries<'a> {
    pub p: ArrayView1<'a, f64>,
    pub bg: ArrayView1<'a, f64>,
    pub bo: ArrayView1<'a, f64>,
    pub np: ArrayView1<'a, f64>,
    pub gp: ArrayView1<'a, f64>,
    pub rs: ArrayView1<'a, f64>,
    pub rv: Option<ArrayView1<'a, f64>>,
}

impl<'a> OilSeries<'a> {
    fn validate(&self) -> Result<usize> {
        let n = require_nonempty(self.p, "p")?;
        require_len(self.bg, n, "Bg")?;
        require_len(self.bo, n, "Bo")?;
        require_len(self.np, n, "Np")?;
        require_len(self.gp, n, "Gp")?;
        require_len(self.rs, n, "Rs")?;
        if let Some(rv) = self.rv {
            require_len(rv, n, "Rv")?;
        }
        require_nonnegative(self.bg, "Bg")?;
        require_nonnegative(self.bo, "Bo")?;
        // Every sample feeds Bto and F, so no column may carry NaN.
        require_finite(self.p, "p")?;
        require_finite(self.bg, "Bg")?;
        require_finite(self.bo, "Bo")?;
        require_finite(self.np, "Np")?;
        require_finite(self.gp, "Gp")?;
        require_finite(self.rs, "Rs")?;
        if let Some(rv) = self.rv {
            require_finite(rv, "Rv")?;
        }
        Ok(n)
    }

    fn rv_at(&self, i: usize) -> f64 {
        self.rv.map_or(0.0, |rv| rv[i])
    }
}

/// Bto, Eo, Efw and F of an undersaturated oil history, in sample order.
#[derive(Clone, Debug, PartialEq)]
pub struct UndersaturatedBalance {
    pub bto: Array1<f64>,
    pub eo: Array1<f64>,
    pub efw: Array1<f64>,
    pub f: Array1<f64>,
    pub regimes: Vec<Regime>,
    /// Initial oil FVF as read from the `bo` column.
    pub boi: f64,
}

impl UndersaturatedBalance {
    /// Eo + Boi*Efw
    pub fn eo_boi_efw(&self) -> Array1<f64> {
        &self.eo + &(&self.efw * self.boi)
    }

    /// Waterdrive diagnostic F/(Eo + Boi*Efw). Constant (= N) for a
    /// volumetric reservoir; non-finite at the initial sample.
    pub fn waterdrive(&self) -> Array1<f64> {
        &self.f / &self.eo_boi_efw()
    }

    pub fn volatile_samples(&self) -> usize {
        self.regimes.iter().filter(|&&r| r == Regime::Volatile).count()
    }
}

/// Material balance terms of an undersaturated oil reservoir
///
/// Non-volatile samples (`Rv == 0`):
/// $$B_{to} = B_o + B_g \left(R_{si} - R_s\right) \qquad F = N_p \left(B_o - R_s B_g\right) + G_p B_g$$
///
/// Volatile samples (`Rv != 0`):
/// $$B_{to} = \frac{B_o \left(1 - R_v R_{si}\right) + B_g \left(R_{si} - R_s\right)}{1 - R_v R_s}$$
/// $$F = N_p \frac{B_o - R_s B_g}{1 - R_v R_s} + G_p \frac{B_g - R_v B_o}{1 - R_v R_s}$$
///
/// and for every sample $E_o = B_{to} - B_{oi}$, $E_{fw}$ from `rock`.
///
/// With [`InputMode::TotalFvf`] the `bo` column is read as Bto; the phase
/// Bo needed by F is recovered from it sample by sample.
pub fn calculate_undersaturated(
    series: &OilSeries<'_>,
    rock: &RockFluid,
    mode: InputMode,
) -> Result<UndersaturatedBalance> {
    let n = series.validate()?;
    rock.expansion_coefficient()?;

    let pi = series.p[0];
    let boi = series.bo[0];
    let rsi = series.rs[0];
    let regimes: Vec<Regime> = (0..n).map(|i| Regime::classify(series.rv_at(i))).collect();

    let mut bto_series = Array1::zeros(n);
    let mut f = Array1::zeros(n);
    for (i, &regime) in regimes.iter().enumerate() {
        let (bg, rs, np, gp) = (series.bg[i], series.rs[i], series.np[i], series.gp[i]);
        let (bto_i, f_i) = match (mode, regime) {
            (InputMode::PhaseFvf, Regime::NonVolatile) => {
                let bo = series.bo[i];
                (bo + bg * (rsi - rs), np * (bo - rs * bg) + gp * bg)
            }
            (InputMode::PhaseFvf, Regime::Volatile) => {
                let (bo, rv) = (series.bo[i], series.rv_at(i));
                let denominator = volatility_denominator(rv, rs, i)?;
                (
                    bto(bo, bg, rs, rv, rsi, denominator),
                    voidage(np, gp, bo, bg, rs, rv, denominator),
                )
            }
            (InputMode::TotalFvf, Regime::NonVolatile) => {
                let total = series.bo[i];
                (total, np * (total - rsi * bg) + gp * bg)
            }
            (InputMode::TotalFvf, Regime::Volatile) => {
                let (total, rv) = (series.bo[i], series.rv_at(i));
                let bo = oil_fvf_at(total, bg, rs, rv, rsi, i)?;
                let denominator = volatility_denominator(rv, rs, i)?;
                (total, voidage(np, gp, bo, bg, rs, rv, denominator))
            }
        };
        bto_series[i] = bto_i;
        f[i] = f_i;
    }

    let efw = rock.efw(series.p, pi)?;
    let eo = bto_series.mapv(|b| b - boi);
    let balance = UndersaturatedBalance {
        bto: bto_series,
        eo,
        efw,
        f,
        regimes,
        boi,
    };
    tracing::debug!(
        samples = n,
        volatile = balance.volatile_samples(),
        mode = ?mode,
        "undersaturated oil balance"
    );
    Ok(balance)
}

/// Plot 1: F vs Eo + Boi*Efw
pub fn plot1(series: &OilSeries<'_>, rock: &RockFluid, mode: InputMode) -> Result<DiagnosticPlot> {
    let balance = calculate_undersaturated(series, rock, mode)?;
    Ok(DiagnosticPlot::new(
        "Plot 1: F vs Eo+(Boi*Efw)",
        "Eo+(Boi*Efw) (RB/STB)",
        "F (res bbl)",
        balance.eo_boi_efw(),
        balance.f,
    )?
    .scatter()
    .clipped())
}

/// Plot 2: F/(Eo + Boi*Efw) vs Np, the waterdrive diagnostic.
pub fn plot2(series: &OilSeries<'_>, rock: &RockFluid, mode: InputMode) -> Result<DiagnosticPlot> {
    let balance = calculate_undersaturated(series, rock, mode)?;
    Ok(DiagnosticPlot::new(
        "Plot 2: F/(Eo+(Boi*Efw)) vs Np",
        "Np (STB)",
        "F/(Eo+(Boi*Efw)) (STB)",
        series.np.to_owned(),
        balance.waterdrive(),
    )?
    .scatter()
    .clipped())
}
