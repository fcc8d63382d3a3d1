// Gas-condensate material balance

use ndarray::{Array1, ArrayView1};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::drygas;
use crate::error::{MatbalError, Result};
use crate::expansion::RockFluid;
use crate::ratio::{btg, denominators, voidage};
use crate::report::DiagnosticPlot;
use crate::series::{
    gather, require_finite, require_finite_scalar, require_len, require_nonempty,
    require_nonnegative, require_nonnegative_scalar,
};

/// Which side of the dewpoint a sample sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Phase {
    /// Single-phase gas, `p > Pdp`.
    AboveDewpoint,
    /// Retrograde liquid present, `p <= Pdp`. The dewpoint itself belongs here.
    BelowDewpoint,
}

impl Phase {
    pub fn classify(p: f64, pdp: f64) -> Phase {
        if p > pdp {
            Phase::AboveDewpoint
        } else {
            Phase::BelowDewpoint
        }
    }
}

/// Order of the merged above/below-dewpoint output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MergeOrder {
    /// All above-dewpoint samples, then all below-dewpoint samples, each in
    /// sample order. For a monotonically declining pressure history this is
    /// sample order.
    AboveThenBelow,
    /// Original sample order, whatever the pressure history.
    SampleIndex,
}

impl Default for MergeOrder {
    fn default() -> Self {
        MergeOrder::AboveThenBelow
    }
}

/// Sample indices split at the dewpoint, each side in sample order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DewpointPartition {
    pub above: Vec<usize>,
    pub below: Vec<usize>,
}

impl DewpointPartition {
    pub fn new(p: ArrayView1<'_, f64>, pdp: f64) -> Self {
        let mut above = Vec::new();
        let mut below = Vec::new();
        for (i, &pressure) in p.iter().enumerate() {
            match Phase::classify(pressure, pdp) {
                Phase::AboveDewpoint => above.push(i),
                Phase::BelowDewpoint => below.push(i),
            }
        }
        DewpointPartition { above, below }
    }

    pub fn len(&self) -> usize {
        self.above.len() + self.below.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample index at each output position.
    pub fn merged_order(&self, merge: MergeOrder) -> Vec<usize> {
        match merge {
            MergeOrder::AboveThenBelow => self.above.iter().chain(&self.below).copied().collect(),
            MergeOrder::SampleIndex => (0..self.len()).collect(),
        }
    }
}

/// Initial and reference conditions of a gas-condensate reservoir.
///
/// # Fields
/// * pdp: dewpoint pressure in psia
/// * bgi: initial gas FVF in RB/scf
/// * gpi: cumulative gas at the reference sample in scf
/// * rvi: initial vaporized oil-gas ratio in STB/scf
/// * rsi: initial solution gas-oil ratio in scf/STB; `None` takes `1/rvi`
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CondensateReference {
    pub pdp: f64,
    pub bgi: f64,
    pub gpi: f64,
    pub rvi: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rsi: Option<f64>,
}

impl CondensateReference {
    /// Rsi as given, or the inverse-ratio convention `1/Rvi`.
    pub fn initial_rs(&self) -> Result<f64> {
        match self.rsi {
            Some(rsi) => require_finite_scalar(rsi, "Rsi"),
            None if self.rvi == 0.0 => Err(MatbalError::domain(
                "Rsi must be given when Rvi == 0 (cannot take 1/Rvi)",
            )),
            None => Ok(1.0 / self.rvi),
        }
    }

    fn validate(&self) -> Result<()> {
        require_finite_scalar(self.pdp, "Pdp")?;
        require_nonnegative_scalar(self.bgi, "Bgi")?;
        require_finite_scalar(self.gpi, "Gpi")?;
        require_finite_scalar(self.rvi, "Rvi")?;
        Ok(())
    }
}

/// Pressure, PVT and production histories of a gas-condensate reservoir,
/// all indexed by sample.
///
/// Rs and Bo may be NaN above the dewpoint, where there is no liquid phase;
/// only below-dewpoint samples read them.
#[derive(Clone, Copy, Debug)]
pub struct CondensateSeries<'a> {
    pub p: ArrayView1<'a, f64>,
    pub bg: ArrayView1<'a, f64>,
    pub bo: ArrayView1<'a, f64>,
    pub np: ArrayView1<'a, f64>,
    pub gp: ArrayView1<'a, f64>,
    pub rv: ArrayView1<'a, f64>,
    pub rs: ArrayView1<'a, f64>,
}

impl<'a> CondensateSeries<'a> {
    fn validate(&self) -> Result<usize> {
        let n = require_nonempty(self.p, "p")?;
        require_len(self.bg, n, "Bg")?;
        require_len(self.bo, n, "Bo")?;
        require_len(self.np, n, "Np")?;
        require_len(self.gp, n, "Gp")?;
        require_len(self.rv, n, "Rv")?;
        require_len(self.rs, n, "Rs")?;
        require_finite(self.p, "p")?;
        require_nonnegative(self.bg, "Bg")?;
        require_nonnegative(self.bo, "Bo")?;
        Ok(n)
    }
}

/// Merged F and Eg of a gas-condensate history.
///
/// `f[k]` and `eg[k]` belong to sample `order[k]`.
#[derive(Clone, Debug, PartialEq)]
pub struct CondensateBalance {
    pub f: Array1<f64>,
    pub eg: Array1<f64>,
    pub order: Vec<usize>,
}

impl CondensateBalance {
    pub fn len(&self) -> usize {
        self.f.len()
    }

    pub fn is_empty(&self) -> bool {
        self.f.is_empty()
    }

    /// An input series rearranged into the output order, so it can serve as
    /// the x-axis against `f` or `eg`.
    pub fn reorder(&self, series: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        require_len(series, self.len(), "reordered series")?;
        Ok(gather(series, &self.order))
    }

    /// F/Eg; non-finite where Eg is zero.
    pub fn f_over_eg(&self) -> Array1<f64> {
        &self.f / &self.eg
    }

    /// Eg + Bgi*Efw, with Efw evaluated at each output position's pressure.
    pub fn eg_bgi_efw(
        &self,
        p: ArrayView1<'_, f64>,
        pi: f64,
        bgi: f64,
        rock: &RockFluid,
    ) -> Result<Array1<f64>> {
        let p = self.reorder(p)?;
        let efw = rock.efw(p.view(), pi)?;
        Ok(&self.eg + &(efw * bgi))
    }
}

/// F and Eg of gas-condensate samples above the dewpoint
///
/// $$E_g = B_g - B_{gi} \qquad F = B_g \left(G_p - G_{pi}\right)$$
///
/// # Arguments
/// * bg: gas FVF in RB/scf
/// * bgi: initial gas FVF
/// * gp: cumulative gas production in scf
/// * gpi: cumulative gas production at the reference sample
///
/// # Returns
/// `(F, Eg)`
pub fn condensate_abovedew(
    bg: ArrayView1<'_, f64>,
    bgi: f64,
    gp: ArrayView1<'_, f64>,
    gpi: f64,
) -> Result<(Array1<f64>, Array1<f64>)> {
    require_nonempty(bg, "Bg")?;
    abovedew_terms(bg, bgi, gp, gpi)
}

/// [`condensate_abovedew`] over a possibly empty segment.
fn abovedew_terms(
    bg: ArrayView1<'_, f64>,
    bgi: f64,
    gp: ArrayView1<'_, f64>,
    gpi: f64,
) -> Result<(Array1<f64>, Array1<f64>)> {
    require_len(gp, bg.len(), "Gp")?;
    let eg = bg.mapv(|b| b - bgi);
    let f = &bg * &gp.mapv(|g| g - gpi);
    Ok((f, eg))
}

/// F and Eg of gas-condensate samples at or below the dewpoint
///
/// $$E_g = B_{tg} - B_{gi}$$
/// $$F = N_p \frac{B_o - R_s B_g}{1 - R_v R_s} + G_p \frac{B_g - R_v B_o}{1 - R_v R_s}$$
///
/// No gas injection is accounted for.
///
/// # Arguments
/// * rs, rv: solution gas-oil and vaporized oil-gas ratios
/// * rsi, rvi: their initial values
/// * bo, bg: oil and gas FVF
/// * bgi: initial gas FVF
/// * np, gp: cumulative oil and gas production
///
/// # Returns
/// `(F, Eg)`
pub fn condensate_belowdew(
    rs: ArrayView1<'_, f64>,
    rv: ArrayView1<'_, f64>,
    rsi: f64,
    rvi: f64,
    bo: ArrayView1<'_, f64>,
    bg: ArrayView1<'_, f64>,
    bgi: f64,
    np: ArrayView1<'_, f64>,
    gp: ArrayView1<'_, f64>,
) -> Result<(Array1<f64>, Array1<f64>)> {
    require_nonempty(rs, "Rs")?;
    belowdew_terms(rs, rv, rsi, rvi, bo, bg, bgi, np, gp)
}

/// [`condensate_belowdew`] over a possibly empty segment.
#[allow(clippy::too_many_arguments)]
fn belowdew_terms(
    rs: ArrayView1<'_, f64>,
    rv: ArrayView1<'_, f64>,
    rsi: f64,
    rvi: f64,
    bo: ArrayView1<'_, f64>,
    bg: ArrayView1<'_, f64>,
    bgi: f64,
    np: ArrayView1<'_, f64>,
    gp: ArrayView1<'_, f64>,
) -> Result<(Array1<f64>, Array1<f64>)> {
    let n = rs.len();
    require_len(rv, n, "Rv")?;
    require_len(bo, n, "Bo")?;
    require_len(bg, n, "Bg")?;
    require_len(np, n, "Np")?;
    require_len(gp, n, "Gp")?;
    // Rsi only shapes the total oil FVF, which neither F nor Eg reads.
    require_finite_scalar(rsi, "Rsi")?;
    let denominators = denominators(rv, rs)?;
    let f = Array1::from_shape_fn(n, |i| {
        voidage(np[i], gp[i], bo[i], bg[i], rs[i], rv[i], denominators[i])
    });
    let eg = Array1::from_shape_fn(n, |i| {
        btg(bg[i], bo[i], rs[i], rv[i], rvi, denominators[i]) - bgi
    });
    Ok((f, eg))
}

/// F and Eg over a full gas-condensate history.
///
/// Samples above the dewpoint go through [`condensate_abovedew`], samples at
/// or below it through [`condensate_belowdew`]; the two segments are merged
/// according to `merge`. Every check runs before either segment is computed.
pub fn calculate_condensate(
    series: &CondensateSeries<'_>,
    reference: &CondensateReference,
    merge: MergeOrder,
) -> Result<CondensateBalance> {
    let n = series.validate()?;
    reference.validate()?;
    let rsi = reference.initial_rs()?;
    let partition = DewpointPartition::new(series.p, reference.pdp);

    tracing::debug!(
        samples = n,
        above = partition.above.len(),
        below = partition.below.len(),
        pdp = reference.pdp,
        "gas-condensate dewpoint split"
    );

    let below = &partition.below;
    let below_rs = gather(series.rs, below);
    let below_rv = gather(series.rv, below);
    let below_bo = gather(series.bo, below);
    let below_bg = gather(series.bg, below);
    let below_np = gather(series.np, below);
    let below_gp = gather(series.gp, below);
    // Above the dewpoint Rs is typically NaN, so the liquid columns are
    // only required to be measured where they are read.
    require_finite(below_rs.view(), "Rs below dewpoint")?;
    require_finite(below_rv.view(), "Rv below dewpoint")?;
    require_finite(below_bo.view(), "Bo below dewpoint")?;
    let (f_below, eg_below) = belowdew_terms(
        below_rs.view(),
        below_rv.view(),
        rsi,
        reference.rvi,
        below_bo.view(),
        below_bg.view(),
        reference.bgi,
        below_np.view(),
        below_gp.view(),
    )?;

    let above = &partition.above;
    let above_bg = gather(series.bg, above);
    let above_gp = gather(series.gp, above);
    let (f_above, eg_above) =
        abovedew_terms(above_bg.view(), reference.bgi, above_gp.view(), reference.gpi)?;

    let order = partition.merged_order(merge);
    let mut slot = vec![0; n];
    for (k, &i) in order.iter().enumerate() {
        slot[i] = k;
    }
    let mut f = Array1::zeros(n);
    let mut eg = Array1::zeros(n);
    for (j, &i) in above.iter().enumerate() {
        f[slot[i]] = f_above[j];
        eg[slot[i]] = eg_above[j];
    }
    for (j, &i) in below.iter().enumerate() {
        f[slot[i]] = f_below[j];
        eg[slot[i]] = eg_below[j];
    }

    Ok(CondensateBalance { f, eg, order })
}

/// Plot 1: F vs Eg
pub fn plot1(
    series: &CondensateSeries<'_>,
    reference: &CondensateReference,
    merge: MergeOrder,
) -> Result<DiagnosticPlot> {
    let balance = calculate_condensate(series, reference, merge)?;
    Ok(DiagnosticPlot::new("Plot 1: F vs Eg", "Eg (RB/scf)", "F (res bbl)", balance.eg, balance.f)?
        .scatter()
        .clipped())
}

/// Plot 2: p/z vs Gp
pub fn plot2(
    gp: ArrayView1<'_, f64>,
    p: ArrayView1<'_, f64>,
    z: ArrayView1<'_, f64>,
) -> Result<DiagnosticPlot> {
    drygas::plot2(gp, p, z)
}

/// Plot 3: F/Eg vs Gp, with Gp in the merged output order.
pub fn plot3(
    series: &CondensateSeries<'_>,
    reference: &CondensateReference,
    merge: MergeOrder,
) -> Result<DiagnosticPlot> {
    let balance = calculate_condensate(series, reference, merge)?;
    let gp = balance.reorder(series.gp)?;
    DiagnosticPlot::new("Plot 3: F/Eg vs Gp", "Gp (scf)", "F/Eg (scf)", gp, balance.f_over_eg())
}

/// Plot 6: F vs Eg + Bgi*Efw
pub fn plot6(
    series: &CondensateSeries<'_>,
    reference: &CondensateReference,
    rock: &RockFluid,
    pi: f64,
    merge: MergeOrder,
) -> Result<DiagnosticPlot> {
    // Efw is checked up front so a bad saturation fails before any F is built.
    rock.expansion_coefficient()?;
    let balance = calculate_condensate(series, reference, merge)?;
    let x = balance.eg_bgi_efw(series.p, pi, reference.bgi, rock)?;
    DiagnosticPlot::new(
        "Plot 6: F vs (Eg+Bgi*Efw)",
        "Eg+Bgi*Efw (RB/scf)",
        "F (res bbl)",
        x,
        balance.f,
    )
}

/// Plot 7: (p/z)*Efw vs Gp
pub fn plot7(
    gp: ArrayView1<'_, f64>,
    p: ArrayView1<'_, f64>,
    pi: f64,
    z: ArrayView1<'_, f64>,
    rock: &RockFluid,
) -> Result<DiagnosticPlot> {
    drygas::plot7(gp, p, pi, z, rock)
}
