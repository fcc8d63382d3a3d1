// Dry-gas material balance

use ndarray::{Array1, ArrayView1};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::condensate::condensate_abovedew;
use crate::error::Result;
use crate::expansion::RockFluid;
use crate::report::DiagnosticPlot;
use crate::series::{
    require_finite, require_finite_scalar, require_len, require_nonempty, require_nonnegative,
    require_nonnegative_scalar, require_positive,
};

/// Initial conditions of a dry-gas reservoir.
///
/// # Fields
/// * bgi: initial gas FVF in RB/scf
/// * gpi: cumulative gas at the reference sample in scf
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GasReference {
    pub bgi: f64,
    pub gpi: f64,
}

/// F and Eg of a dry-gas history, in sample order.
#[derive(Clone, Debug, PartialEq)]
pub struct DryGasBalance {
    pub f: Array1<f64>,
    pub eg: Array1<f64>,
}

impl DryGasBalance {
    /// F/Eg; non-finite where Eg is zero.
    pub fn f_over_eg(&self) -> Array1<f64> {
        &self.f / &self.eg
    }
}

/// F and Eg of a single-phase gas reservoir
///
/// $$E_g = B_g - B_{gi} \qquad F = B_g \left(G_p - G_{pi}\right)$$
pub fn calculate_drygas(
    bg: ArrayView1<'_, f64>,
    gp: ArrayView1<'_, f64>,
    reference: &GasReference,
) -> Result<DryGasBalance> {
    let n = require_nonempty(bg, "Bg")?;
    require_len(gp, n, "Gp")?;
    require_nonnegative(bg, "Bg")?;
    require_nonnegative_scalar(reference.bgi, "Bgi")?;
    require_finite_scalar(reference.gpi, "Gpi")?;
    tracing::debug!(samples = n, "dry-gas balance");
    let (f, eg) = condensate_abovedew(bg, reference.bgi, gp, reference.gpi)?;
    Ok(DryGasBalance { f, eg })
}

/// p/z at every sample.
pub fn p_over_z(p: ArrayView1<'_, f64>, z: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
    let n = require_nonempty(p, "p")?;
    require_len(z, n, "z")?;
    require_finite(p, "p")?;
    require_positive(z, "z")?;
    Ok(&p / &z)
}

/// (p/z)*Efw at every sample.
pub fn p_over_z_efw(
    p: ArrayView1<'_, f64>,
    z: ArrayView1<'_, f64>,
    pi: f64,
    rock: &RockFluid,
) -> Result<Array1<f64>> {
    let efw = rock.efw(p, pi)?;
    Ok(p_over_z(p, z)? * efw)
}

/// p/z corrected for rock and connate-water expansion, (p/z)*(1 - Efw).
///
/// This is the quantity that stays linear in Gp for a volumetric reservoir
/// with significant pore compressibility.
pub fn p_over_z_compressibility_corrected(
    p: ArrayView1<'_, f64>,
    z: ArrayView1<'_, f64>,
    pi: f64,
    rock: &RockFluid,
) -> Result<Array1<f64>> {
    let efw = rock.efw(p, pi)?;
    Ok(p_over_z(p, z)? * efw.mapv(|e| 1.0 - e))
}

/// Plot 1: F vs Eg
pub fn plot1(
    bg: ArrayView1<'_, f64>,
    gp: ArrayView1<'_, f64>,
    reference: &GasReference,
) -> Result<DiagnosticPlot> {
    let balance = calculate_drygas(bg, gp, reference)?;
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
    let p_z = p_over_z(p, z)?;
    require_len(gp, p_z.len(), "Gp")?;
    Ok(DiagnosticPlot::new("Plot 2: p/z vs Gp", "Gp (scf)", "p/z (psia)", gp.to_owned(), p_z)?
        .scatter()
        .clipped())
}

/// Plot 3: F/Eg vs Gp
pub fn plot3(
    bg: ArrayView1<'_, f64>,
    gp: ArrayView1<'_, f64>,
    reference: &GasReference,
) -> Result<DiagnosticPlot> {
    let balance = calculate_drygas(bg, gp, reference)?;
    DiagnosticPlot::new("Plot 3: F/Eg vs Gp", "Gp (scf)", "F/Eg (scf)", gp.to_owned(), balance.f_over_eg())
}

/// Plot 6: F vs Eg + Bgi*Efw
pub fn plot6(
    bg: ArrayView1<'_, f64>,
    gp: ArrayView1<'_, f64>,
    reference: &GasReference,
    p: ArrayView1<'_, f64>,
    pi: f64,
    rock: &RockFluid,
) -> Result<DiagnosticPlot> {
    require_len(p, bg.len(), "p")?;
    let efw = rock.efw(p, pi)?;
    let balance = calculate_drygas(bg, gp, reference)?;
    let x = &balance.eg + &(efw * reference.bgi);
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
    let y = p_over_z_efw(p, z, pi, rock)?;
    require_len(gp, y.len(), "Gp")?;
    DiagnosticPlot::new("Plot 7: (p/z)*Efw vs Gp", "Gp (scf)", "(p/z)*Efw (psia)", gp.to_owned(), y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn reference() -> GasReference {
        GasReference {
            bgi: 0.00091,
            gpi: 0.0,
        }
    }

    #[test]
    fn closed_form() {
        let bg = array![0.00091, 0.00098, 0.00107, 0.00119];
        let gp = array![0.0, 1.5e9, 3.2e9, 5.0e9];
        let balance = calculate_drygas(bg.view(), gp.view(), &reference()).unwrap();
        for i in 0..4 {
            assert_eq!(balance.eg[i], bg[i] - 0.00091);
            assert_eq!(balance.f[i], bg[i] * (gp[i] - 0.0));
        }
    }

    #[test]
    fn p_over_z_rejects_zero_z() {
        let p = array![3000.0, 2500.0];
        let z = array![0.88, 0.0];
        assert!(p_over_z(p.view(), z.view()).unwrap_err().is_range());
    }

    #[test]
    fn corrected_p_over_z() {
        let p = array![3000.0, 2500.0];
        let z = array![0.88, 0.86];
        let rock = RockFluid::new(6e-6, 3e-6, 0.25);
        let raw = p_over_z_efw(p.view(), z.view(), 3000.0, &rock).unwrap();
        let corrected = p_over_z_compressibility_corrected(p.view(), z.view(), 3000.0, &rock).unwrap();
        assert_eq!(raw[0], 0.0);
        assert_relative_eq!(corrected[0], 3000.0 / 0.88, max_relative = 1e-12);
        assert_relative_eq!(corrected[1] + raw[1], 2500.0 / 0.86, max_relative = 1e-12);
    }

    #[test]
    fn plots_label_their_axes() {
        let bg = array![0.00091, 0.00098, 0.00107];
        let gp = array![0.0, 1.5e9, 3.2e9];
        let p = array![3000.0, 2700.0, 2400.0];
        let z = array![0.88, 0.87, 0.86];
        let rock = RockFluid::new(6e-6, 3e-6, 0.25);

        let one = plot1(bg.view(), gp.view(), &reference()).unwrap();
        assert!(one.clip_nonnegative);
        assert_eq!(one.x_label, "Eg (RB/scf)");

        let two = plot2(gp.view(), p.view(), z.view()).unwrap();
        assert_eq!(two.x, gp);

        let three = plot3(bg.view(), gp.view(), &reference()).unwrap();
        assert_eq!(three.finite_points().count(), 2);

        let six = plot6(bg.view(), gp.view(), &reference(), p.view(), 3000.0, &rock).unwrap();
        assert_eq!(six.x[0], 0.0);
        assert!(six.x[2] > six.x[1]);

        let seven = plot7(gp.view(), p.view(), 3000.0, z.view(), &rock).unwrap();
        assert_eq!(seven.len(), 3);
    }

    #[test]
    fn mismatched_gp() {
        let bg = array![0.00091, 0.00098];
        let gp = array![0.0];
        assert!(calculate_drygas(bg.view(), gp.view(), &reference()).unwrap_err().is_shape());
    }
}
