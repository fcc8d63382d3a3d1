// Two-phase ratio transforms between total and phase formation volume factors

use ndarray::{Array1, ArrayView1};

use crate::error::{MatbalError, Result};
use crate::series::{require_len, require_nonempty, volatility_denominator};

/// Total gas FVF of one sample, given its `1 - Rv*Rs` denominator.
pub(crate) fn btg(bg: f64, bo: f64, rs: f64, rv: f64, rvi: f64, denominator: f64) -> f64 {
    (bg * (1.0 - rs * rvi) + bo * (rvi - rv)) / denominator
}

/// Total oil FVF of one sample, given its `1 - Rv*Rs` denominator.
pub(crate) fn bto(bo: f64, bg: f64, rs: f64, rv: f64, rsi: f64, denominator: f64) -> f64 {
    (bo * (1.0 - rv * rsi) + bg * (rsi - rs)) / denominator
}

/// Underground withdrawal of one sample with vaporized oil, given its
/// `1 - Rv*Rs` denominator. No gas injection.
pub(crate) fn voidage(np: f64, gp: f64, bo: f64, bg: f64, rs: f64, rv: f64, denominator: f64) -> f64 {
    np * ((bo - rs * bg) / denominator) + gp * ((bg - rv * bo) / denominator)
}

fn require_same_len(reference: usize, series: &[(ArrayView1<'_, f64>, &'static str)]) -> Result<()> {
    for &(s, what) in series {
        require_len(s, reference, what)?;
    }
    Ok(())
}

/// Total (two-phase) gas formation volume factor
///
/// $$B_{tg} = \frac{B_g \left(1 - R_s R_{vi}\right) + B_o \left(R_{vi} - R_v\right)}{1 - R_v R_s}$$
///
/// # Arguments
/// * bg: gas FVF in RB/scf
/// * bo: oil FVF in RB/STB
/// * rs: solution gas-oil ratio in scf/STB
/// * rv: vaporized oil-gas ratio in STB/scf
/// * rvi: initial vaporized oil-gas ratio
pub fn total_gas_fvf(
    bg: ArrayView1<'_, f64>,
    bo: ArrayView1<'_, f64>,
    rs: ArrayView1<'_, f64>,
    rv: ArrayView1<'_, f64>,
    rvi: f64,
) -> Result<Array1<f64>> {
    let n = require_nonempty(bg, "Bg")?;
    require_same_len(n, &[(bo.view(), "Bo"), (rs.view(), "Rs"), (rv.view(), "Rv")])?;
    let denominators = denominators(rv, rs)?;
    Ok(Array1::from_shape_fn(n, |i| {
        btg(bg[i], bo[i], rs[i], rv[i], rvi, denominators[i])
    }))
}

/// Total (two-phase) oil formation volume factor
///
/// $$B_{to} = \frac{B_o \left(1 - R_v R_{si}\right) + B_g \left(R_{si} - R_s\right)}{1 - R_v R_s}$$
///
/// With `Rv = 0` this is the black-oil $B_o + B_g (R_{si} - R_s)$.
pub fn total_oil_fvf(
    bo: ArrayView1<'_, f64>,
    bg: ArrayView1<'_, f64>,
    rs: ArrayView1<'_, f64>,
    rv: ArrayView1<'_, f64>,
    rsi: f64,
) -> Result<Array1<f64>> {
    let n = require_nonempty(bo, "Bo")?;
    require_same_len(n, &[(bg.view(), "Bg"), (rs.view(), "Rs"), (rv.view(), "Rv")])?;
    let denominators = denominators(rv, rs)?;
    Ok(Array1::from_shape_fn(n, |i| {
        bto(bo[i], bg[i], rs[i], rv[i], rsi, denominators[i])
    }))
}

/// Phase oil FVF recovered from total oil FVF data; the inverse of
/// [`total_oil_fvf`].
///
/// $$B_o = \frac{B_{to} \left(1 - R_v R_s\right) - B_g \left(R_{si} - R_s\right)}{1 - R_v R_{si}}$$
pub fn oil_fvf_from_total(
    bto: ArrayView1<'_, f64>,
    bg: ArrayView1<'_, f64>,
    rs: ArrayView1<'_, f64>,
    rv: ArrayView1<'_, f64>,
    rsi: f64,
) -> Result<Array1<f64>> {
    let n = require_nonempty(bto, "Bto")?;
    require_same_len(n, &[(bg.view(), "Bg"), (rs.view(), "Rs"), (rv.view(), "Rv")])?;
    let mut bo = Array1::zeros(n);
    for i in 0..n {
        bo[i] = oil_fvf_at(bto[i], bg[i], rs[i], rv[i], rsi, i)?;
    }
    Ok(bo)
}

pub(crate) fn oil_fvf_at(bto: f64, bg: f64, rs: f64, rv: f64, rsi: f64, sample: usize) -> Result<f64> {
    let current = volatility_denominator(rv, rs, sample)?;
    let initial = 1.0 - rv * rsi;
    if initial.abs() <= f64::EPSILON * (rv * rsi).abs().max(1.0) {
        return Err(MatbalError::domain(format!(
            "1 - Rv*Rsi vanishes at sample {} (Rv={}, Rsi={})",
            sample, rv, rsi
        )));
    }
    Ok((bto * current - bg * (rsi - rs)) / initial)
}

/// Reservoir voidage (underground withdrawal) with vaporized oil
///
/// $$F = N_p \frac{B_o - R_s B_g}{1 - R_v R_s} + G_p \frac{B_g - R_v B_o}{1 - R_v R_s}$$
///
/// # Arguments
/// * np: cumulative oil production in STB
/// * gp: cumulative gas production in scf
/// * bo, bg, rs, rv: PVT series, indexed like `np`
pub fn reservoir_voidage(
    np: ArrayView1<'_, f64>,
    gp: ArrayView1<'_, f64>,
    bo: ArrayView1<'_, f64>,
    bg: ArrayView1<'_, f64>,
    rs: ArrayView1<'_, f64>,
    rv: ArrayView1<'_, f64>,
) -> Result<Array1<f64>> {
    let n = require_nonempty(np, "Np")?;
    require_same_len(
        n,
        &[(gp.view(), "Gp"), (bo.view(), "Bo"), (bg.view(), "Bg"), (rs.view(), "Rs"), (rv.view(), "Rv")],
    )?;
    let denominators = denominators(rv, rs)?;
    Ok(Array1::from_shape_fn(n, |i| {
        voidage(np[i], gp[i], bo[i], bg[i], rs[i], rv[i], denominators[i])
    }))
}

/// `1 - Rv*Rs` for every sample, failing on the first vanishing one.
pub(crate) fn denominators(rv: ArrayView1<'_, f64>, rs: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
    let mut out = Array1::zeros(rv.len());
    for (i, (&v, &s)) in rv.iter().zip(rs.iter()).enumerate() {
        out[i] = volatility_denominator(v, s, i)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn black_oil_reduction() {
        let bo = array![1.45, 1.40, 1.35];
        let bg = array![0.0008, 0.0010, 0.0013];
        let rs = array![900.0, 820.0, 700.0];
        let rv = Array1::zeros(3);
        let total = total_oil_fvf(bo.view(), bg.view(), rs.view(), rv.view(), 900.0).unwrap();
        for i in 0..3 {
            assert_eq!(total[i], bo[i] + bg[i] * (900.0 - rs[i]));
        }
    }

    #[test]
    fn total_and_phase_oil_fvf_are_inverse() {
        let bo = array![1.80, 1.72, 1.61];
        let bg = array![0.00075, 0.00090, 0.00120];
        let rs = array![1500.0, 1300.0, 1100.0];
        let rv = array![1.2e-4, 1.0e-4, 0.8e-4];
        let total = total_oil_fvf(bo.view(), bg.view(), rs.view(), rv.view(), 1500.0).unwrap();
        let back = oil_fvf_from_total(total.view(), bg.view(), rs.view(), rv.view(), 1500.0).unwrap();
        for i in 0..3 {
            assert_relative_eq!(back[i], bo[i], max_relative = 1e-12);
        }
    }

    #[test]
    fn total_gas_fvf_at_initial_state() {
        // At the reference sample Rv = Rvi and Rs*Rvi cancels, so Btg = Bg.
        let bg = array![0.00085];
        let bo = array![1.9];
        let rs = array![4000.0];
        let rv = array![1.0e-4];
        let total = total_gas_fvf(bg.view(), bo.view(), rs.view(), rv.view(), 1.0e-4).unwrap();
        assert_relative_eq!(total[0], 0.00085, max_relative = 1e-12);
    }

    #[test]
    fn voidage_without_vaporized_oil() {
        let np = array![0.0, 1.0e5];
        let gp = array![0.0, 9.0e7];
        let bo = array![1.45, 1.40];
        let bg = array![0.0008, 0.0010];
        let rs = array![900.0, 820.0];
        let rv = array![0.0, 0.0];
        let f = reservoir_voidage(np.view(), gp.view(), bo.view(), bg.view(), rs.view(), rv.view())
            .unwrap();
        assert_eq!(f[0], 0.0);
        assert_relative_eq!(f[1], 1.0e5 * (1.40 - 820.0 * 0.0010) + 9.0e7 * 0.0010, max_relative = 1e-12);
    }

    #[test]
    fn vanishing_denominator() {
        let bo = array![1.5, 1.4];
        let bg = array![0.001, 0.002];
        let rs = array![1000.0, 2000.0];
        let rv = array![1.0e-4, 5.0e-4];
        let err = total_oil_fvf(bo.view(), bg.view(), rs.view(), rv.view(), 1000.0).unwrap_err();
        assert!(err.is_domain());
        assert!(err.to_string().contains("sample 1"));
    }

    #[test]
    fn voidage_accepts_independently_borrowed_series() {
        let np = array![0.0, 2.0e5];
        let f = {
            let gp = array![0.0, 3.0e8];
            let pvt = (array![1.8, 1.7], array![0.0008, 0.0010], array![1500.0, 1300.0]);
            let rv = array![1.2e-4, 1.0e-4];
            reservoir_voidage(np.view(), gp.view(), pvt.0.view(), pvt.1.view(), pvt.2.view(), rv.view())
                .unwrap()
        };
        assert_eq!(f.len(), 2);
        assert_eq!(f[0], 0.0);
    }

    #[test]
    fn mismatched_lengths() {
        let err = total_gas_fvf(
            array![0.001, 0.002].view(),
            array![1.5].view(),
            array![1000.0, 900.0].view(),
            array![1e-4, 1e-4].view(),
            1e-4,
        )
        .unwrap_err();
        assert!(err.is_shape());
    }
}
