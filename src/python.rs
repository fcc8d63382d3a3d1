// numpy-facing wrappers; plotting stays on the Python side

use numpy::{IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::{exceptions::PyValueError, pymodule, types::PyModule, PyErr, PyResult, Python};

use crate::condensate::{CondensateReference, CondensateSeries, MergeOrder};
use crate::drygas::GasReference;
use crate::error::MatbalError;
use crate::expansion::RockFluid;
use crate::undersaturated::{InputMode, OilSeries};

impl From<MatbalError> for PyErr {
    fn from(err: MatbalError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

type Pair<'py> = (&'py PyArray1<f64>, &'py PyArray1<f64>);

#[pymodule]
fn matbal(_py: Python, m: &PyModule) -> PyResult<()> {
    #[pyfn(m)]
    #[pyo3(name = "Efw")]
    fn efw_py<'py>(
        py: Python<'py>,
        cf: f64,
        cw: f64,
        swi: f64,
        p: PyReadonlyArray1<f64>,
        pi: f64,
    ) -> PyResult<&'py PyArray1<f64>> {
        let efw = crate::expansion::efw(cf, cw, swi, p.as_array(), pi)?;
        Ok(efw.into_pyarray(py))
    }

    #[pyfn(m)]
    #[pyo3(name = "condensate_abovedew")]
    fn condensate_abovedew_py<'py>(
        py: Python<'py>,
        bg: PyReadonlyArray1<f64>,
        bgi: f64,
        gp: PyReadonlyArray1<f64>,
        gpi: f64,
    ) -> PyResult<Pair<'py>> {
        let (f, eg) = crate::condensate::condensate_abovedew(bg.as_array(), bgi, gp.as_array(), gpi)?;
        Ok((f.into_pyarray(py), eg.into_pyarray(py)))
    }

    #[pyfn(m)]
    #[pyo3(name = "condensate_belowdew")]
    #[allow(clippy::too_many_arguments)]
    fn condensate_belowdew_py<'py>(
        py: Python<'py>,
        rs: PyReadonlyArray1<f64>,
        rv: PyReadonlyArray1<f64>,
        rsi: f64,
        rvi: f64,
        bo: PyReadonlyArray1<f64>,
        bg: PyReadonlyArray1<f64>,
        bgi: f64,
        np: PyReadonlyArray1<f64>,
        gp: PyReadonlyArray1<f64>,
    ) -> PyResult<Pair<'py>> {
        let (f, eg) = crate::condensate::condensate_belowdew(
            rs.as_array(),
            rv.as_array(),
            rsi,
            rvi,
            bo.as_array(),
            bg.as_array(),
            bgi,
            np.as_array(),
            gp.as_array(),
        )?;
        Ok((f.into_pyarray(py), eg.into_pyarray(py)))
    }

    /// Returns `(F, Eg, order)`; `order[k]` is the sample behind output `k`.
    #[pyfn(m)]
    #[pyo3(
        name = "condensate_balance",
        signature = (pdp, p, bg, bgi, bo, np, gp, gpi, rv, rvi, rs, rsi=None, sample_order=false)
    )]
    #[allow(clippy::too_many_arguments)]
    fn condensate_balance_py<'py>(
        py: Python<'py>,
        pdp: f64,
        p: PyReadonlyArray1<f64>,
        bg: PyReadonlyArray1<f64>,
        bgi: f64,
        bo: PyReadonlyArray1<f64>,
        np: PyReadonlyArray1<f64>,
        gp: PyReadonlyArray1<f64>,
        gpi: f64,
        rv: PyReadonlyArray1<f64>,
        rvi: f64,
        rs: PyReadonlyArray1<f64>,
        rsi: Option<f64>,
        sample_order: bool,
    ) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>, Vec<usize>)> {
        let series = CondensateSeries {
            p: p.as_array(),
            bg: bg.as_array(),
            bo: bo.as_array(),
            np: np.as_array(),
            gp: gp.as_array(),
            rv: rv.as_array(),
            rs: rs.as_array(),
        };
        let reference = CondensateReference {
            pdp,
            bgi,
            gpi,
            rvi,
            rsi,
        };
        let merge = if sample_order {
            MergeOrder::SampleIndex
        } else {
            MergeOrder::AboveThenBelow
        };
        let balance = crate::condensate::calculate_condensate(&series, &reference, merge)?;
        Ok((
            balance.f.into_pyarray(py),
            balance.eg.into_pyarray(py),
            balance.order,
        ))
    }

    #[pyfn(m)]
    #[pyo3(name = "drygas_balance")]
    fn drygas_balance_py<'py>(
        py: Python<'py>,
        bg: PyReadonlyArray1<f64>,
        bgi: f64,
        gp: PyReadonlyArray1<f64>,
        gpi: f64,
    ) -> PyResult<Pair<'py>> {
        let balance =
            crate::drygas::calculate_drygas(bg.as_array(), gp.as_array(), &GasReference { bgi, gpi })?;
        Ok((balance.f.into_pyarray(py), balance.eg.into_pyarray(py)))
    }

    #[pyfn(m)]
    #[pyo3(name = "p_over_z")]
    fn p_over_z_py<'py>(
        py: Python<'py>,
        p: PyReadonlyArray1<f64>,
        z: PyReadonlyArray1<f64>,
    ) -> PyResult<&'py PyArray1<f64>> {
        Ok(crate::drygas::p_over_z(p.as_array(), z.as_array())?.into_pyarray(py))
    }

    /// Returns `(Bto, Eo, Efw, F)`. `oilfvf="total"` reads `bo` as Bto.
    #[pyfn(m)]
    #[pyo3(
        name = "calculate_undersaturated",
        signature = (p, bg, bo, np, gp, cf, cw, swi, rs, rv=None, oilfvf=None)
    )]
    #[allow(clippy::too_many_arguments)]
    fn calculate_undersaturated_py<'py>(
        py: Python<'py>,
        p: PyReadonlyArray1<f64>,
        bg: PyReadonlyArray1<f64>,
        bo: PyReadonlyArray1<f64>,
        np: PyReadonlyArray1<f64>,
        gp: PyReadonlyArray1<f64>,
        cf: f64,
        cw: f64,
        swi: f64,
        rs: PyReadonlyArray1<f64>,
        rv: Option<PyReadonlyArray1<f64>>,
        oilfvf: Option<&str>,
    ) -> PyResult<(
        &'py PyArray1<f64>,
        &'py PyArray1<f64>,
        &'py PyArray1<f64>,
        &'py PyArray1<f64>,
    )> {
        let mode = match oilfvf {
            Some(name) => name.parse::<InputMode>()?,
            None => InputMode::PhaseFvf,
        };
        let series = OilSeries {
            p: p.as_array(),
            bg: bg.as_array(),
            bo: bo.as_array(),
            np: np.as_array(),
            gp: gp.as_array(),
            rs: rs.as_array(),
            rv: rv.as_ref().map(|rv| rv.as_array()),
        };
        let balance = crate::undersaturated::calculate_undersaturated(
            &series,
            &RockFluid::new(cf, cw, swi),
            mode,
        )?;
        Ok((
            balance.bto.into_pyarray(py),
            balance.eo.into_pyarray(py),
            balance.efw.into_pyarray(py),
            balance.f.into_pyarray(py),
        ))
    }

    /// Returns `(intercept, slope)`.
    #[pyfn(m)]
    #[pyo3(name = "regression")]
    fn regression_py(x: PyReadonlyArray1<f64>, y: PyReadonlyArray1<f64>) -> PyResult<(f64, f64)> {
        let fit = crate::regression::linear_regression(x.as_array(), y.as_array())?;
        Ok((fit.intercept, fit.slope))
    }

    Ok(())
}
