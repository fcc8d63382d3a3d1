// library

//! Material balance diagnostics for gas-condensate, dry-gas and
//! undersaturated oil reservoirs.
//!
//! The engines turn pressure, PVT and production histories into the
//! classical material balance terms (F, Eg, Eo, Efw, Bto, p/z) and hand
//! them to the presentation layer as [`DiagnosticPlot`]s. Nothing here
//! draws.
//!
//! Build with the `python` feature for a numpy extension module.

pub mod condensate;
pub mod drygas;
pub mod error;
pub mod expansion;
pub mod ratio;
pub mod regression;
pub mod report;
pub mod series;
pub mod undersaturated;

#[cfg(feature = "python")]
mod python;

pub use condensate::{
    calculate_condensate, condensate_abovedew, condensate_belowdew, CondensateBalance,
    CondensateReference, CondensateSeries, DewpointPartition, MergeOrder, Phase,
};
pub use drygas::{calculate_drygas, p_over_z, DryGasBalance, GasReference};
pub use error::{MatbalError, Result};
pub use expansion::{efw, RockFluid};
pub use ratio::{oil_fvf_from_total, reservoir_voidage, total_gas_fvf, total_oil_fvf};
pub use regression::{linear_regression, LinearFit};
pub use report::{DiagnosticPlot, PlotSink, PlotStyle, RecordingSink};
pub use undersaturated::{
    calculate_undersaturated, InputMode, OilSeries, Regime, UndersaturatedBalance,
};
