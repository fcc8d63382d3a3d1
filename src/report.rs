// Hand-off to the presentation layer

use ndarray::Array1;

use crate::error::{MatbalError, Result};

/// How the presentation layer should draw the points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlotStyle {
    Scatter,
    Line,
}

/// One diagnostic chart: the computed (x, y) pairs plus the labels the
/// presentation layer is expected to show. Nothing here renders.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagnosticPlot {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub style: PlotStyle,
    /// Axes start at zero instead of at the data minimum.
    pub clip_nonnegative: bool,
}

impl DiagnosticPlot {
    pub fn new(
        title: &'static str,
        x_label: &'static str,
        y_label: &'static str,
        x: Array1<f64>,
        y: Array1<f64>,
    ) -> Result<Self> {
        if x.len() != y.len() {
            return Err(MatbalError::Shape {
                what: "plot y-axis",
                expected: x.len(),
                found: y.len(),
            });
        }
        Ok(DiagnosticPlot {
            title,
            x_label,
            y_label,
            x,
            y,
            style: PlotStyle::Line,
            clip_nonnegative: false,
        })
    }

    pub fn scatter(mut self) -> Self {
        self.style = PlotStyle::Scatter;
        self
    }

    pub fn clipped(mut self) -> Self {
        self.clip_nonnegative = true;
        self
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Pairs where both coordinates are finite. Ratio plots are undefined
    /// where the expansion term is zero, usually at the reference sample.
    pub fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(&x, &y)| (x, y))
    }
}

/// Anything that can display or export a [`DiagnosticPlot`].
pub trait PlotSink {
    fn render(&mut self, plot: &DiagnosticPlot) -> Result<()>;
}

/// Keeps every plot it is handed; for headless use and tests.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    plots: Vec<DiagnosticPlot>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plots(&self) -> &[DiagnosticPlot] {
        &self.plots
    }

    pub fn into_plots(self) -> Vec<DiagnosticPlot> {
        self.plots
    }
}

impl PlotSink for RecordingSink {
    fn render(&mut self, plot: &DiagnosticPlot) -> Result<()> {
        tracing::trace!(title = plot.title, points = plot.len(), "recorded plot");
        self.plots.push(plot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn mismatched_axes_rejected() {
        let err = DiagnosticPlot::new("t", "x", "y", array![1.0, 2.0], array![1.0]).unwrap_err();
        assert!(err.is_shape());
    }

    #[test]
    fn finite_points_skip_undefined_ratios() {
        let plot = DiagnosticPlot::new(
            "F/Eg vs Gp",
            "Gp",
            "F/Eg",
            array![0.0, 1.0, 2.0],
            array![f64::NAN, 5.0, f64::INFINITY],
        )
        .unwrap();
        let points: Vec<_> = plot.finite_points().collect();
        assert_eq!(points, vec![(1.0, 5.0)]);
    }

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        let first = DiagnosticPlot::new("a", "x", "y", array![1.0], array![2.0])
            .unwrap()
            .scatter()
            .clipped();
        let second = DiagnosticPlot::new("b", "x", "y", array![3.0], array![4.0]).unwrap();
        sink.render(&first).unwrap();
        sink.render(&second).unwrap();

        let plots = sink.into_plots();
        assert_eq!(plots.len(), 2);
        assert_eq!(plots[0].title, "a");
        assert_eq!(plots[0].style, PlotStyle::Scatter);
        assert!(plots[0].clip_nonnegative);
        assert!(!plots[1].clip_nonnegative);
    }
}
