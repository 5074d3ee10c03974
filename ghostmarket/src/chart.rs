//! Price trend chart geometry.
//!
//! Linear transform from `(index, price)` to a `width x height` canvas with a
//! uniform padding, y growing downwards. Used for SVG path output and by the
//! terminal renderer.

use crate::model::PricePoint;

/// Canvas geometry fitted to a price series of at least two points.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartScale {
    width: f64,
    height: f64,
    pad: f64,
    min_y: f64,
    max_y: f64,
    values: Vec<f64>,
}

impl ChartScale {
    /// Fit a scale to `series`. `None` means "not enough data" (fewer than 2 points).
    pub fn fit(series: &[PricePoint], width: f64, height: f64, pad: f64) -> Option<Self> {
        if series.len() < 2 {
            return None;
        }

        let values: Vec<f64> = series.iter().map(|point| point.p).collect();
        let min_y = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max_y = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            width,
            height,
            pad,
            min_y,
            max_y,
            values,
        })
    }

    /// Horizontal position of the `index`-th point.
    pub fn x(&self, index: usize) -> f64 {
        let last = self.values.len().saturating_sub(1).max(1) as f64;
        self.pad + (index as f64 / last) * (self.width - self.pad * 2.0)
    }

    /// Vertical position of a price. A flat series sits on the baseline.
    pub fn y(&self, value: f64) -> f64 {
        let range = self.max_y - self.min_y;
        let range = if range == 0.0 { 1.0 } else { range };
        self.height - self.pad - ((value - self.min_y) / range) * (self.height - self.pad * 2.0)
    }

    /// `(min, max)` of the series prices.
    pub fn bounds(&self) -> (f64, f64) {
        (self.min_y, self.max_y)
    }

    /// Bottom edge of the plot area.
    pub fn baseline(&self) -> f64 {
        self.height - self.pad
    }

    /// Scaled canvas coordinates of every point, oldest first.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| (self.x(index), self.y(*value)))
            .collect()
    }

    /// Coordinates of the most recent point.
    pub fn last_point(&self) -> (f64, f64) {
        let last = self.values.len() - 1;
        (self.x(last), self.y(self.values[last]))
    }

    /// SVG path data for the trend line, e.g. `M 12 138 L 508 12`.
    pub fn line_path(&self) -> String {
        self.points()
            .into_iter()
            .enumerate()
            .map(|(index, (x, y))| format!("{} {} {}", if index == 0 { "M" } else { "L" }, x, y))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// SVG path data for the area under the trend line, closed along the baseline.
    pub fn area_path(&self) -> String {
        let last = self.values.len() - 1;
        format!(
            "{} L {} {} L {} {} Z",
            self.line_path(),
            self.x(last),
            self.baseline(),
            self.x(0),
            self.baseline()
        )
    }
}

/// First and last time labels of a series, for the chart axis.
pub fn span_labels(series: &[PricePoint]) -> Option<(&str, &str)> {
    match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => Some((&first.t, &last.t)),
        _ => None,
    }
}
