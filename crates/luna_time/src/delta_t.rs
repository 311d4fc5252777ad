//! Delta T = TT - UT, piecewise-linear over a table of anchor years.
//!
//! Anchors are historical reconstructions (Morrison & Stephenson for the
//! ancient points, IERS for the modern ones). Outside the table the first
//! or last segment is extended linearly.

use crate::error::TimeError;

/// Default anchors: `(decimal year, Delta T seconds)`.
pub const DEFAULT_DELTA_T_ANCHORS: [(f64, f64); 8] = [
    (-500.0, 17_190.0),
    (0.0, 10_580.0),
    (500.0, 5_710.0),
    (1000.0, 1_570.0),
    (1500.0, 200.0),
    (1900.0, -6.64),
    (2000.0, 63.83),
    (2018.0, 68.97),
];

/// Immutable Delta T anchor table.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaTTable {
    /// `(year, seconds)` pairs, strictly increasing in year.
    anchors: Vec<(f64, f64)>,
}

impl DeltaTTable {
    /// Build a table, rejecting fewer than two anchors, non-finite values or
    /// years that are not strictly increasing.
    pub fn new(anchors: Vec<(f64, f64)>) -> Result<Self, TimeError> {
        if anchors.len() < 2 {
            return Err(TimeError::InvalidDeltaTTable("need at least two anchors"));
        }
        if anchors.iter().any(|(y, dt)| !y.is_finite() || !dt.is_finite()) {
            return Err(TimeError::InvalidDeltaTTable("anchors must be finite"));
        }
        if anchors.windows(2).any(|w| w[1].0 <= w[0].0) {
            return Err(TimeError::InvalidDeltaTTable(
                "anchor years must be strictly increasing",
            ));
        }
        Ok(Self { anchors })
    }

    pub fn anchors(&self) -> &[(f64, f64)] {
        &self.anchors
    }

    /// Delta T in seconds at a decimal year.
    pub fn delta_t(&self, year: f64) -> f64 {
        // Segment whose upper anchor is the first year >= `year`, clamped to
        // the table so the end segments extrapolate.
        let upper = self
            .anchors
            .partition_point(|&(y, _)| y < year)
            .clamp(1, self.anchors.len() - 1);
        let (y0, d0) = self.anchors[upper - 1];
        let (y1, d1) = self.anchors[upper];
        let slope = (d1 - d0) / (y1 - y0);
        d1 - (y1 - year) * slope
    }
}

impl Default for DeltaTTable {
    fn default() -> Self {
        Self {
            anchors: DEFAULT_DELTA_T_ANCHORS.to_vec(),
        }
    }
}
