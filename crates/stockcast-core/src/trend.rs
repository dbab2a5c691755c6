//! Continuous piecewise-linear trend.
//!
//! The trend at normalized time `t` is
//!
//! ```text
//! k + m * t + Σ_j δ_j * max(0, t - c_j)
//! ```
//!
//! where `k`/`m` are the base intercept and slope and `δ_j` the slope change
//! at changepoint `c_j`. The function is continuous everywhere and kinked at
//! each changepoint with a nonzero `δ_j`.

/// Number of trend columns for a given changepoint count.
pub fn n_columns(n_changepoints: usize) -> usize {
    2 + n_changepoints
}

/// Write the trend basis for time `t` into `row`.
///
/// `row` must hold exactly `n_columns(changepoints.len())` values.
pub fn fill_basis(t: f64, changepoints: &[f64], row: &mut [f64]) {
    debug_assert_eq!(row.len(), n_columns(changepoints.len()));
    row[0] = 1.0;
    row[1] = t;
    for (slot, &c) in row[2..].iter_mut().zip(changepoints) {
        *slot = (t - c).max(0.0);
    }
}

/// Trend coefficients split into their roles.
#[derive(Debug, Clone, Copy)]
pub struct TrendCoefficients<'a> {
    pub intercept: f64,
    pub slope: f64,
    pub deltas: &'a [f64],
}

impl<'a> TrendCoefficients<'a> {
    /// Split the leading trend block off a full coefficient vector.
    pub fn from_slice(coefficients: &'a [f64], n_changepoints: usize) -> Self {
        Self {
            intercept: coefficients[0],
            slope: coefficients[1],
            deltas: &coefficients[2..2 + n_changepoints],
        }
    }

    /// Evaluate the trend at normalized time `t`.
    pub fn evaluate(&self, t: f64, changepoints: &[f64]) -> f64 {
        let kinks: f64 = self
            .deltas
            .iter()
            .zip(changepoints)
            .map(|(d, &c)| d * (t - c).max(0.0))
            .sum();
        self.intercept + self.slope * t + kinks
    }

    /// Slope in effect at normalized time `t`.
    pub fn slope_at(&self, t: f64, changepoints: &[f64]) -> f64 {
        self.slope
            + self
                .deltas
                .iter()
                .zip(changepoints)
                .filter(|(_, c)| t > **c)
                .map(|(d, _)| d)
                .sum::<f64>()
    }
}
