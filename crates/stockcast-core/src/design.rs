//! Design matrix construction.
//!
//! Column layout, identical for history and future rows:
//!
//! ```text
//! [1, t, max(0, t - c_1), …, max(0, t - c_m), <seasonality 1 Fourier block>, …]
//! ```
//!
//! Only the changepoint columns are penalized by the ridge fit.

use crate::config::SeasonalityConfig;
use crate::seasonality::fill_fourier;
use crate::trend;
use faer::Mat;

/// Position of each block of columns in a design row.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub n_changepoints: usize,
    /// `(first column, column count)` for each seasonality, in order
    pub seasonal_blocks: Vec<(usize, usize)>,
    pub n_columns: usize,
}

impl ColumnLayout {
    pub fn new(n_changepoints: usize, seasonalities: &[SeasonalityConfig]) -> Self {
        let mut next = trend::n_columns(n_changepoints);
        let seasonal_blocks = seasonalities
            .iter()
            .map(|s| {
                let block = (next, s.n_columns());
                next += s.n_columns();
                block
            })
            .collect();

        Self {
            n_changepoints,
            seasonal_blocks,
            n_columns: next,
        }
    }

    /// Whether column `j` carries a changepoint slope adjustment.
    pub fn is_penalized(&self, j: usize) -> bool {
        j >= 2 && j < 2 + self.n_changepoints
    }

    /// Coefficients belonging to seasonality `i`.
    pub fn seasonal_slice<'a>(&self, coefficients: &'a [f64], i: usize) -> &'a [f64] {
        let (start, len) = self.seasonal_blocks[i];
        &coefficients[start..start + len]
    }
}

/// Dense design matrix with its column layout.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    pub matrix: Mat<f64>,
    pub layout: ColumnLayout,
}

impl DesignMatrix {
    /// Build one row per time point.
    ///
    /// # Arguments
    /// * `t` - Normalized times (trend axis)
    /// * `t_days` - Day offsets (seasonal axis), same length as `t`
    /// * `changepoints` - Normalized changepoint times
    /// * `seasonalities` - Active seasonal components
    pub fn build(
        t: &[f64],
        t_days: &[f64],
        changepoints: &[f64],
        seasonalities: &[SeasonalityConfig],
    ) -> Self {
        debug_assert_eq!(t.len(), t_days.len());
        let layout = ColumnLayout::new(changepoints.len(), seasonalities);
        let mut matrix = Mat::<f64>::zeros(t.len(), layout.n_columns);
        let mut row = vec![0.0; layout.n_columns];

        for i in 0..t.len() {
            fill_row(t[i], t_days[i], changepoints, seasonalities, &layout, &mut row);
            for (j, &x) in row.iter().enumerate() {
                matrix[(i, j)] = x;
            }
        }

        Self { matrix, layout }
    }

    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Row-wise dot product with a coefficient vector.
    pub fn predict(&self, coefficients: &[f64]) -> Vec<f64> {
        (0..self.nrows())
            .map(|i| {
                coefficients
                    .iter()
                    .enumerate()
                    .map(|(j, b)| self.matrix[(i, j)] * b)
                    .sum()
            })
            .collect()
    }
}

/// Write a single design row.
pub fn fill_row(
    t: f64,
    t_days: f64,
    changepoints: &[f64],
    seasonalities: &[SeasonalityConfig],
    layout: &ColumnLayout,
    row: &mut [f64],
) {
    let n_trend = trend::n_columns(changepoints.len());
    trend::fill_basis(t, changepoints, &mut row[..n_trend]);
    for (s, &(start, len)) in seasonalities.iter().zip(&layout.seasonal_blocks) {
        fill_fourier(t_days, s.period, s.fourier_order, &mut row[start..start + len]);
    }
}
