//! Column-selective ridge regression and model fitting.
//!
//! The coefficients minimize
//!
//! ```text
//! ‖y - Xβ‖² + λ Σ_{j ∈ changepoints} β_j²
//! ```
//!
//! solved through the normal equations `(XᵀX + λD)β = Xᵀy` with a Cholesky
//! factorisation. `D` is diagonal with ones on the changepoint columns only,
//! so the base trend and the seasonal terms are unpenalized while most slope
//! adjustments are pulled toward zero.
//!
//! Because the penalty only touches the trend, the joint solution can trade a
//! smaller penalty for a larger residual. [`solve_with_seasonality`] guards
//! against that by falling back to a two-stage fit (trend first, seasonal
//! terms on its residuals) whenever the joint fit is worse in-sample than the
//! trend alone.

use crate::changepoint::place_changepoints;
use crate::config::{ForecastConfig, SeasonalityConfig};
use crate::design::{ColumnLayout, DesignMatrix};
use crate::error::{ForecastError, Result};
use crate::seasonality::select_active;
use crate::series::{normalize, Scaling, TimeSeries};
use crate::trend::{self, TrendCoefficients};
use chrono::NaiveDate;
use faer::linalg::solvers::Solve;
use faer::{Mat, MatRef, Side};
use tracing::debug;

/// Solve `(XᵀX + diag(ridge))β = Xᵀy` by Cholesky factorisation.
///
/// `ridge(j)` is the penalty added to the diagonal entry of column `j`.
fn solve_normal_equations(
    x: MatRef<'_, f64>,
    y: &[f64],
    ridge: impl Fn(usize) -> f64,
) -> Result<Vec<f64>> {
    let n = x.nrows();
    let k = x.ncols();

    if y.len() != n {
        return Err(ForecastError::InvalidInput(format!(
            "Design has {} rows but target has {} values",
            n,
            y.len()
        )));
    }

    let gram = Mat::<f64>::from_fn(k, k, |a, b| {
        let dot: f64 = (0..n).map(|i| x[(i, a)] * x[(i, b)]).sum();
        if a == b {
            dot + ridge(a)
        } else {
            dot
        }
    });
    let mut rhs = Mat::<f64>::from_fn(k, 1, |a, _| (0..n).map(|i| x[(i, a)] * y[i]).sum());

    let llt = gram.as_ref().llt(Side::Lower).map_err(|_| {
        ForecastError::SingularMatrix(format!(
            "normal equations ({k}x{k}, {n} observations) are not positive definite"
        ))
    })?;
    llt.solve_in_place(rhs.as_mut());

    let coefficients: Vec<f64> = (0..k).map(|j| rhs[(j, 0)]).collect();
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(ForecastError::SingularMatrix(
            "solution contains non-finite coefficients".to_string(),
        ));
    }

    Ok(coefficients)
}

/// Solve the penalized least-squares problem for a design matrix.
///
/// # Arguments
/// * `design` - Historical design matrix
/// * `y` - Target values, one per design row
/// * `penalty` - Ridge strength applied to the changepoint columns
///
/// # Returns
/// One coefficient per design column.
///
/// # Errors
/// `SingularMatrix` when the penalized normal equations are not positive
/// definite or produce non-finite coefficients.
pub fn solve_ridge(design: &DesignMatrix, y: &[f64], penalty: f64) -> Result<Vec<f64>> {
    let layout = &design.layout;
    solve_normal_equations(design.matrix.as_ref(), y, |j| {
        if layout.is_penalized(j) {
            penalty
        } else {
            0.0
        }
    })
}

fn sum_of_squares(y: &[f64], fitted: &[f64]) -> f64 {
    y.iter().zip(fitted).map(|(a, b)| (a - b).powi(2)).sum()
}

/// Fit a design that carries seasonal columns without letting them raise the
/// in-sample residual sum of squares above the trend-only fit.
///
/// The joint ridge solution is kept when its RSS does not exceed that of the
/// trend columns alone. Otherwise the seasonal block is refitted by ordinary
/// least squares on the trend-only residuals, which can only lower the RSS.
///
/// # Returns
/// Coefficients for every design column.
pub fn solve_with_seasonality(design: &DesignMatrix, y: &[f64], penalty: f64) -> Result<Vec<f64>> {
    let joint = solve_ridge(design, y, penalty)?;

    let n_trend = trend::n_columns(design.layout.n_changepoints);
    let n_seasonal = design.ncols() - n_trend;
    if n_seasonal == 0 {
        return Ok(joint);
    }

    let trend_block = design.matrix.as_ref().subcols(0, n_trend);
    let trend_only = solve_normal_equations(trend_block, y, |j| {
        if design.layout.is_penalized(j) {
            penalty
        } else {
            0.0
        }
    })?;

    let mut baseline = trend_only.clone();
    baseline.resize(design.ncols(), 0.0);
    let trend_fitted = design.predict(&baseline);
    let trend_rss = sum_of_squares(y, &trend_fitted);
    let joint_rss = sum_of_squares(y, &design.predict(&joint));

    if joint_rss <= trend_rss {
        return Ok(joint);
    }

    debug!(
        joint_rss,
        trend_rss,
        "Joint fit raised RSS; refitting seasonal terms on trend residuals"
    );
    let residuals: Vec<f64> = y.iter().zip(&trend_fitted).map(|(a, b)| a - b).collect();
    let seasonal_block = design.matrix.as_ref().subcols(n_trend, n_seasonal);
    let seasonal = solve_normal_equations(seasonal_block, &residuals, |_| 0.0)?;

    let mut coefficients = trend_only;
    coefficients.extend(seasonal);
    Ok(coefficients)
}

/// A fitted trend + seasonality model, ready to forecast.
///
/// Holds everything needed to rebuild design rows for arbitrary dates: the
/// changepoints, the active seasonalities, the coefficients and the scaling
/// between calendar/price space and model space.
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub(crate) coefficients: Vec<f64>,
    pub(crate) changepoints: Vec<f64>,
    pub(crate) seasonalities: Vec<SeasonalityConfig>,
    pub(crate) layout: ColumnLayout,
    pub(crate) scaling: Scaling,
    pub(crate) history_dates: Vec<NaiveDate>,
    pub(crate) history_values: Vec<f64>,
    pub(crate) fitted_values: Vec<f64>,
    pub(crate) residual_std: f64,
    pub(crate) interval_width: Option<f64>,
}

impl FittedModel {
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Changepoints in normalized time.
    pub fn changepoints(&self) -> &[f64] {
        &self.changepoints
    }

    /// Changepoints as calendar dates (rounded to the nearest day).
    pub fn changepoint_dates(&self) -> Vec<NaiveDate> {
        self.changepoints
            .iter()
            .filter_map(|&c| {
                let days = (c * self.scaling.span_days).round() as u64;
                self.scaling.start.checked_add_days(chrono::Days::new(days))
            })
            .collect()
    }

    /// Seasonalities that took part in the fit.
    pub fn seasonalities(&self) -> &[SeasonalityConfig] {
        &self.seasonalities
    }

    pub fn scaling(&self) -> &Scaling {
        &self.scaling
    }

    pub fn history_dates(&self) -> &[NaiveDate] {
        &self.history_dates
    }

    pub fn history_values(&self) -> &[f64] {
        &self.history_values
    }

    /// In-sample fitted values in original units.
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted_values
    }

    /// Standard deviation of the in-sample residuals, in original units.
    pub fn residual_std(&self) -> f64 {
        self.residual_std
    }

    /// Residual sum of squares over the history, in original units.
    pub fn residual_sum_of_squares(&self) -> f64 {
        self.history_values
            .iter()
            .zip(&self.fitted_values)
            .map(|(y, f)| (y - f).powi(2))
            .sum()
    }

    pub(crate) fn trend_coefficients(&self) -> TrendCoefficients<'_> {
        TrendCoefficients::from_slice(&self.coefficients, self.changepoints.len())
    }

    /// Trend slope at the end of the history, in original units per day.
    pub fn final_slope_per_day(&self) -> f64 {
        let slope = self.trend_coefficients().slope_at(1.0, &self.changepoints);
        self.scaling.unscale_delta(slope) / self.scaling.span_days
    }
}

/// Fit the trend + seasonality model to a series.
///
/// Validates the configuration, normalizes the series, places changepoints,
/// selects the active seasonalities and solves the ridge problem. Adding the
/// seasonal terms never increases the in-sample residual sum of squares over
/// the trend-only fit with the same changepoints and penalty.
pub fn fit(series: &TimeSeries, config: &ForecastConfig) -> Result<FittedModel> {
    config.validate()?;
    let norm = normalize(series)?;

    let changepoints = place_changepoints(
        &norm.t,
        config.changepoint_count,
        config.changepoint_range,
    );
    let seasonalities = select_active(&config.seasonalities, &norm);

    let design = DesignMatrix::build(&norm.t, &norm.t_days, &changepoints, &seasonalities);
    debug!(
        rows = design.nrows(),
        columns = design.ncols(),
        changepoints = changepoints.len(),
        seasonalities = seasonalities.len(),
        penalty = config.changepoint_penalty,
        "Solving ridge system"
    );

    let coefficients = solve_with_seasonality(&design, &norm.y, config.changepoint_penalty)?;

    let fitted_values: Vec<f64> = design
        .predict(&coefficients)
        .into_iter()
        .map(|v| norm.scaling.unscale_value(v))
        .collect();
    let history_values = series.values();

    let n = history_values.len() as f64;
    let residual_std = (history_values
        .iter()
        .zip(&fitted_values)
        .map(|(y, f)| (y - f).powi(2))
        .sum::<f64>()
        / n)
        .sqrt();

    Ok(FittedModel {
        coefficients,
        changepoints,
        seasonalities,
        layout: design.layout,
        scaling: norm.scaling,
        history_dates: series.dates(),
        history_values,
        fitted_values,
        residual_std,
        interval_width: config.interval_width,
    })
}
