//! End-to-end forecasting pipeline.
//!
//! normalize → design → ridge fit → forecast → recommendation

use crate::config::ForecastConfig;
use crate::error::Result;
use crate::fit::fit;
use crate::forecast::Forecast;
use crate::metrics::FitDiagnostics;
use crate::recommendation::{recommend, Recommendation};
use crate::series::TimeSeries;
use tracing::info;

/// Everything a single forecasting request returns.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub forecast: Forecast,
    pub recommendation: Recommendation,
    pub diagnostics: FitDiagnostics,
}

/// Forecast a series and derive a recommendation.
///
/// The configuration is validated before the data is examined. Any stage
/// failure is returned unchanged; no partial report is produced.
pub fn run(series: &TimeSeries, config: &ForecastConfig) -> Result<Report> {
    config.validate()?;

    info!(
        observations = series.len(),
        horizon_days = config.horizon_days,
        "Starting forecast"
    );

    let model = fit(series, config)?;
    let forecast = model.predict(config.horizon_days)?;
    let recommendation = recommend(&forecast);
    let diagnostics = FitDiagnostics::from_model(&model)?;

    info!(
        signal = %recommendation.signal,
        last_observed = recommendation.last_observed,
        forecast_at_horizon_end = recommendation.forecast_at_horizon_end,
        rmse = diagnostics.rmse,
        "Forecast complete"
    );

    Ok(Report {
        forecast,
        recommendation,
        diagnostics,
    })
}
