//! Forecast generation from a fitted model.
//!
//! The forecast covers the observed history (fitted values) followed by one
//! row per calendar day of the horizon. Each row is produced by rebuilding the
//! design row with the model's own changepoints and seasonalities, so history
//! and future share one column layout.

use crate::design::fill_row;
use crate::error::{ForecastError, Result};
use crate::fit::FittedModel;
use crate::seasonality;
use chrono::{Days, NaiveDate};
use statrs::distribution::{ContinuousCDF, Normal};

/// One forecast row, in original units.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Point forecast
    pub yhat: f64,
    /// Lower uncertainty bound
    pub yhat_lower: f64,
    /// Upper uncertainty bound
    pub yhat_upper: f64,
    /// Trend component
    pub trend: f64,
    /// Additive contribution of each active seasonality, in model order
    pub seasonal: Vec<f64>,
}

/// Fitted history followed by the extrapolated horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    points: Vec<ForecastPoint>,
    seasonality_names: Vec<String>,
    history_len: usize,
    last_observed: (NaiveDate, f64),
}

impl Forecast {
    /// All rows, history first, strictly increasing in date.
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Rows covering the observed history.
    pub fn history(&self) -> &[ForecastPoint] {
        &self.points[..self.history_len]
    }

    /// Rows beyond the last observation.
    pub fn future(&self) -> &[ForecastPoint] {
        &self.points[self.history_len..]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn horizon_days(&self) -> usize {
        self.points.len() - self.history_len
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn yhat(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.yhat).collect()
    }

    /// Names of the seasonal components, aligned with `ForecastPoint::seasonal`.
    pub fn seasonality_names(&self) -> &[String] {
        &self.seasonality_names
    }

    /// Values of one named seasonal component across all rows.
    pub fn component(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.seasonality_names.iter().position(|n| n == name)?;
        Some(self.points.iter().map(|p| p.seasonal[idx]).collect())
    }

    /// Date and value of the last observation.
    pub fn last_observed(&self) -> (NaiveDate, f64) {
        self.last_observed
    }

    /// Final row of the horizon.
    pub fn horizon_end(&self) -> &ForecastPoint {
        // predict() always emits at least one future row
        &self.points[self.points.len() - 1]
    }
}

/// Two-sided standard normal quantile for a central coverage `width`.
pub fn interval_z(width: f64) -> Result<f64> {
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| ForecastError::InvalidInput(format!("standard normal: {e}")))?;
    Ok(normal.inverse_cdf(0.5 + width / 2.0))
}

impl FittedModel {
    /// Forecast the history and `horizon_days` calendar days beyond it.
    ///
    /// The uncertainty band is `yhat ± z·σ` on the history and
    /// `yhat ± z·σ·sqrt(h)` for the row `h` days past the last observation,
    /// where `σ` is the in-sample residual standard deviation. Without an
    /// interval width the bounds equal the point forecast.
    pub fn predict(&self, horizon_days: usize) -> Result<Forecast> {
        if horizon_days == 0 {
            return Err(ForecastError::invalid_config(
                "horizon_days",
                horizon_days,
                "must be positive",
            ));
        }

        let (last_date, last_value) = match (self.history_dates.last(), self.history_values.last())
        {
            (Some(&d), Some(&v)) => (d, v),
            _ => {
                return Err(ForecastError::InsufficientData { needed: 2, got: 0 });
            }
        };

        let mut dates = self.history_dates.clone();
        for h in 1..=horizon_days as u64 {
            let date = last_date.checked_add_days(Days::new(h)).ok_or_else(|| {
                ForecastError::InvalidInput(format!(
                    "horizon of {horizon_days} days overflows the calendar after {last_date}"
                ))
            })?;
            dates.push(date);
        }

        let z = match self.interval_width {
            Some(width) => interval_z(width)?,
            None => 0.0,
        };
        let band = z * self.residual_std;

        let trend = self.trend_coefficients();
        let mut row = vec![0.0; self.layout.n_columns];
        let points = dates
            .into_iter()
            .map(|date| {
                let t_days = self.scaling.days_since_start(date);
                let t = self.scaling.normalize_time(t_days);
                fill_row(
                    t,
                    t_days,
                    &self.changepoints,
                    &self.seasonalities,
                    &self.layout,
                    &mut row,
                );
                let scaled: f64 = row
                    .iter()
                    .zip(&self.coefficients)
                    .map(|(x, b)| x * b)
                    .sum();
                let yhat = self.scaling.unscale_value(scaled);

                let seasonal = self
                    .seasonalities
                    .iter()
                    .enumerate()
                    .map(|(i, s)| {
                        let coefs = self.layout.seasonal_slice(&self.coefficients, i);
                        self.scaling
                            .unscale_delta(seasonality::evaluate(t_days, s, coefs))
                    })
                    .collect();
                let trend_value = self
                    .scaling
                    .unscale_value(trend.evaluate(t, &self.changepoints));

                let days_ahead = (date - last_date).num_days();
                let width = if days_ahead > 0 {
                    band * (days_ahead as f64).sqrt()
                } else {
                    band
                };

                ForecastPoint {
                    date,
                    yhat,
                    yhat_lower: yhat - width,
                    yhat_upper: yhat + width,
                    trend: trend_value,
                    seasonal,
                }
            })
            .collect();

        Ok(Forecast {
            points,
            seasonality_names: self.seasonalities.iter().map(|s| s.name.clone()).collect(),
            history_len: self.history_dates.len(),
            last_observed: (last_date, last_value),
        })
    }
}
