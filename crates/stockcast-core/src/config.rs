//! Forecast configuration.
//!
//! All parameters are supplied by the caller; nothing is read from the
//! environment. Every public entry point validates the configuration before
//! touching the data.

use crate::error::{ForecastError, Result};

/// Days per year used when converting a horizon given in years.
pub const DAYS_PER_YEAR: usize = 365;

/// When a seasonal component participates in the fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// Enabled only when the history covers at least two full periods and is
    /// sampled more finely than the period.
    #[default]
    Auto,
    /// Always enabled.
    Always,
}

/// A periodic component modelled as a truncated Fourier series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalityConfig {
    /// Component name, used to label forecast contributions
    pub name: String,
    /// Period in days
    pub period: f64,
    /// Number of sine/cosine pairs
    pub fourier_order: usize,
    pub activation: Activation,
}

impl SeasonalityConfig {
    pub fn new(name: &str, period: f64, fourier_order: usize) -> Self {
        Self {
            name: name.to_string(),
            period,
            fourier_order,
            activation: Activation::Always,
        }
    }

    /// Weekly seasonality (period 7 days, order 3), enabled automatically.
    pub fn weekly() -> Self {
        Self {
            activation: Activation::Auto,
            ..Self::new("weekly", 7.0, 3)
        }
    }

    /// Yearly seasonality (period 365.25 days, order 10), enabled automatically.
    pub fn yearly() -> Self {
        Self {
            activation: Activation::Auto,
            ..Self::new("yearly", 365.25, 10)
        }
    }

    /// Number of design matrix columns this component contributes.
    pub fn n_columns(&self) -> usize {
        2 * self.fourier_order
    }
}

/// Configuration for a single forecasting request.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Number of calendar days to forecast past the last observation
    pub horizon_days: usize,
    /// Maximum number of trend changepoints
    pub changepoint_count: usize,
    /// Fraction of the history in which changepoints may be placed
    pub changepoint_range: f64,
    /// Ridge penalty on changepoint slope adjustments (larger = smoother trend)
    pub changepoint_penalty: f64,
    /// Seasonal components
    pub seasonalities: Vec<SeasonalityConfig>,
    /// Coverage of the uncertainty band, or `None` for point forecasts only
    pub interval_width: Option<f64>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: DAYS_PER_YEAR,
            changepoint_count: 25,
            changepoint_range: 0.8,
            changepoint_penalty: 1.0,
            seasonalities: vec![SeasonalityConfig::weekly(), SeasonalityConfig::yearly()],
            interval_width: Some(0.8),
        }
    }
}

impl ForecastConfig {
    /// Set the horizon from a number of years (365 days each).
    pub fn with_horizon_years(mut self, years: usize) -> Self {
        self.horizon_days = years * DAYS_PER_YEAR;
        self
    }

    pub fn with_horizon_days(mut self, days: usize) -> Self {
        self.horizon_days = days;
        self
    }

    /// Add a seasonality that is always part of the fit.
    pub fn add_seasonality(mut self, name: &str, period: f64, fourier_order: usize) -> Self {
        self.seasonalities
            .push(SeasonalityConfig::new(name, period, fourier_order));
        self
    }

    /// Remove all seasonal components (trend-only model).
    pub fn without_seasonality(mut self) -> Self {
        self.seasonalities.clear();
        self
    }

    /// Check every parameter against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if self.horizon_days == 0 {
            return Err(ForecastError::invalid_config(
                "horizon_days",
                self.horizon_days,
                "must be positive",
            ));
        }

        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(ForecastError::invalid_config(
                "changepoint_range",
                self.changepoint_range,
                "must be in (0, 1]",
            ));
        }

        if !(self.changepoint_penalty.is_finite() && self.changepoint_penalty >= 0.0) {
            return Err(ForecastError::invalid_config(
                "changepoint_penalty",
                self.changepoint_penalty,
                "must be finite and non-negative",
            ));
        }

        for (i, s) in self.seasonalities.iter().enumerate() {
            if !(s.period.is_finite() && s.period > 0.0) {
                return Err(ForecastError::invalid_config(
                    &format!("seasonalities.{}.period", s.name),
                    s.period,
                    "must be finite and positive",
                ));
            }
            if s.fourier_order == 0 {
                return Err(ForecastError::invalid_config(
                    &format!("seasonalities.{}.fourier_order", s.name),
                    s.fourier_order,
                    "must be at least 1",
                ));
            }
            if self.seasonalities[..i].iter().any(|o| o.name == s.name) {
                return Err(ForecastError::invalid_config(
                    "seasonalities",
                    &s.name,
                    "names must be unique",
                ));
            }
        }

        if let Some(width) = self.interval_width {
            if !(width > 0.0 && width < 1.0) {
                return Err(ForecastError::invalid_config(
                    "interval_width",
                    width,
                    "must be in (0, 1)",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ForecastConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.horizon_days, 365);
        assert_eq!(config.changepoint_count, 25);
        assert_eq!(config.seasonalities.len(), 2);
        assert_eq!(config.seasonalities[0].activation, Activation::Auto);
    }

    #[test]
    fn test_horizon_years() {
        let config = ForecastConfig::default().with_horizon_years(4);
        assert_eq!(config.horizon_days, 1460);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let config = ForecastConfig::default().with_horizon_days(0);
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InvalidConfiguration { ref param, .. } if param == "horizon_days"
        ));
    }

    #[test]
    fn test_out_of_range_parameters() {
        let cases = vec![
            ForecastConfig {
                changepoint_range: 0.0,
                ..Default::default()
            },
            ForecastConfig {
                changepoint_range: 1.2,
                ..Default::default()
            },
            ForecastConfig {
                changepoint_penalty: -0.5,
                ..Default::default()
            },
            ForecastConfig {
                changepoint_penalty: f64::NAN,
                ..Default::default()
            },
            ForecastConfig {
                interval_width: Some(1.0),
                ..Default::default()
            },
            ForecastConfig::default().add_seasonality("monthly", 30.5, 0),
            ForecastConfig::default().add_seasonality("broken", -7.0, 2),
            ForecastConfig::default().add_seasonality("weekly", 7.0, 2),
        ];

        for config in cases {
            assert!(
                matches!(
                    config.validate(),
                    Err(ForecastError::InvalidConfiguration { .. })
                ),
                "expected rejection of {:?}",
                config
            );
        }
    }

    #[test]
    fn test_boundary_values_accepted() {
        let config = ForecastConfig {
            horizon_days: 1,
            changepoint_count: 0,
            changepoint_range: 1.0,
            changepoint_penalty: 0.0,
            interval_width: None,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_added_seasonality_always_on() {
        let config = ForecastConfig::default()
            .without_seasonality()
            .add_seasonality("monthly", 30.5, 5);
        assert_eq!(config.seasonalities.len(), 1);
        assert_eq!(config.seasonalities[0].activation, Activation::Always);
        assert_eq!(config.seasonalities[0].n_columns(), 10);
    }
}
