//! Trend and seasonality decomposition forecasting for daily price series.
//!
//! A series is modelled as a continuous piecewise-linear trend plus Fourier
//! seasonal terms, fitted jointly by ridge regression that penalizes only the
//! trend's changepoint slope adjustments. The fitted model is extrapolated
//! over a horizon of calendar days and the result is turned into a
//! `Buy`/`Sell` signal by comparing the horizon end with the last observation.
//!
//! ```
//! use chrono::{Days, NaiveDate};
//! use stockcast_core::{run, ForecastConfig, Signal, TimeSeries};
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let series = TimeSeries::from_pairs(
//!     (0..60).map(|i| (start + Days::new(i), 100.0 + i as f64)),
//! );
//! let config = ForecastConfig::default().with_horizon_days(30);
//!
//! let report = run(&series, &config).unwrap();
//! assert_eq!(report.forecast.future().len(), 30);
//! assert_eq!(report.recommendation.signal, Signal::Buy);
//! ```

pub mod batch;
pub mod changepoint;
pub mod config;
pub mod design;
pub mod error;
pub mod fit;
pub mod forecast;
pub mod metrics;
pub mod pipeline;
pub mod recommendation;
pub mod seasonality;
pub mod series;
pub mod trend;

// Re-exports for convenience
pub use batch::{run_batch, SymbolReport, SymbolSeries};
pub use changepoint::place_changepoints;
pub use config::{Activation, ForecastConfig, SeasonalityConfig, DAYS_PER_YEAR};
pub use design::{ColumnLayout, DesignMatrix};
pub use error::{ForecastError, Result};
pub use fit::{fit, solve_ridge, solve_with_seasonality, FittedModel};
pub use forecast::{interval_z, Forecast, ForecastPoint};
pub use metrics::{mae, mape, rmse, FitDiagnostics};
pub use pipeline::{run, Report};
pub use recommendation::{recommend, Recommendation, Signal};
pub use series::{normalize, NormalizedSeries, Observation, Scaling, TimeSeries};
