//! Forecasting many symbols at once.
//!
//! Each symbol is an independent request with no shared mutable state, so
//! requests run as separate tasks on the rayon pool when the `native` feature
//! is enabled. Results come back in input order, one per symbol, and a
//! failure for one symbol does not affect the others.

use crate::config::ForecastConfig;
use crate::error::Result;
use crate::pipeline::{run, Report};
use crate::series::TimeSeries;
use tracing::warn;

#[cfg(feature = "native")]
use rayon::prelude::*;

/// A named series to forecast, typically one ticker symbol.
#[derive(Debug, Clone)]
pub struct SymbolSeries {
    pub symbol: String,
    pub series: TimeSeries,
}

impl SymbolSeries {
    pub fn new(symbol: impl Into<String>, series: TimeSeries) -> Self {
        Self {
            symbol: symbol.into(),
            series,
        }
    }
}

/// Outcome for one symbol.
#[derive(Debug, Clone)]
pub struct SymbolReport {
    pub symbol: String,
    pub result: Result<Report>,
}

fn run_one(input: &SymbolSeries, config: &ForecastConfig) -> SymbolReport {
    let result = run(&input.series, config);
    if let Err(ref e) = result {
        warn!(symbol = %input.symbol, error = %e, "Forecast failed");
    }
    SymbolReport {
        symbol: input.symbol.clone(),
        result,
    }
}

/// Run the pipeline for every symbol with a shared configuration.
pub fn run_batch(inputs: &[SymbolSeries], config: &ForecastConfig) -> Vec<SymbolReport> {
    #[cfg(feature = "native")]
    let reports = inputs.par_iter().map(|s| run_one(s, config)).collect();

    #[cfg(not(feature = "native"))]
    let reports = inputs.iter().map(|s| run_one(s, config)).collect();

    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use crate::recommendation::Signal;
    use chrono::{Days, NaiveDate};

    fn daily(values: impl IntoIterator<Item = f64>) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        TimeSeries::from_pairs(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (start + Days::new(i as u64), v)),
        )
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        let inputs = vec![
            SymbolSeries::new("UP", daily((0..60).map(|i| 100.0 + i as f64))),
            SymbolSeries::new("SHORT", daily(vec![5.0])),
            SymbolSeries::new("DOWN", daily((0..60).map(|i| 100.0 - 0.5 * i as f64))),
        ];
        let config = ForecastConfig::default().with_horizon_days(30);
        let reports = run_batch(&inputs, &config);

        let symbols: Vec<&str> = reports.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["UP", "SHORT", "DOWN"]);

        assert_eq!(
            reports[0].result.as_ref().unwrap().recommendation.signal,
            Signal::Buy
        );
        assert!(matches!(
            reports[1].result,
            Err(ForecastError::InsufficientData { .. })
        ));
        assert_eq!(
            reports[2].result.as_ref().unwrap().recommendation.signal,
            Signal::Sell
        );
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let inputs = vec![
            SymbolSeries::new("A", daily((0..45).map(|i| 20.0 + (i % 7) as f64))),
            SymbolSeries::new("B", daily((0..45).map(|i| 80.0 - (i % 5) as f64))),
        ];
        let config = ForecastConfig::default().with_horizon_days(10);
        let reports = run_batch(&inputs, &config);

        for (input, report) in inputs.iter().zip(&reports) {
            let single = run(&input.series, &config).unwrap();
            assert_eq!(report.result.as_ref().unwrap(), &single);
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(run_batch(&[], &ForecastConfig::default()).is_empty());
    }
}
