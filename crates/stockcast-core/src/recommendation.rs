//! Directional signal derived from a forecast.
//!
//! The rule is a plain comparison: if the forecast at the end of the horizon
//! exceeds the last observed value the signal is `Buy`, otherwise `Sell`.
//! Equality yields `Sell`. There is no `Hold` state, no smoothing and no
//! confidence threshold; callers wanting risk-adjusted decisions layer their
//! own policy on top of [`Recommendation`].

use crate::forecast::Forecast;
use chrono::NaiveDate;
use std::fmt;

/// Trading direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Sell,
}

impl Signal {
    /// `Buy` iff the forecast is strictly above the last observation.
    pub fn from_comparison(last_observed: f64, forecast_at_horizon_end: f64) -> Self {
        if forecast_at_horizon_end > last_observed {
            Signal::Buy
        } else {
            Signal::Sell
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Signal::Buy => "Buy",
            Signal::Sell => "Sell",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A signal together with the values it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub signal: Signal,
    pub last_observed: f64,
    pub forecast_at_horizon_end: f64,
    /// Date of the last observation
    pub reference_date: NaiveDate,
    /// Date of the final forecast row
    pub horizon_end: NaiveDate,
}

impl Recommendation {
    /// Relative change from the last observation to the horizon end.
    ///
    /// `None` when the last observation is zero.
    pub fn expected_change(&self) -> Option<f64> {
        if self.last_observed == 0.0 {
            None
        } else {
            Some((self.forecast_at_horizon_end - self.last_observed) / self.last_observed.abs())
        }
    }
}

/// Compare the last observation with the forecast at the horizon end.
pub fn recommend(forecast: &Forecast) -> Recommendation {
    let (reference_date, last_observed) = forecast.last_observed();
    let end = forecast.horizon_end();

    Recommendation {
        signal: Signal::from_comparison(last_observed, end.yhat),
        last_observed,
        forecast_at_horizon_end: end.yhat,
        reference_date,
        horizon_end: end.date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForecastConfig;
    use crate::fit::fit;
    use crate::series::TimeSeries;
    use chrono::Days;

    #[test]
    fn test_signal_rule() {
        assert_eq!(Signal::from_comparison(100.0, 100.5), Signal::Buy);
        assert_eq!(Signal::from_comparison(100.0, 99.5), Signal::Sell);
    }

    #[test]
    fn test_tie_is_sell() {
        assert_eq!(Signal::from_comparison(100.0, 100.0), Signal::Sell);
        assert_eq!(Signal::from_comparison(0.0, -0.0), Signal::Sell);
    }

    #[test]
    fn test_nan_forecast_is_sell() {
        assert_eq!(Signal::from_comparison(100.0, f64::NAN), Signal::Sell);
    }

    #[test]
    fn test_display() {
        assert_eq!(Signal::Buy.to_string(), "Buy");
        assert_eq!(format!("{}", Signal::Sell), "Sell");
    }

    #[test]
    fn test_expected_change() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let rec = Recommendation {
            signal: Signal::Buy,
            last_observed: 200.0,
            forecast_at_horizon_end: 250.0,
            reference_date: date,
            horizon_end: date,
        };
        assert_eq!(rec.expected_change(), Some(0.25));

        let flat = Recommendation {
            last_observed: 0.0,
            ..rec
        };
        assert_eq!(flat.expected_change(), None);
    }

    #[test]
    fn test_recommend_from_forecast() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let series = TimeSeries::from_pairs(
            (0..60).map(|i| (start + Days::new(i), 300.0 - 2.0 * i as f64)),
        );
        let forecast = fit(&series, &ForecastConfig::default())
            .unwrap()
            .predict(20)
            .unwrap();
        let rec = recommend(&forecast);

        assert_eq!(rec.signal, Signal::Sell);
        assert_eq!(rec.last_observed, 182.0);
        assert_eq!(rec.reference_date, start + Days::new(59));
        assert_eq!(rec.horizon_end, start + Days::new(79));
        assert!(rec.forecast_at_horizon_end < rec.last_observed);
    }
}
