//! Daily price series and their normalized numeric form.
//!
//! A [`TimeSeries`] is what the caller hands in: `(date, value)` pairs,
//! typically daily closing prices. [`normalize`] validates it and maps it to
//! a [`NormalizedSeries`] whose time axis lies in `[0, 1]` and whose values
//! are centred and rescaled for numerical conditioning. The [`Scaling`] used
//! is kept so that forecasts can be mapped back to dates and prices.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;

/// A single dated observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Ordered sequence of dated observations, owned by the caller.
///
/// Construction does not validate ordering; [`normalize`] does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    observations: Vec<Observation>,
}

impl TimeSeries {
    /// Create a series from observations.
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    /// Create a series from `(date, value)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        Self {
            observations: pairs
                .into_iter()
                .map(|(date, value)| Observation { date, value })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }
}

/// Affine maps between calendar/price space and the normalized model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaling {
    /// First observed date (time origin)
    pub start: NaiveDate,
    /// Days between the first and last observation
    pub span_days: f64,
    /// Value subtracted before scaling (the last observed value)
    pub y_offset: f64,
    /// Divisor applied after centring
    pub y_scale: f64,
}

impl Scaling {
    /// Days elapsed since the time origin.
    pub fn days_since_start(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64
    }

    /// Map a day offset to normalized time.
    pub fn normalize_time(&self, days: f64) -> f64 {
        days / self.span_days
    }

    pub fn scale_value(&self, value: f64) -> f64 {
        (value - self.y_offset) / self.y_scale
    }

    /// Map a normalized value back to original units.
    pub fn unscale_value(&self, scaled: f64) -> f64 {
        scaled * self.y_scale + self.y_offset
    }

    /// Map a normalized difference (no offset) back to original units.
    pub fn unscale_delta(&self, scaled: f64) -> f64 {
        scaled * self.y_scale
    }
}

/// Numeric view of a validated [`TimeSeries`].
#[derive(Debug, Clone)]
pub struct NormalizedSeries {
    /// Normalized time in `[0, 1]`
    pub t: Vec<f64>,
    /// Day offsets from the first observation
    pub t_days: Vec<f64>,
    /// Centred and scaled values
    pub y: Vec<f64>,
    /// Maps used to produce `t` and `y`
    pub scaling: Scaling,
}

impl NormalizedSeries {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Smallest gap between consecutive observations, in days.
    pub fn min_spacing_days(&self) -> f64 {
        self.t_days
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold(f64::INFINITY, f64::min)
    }

    /// Days covered from the first to the last observation.
    pub fn span_days(&self) -> f64 {
        self.scaling.span_days
    }
}

/// Validate a series and convert it to normalized form.
///
/// Values are centred on the last observation and divided by the largest
/// absolute deviation from it, so a constant series maps to all zeros.
///
/// # Errors
/// * `InsufficientData` with fewer than 2 observations
/// * `NonMonotonicTime` when a date does not strictly follow its predecessor
/// * `InvalidInput` when a value is NaN or infinite
pub fn normalize(series: &TimeSeries) -> Result<NormalizedSeries> {
    let obs = series.observations();

    let (first, last) = match (obs.first(), obs.last()) {
        (Some(first), Some(last)) if obs.len() >= 2 => (first, last),
        _ => {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: obs.len(),
            })
        }
    };

    for (i, pair) in obs.windows(2).enumerate() {
        if pair[1].date <= pair[0].date {
            return Err(ForecastError::NonMonotonicTime {
                index: i + 1,
                previous: pair[0].date,
                current: pair[1].date,
            });
        }
    }

    if let Some((i, o)) = obs.iter().enumerate().find(|(_, o)| !o.value.is_finite()) {
        return Err(ForecastError::InvalidInput(format!(
            "Non-finite value {} at observation {} ({})",
            o.value, i, o.date
        )));
    }

    let y_offset = last.value;
    let max_dev = obs
        .iter()
        .map(|o| (o.value - y_offset).abs())
        .fold(0.0_f64, f64::max);
    let y_scale = if max_dev > 0.0 { max_dev } else { 1.0 };

    let scaling = Scaling {
        start: first.date,
        span_days: (last.date - first.date).num_days() as f64,
        y_offset,
        y_scale,
    };

    let t_days: Vec<f64> = obs
        .iter()
        .map(|o| scaling.days_since_start(o.date))
        .collect();
    let t = t_days.iter().map(|&d| scaling.normalize_time(d)).collect();
    let y = obs.iter().map(|o| scaling.scale_value(o.value)).collect();

    Ok(NormalizedSeries {
        t,
        t_days,
        y,
        scaling,
    })
}
