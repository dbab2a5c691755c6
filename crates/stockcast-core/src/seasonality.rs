//! Fourier-series seasonal components.
//!
//! A seasonality with period `P` days and order `K` contributes the columns
//!
//! ```text
//! sin(2π·1·t/P), cos(2π·1·t/P), …, sin(2π·K·t/P), cos(2π·K·t/P)
//! ```
//!
//! evaluated on the day offset `t`. Any smooth periodic shape is a linear
//! combination of these harmonics, so the seasonal effect stays linear in its
//! coefficients and is fitted jointly with the trend.

use crate::config::{Activation, SeasonalityConfig};
use crate::series::NormalizedSeries;
use std::f64::consts::PI;
use tracing::debug;

/// Write the Fourier basis of one seasonality at day offset `t` into `row`.
///
/// `row` must hold exactly `2 * fourier_order` values.
pub fn fill_fourier(t: f64, period: f64, fourier_order: usize, row: &mut [f64]) {
    debug_assert_eq!(row.len(), 2 * fourier_order);
    for k in 1..=fourier_order {
        let angle = 2.0 * PI * k as f64 * t / period;
        row[2 * (k - 1)] = angle.sin();
        row[2 * (k - 1) + 1] = angle.cos();
    }
}

/// Fourier basis for a whole vector of day offsets, one row per offset.
pub fn fourier_series(t: &[f64], period: f64, fourier_order: usize) -> Vec<Vec<f64>> {
    t.iter()
        .map(|&ti| {
            let mut row = vec![0.0; 2 * fourier_order];
            fill_fourier(ti, period, fourier_order, &mut row);
            row
        })
        .collect()
}

/// Decide whether a seasonality takes part in a fit, before order capping.
///
/// `Auto` components need at least two full periods of history and a
/// sampling interval shorter than the period; `Always` components are kept
/// unconditionally.
pub fn is_active(config: &SeasonalityConfig, span_days: f64, min_spacing_days: f64) -> bool {
    match config.activation {
        Activation::Always => true,
        Activation::Auto => span_days >= 2.0 * config.period && min_spacing_days < config.period,
    }
}

/// Number of distinct phases `t mod period` among the day offsets.
///
/// Exchange closes on weekdays only hit 5 of the 7 weekly phases, so a weekly
/// component can resolve fewer harmonics than daily data allows.
pub fn distinct_phases(t_days: &[f64], period: f64) -> usize {
    const TOLERANCE: f64 = 1e-6;

    let mut phases: Vec<f64> = t_days.iter().map(|t| t.rem_euclid(period)).collect();
    phases.sort_by(f64::total_cmp);
    phases.dedup_by(|a, b| (*a - *b).abs() < TOLERANCE);

    match (phases.first(), phases.last()) {
        (Some(&lo), Some(&hi)) if phases.len() > 1 && period - hi + lo < TOLERANCE => {
            phases.len() - 1
        }
        _ => phases.len(),
    }
}

/// Largest Fourier order the sampled phases can identify.
///
/// Order `K` spans `2K` periodic columns which, together with the intercept,
/// need `2K + 1` distinct phases. When no phase is observed twice every
/// function of the samples is periodic, so one phase is left for the slope.
pub fn max_identifiable_order(t_days: &[f64], period: f64) -> usize {
    let phases = distinct_phases(t_days, period);
    let usable = if phases == t_days.len() {
        phases.saturating_sub(1)
    } else {
        phases
    };
    usable.saturating_sub(1) / 2
}

/// Filter the configured seasonalities down to those used in the fit.
///
/// Components that pass [`is_active`] have their Fourier order capped at
/// [`max_identifiable_order`]; a component with no identifiable harmonic is
/// dropped whatever its activation.
pub fn select_active(
    configs: &[SeasonalityConfig],
    series: &NormalizedSeries,
) -> Vec<SeasonalityConfig> {
    let span_days = series.span_days();
    let min_spacing_days = series.min_spacing_days();

    configs
        .iter()
        .filter_map(|s| {
            if !is_active(s, span_days, min_spacing_days) {
                debug!(
                    seasonality = %s.name,
                    period = s.period,
                    span_days,
                    "Disabling seasonality: history too short or too coarse"
                );
                return None;
            }

            let max_order = max_identifiable_order(&series.t_days, s.period);
            if max_order == 0 {
                debug!(
                    seasonality = %s.name,
                    period = s.period,
                    "Disabling seasonality: too few distinct phases"
                );
                return None;
            }

            let mut s = s.clone();
            if s.fourier_order > max_order {
                debug!(
                    seasonality = %s.name,
                    requested = s.fourier_order,
                    max_order,
                    "Reducing Fourier order to the sampled phases"
                );
                s.fourier_order = max_order;
            }
            Some(s)
        })
        .collect()
}

/// Evaluate one seasonal component at day offset `t`.
pub fn evaluate(t: f64, config: &SeasonalityConfig, coefficients: &[f64]) -> f64 {
    let mut row = vec![0.0; config.n_columns()];
    fill_fourier(t, config.period, config.fourier_order, &mut row);
    row.iter().zip(coefficients).map(|(x, b)| x * b).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{normalize, TimeSeries};
    use approx::assert_abs_diff_eq;
    use chrono::{Datelike, Days, NaiveDate};

    #[test]
    fn test_fourier_values() {
        let rows = fourier_series(&[0.0, 1.75, 7.0], 7.0, 2);

        // t = 0: all sines 0, all cosines 1
        assert_eq!(rows[0].len(), 4);
        assert_abs_diff_eq!(rows[0][0], 0.0);
        assert_abs_diff_eq!(rows[0][1], 1.0);
        assert_abs_diff_eq!(rows[0][2], 0.0);
        assert_abs_diff_eq!(rows[0][3], 1.0);

        // Quarter period: sin(π/2) = 1, cos(π/2) = 0, sin(π) = 0, cos(π) = -1
        assert_abs_diff_eq!(rows[1][0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rows[1][1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rows[1][2], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rows[1][3], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fourier_is_periodic() {
        let a = fourier_series(&[3.0], 7.0, 3);
        let b = fourier_series(&[3.0 + 7.0 * 5.0], 7.0, 3);
        for (x, y) in a[0].iter().zip(b[0].iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_auto_activation() {
        let weekly = SeasonalityConfig::weekly();
        let yearly = SeasonalityConfig::yearly();

        // 30 days of daily data
        assert!(is_active(&weekly, 29.0, 1.0));
        assert!(!is_active(&yearly, 29.0, 1.0));

        // Too short for two weeks
        assert!(!is_active(&weekly, 10.0, 1.0));

        // Weekly sampling cannot resolve a weekly cycle
        assert!(!is_active(&weekly, 700.0, 7.0));

        // Three years of daily data
        assert!(is_active(&yearly, 1095.0, 1.0));
    }

    #[test]
    fn test_always_activation() {
        let monthly = SeasonalityConfig::new("monthly", 30.5, 5);
        assert!(is_active(&monthly, 3.0, 1.0));
    }

    fn normalized(dates: impl IntoIterator<Item = NaiveDate>) -> NormalizedSeries {
        let series = TimeSeries::from_pairs(dates.into_iter().map(|d| (d, 1.0)));
        normalize(&series).unwrap()
    }

    fn daily(n: u64) -> NormalizedSeries {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        normalized((0..n).map(|i| start + Days::new(i)))
    }

    fn weekdays(n: usize) -> NormalizedSeries {
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        normalized(
            (0..)
                .map(|i| start + Days::new(i))
                .filter(|d| d.weekday().number_from_monday() <= 5)
                .take(n),
        )
    }

    #[test]
    fn test_select_active_keeps_order() {
        let configs = vec![
            SeasonalityConfig::weekly(),
            SeasonalityConfig::yearly(),
            SeasonalityConfig::new("monthly", 30.5, 5),
        ];
        let active = select_active(&configs, &daily(101));
        let names: Vec<&str> = active.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["weekly", "monthly"]);
        assert_eq!(active[0].fourier_order, 3);
        assert_eq!(active[1].fourier_order, 5);
    }

    #[test]
    fn test_distinct_phases() {
        let daily: Vec<f64> = (0..30).map(|i| i as f64).collect();
        assert_eq!(distinct_phases(&daily, 7.0), 7);

        // Mon..Fri of four weeks
        let weekdays: Vec<f64> = (0..28).filter(|d| d % 7 < 5).map(|d| d as f64).collect();
        assert_eq!(distinct_phases(&weekdays, 7.0), 5);
        assert_eq!(max_identifiable_order(&weekdays, 7.0), 2);

        // Fractional period: offsets 0 and 365.25 share a phase
        assert_eq!(distinct_phases(&[0.0, 365.25, 730.5], 365.25), 1);
        assert_eq!(max_identifiable_order(&[0.0, 7.0, 14.0], 7.0), 0);

        // Every sample on its own phase: one phase is left for the slope
        let spread = [0.0, 4.0, 8.0, 12.0, 16.0];
        assert_eq!(distinct_phases(&spread, 7.0), 5);
        assert_eq!(max_identifiable_order(&spread, 7.0), 1);
    }

    #[test]
    fn test_weekday_data_caps_weekly_order() {
        let active = select_active(&[SeasonalityConfig::weekly()], &weekdays(120));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].fourier_order, 2);
    }

    #[test]
    fn test_unidentifiable_always_component_is_dropped() {
        // Every other day over a 2-day period: a single phase
        let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let series = normalized((0..40).map(|i| start + Days::new(2 * i)));
        let configs = vec![SeasonalityConfig::new("alternate", 2.0, 1)];
        assert!(select_active(&configs, &series).is_empty());
    }

    #[test]
    fn test_evaluate_component() {
        let weekly = SeasonalityConfig::new("weekly", 7.0, 1);
        // 2 * sin + 0.5 * cos at t = 0 -> 0.5
        assert_abs_diff_eq!(evaluate(0.0, &weekly, &[2.0, 0.5]), 0.5, epsilon = 1e-12);
    }
}
