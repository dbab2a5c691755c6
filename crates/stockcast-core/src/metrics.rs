//! In-sample fit diagnostics.
//!
//! - **MAE**: mean absolute residual, in price units
//! - **RMSE**: root mean squared residual, in price units
//! - **MAPE**: mean absolute percentage residual (undefined if any actual is 0)
//! - **Residual std**: spread used to size the forecast uncertainty band

use crate::error::{ForecastError, Result};
use crate::fit::FittedModel;

/// Calculates Mean Absolute Error.
///
/// MAE = (1/n) * Σ|actual_i - fitted_i|
pub fn mae(actual: &[f64], fitted: &[f64]) -> Result<f64> {
    validate_inputs(actual, fitted)?;
    let sum: f64 = actual
        .iter()
        .zip(fitted)
        .map(|(a, f)| (a - f).abs())
        .sum();
    Ok(sum / actual.len() as f64)
}

/// Calculates Root Mean Squared Error.
pub fn rmse(actual: &[f64], fitted: &[f64]) -> Result<f64> {
    validate_inputs(actual, fitted)?;
    let sum: f64 = actual
        .iter()
        .zip(fitted)
        .map(|(a, f)| (a - f).powi(2))
        .sum();
    Ok((sum / actual.len() as f64).sqrt())
}

/// Calculates Mean Absolute Percentage Error, as a percentage.
///
/// Returns `None` if any actual value is zero.
pub fn mape(actual: &[f64], fitted: &[f64]) -> Result<Option<f64>> {
    validate_inputs(actual, fitted)?;
    if actual.iter().any(|&a| a == 0.0) {
        return Ok(None);
    }
    let sum: f64 = actual
        .iter()
        .zip(fitted)
        .map(|(a, f)| ((a - f) / a).abs())
        .sum();
    Ok(Some(100.0 * sum / actual.len() as f64))
}

fn validate_inputs(actual: &[f64], fitted: &[f64]) -> Result<()> {
    if actual.len() != fitted.len() {
        return Err(ForecastError::InvalidInput(format!(
            "Actual and fitted arrays must have the same length: {} vs {}",
            actual.len(),
            fitted.len()
        )));
    }
    if actual.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    Ok(())
}

/// Summary of how well a model reproduces its own history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitDiagnostics {
    pub n_obs: usize,
    pub mae: f64,
    pub rmse: f64,
    pub mape: Option<f64>,
    pub residual_std: f64,
}

impl FitDiagnostics {
    pub fn from_model(model: &FittedModel) -> Result<Self> {
        let actual = model.history_values();
        let fitted = model.fitted_values();

        Ok(Self {
            n_obs: actual.len(),
            mae: mae(actual, fitted)?,
            rmse: rmse(actual, fitted)?,
            mape: mape(actual, fitted)?,
            residual_std: model.residual_std(),
        })
    }
}
