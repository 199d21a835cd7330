//! Numeric request fields that may arrive as JSON numbers or numeric strings.

use nurseshift_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// A JSON number or a string holding one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for NumericInput {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl NumericInput {
    fn to_finite(&self, field: &str) -> AppResult<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| AppError::Validation(format!("{field} must be a number")))?,
        };

        if !value.is_finite() {
            return Err(AppError::Validation(format!("{field} must be a finite number")));
        }
        Ok(value)
    }

    /// Parse as a float `>= 0`.
    pub fn non_negative_f64(&self, field: &str) -> AppResult<f64> {
        let value = self.to_finite(field)?;
        if value < 0.0 {
            return Err(AppError::Validation(format!("{field} must not be negative")));
        }
        Ok(value)
    }

    /// Parse as a float `> 0`.
    pub fn positive_f64(&self, field: &str) -> AppResult<f64> {
        let value = self.to_finite(field)?;
        if value <= 0.0 {
            return Err(AppError::Validation(format!("{field} must be greater than 0")));
        }
        Ok(value)
    }

    /// Parse as a whole number `>= 0` that fits in an `i32`.
    pub fn non_negative_i32(&self, field: &str) -> AppResult<i32> {
        let value = self.non_negative_f64(field)?;
        if value.fract() != 0.0 {
            return Err(AppError::Validation(format!("{field} must be a whole number")));
        }
        if value > f64::from(i32::MAX) {
            return Err(AppError::Validation(format!("{field} is too large")));
        }
        Ok(value as i32)
    }
}
