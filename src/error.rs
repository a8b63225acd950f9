//! Structured error types for the incidence engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("validation: {field}: {reason}")]
  Validation { field: String, reason: String },

  #[error("column not found: {column}")]
  ColumnNotFound { column: String },

  #[error("csv: line {line}: {reason}")]
  Csv { line: usize, reason: String },

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),
}

impl EngineError {
  pub fn validation(field: &str, reason: &str) -> Self {
    Self::Validation {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn csv(line: usize, reason: impl Into<String>) -> Self {
    Self::Csv {
      line,
      reason: reason.into(),
    }
  }
}
