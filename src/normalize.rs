//! Normalize raw definition windows into validated IncidentDefinition models.

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::config::Config;
use crate::error::EngineError;
use crate::types::{IncidentDefinition, IncidentWindow, RawWindow};

/// Parse and validate raw windows into a definition.
///
/// Window order is preserved; it is part of the definition's identity.
pub fn normalize(raw: &[RawWindow], config: &Config) -> Result<IncidentDefinition, EngineError> {
  let mut windows = Vec::with_capacity(raw.len());
  for (i, w) in raw.iter().enumerate() {
    let from = parse_time(&w.from, &config.time_format, i, "from")?;
    let until = parse_time(&w.until, &config.time_format, i, "until")?;

    if from > until {
      return Err(EngineError::validation(
        &format!("windows[{}].from", i),
        "start time is after end time",
      ));
    }
    if w.column.is_empty() {
      return Err(EngineError::validation(
        &format!("windows[{}].column", i),
        "must not be empty",
      ));
    }
    if !(0.0..=1.0).contains(&w.proportion) {
      return Err(EngineError::validation(
        &format!("windows[{}].proportion", i),
        "must be within [0, 1]",
      ));
    }
    if w.intensity < 0.0 || w.intensity.is_nan() {
      return Err(EngineError::validation(
        &format!("windows[{}].intensity", i),
        "must be >= 0",
      ));
    }

    windows.push(IncidentWindow {
      from,
      until,
      column: w.column.clone(),
      proportion: w.proportion,
      intensity: w.intensity,
    });
  }
  Ok(IncidentDefinition { windows })
}

/// Load a definition file: a JSON array of raw windows.
///
/// Malformed JSON or an invalid window is a fatal load-time error.
pub fn load_definition(path: &Path, config: &Config) -> Result<IncidentDefinition, EngineError> {
  let contents = fs::read_to_string(path)?;
  let raw: Vec<RawWindow> = serde_json::from_str(&contents)?;
  normalize(&raw, config)
}

fn parse_time(
  s: &str,
  format: &str,
  index: usize,
  field: &str,
) -> Result<NaiveDateTime, EngineError> {
  NaiveDateTime::parse_from_str(s, format).map_err(|e| {
    EngineError::validation(
      &format!("windows[{}].{}", index, field),
      &format!("invalid time {:?}: {}", s, e),
    )
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw(from: &str, until: &str, proportion: f64, intensity: f64) -> RawWindow {
    RawWindow {
      from: from.into(),
      until: until.into(),
      column: "bpsRcv".into(),
      proportion,
      intensity,
    }
  }

  #[test]
  fn valid_window_parses() {
    let config = Config::default();
    let def = normalize(
      &[raw("10:00:00 15-01-2025", "12:30:00 15-01-2025", 0.5, 2.0)],
      &config,
    )
    .unwrap();
    assert_eq!(def.windows.len(), 1);
    assert_eq!(def.windows[0].column, "bpsRcv");
    assert!(def.windows[0].from < def.windows[0].until);
  }

  #[test]
  fn bad_time_format_names_the_field() {
    let config = Config::default();
    let err = normalize(
      &[raw("2025-01-15T10:00:00", "12:30:00 15-01-2025", 0.5, 2.0)],
      &config,
    )
    .unwrap_err();
    assert!(err.to_string().contains("windows[0].from"));
  }

  #[test]
  fn start_after_end_rejected() {
    let config = Config::default();
    let err = normalize(
      &[raw("13:00:00 15-01-2025", "12:00:00 15-01-2025", 0.5, 2.0)],
      &config,
    )
    .unwrap_err();
    assert!(err.to_string().contains("after end"));
  }

  #[test]
  fn proportion_outside_unit_interval_rejected() {
    let config = Config::default();
    for p in [-0.1, 1.1, f64::NAN] {
      let err = normalize(
        &[raw("10:00:00 15-01-2025", "12:00:00 15-01-2025", p, 2.0)],
        &config,
      )
      .unwrap_err();
      assert!(err.to_string().contains("proportion"), "p={}: {}", p, err);
    }
  }

  #[test]
  fn negative_intensity_rejected() {
    let config = Config::default();
    for k in [-1.0, f64::NAN] {
      let err = normalize(
        &[raw("10:00:00 15-01-2025", "12:00:00 15-01-2025", 0.5, k)],
        &config,
      )
      .unwrap_err();
      assert!(err.to_string().contains("intensity"), "k={}: {}", k, err);
    }
  }

  #[test]
  fn empty_column_rejected() {
    let config = Config::default();
    let mut w = raw("10:00:00 15-01-2025", "12:00:00 15-01-2025", 0.5, 2.0);
    w.column = String::new();
    let err = normalize(&[w], &config).unwrap_err();
    assert!(err.to_string().contains("column"));
  }

  #[test]
  fn unknown_json_fields_are_ignored() {
    let json = r#"[{
      "from": "10:00:00 15-01-2025",
      "until": "12:00:00 15-01-2025",
      "column": "bpsRcv",
      "proportion": 1.0,
      "intensity": 0.5,
      "comment": "ignored"
    }]"#;
    let raw: Vec<RawWindow> = serde_json::from_str(json).unwrap();
    let def = normalize(&raw, &Config::default()).unwrap();
    assert_eq!(def.windows.len(), 1);
  }
}
