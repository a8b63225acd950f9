//! Stable structural identity for incident definitions.

use crate::types::{DefinitionId, IncidentDefinition};

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Compute a definition's structural id.
///
/// Hashes the ordered window list field by field with blake3: formatted
/// bounds, target column, and the IEEE-754 bit patterns of proportion and
/// intensity. Equal ordered windows give equal ids however the definition
/// was constructed; window sequence order is significant because windows on
/// the same column compose sequentially.
pub fn compute(definition: &IncidentDefinition) -> DefinitionId {
  let mut hasher = blake3::Hasher::new();
  for window in &definition.windows {
    hasher.update(window.from.format(TIME_FORMAT).to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(window.until.format(TIME_FORMAT).to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(window.column.as_bytes());
    hasher.update(b"|");
    hasher.update(&window.proportion.to_bits().to_le_bytes());
    hasher.update(&window.intensity.to_bits().to_le_bytes());
    hasher.update(b";");
  }
  let hex = hasher.finalize().to_hex();
  // First 16 bytes (32 hex chars) for a compact but collision-resistant id.
  DefinitionId(hex[..32].to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::Config;
  use crate::normalize;
  use crate::types::RawWindow;

  fn raw(from: &str, until: &str, column: &str, p: f64, k: f64) -> RawWindow {
    RawWindow {
      from: from.into(),
      until: until.into(),
      column: column.into(),
      proportion: p,
      intensity: k,
    }
  }

  fn definition(windows: &[RawWindow]) -> IncidentDefinition {
    normalize::normalize(windows, &Config::default()).unwrap()
  }

  #[test]
  fn independently_built_equal_definitions_share_an_id() {
    let a = definition(&[raw(
      "10:00:00 15-01-2025",
      "12:00:00 15-01-2025",
      "bpsRcv",
      0.5,
      2.0,
    )]);
    let b = definition(&[raw(
      "10:00:00 15-01-2025",
      "12:00:00 15-01-2025",
      "bpsRcv",
      0.5,
      2.0,
    )]);
    assert_eq!(compute(&a), compute(&b));
  }

  #[test]
  fn json_key_order_does_not_matter() {
    let a: Vec<RawWindow> = serde_json::from_str(
      r#"[{"from":"10:00:00 15-01-2025","until":"12:00:00 15-01-2025","column":"bpsRcv","proportion":0.5,"intensity":2.0}]"#,
    )
    .unwrap();
    let b: Vec<RawWindow> = serde_json::from_str(
      r#"[{"intensity":2.0,"column":"bpsRcv","proportion":0.5,"until":"12:00:00 15-01-2025","from":"10:00:00 15-01-2025"}]"#,
    )
    .unwrap();
    let config = Config::default();
    assert_eq!(
      compute(&normalize::normalize(&a, &config).unwrap()),
      compute(&normalize::normalize(&b, &config).unwrap())
    );
  }

  #[test]
  fn window_order_is_significant() {
    let w1 = raw("10:00:00 15-01-2025", "12:00:00 15-01-2025", "bpsRcv", 1.0, 0.0);
    let w2 = raw("10:00:00 15-01-2025", "12:00:00 15-01-2025", "bpsRcv", 1.0, 2.0);
    let ab = definition(&[w1.clone(), w2.clone()]);
    let ba = definition(&[w2, w1]);
    assert_ne!(compute(&ab), compute(&ba));
  }

  #[test]
  fn any_field_change_changes_the_id() {
    let base = raw("10:00:00 15-01-2025", "12:00:00 15-01-2025", "bpsRcv", 0.5, 2.0);
    let id = compute(&definition(&[base.clone()]));

    let mut other = base.clone();
    other.column = "bpsSent".into();
    assert_ne!(id, compute(&definition(&[other])));

    let mut other = base.clone();
    other.proportion = 0.25;
    assert_ne!(id, compute(&definition(&[other])));

    let mut other = base;
    other.until = "12:00:01 15-01-2025".into();
    assert_ne!(id, compute(&definition(&[other])));
  }

  #[test]
  fn id_is_32_hex_chars() {
    let id = compute(&definition(&[raw(
      "10:00:00 15-01-2025",
      "12:00:00 15-01-2025",
      "bpsRcv",
      0.5,
      2.0,
    )]));
    assert_eq!(id.0.len(), 32);
    assert!(id.0.chars().all(|c| c.is_ascii_hexdigit()));
  }
}
