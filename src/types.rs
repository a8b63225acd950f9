//! Core types for the incidence engine (JSON contracts + internal models).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what a definition file contains)
// ---------------------------------------------------------------------------

/// One raw modification window from an incidence definition file.
/// Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWindow {
  pub from: String,
  pub until: String,
  pub column: String,
  pub proportion: f64,
  pub intensity: f64,
}

// ---------------------------------------------------------------------------
// Internal validated types
// ---------------------------------------------------------------------------

/// One validated, time-resolved modification window.
///
/// Bounds are inclusive on both ends; a record whose timestamp equals
/// `from` or `until` is inside the window.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentWindow {
  pub from: NaiveDateTime,
  pub until: NaiveDateTime,
  pub column: String,
  /// Fraction of the endpoint's traffic affected, in [0, 1].
  pub proportion: f64,
  /// Multiplicative severity factor applied to the affected fraction, >= 0.
  pub intensity: f64,
}

impl IncidentWindow {
  pub fn contains(&self, time: NaiveDateTime) -> bool {
    self.from <= time && time <= self.until
  }
}

/// An ordered sequence of windows. Order is significant: windows matching
/// the same record and column apply sequentially, each seeing the previous
/// one's output.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentDefinition {
  pub windows: Vec<IncidentWindow>,
}

// ---------------------------------------------------------------------------
// Definition identity
// ---------------------------------------------------------------------------

/// A stable hex string identifying one definition structurally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefinitionId(pub String);

// ---------------------------------------------------------------------------
// Metric tables
// ---------------------------------------------------------------------------

/// One collection-interval row for one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
  pub entity: String,
  /// Raw value of the designated timestamp column.
  pub timestamp_ms: i64,
  /// Calendar time derived from `timestamp_ms` at load time.
  pub time: NaiveDateTime,
  /// One value per entry in the owning table's `metric_columns`.
  pub values: Vec<f64>,
  pub incidence: bool,
}

/// An in-memory metrics table: named numeric columns over endpoint rows.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
  pub metric_columns: Vec<String>,
  pub rows: Vec<MetricRecord>,
}

impl MetricTable {
  pub fn column_index(&self, name: &str) -> Option<usize> {
    self.metric_columns.iter().position(|c| c == name)
  }

  /// Arithmetic mean of one column over all rows (zeros included); 0.0 for
  /// an empty table.
  pub fn column_mean(&self, index: usize) -> f64 {
    if self.rows.is_empty() {
      return 0.0;
    }
    let sum: f64 = self.rows.iter().map(|r| r.values[index]).sum();
    sum / self.rows.len() as f64
  }

  /// Does any row carry the incidence flag?
  pub fn has_incidence(&self) -> bool {
    self.rows.iter().any(|r| r.incidence)
  }
}
