//! Apply matched definition windows to a metrics table.
//!
//! Each matched window rewrites its target column as
//! `v * (1 + proportion * (intensity - 1))`; a zero base value falls back to
//! the column mean of the unmodified input so "no traffic" rows do not stay
//! permanently unperturbed. Windows apply in definition order, each seeing
//! the previous one's output.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::matcher;
use crate::types::{IncidentDefinition, MetricTable};

/// Inject a definition into a table, returning a new table with the
/// incidence flag set on every modified row. The input is never mutated.
///
/// A record's flag ends up true iff at least one matched window applied a
/// modification whose (possibly mean-substituted) base value was nonzero;
/// merely matching a window does not set it.
pub fn inject(
  table: &MetricTable,
  definition: &IncidentDefinition,
) -> Result<MetricTable, EngineError> {
  // Resolve every window column up front; a missing column is a
  // configuration mistake and must not be skipped silently.
  let mut columns: HashMap<&str, usize> = HashMap::new();
  for window in &definition.windows {
    let index = table
      .column_index(&window.column)
      .ok_or_else(|| EngineError::ColumnNotFound {
        column: window.column.clone(),
      })?;
    columns.insert(window.column.as_str(), index);
  }

  // Fallback means come from the unmodified input, computed once.
  let means: HashMap<&str, f64> = columns
    .iter()
    .map(|(column, &index)| (*column, table.column_mean(index)))
    .collect();

  let mut out = table.clone();
  for record in &mut out.rows {
    record.incidence = false;
    if !matcher::has_match(record, definition) {
      continue;
    }

    let mut modified = false;
    for window in matcher::matches(record, definition) {
      // Every window column was resolved above.
      let index = columns[window.column.as_str()];
      let mut v = record.values[index];
      if v == 0.0 {
        v = means[window.column.as_str()];
      }
      if v != 0.0 {
        record.values[index] = v * (1.0 + window.proportion * (window.intensity - 1.0));
        modified = true;
      }
    }
    record.incidence = modified;
  }
  Ok(out)
}
