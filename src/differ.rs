//! Per-entity first differencing of a metrics table.
//!
//! Rows are grouped by entity and time-ordered within each group; every
//! consecutive pair emits one row of later-minus-earlier deltas. Output
//! ordering is explicit (entity ascending, then time) so results never
//! depend on incidental iteration order.

use crate::types::{MetricRecord, MetricTable};

/// Difference a table by entity. Columns named in `excluded` are copied
/// unchanged from the later record of each pair; entity, timestamp, and the
/// incidence flag are always carried from the later record. The first
/// record of each entity has no predecessor and is dropped.
pub fn differentiate(table: &MetricTable, excluded: &[String]) -> MetricTable {
  let copy_unchanged: Vec<bool> = table
    .metric_columns
    .iter()
    .map(|c| excluded.contains(c))
    .collect();

  // Deterministic ordering: entity ascending, then time. The sort is
  // stable, so equal timestamps keep their input order.
  let mut order: Vec<usize> = (0..table.rows.len()).collect();
  order.sort_by(|&a, &b| {
    let (ra, rb) = (&table.rows[a], &table.rows[b]);
    ra.entity.cmp(&rb.entity).then(ra.time.cmp(&rb.time))
  });

  let mut rows = Vec::new();
  let mut prev: Option<&MetricRecord> = None;
  for &i in &order {
    let row = &table.rows[i];
    if let Some(earlier) = prev {
      if earlier.entity == row.entity {
        let values = row
          .values
          .iter()
          .zip(&earlier.values)
          .zip(&copy_unchanged)
          .map(|((later, earlier), copy)| if *copy { *later } else { later - earlier })
          .collect();
        rows.push(MetricRecord {
          entity: row.entity.clone(),
          timestamp_ms: row.timestamp_ms,
          time: row.time,
          values,
          incidence: row.incidence,
        });
      }
    }
    prev = Some(row);
  }

  MetricTable {
    metric_columns: table.metric_columns.clone(),
    rows,
  }
}
