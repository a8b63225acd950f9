//! Match records against definition windows by derived timestamp.
//!
//! Windows are plain data with explicit bounds, evaluated by stateless
//! functions; containment is inclusive on both ends.

use crate::types::{IncidentDefinition, IncidentWindow, MetricRecord};

/// Every window containing the record's timestamp, in definition order.
pub fn matches<'a>(
  record: &MetricRecord,
  definition: &'a IncidentDefinition,
) -> Vec<&'a IncidentWindow> {
  definition
    .windows
    .iter()
    .filter(|w| w.contains(record.time))
    .collect()
}

/// Does any window contain the record's timestamp? Fast existence check.
pub fn has_match(record: &MetricRecord, definition: &IncidentDefinition) -> bool {
  definition.windows.iter().any(|w| w.contains(record.time))
}
