//! CSV loading and writing for metric tables.
//!
//! The reader needs the configured entity and timestamp columns, drops the
//! configured trim list, and parses everything else as a numeric metric
//! column. An incidence column, when present, reloads as the boolean flag so
//! cached artifacts round-trip.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime};

use crate::config::Config;
use crate::error::EngineError;
use crate::types::{MetricRecord, MetricTable};

/// Derives a record's calendar time from its raw timestamp column. Source
/// data that encodes time differently swaps this function out at load time.
pub type TimeResolver = fn(i64) -> Option<NaiveDateTime>;

/// Default resolver: epoch milliseconds to naive UTC calendar time.
pub fn epoch_millis(ms: i64) -> Option<NaiveDateTime> {
  DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

/// Read a metrics table from CSV with an explicit time resolver.
pub fn read_csv<R: BufRead>(
  reader: R,
  config: &Config,
  resolver: TimeResolver,
) -> Result<MetricTable, EngineError> {
  let mut lines = reader.lines();
  let header_line = match lines.next() {
    Some(line) => line?,
    None => return Err(EngineError::csv(1, "empty input")),
  };
  let header: Vec<&str> = header_line.split(',').map(|s| s.trim()).collect();

  let mut entity_index = None;
  let mut time_index = None;
  let mut incidence_index = None;
  let mut metrics: Vec<(usize, String)> = Vec::new();
  for (i, name) in header.iter().enumerate() {
    if *name == config.entity_column {
      entity_index = Some(i);
    } else if *name == config.time_column {
      time_index = Some(i);
    } else if *name == config.incidence_column {
      incidence_index = Some(i);
    } else if config.drop_columns.iter().any(|c| c == name) {
      // Trimmed at load time.
    } else {
      metrics.push((i, name.to_string()));
    }
  }
  let entity_index = entity_index.ok_or_else(|| EngineError::ColumnNotFound {
    column: config.entity_column.clone(),
  })?;
  let time_index = time_index.ok_or_else(|| EngineError::ColumnNotFound {
    column: config.time_column.clone(),
  })?;

  let mut rows = Vec::new();
  for (offset, line) in lines.enumerate() {
    let line_no = offset + 2;
    let line = line?;
    if line.trim().is_empty() {
      continue;
    }
    let fields: Vec<&str> = line.split(',').map(|s| s.trim()).collect();
    if fields.len() != header.len() {
      return Err(EngineError::csv(
        line_no,
        format!("expected {} fields, got {}", header.len(), fields.len()),
      ));
    }

    let timestamp_ms: i64 = fields[time_index].parse().map_err(|e| {
      EngineError::csv(line_no, format!("{}: {}", config.time_column, e))
    })?;
    let time = resolver(timestamp_ms).ok_or_else(|| {
      EngineError::csv(
        line_no,
        format!("{}: timestamp {} out of range", config.time_column, timestamp_ms),
      )
    })?;
    let incidence = match incidence_index {
      Some(i) => parse_bool(fields[i]).ok_or_else(|| {
        EngineError::csv(
          line_no,
          format!("{}: expected a boolean, got {:?}", config.incidence_column, fields[i]),
        )
      })?,
      None => false,
    };

    let mut values = Vec::with_capacity(metrics.len());
    for (i, name) in &metrics {
      let v: f64 = fields[*i]
        .parse()
        .map_err(|e| EngineError::csv(line_no, format!("{}: {}", name, e)))?;
      values.push(v);
    }

    rows.push(MetricRecord {
      entity: fields[entity_index].to_string(),
      timestamp_ms,
      time,
      values,
      incidence,
    });
  }

  Ok(MetricTable {
    metric_columns: metrics.into_iter().map(|(_, name)| name).collect(),
    rows,
  })
}

/// Load a table from a CSV file with the default epoch-millis resolver.
pub fn load_table(path: &Path, config: &Config) -> Result<MetricTable, EngineError> {
  let file = File::open(path)?;
  read_csv(BufReader::new(file), config, epoch_millis)
}

/// Write a table as CSV: entity, timestamp, metric columns, incidence flag.
pub fn write_csv<W: Write>(
  table: &MetricTable,
  config: &Config,
  w: &mut W,
) -> Result<(), EngineError> {
  write!(w, "{},{}", config.entity_column, config.time_column)?;
  for column in &table.metric_columns {
    write!(w, ",{}", column)?;
  }
  writeln!(w, ",{}", config.incidence_column)?;

  for row in &table.rows {
    write!(w, "{},{}", row.entity, row.timestamp_ms)?;
    for v in &row.values {
      write!(w, ",{}", v)?;
    }
    writeln!(w, ",{}", row.incidence)?;
  }
  Ok(())
}

/// Write a table to a CSV file.
pub fn save_table(table: &MetricTable, path: &Path, config: &Config) -> Result<(), EngineError> {
  let file = File::create(path)?;
  let mut w = BufWriter::new(file);
  write_csv(table, config, &mut w)?;
  w.flush()?;
  Ok(())
}

fn parse_bool(s: &str) -> Option<bool> {
  match s.to_ascii_lowercase().as_str() {
    "true" | "1" => Some(true),
    "false" | "0" => Some(false),
    _ => None,
  }
}
