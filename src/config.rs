//! Pipeline configuration with the collector's column conventions as defaults.

/// Column conventions and parsing settings for the injection pipeline.
#[derive(Debug, Clone)]
pub struct Config {
  /// Format of the `from`/`until` strings in incidence definition files.
  pub time_format: String,
  /// Column holding the endpoint identifier.
  pub entity_column: String,
  /// Column holding the record timestamp (integer epoch milliseconds).
  pub time_column: String,
  /// Name of the boolean flag column added by injection.
  pub incidence_column: String,
  /// Columns dropped from a table at load time (non-numeric or non-useful).
  pub drop_columns: Vec<String>,
  /// Metric columns copied unchanged (not differenced) by the differencer.
  pub no_diff_columns: Vec<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      time_format: "%H:%M:%S %d-%m-%Y".to_string(),
      entity_column: "targetIP".to_string(),
      time_column: "tref_start".to_string(),
      incidence_column: "incidence".to_string(),
      drop_columns: [
        "proto",
        "label",
        "Unnamed: 0",
        "dupAckPerc",
        "fallPerc",
        "Unnamed: 0.1",
        "noRespClientPerc",
        "noRespServerPerc",
        "numberCnxPerc",
        "resetClientPerc",
        "resetServerPerc",
        "rttPerCnxPerc",
        "rtxPerc",
        "synPerc",
        "ttl1Perc",
        "win0Perc",
        "metric",
      ]
      .iter()
      .map(|s| s.to_string())
      .collect(),
      no_diff_columns: vec!["hour".to_string(), "wday".to_string()],
    }
  }
}
