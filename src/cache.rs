//! On-disk artifact cache keyed by definition id.
//!
//! Each id owns up to two CSV artifacts: the injected table and its
//! differenced counterpart. Artifacts are immutable once stored; an
//! unreadable or corrupt artifact is treated as a miss because everything
//! is regenerable from the raw table and the definition.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::EngineError;
use crate::table;
use crate::types::{DefinitionId, MetricTable};

pub struct IncidenceCache {
  dir: PathBuf,
  config: Config,
}

impl IncidenceCache {
  /// Open a cache directory, creating it if needed.
  pub fn new(dir: impl Into<PathBuf>, config: Config) -> Result<Self, EngineError> {
    let dir = dir.into();
    std::fs::create_dir_all(&dir)?;
    Ok(Self { dir, config })
  }

  pub fn lookup_injected(&self, id: &DefinitionId) -> Option<MetricTable> {
    self.read(&self.injected_path(id))
  }

  pub fn lookup_differenced(&self, id: &DefinitionId) -> Option<MetricTable> {
    self.read(&self.differenced_path(id))
  }

  /// Store the injected artifact for an id. Storing under an id that
  /// already has one is a no-op.
  pub fn store_injected(
    &self,
    id: &DefinitionId,
    artifact: &MetricTable,
  ) -> Result<(), EngineError> {
    self.write(&self.injected_path(id), artifact)
  }

  pub fn store_differenced(
    &self,
    id: &DefinitionId,
    artifact: &MetricTable,
  ) -> Result<(), EngineError> {
    self.write(&self.differenced_path(id), artifact)
  }

  fn injected_path(&self, id: &DefinitionId) -> PathBuf {
    self.dir.join(format!("{}.csv", id.0))
  }

  fn differenced_path(&self, id: &DefinitionId) -> PathBuf {
    self.dir.join(format!("{}.dif.csv", id.0))
  }

  fn read(&self, path: &Path) -> Option<MetricTable> {
    if !path.exists() {
      return None;
    }
    table::load_table(path, &self.config).ok()
  }

  fn write(&self, path: &Path, artifact: &MetricTable) -> Result<(), EngineError> {
    if path.exists() {
      return Ok(());
    }
    table::save_table(artifact, path, &self.config)
  }
}
