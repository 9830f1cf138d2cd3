//! Durable storage for resolved schedules.
//!
//! One JSON file holds the whole record sequence. Restoring is deliberately
//! forgiving: a missing, unreadable, or corrupt file yields an empty
//! schedule instead of an error, so a damaged store never blocks a session
//! from starting.

use std::fs;
use std::path::{Path, PathBuf};

use crate::record::MedicationRecord;
use crate::{CoreError, CoreResult};

/// JSON-on-disk persistence for a medication schedule.
#[derive(Debug, Clone)]
pub struct ScheduleStore {
    path: PathBuf,
}

impl ScheduleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `records` as pretty-printed JSON, creating parent directories
    /// as needed.
    ///
    /// # Errors
    ///
    /// Returns a `CoreError` if serialization fails, the parent directory
    /// cannot be created, or the file cannot be written.
    pub fn save(&self, records: &[MedicationRecord]) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(records).map_err(CoreError::Serialization)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(CoreError::StoreDirCreation)?;
            }
        }

        fs::write(&self.path, json).map_err(CoreError::FileWrite)?;
        Ok(())
    }

    /// Restores the stored schedule, or an empty one when nothing usable
    /// exists. Unreadable or unparseable files are logged and skipped.
    pub fn load(&self) -> Vec<MedicationRecord> {
        if !self.path.is_file() {
            return Vec::new();
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("failed to read schedule file: {} - {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("failed to parse schedule file: {} - {}", self.path.display(), e);
                Vec::new()
            }
        }
    }
}
