//! # Medminder Core
//!
//! Core logic for turning free-form prescription text into a daily
//! medication schedule:
//! - Instruction parsing: dosage anchors, name phrases, and the optional
//!   frequency fields after them
//! - Schedule resolution: frequency descriptors into concrete clock times
//! - Record operations, reminder payloads, and JSON persistence
//!
//! **No I/O surfaces**: document loading belongs to `medminder_extract` and
//! user interaction to `medminder-cli`. This crate consumes text and
//! produces plain data.

pub mod config;
mod error;
mod parser;
pub mod record;
pub mod reminder;
mod resolver;
pub mod store;

pub use config::{CoreConfig, ExplicitTimeScope};
pub use error::{CoreError, CoreResult};
pub use record::{toggle_taken, FrequencyDescriptor, MedicationRecord};
pub use reminder::{reminder_plan, ReminderEntry};
pub use store::ScheduleStore;

use std::sync::Arc;

use medminder_types::ClockTime;

use parser::Scanner;

/// Parsing and schedule resolution over a shared configuration.
///
/// Holds compiled scanning patterns, so callers should build one and reuse
/// it for a session rather than constructing one per parse.
#[derive(Debug)]
pub struct PrescriptionService {
    config: Arc<CoreConfig>,
    scanner: Scanner,
}

impl PrescriptionService {
    /// Creates a new service over `config`.
    pub fn new(config: Arc<CoreConfig>) -> Self {
        Self {
            config,
            scanner: Scanner::new(),
        }
    }

    /// Parses `text` and resolves every record against the current wall
    /// clock. Convenience wrapper over [`Self::parse_text_at`].
    pub fn parse_text(&self, text: &str) -> Vec<MedicationRecord> {
        let now = ClockTime::from_naive(chrono::Local::now().time());
        self.parse_text_at(text, now)
    }

    /// Parses `text` into fully resolved medication records.
    ///
    /// # Arguments
    ///
    /// * `text` - Raw prescription text, any length, any number of
    ///   instructions
    /// * `anchor` - The moment interval schedules count from; pass a fixed
    ///   value for reproducible results
    ///
    /// # Returns
    ///
    /// Records in order of first appearance. Text with no recognisable
    /// instructions yields an empty vector, never an error. Under the
    /// whole-text override scope, a literal clock time found anywhere in
    /// `text` rewrites every record's frequency to that explicit time.
    pub fn parse_text_at(&self, text: &str, anchor: ClockTime) -> Vec<MedicationRecord> {
        let explicit = self.scanner.find_explicit_time(text);
        let instructions = self.scanner.scan(text);

        instructions
            .into_iter()
            .map(|instruction| {
                let frequency = match (self.config.explicit_time_scope(), explicit) {
                    (ExplicitTimeScope::WholeText, Some(time)) => {
                        FrequencyDescriptor::ExplicitTime(time)
                    }
                    _ => instruction.frequency,
                };
                let times = resolver::resolve_times(&frequency, anchor, &self.config);
                MedicationRecord {
                    name: instruction.name,
                    dosage: instruction.dosage,
                    frequency,
                    times,
                    taken: false,
                }
            })
            .collect()
    }
}
