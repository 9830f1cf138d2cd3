//! Reminder payloads derived from resolved records.
//!
//! The core decides *when* a dose is due and *what text* to announce;
//! turning a time of day into a concrete delay and firing a notification is
//! the caller's scheduler's job.

use medminder_types::ClockTime;

use crate::record::MedicationRecord;

/// One reminder to dispatch at a time of day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderEntry {
    pub time: ClockTime,
    pub message: String,
}

/// Flattens records into dispatch-ready (time, message) pairs.
///
/// Entries are record-major: all of the first record's times, then the
/// second's, preserving dose order within each record.
pub fn reminder_plan(records: &[MedicationRecord]) -> Vec<ReminderEntry> {
    records
        .iter()
        .flat_map(|record| {
            record.times.iter().map(move |time| ReminderEntry {
                time: *time,
                message: format!("Time to take {} - {}", record.name, record.dosage),
            })
        })
        .collect()
}
