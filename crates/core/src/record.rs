//! Medication records and their frequency descriptors.
//!
//! A [`MedicationRecord`] is created in one step by the parser (name, dosage,
//! descriptor) and enriched with resolved `times` before callers ever see it.
//! Callers own the resulting sequence; the only sanctioned mutation afterwards
//! is [`toggle_taken`].

use medminder_types::{ClockTime, NonEmptyText};
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// How often a medication should be taken, before resolution into clock times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum FrequencyDescriptor {
    /// A literal clock time lifted from the text ("at 09:00 AM").
    ExplicitTime(ClockTime),
    /// "every n hours", repeating from the moment of parsing across one day.
    ///
    /// Values of zero or below are kept as parsed and treated as "no
    /// interval" by the resolver.
    IntervalHours(i64),
    /// No recognisable frequency language.
    Unspecified,
    /// A recognised but unresolved token such as "once" or "daily".
    RawToken(String),
}

impl std::fmt::Display for FrequencyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExplicitTime(time) => write!(f, "at {time}"),
            Self::IntervalHours(hours) => write!(f, "every {hours} hours"),
            Self::Unspecified => write!(f, "unspecified"),
            Self::RawToken(token) => write!(f, "{token}"),
        }
    }
}

/// One parsed medication instruction with its resolved daily schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationRecord {
    /// Medication name as it appeared in the text, trimmed.
    pub name: NonEmptyText,
    /// Dosage display text, e.g. "500 mg" or "2 tablets".
    pub dosage: NonEmptyText,
    /// The unresolved frequency the schedule was derived from.
    pub frequency: FrequencyDescriptor,
    /// Resolved times of day, in dose order; never empty once resolved.
    pub times: Vec<ClockTime>,
    /// Whether the patient has marked this dose as taken.
    #[serde(default)]
    pub taken: bool,
}

/// Flips the `taken` flag of the record at `index`, in place.
///
/// # Returns
///
/// The flag's new value.
///
/// # Errors
///
/// Returns `CoreError::RecordIndexOutOfRange` when `index` does not name a
/// record in the slice.
pub fn toggle_taken(records: &mut [MedicationRecord], index: usize) -> CoreResult<bool> {
    let record = records
        .get_mut(index)
        .ok_or(CoreError::RecordIndexOutOfRange(index))?;
    record.taken = !record.taken;
    Ok(record.taken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(name: &str) -> MedicationRecord {
        MedicationRecord {
            name: NonEmptyText::new(name).expect("valid name"),
            dosage: NonEmptyText::new("500 mg").expect("valid dosage"),
            frequency: FrequencyDescriptor::IntervalHours(8),
            times: vec![
                ClockTime::new(8, 0).expect("valid time"),
                ClockTime::new(16, 0).expect("valid time"),
                ClockTime::new(0, 0).expect("valid time"),
            ],
            taken: false,
        }
    }

    #[test]
    fn test_toggle_taken_flips_only_the_flag() {
        let mut records = vec![sample_record("Amoxicillin"), sample_record("Aspirin")];
        let before = records.clone();

        let now_taken = toggle_taken(&mut records, 1).expect("index in range");
        assert!(now_taken);
        assert!(records[1].taken);
        assert_eq!(records[0], before[0]);
        assert_eq!(records[1].name, before[1].name);
        assert_eq!(records[1].dosage, before[1].dosage);
        assert_eq!(records[1].times, before[1].times);
    }

    #[test]
    fn test_toggle_taken_twice_restores_original_state() {
        let mut records = vec![sample_record("Amoxicillin")];
        let before = records.clone();

        toggle_taken(&mut records, 0).expect("index in range");
        toggle_taken(&mut records, 0).expect("index in range");
        assert_eq!(records, before);
    }

    #[test]
    fn test_toggle_taken_rejects_out_of_range_index() {
        let mut records = vec![sample_record("Amoxicillin")];
        let result = toggle_taken(&mut records, 3);
        assert!(matches!(result, Err(CoreError::RecordIndexOutOfRange(3))));
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let record = sample_record("Vitamin D");
        let json = serde_json::to_string(&record).expect("should serialize");
        let back: MedicationRecord = serde_json::from_str(&json).expect("should deserialize");
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_deserialize_defaults_taken_to_false() {
        let json = r#"{
            "name": "Aspirin",
            "dosage": "100 mg",
            "frequency": { "kind": "Unspecified" },
            "times": ["08:00 AM"]
        }"#;
        let record: MedicationRecord = serde_json::from_str(json).expect("should deserialize");
        assert!(!record.taken);
    }

    #[test]
    fn test_descriptor_labels_read_naturally() {
        let time = ClockTime::new(21, 30).expect("valid time");
        assert_eq!(
            FrequencyDescriptor::ExplicitTime(time).to_string(),
            "at 09:30 PM"
        );
        assert_eq!(
            FrequencyDescriptor::IntervalHours(8).to_string(),
            "every 8 hours"
        );
        assert_eq!(FrequencyDescriptor::Unspecified.to_string(), "unspecified");
        assert_eq!(
            FrequencyDescriptor::RawToken("daily".into()).to_string(),
            "daily"
        );
    }
}
