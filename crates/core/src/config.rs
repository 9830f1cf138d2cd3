//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Keeping the fallback schedule and override scope here means a
//! whole parse batch always runs under one consistent policy, including in test harnesses.

use crate::{CoreError, CoreResult};
use medminder_types::ClockTime;

/// Hours (24-hour clock) of the canonical three-times-daily fallback schedule.
const DEFAULT_SCHEDULE_HOURS: [u32; 3] = [8, 12, 20];

/// Scope of the literal-time override found during parsing.
///
/// The source text is scanned for a literal clock time ("at 9:30 PM"). How far
/// that time reaches is a policy decision, not a parsing fact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExplicitTimeScope {
    /// A literal time found anywhere in the text binds every parsed record.
    #[default]
    WholeText,
    /// A literal time binds only the record whose instruction contains it.
    PerRecord,
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    default_times: Vec<ClockTime>,
    explicit_time_scope: ExplicitTimeScope,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if `default_times` is empty; an empty
    /// fallback would let a record resolve to no times at all.
    pub fn new(
        default_times: Vec<ClockTime>,
        explicit_time_scope: ExplicitTimeScope,
    ) -> CoreResult<Self> {
        if default_times.is_empty() {
            return Err(CoreError::InvalidInput(
                "default_times cannot be empty".into(),
            ));
        }

        Ok(Self {
            default_times,
            explicit_time_scope,
        })
    }

    /// The fallback schedule used when no frequency can be resolved.
    pub fn default_times(&self) -> &[ClockTime] {
        &self.default_times
    }

    pub fn explicit_time_scope(&self) -> ExplicitTimeScope {
        self.explicit_time_scope
    }
}

impl Default for CoreConfig {
    /// Canonical behaviour: 08:00 AM / 12:00 PM / 08:00 PM fallback, whole-text override.
    fn default() -> Self {
        let default_times = DEFAULT_SCHEDULE_HOURS
            .iter()
            .map(|&hour| ClockTime::new(hour, 0).expect("schedule hour is a valid hour"))
            .collect();

        Self {
            default_times,
            explicit_time_scope: ExplicitTimeScope::WholeText,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_three_times_daily_fallback() {
        let config = CoreConfig::default();
        let rendered: Vec<String> = config
            .default_times()
            .iter()
            .map(ClockTime::to_string)
            .collect();
        assert_eq!(rendered, vec!["08:00 AM", "12:00 PM", "08:00 PM"]);
        assert_eq!(config.explicit_time_scope(), ExplicitTimeScope::WholeText);
    }

    #[test]
    fn test_config_rejects_empty_fallback_schedule() {
        let result = CoreConfig::new(Vec::new(), ExplicitTimeScope::WholeText);
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_config_accepts_custom_fallback_schedule() {
        let times = vec![ClockTime::new(9, 30).expect("valid time")];
        let config =
            CoreConfig::new(times, ExplicitTimeScope::PerRecord).expect("config should build");
        assert_eq!(config.default_times().len(), 1);
        assert_eq!(config.explicit_time_scope(), ExplicitTimeScope::PerRecord);
    }
}
