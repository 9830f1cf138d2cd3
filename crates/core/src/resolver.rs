//! Schedule resolution.
//!
//! Maps a frequency descriptor to the concrete times of day a medication
//! should be taken. Resolution is a pure function of the descriptor, the
//! anchor moment, and the configured fallback schedule; sampling the wall
//! clock is left to the pipeline entry point so results stay reproducible.

use medminder_types::ClockTime;

use crate::config::CoreConfig;
use crate::record::FrequencyDescriptor;

/// Resolves `frequency` into an ordered, never-empty list of dose times.
///
/// An explicit time yields exactly that time. A positive hour interval
/// yields doses spaced from `anchor` across one day. Everything else,
/// including non-positive intervals, falls back to the configured
/// three-times-daily schedule.
pub fn resolve_times(
    frequency: &FrequencyDescriptor,
    anchor: ClockTime,
    config: &CoreConfig,
) -> Vec<ClockTime> {
    match frequency {
        FrequencyDescriptor::ExplicitTime(time) => vec![*time],
        FrequencyDescriptor::IntervalHours(interval) if *interval > 0 => {
            interval_times(*interval, anchor)
        }
        _ => config.default_times().to_vec(),
    }
}

/// As many doses as fit in 24 hours (integer division), spaced `interval`
/// hours apart from `anchor` and wrapping past midnight. An interval longer
/// than a day still yields the starting dose; a resolved schedule is never
/// empty.
fn interval_times(interval: i64, anchor: ClockTime) -> Vec<ClockTime> {
    let doses = (24 / interval).max(1);
    (0..doses)
        .map(|dose| anchor.add_hours(dose * interval))
        .collect()
}
