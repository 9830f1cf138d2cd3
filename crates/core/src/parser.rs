//! Instruction parsing.
//!
//! Free-form prescription text is scanned for dosage anchors (an amount with
//! a recognised unit, e.g. "500 mg"). The medication name is the run of name
//! characters immediately before the anchor on the same line, and the
//! optional fields after it (quantity restatement, frequency keyword,
//! interval, period qualifier) are consumed token by token rather than with
//! one monolithic pattern, so each "field absent" case is an explicit branch.

use medminder_types::{ClockTime, NonEmptyText};
use regex::Regex;

use crate::record::FrequencyDescriptor;

/// Units that make a number a dosage anchor.
const ANCHOR_PATTERN: &str = r"(?i)\d+\s*(?:mg|ml|mcg|units|tablets?)\b";

/// Literal "at H:MM AM/PM". Deliberately case-sensitive: the meridiem must
/// be uppercase for the whole-text override, unlike instruction matching.
const LITERAL_TIME_PATTERN: &str = r"at (\d{1,2}:\d{2} (?:AM|PM))";

/// Units accepted in a quantity restatement ("take 2 tablets").
const RESTATEMENT_UNITS: &[&str] = &["tablets", "tablet", "units", "unit", "ml"];

const FREQUENCY_KEYWORDS: &[&str] = &["every", "once", "daily", "at"];

const PERIOD_QUALIFIERS: &[&str] = &["hours", "days", "am", "pm", "morning", "night"];

/// A medication instruction as parsed, before schedule resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInstruction {
    pub name: NonEmptyText,
    pub dosage: NonEmptyText,
    pub frequency: FrequencyDescriptor,
}

/// Compiled scanning patterns, built once per service.
#[derive(Debug)]
pub struct Scanner {
    dosage_anchor: Regex,
    literal_time: Regex,
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            dosage_anchor: Regex::new(ANCHOR_PATTERN).expect("anchor pattern is valid"),
            literal_time: Regex::new(LITERAL_TIME_PATTERN).expect("time pattern is valid"),
        }
    }

    /// Returns the first literal clock time in `text`, if any.
    ///
    /// This scans the whole input, not individual instructions; a time found
    /// here can override the frequency of every parsed record. A time whose
    /// hour falls outside the 12-hour clock is treated as absent.
    pub fn find_explicit_time(&self, text: &str) -> Option<ClockTime> {
        let captures = self.literal_time.captures(text)?;
        ClockTime::parse(&captures[1]).ok()
    }

    /// Scans `text` for medication instructions, in order of appearance.
    ///
    /// Unmatched text yields fewer or zero instructions; there is no error
    /// case. An anchor with no name phrase before it is skipped entirely.
    pub fn scan(&self, text: &str) -> Vec<ParsedInstruction> {
        let mut instructions = Vec::new();
        let mut floor = 0;

        while let Some(anchor) = self.dosage_anchor.find_at(text, floor) {
            let Some(name) = name_before(text, anchor.start(), floor) else {
                floor = anchor.end();
                continue;
            };

            let mut cursor = TokenCursor::new(text, anchor.end());
            let tail = parse_tail(&mut cursor);

            let dosage = match &tail.restatement {
                Some(restatement) => restatement.clone(),
                None => anchor.as_str().trim().to_owned(),
            };

            instructions.push(ParsedInstruction {
                name: NonEmptyText::new(name).expect("name run is non-empty"),
                dosage: NonEmptyText::new(&dosage).expect("dosage text is non-empty"),
                frequency: derive_descriptor(&tail),
            });

            floor = cursor.pos;
        }

        tracing::debug!("scanned {} medication instructions", instructions.len());
        instructions
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// The optional fields that may follow a dosage anchor.
struct TailFields<'a> {
    /// Rebuilt "quantity unit" text; present only when both tokens appeared.
    restatement: Option<String>,
    keyword: Option<&'a str>,
    interval: Option<i64>,
    qualifier: Option<String>,
    /// A literal time inside this instruction's own tail.
    local_time: Option<ClockTime>,
}

/// Consumes the optional field groups following a dosage anchor, in order:
/// quantity restatement, frequency keyword, numeric interval, period
/// qualifier. Each group is independent; nothing is required.
fn parse_tail<'a>(cursor: &mut TokenCursor<'a>) -> TailFields<'a> {
    cursor.take_word_of(&["take"]);

    let quantity = cursor.take_digits();
    let unit = cursor.take_word_of(RESTATEMENT_UNITS);
    let restatement = match (quantity, unit) {
        (Some(quantity), Some(unit)) => Some(format!("{quantity} {unit}")),
        _ => None,
    };

    let keyword = cursor.take_word_of(FREQUENCY_KEYWORDS);
    let mut local_time = None;
    if keyword.is_some_and(|k| k.eq_ignore_ascii_case("at")) {
        local_time = cursor.take_clock_time();
    }

    let interval = cursor.take_digits().and_then(|run| run.parse::<i64>().ok());

    let mut qualifier = take_before_breakfast(cursor);
    if qualifier.is_none() {
        if let Some(time) = take_at_time(cursor) {
            // "daily at 9:30 PM": the time rides in qualifier position.
            local_time = local_time.or(Some(time));
        } else {
            qualifier = cursor.take_word_of(PERIOD_QUALIFIERS).map(str::to_owned);
        }
    }

    TailFields {
        restatement,
        keyword,
        interval,
        qualifier,
        local_time,
    }
}

/// Maps parsed tail fields onto a frequency descriptor.
///
/// A literal time wins outright. "every n" with an hour qualifier (or none)
/// becomes an interval; any other recognised token is kept raw, with the
/// qualifier preferred over the keyword as the more specific of the two.
fn derive_descriptor(tail: &TailFields<'_>) -> FrequencyDescriptor {
    if let Some(time) = tail.local_time {
        return FrequencyDescriptor::ExplicitTime(time);
    }

    let keyword_is_every = tail.keyword.is_some_and(|k| k.eq_ignore_ascii_case("every"));
    let qualifier_fits_hours = match &tail.qualifier {
        None => true,
        Some(qualifier) => qualifier.eq_ignore_ascii_case("hours"),
    };
    if keyword_is_every && qualifier_fits_hours {
        if let Some(interval) = tail.interval {
            return FrequencyDescriptor::IntervalHours(interval);
        }
    }

    if let Some(qualifier) = &tail.qualifier {
        return FrequencyDescriptor::RawToken(qualifier.clone());
    }
    if let Some(keyword) = tail.keyword {
        return FrequencyDescriptor::RawToken(keyword.to_owned());
    }
    FrequencyDescriptor::Unspecified
}

/// Returns the name phrase immediately before a dosage anchor.
///
/// The phrase is the maximal run of letters, spaces, tabs, apostrophes and
/// hyphens directly before the anchor, separated from the amount by at least
/// one space. The run never crosses `floor` (text already consumed by an
/// earlier instruction) and never crosses a line break, so a previous line
/// cannot bleed into a name.
fn name_before(text: &str, anchor_start: usize, floor: usize) -> Option<&str> {
    let bytes = text.as_bytes();

    let mut end = anchor_start;
    let mut saw_gap = false;
    while end > floor && matches!(bytes[end - 1], b' ' | b'\t') {
        end -= 1;
        saw_gap = true;
    }
    if !saw_gap {
        return None;
    }

    let mut start = end;
    while start > floor && is_name_byte(bytes[start - 1]) {
        start -= 1;
    }

    let name = text[start..end].trim();
    (!name.is_empty()).then_some(name)
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || matches!(byte, b' ' | b'\t' | b'\'' | b'-')
}

fn take_before_breakfast(cursor: &mut TokenCursor<'_>) -> Option<String> {
    let save = cursor.pos;
    if let Some(before) = cursor.take_word_of(&["before"]) {
        if let Some(breakfast) = cursor.take_word_of(&["breakfast"]) {
            return Some(format!("{before} {breakfast}"));
        }
    }
    cursor.pos = save;
    None
}

fn take_at_time(cursor: &mut TokenCursor<'_>) -> Option<ClockTime> {
    let save = cursor.pos;
    if cursor.take_word_of(&["at"]).is_some() {
        if let Some(time) = cursor.take_clock_time() {
            return Some(time);
        }
    }
    cursor.pos = save;
    None
}

/// Forward-only token reader over the text after a dosage anchor.
///
/// Every `take_*` method either consumes what it matched or restores the
/// cursor to where it started.
struct TokenCursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    fn new(text: &'a str, pos: usize) -> Self {
        Self { text, pos }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    fn alpha_run(&self) -> &'a str {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        &rest[..end]
    }

    fn digit_run(&self) -> &'a str {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    }

    /// Consumes the next word if it matches one of `options`, ignoring case.
    /// Returns the word as written.
    fn take_word_of(&mut self, options: &[&str]) -> Option<&'a str> {
        let save = self.pos;
        self.skip_whitespace();
        let word = self.alpha_run();
        if !word.is_empty() && options.iter().any(|option| word.eq_ignore_ascii_case(option)) {
            self.pos += word.len();
            Some(word)
        } else {
            self.pos = save;
            None
        }
    }

    /// Consumes the next run of ASCII digits, if any.
    fn take_digits(&mut self) -> Option<&'a str> {
        let save = self.pos;
        self.skip_whitespace();
        let run = self.digit_run();
        if run.is_empty() {
            self.pos = save;
            None
        } else {
            self.pos += run.len();
            Some(run)
        }
    }

    /// Consumes "H:MM AM/PM" (meridiem case-insensitive here, unlike the
    /// whole-text scan). Restores the cursor on any shape or range failure.
    fn take_clock_time(&mut self) -> Option<ClockTime> {
        let save = self.pos;
        self.skip_whitespace();

        let hour_run = self.digit_run();
        if hour_run.is_empty() || hour_run.len() > 2 {
            self.pos = save;
            return None;
        }
        self.pos += hour_run.len();

        if !self.rest().starts_with(':') {
            self.pos = save;
            return None;
        }
        self.pos += 1;

        let minute_run = self.digit_run();
        if minute_run.len() != 2 {
            self.pos = save;
            return None;
        }
        self.pos += minute_run.len();

        self.skip_whitespace();
        let meridiem = self.alpha_run();
        let pm = if meridiem.eq_ignore_ascii_case("pm") {
            true
        } else if meridiem.eq_ignore_ascii_case("am") {
            false
        } else {
            self.pos = save;
            return None;
        };
        self.pos += meridiem.len();

        let hour: u32 = hour_run.parse().unwrap_or(0);
        let minute: u32 = minute_run.parse().unwrap_or(60);
        if !(1..=12).contains(&hour) || minute > 59 {
            self.pos = save;
            return None;
        }

        let hour24 = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        match ClockTime::new(hour24, minute) {
            Ok(time) => Some(time),
            Err(_) => {
                self.pos = save;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<ParsedInstruction> {
        Scanner::new().scan(text)
    }

    #[test]
    fn test_scan_single_instruction_with_interval() {
        let records = scan("Amoxicillin 500 mg every 8 hours");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_str(), "Amoxicillin");
        assert_eq!(records[0].dosage.as_str(), "500 mg");
        assert_eq!(records[0].frequency, FrequencyDescriptor::IntervalHours(8));
    }

    #[test]
    fn test_scan_literal_time_in_tail_becomes_explicit() {
        let records = scan("Vitamin D 1000 units at 08:00 AM");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_str(), "Vitamin D");
        assert_eq!(records[0].dosage.as_str(), "1000 units");
        assert_eq!(
            records[0].frequency,
            FrequencyDescriptor::ExplicitTime(ClockTime::new(8, 0).expect("valid time"))
        );
    }

    #[test]
    fn test_scan_text_without_dosage_yields_nothing() {
        assert!(scan("Call the pharmacy tomorrow morning").is_empty());
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_scan_multiple_instructions_in_order() {
        let text = "Aspirin 100 mg daily\nMetformin 500 mg every 12 hours";
        let records = scan(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_str(), "Aspirin");
        assert_eq!(records[0].frequency, FrequencyDescriptor::RawToken("daily".into()));
        assert_eq!(records[1].name.as_str(), "Metformin");
        assert_eq!(records[1].frequency, FrequencyDescriptor::IntervalHours(12));
    }

    #[test]
    fn test_scan_restatement_replaces_dosage() {
        let records = scan("Aspirin 100 mg take 2 tablets daily");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dosage.as_str(), "2 tablets");
        assert_eq!(records[0].frequency, FrequencyDescriptor::RawToken("daily".into()));
    }

    #[test]
    fn test_scan_bare_quantity_keeps_captured_dosage() {
        let records = scan("Aspirin 100 mg take 2 daily");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dosage.as_str(), "100 mg");
    }

    #[test]
    fn test_scan_no_frequency_language_is_unspecified() {
        let records = scan("Paracetamol 500 mg\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].frequency, FrequencyDescriptor::Unspecified);
    }

    #[test]
    fn test_scan_name_does_not_cross_line_break() {
        let records = scan("take once daily\nMetformin 500 mg");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_str(), "Metformin");
    }

    #[test]
    fn test_scan_stray_token_on_same_line_joins_next_name() {
        // "once" is consumed by the first instruction, "daily" is not; it
        // sits directly before the next name and becomes part of it.
        let records = scan("Aspirin 100 mg once daily Tylenol 200 mg");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name.as_str(), "Aspirin");
        assert_eq!(records[0].frequency, FrequencyDescriptor::RawToken("once".into()));
        assert_eq!(records[1].name.as_str(), "daily Tylenol");
    }

    #[test]
    fn test_scan_interval_without_qualifier() {
        let records = scan("Ibuprofen 200 mg every 6");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].frequency, FrequencyDescriptor::IntervalHours(6));
    }

    #[test]
    fn test_scan_every_n_days_stays_raw() {
        let records = scan("Vitamin B 50 mg every 2 days");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].frequency, FrequencyDescriptor::RawToken("days".into()));
    }

    #[test]
    fn test_scan_qualifier_without_keyword_stays_raw() {
        let records = scan("Melatonin 3 mg night");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].frequency, FrequencyDescriptor::RawToken("night".into()));
    }

    #[test]
    fn test_scan_before_breakfast_phrase() {
        let records = scan("Omeprazole 20 mg before breakfast");
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].frequency,
            FrequencyDescriptor::RawToken("before breakfast".into())
        );
    }

    #[test]
    fn test_scan_keyword_at_without_time_stays_raw() {
        let records = scan("Levothyroxine 50 mcg at bedtime");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].frequency, FrequencyDescriptor::RawToken("at".into()));
    }

    #[test]
    fn test_scan_units_match_case_insensitively() {
        let records = scan("ASPIRIN 100 MG DAILY");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_str(), "ASPIRIN");
        assert_eq!(records[0].dosage.as_str(), "100 MG");
        assert_eq!(records[0].frequency, FrequencyDescriptor::RawToken("DAILY".into()));
    }

    #[test]
    fn test_scan_dosage_keeps_raw_spacing_inside_span() {
        let records = scan("Aspirin 100  mg");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dosage.as_str(), "100  mg");
    }

    #[test]
    fn test_scan_anchor_without_name_is_skipped() {
        assert!(scan("500 mg every 8 hours").is_empty());
    }

    #[test]
    fn test_scan_decimal_amount_is_not_an_anchor() {
        // "2.5" has no name run before the "5 mg" fragment, so nothing matches.
        assert!(scan("Aspirin 2.5 mg").is_empty());
    }

    #[test]
    fn test_scan_tablets_as_dosage_unit() {
        let records = scan("Aspirin 2 tablets daily");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].dosage.as_str(), "2 tablets");
        assert_eq!(records[0].frequency, FrequencyDescriptor::RawToken("daily".into()));
    }

    #[test]
    fn test_scan_lowercase_tail_time_is_still_explicit() {
        let records = scan("Zinc 50 mg at 9:30 pm");
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].frequency,
            FrequencyDescriptor::ExplicitTime(ClockTime::new(21, 30).expect("valid time"))
        );
    }

    #[test]
    fn test_find_explicit_time_takes_first_occurrence() {
        let scanner = Scanner::new();
        let found = scanner
            .find_explicit_time("Aspirin 100 mg at 8:00 AM and Zinc 50 mg at 9:30 PM")
            .expect("should find a time");
        assert_eq!(found.to_string(), "08:00 AM");
    }

    #[test]
    fn test_find_explicit_time_requires_uppercase_meridiem() {
        let scanner = Scanner::new();
        assert!(scanner.find_explicit_time("Zinc 50 mg at 9:30 pm").is_none());
    }

    #[test]
    fn test_find_explicit_time_normalises_single_digit_hour() {
        let scanner = Scanner::new();
        let found = scanner
            .find_explicit_time("take everything at 9:30 PM tonight")
            .expect("should find a time");
        assert_eq!(found.to_string(), "09:30 PM");
    }

    #[test]
    fn test_find_explicit_time_ignores_out_of_range_hour() {
        let scanner = Scanner::new();
        assert!(scanner.find_explicit_time("at 0:30 AM").is_none());
    }
}
