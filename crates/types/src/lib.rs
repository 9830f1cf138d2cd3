use chrono::{NaiveTime, Timelike};

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// Wraps a `String` holding at least one non-whitespace character. Leading
/// and trailing whitespace is stripped during construction, so the stored
/// value is always in display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` holding the trimmed input, or
    /// `Err(TextError::Empty)` if nothing remains after trimming.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing or constructing clock times.
#[derive(Debug, thiserror::Error)]
pub enum TimeError {
    /// Hour was outside the valid range for the clock style used
    #[error("Hour {0} is out of range")]
    HourOutOfRange(u32),
    /// Minute was outside 0-59
    #[error("Minute {0} is out of range")]
    MinuteOutOfRange(u32),
    /// The meridiem suffix was not a literal "AM" or "PM"
    #[error("Meridiem must be AM or PM, got {0:?}")]
    UnknownMeridiem(String),
    /// Input did not have the expected H:MM AM/PM shape
    #[error("Unrecognised clock time {0:?}")]
    Malformed(String),
}

/// A minute-precision time of day.
///
/// Stored on the 24-hour clock but displayed and serialized in the
/// two-digit 12-hour form with meridiem (`"08:00 AM"`, `"09:30 PM"`).
/// Midnight renders as `12:xx AM` and noon as `12:xx PM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Creates a clock time from a 24-hour `hour` and `minute`.
    ///
    /// # Returns
    ///
    /// Returns `Ok(ClockTime)`, or a range error when `hour` exceeds 23 or
    /// `minute` exceeds 59.
    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(TimeError::MinuteOutOfRange(minute));
        }
        // Range checks above make the construction infallible.
        match NaiveTime::from_hms_opt(hour, minute, 0) {
            Some(t) => Ok(Self(t)),
            None => Err(TimeError::HourOutOfRange(hour)),
        }
    }

    /// Parses a 12-hour clock string such as `"9:30 PM"` or `"09:30 PM"`.
    ///
    /// The hour may be one or two digits and must fall in 1-12; the minute
    /// must be exactly two digits; the meridiem must be an uppercase `AM`
    /// or `PM`. `12:xx AM` maps to hour 0 and `12:xx PM` to hour 12.
    ///
    /// # Errors
    ///
    /// Returns a `TimeError` describing the first rule the input breaks.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TimeError> {
        let text = input.as_ref().trim();
        let malformed = || TimeError::Malformed(text.to_owned());

        let mut parts = text.split_whitespace();
        let digits = parts.next().ok_or_else(malformed)?;
        let meridiem = parts.next().ok_or_else(malformed)?;
        if parts.next().is_some() {
            return Err(malformed());
        }

        let pm = match meridiem {
            "AM" => false,
            "PM" => true,
            other => return Err(TimeError::UnknownMeridiem(other.to_owned())),
        };

        let (hour_text, minute_text) = digits.split_once(':').ok_or_else(malformed)?;
        if hour_text.is_empty()
            || hour_text.len() > 2
            || minute_text.len() != 2
            || !hour_text.bytes().all(|b| b.is_ascii_digit())
            || !minute_text.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let hour: u32 = hour_text.parse().map_err(|_| malformed())?;
        let minute: u32 = minute_text.parse().map_err(|_| malformed())?;
        if !(1..=12).contains(&hour) {
            return Err(TimeError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(TimeError::MinuteOutOfRange(minute));
        }

        let hour24 = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        Self::new(hour24, minute)
    }

    /// Creates a clock time from a `NaiveTime`, truncating seconds.
    pub fn from_naive(time: NaiveTime) -> Self {
        // Hour and minute come from a valid NaiveTime, so this cannot fail.
        Self(NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time))
    }

    /// Returns this time shifted forward by `hours`, wrapping past midnight.
    pub fn add_hours(self, hours: i64) -> Self {
        Self(self.0 + chrono::Duration::hours(hours))
    }

    /// Returns the hour on the 24-hour clock (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%I:%M %p"))
    }
}

impl serde::Serialize for ClockTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for ClockTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ClockTime::parse(&s).map_err(serde::de::Error::custom)
    }
}
