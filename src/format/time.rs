// File: ./src/format/time.rs
use crate::error::{FormatError, FormatResult};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Half of the day a 12-hour clock reading belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    AM,
    PM,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::AM => write!(f, "AM"),
            Period::PM => write!(f, "PM"),
        }
    }
}

impl FromStr for Period {
    type Err = FormatError;

    fn from_str(s: &str) -> FormatResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Period::AM),
            "PM" => Ok(Period::PM),
            _ => Err(FormatError::InvalidPeriod(s.to_string())),
        }
    }
}

/// A 12-hour clock reading. Displays as `"HH:MM AM"`, both fields padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Time12 {
    /// 1..=12
    pub hour: u32,
    /// 0..=59
    pub minute: u32,
    pub period: Period,
}

impl Time12 {
    pub fn new(hour: u32, minute: u32, period: Period) -> FormatResult<Self> {
        if !(1..=12).contains(&hour) {
            return Err(FormatError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(FormatError::MinuteOutOfRange(minute));
        }
        Ok(Self {
            hour,
            minute,
            period,
        })
    }

    /// Parse a picker display string such as `"02:30 PM"`.
    ///
    /// A single-digit hour (`"4:00 PM"`) is accepted since stored cards
    /// contain them; the minute must always have two digits.
    pub fn parse(s: &str) -> FormatResult<Self> {
        let invalid = || FormatError::InvalidTime12(s.to_string());

        let (clock, period) = s.trim().split_once(' ').ok_or_else(invalid)?;
        // Exactly one space between the clock and the period.
        if period.starts_with(char::is_whitespace) {
            return Err(invalid());
        }
        let period: Period = period.parse().map_err(|_| invalid())?;
        let (hour, minute) = clock.split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour = parse_digits(hour).ok_or_else(invalid)?;
        let minute = parse_digits(minute).ok_or_else(invalid)?;

        Self::new(hour, minute, period).map_err(|_| invalid())
    }

    /// Zero-padded hour, "01".."12".
    pub fn hour_padded(&self) -> String {
        format!("{:02}", self.hour)
    }

    /// Zero-padded minute, "00".."59".
    pub fn minute_padded(&self) -> String {
        format!("{:02}", self.minute)
    }

    pub fn to_24_hour(&self) -> String {
        format!("{:02}:{:02}", hour_24(self.hour, self.period), self.minute)
    }

    pub fn to_naive_time(&self) -> FormatResult<NaiveTime> {
        NaiveTime::from_hms_opt(hour_24(self.hour, self.period), self.minute, 0)
            .ok_or_else(|| FormatError::InvalidTime12(self.to_string()))
    }
}

impl fmt::Display for Time12 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02} {}", self.hour, self.minute, self.period)
    }
}

impl FromStr for Time12 {
    type Err = FormatError;

    fn from_str(s: &str) -> FormatResult<Self> {
        Self::parse(s)
    }
}

impl From<NaiveTime> for Time12 {
    fn from(t: NaiveTime) -> Self {
        let (is_pm, hour) = t.hour12();
        Self {
            hour,
            minute: t.minute(),
            period: if is_pm { Period::PM } else { Period::AM },
        }
    }
}

fn hour_24(hour12: u32, period: Period) -> u32 {
    match period {
        Period::AM => hour12 % 12,
        Period::PM => hour12 % 12 + 12,
    }
}

fn parse_digits(s: &str) -> Option<u32> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Convert a 12-hour reading into the `"HH:MM"` storage form.
///
/// `12:xx AM` becomes `00:xx`, `12:xx PM` stays `12:xx`.
pub fn to_24_hour(hour12: u32, minute: u32, period: Period) -> FormatResult<String> {
    Ok(Time12::new(hour12, minute, period)?.to_24_hour())
}

/// Parse a strict `"HH:MM"` storage string into its 12-hour reading.
pub fn to_12_hour(time24: &str) -> FormatResult<Time12> {
    Ok(Time12::from(parse_24_hour(time24)?))
}

/// Strict `"HH:MM"` parse: exactly two digits on each side, 00..23 and 00..59.
pub fn parse_24_hour(time24: &str) -> FormatResult<NaiveTime> {
    let invalid = || FormatError::InvalidTime24(time24.to_string());

    let (hour, minute) = time24.split_once(':').ok_or_else(invalid)?;
    if hour.len() != 2 || minute.len() != 2 {
        return Err(invalid());
    }
    let hour = parse_digits(hour).ok_or_else(invalid)?;
    let minute = parse_digits(minute).ok_or_else(invalid)?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}
