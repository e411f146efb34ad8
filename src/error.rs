// File: ./src/error.rs
// Typed errors for the pure formatting layer.
use thiserror::Error;

/// Errors raised while parsing or formatting times, dates and locales.
///
/// Formatting never substitutes a blank string or a placeholder date for bad
/// input; callers always get one of these back instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("hour {0} is outside 1..=12")]
    HourOutOfRange(u32),

    #[error("minute {0} is outside 0..=59")]
    MinuteOutOfRange(u32),

    #[error("invalid 24-hour time '{0}', expected HH:MM")]
    InvalidTime24(String),

    #[error("invalid 12-hour time '{0}', expected HH:MM AM|PM")]
    InvalidTime12(String),

    #[error("invalid period '{0}', expected AM or PM")]
    InvalidPeriod(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unsupported locale '{0}'")]
    UnknownLocale(String),
}

impl FormatError {
    /// True when the error comes from a malformed date rather than a time.
    pub fn is_date_error(&self) -> bool {
        matches!(self, Self::InvalidDate(_))
    }
}

pub type FormatResult<T> = Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FormatError::InvalidTime24("25:00".into());
        assert_eq!(err.to_string(), "invalid 24-hour time '25:00', expected HH:MM");
    }

    #[test]
    fn test_date_error_kind() {
        assert!(FormatError::InvalidDate("2026-13-01".into()).is_date_error());
        assert!(!FormatError::HourOutOfRange(13).is_date_error());
    }
}
