// File: ./src/format/date.rs
use crate::error::{FormatError, FormatResult};
use crate::locale::CardLocale;
use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone, Utc};

/// Weekday name plus the compact `DD.MM.YY` numeric form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortDate {
    pub weekday: String,
    pub formatted: String,
}

/// Strict ISO calendar date, `YYYY-MM-DD` with a four digit year.
pub fn parse_iso_date(iso: &str) -> FormatResult<NaiveDate> {
    let bytes = iso.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(FormatError::InvalidDate(iso.to_string()));
    }
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .map_err(|_| FormatError::InvalidDate(iso.to_string()))
}

fn localized(date: NaiveDate, pattern: &str, locale: CardLocale) -> String {
    // Locale-aware formatting is only exposed on zoned values; midnight UTC
    // keeps the calendar fields unchanged.
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .format_localized(pattern, locale.chrono_locale())
        .to_string()
}

pub fn format_date_short(iso: &str, locale: CardLocale) -> FormatResult<ShortDate> {
    let date = parse_iso_date(iso)?;
    Ok(ShortDate {
        weekday: localized(date, "%A", locale),
        formatted: format!(
            "{:02}.{:02}.{:02}",
            date.day(),
            date.month(),
            date.year().rem_euclid(100)
        ),
    })
}

/// Full date with weekday, day, month name and year, ordered the way the
/// locale writes it ("Monday, June 15, 2026" / "Isnin, 15 Jun 2026").
pub fn format_date_long(iso: &str, locale: CardLocale) -> FormatResult<String> {
    let date = parse_iso_date(iso)?;
    let pattern = match locale {
        CardLocale::English => "%A, %B %-d, %Y",
        CardLocale::Malay => "%A, %-d %B %Y",
    };
    Ok(localized(date, pattern, locale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_date_english() {
        let short = format_date_short("2026-06-15", CardLocale::English).unwrap();
        assert_eq!(short.weekday, "Monday");
        assert_eq!(short.formatted, "15.06.26");
    }

    #[test]
    fn test_short_date_pads_and_truncates_year() {
        let short = format_date_short("2005-01-02", CardLocale::English).unwrap();
        assert_eq!(short.formatted, "02.01.05");
        assert_eq!(short.weekday, "Sunday");
    }

    #[test]
    fn test_long_date_english() {
        assert_eq!(
            format_date_long("2026-06-15", CardLocale::English).unwrap(),
            "Monday, June 15, 2026"
        );
    }

    #[test]
    fn test_long_date_malay() {
        assert_eq!(
            format_date_long("2026-06-15", CardLocale::Malay).unwrap(),
            "Isnin, 15 Jun 2026"
        );
    }

    #[test]
    fn test_malformed_dates_fail() {
        let inputs = [
            "", "2026-6-15", "15/06/2026", "2026-02-30", "2026-13-01", "20260615", "not a date",
        ];
        for bad in inputs {
            let err = format_date_short(bad, CardLocale::English).unwrap_err();
            assert!(err.is_date_error(), "{:?} gave {:?}", bad, err);
            assert!(format_date_long(bad, CardLocale::Malay).is_err());
        }
    }

    #[test]
    fn test_padded_or_signed_fields_are_rejected() {
        let inputs = [
            "2026-06- 5",
            "2026- 6-15",
            "+026-06-15",
            "-999-06-15",
            " 2026-6-15",
            "2026/06/15",
            "２026-06-15",
        ];
        for bad in inputs {
            assert!(parse_iso_date(bad).is_err(), "{:?} was accepted", bad);
        }
        assert_eq!(
            parse_iso_date("0026-06-15").unwrap(),
            NaiveDate::from_ymd_opt(26, 6, 15).unwrap()
        );
    }
}
