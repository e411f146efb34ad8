// 12/24-hour conversions and locale date formatting.
use wedcard::error::FormatError;
use wedcard::format::{
    Period, Time12, format_date_long, format_date_short, parse_iso_date, to_12_hour, to_24_hour,
};
use wedcard::locale::CardLocale;

#[test]
fn test_12_to_24_round_trip_all_values() {
    for period in [Period::AM, Period::PM] {
        for hour in 1..=12 {
            for minute in 0..60 {
                let t24 = to_24_hour(hour, minute, period).unwrap();
                let back = to_12_hour(&t24).unwrap();
                assert_eq!(back.hour_padded(), format!("{:02}", hour));
                assert_eq!(back.minute_padded(), format!("{:02}", minute));
                assert_eq!(back.period, period, "{} {}", t24, period);
            }
        }
    }
}

#[test]
fn test_24_to_12_round_trip_all_values() {
    for hour in 0..24 {
        for minute in 0..60 {
            let t = format!("{:02}:{:02}", hour, minute);
            let t12 = to_12_hour(&t).unwrap();
            assert_eq!(to_24_hour(t12.hour, t12.minute, t12.period).unwrap(), t);
        }
    }
}

#[test]
fn test_known_conversions() {
    assert_eq!(to_24_hour(12, 30, Period::AM).unwrap(), "00:30");
    assert_eq!(to_24_hour(12, 30, Period::PM).unwrap(), "12:30");
    assert_eq!(to_24_hour(1, 5, Period::PM).unwrap(), "13:05");

    let midnight = to_12_hour("00:00").unwrap();
    assert_eq!(
        (midnight.hour_padded(), midnight.minute_padded(), midnight.period),
        ("12".to_string(), "00".to_string(), Period::AM)
    );
    let afternoon = to_12_hour("13:05").unwrap();
    assert_eq!(afternoon.to_string(), "01:05 PM");
}

#[test]
fn test_out_of_range_inputs_fail() {
    assert_eq!(to_24_hour(0, 0, Period::AM), Err(FormatError::HourOutOfRange(0)));
    assert_eq!(to_24_hour(13, 0, Period::PM), Err(FormatError::HourOutOfRange(13)));
    assert_eq!(to_24_hour(1, 60, Period::PM), Err(FormatError::MinuteOutOfRange(60)));
    for bad in ["24:00", "12:60", "1:00", "12:5", "ab:cd", "", "12-30"] {
        assert!(to_12_hour(bad).is_err(), "{:?} should not parse", bad);
    }
}

#[test]
fn test_display_string_parsing() {
    assert_eq!(
        Time12::parse("4:00 PM").unwrap(),
        Time12::new(4, 0, Period::PM).unwrap()
    );
    assert_eq!("11:00 am".parse::<Time12>().unwrap().to_24_hour(), "11:00");
    assert!(Time12::parse("13:00 PM").is_err());
    assert!(Time12::parse("11:00").is_err());
    assert!(Time12::parse("11:00   am").is_err());
    assert!(Time12::parse("11:00 a m").is_err());
}

#[test]
fn test_short_date() {
    let en = format_date_short("2026-06-15", CardLocale::English).unwrap();
    assert_eq!(en.weekday, "Monday");
    assert_eq!(en.formatted, "15.06.26");

    let ms = format_date_short("2026-06-15", CardLocale::Malay).unwrap();
    assert_eq!(ms.weekday, "Isnin");
    assert_eq!(ms.formatted, "15.06.26");

    let y2k = format_date_short("2000-01-01", CardLocale::English).unwrap();
    assert_eq!(y2k.formatted, "01.01.00");
}

#[test]
fn test_long_date() {
    assert_eq!(
        format_date_long("2026-06-15", CardLocale::English).unwrap(),
        "Monday, June 15, 2026"
    );
    let ms = format_date_long("2026-06-15", CardLocale::Malay).unwrap();
    assert!(ms.starts_with("Isnin"));
    assert!(ms.ends_with("2026"));
}

#[test]
fn test_malformed_dates_fail_loudly() {
    let inputs = [
        "2026-02-30",
        "15-06-2026",
        "2026/06/15",
        "2026-6-15",
        "",
        "tomorrow",
        "2026-06- 5",
        "2026- 6-15",
        "+026-06-15",
        "-999-06-15",
        " 2026-6-15",
    ];
    for bad in inputs {
        let err = format_date_long(bad, CardLocale::English).unwrap_err();
        assert!(err.is_date_error(), "{:?}", bad);
        assert!(format_date_short(bad, CardLocale::Malay).is_err());
    }
    assert!(parse_iso_date("2024-02-29").is_ok());
}
