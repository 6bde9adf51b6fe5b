//! ISO-8601 timestamp parsing.
//!
//! Accepts the common subset of ISO-8601 used by order clients: calendar,
//! week (`2024-W04-5`) and ordinal (`2024-026`) dates in extended or basic
//! form, hour/minute/second times with optional fractional seconds, and `Z`,
//! `±HH`, `±HHMM` or `±HH:MM` offsets. A timestamp without an offset
//! still parses; callers decide whether a naive value is acceptable.

use crate::utils::error::TimestampError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

static LAYOUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<date>[0-9W-]+)(?:[Tt ](?P<time>[0-9:.,]+)(?P<offset>[Zz]|[+-][0-9:]+)?)?$")
        .unwrap()
});

const MAX_FRACTION_DIGITS: usize = 9;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    local: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl Timestamp {
    pub fn parse(input: &str) -> Result<Self, TimestampError> {
        if input.is_empty() {
            return Err(TimestampError::Empty);
        }

        let caps = LAYOUT
            .captures(input)
            .ok_or_else(|| TimestampError::UnrecognizedLayout(input.to_string()))?;

        let date = parse_date(&caps["date"])?;
        let local = match caps.name("time") {
            Some(time) => combine(date, parse_time(time.as_str())?)?,
            None => date.and_time(NaiveTime::MIN),
        };
        let offset = caps
            .name("offset")
            .map(|offset| parse_offset(offset.as_str()))
            .transpose()?;

        Ok(Self { local, offset })
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    pub fn is_naive(&self) -> bool {
        self.offset.is_none()
    }

    pub fn to_fixed(&self) -> Option<DateTime<FixedOffset>> {
        let offset = self.offset?;
        self.local.and_local_timezone(offset).single()
    }

    /// `None` for naive timestamps: the instant they denote is unknown.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        self.to_fixed().map(|dt| dt.with_timezone(&Utc))
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

struct TimeOfDay {
    hour: u32,
    minute: u32,
    second: u32,
    nanos: u32,
}

fn parse_date(s: &str) -> Result<NaiveDate, TimestampError> {
    let invalid = || TimestampError::InvalidDate(s.to_string());
    if s.len() < 7 {
        return Err(invalid());
    }

    let (year, rest) = s.split_at(4);
    let year = parse_digits(year).ok_or_else(invalid)?;
    check_range("year", year, 1, 9999)?;

    // The separator must be used consistently within the date.
    let (extended, rest) = match rest.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };

    if let Some(week) = rest.strip_prefix('W') {
        let (week, day) = match (extended, week.len()) {
            (_, 2) => (week, None),
            (true, 4) if week.as_bytes()[2] == b'-' => (&week[..2], Some(&week[3..])),
            (false, 3) => (&week[..2], Some(&week[2..])),
            _ => return Err(invalid()),
        };
        return week_date(s, year, week, day);
    }

    match (extended, rest.len()) {
        (_, 3) => ordinal_date(s, year, rest),
        (true, 5) if rest.as_bytes()[2] == b'-' => calendar_date(s, year, &rest[..2], &rest[3..]),
        (false, 4) => calendar_date(s, year, &rest[..2], &rest[2..]),
        _ => Err(invalid()),
    }
}

fn calendar_date(s: &str, year: u32, month: &str, day: &str) -> Result<NaiveDate, TimestampError> {
    let invalid = || TimestampError::InvalidDate(s.to_string());
    let month = parse_digits(month).ok_or_else(invalid)?;
    let day = parse_digits(day).ok_or_else(invalid)?;

    check_range("month", month, 1, 12)?;
    check_range("day", day, 1, 31)?;

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| TimestampError::NonexistentDate(s.to_string()))
}

/// ISO week date; a missing weekday means Monday.
fn week_date(s: &str, year: u32, week: &str, day: Option<&str>) -> Result<NaiveDate, TimestampError> {
    let invalid = || TimestampError::InvalidDate(s.to_string());
    let week = parse_digits(week).ok_or_else(invalid)?;
    let day = match day {
        Some(day) => parse_digits(day).ok_or_else(invalid)?,
        None => 1,
    };

    check_range("week", week, 1, 53)?;
    check_range("weekday", day, 1, 7)?;

    NaiveDate::from_isoywd_opt(year as i32, week, WEEKDAYS[(day - 1) as usize])
        .ok_or_else(|| TimestampError::NonexistentDate(s.to_string()))
}

fn ordinal_date(s: &str, year: u32, ordinal: &str) -> Result<NaiveDate, TimestampError> {
    let ordinal = parse_digits(ordinal).ok_or_else(|| TimestampError::InvalidDate(s.to_string()))?;
    check_range("ordinal day", ordinal, 1, 366)?;

    NaiveDate::from_yo_opt(year as i32, ordinal)
        .ok_or_else(|| TimestampError::NonexistentDate(s.to_string()))
}

fn parse_time(s: &str) -> Result<TimeOfDay, TimestampError> {
    let invalid = || TimestampError::InvalidTime(s.to_string());

    let (clock, fraction) = match s.find(['.', ',']) {
        Some(pos) => (&s[..pos], Some(&s[pos + 1..])),
        None => (s, None),
    };

    let parts: Vec<&str> = if clock.contains(':') {
        clock.split(':').collect()
    } else if clock.len() % 2 == 0 {
        (0..clock.len()).step_by(2).map(|i| &clock[i..i + 2]).collect()
    } else {
        return Err(invalid());
    };

    if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.len() != 2) {
        return Err(invalid());
    }
    // Fractions are only allowed on the seconds field.
    if fraction.is_some() && parts.len() != 3 {
        return Err(invalid());
    }

    let mut fields = [0u32; 3];
    for (field, part) in fields.iter_mut().zip(&parts) {
        *field = parse_digits(part).ok_or_else(invalid)?;
    }
    let [hour, minute, second] = fields;

    let nanos = match fraction {
        Some(digits) => parse_fraction(digits).ok_or_else(invalid)?,
        None => 0,
    };

    check_range("hour", hour, 0, 24)?;
    check_range("minute", minute, 0, 59)?;
    check_range("second", second, 0, 59)?;
    if hour == 24 && (minute, second, nanos) != (0, 0, 0) {
        return Err(invalid());
    }

    Ok(TimeOfDay {
        hour,
        minute,
        second,
        nanos,
    })
}

fn parse_offset(s: &str) -> Result<FixedOffset, TimestampError> {
    let invalid = || TimestampError::InvalidOffset(s.to_string());

    if s.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let sign = if s.starts_with('-') { -1 } else { 1 };
    let rest = &s[1..];
    let (hours, minutes) = match rest.len() {
        2 => (rest, "00"),
        4 if !rest.contains(':') => (&rest[..2], &rest[2..]),
        5 if rest.as_bytes()[2] == b':' => (&rest[..2], &rest[3..]),
        _ => return Err(invalid()),
    };

    let hours = parse_digits(hours).ok_or_else(invalid)?;
    let minutes = parse_digits(minutes).ok_or_else(invalid)?;
    check_range("offset hour", hours, 0, 23)?;
    check_range("offset minute", minutes, 0, 59)?;

    let seconds = sign * (hours * 3600 + minutes * 60) as i32;
    FixedOffset::east_opt(seconds).ok_or_else(invalid)
}

fn combine(date: NaiveDate, time: TimeOfDay) -> Result<NaiveDateTime, TimestampError> {
    // 24:00 is midnight at the end of the given day.
    if time.hour == 24 {
        return date
            .succ_opt()
            .map(|next| next.and_time(NaiveTime::MIN))
            .ok_or_else(|| TimestampError::NonexistentDate(date.to_string()));
    }

    NaiveTime::from_hms_nano_opt(time.hour, time.minute, time.second, time.nanos)
        .map(|t| date.and_time(t))
        .ok_or_else(|| {
            TimestampError::InvalidTime(format!(
                "{:02}:{:02}:{:02}",
                time.hour, time.minute, time.second
            ))
        })
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Nanoseconds from a fraction's digits; extra precision is truncated.
fn parse_fraction(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let kept = &digits[..digits.len().min(MAX_FRACTION_DIGITS)];
    let scale = 10u32.pow((MAX_FRACTION_DIGITS - kept.len()) as u32);
    kept.parse::<u32>().ok().map(|n| n * scale)
}

fn check_range(
    component: &'static str,
    value: u32,
    min: u32,
    max: u32,
) -> Result<(), TimestampError> {
    if value < min || value > max {
        return Err(TimestampError::OutOfRange {
            component,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn utc(input: &str) -> DateTime<Utc> {
        Timestamp::parse(input).unwrap().to_utc().unwrap()
    }

    #[test]
    fn test_parse_utc_designator() {
        let ts = Timestamp::parse("2024-01-26T17:00:45Z").unwrap();
        assert_eq!(ts.offset(), FixedOffset::east_opt(0));
        assert_eq!(utc("2024-01-26T17:00:45Z").to_rfc3339(), "2024-01-26T17:00:45+00:00");
        assert!(Timestamp::parse("2024-01-26t17:00:45z").is_ok());
    }

    #[test]
    fn test_offset_forms_are_equivalent() {
        let expected = utc("2024-01-26T17:00:45Z");
        for input in [
            "2024-01-26T17:00:45+00",
            "2024-01-26T17:00:45+0000",
            "2024-01-26T17:00:45+00:00",
            "2024-01-26T17:00:45-00",
            "2024-01-26T17:00:45-0000",
            "2024-01-26T17:00:45-00:00",
            "2024-01-26T18:00:45+01:00",
            "2024-01-26T09:00:45-08:00",
            "2024-01-27T02:00:45+0900",
            "2024-01-26T12:00:45-05",
        ] {
            assert_eq!(utc(input), expected, "input: {}", input);
        }
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(utc("2024-01-26T17:00:45.9-00:00").nanosecond(), 900_000_000);
        assert_eq!(utc("2024-01-26T17:00:45.99-00:00").nanosecond(), 990_000_000);
        assert_eq!(utc("2024-01-26T17:00:45.001-0000").nanosecond(), 1_000_000);
        assert_eq!(utc("2024-01-26T17:00:45,5Z").nanosecond(), 500_000_000);
        assert_eq!(utc("2024-01-26T17:00:45.1234567891Z").nanosecond(), 123_456_789);
    }

    #[test]
    fn test_reduced_precision_and_basic_format() {
        assert_eq!(utc("2024-01-26T17Z").hour(), 17);
        assert_eq!(utc("2024-01-26T17:30Z").minute(), 30);
        assert_eq!(utc("20240126T173015Z"), utc("2024-01-26T17:30:15Z"));
        assert_eq!(utc("2024-01-26 17:30:15Z"), utc("2024-01-26T17:30:15Z"));
    }

    #[test]
    fn test_week_and_ordinal_dates() {
        let expected = utc("2024-01-26T17:00:00Z");
        for input in [
            "2024-W04-5T17:00:00Z",
            "2024W045T17:00:00Z",
            "2024-026T17:00:00Z",
            "2024026T17:00:00Z",
            "2024-W04-5T18:00:00+01:00",
        ] {
            assert_eq!(utc(input), expected, "input: {}", input);
        }

        // Week without a weekday is that week's Monday.
        assert_eq!(utc("2024-W04T00:00:00Z"), utc("2024-01-22T00:00:00Z"));
        // Week 1 of 2020 starts in the previous calendar year.
        assert_eq!(utc("2020-W01-1T00:00:00Z"), utc("2019-12-30T00:00:00Z"));
        assert_eq!(utc("2024-366T00:00:00Z"), utc("2024-12-31T00:00:00Z"));
    }

    #[test]
    fn test_rejects_invalid_week_and_ordinal_dates() {
        for input in [
            "2024-W00-1T00:00:00Z",
            "2024-W54-1T00:00:00Z",
            "2024-W04-0T00:00:00Z",
            "2024-W04-8T00:00:00Z",
            "2023-W53-1T00:00:00Z",
            "2024-W045T00:00:00Z",
            "2024W04-5T00:00:00Z",
            "2024-w04-5T00:00:00Z",
            "2024-000T00:00:00Z",
            "2024-367T00:00:00Z",
            "2023-366T00:00:00Z",
        ] {
            assert!(Timestamp::parse(input).is_err(), "input: {}", input);
        }

        assert_eq!(
            Timestamp::parse("2024-W04-8T00:00:00Z").unwrap_err(),
            TimestampError::OutOfRange {
                component: "weekday",
                value: 8,
                min: 1,
                max: 7
            }
        );
        assert_eq!(
            Timestamp::parse("2023-366T00:00:00Z").unwrap_err(),
            TimestampError::NonexistentDate("2023-366".to_string())
        );
    }

    #[test]
    fn test_end_of_day_midnight_rolls_over() {
        let dt = utc("2024-01-26T24:00:00Z");
        assert_eq!((dt.day(), dt.hour()), (27, 0));
        assert!(Timestamp::parse("2024-01-26T24:00:01Z").is_err());
    }

    #[test]
    fn test_naive_timestamps_parse_without_offset() {
        for input in ["2024-01-26T17:00", "2024-01-26T17:00:45", "2024-01-26"] {
            let ts = Timestamp::parse(input).unwrap();
            assert!(ts.is_naive(), "input: {}", input);
            assert!(ts.to_utc().is_none());
        }
    }

    #[test]
    fn test_rejects_malformed_input() {
        for input in [
            "",
            "24-01-26T17:00:45Z",
            "9999-99-99T17:00:45Z",
            "2024-01-01T99:99:99.999Z",
            "2020-0-15Ö00:00:00Q",
            "0-01-15T13:00:00",
            "2023-x-y5T13:00:00",
            "2024-01-26T17:00:45+00Z",
            "2024-01-26T17:00:45-00Z",
            "2024-01-2616:00:00Z",
            "2024-01-26T16:00:99",
            "2024-02-30T10:00:00Z",
            "2024-01-26T17:00:45+24:00",
            "2024-01-26T17:00:45+1:00",
            "2024-01-26T17:00.5Z",
            "0000-01-01T00:00:00Z",
        ] {
            assert!(Timestamp::parse(input).is_err(), "input: {}", input);
        }
    }

    #[test]
    fn test_error_describes_failing_component() {
        assert_eq!(
            Timestamp::parse("2024-13-01T00:00:00Z").unwrap_err(),
            TimestampError::OutOfRange {
                component: "month",
                value: 13,
                min: 1,
                max: 12
            }
        );
        assert_eq!(
            Timestamp::parse("24-01-26T17:00:45Z").unwrap_err(),
            TimestampError::InvalidDate("24-01-26".to_string())
        );
        assert!(matches!(
            Timestamp::parse("2024-01-26T17:00:45+00Z").unwrap_err(),
            TimestampError::UnrecognizedLayout(_)
        ));
    }
}
