//! Timestamp parsing for commit history windows
//!
//! Accepts the subset of git's date syntax that callers realistically send:
//! absolute dates, `@<unix seconds>`, and relative phrases like `2 weeks ago`.
//! Dates without an explicit offset are read as UTC.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::types::{GitError, GitResult};

/// Parse a timestamp relative to `now`
pub fn parse_timestamp(input: &str, now: DateTime<Utc>) -> GitResult<DateTime<Utc>> {
    let trimmed = input.trim();
    let invalid = || GitError::InvalidTimestamp(input.to_string());

    if trimmed.is_empty() {
        return Err(invalid());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return start_of_day(date).ok_or_else(invalid);
    }

    if let Some(secs) = trimmed.strip_prefix('@') {
        let secs: i64 = secs.parse().map_err(|_| invalid())?;
        return Utc.timestamp_opt(secs, 0).single().ok_or_else(invalid);
    }

    let lower = trimmed.to_ascii_lowercase();
    match lower.as_str() {
        "now" => return Ok(now),
        "today" => return start_of_day(now.date_naive()).ok_or_else(invalid),
        "yesterday" => {
            let date = now.date_naive().pred_opt().ok_or_else(invalid)?;
            return start_of_day(date).ok_or_else(invalid);
        }
        _ => {}
    }

    parse_relative(&lower, now).ok_or_else(invalid)
}

fn start_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `<n> <unit>[s] ago`, also accepting `<n>.<unit>.ago` as git does
fn parse_relative(input: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let normalized = input.replace('.', " ");
    let mut words = normalized.split_whitespace();

    let amount: i64 = words.next()?.parse().ok()?;
    let unit = words.next()?;
    if words.next()? != "ago" || words.next().is_some() {
        return None;
    }

    let unit = unit.strip_suffix('s').unwrap_or(unit);
    let span = match unit {
        "second" | "sec" => Duration::try_seconds(amount)?,
        "minute" | "min" => Duration::try_minutes(amount)?,
        "hour" => Duration::try_hours(amount)?,
        "day" => Duration::try_days(amount)?,
        "week" => Duration::try_weeks(amount)?,
        "month" => Duration::try_days(amount.checked_mul(30)?)?,
        "year" => Duration::try_days(amount.checked_mul(365)?)?,
        _ => return None,
    };

    now.checked_sub_signed(span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_absolute_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 25).unwrap();
        let now = fixed_now();

        assert_eq!(parse_timestamp("2024-01-15T14:30:25Z", now).unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-15 14:30:25", now).unwrap(), expected);
        assert_eq!(
            parse_timestamp("2024-01-15T16:30:25+02:00", now).unwrap(),
            expected
        );
        assert_eq!(
            parse_timestamp("2024-01-15", now).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unix_seconds() {
        let parsed = parse_timestamp("@1700000000", fixed_now()).unwrap();
        assert_eq!(parsed.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_named_days() {
        let now = fixed_now();
        assert_eq!(parse_timestamp("now", now).unwrap(), now);
        assert_eq!(
            parse_timestamp("today", now).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("Yesterday", now).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_relative_phrases() {
        let now = fixed_now();
        assert_eq!(
            parse_timestamp("2 weeks ago", now).unwrap(),
            now - Duration::weeks(2)
        );
        assert_eq!(
            parse_timestamp("1 hour ago", now).unwrap(),
            now - Duration::hours(1)
        );
        assert_eq!(
            parse_timestamp("3.days.ago", now).unwrap(),
            now - Duration::days(3)
        );
        assert_eq!(
            parse_timestamp("1 month ago", now).unwrap(),
            now - Duration::days(30)
        );
    }

    #[test]
    fn test_rejects_garbage() {
        let now = fixed_now();
        for input in ["", "last tuesday", "2 fortnights ago", "3 days", "@abc", "2024-13-40"] {
            assert!(
                matches!(parse_timestamp(input, now), Err(GitError::InvalidTimestamp(_))),
                "expected rejection for {:?}",
                input
            );
        }
    }
}
