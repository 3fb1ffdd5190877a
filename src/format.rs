use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Layout of a rendered instant, i.e. `Fri, 05 Jan 2024 10:15:00`.
///
/// Wall-clock time in the instant's own offset, the offset itself isn't rendered.
pub const SCHEDULE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// Renders single instant using [`SCHEDULE_FORMAT`].
pub fn format_instant<Tz: TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    instant.format(SCHEDULE_FORMAT).to_string()
}

/// Renders each instant of the schedule, preserving order.
pub fn format_schedule<Tz: TimeZone>(schedule: &[DateTime<Tz>]) -> Vec<String>
where
    Tz::Offset: Display,
{
    schedule.iter().map(format_instant).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use rstest::rstest;

    #[rstest]
    #[case("2024-01-05T10:15:00Z", "Fri, 05 Jan 2024 10:15:00")]
    #[case("2024-02-29T00:00:00Z", "Thu, 29 Feb 2024 00:00:00")]
    #[case("1970-01-01T00:00:00Z", "Thu, 01 Jan 1970 00:00:00")]
    #[case("2199-12-31T23:59:00Z", "Tue, 31 Dec 2199 23:59:00")]
    #[case("2024-06-03T09:05:00+09:00", "Mon, 03 Jun 2024 09:05:00")]
    fn test_format_instant(#[case] instant: &str, #[case] expected: &str) {
        let instant = DateTime::parse_from_rfc3339(instant).unwrap();
        assert_eq!(format_instant(&instant), expected);
    }

    #[test]
    fn test_format_schedule() {
        let schedule = vec![
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap(),
        ];
        assert_eq!(
            format_schedule(&schedule),
            vec!["Mon, 01 Jan 2024 12:00:00", "Tue, 02 Jan 2024 12:00:00"]
        );

        let empty: Vec<DateTime<FixedOffset>> = vec![];
        assert!(format_schedule(&empty).is_empty());
    }
}
