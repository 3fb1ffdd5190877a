//! Field-cascade search of the next matching minute.
//!
//! The search works on wall-clock values only, mapping to a particular offset is up to the caller.
use crate::{
    calendar::{days_in_month, MonthContext},
    field::{FieldKind, ValueType, MAX_YEAR, MIN_YEAR},
    Expression,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, trace};

/// Maximum number of cursor advances spent on a single occurrence.
pub(crate) const MAX_SEARCH_STEPS: usize = 500_000;

/// Wall-clock position of the search, always a valid calendar minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Cursor {
    year: ValueType,
    month: ValueType,
    day: ValueType,
    hour: ValueType,
    minute: ValueType,
}

impl Cursor {
    #[inline]
    fn start_of_year(year: ValueType) -> Self {
        Self {
            year,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
        }
    }

    /// Returns the first whole minute after `time`.
    ///
    /// Times before the minimal year start from its first minute, times after the maximal year have no cursor.
    pub(crate) fn after(time: &NaiveDateTime) -> Option<Self> {
        let year = time.year();
        if year < MIN_YEAR as i32 {
            return Some(Self::start_of_year(MIN_YEAR));
        }
        if year > MAX_YEAR as i32 {
            return None;
        }

        let cursor = Self {
            year: year as ValueType,
            month: time.month() as ValueType,
            day: time.day() as ValueType,
            hour: time.hour() as ValueType,
            minute: time.minute() as ValueType,
        };
        cursor.next_minute()
    }

    /// Converts cursor into wall-clock time.
    pub(crate) fn to_naive(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?
            .and_hms_opt(self.hour as u32, self.minute as u32, 0)
    }

    /// Moves to the beginning of the next year.
    pub(crate) fn next_year(self) -> Option<Self> {
        if self.year < MAX_YEAR {
            Some(Self::start_of_year(self.year + 1))
        } else {
            trace!(year = self.year, "search reached the last supported year");
            None
        }
    }

    /// Moves to the beginning of the next month.
    pub(crate) fn next_month(self) -> Option<Self> {
        if self.month < 12 {
            Some(Self {
                month: self.month + 1,
                day: 1,
                hour: 0,
                minute: 0,
                ..self
            })
        } else {
            self.next_year()
        }
    }

    /// Moves to the beginning of the next day.
    pub(crate) fn next_day(self) -> Option<Self> {
        if self.day < days_in_month(self.year, self.month) {
            Some(Self {
                day: self.day + 1,
                hour: 0,
                minute: 0,
                ..self
            })
        } else {
            self.next_month()
        }
    }

    /// Moves to the beginning of the next hour.
    pub(crate) fn next_hour(self) -> Option<Self> {
        if self.hour < 23 {
            Some(Self {
                hour: self.hour + 1,
                minute: 0,
                ..self
            })
        } else {
            self.next_day()
        }
    }

    /// Moves to the next minute.
    pub(crate) fn next_minute(self) -> Option<Self> {
        if self.minute < 59 {
            Some(Self {
                minute: self.minute + 1,
                ..self
            })
        } else {
            self.next_hour()
        }
    }
}

/// Finds the first minute at or after `start` which matches all fields of the `expression`.
///
/// Returns `None` if the expression has no more matches till the end of the maximal year
/// or if the step budget is exhausted.
#[inline]
pub(crate) fn next_occurrence(expression: &Expression, start: Cursor) -> Option<Cursor> {
    next_occurrence_within(expression, start, MAX_SEARCH_STEPS)
}

/// Same as [`next_occurrence`] with at most `max_steps` cursor advances.
fn next_occurrence_within(
    expression: &Expression,
    start: Cursor,
    max_steps: usize,
) -> Option<Cursor> {
    let year = expression.field(FieldKind::Year);
    let month = expression.field(FieldKind::Month);
    let hour = expression.field(FieldKind::Hour);
    let minute = expression.field(FieldKind::Minute);
    let (day_kind, day) = expression.day_rule();

    let mut cursor = start;
    for _ in 0..max_steps {
        let ctx = MonthContext::new(cursor.year, cursor.month);

        if !year.matches(FieldKind::Year, cursor.year, &ctx) {
            cursor = match year.next_match(FieldKind::Year, cursor.year + 1, MAX_YEAR, &ctx) {
                Some(y) => Cursor::start_of_year(y),
                None => {
                    trace!(%expression, "no more matching years");
                    return None;
                }
            };
            continue;
        }

        if !month.matches(FieldKind::Month, cursor.month, &ctx) {
            cursor = match month.next_match(FieldKind::Month, cursor.month + 1, 12, &ctx) {
                Some(m) => Cursor {
                    month: m,
                    day: 1,
                    hour: 0,
                    minute: 0,
                    ..cursor
                },
                None => cursor.next_year()?,
            };
            continue;
        }

        if !day.matches(day_kind, cursor.day, &ctx) {
            cursor = match day.next_match(day_kind, cursor.day + 1, ctx.last_day(), &ctx) {
                Some(d) => Cursor {
                    day: d,
                    hour: 0,
                    minute: 0,
                    ..cursor
                },
                None => cursor.next_month()?,
            };
            continue;
        }

        if !hour.matches(FieldKind::Hour, cursor.hour, &ctx) {
            cursor = match hour.next_match(FieldKind::Hour, cursor.hour + 1, 23, &ctx) {
                Some(h) => Cursor {
                    hour: h,
                    minute: 0,
                    ..cursor
                },
                None => cursor.next_day()?,
            };
            continue;
        }

        if !minute.matches(FieldKind::Minute, cursor.minute, &ctx) {
            cursor = match minute.next_match(FieldKind::Minute, cursor.minute + 1, 59, &ctx) {
                Some(m) => Cursor { minute: m, ..cursor },
                None => cursor.next_hour()?,
            };
            continue;
        }

        return Some(cursor);
    }

    debug!(
        %expression,
        ?start,
        steps = max_steps,
        "search step budget is exhausted"
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    fn cursor(year: ValueType, month: ValueType, day: ValueType, hour: ValueType, minute: ValueType) -> Cursor {
        Cursor {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    fn naive(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").unwrap()
    }

    #[test]
    fn test_next_year() {
        assert_eq!(cursor(2024, 5, 6, 7, 8).next_year(), Some(cursor(2025, 1, 1, 0, 0)));
        assert_eq!(cursor(MAX_YEAR, 1, 1, 0, 0).next_year(), None);
    }

    #[test]
    fn test_next_month() {
        assert_eq!(cursor(2024, 1, 31, 7, 8).next_month(), Some(cursor(2024, 2, 1, 0, 0)));
        assert_eq!(cursor(2024, 12, 1, 0, 0).next_month(), Some(cursor(2025, 1, 1, 0, 0)));
        assert_eq!(cursor(MAX_YEAR, 12, 1, 0, 0).next_month(), None);
    }

    #[test]
    fn test_next_day() {
        assert_eq!(cursor(2024, 1, 1, 23, 59).next_day(), Some(cursor(2024, 1, 2, 0, 0)));
        assert_eq!(cursor(2024, 1, 31, 0, 0).next_day(), Some(cursor(2024, 2, 1, 0, 0)));
        assert_eq!(cursor(2024, 2, 28, 0, 0).next_day(), Some(cursor(2024, 2, 29, 0, 0)));
        assert_eq!(cursor(2023, 2, 28, 0, 0).next_day(), Some(cursor(2023, 3, 1, 0, 0)));
        assert_eq!(cursor(2024, 12, 31, 5, 5).next_day(), Some(cursor(2025, 1, 1, 0, 0)));
        assert_eq!(cursor(MAX_YEAR, 12, 31, 0, 0).next_day(), None);
    }

    #[test]
    fn test_next_hour_and_minute() {
        assert_eq!(cursor(2024, 1, 1, 10, 30).next_hour(), Some(cursor(2024, 1, 1, 11, 0)));
        assert_eq!(cursor(2024, 1, 1, 23, 30).next_hour(), Some(cursor(2024, 1, 2, 0, 0)));
        assert_eq!(cursor(2024, 1, 1, 10, 30).next_minute(), Some(cursor(2024, 1, 1, 10, 31)));
        assert_eq!(cursor(2024, 1, 1, 10, 59).next_minute(), Some(cursor(2024, 1, 1, 11, 0)));
        assert_eq!(cursor(2024, 12, 31, 23, 59).next_minute(), Some(cursor(2025, 1, 1, 0, 0)));
        assert_eq!(cursor(MAX_YEAR, 12, 31, 23, 59).next_minute(), None);
    }

    #[rstest]
    #[case("2024-01-01T00:00:00", Some(cursor(2024, 1, 1, 0, 1)))]
    #[case("2024-01-01T11:59:59.999", Some(cursor(2024, 1, 1, 12, 0)))]
    #[case("2024-01-01T12:00:30", Some(cursor(2024, 1, 1, 12, 1)))]
    #[case("2024-02-29T23:59:00", Some(cursor(2024, 3, 1, 0, 0)))]
    #[case("1969-12-31T23:59:00", Some(cursor(1970, 1, 1, 0, 0)))]
    #[case("1900-06-15T10:00:00", Some(cursor(1970, 1, 1, 0, 0)))]
    #[case("2199-12-31T23:58:00", Some(cursor(2199, 12, 31, 23, 59)))]
    #[case("2199-12-31T23:59:00", None)]
    #[case("2200-01-01T00:00:00", None)]
    fn test_cursor_after(#[case] time: &str, #[case] expected: Option<Cursor>) {
        assert_eq!(Cursor::after(&naive(time)), expected, "time = {time}");
    }

    #[test]
    fn test_to_naive() {
        assert_eq!(
            cursor(2024, 2, 29, 13, 45).to_naive(),
            Some(naive("2024-02-29T13:45:00"))
        );
    }

    #[rstest]
    #[case("0 12 * * ? *", cursor(2024, 1, 1, 0, 1), Some(cursor(2024, 1, 1, 12, 0)))]
    #[case("0 12 * * ? *", cursor(2024, 1, 1, 12, 0), Some(cursor(2024, 1, 1, 12, 0)))]
    #[case("0 12 * * ? *", cursor(2024, 1, 1, 12, 1), Some(cursor(2024, 1, 2, 12, 0)))]
    #[case("*/20 * * * ? *", cursor(2024, 1, 1, 23, 41), Some(cursor(2024, 1, 2, 0, 0)))]
    #[case("0 0 L * ? *", cursor(2024, 2, 1, 0, 0), Some(cursor(2024, 2, 29, 0, 0)))]
    #[case("0 0 ? * 6L *", cursor(2024, 1, 27, 0, 0), Some(cursor(2024, 2, 23, 0, 0)))]
    #[case("0 0 29 2 ? *", cursor(2024, 3, 1, 0, 0), Some(cursor(2028, 2, 29, 0, 0)))]
    #[case("0 0 1 1 ? 2100", cursor(2024, 3, 1, 0, 0), Some(cursor(2100, 1, 1, 0, 0)))]
    #[case("0 0 1 1 ? 2024", cursor(2024, 1, 1, 0, 1), None)]
    #[case("0 0 30 2 ? *", cursor(2024, 1, 1, 0, 0), None)]
    #[case("0 0 31 12 ? *", cursor(2199, 12, 31, 0, 1), None)]
    #[timeout(Duration::from_secs(1))]
    fn test_next_occurrence(#[case] expression: &str, #[case] start: Cursor, #[case] expected: Option<Cursor>) {
        let expression = Expression::new(expression).unwrap();
        assert_eq!(
            next_occurrence(&expression, start),
            expected,
            "expression = {expression}, start = {start:?}"
        );
    }

    #[test]
    fn test_step_budget_ends_search() {
        // From January, the 15th of May needs a month jump to May and a day jump to the 15th.
        let expression = Expression::new("0 0 15 5 ? *").unwrap();
        let start = cursor(2024, 1, 1, 0, 0);
        let expected = cursor(2024, 5, 15, 0, 0);

        assert_eq!(next_occurrence_within(&expression, start, 1), None);
        assert_eq!(next_occurrence_within(&expression, start, 2), None);
        assert_eq!(next_occurrence_within(&expression, start, 3), Some(expected));
        assert_eq!(next_occurrence(&expression, start), Some(expected));
        assert_eq!(next_occurrence_within(&expression, start, 0), None);
    }
}
