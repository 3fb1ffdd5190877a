//! Calendar arithmetic used by field matching and the occurrence search.
use crate::field::ValueType;

/// Day of week number of Sunday.
pub(crate) const SUNDAY: ValueType = 1;
/// Day of week number of Saturday.
pub(crate) const SATURDAY: ValueType = 7;

/// Returns `true` if provided year is leap.
#[inline]
pub(crate) fn is_leap_year(year: ValueType) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns number of days in specified month.
pub(crate) fn days_in_month(year: ValueType, month: ValueType) -> ValueType {
    if month == 0 || month > 12 {
        panic!("Invalid month: {month}");
    }

    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => unreachable!(),
    }
}

/// Calculates day of week for specified date: `1` is Sunday, `7` is Saturday.
pub(crate) fn day_of_week(year: ValueType, month: ValueType, day: ValueType) -> ValueType {
    if day == 0 || month == 0 || month > 12 || day > days_in_month(year, month) {
        panic!("Invalid date: {year:04}-{month:02}-{day:02}");
    }

    let month_offset: ValueType = if is_leap_year(year) {
        [0, 3, 4, 0, 2, 5, 0, 3, 6, 1, 4, 6]
    } else {
        [0, 3, 3, 6, 1, 4, 6, 2, 5, 0, 3, 5]
    }[(month - 1) as usize];

    let year = year - 1;

    (day + month_offset + 5 * (year % 4) + 4 * (year % 100) + 6 * (year % 400)) % 7 + 1
}

/// Calendar facts about a single month, everything a day-level matcher needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonthContext {
    last_day: ValueType,
    first_weekday: ValueType,
}

impl MonthContext {
    pub(crate) fn new(year: ValueType, month: ValueType) -> Self {
        Self {
            last_day: days_in_month(year, month),
            first_weekday: day_of_week(year, month, 1),
        }
    }

    /// Number of the last day in the month.
    #[inline]
    pub(crate) fn last_day(&self) -> ValueType {
        self.last_day
    }

    /// Day of week of the specified day in the month.
    #[inline]
    pub(crate) fn weekday(&self, day: ValueType) -> ValueType {
        (self.first_weekday + day - 2) % 7 + 1
    }

    /// Returns the weekday (not Sunday or Saturday) nearest to the specified day in the same month.
    ///
    /// `None` if the month has no such day at all.
    pub(crate) fn nearest_weekday(&self, day: ValueType) -> Option<ValueType> {
        if day == 0 || day > self.last_day {
            return None;
        }

        let nearest = match self.weekday(day) {
            SUNDAY if day == self.last_day => day - 2,
            SUNDAY => day + 1,
            SATURDAY if day == 1 => day + 2,
            SATURDAY => day - 1,
            _ => day,
        };

        Some(nearest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    // Test leap years divisible by 4 but not 100
    #[case(2024, true)]
    #[case(1996, true)]
    // Test leap years divisible by 400
    #[case(2000, true)]
    #[case(1600, true)]
    // Test non-leap years not divisible by 4
    #[case(2023, false)]
    #[case(2021, false)]
    // Test non-leap years divisible by 100 but not 400
    #[case(1900, false)]
    #[case(2100, false)]
    fn test_is_leap_year(#[case] year: ValueType, #[case] expected: bool) {
        assert_eq!(
            is_leap_year(year),
            expected,
            "{year:} is {}",
            if expected { "leap" } else { "not-leap" }
        );
    }

    #[rstest]
    #[case(2023, 1, 31)]
    #[case(2023, 4, 30)]
    #[case(2023, 6, 30)]
    #[case(2023, 9, 30)]
    #[case(2023, 11, 30)]
    #[case(2023, 12, 31)]
    #[case(2023, 2, 28)]
    #[case(2024, 2, 29)]
    #[case(2000, 2, 29)]
    #[case(2100, 2, 28)]
    #[case(2196, 2, 29)]
    fn test_days_in_month(#[case] y: ValueType, #[case] m: ValueType, #[case] expected: ValueType) {
        assert_eq!(days_in_month(y, m), expected, "{y:04}-{m:02} has {expected} days");
    }

    #[rstest]
    #[case(2023, 0)]
    #[case(2023, 13)]
    #[should_panic(expected = "Invalid month")]
    fn test_days_in_month_invalid(#[case] y: ValueType, #[case] m: ValueType) {
        days_in_month(y, m);
    }

    #[rstest]
    #[case(2023, 12, 25, 2)] // Monday
    #[case(2024, 1, 1, 2)] // Monday
    #[case(2025, 1, 1, 4)] // Wednesday
    #[case(2024, 2, 29, 5)] // Thursday
    #[case(2023, 1, 1, 1)] // Sunday
    #[case(2000, 1, 1, 7)] // Saturday
    #[case(1970, 1, 1, 5)] // Thursday
    #[case(2024, 6, 1, 7)] // Saturday
    #[case(2024, 3, 31, 1)] // Sunday
    #[case(2100, 1, 1, 6)] // Friday
    #[case(2199, 12, 31, 3)] // Tuesday
    fn test_day_of_week(#[case] y: ValueType, #[case] m: ValueType, #[case] d: ValueType, #[case] expected: ValueType) {
        assert_eq!(
            day_of_week(y, m, d),
            expected,
            "date {y}-{m:02}-{d:02}, should be {expected}"
        );
    }

    #[rstest]
    #[case(2023, 2, 29)]
    #[case(2024, 0, 1)]
    #[case(2023, 13, 22)]
    #[case(2025, 1, 0)]
    #[case(2023, 4, 31)]
    #[should_panic(expected = "Invalid date: ")]
    fn test_day_of_week_invalid_date(#[case] y: ValueType, #[case] m: ValueType, #[case] d: ValueType) {
        day_of_week(y, m, d);
    }

    #[test]
    fn test_month_context_weekdays_follow_calendar() {
        for (year, month) in [(2023, 2), (2024, 2), (2024, 3), (1999, 12), (2199, 12)] {
            let ctx = MonthContext::new(year, month);
            assert_eq!(ctx.last_day(), days_in_month(year, month));
            for day in 1..=ctx.last_day() {
                assert_eq!(
                    ctx.weekday(day),
                    day_of_week(year, month, day),
                    "{year:04}-{month:02}-{day:02}"
                );
            }
        }
    }

    #[rstest]
    #[case(2024, 1, 1, Some(1))] // Monday
    #[case(2024, 1, 5, Some(5))] // Friday
    #[case(2024, 1, 6, Some(5))] // Saturday -> Friday
    #[case(2024, 1, 7, Some(8))] // Sunday -> Monday
    #[case(2024, 6, 1, Some(3))] // Saturday the 1st -> Monday the 3rd
    #[case(2024, 6, 15, Some(14))] // Saturday -> Friday
    #[case(2024, 6, 30, Some(28))] // Sunday, last day -> Friday
    #[case(2024, 9, 1, Some(2))] // Sunday the 1st -> Monday
    #[case(2024, 3, 31, Some(29))] // Sunday, last day -> Friday
    #[case(2024, 8, 31, Some(30))] // Saturday, last day -> Friday
    #[case(2024, 2, 29, Some(29))] // Thursday
    #[case(2024, 4, 31, None)]
    #[case(2023, 2, 29, None)]
    #[case(2024, 1, 0, None)]
    fn test_nearest_weekday(
        #[case] y: ValueType,
        #[case] m: ValueType,
        #[case] d: ValueType,
        #[case] expected: Option<ValueType>,
    ) {
        assert_eq!(
            MonthContext::new(y, m).nearest_weekday(d),
            expected,
            "nearest weekday to {y}-{m:02}-{d:02}"
        );
    }
}
