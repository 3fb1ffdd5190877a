use crate::{calendar::MonthContext, CronError, Result};
use std::fmt::Display;

/// Minimum valid year.
pub const MIN_YEAR: u16 = 1970;
/// Maximum valid year.
pub const MAX_YEAR: u16 = 2199;

pub(crate) type ValueType = u16;

/// Position of a field in the cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKind {
    /// Minutes, `0-59`.
    Minute = 0,
    /// Hours, `0-23`.
    Hour = 1,
    /// Days of month, `1-31`.
    DayOfMonth = 2,
    /// Months, `1-12` or `JAN-DEC`.
    Month = 3,
    /// Days of week, `1-7` or `SUN-SAT`.
    DayOfWeek = 4,
    /// Years, `1970-2199`.
    Year = 5,
}

impl FieldKind {
    /// All kinds in the order they appear in the expression.
    pub const ALL: [FieldKind; 6] = [
        Self::Minute,
        Self::Hour,
        Self::DayOfMonth,
        Self::Month,
        Self::DayOfWeek,
        Self::Year,
    ];

    const DAYS_OF_WEEK: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
    const MONTHS: [&str; 12] = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];

    /// Zero-based position of the field in the expression.
    #[inline]
    pub fn position(self) -> usize {
        self as usize
    }

    /// Inclusive range of legal values.
    pub fn min_max(self) -> (u16, u16) {
        match self {
            Self::Minute => (0, 59),
            Self::Hour => (0, 23),
            Self::DayOfMonth => (1, 31),
            Self::Month => (1, 12),
            Self::DayOfWeek => (1, 7),
            Self::Year => (MIN_YEAR, MAX_YEAR),
        }
    }

    #[inline]
    fn is_day(self) -> bool {
        matches!(self, Self::DayOfMonth | Self::DayOfWeek)
    }

    fn parse_value(self, input: &str) -> Result<ValueType> {
        let (min, max) = self.min_max();
        let value = match self {
            Self::Month => parse_digital_value(input, min, max)
                .or_else(|| parse_string_value(input, &Self::MONTHS).map(|v| v + 1)),
            Self::DayOfWeek => parse_digital_value(input, min, max)
                .or_else(|| parse_string_value(input, &Self::DAYS_OF_WEEK).map(|v| v + 1)),
            Self::Minute | Self::Hour | Self::DayOfMonth | Self::Year => parse_digital_value(input, min, max),
        };

        value.ok_or_else(|| CronError::InvalidValue {
            field: self,
            value: input.to_owned(),
        })
    }

    fn unsupported(self, input: &str) -> CronError {
        CronError::UnsupportedForm {
            field: self,
            value: input.to_owned(),
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::DayOfMonth => "day-of-month",
            Self::Month => "month",
            Self::DayOfWeek => "day-of-week",
            Self::Year => "year",
        };
        f.write_str(name)
    }
}

/// Parsed rule of a single expression field.
///
/// Days of week are numbered from `1` (Sunday) to `7` (Saturday).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CronField {
    /// `*`: each legal value.
    Wildcard,
    /// `?`: the other day field decides.
    Unspecified,
    /// Particular value.
    Single(u16),
    /// `lo-hi`, both inclusive.
    Range(u16, u16),
    /// Two or more comma separated items.
    List(Vec<CronField>),
    /// `*/n`, `lo/n` or `lo-hi/n`.
    Step {
        /// First matching value.
        lo: u16,
        /// Upper bound, inclusive.
        hi: u16,
        /// Distance between matching values.
        increment: u16,
    },
    /// `L` in the day-of-month field.
    LastDayOfMonth,
    /// `xL` in the day-of-week field: the last such weekday of the month.
    LastWeekdayOfMonth(u16),
    /// `dW`: the weekday nearest to the day of month, within the same month.
    NearestWeekday(u16),
    /// `d#n`: the n-th such weekday of the month.
    NthWeekday {
        /// Day of week.
        weekday: u16,
        /// Occurrence number, `1-5`.
        n: u16,
    },
}

impl CronField {
    /// Parses text of a single field of the `kind` position.
    pub fn parse(kind: FieldKind, input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(CronError::InvalidValue {
                field: kind,
                value: input.to_owned(),
            });
        }

        let mut items = input
            .split(',')
            .map(|item| Self::parse_item(kind, item))
            .collect::<Result<Vec<_>>>()?;

        if items.len() > 1 && (items.contains(&Self::Wildcard) || items.contains(&Self::Unspecified)) {
            return Err(CronError::InvalidValue {
                field: kind,
                value: input.to_owned(),
            });
        }

        let field = if items.len() > 1 {
            Self::List(items)
        } else {
            items.remove(0)
        };

        Ok(field)
    }

    fn parse_item(kind: FieldKind, item: &str) -> Result<Self> {
        if item.is_empty() {
            return Err(CronError::InvalidValue {
                field: kind,
                value: item.to_owned(),
            });
        }

        if let Some((base, increment)) = item.split_once('/') {
            return Self::parse_step(kind, item, base, increment);
        }

        if let Some((lo, hi)) = item.split_once('-') {
            let (lo, hi) = parse_bounds(kind, item, lo, hi)?;
            return Ok(Self::Range(lo, hi));
        }

        if item == "*" {
            return Ok(Self::Wildcard);
        }

        if item == "?" {
            return if kind.is_day() {
                Ok(Self::Unspecified)
            } else {
                Err(kind.unsupported(item))
            };
        }

        if item.eq_ignore_ascii_case("L") {
            return if kind == FieldKind::DayOfMonth {
                Ok(Self::LastDayOfMonth)
            } else {
                Err(kind.unsupported(item))
            };
        }

        if let Some((weekday, n)) = item.split_once('#') {
            if kind != FieldKind::DayOfWeek {
                return Err(kind.unsupported(item));
            }
            let weekday = kind.parse_value(weekday)?;
            let n = parse_digital_value(n, 1, 5).ok_or_else(|| CronError::InvalidValue {
                field: kind,
                value: item.to_owned(),
            })?;
            return Ok(Self::NthWeekday { weekday, n });
        }

        // Names like JUL end with a marker letter, so plain values go first.
        let not_a_value = match kind.parse_value(item) {
            Ok(value) => return Ok(Self::Single(value)),
            Err(e) => e,
        };

        if let Some(day) = strip_marker(item, 'W') {
            if kind != FieldKind::DayOfMonth {
                return Err(kind.unsupported(item));
            }
            return Ok(Self::NearestWeekday(kind.parse_value(day)?));
        }

        if let Some(weekday) = strip_marker(item, 'L') {
            if kind != FieldKind::DayOfWeek {
                return Err(kind.unsupported(item));
            }
            return Ok(Self::LastWeekdayOfMonth(kind.parse_value(weekday)?));
        }

        Err(not_a_value)
    }

    fn parse_step(kind: FieldKind, item: &str, base: &str, increment: &str) -> Result<Self> {
        let invalid_step = || CronError::InvalidStep {
            field: kind,
            value: item.to_owned(),
        };

        let increment = parse_digital_value(increment, 1, ValueType::MAX).ok_or_else(invalid_step)?;
        let (min, max) = kind.min_max();
        let (lo, hi) = if base == "*" {
            (min, max)
        } else if let Some((lo, hi)) = base.split_once('-') {
            parse_bounds(kind, item, lo, hi)?
        } else if base.is_empty() {
            return Err(invalid_step());
        } else {
            (kind.parse_value(base)?, max)
        };

        Ok(Self::Step { lo, hi, increment })
    }

    /// Checks whether `value` satisfies the rule.
    ///
    /// For the day-of-week field the value is a day of the month described by `ctx`:
    /// plain forms compare its weekday, `L` and `#` forms use the day itself.
    pub(crate) fn matches(&self, kind: FieldKind, value: ValueType, ctx: &MonthContext) -> bool {
        let plain = if kind == FieldKind::DayOfWeek {
            ctx.weekday(value)
        } else {
            value
        };

        match self {
            Self::Wildcard | Self::Unspecified => true,
            Self::Single(v) => plain == *v,
            Self::Range(lo, hi) => (*lo..=*hi).contains(&plain),
            Self::Step { lo, hi, increment } => (*lo..=*hi).contains(&plain) && (plain - lo) % increment == 0,
            Self::List(items) => items.iter().any(|item| item.matches(kind, value, ctx)),
            Self::LastDayOfMonth => value == ctx.last_day(),
            Self::LastWeekdayOfMonth(weekday) => ctx.weekday(value) == *weekday && value + 7 > ctx.last_day(),
            Self::NearestWeekday(day) => ctx.nearest_weekday(*day) == Some(value),
            Self::NthWeekday { weekday, n } => ctx.weekday(value) == *weekday && (value - 1) / 7 + 1 == *n,
        }
    }

    /// Returns the first matching value within `from..=to`.
    #[inline]
    pub(crate) fn next_match(
        &self,
        kind: FieldKind,
        from: ValueType,
        to: ValueType,
        ctx: &MonthContext,
    ) -> Option<ValueType> {
        (from..=to).find(|value| self.matches(kind, *value, ctx))
    }
}

impl Display for CronField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wildcard => write!(f, "*"),
            Self::Unspecified => write!(f, "?"),
            Self::Single(value) => write!(f, "{value}"),
            Self::Range(lo, hi) => write!(f, "{lo}-{hi}"),
            Self::List(items) => {
                let values = items.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
                write!(f, "{values}")
            }
            Self::Step { lo, hi, increment } => write!(f, "{lo}-{hi}/{increment}"),
            Self::LastDayOfMonth => write!(f, "L"),
            Self::LastWeekdayOfMonth(weekday) => write!(f, "{weekday}L"),
            Self::NearestWeekday(day) => write!(f, "{day}W"),
            Self::NthWeekday { weekday, n } => write!(f, "{weekday}#{n}"),
        }
    }
}

fn parse_bounds(kind: FieldKind, item: &str, lo: &str, hi: &str) -> Result<(ValueType, ValueType)> {
    if lo.is_empty() || hi.is_empty() {
        return Err(CronError::InvalidRange {
            field: kind,
            value: item.to_owned(),
        });
    }

    let lo = kind.parse_value(lo)?;
    let hi = kind.parse_value(hi)?;
    if lo > hi {
        return Err(CronError::InvalidRange {
            field: kind,
            value: item.to_owned(),
        });
    }

    Ok((lo, hi))
}

/// Strips a trailing special character in any case.
fn strip_marker(input: &str, marker: char) -> Option<&str> {
    input
        .strip_suffix(marker)
        .or_else(|| input.strip_suffix(marker.to_ascii_lowercase()))
}

/// Converts string into unsigned number with bounds validation.
fn parse_digital_value(input: &str, min: ValueType, max: ValueType) -> Option<ValueType> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    input.parse::<ValueType>().ok().filter(|value| (min..=max).contains(value))
}

/// Converts string with mnemonic value representation into its zero-based index.
fn parse_string_value(input: &str, values: &[&str]) -> Option<ValueType> {
    if input.is_empty() {
        None
    } else {
        values
            .iter()
            .position(|x| x.eq_ignore_ascii_case(input))
            .map(|i| i as ValueType)
    }
}
