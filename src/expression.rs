use crate::{
    calendar::MonthContext,
    field::{CronField, FieldKind, ValueType, MAX_YEAR, MIN_YEAR},
    search::{self, Cursor},
    CronError, Result,
};
use chrono::{DateTime, Datelike, TimeZone, Timelike};
use std::{fmt::Display, str::FromStr};

/// Parsed and validated AWS cron expression.
///
/// For the expression format and usage examples, please refer to the [crate documentation](crate).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
#[cfg_attr(feature = "serde", serde(into = "String"))]
pub struct Expression {
    minute: CronField,
    hour: CronField,
    day_of_month: CronField,
    month: CronField,
    day_of_week: CronField,
    year: CronField,
}

impl Expression {
    /// Parses and validates provided `expression` and constructs [`Expression`] instance.
    ///
    /// Alternative way to construct [`Expression`] is to use one of `try_from` or `from_str` methods.
    ///
    /// Returns [`CronError`] in a case provided expression is unparsable or has format errors.
    pub fn new(expression: impl Into<String>) -> Result<Self> {
        let expression = expression.into();
        let fields: Vec<&str> = expression.split_whitespace().collect();

        if fields.len() != 6 {
            let found = fields.len();
            return Err(CronError::InvalidFieldCount { expression, found });
        }

        let parsed = Self {
            minute: CronField::parse(FieldKind::Minute, fields[0])?,
            hour: CronField::parse(FieldKind::Hour, fields[1])?,
            day_of_month: CronField::parse(FieldKind::DayOfMonth, fields[2])?,
            month: CronField::parse(FieldKind::Month, fields[3])?,
            day_of_week: CronField::parse(FieldKind::DayOfWeek, fields[4])?,
            year: CronField::parse(FieldKind::Year, fields[5])?,
        };

        // Exactly one of the day fields should be unspecified.
        match (&parsed.day_of_month, &parsed.day_of_week) {
            (CronField::Unspecified, CronField::Unspecified) => Err(CronError::InvalidDaysPattern(expression)),
            (CronField::Unspecified, _) | (_, CronField::Unspecified) => Ok(parsed),
            (_, _) => Err(CronError::InvalidDaysPattern(expression)),
        }
    }

    /// Returns parsed field of the specified kind.
    pub fn field(&self, kind: FieldKind) -> &CronField {
        match kind {
            FieldKind::Minute => &self.minute,
            FieldKind::Hour => &self.hour,
            FieldKind::DayOfMonth => &self.day_of_month,
            FieldKind::Month => &self.month,
            FieldKind::DayOfWeek => &self.day_of_week,
            FieldKind::Year => &self.year,
        }
    }

    /// Day field which selects days: the one which isn't `?`.
    pub(crate) fn day_rule(&self) -> (FieldKind, &CronField) {
        if self.day_of_month == CronField::Unspecified {
            (FieldKind::DayOfWeek, &self.day_of_week)
        } else {
            (FieldKind::DayOfMonth, &self.day_of_month)
        }
    }

    /// Checks whether the wall-clock minute of `instant` matches the expression.
    ///
    /// Seconds and fractions of seconds are ignored.
    pub fn matches<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        let local = instant.naive_local();
        let Ok(year) = ValueType::try_from(local.year()) else {
            return false;
        };
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return false;
        }

        let month = local.month() as ValueType;
        let ctx = MonthContext::new(year, month);
        let (day_kind, day) = self.day_rule();

        self.year.matches(FieldKind::Year, year, &ctx)
            && self.month.matches(FieldKind::Month, month, &ctx)
            && day.matches(day_kind, local.day() as ValueType, &ctx)
            && self.hour.matches(FieldKind::Hour, local.hour() as ValueType, &ctx)
            && self.minute.matches(FieldKind::Minute, local.minute() as ValueType, &ctx)
    }

    /// Returns time of the upcoming event strictly after the provided `current` value.
    ///
    /// The expression is evaluated in the offset of `current`, and the result has the same timezone.
    /// Returns `None` if there are no more events before the end of the maximal year.
    pub fn upcoming<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = current.timezone();
        let mut cursor = Cursor::after(&current.naive_local())?;

        loop {
            let found = search::next_occurrence(self, cursor)?;
            let next = found
                .to_naive()
                .and_then(|naive| tz.from_local_datetime(&naive).earliest());

            match next {
                Some(next) if next > *current => return Some(next),
                // Non-existent local time or one which isn't after `current`.
                _ => cursor = found.next_minute()?,
            }
        }
    }

    /// Returns up to `count` upcoming events after `current`, in ascending order.
    ///
    /// Fewer events are returned if the expression runs out of matches.
    pub fn next_n<Tz: TimeZone>(&self, current: &DateTime<Tz>, count: usize) -> Vec<DateTime<Tz>> {
        self.iter(current).take(count).collect()
    }

    /// Returns iterator of events after `current`.
    #[inline]
    pub fn iter<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> impl Iterator<Item = DateTime<Tz>> {
        ExpressionIterator {
            expression: self.clone(),
            next: self.upcoming(current),
        }
    }

    /// Consumes [`Expression`] and returns iterator of events after `current`.
    #[inline]
    pub fn into_iter<Tz: TimeZone>(self, current: &DateTime<Tz>) -> impl Iterator<Item = DateTime<Tz>> {
        let next = self.upcoming(current);
        ExpressionIterator { expression: self, next }
    }
}

/// Contains iterator state.
#[derive(Debug, Clone)]
struct ExpressionIterator<Tz: TimeZone> {
    expression: Expression,
    next: Option<DateTime<Tz>>,
}

impl<Tz: TimeZone> Iterator for ExpressionIterator<Tz> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = self.expression.upcoming(&current);
        Some(current)
    }
}

impl From<Expression> for String {
    fn from(value: Expression) -> Self {
        value.to_string()
    }
}

impl From<&Expression> for String {
    fn from(value: &Expression) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Expression {
    type Error = CronError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&String> for Expression {
    type Error = CronError;

    fn try_from(value: &String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Expression {
    type Error = CronError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for Expression {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week, self.year
        )
    }
}
