use crate::field::FieldKind;
use thiserror::Error;

/// Crate specific Errors implementation.
///
/// All errors are produced while parsing an expression, the occurrence search itself never fails.
#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum CronError {
    /// Expression doesn't consist of exactly six fields.
    #[error("invalid expression, expected 6 fields but found {found}: {expression}")]
    InvalidFieldCount {
        /// The whole expression text.
        expression: String,
        /// Number of whitespace separated fields found.
        found: usize,
    },
    /// Malformed or out of range value.
    #[error("invalid {field} value: {value}")]
    InvalidValue {
        /// Field where the error was found.
        field: FieldKind,
        /// Offending text.
        value: String,
    },
    /// Range with malformed bounds or with start greater than end.
    #[error("invalid {field} range: {value}")]
    InvalidRange {
        /// Field where the error was found.
        field: FieldKind,
        /// Offending text.
        value: String,
    },
    /// Repeating pattern with malformed base or increment.
    #[error("invalid {field} repeating pattern: {value}")]
    InvalidStep {
        /// Field where the error was found.
        field: FieldKind,
        /// Offending text.
        value: String,
    },
    /// Special form (`?`, `L`, `W`, `#`) used in a field which doesn't support it.
    #[error("{value} is not allowed in the {field} field")]
    UnsupportedForm {
        /// Field where the error was found.
        field: FieldKind,
        /// Offending text.
        value: String,
    },
    /// Both or neither of day-of-month and day-of-week are `?`.
    #[error("invalid days pattern, exactly one of day-of-month or day-of-week should be '?': {0}")]
    InvalidDaysPattern(String),
}

/// Coarse classification of [`CronError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    /// Wrong number of fields.
    FieldCount,
    /// Unrecognized text, value out of range or invalid operands.
    Syntax,
    /// Special form used in a field that doesn't support it.
    FormRestriction,
    /// Day-of-month and day-of-week exclusivity is violated.
    CrossFieldInvariant,
}

impl CronError {
    /// Returns the class of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFieldCount { .. } => ErrorKind::FieldCount,
            Self::InvalidValue { .. } | Self::InvalidRange { .. } | Self::InvalidStep { .. } => ErrorKind::Syntax,
            Self::UnsupportedForm { .. } => ErrorKind::FormRestriction,
            Self::InvalidDaysPattern(_) => ErrorKind::CrossFieldInvariant,
        }
    }

    /// Field the error refers to, if it's bound to a single field.
    pub fn field(&self) -> Option<FieldKind> {
        match self {
            Self::InvalidValue { field, .. }
            | Self::InvalidRange { field, .. }
            | Self::InvalidStep { field, .. }
            | Self::UnsupportedForm { field, .. } => Some(*field),
            Self::InvalidFieldCount { .. } | Self::InvalidDaysPattern(_) => None,
        }
    }

    /// Offending part of the expression: a field item or the whole expression.
    pub fn value(&self) -> &str {
        match self {
            Self::InvalidFieldCount { expression, .. } | Self::InvalidDaysPattern(expression) => expression,
            Self::InvalidValue { value, .. }
            | Self::InvalidRange { value, .. }
            | Self::InvalidStep { value, .. }
            | Self::UnsupportedForm { value, .. } => value,
        }
    }
}
