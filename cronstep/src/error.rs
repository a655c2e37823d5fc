use thiserror::Error;

use crate::field::Field;

/// Invalid input while building constraints, expressions or schedules.
///
/// These signal configuration mistakes; nothing in the crate retries them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("invalid {field} value {value} (expected {min}..={max})")]
    OutOfRange {
        field: Field,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("invalid interval: lower bound {lo} is above upper bound {hi}")]
    InvertedInterval { lo: i32, hi: i32 },

    #[error("invalid step {0}: must be at least 1")]
    InvalidStep(i32),

    #[error("a value list needs at least one value")]
    EmptySet,

    #[error("a schedule needs at least one instant")]
    EmptySchedule,

    #[error("instant #{index} is not later than the one before it")]
    NonIncreasing { index: usize },

    #[error("instant arithmetic overflowed: {0}")]
    Overflow(#[source] jiff::Error),
}

/// Terminal condition reported by an advancing cursor or schedule.
///
/// Once returned, every further advance reports the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum OccurrenceError {
    /// The expression has no further occurrence (unsatisfiable within the
    /// 400-year search window, exhausted, or it would move backwards).
    #[error("outdated or invalid cron expression")]
    OutdatedOrInvalid,

    /// A schedule ran out of literal instants and has no continuation.
    #[error("outdated schedule")]
    Outdated,

    /// The next occurrence falls in a year the datetime library cannot represent.
    #[error("next occurrence in year {year} is outside the supported datetime range")]
    Unrepresentable { year: i32 },
}
