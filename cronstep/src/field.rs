use std::fmt;

use crate::constraint::{DiscreteSet, FieldConstraint, Interval};
use crate::error::ConstraintError;

/// One of the eight temporal units an expression constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    /// Day of the week, 0 = Sunday through 6 = Saturday.
    Weekday,
    Month,
    Year,
}

impl Field {
    /// All fields, finest first.
    pub const ALL: [Field; 8] = [
        Field::Millisecond,
        Field::Second,
        Field::Minute,
        Field::Hour,
        Field::Day,
        Field::Weekday,
        Field::Month,
        Field::Year,
    ];

    /// Smallest admissible value.
    pub fn min(self) -> i32 {
        match self {
            Self::Millisecond | Self::Second | Self::Minute | Self::Hour | Self::Weekday => 0,
            Self::Day | Self::Month => 1,
            Self::Year => 1970,
        }
    }

    /// Largest admissible value.
    pub fn max(self) -> i32 {
        match self {
            Self::Millisecond => 999,
            Self::Second | Self::Minute => 59,
            Self::Hour => 23,
            Self::Day => 31,
            Self::Weekday => 6,
            Self::Month => 12,
            Self::Year => 200_000_000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Millisecond => "millisecond",
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Weekday => "weekday",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Coarseness: day and weekday share a level.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Self::Millisecond => 0,
            Self::Second => 1,
            Self::Minute => 2,
            Self::Hour => 3,
            Self::Day | Self::Weekday => 4,
            Self::Month => 5,
            Self::Year => 6,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Reject `value` if it lies outside this field's domain.
    pub fn check(self, value: i32) -> Result<i32, ConstraintError> {
        if value < self.min() || value > self.max() {
            return Err(ConstraintError::OutOfRange {
                field: self,
                value,
                min: self.min(),
                max: self.max(),
            });
        }
        Ok(value)
    }

    /// A single admissible value.
    pub fn fixed(self, value: i32) -> Result<FieldConstraint, ConstraintError> {
        Ok(FieldConstraint::Fixed(self.check(value)?))
    }

    /// Every value from `lo` to `hi`, both inclusive.
    pub fn between(self, lo: i32, hi: i32) -> Result<Interval, ConstraintError> {
        Interval::new(self.check(lo)?, self.check(hi)?)
    }

    /// The listed values, in any order.
    pub fn list<I>(self, values: I) -> Result<DiscreteSet, ConstraintError>
    where
        I: IntoIterator<Item = i32>,
    {
        let values = values
            .into_iter()
            .map(|v| self.check(v))
            .collect::<Result<Vec<_>, _>>()?;
        DiscreteSet::new(values)
    }

    /// The whole domain of this field.
    pub fn full(self) -> FieldConstraint {
        FieldConstraint::Interval(Interval::full(self.min(), self.max()))
    }

    /// Ensure every value `constraint` can produce lies within this field's domain.
    pub(crate) fn check_constraint(
        self,
        constraint: &FieldConstraint,
    ) -> Result<(), ConstraintError> {
        self.check(constraint.first())?;
        self.check(constraint.last())?;
        Ok(())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
