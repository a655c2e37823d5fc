//! Per-field value constraints.
//!
//! Every constraint answers the same two questions: "what is the next
//! admissible value from here" and "is this value admissible". Constraints
//! are stateless and immutable once built.

use crate::error::ConstraintError;

/// Values from `lo` to `hi` (inclusive) on the lattice `lo, lo + step, ...`.
///
/// `hi` itself is always admissible, even when it is off the lattice:
/// `Interval::new(0, 10)?.step_by(3)?` admits 0, 3, 6, 9 and 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    lo: i32,
    hi: i32,
    step: i32,
}

impl Interval {
    pub fn new(lo: i32, hi: i32) -> Result<Self, ConstraintError> {
        if lo > hi {
            return Err(ConstraintError::InvertedInterval { lo, hi });
        }
        Ok(Self { lo, hi, step: 1 })
    }

    pub(crate) fn full(lo: i32, hi: i32) -> Self {
        Self { lo, hi, step: 1 }
    }

    /// Admit only every `step`-th value counted from the lower bound.
    pub fn step_by(mut self, step: i32) -> Result<Self, ConstraintError> {
        if step < 1 {
            return Err(ConstraintError::InvalidStep(step));
        }
        self.step = step;
        Ok(self)
    }

    pub fn lo(&self) -> i32 {
        self.lo
    }

    pub fn hi(&self) -> i32 {
        self.hi
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    /// Next admissible value at or after `from` (strictly after unless
    /// `inclusive`), plus whether it is the upper bound.
    ///
    /// Anything at or past `hi` answers `hi`, regardless of `inclusive`.
    pub fn next(&self, from: i32, inclusive: bool) -> (i32, bool) {
        if from < self.lo || inclusive && from == self.lo {
            return (self.lo, self.lo == self.hi);
        }
        if from >= self.hi {
            return (self.hi, true);
        }

        let step = i64::from(self.step);
        let mut diff = step - self.offset(from) % step;
        if inclusive && diff == step {
            diff = 0;
        }
        let next = i64::from(from) + diff;
        if next >= i64::from(self.hi) {
            (self.hi, true)
        } else {
            // Below `hi`, so it fits.
            (next as i32, false)
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        if value < self.lo || value > self.hi {
            return false;
        }
        if value == self.lo || value == self.hi {
            return true;
        }
        self.offset(value) % i64::from(self.step) == 0
    }

    /// Distance from `lo`, widened so that extreme bounds cannot overflow.
    fn offset(&self, value: i32) -> i64 {
        i64::from(value) - i64::from(self.lo)
    }
}

/// An ascending set of distinct values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscreteSet {
    values: Vec<i32>,
}

impl DiscreteSet {
    /// Build a set from values in any order; duplicates collapse.
    pub fn new<I>(values: I) -> Result<Self, ConstraintError>
    where
        I: IntoIterator<Item = i32>,
    {
        let mut values: Vec<i32> = values.into_iter().collect();
        if values.is_empty() {
            return Err(ConstraintError::EmptySet);
        }
        values.sort_unstable();
        values.dedup();
        Ok(Self { values })
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    fn first(&self) -> i32 {
        self.values[0]
    }

    fn last(&self) -> i32 {
        self.values[self.values.len() - 1]
    }

    /// First member after `from` (or equal to it when `inclusive`), plus
    /// whether it is the maximum. Falls back to the maximum when nothing
    /// qualifies.
    pub fn next(&self, from: i32, inclusive: bool) -> (i32, bool) {
        let last_index = self.values.len() - 1;
        let last = self.values[last_index];
        if from < last {
            for (i, &v) in self.values.iter().enumerate() {
                if from < v || inclusive && from == v {
                    return (v, i == last_index);
                }
            }
        }
        (last, true)
    }

    pub fn contains(&self, value: i32) -> bool {
        if value < self.first() || value > self.last() {
            return false;
        }
        self.values.binary_search(&value).is_ok()
    }
}

/// The admissible values of one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldConstraint {
    /// Exactly one value; always reported as the maximum.
    Fixed(i32),
    Interval(Interval),
    DiscreteSet(DiscreteSet),
}

impl FieldConstraint {
    /// Next admissible value from `from` and whether it is the constraint's maximum.
    pub fn next(&self, from: i32, inclusive: bool) -> (i32, bool) {
        match self {
            Self::Fixed(v) => (*v, true),
            Self::Interval(interval) => interval.next(from, inclusive),
            Self::DiscreteSet(set) => set.next(from, inclusive),
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        match self {
            Self::Fixed(v) => *v == value,
            Self::Interval(interval) => interval.contains(value),
            Self::DiscreteSet(set) => set.contains(value),
        }
    }

    /// Smallest admissible value.
    pub fn first(&self) -> i32 {
        match self {
            Self::Fixed(v) => *v,
            Self::Interval(interval) => interval.lo,
            Self::DiscreteSet(set) => set.first(),
        }
    }

    /// Largest admissible value.
    pub fn last(&self) -> i32 {
        match self {
            Self::Fixed(v) => *v,
            Self::Interval(interval) => interval.hi,
            Self::DiscreteSet(set) => set.last(),
        }
    }
}

impl From<i32> for FieldConstraint {
    fn from(value: i32) -> Self {
        Self::Fixed(value)
    }
}

impl From<Interval> for FieldConstraint {
    fn from(interval: Interval) -> Self {
        Self::Interval(interval)
    }
}

impl From<DiscreteSet> for FieldConstraint {
    fn from(set: DiscreteSet) -> Self {
        Self::DiscreteSet(set)
    }
}

/// Weekdays use cron numbering: Sunday is 0.
impl From<jiff::civil::Weekday> for FieldConstraint {
    fn from(weekday: jiff::civil::Weekday) -> Self {
        Self::Fixed(i32::from(weekday.to_sunday_zero_offset()))
    }
}
