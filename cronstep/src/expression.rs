use std::sync::Arc;

use jiff::Zoned;

use crate::calendar::CalendarMonth;
use crate::constraint::FieldConstraint;
use crate::cursor::{Occurrences, OccurrenceCursor};
use crate::error::{ConstraintError, OccurrenceError};
use crate::field::Field;

/// Accumulates field constraints before resolving them into an [`Expression`].
///
/// Setting a field only records it; defaults are filled in by [`build`](Self::build).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpressionBuilder {
    fields: [Option<FieldConstraint>; 8],
}

impl ExpressionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain `field`, rejecting values outside its domain.
    pub fn on(
        mut self,
        field: Field,
        constraint: impl Into<FieldConstraint>,
    ) -> Result<Self, ConstraintError> {
        let constraint = constraint.into();
        field.check_constraint(&constraint)?;
        self.fields[field.index()] = Some(constraint);
        Ok(self)
    }

    pub fn on_milliseconds(
        self,
        constraint: impl Into<FieldConstraint>,
    ) -> Result<Self, ConstraintError> {
        self.on(Field::Millisecond, constraint)
    }

    pub fn on_seconds(
        self,
        constraint: impl Into<FieldConstraint>,
    ) -> Result<Self, ConstraintError> {
        self.on(Field::Second, constraint)
    }

    pub fn on_minutes(
        self,
        constraint: impl Into<FieldConstraint>,
    ) -> Result<Self, ConstraintError> {
        self.on(Field::Minute, constraint)
    }

    pub fn on_hours(self, constraint: impl Into<FieldConstraint>) -> Result<Self, ConstraintError> {
        self.on(Field::Hour, constraint)
    }

    /// Day of the month. Combined with [`on_weekdays`](Self::on_weekdays), a
    /// day must satisfy both.
    pub fn on_days(self, constraint: impl Into<FieldConstraint>) -> Result<Self, ConstraintError> {
        self.on(Field::Day, constraint)
    }

    /// Day of the week, 0 = Sunday. Also accepts [`jiff::civil::Weekday`].
    pub fn on_weekdays(
        self,
        constraint: impl Into<FieldConstraint>,
    ) -> Result<Self, ConstraintError> {
        self.on(Field::Weekday, constraint)
    }

    pub fn on_months(
        self,
        constraint: impl Into<FieldConstraint>,
    ) -> Result<Self, ConstraintError> {
        self.on(Field::Month, constraint)
    }

    pub fn on_years(self, constraint: impl Into<FieldConstraint>) -> Result<Self, ConstraintError> {
        self.on(Field::Year, constraint)
    }

    pub fn every_millisecond(self) -> Self {
        self.every(Field::Millisecond)
    }

    pub fn every_second(self) -> Self {
        self.every(Field::Second)
    }

    pub fn every_minute(self) -> Self {
        self.every(Field::Minute)
    }

    pub fn every_hour(self) -> Self {
        self.every(Field::Hour)
    }

    pub fn every_day(self) -> Self {
        self.every(Field::Day)
    }

    pub fn every_month(self) -> Self {
        self.every(Field::Month)
    }

    fn every(mut self, field: Field) -> Self {
        self.fields[field.index()] = Some(field.full());
        self
    }

    /// The constraint set explicitly for `field`, if any.
    pub fn get(&self, field: Field) -> Option<&FieldConstraint> {
        self.fields[field.index()].as_ref()
    }

    /// Resolve into an immutable expression.
    ///
    /// An unset field is pinned to its minimum when a coarser field was set
    /// ("once per matching period"), otherwise it spans its whole domain.
    /// Weekday is never pinned.
    pub fn build(&self) -> Expression {
        let coarsest = Field::ALL
            .iter()
            .filter(|f| self.fields[f.index()].is_some())
            .map(|f| f.rank())
            .max();

        let fields: [FieldConstraint; 8] = std::array::from_fn(|i| {
            let field = Field::ALL[i];
            match &self.fields[i] {
                Some(constraint) => constraint.clone(),
                None if field != Field::Weekday
                    && coarsest.is_some_and(|rank| rank > field.rank()) =>
                {
                    FieldConstraint::Fixed(field.min())
                }
                None => field.full(),
            }
        });
        Expression {
            fields: Arc::new(fields),
        }
    }
}

/// A fully resolved eight-field expression.
///
/// Cheap to clone; every clone and every cursor created from it shares the
/// same constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    fields: Arc<[FieldConstraint; 8]>,
}

impl Expression {
    pub fn builder() -> ExpressionBuilder {
        ExpressionBuilder::new()
    }

    pub fn get(&self, field: Field) -> &FieldConstraint {
        &self.fields[field.index()]
    }

    /// A cursor positioned at `from`. The instant itself is never produced.
    pub fn cursor(&self, from: &Zoned) -> OccurrenceCursor {
        OccurrenceCursor::new(self.clone(), from)
    }

    /// The first occurrence after `from`.
    pub fn next_from(&self, from: &Zoned) -> Result<Zoned, OccurrenceError> {
        let mut cursor = self.cursor(from);
        cursor.advance()?;
        cursor
            .current()
            .cloned()
            .ok_or(OccurrenceError::OutdatedOrInvalid)
    }

    /// Up to `n` occurrences after `from`; fewer if the expression runs out.
    pub fn next_n_from(&self, from: &Zoned, n: usize) -> Vec<Zoned> {
        self.occurrences(from).take(n).map_while(Result::ok).collect()
    }

    /// Lazy iterator over occurrences after `from`.
    pub fn occurrences(&self, from: &Zoned) -> Occurrences {
        Occurrences::new(self.cursor(from))
    }

    /// Whether every field of `datetime` (in its own time zone) is admitted,
    /// day of month and weekday both included.
    pub fn matches(&self, datetime: &Zoned) -> bool {
        let cal = CalendarMonth::unchecked(i32::from(datetime.month()), i32::from(datetime.year()));
        let day = i32::from(datetime.day());
        let values = [
            (Field::Millisecond, i32::from(datetime.millisecond())),
            (Field::Second, i32::from(datetime.second())),
            (Field::Minute, i32::from(datetime.minute())),
            (Field::Hour, i32::from(datetime.hour())),
            (Field::Day, day),
            (Field::Weekday, cal.weekday(day)),
            (Field::Month, cal.month()),
            (Field::Year, cal.year()),
        ];
        values
            .iter()
            .all(|(field, value)| self.get(*field).contains(*value))
    }
}
