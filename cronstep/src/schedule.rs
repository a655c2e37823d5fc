//! Literal instants with an optional cron continuation.

use jiff::{SignedDuration, Zoned};

use crate::cursor::OccurrenceCursor;
use crate::error::{ConstraintError, OccurrenceError};
use crate::expression::Expression;

/// Produces a fixed list of instants, then optionally keeps going with the
/// occurrences of an [`Expression`] following the last of them.
///
/// ```
/// use cronstep::{Expression, Schedule};
///
/// let start: jiff::Zoned = "2026-01-01T09:00:00+00:00[UTC]".parse()?;
/// let daily = Expression::builder().every_day().build();
/// let mut schedule = Schedule::at([start.clone()])?.then(daily);
///
/// schedule.advance()?;
/// assert_eq!(schedule.current(), Some(&start));
/// schedule.advance()?;
/// assert_eq!(schedule.current().unwrap().to_string(), "2026-01-02T00:00:00+00:00[UTC]");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Schedule {
    at: Vec<Zoned>,
    /// Index into `at` of the last instant produced.
    position: Option<usize>,
    /// Takes over once the literal instants are exhausted.
    continuation: Option<Expression>,
    cursor: Option<OccurrenceCursor>,
}

impl Schedule {
    /// A schedule producing exactly `instants`, which must be strictly increasing.
    pub fn at<I>(instants: I) -> Result<Self, ConstraintError>
    where
        I: IntoIterator<Item = Zoned>,
    {
        let at: Vec<Zoned> = instants.into_iter().collect();
        if at.is_empty() {
            return Err(ConstraintError::EmptySchedule);
        }
        if let Some(index) = at.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(ConstraintError::NonIncreasing { index: index + 1 });
        }
        Ok(Self {
            at,
            position: None,
            continuation: None,
            cursor: None,
        })
    }

    /// Instants reached by adding each duration in turn, starting at `from`.
    ///
    /// `after(t, [1h, 1m])` produces `t + 1h`, then `t + 1h + 1m`.
    pub fn after<I>(from: &Zoned, durations: I) -> Result<Self, ConstraintError>
    where
        I: IntoIterator<Item = SignedDuration>,
    {
        let mut instant = from.clone();
        let mut at = Vec::new();
        for duration in durations {
            instant = instant
                .checked_add(duration)
                .map_err(ConstraintError::Overflow)?;
            at.push(instant.clone());
        }
        Self::at(at)
    }

    /// A schedule producing only the occurrences of `expr` after `from`.
    pub fn cron(expr: Expression, from: &Zoned) -> Self {
        Self {
            at: Vec::new(),
            position: None,
            continuation: None,
            cursor: Some(expr.cursor(from)),
        }
    }

    /// Continue with the occurrences of `expr` once the literal instants run out.
    pub fn then(mut self, expr: Expression) -> Self {
        self.continuation = Some(expr);
        self
    }

    /// Move to the next instant.
    pub fn advance(&mut self) -> Result<(), OccurrenceError> {
        let next = self.position.map_or(0, |i| i + 1);
        if next < self.at.len() {
            self.position = Some(next);
            return Ok(());
        }

        if self.cursor.is_none() {
            let (Some(expr), Some(last)) = (&self.continuation, self.at.last()) else {
                tracing::debug!(instants = self.at.len(), "schedule exhausted");
                return Err(OccurrenceError::Outdated);
            };
            tracing::debug!(from = %last, "schedule continuing with cron expression");
            self.cursor = Some(expr.cursor(last));
        }

        match self.cursor.as_mut() {
            Some(cursor) => cursor.advance(),
            None => Err(OccurrenceError::Outdated),
        }
    }

    /// The last instant produced, or `None` before the first advance.
    pub fn current(&self) -> Option<&Zoned> {
        self.cursor
            .as_ref()
            .and_then(OccurrenceCursor::current)
            .or_else(|| self.position.and_then(|i| self.at.get(i)))
    }

    /// The literal instants this schedule starts with.
    pub fn instants(&self) -> &[Zoned] {
        &self.at
    }
}
