//! The next-occurrence engine.
//!
//! A cursor keeps the civil fields of its last occurrence and moves them
//! forward one advance at a time. Time-of-day levels (millisecond, second,
//! minute, hour) are walked finest first: each level steps to its next
//! admissible value and tells the next coarser level whether it still has to
//! move. The day level then resolves day of month, weekday, month and year
//! together. Walking back down, every level below one that moved restarts at
//! its first admissible value.

use std::iter::FusedIterator;

use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::Zoned;

use crate::calendar::CalendarMonth;
use crate::error::OccurrenceError;
use crate::expression::Expression;
use crate::field::Field;

/// Time-of-day levels, finest first.
const TIME_FIELDS: [Field; 4] = [Field::Millisecond, Field::Second, Field::Minute, Field::Hour];

/// How far ahead the day search may wander before giving up on an
/// expression whose day and weekday constraints never line up.
const SEARCH_LIMIT_YEARS: i32 = 400;

/// Civil fields the engine works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Clock {
    /// Millisecond, second, minute, hour.
    time: [i32; 4],
    day: i32,
    month: CalendarMonth,
}

impl Clock {
    fn from_zoned(zoned: &Zoned) -> Self {
        Self {
            time: [
                i32::from(zoned.millisecond()),
                i32::from(zoned.second()),
                i32::from(zoned.minute()),
                i32::from(zoned.hour()),
            ],
            day: i32::from(zoned.day()),
            month: CalendarMonth::unchecked(i32::from(zoned.month()), i32::from(zoned.year())),
        }
    }

    fn to_datetime(&self) -> Result<DateTime, OccurrenceError> {
        let year = self.month.year();
        let unrepresentable = || OccurrenceError::Unrepresentable { year };
        let [millisecond, second, minute, hour] = self.time;
        DateTime::new(
            i16::try_from(year).map_err(|_| unrepresentable())?,
            self.month.month() as i8,
            self.day as i8,
            hour as i8,
            minute as i8,
            second as i8,
            millisecond * 1_000_000,
        )
        .map_err(|_| unrepresentable())
    }
}

/// Stateful producer of successive occurrences of an [`Expression`].
///
/// A cursor is not meant to be shared between threads while advancing. Once
/// [`advance`](Self::advance) fails, the cursor is terminated and reports the
/// same error forever without changing [`current`](Self::current).
#[derive(Debug, Clone)]
pub struct OccurrenceCursor {
    expr: Expression,
    tz: TimeZone,
    origin: Zoned,
    clock: Clock,
    /// Civil time of the last candidate; starts at the reference instant.
    civil: DateTime,
    current: Option<Zoned>,
    terminated: Option<OccurrenceError>,
}

impl OccurrenceCursor {
    /// Seed a cursor at `from`. The time zone of `from` is used for every
    /// occurrence.
    pub fn new(expr: Expression, from: &Zoned) -> Self {
        Self {
            expr,
            tz: from.time_zone().clone(),
            origin: from.clone(),
            clock: Clock::from_zoned(from),
            civil: from.datetime(),
            current: None,
            terminated: None,
        }
    }

    /// Move to the next occurrence.
    pub fn advance(&mut self) -> Result<(), OccurrenceError> {
        if let Some(err) = self.terminated {
            return Err(err);
        }
        match self.step() {
            Ok(next) => {
                tracing::trace!(occurrence = %next, "cursor advanced");
                self.current = Some(next);
                Ok(())
            }
            Err(err) => {
                tracing::debug!(error = %err, last = ?self.current, "cursor terminated");
                self.terminated = Some(err);
                Err(err)
            }
        }
    }

    /// The last occurrence produced, or `None` before the first advance.
    pub fn current(&self) -> Option<&Zoned> {
        self.current.as_ref()
    }

    /// The instant this cursor was seeded with.
    pub fn reference(&self) -> &Zoned {
        &self.origin
    }

    pub fn expression(&self) -> &Expression {
        &self.expr
    }

    /// The error that terminated this cursor, if any.
    pub fn terminated(&self) -> Option<OccurrenceError> {
        self.terminated
    }

    fn step(&mut self) -> Result<Zoned, OccurrenceError> {
        loop {
            let mut clock = self.clock;
            self.carry(&mut clock)?;

            let civil = clock.to_datetime()?;
            if civil <= self.civil {
                return Err(OccurrenceError::OutdatedOrInvalid);
            }
            self.clock = clock;
            self.civil = civil;

            let zoned = civil
                .to_zoned(self.tz.clone())
                .map_err(|_| OccurrenceError::Unrepresentable {
                    year: clock.month.year(),
                })?;
            let last = self.current.as_ref().unwrap_or(&self.origin);
            if zoned.timestamp() > last.timestamp() {
                return Ok(zoned);
            }
            // A wall-clock time skipped by a DST gap resolves past the
            // following candidates; keep going until instants move forward.
            tracing::trace!(%civil, resolved = %zoned, "skipping candidate behind last occurrence");
        }
    }

    /// Compute the next admissible civil time into `clock`.
    fn carry(&self, clock: &mut Clock) -> Result<(), OccurrenceError> {
        let constraints = TIME_FIELDS.map(|field| self.expr.get(field));
        let previous = clock.time;

        // The millisecond always moves. Each coarser level may stay put only
        // when the finer one found a later value without wrapping.
        let mut inclusive = false;
        for (level, constraint) in constraints.iter().enumerate() {
            let (value, _) = constraint.next(previous[level], inclusive);
            inclusive = value > previous[level] || inclusive && value == previous[level];
            clock.time[level] = value;
        }

        let mut changed = self.advance_day(clock, inclusive)?;
        for level in (0..TIME_FIELDS.len()).rev() {
            if changed {
                clock.time[level] = constraints[level].first();
            } else {
                changed = clock.time[level] != previous[level];
            }
        }
        Ok(())
    }

    /// Find the next day admitted by both the day and weekday constraints,
    /// moving through months and years as needed. Returns whether the date
    /// changed.
    fn advance_day(&self, clock: &mut Clock, inclusive: bool) -> Result<bool, OccurrenceError> {
        let days = self.expr.get(Field::Day);
        let weekdays = self.expr.get(Field::Weekday);
        let start_day = clock.day;
        let start_year = clock.month.year();

        let mut inclusive = inclusive;
        let mut reset = self.advance_month(&mut clock.month, true);
        if reset {
            clock.day = 1;
            inclusive = true;
        }

        loop {
            let (day, at_max) = days.next(clock.day, inclusive);
            let exhausted = at_max || clock.month.is_last_day(day);
            let valid = day >= clock.day
                && (inclusive || day != clock.day)
                && clock.month.contains(day)
                && weekdays.contains(clock.month.weekday(day));
            clock.day = day;
            inclusive = false;

            if valid {
                break;
            }
            if exhausted {
                reset = self.advance_month(&mut clock.month, false);
                if !reset || clock.month.year() - start_year > SEARCH_LIMIT_YEARS {
                    return Err(OccurrenceError::OutdatedOrInvalid);
                }
                clock.day = 1;
                inclusive = true;
            }
        }

        Ok(reset || clock.day != start_day)
    }

    /// Step month (and year on wrap-around). Returns whether either changed.
    fn advance_month(&self, cal: &mut CalendarMonth, inclusive: bool) -> bool {
        let months = self.expr.get(Field::Month);
        let years = self.expr.get(Field::Year);
        let (from_month, from_year) = (cal.month(), cal.year());

        let (month, _) = months.next(from_month, inclusive);
        let (year, _) = years.next(
            from_year,
            month > from_month || inclusive && month == from_month,
        );
        if year != from_year {
            cal.update_month_year(months.first(), year);
            return true;
        }
        cal.update_month(month);
        month != from_month
    }
}

/// Iterator over the occurrences of a cursor.
///
/// Yields the terminal error once, then stops.
#[derive(Debug, Clone)]
pub struct Occurrences {
    cursor: OccurrenceCursor,
}

impl Occurrences {
    pub(crate) fn new(cursor: OccurrenceCursor) -> Self {
        Self { cursor }
    }

    pub fn cursor(&self) -> &OccurrenceCursor {
        &self.cursor
    }
}

impl Iterator for Occurrences {
    type Item = Result<Zoned, OccurrenceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor.terminated().is_some() {
            return None;
        }
        match self.cursor.advance() {
            Ok(()) => self.cursor.current().cloned().map(Ok),
            Err(err) => Some(Err(err)),
        }
    }
}

impl FusedIterator for Occurrences {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Interval;
    use jiff::civil::date;

    fn utc(s: &str) -> Zoned {
        format!("{s}+00:00[UTC]").parse().unwrap()
    }

    fn advance_n(cursor: &mut OccurrenceCursor, n: usize) -> Vec<String> {
        (0..n)
            .map(|_| {
                cursor.advance().unwrap();
                cursor.current().unwrap().datetime().to_string()
            })
            .collect()
    }

    #[test]
    fn current_is_unset_before_first_advance() {
        let expr = Expression::builder().build();
        let from = utc("2019-01-01T00:00:00");
        let cursor = expr.cursor(&from);
        assert!(cursor.current().is_none());
        assert_eq!(cursor.reference(), &from);
    }

    #[test]
    fn default_expression_ticks_every_millisecond() {
        let expr = Expression::builder().build();
        let mut cursor = expr.cursor(&utc("2019-01-01T00:00:00"));
        assert_eq!(
            advance_n(&mut cursor, 3),
            [
                "2019-01-01T00:00:00.001",
                "2019-01-01T00:00:00.002",
                "2019-01-01T00:00:00.003"
            ]
        );
    }

    #[test]
    fn second_list_rolls_into_minutes() {
        let expr = Expression::builder()
            .on_seconds(Field::Second.list([0, 30]).unwrap())
            .unwrap()
            .build();
        let mut cursor = expr.cursor(&utc("2019-01-01T00:00:00"));
        assert_eq!(
            advance_n(&mut cursor, 4),
            [
                "2019-01-01T00:00:30",
                "2019-01-01T00:01:00",
                "2019-01-01T00:01:30",
                "2019-01-01T00:02:00"
            ]
        );
    }

    #[test]
    fn stepped_hours_roll_over_to_next_day() {
        let expr = Expression::builder()
            .on_minutes(23)
            .unwrap()
            .on_hours(Interval::new(0, 20).unwrap().step_by(2).unwrap())
            .unwrap()
            .build();
        let mut cursor = expr.cursor(&utc("2019-01-01T00:00:00"));
        let produced = advance_n(&mut cursor, 13);
        assert_eq!(produced[0], "2019-01-01T00:23:00");
        assert_eq!(produced[10], "2019-01-01T20:23:00");
        assert_eq!(produced[11], "2019-01-02T00:23:00");
        assert_eq!(produced[12], "2019-01-02T02:23:00");
    }

    #[test]
    fn stepped_milliseconds_include_upper_bound() {
        let expr = Expression::builder()
            .on_milliseconds(Interval::new(0, 999).unwrap().step_by(250).unwrap())
            .unwrap()
            .build();
        let mut cursor = expr.cursor(&utc("2019-01-01T00:00:59.900"));
        assert_eq!(
            advance_n(&mut cursor, 3),
            [
                "2019-01-01T00:00:59.999",
                "2019-01-01T00:01:00",
                "2019-01-01T00:01:00.25"
            ]
        );
    }

    #[test]
    fn day_31_skips_short_months() {
        let expr = Expression::builder().on_days(31).unwrap().build();
        let mut cursor = expr.cursor(&utc("2026-01-31T00:00:00"));
        assert_eq!(
            advance_n(&mut cursor, 4),
            [
                "2026-03-31T00:00:00",
                "2026-05-31T00:00:00",
                "2026-07-31T00:00:00",
                "2026-08-31T00:00:00"
            ]
        );
    }

    #[test]
    fn day_and_weekday_are_conjunctive() {
        let expr = Expression::builder()
            .on_days(29)
            .unwrap()
            .on_months(2)
            .unwrap()
            .on_weekdays(jiff::civil::Weekday::Sunday)
            .unwrap()
            .build();
        let mut cursor = expr.cursor(&utc("2019-01-01T00:00:00"));
        assert_eq!(
            advance_n(&mut cursor, 3),
            [
                "2032-02-29T00:00:00",
                "2060-02-29T00:00:00",
                "2088-02-29T00:00:00"
            ]
        );
    }

    #[test]
    fn month_list_wraps_into_next_year() {
        let expr = Expression::builder()
            .on_months(Field::Month.list([3, 6]).unwrap())
            .unwrap()
            .build();
        let mut cursor = expr.cursor(&utc("2019-07-10T00:00:00"));
        assert_eq!(
            advance_n(&mut cursor, 3),
            [
                "2020-03-01T00:00:00",
                "2020-06-01T00:00:00",
                "2021-03-01T00:00:00"
            ]
        );
    }

    #[test]
    fn impossible_date_terminates() {
        let expr = Expression::builder()
            .on_months(2)
            .unwrap()
            .on_days(30)
            .unwrap()
            .build();
        let mut cursor = expr.cursor(&utc("2019-01-01T00:00:00"));
        assert_eq!(cursor.advance(), Err(OccurrenceError::OutdatedOrInvalid));
        assert_eq!(cursor.terminated(), Some(OccurrenceError::OutdatedOrInvalid));
        assert!(cursor.current().is_none());
    }

    #[test]
    fn terminated_cursor_is_stable() {
        let expr = Expression::builder().on_years(2020).unwrap().build();
        let mut cursor = expr.cursor(&utc("2019-06-01T00:00:00"));
        cursor.advance().unwrap();
        let last = cursor.current().cloned();
        assert_eq!(last, Some(utc("2020-01-01T00:00:00")));

        for _ in 0..3 {
            assert_eq!(cursor.advance(), Err(OccurrenceError::OutdatedOrInvalid));
            assert_eq!(cursor.current().cloned(), last);
        }
    }

    #[test]
    fn year_before_reference_is_outdated() {
        let expr = Expression::builder().on_years(2000).unwrap().build();
        let mut cursor = expr.cursor(&utc("2019-06-01T00:00:00"));
        assert_eq!(cursor.advance(), Err(OccurrenceError::OutdatedOrInvalid));
    }

    #[test]
    fn year_beyond_supported_range_is_unrepresentable() {
        let expr = Expression::builder().on_years(20_000).unwrap().build();
        let mut cursor = expr.cursor(&utc("2019-06-01T00:00:00"));
        assert_eq!(
            cursor.advance(),
            Err(OccurrenceError::Unrepresentable { year: 20_000 })
        );
    }

    #[test]
    fn time_zone_passes_through() {
        let tz = TimeZone::fixed(jiff::tz::offset(5));
        let from = date(2019, 1, 1).at(0, 0, 0, 0).to_zoned(tz.clone()).unwrap();
        let expr = Expression::builder().on_minutes(23).unwrap().build();
        let mut cursor = expr.cursor(&from);
        cursor.advance().unwrap();
        let next = cursor.current().unwrap();
        assert_eq!(next.datetime(), date(2019, 1, 1).at(0, 23, 0, 0));
        assert_eq!(next.offset(), jiff::tz::offset(5));
    }

    #[test]
    fn dst_gap_never_moves_backwards() {
        let tz = TimeZone::posix("EST5EDT,M3.2.0,M11.1.0").unwrap();
        let from = date(2026, 3, 8).at(0, 30, 0, 0).to_zoned(tz.clone()).unwrap();
        let expr = Expression::builder().every_hour().build();
        let produced: Vec<Zoned> = expr
            .occurrences(&from)
            .take(3)
            .collect::<Result<_, _>>()
            .unwrap();
        let hours: Vec<i8> = produced.iter().map(|z| z.hour()).collect();
        assert_eq!(hours, [1, 3, 4]);
        assert!(produced.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn occurrences_yield_error_once() {
        let expr = Expression::builder().on_years(2020).unwrap().build();
        let results: Vec<_> = expr.occurrences(&utc("2019-06-01T00:00:00")).collect();
        assert_eq!(
            results,
            [
                Ok(utc("2020-01-01T00:00:00")),
                Err(OccurrenceError::OutdatedOrInvalid)
            ]
        );
    }
}
