//! Month/year arithmetic without going through a datetime library.
//!
//! The cursor asks the same questions (does day 31 exist? which weekday is
//! day 13?) over and over for a single month, so the epoch-relative base of
//! that month is computed once and reused until the month or year changes.

use crate::error::ConstraintError;
use crate::field::Field;

/// Cumulative days before the start of each month in a common year.
/// Index `m` holds the days before month `m + 1`; index 12 is the year length.
const DAYS_BEFORE_MONTH: [i64; 13] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];

/// 1970-01-01 was a Thursday.
const EPOCH_WEEKDAY: i64 = 4;

/// A (month, year) pair aware of its length and weekdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    month: i32,
    year: i32,
    leap: bool,
    last_day: i32,
    /// Days from 1970-01-01 to January 1st of `year`.
    year_base: i64,
    /// Days from 1970-01-01 to the 1st of `month`.
    month_base: i64,
}

impl CalendarMonth {
    /// Validate and build a month view. `year` is not range-checked so that
    /// months before 1970 can be described too.
    pub fn new(month: i32, year: i32) -> Result<Self, ConstraintError> {
        Field::Month.check(month)?;
        Ok(Self::unchecked(month, year))
    }

    pub(crate) fn unchecked(month: i32, year: i32) -> Self {
        let mut cal = Self {
            month,
            year,
            leap: false,
            last_day: 0,
            year_base: 0,
            month_base: 0,
        };
        cal.recompute_year();
        cal.recompute_month();
        cal
    }

    /// Move to another month of the same year.
    pub(crate) fn update_month(&mut self, month: i32) {
        if self.month != month {
            self.month = month;
            self.recompute_month();
        }
    }

    /// Move to another month and year.
    pub(crate) fn update_month_year(&mut self, month: i32, year: i32) {
        if self.year != year {
            self.month = month;
            self.year = year;
            self.recompute_year();
            self.recompute_month();
        } else {
            self.update_month(month);
        }
    }

    pub fn month(&self) -> i32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn is_leap(&self) -> bool {
        self.leap
    }

    pub fn last_day(&self) -> i32 {
        self.last_day
    }

    /// Whether `day` exists in this month.
    pub fn contains(&self, day: i32) -> bool {
        day >= 1 && day <= self.last_day
    }

    pub fn is_last_day(&self, day: i32) -> bool {
        day == self.last_day
    }

    /// Weekday of `day` in cron numbering (0 = Sunday).
    pub fn weekday(&self, day: i32) -> i32 {
        let days = self.month_base + i64::from(day - 1);
        // Always in 0..7, so the narrowing cannot truncate.
        (days + EPOCH_WEEKDAY).rem_euclid(7) as i32
    }

    fn recompute_year(&mut self) {
        self.leap = is_leap_year(self.year);
        self.year_base = days_before_year(i64::from(self.year)) - days_before_year(1970);
    }

    fn recompute_month(&mut self) {
        let index = (self.month - 1) as usize;
        let mut before = DAYS_BEFORE_MONTH[index];
        if self.leap && self.month > 2 {
            before += 1;
        }
        self.month_base = self.year_base + before;

        self.last_day = if self.leap && self.month == 2 {
            29
        } else {
            (DAYS_BEFORE_MONTH[index + 1] - DAYS_BEFORE_MONTH[index]) as i32
        };
    }
}

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Days from 0001-01-01 (proleptic Gregorian) to January 1st of `year`.
fn days_before_year(year: i64) -> i64 {
    let y = year - 1;
    y * 365 + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400)
}
