//! Next-occurrence engine for eight-field cron expressions.
//!
//! An [`Expression`] constrains millisecond, second, minute, hour, day of
//! month, weekday, month and year. An [`OccurrenceCursor`] walks its
//! occurrences forward from a reference instant, one advance at a time.
//! Day of month and weekday are combined conjunctively: a day must satisfy
//! both.
//!
//! # Examples
//!
//! ```
//! use cronstep::{Expression, Field};
//!
//! // Minute 23 of every second hour between 00:00 and 20:00.
//! let expr = Expression::builder()
//!     .on_minutes(23)?
//!     .on_hours(Field::Hour.between(0, 20)?.step_by(2)?)?
//!     .build();
//!
//! let from: jiff::Zoned = "2019-01-01T00:00:00+00:00[UTC]".parse()?;
//! let mut cursor = expr.cursor(&from);
//! cursor.advance()?;
//! assert_eq!(cursor.current().unwrap().to_string(), "2019-01-01T00:23:00+00:00[UTC]");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod calendar;
pub mod constraint;
pub mod cursor;
pub mod error;
pub mod expression;
pub mod field;
pub mod schedule;

pub use calendar::CalendarMonth;
pub use constraint::{DiscreteSet, FieldConstraint, Interval};
pub use cursor::{OccurrenceCursor, Occurrences};
pub use error::{ConstraintError, OccurrenceError};
pub use expression::{Expression, ExpressionBuilder};
pub use field::Field;
pub use schedule::Schedule;
