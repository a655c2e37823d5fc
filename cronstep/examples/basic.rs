//! Basic cronstep walkthrough: build, advance, match, schedule.
//!
//! Run with `RUST_LOG=cronstep=trace` to see each step of the search.

use cronstep::{Expression, Field, Schedule};
use jiff::civil::Weekday;
use jiff::SignedDuration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 09:30 on weekdays; seconds and milliseconds are pinned to zero
    let expr = Expression::builder()
        .on_minutes(30)?
        .on_hours(9)?
        .on_weekdays(Field::Weekday.between(1, 5)?)?
        .build();

    let now: jiff::Zoned = "2025-06-13T08:00:00+00:00[UTC]".parse()?;
    println!("Next occurrence after {now}: {}", expr.next_from(&now)?);

    // Drive a cursor by hand
    let mut cursor = expr.cursor(&now);
    println!("\nNext 5 occurrences:");
    for _ in 0..5 {
        cursor.advance()?;
        if let Some(current) = cursor.current() {
            println!("  {current}");
        }
    }

    let monday: jiff::Zoned = "2025-06-16T09:30:00+00:00[UTC]".parse()?;
    println!("\n{monday} matches: {}", expr.matches(&monday));
    let sunday: jiff::Zoned = "2025-06-15T09:30:00+00:00[UTC]".parse()?;
    println!("{sunday} matches: {}", expr.matches(&sunday));

    // Leap days that fall on a Sunday
    let leap_sundays = Expression::builder()
        .on_days(29)?
        .on_months(2)?
        .on_weekdays(Weekday::Sunday)?
        .build();
    println!("\nFeb 29 on a Sunday:");
    for occurrence in leap_sundays.occurrences(&now).take(3) {
        println!("  {}", occurrence?);
    }

    // Two reminders, then every weekday morning
    let mut schedule = Schedule::after(
        &now,
        [SignedDuration::from_mins(15), SignedDuration::from_mins(30)],
    )?
    .then(expr);
    println!("\nSchedule:");
    for _ in 0..4 {
        schedule.advance()?;
        if let Some(current) = schedule.current() {
            println!("  {current}");
        }
    }

    Ok(())
}
