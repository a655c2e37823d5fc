use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cronstep::{CalendarMonth, Expression, Field, Schedule};
use jiff::civil::Weekday;

fn fixed_now() -> jiff::Zoned {
    jiff::civil::Date::new(2026, 2, 6)
        .unwrap()
        .to_datetime(jiff::civil::Time::new(12, 0, 0, 0).unwrap())
        .to_zoned(jiff::tz::TimeZone::UTC)
        .unwrap()
}

fn weekday_mornings() -> Expression {
    Expression::builder()
        .on_hours(9)
        .unwrap()
        .on_weekdays(Field::Weekday.between(1, 5).unwrap())
        .unwrap()
        .build()
}

// ---------------------------------------------------------------------------
// Builder benchmarks
// ---------------------------------------------------------------------------

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    group.bench_function("default", |b| {
        b.iter(|| Expression::builder().build());
    });

    let builder = Expression::builder()
        .on_minutes(Field::Minute.list([0, 15, 30, 45]).unwrap())
        .unwrap()
        .on_hours(Field::Hour.between(8, 18).unwrap().step_by(2).unwrap())
        .unwrap()
        .on_weekdays(Weekday::Monday)
        .unwrap();
    group.bench_function("mixed", |b| {
        b.iter(|| black_box(&builder).build());
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Cursor benchmarks
// ---------------------------------------------------------------------------

fn bench_cursor(c: &mut Criterion) {
    let mut group = c.benchmark_group("cursor");
    let now = fixed_now();

    let every_ms = Expression::builder().build();
    group.bench_function("every_millisecond_advance", |b| {
        let mut cursor = every_ms.cursor(&now);
        b.iter(|| cursor.advance().unwrap());
    });

    let mornings = weekday_mornings();
    group.bench_function("weekday_mornings_next_from", |b| {
        b.iter(|| mornings.next_from(black_box(&now)).unwrap());
    });

    let leap_sunday = Expression::builder()
        .on_days(29)
        .unwrap()
        .on_months(2)
        .unwrap()
        .on_weekdays(Weekday::Sunday)
        .unwrap()
        .build();
    group.bench_function("leap_day_sunday_next_from", |b| {
        b.iter(|| leap_sunday.next_from(black_box(&now)).unwrap());
    });

    let day_31 = Expression::builder().on_days(31).unwrap().build();
    group.bench_function("day_31_next_n_12", |b| {
        b.iter(|| day_31.next_n_from(black_box(&now), 12));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Calendar and schedule benchmarks
// ---------------------------------------------------------------------------

fn bench_calendar(c: &mut Criterion) {
    let mut group = c.benchmark_group("calendar");

    group.bench_function("weekday", |b| {
        b.iter(|| {
            let month = CalendarMonth::new(black_box(2), black_box(2032)).unwrap();
            month.weekday(black_box(29))
        });
    });

    let now = fixed_now();
    let mornings = weekday_mornings();
    group.bench_function("matches", |b| {
        b.iter(|| mornings.matches(black_box(&now)));
    });

    group.finish();
}

fn bench_schedule(c: &mut Criterion) {
    let mut group = c.benchmark_group("schedule");
    let now = fixed_now();
    let mornings = weekday_mornings();

    group.bench_function("literal_then_cron", |b| {
        b.iter(|| {
            let mut schedule = Schedule::at([now.clone()]).unwrap().then(mornings.clone());
            for _ in 0..5 {
                schedule.advance().unwrap();
            }
            schedule.current().cloned()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_cursor,
    bench_calendar,
    bench_schedule
);
criterion_main!(benches);
