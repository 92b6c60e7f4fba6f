// UTC calendar boundaries for each resolution. Month and year steps are calendar
// steps (variable month length, leap years), everything finer is a fixed delta.

use chrono::{DateTime, Datelike, Months, TimeDelta, Timelike, Utc};

use crate::models::Resolution;

/// Calendar fields cleared when aligning, finest first.
#[derive(Debug, Clone, Copy)]
enum CalendarField {
    Minute,
    Hour,
    Day,
    Month,
}

/// Fields finer than `resolution` that alignment resets. Five-minute alignment floors
/// minutes instead and is handled separately.
fn fields_finer_than(resolution: Resolution) -> &'static [CalendarField] {
    use CalendarField::*;
    match resolution {
        Resolution::FiveMinutes => &[],
        Resolution::Hour => &[Minute],
        Resolution::Day => &[Minute, Hour],
        Resolution::Month => &[Minute, Hour, Day],
        Resolution::Year => &[Minute, Hour, Day, Month],
    }
}

fn to_utc(point: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(point, 0).unwrap_or(if point < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

fn step(point: i64, resolution: Resolution, forward: bool) -> i64 {
    let date = to_utc(point);
    let shift = |delta: TimeDelta| {
        if forward {
            date.checked_add_signed(delta)
        } else {
            date.checked_sub_signed(delta)
        }
    };
    let shift_months = |n: u32| {
        if forward {
            date.checked_add_months(Months::new(n))
        } else {
            date.checked_sub_months(Months::new(n))
        }
    };
    let stepped = match resolution {
        Resolution::FiveMinutes => shift(TimeDelta::minutes(5)),
        Resolution::Hour => shift(TimeDelta::hours(1)),
        Resolution::Day => shift(TimeDelta::days(1)),
        Resolution::Month => shift_months(1),
        Resolution::Year => shift_months(12),
    };
    // Only fails at the edge of the representable range; stay put there.
    stepped.map_or(point, |d| d.timestamp())
}

/// The boundary one `resolution` unit before `point`.
pub fn previous_boundary(point: i64, resolution: Resolution) -> i64 {
    step(point, resolution, false)
}

/// The boundary one `resolution` unit after `point`.
pub fn next_boundary(point: i64, resolution: Resolution) -> i64 {
    step(point, resolution, true)
}

/// Most recent `resolution` boundary at or before `now` (UTC). Seconds are always
/// dropped; five-minute alignment floors the minute to a multiple of 5.
pub fn aligned_boundary(now: i64, resolution: Resolution) -> i64 {
    let date = to_utc(now);
    let mut aligned = date.with_second(0).and_then(|d| d.with_nanosecond(0));
    if resolution == Resolution::FiveMinutes {
        aligned = aligned.and_then(|d| d.with_minute(d.minute() / 5 * 5));
    }
    for field in fields_finer_than(resolution) {
        aligned = aligned.and_then(|d| match field {
            CalendarField::Minute => d.with_minute(0),
            CalendarField::Hour => d.with_hour(0),
            CalendarField::Day => d.with_day(1),
            CalendarField::Month => d.with_month(1),
        });
    }
    aligned.map_or(now, |d| d.timestamp())
}
