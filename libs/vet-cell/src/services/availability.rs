// libs/vet-cell/src/services/availability.rs
//
// Pure weekly-availability logic. Everything here works on an in-memory
// week of `DaySchedule` rows and an explicit `now`, so the booking page,
// the directory summary and the appointment validator all share one
// implementation and the tests need no store.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Timelike, Utc};

use crate::models::{DaySchedule, NextAvailableDay};

/// Bookable slots are offered on a fixed 30-minute grid.
pub const SLOT_INTERVAL_MINUTES: i64 = 30;

/// Day-of-week index used throughout the schedule tables:
/// 0 = Sunday .. 6 = Saturday.
pub fn day_of_week(instant: &DateTime<Utc>) -> i32 {
    instant.weekday().num_days_from_sunday() as i32
}

/// Wall-clock time-of-day with seconds dropped, matching the HH:MM
/// granularity the schedules are stored at.
pub fn time_of_day(instant: &DateTime<Utc>) -> NaiveTime {
    let t = instant.time();
    NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).expect("valid truncated time")
}

/// Is the vet available right now? False when today has no row or the row
/// is switched off; otherwise true iff `start_time <= now <= end_time`.
/// Both bounds are inclusive - the closing minute still counts.
pub fn is_currently_available(schedule: &[DaySchedule], now: DateTime<Utc>) -> bool {
    if schedule.is_empty() {
        return false;
    }

    let today = day_of_week(&now);
    let current_time = time_of_day(&now);

    let todays_schedule = match schedule.iter().find(|day| day.day_of_week == today) {
        Some(day) => day,
        None => return false,
    };

    if !todays_schedule.is_available {
        return false;
    }

    current_time >= todays_schedule.start_time && current_time <= todays_schedule.end_time
}

/// Does the week contain at least one available day?
pub fn has_weekly_availability(schedule: &[DaySchedule]) -> bool {
    schedule.iter().any(|day| day.is_available)
}

/// Scan the next seven days starting from today and return the first
/// available one. Today only qualifies while its window has not fully
/// elapsed; any later available day qualifies outright.
pub fn next_available_day(schedule: &[DaySchedule], now: DateTime<Utc>) -> Option<NextAvailableDay> {
    if schedule.is_empty() {
        return None;
    }

    let today = day_of_week(&now);
    let current_time = time_of_day(&now);

    for offset in 0..7 {
        let day_index = (today + offset) % 7;
        let day_schedule = schedule.iter().find(|day| day.day_of_week == day_index);

        if let Some(day_schedule) = day_schedule {
            if !day_schedule.is_available {
                continue;
            }

            if offset == 0 {
                if current_time <= day_schedule.end_time {
                    return Some(NextAvailableDay {
                        day: day_schedule.clone(),
                        is_today: true,
                    });
                }
            } else {
                return Some(NextAvailableDay {
                    day: day_schedule.clone(),
                    is_today: false,
                });
            }
        }
    }

    None
}

/// Produce the bookable time-of-day stamps for one day's window: start at
/// `start_time` and step by the fixed interval while strictly before
/// `end_time`. Advisory only - the appointment validator re-checks any
/// submitted time against the live schedule.
///
/// Note the asymmetry with `is_currently_available`: generation stops
/// before `end_time` while the availability check accepts it exactly.
pub fn generate_slots(day: &DaySchedule) -> Vec<NaiveTime> {
    if !day.is_available {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut current = day.start_time;

    while current < day.end_time {
        slots.push(current);
        current = current + Duration::minutes(SLOT_INTERVAL_MINUTES);
        if current <= slots[slots.len() - 1] {
            // NaiveTime arithmetic wraps at midnight; a window reaching
            // 00:00 would otherwise loop forever.
            break;
        }
    }

    slots
}
