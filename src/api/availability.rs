use crate::{
    error::{AppError, AppResult},
    models::{AvailabilitySlot, NewAvailabilitySlot},
    schema::*,
    store::Datastore,
};
use diesel::prelude::*;

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn clock_minutes(time: &str) -> AppResult<i32> {
    let (hour, minute) = time
        .split_once(':')
        .ok_or_else(|| AppError::InvalidTime(time.to_string()))?;
    let hour: i32 = hour
        .parse()
        .map_err(|_| AppError::InvalidTime(time.to_string()))?;
    let minute: i32 = minute
        .parse()
        .map_err(|_| AppError::InvalidTime(time.to_string()))?;
    if !(0..24).contains(&hour) || !(0..60).contains(&minute) {
        return Err(AppError::InvalidTime(time.to_string()));
    }
    Ok(hour * 60 + minute)
}

/// Half-open interval test against the slots of one day. A slot ending
/// exactly when the candidate starts (or vice versa) does not overlap.
pub fn has_overlap(
    day: &str,
    start: &str,
    end: &str,
    existing: &[AvailabilitySlot],
) -> AppResult<bool> {
    let s1 = clock_minutes(start)?;
    let e1 = clock_minutes(end)?;
    if e1 <= s1 {
        return Err(AppError::InvalidRange);
    }
    for slot in existing.iter().filter(|slot| slot.day == day) {
        let s2 = clock_minutes(&slot.start_time)?;
        let e2 = clock_minutes(&slot.end_time)?;
        let starts_inside = s2 <= s1 && s1 < e2;
        let ends_inside = s2 < e1 && e1 <= e2;
        let contains = s1 <= s2 && e1 >= e2;
        if starts_inside || ends_inside || contains {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Validates and inserts a weekly availability window for a group. Nothing
/// is written when the window collides with an existing one.
pub async fn propose_availability(
    store: &Datastore,
    group_id: i32,
    day: &str,
    start: &str,
    end: &str,
) -> AppResult<i32> {
    if !WEEKDAYS.contains(&day) {
        return Err(AppError::InvalidDay(day.to_string()));
    }
    store
        .with_conn(|conn| {
            conn.transaction(|conn| {
                let group_exists: i64 = study_groups::table
                    .filter(study_groups::id.eq(group_id))
                    .count()
                    .get_result(conn)?;
                if group_exists == 0 {
                    return Err(AppError::NotFound("group"));
                }
                let existing = availability::table
                    .filter(availability::group_id.eq(group_id))
                    .load::<AvailabilitySlot>(conn)?;
                if has_overlap(day, start, end, &existing)? {
                    return Err(AppError::Conflict);
                }
                let slot = diesel::insert_into(availability::table)
                    .values(NewAvailabilitySlot {
                        group_id,
                        day,
                        start_time: start,
                        end_time: end,
                    })
                    .get_result::<AvailabilitySlot>(conn)?;
                Ok(slot.id)
            })
        })
        .await
}

pub async fn group_availability(
    store: &Datastore,
    group_id: i32,
) -> AppResult<Vec<AvailabilitySlot>> {
    store
        .with_conn(|conn| {
            Ok(availability::table
                .filter(availability::group_id.eq(group_id))
                .load::<AvailabilitySlot>(conn)?)
        })
        .await
}
