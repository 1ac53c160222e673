use crate::error::{google_calendar_error, AssistantResult};
use crate::utils::time::{parse_date, parse_naive_time};
use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Resolve a wall-clock time in `tz`, rejecting gaps and overlaps
fn localize(naive: &NaiveDateTime, tz: &Tz) -> AssistantResult<DateTime<Tz>> {
    match tz.from_local_datetime(naive) {
        chrono::LocalResult::Single(dt) => Ok(dt),
        chrono::LocalResult::Ambiguous(_, _) => Err(google_calendar_error(&format!(
            "Ambiguous local time {} in {}",
            naive, tz
        ))),
        chrono::LocalResult::None => Err(google_calendar_error(&format!(
            "Invalid local time {} in {}",
            naive, tz
        ))),
    }
}

/// Midnight of a YYYY-MM-DD date in `tz`, formatted as RFC 3339
pub fn day_start_rfc3339(date: &str, tz: &Tz) -> AssistantResult<String> {
    let day = parse_date(date)
        .ok_or_else(|| google_calendar_error(&format!("Invalid date: {}", date)))?;
    let dt = localize(&day.and_time(NaiveTime::MIN), tz)?;
    Ok(dt.to_rfc3339())
}

/// Combine a YYYY-MM-DD date and an HH:MM time into a zoned timestamp
pub fn zoned_timestamp(date: &str, time: &str, tz: &Tz) -> AssistantResult<DateTime<Tz>> {
    let day = parse_date(date)
        .ok_or_else(|| google_calendar_error(&format!("Invalid date: {}", date)))?;
    let time = parse_naive_time(time)
        .ok_or_else(|| google_calendar_error(&format!("Invalid time: {}", time)))?;
    localize(&day.and_time(time), tz)
}
