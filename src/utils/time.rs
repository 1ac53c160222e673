use chrono::{NaiveDate, NaiveTime};

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Parse time string in HH:MM format into a `NaiveTime`
pub fn parse_naive_time(time_str: &str) -> Option<NaiveTime> {
    let (hour, minute) = parse_time(time_str)?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parse date string in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").ok()
}

/// Convert a 12-hour clock hour and its meridiem ("am"/"pm") to HH:MM
///
/// Returns `None` for hours outside 1..=12 or an unknown meridiem.
pub fn to_24_hour(hour: u32, meridiem: &str) -> Option<String> {
    if !(1..=12).contains(&hour) {
        return None;
    }

    let hour = match meridiem.to_ascii_lowercase().as_str() {
        "am" => hour % 12,
        "pm" => hour % 12 + 12,
        _ => return None,
    };

    Some(format!("{:02}:00", hour))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hh_mm() {
        assert_eq!(parse_time("09:30"), Some((9, 30)));
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("9"), None);
    }

    #[test]
    fn converts_meridiem_hours() {
        assert_eq!(to_24_hour(11, "pm").as_deref(), Some("23:00"));
        assert_eq!(to_24_hour(12, "am").as_deref(), Some("00:00"));
        assert_eq!(to_24_hour(12, "PM").as_deref(), Some("12:00"));
        assert_eq!(to_24_hour(1, "AM").as_deref(), Some("01:00"));
        assert_eq!(to_24_hour(10, "am").as_deref(), Some("10:00"));
    }

    #[test]
    fn rejects_hours_outside_twelve_hour_clock() {
        assert_eq!(to_24_hour(0, "am"), None);
        assert_eq!(to_24_hour(13, "pm"), None);
        assert_eq!(to_24_hour(5, "xm"), None);
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date("2026-01-21"), NaiveDate::from_ymd_opt(2026, 1, 21));
        assert_eq!(parse_date("2026-02-30"), None);
    }
}
