use crate::utils::time::to_24_hour;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Every parsed date falls in this year
pub const SCHEDULE_YEAR: i32 = 2026;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

lazy_static! {
    static ref MONTH_DAY: Regex = Regex::new(
        r"(?i)(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})"
    )
    .expect("month/day pattern is valid");
    static ref TIME_RANGE: Regex =
        Regex::new(r"(?i)(\d{1,2})\s*(am|pm)\s*to\s*(\d{1,2})\s*(am|pm)")
            .expect("time range pattern is valid");
}

/// Date and time range extracted from a create-event query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSchedule {
    /// YYYY-MM-DD; the day is not checked against the month length
    pub date: String,
    /// HH:MM, 24-hour clock
    pub start_time: String,
    /// HH:MM, 24-hour clock
    pub end_time: String,
}

/// Extract "<month> <day>" and "<h> am|pm to <h> am|pm" from a query
///
/// All-or-nothing: `None` unless both patterns are present and every number
/// is in range (day 1..=31, hours 1..=12).
pub fn parse_date_time(query: &str) -> Option<ParsedSchedule> {
    let date = MONTH_DAY.captures(query)?;
    let time = TIME_RANGE.captures(query)?;

    let month_name = date.get(1)?.as_str().to_lowercase();
    let month = MONTHS.iter().position(|m| *m == month_name)? + 1;
    let day = date.get(2)?.as_str().parse::<u32>().ok()?;
    if !(1..=31).contains(&day) {
        return None;
    }

    let start_time = to_24_hour(time.get(1)?.as_str().parse().ok()?, time.get(2)?.as_str())?;
    let end_time = to_24_hour(time.get(3)?.as_str().parse().ok()?, time.get(4)?.as_str())?;

    Some(ParsedSchedule {
        date: format!("{:04}-{:02}-{:02}", SCHEDULE_YEAR, month, day),
        start_time,
        end_time,
    })
}
