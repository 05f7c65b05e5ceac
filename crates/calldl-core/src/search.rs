//! Saved-search start date.

use chrono::{Duration, NaiveDateTime, Timelike};

/// Format the portal's start-date field expects.
const START_DATE_FORMAT: &str = "%m/%d/%Y 00:00:00";

/// Overnight sessions should still see the previous day's calls: at or before
/// `cutoff_hour`, the search starts at midnight of the previous calendar day.
/// Later in the day the saved query's own start date is kept (`None`).
pub fn overnight_start_date(now: NaiveDateTime, cutoff_hour: u32) -> Option<String> {
    if now.hour() > cutoff_hour {
        return None;
    }
    let yesterday = now.date() - Duration::days(1);
    Some(yesterday.format(START_DATE_FORMAT).to_string())
}
