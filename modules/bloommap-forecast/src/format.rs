use chrono::{DateTime, NaiveDate, Utc};

/// `Thursday, April 3, 2025`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `April 3, 2025`
pub fn medium_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// `April 3`
pub fn month_day(date: NaiveDate) -> String {
    date.format("%B %-d").to_string()
}

/// `Mar 30 - Apr 7`
pub fn date_range(low: NaiveDate, high: NaiveDate) -> String {
    format!("{} - {}", low.format("%b %-d"), high.format("%b %-d"))
}

/// `April 3, 2025 14:05 UTC`
pub fn date_time(ts: DateTime<Utc>) -> String {
    ts.format("%B %-d, %Y %H:%M UTC").to_string()
}
