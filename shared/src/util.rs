use crate::types::Timestamp;
use chrono::{DateTime, NaiveDate, Utc};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Calendar day (UTC) of a millisecond timestamp
///
/// Out-of-range timestamps fall back to the Unix epoch day.
pub fn day_of(ts: Timestamp) -> NaiveDate {
    DateTime::<Utc>::from_timestamp_millis(ts)
        .unwrap_or_default()
        .date_naive()
}

/// `YYYY-MM-DD` key for a calendar day
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse an RFC 3339 timestamp into Unix milliseconds
pub fn parse_rfc3339_millis(value: &str) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// Format Unix milliseconds as an RFC 3339 string (UTC)
pub fn to_rfc3339(ts: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp_millis(ts)
        .unwrap_or_default()
        .to_rfc3339()
}

/// Last six characters of an order id, as shown on tickets and alerts
pub fn short_id(id: &str) -> &str {
    let count = id.chars().count();
    if count <= 6 {
        return id;
    }
    let start = id
        .char_indices()
        .nth(count - 6)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    &id[start..]
}
