use time::{Date, Duration, OffsetDateTime, UtcOffset};

/// Calendar date of `ts` as seen by a user at `offset`.
pub fn local_date(ts: OffsetDateTime, offset: UtcOffset) -> Date {
    ts.to_offset(offset).date()
}

pub fn on_local_day(ts: OffsetDateTime, date: Date, offset: UtcOffset) -> bool {
    local_date(ts, offset) == date
}

/// Inclusive rolling window `[now - days, now]`.
pub fn within_last_days(ts: OffsetDateTime, now: OffsetDateTime, days: i64) -> bool {
    ts >= now - Duration::days(days) && ts <= now
}

/// `value` rounded to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
