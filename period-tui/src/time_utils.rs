use time::{Date, OffsetDateTime, UtcOffset};

pub fn to_local_time(dt: OffsetDateTime) -> OffsetDateTime {
    if let Ok(local_offset) = UtcOffset::current_local_offset() {
        dt.to_offset(local_offset)
    } else {
        dt
    }
}

/// Today's date in the local timezone, or in UTC when the offset is unknown.
pub fn local_today() -> Date {
    to_local_time(OffsetDateTime::now_utc()).date()
}
