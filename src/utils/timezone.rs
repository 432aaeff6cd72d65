//! Fixed WIB (UTC+7) conversion.
//!
//! The backend stores UTC. Display uses a constant +7 offset with no DST and
//! no zone database, so WITA/WIT users see WIB times.

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};

pub const WIB_OFFSET_HOURS: i64 = 7;
pub const WIB_LABEL: &str = "WIB";

pub fn wib_offset() -> FixedOffset {
    // 7 * 3600 is always within FixedOffset's +/-86_400 range.
    FixedOffset::east_opt((WIB_OFFSET_HOURS * 3600) as i32).unwrap_or_else(|| Utc.fix())
}

/// Backend (UTC) wall-clock time to display (WIB) wall-clock time.
pub fn utc_to_wib(naive_utc: NaiveDateTime) -> NaiveDateTime {
    naive_utc + Duration::hours(WIB_OFFSET_HOURS)
}

/// Display (WIB) wall-clock time back to backend (UTC).
pub fn wib_to_utc(naive_wib: NaiveDateTime) -> NaiveDateTime {
    naive_wib - Duration::hours(WIB_OFFSET_HOURS)
}

pub fn to_wib(instant: DateTime<Utc>) -> DateTime<FixedOffset> {
    instant.with_timezone(&wib_offset())
}

pub fn now_wib() -> DateTime<FixedOffset> {
    to_wib(Utc::now())
}

/// Parses timestamps as the backend sends them: RFC 3339, naive ISO-8601
/// (assumed UTC), or a bare `yyyy-MM-dd` date (midnight UTC).
pub fn parse_backend_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

/// Midnight WIB of the day containing `instant`, expressed in UTC.
pub fn start_of_day_wib(instant: DateTime<Utc>) -> DateTime<Utc> {
    let local_midnight = to_wib(instant).date_naive().and_time(NaiveTime::MIN);
    Utc.from_utc_datetime(&wib_to_utc(local_midnight))
}

pub fn is_same_wib_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    to_wib(a).date_naive() == to_wib(b).date_naive()
}
