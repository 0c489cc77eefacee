//! XMLTV timestamp parsing and hour bucketing.
//!
//! Bucket assignment at build time and window computation at query time
//! both go through [`round_to_hour`], so they can never disagree by an hour.

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};

/// `YYYYMMDDHHMMSS ±ZZZZ`, e.g. `20230115140000 +0000`.
pub const XMLTV_FORMAT: &str = "%Y%m%d%H%M%S %z";

/// Half-width of the query window, in hours.
const WINDOW_HOURS: i64 = 2;

/// Parse an XMLTV timestamp, keeping its UTC offset.
///
/// Leading and trailing whitespace is ignored. Returns `None` for anything
/// that does not match [`XMLTV_FORMAT`].
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(s.trim(), XMLTV_FORMAT).ok()
}

/// The value an unparsable timestamp degrades to: the Unix epoch at +00:00.
#[must_use]
pub fn zero_timestamp() -> DateTime<FixedOffset> {
    DateTime::<Utc>::UNIX_EPOCH.fixed_offset()
}

/// Round an instant to the nearest hour boundary, as a UTC bucket key.
///
/// Ties round up: exactly half past the hour goes to the next hour. In the
/// last hour chrono can represent, rounding up saturates to the floor.
pub fn round_to_hour<Tz: TimeZone>(t: &DateTime<Tz>) -> DateTime<Utc> {
    let utc = t.with_timezone(&Utc);
    let into_hour = TimeDelta::seconds(utc.timestamp().rem_euclid(3600))
        + TimeDelta::nanoseconds(i64::from(utc.timestamp_subsec_nanos()));
    let floor = utc.checked_sub_signed(into_hour).unwrap_or(utc);
    if into_hour >= TimeDelta::minutes(30) {
        floor.checked_add_signed(TimeDelta::hours(1)).unwrap_or(floor)
    } else {
        floor
    }
}

/// The bucket keys searched by the grid queries, from two hours before the
/// rounded `t` to two hours after, in that order.
///
/// Normally five keys. Near the ends of chrono's range, keys that cannot be
/// represented are left out.
pub fn window_around<Tz: TimeZone>(t: &DateTime<Tz>) -> Vec<DateTime<Utc>> {
    let centre = round_to_hour(t);
    (-WINDOW_HOURS..=WINDOW_HOURS)
        .filter_map(|offset| centre.checked_add_signed(TimeDelta::hours(offset)))
        .collect()
}
