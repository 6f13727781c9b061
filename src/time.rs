//! Conversion of trip planner timestamps into Sydney local time.

use crate::config::*;
use crate::error::{Error, Result};

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Parses an API timestamp (`2024-06-01T00:00:00Z`) into Sydney local time.
pub fn parse(value: &str) -> Result<DateTime<Tz>> {
    parse_with_format(value, API_TIME_FORMAT)
}

/// Parses `value` with `format`, reading it as UTC, and converts it into
/// Sydney local time. Daylight saving comes from the tz database.
pub fn parse_with_format(value: &str, format: &str) -> Result<DateTime<Tz>> {
    let naive = NaiveDateTime::parse_from_str(value, format).map_err(|source| Error::TimeParse {
        value: value.to_string(),
        source,
    })?;
    Ok(Utc.from_utc_datetime(&naive).with_timezone(&TIMEZONE))
}

/// Formats the date and the time of `instant` separately.
pub fn date_and_time(instant: &DateTime<Tz>, date_format: &str, time_format: &str) -> (String, String) {
    (
        instant.format(date_format).to_string(),
        instant.format(time_format).to_string(),
    )
}

pub fn now() -> DateTime<Tz> {
    Utc::now().with_timezone(&TIMEZONE)
}

/// Reads a date/time pair typed by a user (`2024/06/01`, `9:30am`) as Sydney
/// wall clock time. During the autumn overlap the earlier instant wins.
pub fn parse_local(date: &str, time: &str) -> Result<DateTime<Tz>> {
    let value = format!("{} {}", date, time);
    let naive = NaiveDateTime::parse_from_str(&value, USER_TIME_FORMAT)
        .map_err(|_| Error::InvalidDateTime(value.clone()))?;

    match TIMEZONE.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Ok(instant),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier),
        LocalResult::None => Err(Error::InvalidDateTime(value)),
    }
}

/// `itdDate` / `itdTime` request parameters for `instant`.
pub fn request_date_time(instant: &DateTime<Tz>) -> (String, String) {
    date_and_time(instant, REQUEST_DATE_FORMAT, REQUEST_TIME_FORMAT)
}
