mod journeys;
mod time;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::de::DeserializeOwned;

/// API timestamp as a Sydney instant.
fn at(value: &str) -> DateTime<Tz> {
    crate::time::parse(value).unwrap()
}

fn from_json<T: DeserializeOwned>(value: serde_json::Value) -> T {
    serde_json::from_value(value).unwrap()
}
