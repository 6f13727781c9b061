use crate::error::{Error, Result};

use chrono_tz::Tz;
use std::path::PathBuf;

//////////////////////////////////////////////////////////
// Time
//////////////////////////////////////////////////////////
/// Every instant shown to users lives in this zone.
pub const TIMEZONE: Tz = chrono_tz::Australia::Sydney;

/// Timestamps sent by the trip planner, always UTC.
pub const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
/// Date and time typed by users, e.g. `2024/06/01 9:30am`.
pub const USER_TIME_FORMAT: &str = "%Y/%m/%d %I:%M%p";

pub const DAY_FORMAT: &str = "%A,  %d-%m-%Y";
pub const CLOCK_FORMAT: &str = "%H:%M%Z";
pub const STOP_TIME_FORMAT: &str = "%H:%M";
pub const STATUS_DATE_FORMAT: &str = "%Y-%m-%d";
pub const STATUS_TIME_FORMAT: &str = "%H:%M";
pub const REQUEST_DATE_FORMAT: &str = "%Y%m%d";
pub const REQUEST_TIME_FORMAT: &str = "%H%M";

//////////////////////////////////////////////////////////
// Trip planner API
//////////////////////////////////////////////////////////
pub const API_URL: &str = "https://api.transport.nsw.gov.au/v1/tp";
pub const API_VERSION: &str = "10.2.1.42";
pub const JSON_FORMAT: &str = "rapidJSON";
pub const COORDINATE_FORMAT: &str = "EPSG:4326";
pub const DEFAULT_TRIP_COUNT: u32 = 5;

//////////////////////////////////////////////////////////
// Saved selections
//////////////////////////////////////////////////////////
pub const SAVED_STOPS_FILE: &str = "stops.json";
pub const SAVED_TRIPS_FILE: &str = "trips.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub data_dir: PathBuf,
}

impl Config {
    /// Reads the configuration from the environment. `.env` should already
    /// be loaded at this point.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("TFNSW_API_KEY").map_err(|_| Error::MissingEnv("TFNSW_API_KEY"))?;
        let api_url = std::env::var("TFNSW_API_URL").unwrap_or_else(|_| API_URL.to_string());
        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Ok(Config {
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            data_dir,
        })
    }
}
