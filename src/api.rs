use crate::config::*;
use crate::error::Result;
use crate::structs::*;
use crate::time;
use crate::transport::ExclusionSpec;

use chrono::DateTime;
use chrono_tz::Tz;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;

type Params = Vec<(&'static str, String)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripOptions {
    /// Treat the requested time as the latest arrival instead of the departure
    pub arrive_by: bool,
    pub trips: u32,
    pub wheelchair: bool,
}

impl Default for TripOptions {
    fn default() -> Self {
        TripOptions {
            arrive_by: false,
            trips: DEFAULT_TRIP_COUNT,
            wheelchair: false,
        }
    }
}

/// Client for the Transport for NSW trip planner API.
#[derive(Debug, Clone)]
pub struct TripPlanner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

//////////////////////////////////////////////////////////
// API calls
//////////////////////////////////////////////////////////
impl TripPlanner {
    pub fn new(config: &Config) -> Self {
        TripPlanner {
            client: reqwest::Client::new(),
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: Params) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {} {:?}", url, params);

        let resp = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, "reqwest/0.11.13")
            .header(AUTHORIZATION, format!("apikey {}", self.api_key))
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(serde_json::from_str(&resp)?)
    }

    /// Searches stops by name, or looks one up by id when `by_id` is set.
    pub async fn find_stops(&self, query: &str, by_id: bool) -> Result<Vec<StopCandidate>> {
        let resp: StopFinderResponse = self.get("stop_finder", stop_finder_params(query, by_id)).await?;
        Ok(resp.locations)
    }

    /// Departures from `stop_id` after `when`. `None` when the API has no events.
    pub async fn departures(
        &self,
        stop_id: &str,
        when: &DateTime<Tz>,
        exclusions: &ExclusionSpec,
    ) -> Result<Option<Vec<StopEvent>>> {
        let resp: DepartureMonitorResponse = self
            .get("departure_mon", departure_params(stop_id, when, exclusions))
            .await?;
        Ok(resp.stop_events)
    }

    pub async fn trips(
        &self,
        origin: &str,
        destination: &str,
        when: &DateTime<Tz>,
        options: &TripOptions,
    ) -> Result<Option<Vec<Journey>>> {
        let resp: TripResponse = self
            .get("trip", trip_params(origin, destination, when, options))
            .await?;
        Ok(resp.journeys)
    }

    /// Current service alerts for a stop.
    pub async fn status(&self, stop_id: &str) -> Result<Vec<RawStatusMessage>> {
        let resp: AdditionalInfoResponse = self.get("add_info", status_params(stop_id)).await?;
        Ok(resp.infos.current)
    }
}

//////////////////////////////////////////////////////////
// Query parameters
//////////////////////////////////////////////////////////
fn common_params() -> Params {
    vec![
        ("outputFormat", JSON_FORMAT.to_string()),
        ("coordOutputFormat", COORDINATE_FORMAT.to_string()),
        ("version", API_VERSION.to_string()),
    ]
}

pub fn stop_finder_params(query: &str, by_id: bool) -> Params {
    let mut params = common_params();
    params.push(("type_sf", "any".to_string()));
    params.push(("name_sf", query.to_string()));
    if by_id {
        // best match only
        params.push(("TfNSWSF", "true".to_string()));
    }
    params
}

pub fn departure_params(stop_id: &str, when: &DateTime<Tz>, exclusions: &ExclusionSpec) -> Params {
    let (date, clock) = time::request_date_time(when);
    let mut params = common_params();
    params.extend([
        ("mode", "direct".to_string()),
        ("type_dm", "any".to_string()),
        ("name_dm", stop_id.to_string()),
        ("depArrMacro", "dep".to_string()),
        ("itdDate", date),
        ("itdTime", clock),
        ("departureMonitorMacro", "true".to_string()),
        ("TfNSWDM", "true".to_string()),
    ]);
    params.extend(exclusions.query_params());
    params
}

pub fn trip_params(origin: &str, destination: &str, when: &DateTime<Tz>, options: &TripOptions) -> Params {
    let (date, clock) = time::request_date_time(when);
    let dep_arr = if options.arrive_by { "arr" } else { "dep" };
    let mut params = common_params();
    params.extend([
        ("depArrMacro", dep_arr.to_string()),
        ("itdDate", date),
        ("itdTime", clock),
        ("type_origin", "any".to_string()),
        ("name_origin", origin.to_string()),
        ("type_destination", "any".to_string()),
        ("name_destination", destination.to_string()),
        ("calcNumberOfTrips", options.trips.to_string()),
        ("TfNSWTR", "true".to_string()),
    ]);
    if options.wheelchair {
        params.push(("wheelchair", "on".to_string()));
    }
    params
}

pub fn status_params(stop_id: &str) -> Params {
    let mut params = common_params();
    params.push(("filterPublicationStatus", "current".to_string()));
    params.push(("itdLPxx_selStop", stop_id.to_string()));
    params
}
