use serde::{Deserialize, Serialize};

/// `[latitude, longitude]` as returned with `coordOutputFormat=EPSG:4326`.
pub type Coord = [f64; 2];

//////////////////////////////////////////////////////////
// stop_finder
//////////////////////////////////////////////////////////
#[derive(Debug, Clone, Deserialize)]
pub struct StopFinderResponse {
    #[serde(default)]
    pub locations: Vec<StopCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopCandidate {
    pub id: String,
    pub name: String,
    pub coord: Option<Coord>,
    /// Icon ids of the transport modes serving this location
    pub modes: Option<Vec<i64>>,
}

//////////////////////////////////////////////////////////
// departure_mon
//////////////////////////////////////////////////////////
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureMonitorResponse {
    pub stop_events: Option<Vec<StopEvent>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopEvent {
    pub departure_time_planned: String,
    pub transportation: Transportation,
    pub location: EventLocation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventLocation {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transportation {
    /// Line name, `None` on walking legs
    pub name: Option<String>,
    /// Route number, e.g. `T1`
    #[serde(default)]
    pub number: String,
    pub destination: Option<TransportDestination>,
    pub product: Product,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransportDestination {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub icon_id: i64,
}

//////////////////////////////////////////////////////////
// trip
//////////////////////////////////////////////////////////
#[derive(Debug, Clone, Deserialize)]
pub struct TripResponse {
    pub journeys: Option<Vec<Journey>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Journey {
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub fare: Fare,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub origin: LegStop,
    pub destination: LegStop,
    pub transportation: Transportation,
    /// Seconds
    #[serde(default)]
    pub duration: i64,
    pub stop_sequence: Option<Vec<LegStop>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegStop {
    #[serde(default)]
    pub name: String,
    pub coord: Option<Coord>,
    pub departure_time_planned: Option<String>,
    pub departure_time_estimated: Option<String>,
    pub arrival_time_planned: Option<String>,
    pub arrival_time_estimated: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fare {
    #[serde(default)]
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ticket {
    /// Rider category, e.g. `ADULT` or `SCHOLAR`
    pub person: String,
    pub properties: TicketProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketProperties {
    pub price_total_fare: Price,
}

/// Prices come either as JSON numbers or as numeric strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
}

//////////////////////////////////////////////////////////
// add_info
//////////////////////////////////////////////////////////
#[derive(Debug, Clone, Deserialize)]
pub struct AdditionalInfoResponse {
    pub infos: Infos,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Infos {
    #[serde(default)]
    pub current: Vec<RawStatusMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStatusMessage {
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub priority: String,
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Timestamps {
    pub creation: String,
    #[serde(default)]
    pub validity: Vec<Validity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Validity {
    pub to: String,
}

//////////////////////////////////////////////////////////
// Saved selections
//////////////////////////////////////////////////////////
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct SavedStop {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct SavedTrip {
    pub origin: SavedStop,
    pub destination: SavedStop,
}
