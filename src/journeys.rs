use crate::config::*;
use crate::error::{Error, Result};
use crate::structs::*;
use crate::time;
use crate::transport::TransportType;

use indexmap::IndexMap;
use std::{fmt, str::FromStr};

/// Grouping key of legs the API sends without a line name.
pub const WALK_KEY: &str = "walk";
/// Shown for stops the API gives no time for.
pub const UNAVAILABLE: &str = "Unavailable";

/// Rider category fares are summed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FareCategory {
    #[default]
    Adult,
    Child,
    Senior,
    /// Concession
    Scholar,
}

impl FareCategory {
    /// The `person` tag carried by the API's tickets.
    pub fn tag(&self) -> &'static str {
        match self {
            FareCategory::Adult => "ADULT",
            FareCategory::Child => "CHILD",
            FareCategory::Senior => "SENIOR",
            FareCategory::Scholar => "SCHOLAR",
        }
    }
}

impl FromStr for FareCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "ADULT" => Ok(FareCategory::Adult),
            "CHILD" => Ok(FareCategory::Child),
            "SENIOR" => Ok(FareCategory::Senior),
            "SCHOLAR" | "CONCESSION" => Ok(FareCategory::Scholar),
            _ => Err(Error::InvalidFareCategory(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopTime {
    pub name: String,
    /// `None` when the API has no time for this stop
    pub time: Option<String>,
}

impl fmt::Display for StopTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} arrives: {}", self.name, self.time.as_deref().unwrap_or(UNAVAILABLE))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JourneySummary {
    pub total_fare: f64,
    /// Minutes
    pub total_duration: f64,
    pub summary: Vec<TransportType>,
    /// (day, time)
    pub departure: (String, String),
    /// (day, time)
    pub arrival: (String, String),
    /// Stops per leg, keyed by line name or [`WALK_KEY`]
    pub stops: IndexMap<String, Vec<StopTime>>,
    pub coords: Vec<Coord>,
    pub origin: String,
    pub destination: String,
}

impl JourneySummary {
    /// Number of lines listed in `stops`. Legs without a stop sequence are
    /// not counted and a repeated line counts once.
    pub fn number_of_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn number_of_legs(&self) -> usize {
        self.summary.len()
    }
}

impl fmt::Display for JourneySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} -> {}", self.origin, self.destination)?;
        for (line, stops) in &self.stops {
            writeln!(f, "\n{}", line)?;
            for stop in stops {
                writeln!(f, "{}", stop)?;
            }
        }
        writeln!(
            f,
            "\n{} - {} to {} - {}",
            self.departure.0, self.departure.1, self.arrival.0, self.arrival.1
        )?;
        writeln!(
            f,
            " Trip Duration: {} minutes Cost: {:.2}",
            self.total_duration, self.total_fare
        )?;
        let summary: Vec<&str> = self.summary.iter().map(|t| t.label()).collect();
        write!(f, "transport used: {}", summary.join(" -> "))
    }
}

pub fn summarize_journeys(journeys: &[Journey], category: FareCategory) -> Result<Vec<JourneySummary>> {
    journeys
        .iter()
        .map(|journey| summarize_journey(journey, category))
        .collect()
}

pub fn summarize_journey(journey: &Journey, category: FareCategory) -> Result<JourneySummary> {
    let first = journey.legs.first().ok_or(Error::EmptyJourney)?;
    let last = journey.legs.last().ok_or(Error::EmptyJourney)?;

    let summary = journey
        .legs
        .iter()
        .map(|leg| TransportType::from_icon_id(leg.transportation.product.icon_id))
        .collect::<Result<Vec<_>>>()?;

    // estimated times may be missing for trips far in the future
    let depart = first
        .origin
        .departure_time_estimated
        .as_deref()
        .or(first.origin.departure_time_planned.as_deref())
        .ok_or(Error::MissingTime("departure"))?;
    let arrive = last
        .destination
        .arrival_time_estimated
        .as_deref()
        .or(last.destination.arrival_time_planned.as_deref())
        .ok_or(Error::MissingTime("arrival"))?;

    let departure = time::date_and_time(&time::parse(depart)?, DAY_FORMAT, CLOCK_FORMAT);
    let arrival = time::date_and_time(&time::parse(arrive)?, DAY_FORMAT, CLOCK_FORMAT);
    let (stops, coords) = stop_info(&journey.legs)?;

    Ok(JourneySummary {
        total_fare: total_fare(&journey.fare.tickets, category)?,
        total_duration: total_duration(&journey.legs),
        summary,
        departure,
        arrival,
        stops,
        coords,
        origin: first.origin.name.clone(),
        destination: last.destination.name.clone(),
    })
}

/// Sum of the prices of the tickets tagged with `category`, in dollars.
pub fn total_fare(tickets: &[Ticket], category: FareCategory) -> Result<f64> {
    let mut total = 0.0;
    for ticket in tickets.iter().filter(|t| t.person == category.tag()) {
        total += ticket.properties.price_total_fare.value()?;
    }
    Ok(round2(total))
}

/// Sum of the leg durations in minutes, rounded to 2 decimals.
pub fn total_duration(legs: &[Leg]) -> f64 {
    let seconds: i64 = legs.iter().map(|leg| leg.duration).sum();
    round2(seconds as f64 / 60.0)
}

/// Lists the stops of every leg under its line name, together with the
/// coordinates of all stops in travel order. Legs without a stop sequence
/// are left out.
pub fn stop_info(legs: &[Leg]) -> Result<(IndexMap<String, Vec<StopTime>>, Vec<Coord>)> {
    let mut stops = IndexMap::new();
    let mut coords = Vec::new();

    for leg in legs {
        let sequence = match leg.stop_sequence.as_deref() {
            Some(sequence) if !sequence.is_empty() => sequence,
            _ => continue,
        };
        let key = leg
            .transportation
            .name
            .clone()
            .unwrap_or_else(|| WALK_KEY.to_string());

        let mut times = Vec::with_capacity(sequence.len());
        for stop in sequence {
            times.push(StopTime {
                name: stop.name.clone(),
                time: stop_time(stop)?,
            });
            if let Some(coord) = stop.coord {
                coords.push(coord);
            }
        }
        // a line seen again later replaces its earlier stops but keeps its position
        stops.insert(key, times);
    }
    Ok((stops, coords))
}

/// Best known time of a stop: estimated before planned, departure before arrival.
fn stop_time(stop: &LegStop) -> Result<Option<String>> {
    let best = stop
        .departure_time_estimated
        .as_deref()
        .or(stop.arrival_time_estimated.as_deref())
        .or(stop.departure_time_planned.as_deref())
        .or(stop.arrival_time_planned.as_deref());

    match best {
        Some(value) => {
            let (_, clock) = time::date_and_time(&time::parse(value)?, "", STOP_TIME_FORMAT);
            Ok(Some(clock))
        }
        None => Ok(None),
    }
}

impl Price {
    pub fn value(&self) -> Result<f64> {
        match self {
            Price::Number(n) => Ok(*n),
            Price::Text(s) => s.trim().parse().map_err(|_| Error::InvalidPrice(s.clone())),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
