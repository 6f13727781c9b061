use crate::error::Result;
use crate::structs::StopEvent;
use crate::time;
use crate::transport::TransportType;

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use indexmap::IndexMap;
use std::fmt;

/// Time left until a departure, split into whole units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// `None` for negative durations, i.e. departures already gone.
    pub fn from_duration(duration: Duration) -> Option<Self> {
        if duration < Duration::zero() {
            return None;
        }
        let total = duration.num_seconds();
        Some(Countdown {
            hours: total / 3600,
            minutes: total % 3600 / 60,
            seconds: total % 60,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartureRecord {
    pub location: String,
    pub countdown: Countdown,
    pub route: String,
    pub destination: String,
    pub transport: TransportType,
    pub stop_id: String,
}

impl fmt::Display for DepartureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Countdown { hours, minutes, seconds } = self.countdown;
        write!(
            f,
            "-{}\n {} hours, {} minutes and {} seconds from {}\n {} to {}",
            self.transport, hours, minutes, seconds, self.location, self.route, self.destination
        )
    }
}

/// Turns the stop events of one stop into departure records counted down
/// from `reference`, sorted by location name.
///
/// Returns `Ok(None)` when the API sent no events at all, and `Ok(Some(vec![]))`
/// when every event had already departed.
pub fn normalize_departures(
    events: Option<&[StopEvent]>,
    reference: &DateTime<Tz>,
) -> Result<Option<Vec<DepartureRecord>>> {
    let events = match events {
        Some(events) => events,
        None => return Ok(None),
    };

    let mut departures = Vec::with_capacity(events.len());
    for event in events {
        let planned = time::parse(&event.departure_time_planned)?;
        let countdown = match Countdown::from_duration(planned.signed_duration_since(*reference)) {
            Some(c) => c,
            None => continue,
        };
        let transportation = &event.transportation;

        departures.push(DepartureRecord {
            location: event.location.name.clone(),
            countdown,
            route: transportation.number.clone(),
            destination: transportation
                .destination
                .as_ref()
                .map(|d| d.name.clone())
                .unwrap_or_default(),
            transport: TransportType::from_icon_id(transportation.product.icon_id)?,
            stop_id: event.location.id.clone(),
        });
    }
    log::debug!("{} of {} departures still ahead", departures.len(), events.len());

    // stable, so ties keep the API's order
    departures.sort_by(|a, b| a.location.cmp(&b.location));
    Ok(Some(departures))
}

/// Buckets departures by location name, keeping first-seen order.
pub fn group_by_location(departures: Vec<DepartureRecord>) -> IndexMap<String, Vec<DepartureRecord>> {
    let mut groups: IndexMap<String, Vec<DepartureRecord>> = IndexMap::new();
    for departure in departures {
        groups.entry(departure.location.clone()).or_default().push(departure);
    }
    groups
}
