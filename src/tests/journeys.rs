use super::from_json;
use crate::error::Error;
use crate::journeys::*;
use crate::structs::{Journey, Ticket};
use crate::transport::TransportType;

use serde_json::{json, Value};

fn train_leg() -> Value {
    json!({
        "duration": 600,
        "origin": { "name": "Epping Station", "departureTimeEstimated": "2024-06-01T00:00:00Z" },
        "destination": { "name": "Central Station", "arrivalTimeEstimated": "2024-06-01T00:10:00Z" },
        "transportation": { "name": "T9 Northern Line", "number": "T9", "product": { "iconId": 1 } },
        "stopSequence": [
            {
                "name": "Epping Station",
                "coord": [-33.772, 151.082],
                "departureTimePlanned": "2024-06-01T00:00:00Z",
                "departureTimeEstimated": "2024-06-01T00:01:00Z"
            },
            {
                "name": "Central Station",
                "coord": [-33.883, 151.206],
                "arrivalTimePlanned": "2024-06-01T00:10:00Z"
            }
        ]
    })
}

fn walk_leg() -> Value {
    json!({
        "duration": 300,
        "origin": { "name": "Central Station" },
        "destination": { "name": "Eddy Ave", "arrivalTimeEstimated": "2024-06-01T00:15:00Z" },
        "transportation": { "name": null, "product": { "iconId": 100 } },
        "stopSequence": [
            { "name": "Central Station" },
            { "name": "Eddy Ave", "coord": [-33.882, 151.208], "arrivalTimeEstimated": "2024-06-01T00:15:00Z" }
        ]
    })
}

fn bus_leg() -> Value {
    json!({
        "duration": 90,
        "origin": { "name": "Eddy Ave" },
        "destination": { "name": "Railway Square", "arrivalTimeEstimated": "2024-06-01T00:16:30Z" },
        "transportation": { "name": "M30", "number": "M30", "product": { "iconId": 5 } }
    })
}

fn tickets() -> Value {
    json!([
        { "person": "ADULT", "properties": { "priceTotalFare": "4.20" } },
        { "person": "ADULT", "properties": { "priceTotalFare": 1.1 } },
        { "person": "CHILD", "properties": { "priceTotalFare": "2.10" } },
        { "person": "SCHOLAR", "properties": { "priceTotalFare": "2.10" } }
    ])
}

fn journey(legs: Vec<Value>) -> Journey {
    from_json(json!({ "legs": legs, "fare": { "tickets": tickets() } }))
}

#[test]
fn test_fare_sums_selected_category_only() {
    let tickets: Vec<Ticket> = from_json(tickets());

    assert_eq!(total_fare(&tickets, FareCategory::Adult).unwrap(), 5.3);
    assert_eq!(total_fare(&tickets, FareCategory::Child).unwrap(), 2.1);
    assert_eq!(total_fare(&tickets, FareCategory::Scholar).unwrap(), 2.1);
    assert_eq!(total_fare(&tickets, FareCategory::Senior).unwrap(), 0.0);
}

#[test]
fn test_invalid_price_is_reported() {
    let tickets: Vec<Ticket> = from_json(json!([
        { "person": "ADULT", "properties": { "priceTotalFare": "free" } }
    ]));

    assert!(matches!(
        total_fare(&tickets, FareCategory::Adult),
        Err(Error::InvalidPrice(_))
    ));
    // other categories never look at the price
    assert_eq!(total_fare(&tickets, FareCategory::Child).unwrap(), 0.0);
}

#[test]
fn test_duration_in_minutes() {
    let journey = journey(vec![train_leg(), walk_leg(), bus_leg()]);

    assert_eq!(total_duration(&journey.legs), 16.5);
}

#[test]
fn test_duration_rounds_to_two_decimals() {
    let mut leg = bus_leg();
    leg["duration"] = json!(100);
    let journey = journey(vec![leg]);

    // 100 / 60 = 1.6666...
    assert_eq!(total_duration(&journey.legs), 1.67);
}

#[test]
fn test_journey_summary() {
    let journey = journey(vec![train_leg(), walk_leg(), bus_leg()]);

    let summary = summarize_journey(&journey, FareCategory::Adult).unwrap();

    assert_eq!(summary.total_fare, 5.3);
    assert_eq!(summary.total_duration, 16.5);
    assert_eq!(
        summary.summary,
        vec![TransportType::Train, TransportType::Walk, TransportType::Bus]
    );
    assert_eq!(
        summary.departure,
        ("Saturday,  01-06-2024".to_string(), "10:00AEST".to_string())
    );
    assert_eq!(
        summary.arrival,
        ("Saturday,  01-06-2024".to_string(), "10:16AEST".to_string())
    );
    assert_eq!(summary.origin, "Epping Station");
    assert_eq!(summary.destination, "Railway Square");
}

#[test]
fn test_stops_grouped_by_line_with_walk_key() {
    let journey = journey(vec![train_leg(), walk_leg(), bus_leg()]);

    let summary = summarize_journey(&journey, FareCategory::Adult).unwrap();

    // the bus leg has no stop sequence
    let keys: Vec<&String> = summary.stops.keys().collect();
    assert_eq!(keys, vec!["T9 Northern Line", WALK_KEY]);
    assert_eq!(summary.number_of_stops(), 2);

    let train: Vec<String> = summary.stops["T9 Northern Line"].iter().map(|s| s.to_string()).collect();
    assert_eq!(
        train,
        vec!["Epping Station arrives: 10:01", "Central Station arrives: 10:10"]
    );

    let walk = &summary.stops[WALK_KEY];
    assert_eq!(walk[0], StopTime { name: "Central Station".to_string(), time: None });
    assert_eq!(walk[0].to_string(), "Central Station arrives: Unavailable");
    assert_eq!(walk[1].to_string(), "Eddy Ave arrives: 10:15");
}

#[test]
fn test_coordinates_follow_travel_order() {
    let journey = journey(vec![train_leg(), walk_leg(), bus_leg()]);

    let summary = summarize_journey(&journey, FareCategory::Adult).unwrap();

    assert_eq!(
        summary.coords,
        vec![[-33.772, 151.082], [-33.883, 151.206], [-33.882, 151.208]]
    );
}

#[test]
fn test_legs_counted_apart_from_stop_lines() {
    // the bus leg has no stop sequence
    let journey = journey(vec![train_leg(), walk_leg(), bus_leg()]);

    let summary = summarize_journey(&journey, FareCategory::Adult).unwrap();

    assert_eq!(summary.number_of_legs(), 3);
    assert_eq!(summary.number_of_stops(), 2);
}

#[test]
fn test_repeated_line_replaces_earlier_stops_in_place() {
    let mut second_train = train_leg();
    second_train["stopSequence"] = json!([{ "name": "Strathfield" }]);
    let journey = journey(vec![train_leg(), walk_leg(), second_train]);

    let (stops, _) = stop_info(&journey.legs).unwrap();

    let keys: Vec<&String> = stops.keys().collect();
    assert_eq!(keys, vec!["T9 Northern Line", WALK_KEY]);
    assert_eq!(stops["T9 Northern Line"].len(), 1);
    assert_eq!(stops["T9 Northern Line"][0].name, "Strathfield");
}

#[test]
fn test_stop_time_precedence() {
    let mut leg = train_leg();
    leg["stopSequence"] = json!([
        {
            "name": "a",
            "arrivalTimeEstimated": "2024-06-01T00:02:00Z",
            "departureTimePlanned": "2024-06-01T00:03:00Z",
            "arrivalTimePlanned": "2024-06-01T00:04:00Z"
        },
        {
            "name": "b",
            "departureTimePlanned": "2024-06-01T00:03:00Z",
            "arrivalTimePlanned": "2024-06-01T00:04:00Z"
        },
        { "name": "c", "arrivalTimePlanned": "2024-06-01T00:04:00Z" }
    ]);
    let journey = journey(vec![leg]);

    let (stops, _) = stop_info(&journey.legs).unwrap();

    let times: Vec<Option<&str>> = stops["T9 Northern Line"].iter().map(|s| s.time.as_deref()).collect();
    assert_eq!(times, vec![Some("10:02"), Some("10:03"), Some("10:04")]);
}

#[test]
fn test_empty_journey_is_reported() {
    let journey = journey(vec![]);

    assert!(matches!(
        summarize_journey(&journey, FareCategory::Adult),
        Err(Error::EmptyJourney)
    ));
}

#[test]
fn test_departure_falls_back_to_planned_time() {
    let mut leg = bus_leg();
    leg["origin"] = json!({ "name": "Eddy Ave", "departureTimePlanned": "2024-06-01T00:15:00Z" });
    let journey = journey(vec![leg]);

    let summary = summarize_journey(&journey, FareCategory::Adult).unwrap();

    assert_eq!(summary.departure.1, "10:15AEST");
}

#[test]
fn test_missing_departure_time_is_reported() {
    let journey = journey(vec![bus_leg()]);

    assert!(matches!(
        summarize_journey(&journey, FareCategory::Adult),
        Err(Error::MissingTime("departure"))
    ));
}

#[test]
fn test_summarize_journeys_keeps_order() {
    let journeys = vec![
        journey(vec![train_leg()]),
        journey(vec![train_leg(), walk_leg(), bus_leg()]),
    ];

    let summaries = summarize_journeys(&journeys, FareCategory::Child).unwrap();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].destination, "Central Station");
    assert_eq!(summaries[1].destination, "Railway Square");
    assert!(summaries.iter().all(|s| s.total_fare == 2.1));
}

#[test]
fn test_fare_category_from_str() {
    assert_eq!("ADULT".parse::<FareCategory>().unwrap(), FareCategory::Adult);
    assert_eq!("child".parse::<FareCategory>().unwrap(), FareCategory::Child);
    assert_eq!("Senior".parse::<FareCategory>().unwrap(), FareCategory::Senior);
    assert_eq!("concession".parse::<FareCategory>().unwrap(), FareCategory::Scholar);
    assert!(matches!(
        "student".parse::<FareCategory>(),
        Err(Error::InvalidFareCategory(_))
    ));
    assert_eq!(FareCategory::default(), FareCategory::Adult);
}

#[test]
fn test_journey_display() {
    let journey = journey(vec![train_leg(), walk_leg(), bus_leg()]);

    let text = summarize_journey(&journey, FareCategory::Adult).unwrap().to_string();

    assert!(text.starts_with("Epping Station -> Railway Square\n"));
    assert!(text.contains("\nwalk\nCentral Station arrives: Unavailable\n"));
    assert!(text.contains("Trip Duration: 16.5 minutes Cost: 5.30"));
    assert!(text.ends_with("transport used: train -> walk -> bus"));
}
