use crate::error::Error;
use crate::time::*;

use chrono::{Timelike, Utc};

#[test]
fn test_parse_converts_to_sydney_standard_time() {
    let instant = parse("2024-06-01T00:00:00Z").unwrap();

    assert_eq!(instant.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-06-01 10:00:00");
    assert_eq!(instant.format("%Z").to_string(), "AEST");
}

#[test]
fn test_parse_converts_to_sydney_daylight_time() {
    let instant = parse("2024-01-15T00:00:00Z").unwrap();

    assert_eq!(instant.hour(), 11);
    assert_eq!(instant.format("%Z").to_string(), "AEDT");
}

#[test]
fn test_parse_across_daylight_saving_start() {
    // clocks jump from 02:00 AEST to 03:00 AEDT on 2024-10-06
    let before = parse("2024-10-05T15:59:59Z").unwrap();
    let after = parse("2024-10-05T16:00:00Z").unwrap();

    assert_eq!(before.format("%H:%M:%S %Z").to_string(), "01:59:59 AEST");
    assert_eq!(after.format("%H:%M:%S %Z").to_string(), "03:00:00 AEDT");
    assert_eq!((after - before).num_seconds(), 1);
}

#[test]
fn test_parse_keeps_the_instant() {
    let instant = parse("2024-06-01T07:45:30Z").unwrap();

    assert_eq!(instant.with_timezone(&Utc).to_rfc3339(), "2024-06-01T07:45:30+00:00");
}

#[test]
fn test_parse_rejects_malformed_time() {
    let result = parse("2024-06-01 00:00:00");

    match result {
        Err(Error::TimeParse { value, .. }) => assert_eq!(value, "2024-06-01 00:00:00"),
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_parse_with_explicit_format() {
    let instant = parse_with_format("2024/06/01 00:00", "%Y/%m/%d %H:%M").unwrap();

    assert_eq!(instant.hour(), 10);
}

#[test]
fn test_date_and_time_formats_separately() {
    let instant = parse("2024-06-01T00:00:00Z").unwrap();

    let (day, clock) = date_and_time(&instant, "%A,  %d-%m-%Y", "%H:%M%Z");
    assert_eq!(day, "Saturday,  01-06-2024");
    assert_eq!(clock, "10:00AEST");

    let (day, clock) = date_and_time(&instant, "", "%H:%M");
    assert_eq!(day, "");
    assert_eq!(clock, "10:00");
}

#[test]
fn test_parse_local_reads_sydney_wall_clock() {
    let instant = parse_local("2024/06/01", "9:30am").unwrap();

    assert_eq!(instant.format("%Y-%m-%d %H:%M").to_string(), "2024-06-01 09:30");
    assert_eq!(instant.with_timezone(&Utc).to_rfc3339(), "2024-05-31T23:30:00+00:00");
}

#[test]
fn test_parse_local_afternoon() {
    let instant = parse_local("2024/01/15", "01:05PM").unwrap();

    assert_eq!(instant.format("%H:%M %Z").to_string(), "13:05 AEDT");
}

#[test]
fn test_parse_local_rejects_missing_wall_time() {
    // 02:30 does not exist on the morning daylight saving starts
    assert!(matches!(
        parse_local("2024/10/06", "2:30am"),
        Err(Error::InvalidDateTime(_))
    ));
}

#[test]
fn test_parse_local_prefers_earlier_ambiguous_time() {
    // 02:30 happens twice on the morning daylight saving ends
    let instant = parse_local("2024/04/07", "2:30am").unwrap();

    assert_eq!(instant.with_timezone(&Utc).to_rfc3339(), "2024-04-06T15:30:00+00:00");
}

#[test]
fn test_parse_local_rejects_garbage() {
    assert!(matches!(parse_local("tomorrow", "noon"), Err(Error::InvalidDateTime(_))));
}

#[test]
fn test_request_date_time() {
    let instant = parse("2024-06-01T23:05:00Z").unwrap();

    assert_eq!(
        request_date_time(&instant),
        ("20240602".to_string(), "0905".to_string())
    );
}
