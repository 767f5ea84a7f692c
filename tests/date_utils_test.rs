use chrono::{NaiveDate, NaiveTime};
use daynote_sync::utils::datetime::*;

#[test]
fn test_format_ymd() {
    let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    assert_eq!(format_ymd(date), "2025-01-15");
    assert_eq!(parse_date("2025-01-15").unwrap(), date);
}

#[test]
fn test_parse_rfc3339_keeps_wall_clock() {
    let ts = parse_remote_timestamp("2024-01-01T23:30:00+05:00").unwrap();
    assert_eq!(ts.time(), NaiveTime::from_hms_opt(23, 30, 0).unwrap());
    assert_eq!(truncate_to_date(ts), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
}

#[test]
fn test_parse_graph_timestamp() {
    // Graph reports seven fractional digits and no offset
    let ts = parse_remote_timestamp("2024-01-01T10:00:00.0000000").unwrap();
    assert_eq!(truncate_to_date(ts), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
}

#[test]
fn test_truncation_discards_time_and_zone() {
    let ts = parse_remote_timestamp("2024-01-01T10:00:00Z").unwrap();
    assert_eq!(truncate_to_date(ts), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
}

#[test]
fn test_parse_bare_date_and_garbage() {
    let ts = parse_remote_timestamp("2024-03-02").unwrap();
    assert_eq!(ts.time(), NaiveTime::MIN);
    assert!(parse_remote_timestamp("yesterday").is_none());
}

#[test]
fn test_format_remote_date() {
    let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
    assert_eq!(format_remote_date(date), "2024-05-06T00:00:00");
}
