use approx::assert_abs_diff_eq;
use chrono::{TimeZone, Utc};
use natal::time::{
    datetime_to_julian_day, parse_timestamp, resolve_instant, Localization, ParsedTimestamp, J2000,
};
use natal::ChartError;

#[test]
fn test_accepted_timestamp_shapes() {
    for input in [
        "1990-06-15",
        "1990-06-15T08:30",
        "1990-06-15T08:30:00",
        "1990-06-15T08:30:00.250",
        "1990-06-15 08:30",
        "1990-06-15 08:30:00",
        "1990-06-15T08",
        "1990-06-15 08",
    ] {
        assert!(
            matches!(parse_timestamp(input), Ok(ParsedTimestamp::Local(_))),
            "{input}"
        );
    }
    for input in [
        "1990-06-15T08:30:00Z",
        "1990-06-15T08:30:00+02:00",
        "1990-06-15T08:30-05:00",
        "1990-06-15T08:30Z",
        "1990-06-15T08:30:00+02",
        "1990-06-15T08:30-0330",
    ] {
        assert!(
            matches!(parse_timestamp(input), Ok(ParsedTimestamp::Offset(_))),
            "{input}"
        );
    }
}

#[test]
fn test_garbage_timestamp_is_an_error() {
    for input in [
        "",
        "yesterday",
        "1990-13-45T08:30",
        "15/06/1990 08:30",
        "1990-06-15T25",
        "1990-06-15T8",
    ] {
        assert!(
            matches!(resolve_instant(input, "UTC"), Err(ChartError::TemporalParse { .. })),
            "{input}"
        );
    }
}

#[test]
fn test_zone_localizes_wall_clock() {
    // BST is UTC+1 in June
    let resolved = resolve_instant("1990-06-15T08:30:00", "Europe/London").unwrap();
    assert_eq!(resolved.localization, Localization::Zone);
    assert_eq!(resolved.utc, Utc.with_ymd_and_hms(1990, 6, 15, 7, 30, 0).unwrap());
}

#[test]
fn test_zone_id_matches_case_insensitively() {
    let resolved = resolve_instant("1990-06-15T08:30:00", "europe/london").unwrap();
    assert_eq!(resolved.localization, Localization::Zone);
    assert_eq!(resolved.utc, Utc.with_ymd_and_hms(1990, 6, 15, 7, 30, 0).unwrap());
}

#[test]
fn test_hour_only_timestamp() {
    let resolved = resolve_instant("1990-06-15T08", "Europe/London").unwrap();
    assert_eq!(resolved.utc, Utc.with_ymd_and_hms(1990, 6, 15, 7, 0, 0).unwrap());

    let resolved = resolve_instant("1990-06-15 08", "UTC").unwrap();
    assert_eq!(resolved.utc, Utc.with_ymd_and_hms(1990, 6, 15, 8, 0, 0).unwrap());
}

#[test]
fn test_hour_only_offset() {
    let resolved = resolve_instant("1990-06-15T08:30:00+02", "America/New_York").unwrap();
    assert_eq!(resolved.localization, Localization::ExplicitOffset);
    assert_eq!(resolved.utc, Utc.with_ymd_and_hms(1990, 6, 15, 6, 30, 0).unwrap());

    let resolved = resolve_instant("1990-06-15 08:30-05", "UTC").unwrap();
    assert_eq!(resolved.utc, Utc.with_ymd_and_hms(1990, 6, 15, 13, 30, 0).unwrap());
}

#[test]
fn test_explicit_offset_wins_over_zone() {
    let resolved = resolve_instant("1990-06-15T08:30:00+05:30", "America/New_York").unwrap();
    assert_eq!(resolved.localization, Localization::ExplicitOffset);
    assert_eq!(resolved.utc, Utc.with_ymd_and_hms(1990, 6, 15, 3, 0, 0).unwrap());
}

#[test]
fn test_unknown_zone_falls_back_to_utc() {
    let resolved = resolve_instant("2000-01-01T12:00:00", "Not/A_Zone").unwrap();
    assert_eq!(resolved.localization, Localization::UtcFallback);
    assert_eq!(resolved.julian_day, J2000);
}

#[test]
fn test_ambiguous_time_takes_standard_time() {
    // 01:30 happens twice in New York on 2021-11-07; EST (UTC-5) is the later one.
    let resolved = resolve_instant("2021-11-07T01:30:00", "America/New_York").unwrap();
    assert_eq!(resolved.utc, Utc.with_ymd_and_hms(2021, 11, 7, 6, 30, 0).unwrap());
}

#[test]
fn test_time_in_dst_gap_uses_offset_before_gap() {
    // 02:30 does not exist in New York on 2021-03-14; EST applies.
    let resolved = resolve_instant("2021-03-14T02:30:00", "America/New_York").unwrap();
    assert_eq!(resolved.localization, Localization::Zone);
    assert_eq!(resolved.utc, Utc.with_ymd_and_hms(2021, 3, 14, 7, 30, 0).unwrap());
}

#[test]
fn test_time_in_day_long_gap_uses_offset_before_gap() {
    // Samoa skipped 2011-12-30 entirely, jumping from UTC-10 to UTC+14.
    let resolved = resolve_instant("2011-12-30T10:00:00", "Pacific/Apia").unwrap();
    assert_eq!(resolved.localization, Localization::Zone);
    assert_eq!(resolved.utc, Utc.with_ymd_and_hms(2011, 12, 30, 20, 0, 0).unwrap());
}

#[test]
fn test_julian_day_uses_fractional_day() {
    let dt = Utc.with_ymd_and_hms(2000, 1, 1, 18, 0, 0).unwrap();
    assert_abs_diff_eq!(datetime_to_julian_day(dt), J2000 + 0.25, epsilon = 1e-9);
}
