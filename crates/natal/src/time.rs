//! Birth timestamp resolution.
//!
//! Turns the caller's local timestamp and IANA zone id into a UTC instant and
//! then a Julian Day (UT). Only a timestamp that cannot be tokenized is an
//! error; a bad zone id degrades to treating the timestamp as UTC.

use crate::error::ChartError;
use chrono::{
    DateTime, Datelike, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset,
    TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use serde::Serialize;

/// Julian Day of 2000-01-01T12:00:00 TT.
pub const J2000: f64 = 2_451_545.0;
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// %#z takes +HH, +HHMM and +HH:MM
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// A birth timestamp as written by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedTimestamp {
    /// Carries its own UTC offset; the zone id is not consulted.
    Offset(DateTime<FixedOffset>),
    /// Wall-clock time that still needs a zone.
    Local(NaiveDateTime),
}

/// How the UTC instant was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Localization {
    ExplicitOffset,
    Zone,
    /// The zone id was unknown or could not place the wall-clock time.
    UtcFallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedInstant {
    pub utc: DateTime<Utc>,
    pub julian_day: f64,
    pub localization: Localization,
}

/// Tokenize an ISO-8601-like timestamp.
pub fn parse_timestamp(input: &str) -> Result<ParsedTimestamp, ChartError> {
    let text = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(ParsedTimestamp::Offset(dt));
    }
    if let Some(stripped) = text.strip_suffix('Z').or_else(|| text.strip_suffix('z')) {
        if let Some(naive) = parse_naive(stripped) {
            return Ok(ParsedTimestamp::Offset(
                Utc.from_utc_datetime(&naive).fixed_offset(),
            ));
        }
    }
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Ok(ParsedTimestamp::Offset(dt));
        }
    }
    if let Some(naive) = parse_naive(text) {
        return Ok(ParsedTimestamp::Local(naive));
    }

    Err(ChartError::TemporalParse {
        input: input.to_string(),
        message: "expected YYYY-MM-DD[THH[:MM[:SS[.fff]]]] with an optional Z or ±HH[:MM] offset"
            .to_string(),
    })
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive);
        }
    }
    parse_date_hour(text).or_else(|| {
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

/// `YYYY-MM-DDTHH` or `YYYY-MM-DD HH`. chrono will not build a time from an
/// hour alone.
fn parse_date_hour(text: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(text.get(..10)?, "%Y-%m-%d").ok()?;
    let hour = text.get(10..)?.strip_prefix(|c: char| c == 'T' || c == ' ')?;
    if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    date.and_hms_opt(hour.parse().ok()?, 0, 0)
}

/// Place a wall-clock time in `zone_id`. Zone ids match case-insensitively.
///
/// Ambiguous times take the standard-time reading (the later instant). Times
/// inside a gap, however wide, take the offset in force just before the gap.
pub fn localize(naive: NaiveDateTime, zone_id: &str) -> Option<DateTime<Utc>> {
    let tz = Tz::from_str_insensitive(zone_id.trim()).ok()?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(_, later) => Some(later.with_timezone(&Utc)),
        LocalResult::None => {
            // A gap ends less than a day after any wall-clock time inside it,
            // and zones do not change offset twice within a day.
            let before = tz.offset_from_utc_datetime(&(naive - Duration::days(1))).fix();
            before
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc))
        }
    }
}

/// Resolve the caller's timestamp and zone to a UT Julian Day.
pub fn resolve_instant(birth_date_time: &str, zone_id: &str) -> Result<ResolvedInstant, ChartError> {
    let (utc, localization) = match parse_timestamp(birth_date_time)? {
        ParsedTimestamp::Offset(dt) => (dt.with_timezone(&Utc), Localization::ExplicitOffset),
        ParsedTimestamp::Local(naive) => match localize(naive, zone_id) {
            Some(utc) => (utc, Localization::Zone),
            None => {
                log::warn!(
                    "Could not localize {} in zone {:?}; treating the timestamp as UTC",
                    naive,
                    zone_id
                );
                (Utc.from_utc_datetime(&naive), Localization::UtcFallback)
            }
        },
    };

    Ok(ResolvedInstant {
        utc,
        julian_day: datetime_to_julian_day(utc),
        localization,
    })
}

/// Julian Day for a proleptic Gregorian calendar date, `hour` fractional.
pub fn julian_day(year: i32, month: u32, day: u32, hour: f64) -> f64 {
    let (mut y, mut m) = (year as f64, month as f64);
    if month <= 2 {
        y -= 1.0;
        m += 12.0;
    }
    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();
    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day as f64 + b - 1524.5
        + hour / 24.0
}

/// Convert a UTC datetime to a Julian Day (UT).
pub fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    let hour = dt.hour() as f64;
    let minute = dt.minute() as f64;
    let second = dt.second() as f64 + dt.nanosecond() as f64 / 1e9;
    let hour_decimal = hour + minute / 60.0 + second / 3600.0;
    julian_day(dt.year(), dt.month(), dt.day(), hour_decimal)
}

/// Convert a Julian Day (UT) back to a UTC datetime, to the millisecond.
pub fn julian_day_to_datetime(jd: f64) -> Option<DateTime<Utc>> {
    let unix_days = jd - 2_440_587.5;
    let millis = (unix_days * SECONDS_PER_DAY * 1000.0).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

/// Julian centuries since J2000.
pub fn julian_centuries(jd: f64) -> f64 {
    (jd - J2000) / DAYS_PER_JULIAN_CENTURY
}

/// Estimated TT - UT in seconds.
///
/// Piecewise polynomials of Espenak and Meeus, with the long-term parabola
/// outside 1900-2050.
pub fn delta_t_seconds(jd_ut: f64) -> f64 {
    let year = 2000.0 + (jd_ut - J2000) / 365.25;
    if (2005.0..2050.0).contains(&year) {
        let t = year - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t * t
    } else if (1986.0..2005.0).contains(&year) {
        let t = year - 2000.0;
        63.86 + 0.3345 * t - 0.060374 * t.powi(2)
            + 0.0017275 * t.powi(3)
            + 0.000651814 * t.powi(4)
            + 0.00002373599 * t.powi(5)
    } else if (1961.0..1986.0).contains(&year) {
        let t = year - 1975.0;
        45.45 + 1.067 * t - t * t / 260.0 - t.powi(3) / 718.0
    } else if (1941.0..1961.0).contains(&year) {
        let t = year - 1950.0;
        29.07 + 0.407 * t - t * t / 233.0 + t.powi(3) / 2547.0
    } else if (1920.0..1941.0).contains(&year) {
        let t = year - 1920.0;
        21.20 + 0.84493 * t - 0.076100 * t * t + 0.0020936 * t.powi(3)
    } else if (1900.0..1920.0).contains(&year) {
        let t = year - 1900.0;
        -2.79 + 1.494119 * t - 0.0598939 * t * t + 0.0061966 * t.powi(3)
            - 0.000197 * t.powi(4)
    } else {
        let u = (year - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u
    }
}

/// Julian Day (UT) shifted to Terrestrial Time.
pub fn ut_to_tt(jd_ut: f64) -> f64 {
    jd_ut + delta_t_seconds(jd_ut) / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_julian_day_j2000() {
        assert_eq!(julian_day(2000, 1, 1, 12.0), J2000);
    }

    #[test]
    fn test_julian_day_meeus_examples() {
        // Meeus, Astronomical Algorithms, example 7.a and 7.b
        assert!((julian_day(1957, 10, 4, 0.81 * 24.0) - 2_436_116.31).abs() < 1e-9);
        assert_eq!(julian_day(1987, 1, 27, 0.0), 2_446_822.5);
        assert_eq!(julian_day(1600, 1, 1, 0.0), 2_305_447.5);
    }

    #[test]
    fn test_round_trip_datetime() {
        let dt = Utc.with_ymd_and_hms(1990, 6, 15, 8, 30, 0).unwrap();
        let jd = datetime_to_julian_day(dt);
        let back = julian_day_to_datetime(jd).unwrap();
        assert!((back - dt).num_milliseconds().abs() <= 1);
    }

    #[test]
    fn test_delta_t_near_2000() {
        let dt = delta_t_seconds(J2000);
        assert!((dt - 63.8).abs() < 0.5, "got {dt}");
    }
}
