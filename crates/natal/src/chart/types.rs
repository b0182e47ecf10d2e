use crate::ephemeris::{CelestialBody, PrecisionMode, RawPosition};
use crate::time::Localization;
use crate::zodiac::{classify, Sign};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request as callers submit it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthData {
    /// ISO-8601 timestamp, with or without a UTC offset
    pub birth_date_time: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone id, consulted only when the timestamp has no offset
    pub zone_id: String,
}

/// Where and when the chart is cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    /// Geographic latitude, degrees north
    pub latitude: f64,
    /// Geographic longitude, degrees east
    pub longitude: f64,
    /// Julian Day (UT)
    pub julian_day: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPosition {
    #[serde(rename = "name")]
    pub body: CelestialBody,
    pub ecliptic_longitude: f64,
    pub ecliptic_latitude: f64,
    pub distance: f64,
    pub speed_longitude: f64,
    pub sign: Sign,
    #[serde(rename = "signDegree")]
    pub degree_in_sign: f64,
    #[serde(rename = "isRetrograde")]
    pub retrograde: bool,
}

impl BodyPosition {
    /// Normalize and classify a raw ephemeris position.
    pub fn from_raw(body: CelestialBody, raw: RawPosition) -> Self {
        let (ecliptic_longitude, sign, degree_in_sign) = classify(raw.longitude);
        Self {
            body,
            ecliptic_longitude,
            ecliptic_latitude: raw.latitude,
            distance: raw.distance,
            speed_longitude: raw.speed_longitude,
            sign,
            degree_in_sign,
            retrograde: raw.speed_longitude < 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseCusp {
    pub house_number: u8,
    pub ecliptic_longitude: f64,
    pub sign: Sign,
    #[serde(rename = "signDegree")]
    pub degree_in_sign: f64,
}

impl HouseCusp {
    pub fn new(house_number: u8, longitude: f64) -> Self {
        let (ecliptic_longitude, sign, degree_in_sign) = classify(longitude);
        Self {
            house_number,
            ecliptic_longitude,
            sign,
            degree_in_sign,
        }
    }
}

/// Both zero when the house computation failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartAngles {
    pub ascendant: f64,
    pub midheaven: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    /// Computed bodies in canonical order; skipped bodies are absent.
    #[serde(rename = "planets")]
    pub bodies: Vec<BodyPosition>,
    /// Empty, or exactly twelve cusps in house order.
    pub houses: Vec<HouseCusp>,
    pub angles: ChartAngles,
}

impl NatalChart {
    pub fn body(&self, body: CelestialBody) -> Option<&BodyPosition> {
        self.bodies.iter().find(|p| p.body == body)
    }

    pub fn has_houses(&self) -> bool {
        !self.houses.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedBody {
    pub body: CelestialBody,
    pub reason: String,
}

/// What happened along the way. Kept apart from [`NatalChart`] so the chart
/// wire shape stays fixed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDiagnostics {
    pub julian_day: f64,
    /// The charted instant, recovered from `julian_day`.
    pub utc: Option<DateTime<Utc>>,
    pub mode: PrecisionMode,
    pub localization: Option<Localization>,
    pub skipped: Vec<SkippedBody>,
    pub house_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartComputation {
    pub chart: NatalChart,
    pub diagnostics: ChartDiagnostics,
}
