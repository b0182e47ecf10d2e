use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bodies a natal chart reports, in canonical output order.
///
/// Serialized by display name ("Sun", "True Node").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CelestialBody {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    TrueNode,
    Lilith,
}

impl CelestialBody {
    /// The fixed body list. Chart output follows this order.
    pub const ALL: [CelestialBody; 13] = [
        CelestialBody::Sun,
        CelestialBody::Moon,
        CelestialBody::Mercury,
        CelestialBody::Venus,
        CelestialBody::Mars,
        CelestialBody::Jupiter,
        CelestialBody::Saturn,
        CelestialBody::Uranus,
        CelestialBody::Neptune,
        CelestialBody::Pluto,
        CelestialBody::Chiron,
        CelestialBody::TrueNode,
        CelestialBody::Lilith,
    ];

    /// Stable display name used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            CelestialBody::Sun => "Sun",
            CelestialBody::Moon => "Moon",
            CelestialBody::Mercury => "Mercury",
            CelestialBody::Venus => "Venus",
            CelestialBody::Mars => "Mars",
            CelestialBody::Jupiter => "Jupiter",
            CelestialBody::Saturn => "Saturn",
            CelestialBody::Uranus => "Uranus",
            CelestialBody::Neptune => "Neptune",
            CelestialBody::Pluto => "Pluto",
            CelestialBody::Chiron => "Chiron",
            CelestialBody::TrueNode => "True Node",
            CelestialBody::Lilith => "Lilith",
        }
    }

    /// Swiss Ephemeris body number.
    pub fn swiss_id(self) -> i32 {
        match self {
            CelestialBody::Sun => 0,
            CelestialBody::Moon => 1,
            CelestialBody::Mercury => 2,
            CelestialBody::Venus => 3,
            CelestialBody::Mars => 4,
            CelestialBody::Jupiter => 5,
            CelestialBody::Saturn => 6,
            CelestialBody::Uranus => 7,
            CelestialBody::Neptune => 8,
            CelestialBody::Pluto => 9,
            CelestialBody::TrueNode => 11,
            CelestialBody::Lilith => 12, // SE_MEAN_APOG
            CelestialBody::Chiron => 15,
        }
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CelestialBody {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "sun" => Ok(CelestialBody::Sun),
            "moon" => Ok(CelestialBody::Moon),
            "mercury" => Ok(CelestialBody::Mercury),
            "venus" => Ok(CelestialBody::Venus),
            "mars" => Ok(CelestialBody::Mars),
            "jupiter" => Ok(CelestialBody::Jupiter),
            "saturn" => Ok(CelestialBody::Saturn),
            "uranus" => Ok(CelestialBody::Uranus),
            "neptune" => Ok(CelestialBody::Neptune),
            "pluto" => Ok(CelestialBody::Pluto),
            "chiron" => Ok(CelestialBody::Chiron),
            "truenode" | "northnode" | "node" | "lunarnode" => Ok(CelestialBody::TrueNode),
            "lilith" | "meanapogee" | "blackmoon" => Ok(CelestialBody::Lilith),
            _ => Err(format!("Unknown body: {}", s)),
        }
    }
}

impl From<CelestialBody> for String {
    fn from(body: CelestialBody) -> String {
        body.name().to_string()
    }
}

impl TryFrom<String> for CelestialBody {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which backend a chart's body positions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrecisionMode {
    /// Swiss Ephemeris data files.
    HighPrecision,
    /// Closed-form series; always available, lower accuracy.
    AnalyticalFallback,
}

impl fmt::Display for PrecisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecisionMode::HighPrecision => f.write_str("high-precision"),
            PrecisionMode::AnalyticalFallback => f.write_str("analytical"),
        }
    }
}

/// Geocentric ecliptic position of one body, as an ephemeris source returns
/// it. Longitude is not guaranteed to be normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    /// Ecliptic longitude, degrees
    pub longitude: f64,
    /// Ecliptic latitude, degrees
    pub latitude: f64,
    /// Distance from Earth, AU
    pub distance: f64,
    /// Speed in longitude, degrees per day
    pub speed_longitude: f64,
}

impl RawPosition {
    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && self.distance.is_finite()
            && self.speed_longitude.is_finite()
    }
}
