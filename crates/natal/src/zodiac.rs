//! Zodiac classification.
//!
//! Maps a normalized ecliptic longitude to one of the twelve tropical signs
//! and the degree within that sign. Callers normalize first: upstream sources
//! may hand back values outside [0, 360), house cusps in particular.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

pub const SIGN_ORDER: [Sign; 12] = [
    Sign::Aries,
    Sign::Taurus,
    Sign::Gemini,
    Sign::Cancer,
    Sign::Leo,
    Sign::Virgo,
    Sign::Libra,
    Sign::Scorpio,
    Sign::Sagittarius,
    Sign::Capricorn,
    Sign::Aquarius,
    Sign::Pisces,
];

impl Sign {
    /// Sign for a zero-based index; wraps modulo 12.
    pub fn from_index(index: usize) -> Sign {
        SIGN_ORDER[index % 12]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }

    pub fn element(self) -> Element {
        match self.index() % 4 {
            0 => Element::Fire,
            1 => Element::Earth,
            2 => Element::Air,
            _ => Element::Water,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wrap any longitude into [0, 360). Values already in range come back
/// unchanged.
pub fn normalize_longitude(longitude: f64) -> f64 {
    let lon = longitude.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360
    if lon >= 360.0 {
        0.0
    } else {
        lon
    }
}

/// Sign index (0-11) of a normalized longitude.
pub fn sign_index(longitude: f64) -> usize {
    ((longitude / 30.0).floor() as usize) % 12
}

/// Sign of a normalized longitude.
pub fn sign(longitude: f64) -> Sign {
    Sign::from_index(sign_index(longitude))
}

/// Degree within the sign, in [0, 30).
pub fn degree_in_sign(longitude: f64) -> f64 {
    longitude % 30.0
}

/// Normalize, then classify. Returns the normalized longitude alongside its
/// sign and in-sign degree so every derived field comes from the same value.
pub fn classify(longitude: f64) -> (f64, Sign, f64) {
    let lon = normalize_longitude(longitude);
    (lon, sign(lon), degree_in_sign(lon))
}

/// Signed shortest difference `to - from`, in [-180, 180).
pub fn angular_difference(from: f64, to: f64) -> f64 {
    let diff = normalize_longitude(to - from);
    if diff >= 180.0 {
        diff - 360.0
    } else {
        diff
    }
}
