//! House cusps and chart angles.
//!
//! Placidus trisects the diurnal and nocturnal semi-arcs of each cusp in
//! time. Near the poles some ecliptic degrees never rise or set and the
//! system has no solution; callers get [`HouseError::Undefined`] and decide
//! what to report.

use crate::astro::{greenwich_apparent_sidereal_time, true_obliquity};
use crate::error::HouseError;
use crate::time::{julian_centuries, ut_to_tt};
use crate::zodiac::normalize_longitude;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAX_ITERATIONS: usize = 100;
const TOLERANCE_DEG: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HouseSystem {
    #[default]
    Placidus,
}

/// Accepted names for each house system, including Swiss Ephemeris letters.
pub const HOUSE_SYSTEMS: &[(&str, HouseSystem)] =
    &[("placidus", HouseSystem::Placidus), ("p", HouseSystem::Placidus)];

impl HouseSystem {
    pub fn name(self) -> &'static str {
        match self {
            HouseSystem::Placidus => "placidus",
        }
    }
}

impl fmt::Display for HouseSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HouseSystem {
    type Err = HouseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        HOUSE_SYSTEMS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, system)| *system)
            .ok_or_else(|| HouseError::InvalidHouseSystem {
                system: s.to_string(),
                valid: HOUSE_SYSTEMS.iter().map(|(name, _)| name.to_string()).collect(),
            })
    }
}

/// Twelve cusps (index 0 is house 1) with the Ascendant and Midheaven.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HousePositions {
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}

/// Compute cusps for an observer at `latitude`/`longitude` (degrees, east
/// positive) at a UT Julian Day.
pub fn calc_houses(
    system: HouseSystem,
    jd_ut: f64,
    latitude: f64,
    longitude: f64,
) -> Result<HousePositions, HouseError> {
    if !(jd_ut.is_finite() && latitude.is_finite() && longitude.is_finite()) {
        return Err(HouseError::Undefined {
            latitude,
            message: "non-finite input".to_string(),
        });
    }

    let t = julian_centuries(ut_to_tt(jd_ut));
    let obliquity = true_obliquity(t);
    let ramc = normalize_longitude(greenwich_apparent_sidereal_time(jd_ut, t) + longitude);
    log::trace!("RAMC {:.6} obliquity {:.6} at JD {}", ramc, obliquity, jd_ut);

    match system {
        HouseSystem::Placidus => placidus(ramc, latitude, obliquity),
    }
}

/// Ascendant: the ecliptic degree rising on the eastern horizon.
pub fn ascendant(ramc: f64, latitude: f64, obliquity: f64) -> f64 {
    let (sin_t, cos_t) = ramc.to_radians().sin_cos();
    let (sin_e, cos_e) = obliquity.to_radians().sin_cos();
    let tan_phi = latitude.to_radians().tan();
    normalize_longitude(
        cos_t
            .atan2(-(sin_t * cos_e + tan_phi * sin_e))
            .to_degrees(),
    )
}

/// Midheaven: the ecliptic degree culminating on the local meridian.
pub fn midheaven(ramc: f64, obliquity: f64) -> f64 {
    right_ascension_to_longitude(ramc, obliquity)
}

/// Ecliptic longitude of the ecliptic point with right ascension `ra`.
fn right_ascension_to_longitude(ra: f64, obliquity: f64) -> f64 {
    let ra = ra.to_radians();
    normalize_longitude(
        ra.sin()
            .atan2(ra.cos() * obliquity.to_radians().cos())
            .to_degrees(),
    )
}

pub fn placidus(ramc: f64, latitude: f64, obliquity: f64) -> Result<HousePositions, HouseError> {
    if latitude.abs() >= 90.0 - obliquity {
        return Err(HouseError::Undefined {
            latitude,
            message: format!(
                "inside the polar circle (|latitude| >= {:.4})",
                90.0 - obliquity
            ),
        });
    }

    let asc = ascendant(ramc, latitude, obliquity);
    let mc = midheaven(ramc, obliquity);

    let c11 = placidus_cusp(11, ramc, latitude, obliquity, 1.0 / 3.0, true)?;
    let c12 = placidus_cusp(12, ramc, latitude, obliquity, 2.0 / 3.0, true)?;
    let c2 = placidus_cusp(2, ramc, latitude, obliquity, 2.0 / 3.0, false)?;
    let c3 = placidus_cusp(3, ramc, latitude, obliquity, 1.0 / 3.0, false)?;

    let opposite = |lon: f64| normalize_longitude(lon + 180.0);
    Ok(HousePositions {
        cusps: [
            asc,
            c2,
            c3,
            opposite(mc),
            opposite(c11),
            opposite(c12),
            opposite(asc),
            opposite(c2),
            opposite(c3),
            mc,
            c11,
            c12,
        ],
        ascendant: asc,
        midheaven: mc,
    })
}

/// One intermediate cusp by fixed-point iteration on its right ascension.
///
/// Diurnal cusps (11, 12) sit `fraction` of their diurnal semi-arc east of
/// the meridian. Nocturnal cusps (2, 3) sit `fraction` of their nocturnal
/// semi-arc above the lower meridian, counted back from it.
fn placidus_cusp(
    house: u8,
    ramc: f64,
    latitude: f64,
    obliquity: f64,
    fraction: f64,
    diurnal: bool,
) -> Result<f64, HouseError> {
    let tan_eps = obliquity.to_radians().tan();
    let tan_phi = latitude.to_radians().tan();

    let mut ra = if diurnal {
        ramc + fraction * 90.0
    } else {
        ramc + 180.0 - fraction * 90.0
    };

    for _ in 0..MAX_ITERATIONS {
        let declination = (tan_eps * ra.to_radians().sin()).atan();
        let cos_hour_angle = -tan_phi * declination.tan();
        if !(-1.0..=1.0).contains(&cos_hour_angle) {
            return Err(HouseError::Undefined {
                latitude,
                message: format!("cusp {} is circumpolar", house),
            });
        }
        let semi_arc = cos_hour_angle.acos().to_degrees();
        let next = if diurnal {
            ramc + fraction * semi_arc
        } else {
            ramc + 180.0 - fraction * (180.0 - semi_arc)
        };
        if (next - ra).abs() < TOLERANCE_DEG {
            return Ok(right_ascension_to_longitude(next, obliquity));
        }
        ra = next;
    }

    Err(HouseError::NoConvergence {
        house,
        iterations: MAX_ITERATIONS,
    })
}
