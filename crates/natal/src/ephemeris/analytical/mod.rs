//! Closed-form ephemeris used when the Swiss Ephemeris data files are
//! missing. Accuracy is a few hundredths of a degree for the Sun, Moon and
//! planets over 1800-2050; Chiron has no series and is reported unavailable.

pub mod lunar;
pub mod planets;
pub mod solar;

use crate::astro::nutation;
use crate::ephemeris::types::{CelestialBody, PrecisionMode, RawPosition};
use crate::error::EphemerisError;
use crate::time::{julian_centuries, ut_to_tt};
use crate::zodiac::angular_difference;
use planets::Planet;

/// Half-width of the central difference used for speeds, days.
const SPEED_STEP_DAYS: f64 = 0.01;

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticalEphemeris;

impl AnalyticalEphemeris {
    pub fn new() -> Self {
        AnalyticalEphemeris
    }

    pub fn supports(&self, body: CelestialBody) -> bool {
        body != CelestialBody::Chiron
    }

    pub fn calc_body_position(
        &self,
        body: CelestialBody,
        jd_ut: f64,
    ) -> Result<RawPosition, EphemerisError> {
        if !self.supports(body) {
            return Err(EphemerisError::Unavailable {
                body,
                mode: PrecisionMode::AnalyticalFallback,
                message: "no analytical series for this body".to_string(),
            });
        }

        let (longitude, latitude, distance) = apparent_position(body, jd_ut);
        let (ahead, _, _) = apparent_position(body, jd_ut + SPEED_STEP_DAYS);
        let (behind, _, _) = apparent_position(body, jd_ut - SPEED_STEP_DAYS);
        let speed_longitude = angular_difference(behind, ahead) / (2.0 * SPEED_STEP_DAYS);

        let position = RawPosition {
            longitude,
            latitude,
            distance,
            speed_longitude,
        };
        if !position.is_finite() {
            return Err(EphemerisError::CalculationFailed {
                body,
                julian_day: jd_ut,
                message: "analytical series produced a non-finite value".to_string(),
            });
        }
        Ok(position)
    }
}

/// Apparent longitude, latitude and distance (AU) for a supported body.
fn apparent_position(body: CelestialBody, jd_ut: f64) -> (f64, f64, f64) {
    let t = julian_centuries(ut_to_tt(jd_ut));
    let planet = |p: Planet| {
        let pos = planets::geocentric(p, t);
        (pos.longitude, pos.latitude, pos.distance)
    };

    match body {
        CelestialBody::Sun => (
            solar::apparent_longitude(t),
            0.0,
            solar::geometric(t).distance,
        ),
        CelestialBody::Moon => {
            let pos = lunar::moon(t);
            (
                pos.longitude + nutation(t).longitude,
                pos.latitude,
                pos.distance_km / lunar::KM_PER_AU,
            )
        }
        CelestialBody::Mercury => planet(Planet::Mercury),
        CelestialBody::Venus => planet(Planet::Venus),
        CelestialBody::Mars => planet(Planet::Mars),
        CelestialBody::Jupiter => planet(Planet::Jupiter),
        CelestialBody::Saturn => planet(Planet::Saturn),
        CelestialBody::Uranus => planet(Planet::Uranus),
        CelestialBody::Neptune => planet(Planet::Neptune),
        CelestialBody::Pluto => planet(Planet::Pluto),
        CelestialBody::TrueNode => (
            lunar::true_node(t) + nutation(t).longitude,
            0.0,
            lunar::MEAN_LUNAR_DISTANCE_AU,
        ),
        CelestialBody::Lilith => (
            lunar::mean_apogee(t) + nutation(t).longitude,
            0.0,
            lunar::MEAN_LUNAR_DISTANCE_AU,
        ),
        CelestialBody::Chiron => (f64::NAN, f64::NAN, f64::NAN),
    }
}
