//! Low-accuracy solar theory (Meeus, Astronomical Algorithms ch. 25).
//! Good to about 0.01 degree.

use crate::zodiac::normalize_longitude;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// Geometric longitude referred to the mean equinox of date, degrees
    pub longitude: f64,
    /// Earth-Sun distance, AU
    pub distance: f64,
}

/// Eccentricity of the Earth's orbit.
pub fn earth_eccentricity(t: f64) -> f64 {
    0.016708634 - 0.000042037 * t - 0.0000001267 * t * t
}

/// Longitude of the Earth's perihelion, degrees.
pub fn earth_perihelion(t: f64) -> f64 {
    102.93735 + 1.71946 * t + 0.00046 * t * t
}

/// Geometric position of the Sun. `t` is Julian centuries of TT from J2000.
pub fn geometric(t: f64) -> SolarPosition {
    let mean_longitude = 280.46646 + 36_000.76983 * t + 0.0003032 * t * t;
    let mean_anomaly = (357.52911 + 35_999.05029 * t - 0.0001537 * t * t).to_radians();
    let e = earth_eccentricity(t);

    let center = (1.914602 - 0.004817 * t - 0.000014 * t * t) * mean_anomaly.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * mean_anomaly).sin()
        + 0.000289 * (3.0 * mean_anomaly).sin();
    let true_anomaly = mean_anomaly + center.to_radians();

    SolarPosition {
        longitude: normalize_longitude(mean_longitude + center),
        distance: 1.000001018 * (1.0 - e * e) / (1.0 + e * true_anomaly.cos()),
    }
}

/// Apparent longitude: geometric longitude corrected for nutation and
/// aberration.
pub fn apparent_longitude(t: f64) -> f64 {
    let omega = (125.04 - 1934.136 * t).to_radians();
    normalize_longitude(geometric(t).longitude - 0.00569 - 0.00478 * omega.sin())
}
