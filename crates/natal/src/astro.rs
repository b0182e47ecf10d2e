//! Shared spherical-astronomy helpers: obliquity, nutation, sidereal time.
//!
//! Low-accuracy models (about half an arcsecond in nutation) that both the
//! analytical ephemeris and the house calculator build on.

use crate::time::{julian_centuries, J2000};
use crate::zodiac::normalize_longitude;

const ARCSEC: f64 = 1.0 / 3600.0;

/// Nutation in longitude and obliquity, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nutation {
    pub longitude: f64,
    pub obliquity: f64,
}

/// Longitude of the Moon's mean ascending node, degrees.
pub fn mean_lunar_node(t: f64) -> f64 {
    normalize_longitude(
        125.0445479 - 1934.1362891 * t + 0.0020754 * t * t + t.powi(3) / 467_441.0
            - t.powi(4) / 60_616_000.0,
    )
}

/// Nutation from the four leading terms of the IAU 1980 series.
pub fn nutation(t: f64) -> Nutation {
    let omega = mean_lunar_node(t).to_radians();
    let sun = (280.4665 + 36_000.7698 * t).to_radians();
    let moon = (218.3165 + 481_267.8813 * t).to_radians();

    let longitude = -17.20 * omega.sin() - 1.32 * (2.0 * sun).sin() - 0.23 * (2.0 * moon).sin()
        + 0.21 * (2.0 * omega).sin();
    let obliquity = 9.20 * omega.cos() + 0.57 * (2.0 * sun).cos() + 0.10 * (2.0 * moon).cos()
        - 0.09 * (2.0 * omega).cos();

    Nutation {
        longitude: longitude * ARCSEC,
        obliquity: obliquity * ARCSEC,
    }
}

/// Mean obliquity of the ecliptic (IAU 1980), degrees.
pub fn mean_obliquity(t: f64) -> f64 {
    (84_381.448 - 46.8150 * t - 0.00059 * t * t + 0.001813 * t.powi(3)) * ARCSEC
}

/// True obliquity of the ecliptic, degrees.
pub fn true_obliquity(t: f64) -> f64 {
    mean_obliquity(t) + nutation(t).obliquity
}

/// General precession in longitude from J2000 to the equinox of date, degrees.
pub fn precession_in_longitude(t: f64) -> f64 {
    (5029.0966 * t + 1.11113 * t * t) * ARCSEC
}

/// Greenwich mean sidereal time for a UT Julian Day, degrees.
pub fn greenwich_mean_sidereal_time(jd_ut: f64) -> f64 {
    let t = julian_centuries(jd_ut);
    normalize_longitude(
        280.46061837 + 360.98564736629 * (jd_ut - J2000) + 0.000387933 * t * t
            - t.powi(3) / 38_710_000.0,
    )
}

/// Greenwich apparent sidereal time: mean time plus the equation of the
/// equinoxes. `t` is in Julian centuries of TT.
pub fn greenwich_apparent_sidereal_time(jd_ut: f64, t: f64) -> f64 {
    let nut = nutation(t);
    let eps = (mean_obliquity(t) + nut.obliquity).to_radians();
    normalize_longitude(greenwich_mean_sidereal_time(jd_ut) + nut.longitude * eps.cos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::DAYS_PER_JULIAN_CENTURY;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mean_obliquity_j2000() {
        assert_abs_diff_eq!(mean_obliquity(0.0), 23.439_291, epsilon = 1e-6);
    }

    #[test]
    fn test_gmst_meeus_example_12a() {
        // 1987 April 10, 0h UT: 13h10m46.3668s
        let gmst = greenwich_mean_sidereal_time(2_446_895.5);
        let expected = (13.0 + 10.0 / 60.0 + 46.3668 / 3600.0) * 15.0;
        assert!((gmst - expected).abs() < 1e-5, "got {gmst}");
    }

    #[test]
    fn test_nutation_meeus_example_22a() {
        // 1987 April 10, 0h TD: dpsi = -3.788", deps = +9.443"
        let t = (2_446_895.5 - J2000) / DAYS_PER_JULIAN_CENTURY;
        let nut = nutation(t);
        assert_abs_diff_eq!(nut.longitude * 3600.0, -3.788, epsilon = 0.5);
        assert_abs_diff_eq!(nut.obliquity * 3600.0, 9.443, epsilon = 0.5);
    }
}
