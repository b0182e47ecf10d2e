//! Planetary positions from mean Keplerian elements.
//!
//! Elements and rates are the JPL "approximate positions of the planets"
//! set for 1800-2050, referred to the J2000 ecliptic and equinox. The
//! Earth-Moon barycenter stands in for the Earth. Jupiter, Saturn and Uranus
//! get their largest mutual perturbations in longitude.

use super::solar;
use crate::astro::{nutation, precession_in_longitude};
use crate::time::DAYS_PER_JULIAN_CENTURY;
use crate::zodiac::normalize_longitude;

/// Light time per AU, days.
const LIGHT_TIME_DAYS_PER_AU: f64 = 0.005_775_518_3;
/// Constant of aberration, degrees.
const ABERRATION: f64 = 20.49552 / 3600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Planet {
    Mercury,
    Venus,
    EarthMoonBarycenter,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

/// Semi-major axis (AU), eccentricity, inclination, mean longitude,
/// longitude of perihelion and longitude of the ascending node (degrees).
#[derive(Debug, Clone, Copy)]
struct Elements {
    a: f64,
    e: f64,
    i: f64,
    l: f64,
    perihelion: f64,
    node: f64,
}

impl Elements {
    fn at(base: &Elements, rate: &Elements, t: f64) -> Elements {
        Elements {
            a: base.a + rate.a * t,
            e: base.e + rate.e * t,
            i: base.i + rate.i * t,
            l: base.l + rate.l * t,
            perihelion: base.perihelion + rate.perihelion * t,
            node: base.node + rate.node * t,
        }
    }

    fn mean_anomaly(&self) -> f64 {
        normalize_longitude(self.l - self.perihelion)
    }
}

const fn el(a: f64, e: f64, i: f64, l: f64, perihelion: f64, node: f64) -> Elements {
    Elements {
        a,
        e,
        i,
        l,
        perihelion,
        node,
    }
}

impl Planet {
    /// Elements at J2000 and their rates per Julian century.
    fn element_table(self) -> (Elements, Elements) {
        match self {
            Planet::Mercury => (
                el(0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593),
                el(0.00000037, 0.00001906, -0.00594749, 149_472.67411175, 0.16047689, -0.12534081),
            ),
            Planet::Venus => (
                el(0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255),
                el(0.00000390, -0.00004107, -0.00078890, 58_517.81538729, 0.00268329, -0.27769418),
            ),
            Planet::EarthMoonBarycenter => (
                el(1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0),
                el(0.00000562, -0.00004392, -0.01294668, 35_999.37244981, 0.32327364, 0.0),
            ),
            Planet::Mars => (
                el(1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891),
                el(0.00001847, 0.00007882, -0.00813131, 19_140.30268499, 0.44441088, -0.29257343),
            ),
            Planet::Jupiter => (
                el(5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909),
                el(-0.00011607, -0.00013253, -0.00183714, 3_034.74612775, 0.21252668, 0.20469106),
            ),
            Planet::Saturn => (
                el(9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448),
                el(-0.00125060, -0.00050991, 0.00193609, 1_222.49362201, -0.41897216, -0.28867794),
            ),
            Planet::Uranus => (
                el(19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503),
                el(-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589),
            ),
            Planet::Neptune => (
                el(30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574),
                el(0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.01262724),
            ),
            Planet::Pluto => (
                el(39.48211675, 0.24882730, 17.14001206, 238.92903833, 224.06891629, 110.30393684),
                el(-0.00031596, 0.00005170, 0.00004818, 145.20780515, -0.04062942, -0.01183482),
            ),
        }
    }

    fn elements(self, t: f64) -> Elements {
        let (base, rate) = self.element_table();
        Elements::at(&base, &rate, t)
    }
}

/// Heliocentric ecliptic rectangular coordinates (J2000), AU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    fn sub(self, other: Vector3) -> Vector3 {
        Vector3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }

    fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Solve Kepler's equation by Newton iteration. Radians in and out.
fn eccentric_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..30 {
        let delta = (mean_anomaly - (ecc - e * ecc.sin())) / (1.0 - e * ecc.cos());
        ecc += delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc
}

/// Perturbations in heliocentric longitude, degrees.
fn longitude_perturbation(planet: Planet, t: f64) -> f64 {
    let sin = |deg: f64| deg.to_radians().sin();
    let cos = |deg: f64| deg.to_radians().cos();
    let mj = Planet::Jupiter.elements(t).mean_anomaly();
    let ms = Planet::Saturn.elements(t).mean_anomaly();
    let mu = Planet::Uranus.elements(t).mean_anomaly();

    match planet {
        Planet::Jupiter => {
            -0.332 * sin(2.0 * mj - 5.0 * ms - 67.6) - 0.056 * sin(2.0 * mj - 2.0 * ms + 21.0)
                + 0.042 * sin(3.0 * mj - 5.0 * ms + 21.0)
                - 0.036 * sin(mj - 2.0 * ms)
                + 0.022 * cos(mj - ms)
                + 0.023 * sin(2.0 * mj - 3.0 * ms + 52.0)
                - 0.016 * sin(mj - 5.0 * ms - 69.0)
        }
        Planet::Saturn => {
            0.812 * sin(2.0 * mj - 5.0 * ms - 67.6) - 0.229 * cos(2.0 * mj - 4.0 * ms - 2.0)
                + 0.119 * sin(mj - 2.0 * ms - 3.0)
                + 0.046 * sin(2.0 * mj - 6.0 * ms - 69.0)
                + 0.014 * sin(mj - 3.0 * ms + 32.0)
        }
        Planet::Uranus => {
            0.040 * sin(ms - 2.0 * mu + 6.0) + 0.035 * sin(ms - 3.0 * mu + 33.0)
                - 0.015 * sin(mj - mu + 20.0)
        }
        _ => 0.0,
    }
}

/// Heliocentric position. `t` is Julian centuries of TT from J2000.
pub fn heliocentric(planet: Planet, t: f64) -> Vector3 {
    let orbit = planet.elements(t);
    let argument_of_perihelion = (orbit.perihelion - orbit.node).to_radians();
    let e = orbit.e;
    let ecc = eccentric_anomaly(orbit.mean_anomaly().to_radians(), e);

    // Orbital plane coordinates
    let xp = orbit.a * (ecc.cos() - e);
    let yp = orbit.a * (1.0 - e * e).sqrt() * ecc.sin();

    let (sw, cw) = argument_of_perihelion.sin_cos();
    let (so, co) = orbit.node.to_radians().sin_cos();
    let (si, ci) = orbit.i.to_radians().sin_cos();

    let position = Vector3 {
        x: (cw * co - sw * so * ci) * xp + (-sw * co - cw * so * ci) * yp,
        y: (cw * so + sw * co * ci) * xp + (-sw * so + cw * co * ci) * yp,
        z: (sw * si) * xp + (cw * si) * yp,
    };

    let perturbation = longitude_perturbation(planet, t);
    if perturbation == 0.0 {
        return position;
    }
    let r = position.norm();
    let lon = position.y.atan2(position.x) + perturbation.to_radians();
    let lat = (position.z / r).asin();
    Vector3 {
        x: r * lat.cos() * lon.cos(),
        y: r * lat.cos() * lon.sin(),
        z: position.z,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocentricPosition {
    /// Apparent longitude referred to the true equinox of date, degrees
    pub longitude: f64,
    pub latitude: f64,
    /// AU
    pub distance: f64,
}

/// Apparent geocentric position, corrected for light time, precession,
/// nutation in longitude and annual aberration.
pub fn geocentric(planet: Planet, t: f64) -> GeocentricPosition {
    let earth = heliocentric(Planet::EarthMoonBarycenter, t);

    let mut offset = heliocentric(planet, t).sub(earth);
    for _ in 0..2 {
        let light_time = LIGHT_TIME_DAYS_PER_AU * offset.norm();
        offset = heliocentric(planet, t - light_time / DAYS_PER_JULIAN_CENTURY).sub(earth);
    }
    let distance = offset.norm();

    let lon = normalize_longitude(offset.y.atan2(offset.x).to_degrees());
    let lat = offset.z.atan2(offset.x.hypot(offset.y)).to_degrees();

    let sun_longitude = solar::geometric(t).longitude;
    let e = solar::earth_eccentricity(t);
    let perihelion = solar::earth_perihelion(t);
    let aberration = (-ABERRATION * (sun_longitude - lon).to_radians().cos()
        + e * ABERRATION * (perihelion - lon).to_radians().cos())
        / lat.to_radians().cos();

    GeocentricPosition {
        longitude: normalize_longitude(
            lon + precession_in_longitude(t) + nutation(t).longitude + aberration,
        ),
        latitude: lat,
        distance,
    }
}
