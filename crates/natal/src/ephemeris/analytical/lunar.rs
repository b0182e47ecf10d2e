//! Lunar theory: the principal periodic terms of the Meeus series
//! (Astronomical Algorithms ch. 47), plus the lunar node and mean apogee.
//!
//! The truncated series keeps every longitude term above 0.0003 degree and is
//! good to roughly ten arcseconds in longitude.

use crate::astro::mean_lunar_node;
use crate::zodiac::normalize_longitude;

pub const KM_PER_AU: f64 = 149_597_870.7;
/// Mean Earth-Moon distance, AU. Used for the lunar points.
pub const MEAN_LUNAR_DISTANCE_AU: f64 = 385_000.56 / KM_PER_AU;
/// Mean inclination of the lunar orbit to the ecliptic, degrees.
pub const MEAN_LUNAR_INCLINATION: f64 = 5.1453964;

/// Multiples of (D, M, M', F) with the sine coefficient for longitude and the
/// cosine coefficient for distance; units of 1e-6 degree and 1e-3 km.
const LONGITUDE_DISTANCE_TERMS: &[(i8, i8, i8, i8, f64, f64)] = &[
    (0, 0, 1, 0, 6_288_774.0, -20_905_355.0),
    (2, 0, -1, 0, 1_274_027.0, -3_699_111.0),
    (2, 0, 0, 0, 658_314.0, -2_955_968.0),
    (0, 0, 2, 0, 213_618.0, -569_925.0),
    (0, 1, 0, 0, -185_116.0, 48_888.0),
    (0, 0, 0, 2, -114_332.0, -3_149.0),
    (2, 0, -2, 0, 58_793.0, 246_158.0),
    (2, -1, -1, 0, 57_066.0, -152_138.0),
    (2, 0, 1, 0, 53_322.0, -170_733.0),
    (2, -1, 0, 0, 45_758.0, -204_586.0),
    (0, 1, -1, 0, -40_923.0, -129_620.0),
    (1, 0, 0, 0, -34_720.0, 108_743.0),
    (0, 1, 1, 0, -30_383.0, 104_755.0),
    (2, 0, 0, -2, 15_327.0, 10_321.0),
    (0, 0, 1, 2, -12_528.0, 0.0),
    (0, 0, 1, -2, 10_980.0, 79_661.0),
    (4, 0, -1, 0, 10_675.0, -34_782.0),
    (0, 0, 3, 0, 10_034.0, -23_210.0),
    (4, 0, -2, 0, 8_548.0, -21_636.0),
    (2, 1, -1, 0, -7_888.0, 24_208.0),
    (2, 1, 0, 0, -6_766.0, 30_824.0),
    (1, 0, -1, 0, -5_163.0, -8_379.0),
    (1, 1, 0, 0, 4_987.0, -16_675.0),
    (2, -1, 1, 0, 4_036.0, -12_831.0),
    (2, 0, 2, 0, 3_994.0, -10_445.0),
    (4, 0, 0, 0, 3_861.0, -11_650.0),
    (2, 0, -3, 0, 3_665.0, 14_403.0),
    (0, 1, -2, 0, -2_689.0, -7_003.0),
    (2, 0, -1, 2, -2_602.0, 0.0),
    (2, -1, -2, 0, 2_390.0, 10_056.0),
    (1, 0, 1, 0, -2_348.0, 6_322.0),
    (2, -2, 0, 0, 2_236.0, -9_884.0),
    (0, 1, 2, 0, -2_120.0, 5_751.0),
    (0, 2, 0, 0, -2_069.0, 0.0),
    (2, -2, -1, 0, 2_048.0, -4_950.0),
    (2, 0, 1, -2, -1_773.0, 4_130.0),
    (2, 0, 0, 2, -1_595.0, 0.0),
    (4, -1, -1, 0, 1_215.0, -3_958.0),
    (0, 0, 2, 2, -1_110.0, 0.0),
    (3, 0, -1, 0, -892.0, 3_258.0),
    (2, 1, 1, 0, -810.0, 2_616.0),
    (4, -1, -2, 0, 759.0, -1_897.0),
    (0, 2, -1, 0, -713.0, -2_117.0),
    (2, 2, -1, 0, -700.0, 2_354.0),
    (2, 1, -2, 0, 691.0, 0.0),
    (2, -1, 0, -2, 596.0, 0.0),
    (4, 0, 1, 0, 549.0, -1_423.0),
    (0, 0, 4, 0, 537.0, -1_117.0),
    (4, -1, 0, 0, 520.0, -1_571.0),
    (1, 0, -2, 0, -487.0, -1_739.0),
    (2, 1, 0, -2, -399.0, 0.0),
    (0, 0, 2, -2, -381.0, -4_421.0),
    (1, 1, 1, 0, 351.0, 0.0),
    (3, 0, -2, 0, -340.0, 0.0),
    (4, 0, -3, 0, 330.0, 0.0),
    (2, -1, 2, 0, 327.0, 0.0),
    (0, 2, 1, 0, -323.0, 1_165.0),
    (1, 1, -1, 0, 299.0, 0.0),
    (2, 0, 3, 0, 294.0, 0.0),
];

/// Multiples of (D, M, M', F) with the sine coefficient for latitude, 1e-6 degree.
const LATITUDE_TERMS: &[(i8, i8, i8, i8, f64)] = &[
    (0, 0, 0, 1, 5_128_122.0),
    (0, 0, 1, 1, 280_602.0),
    (0, 0, 1, -1, 277_693.0),
    (2, 0, 0, -1, 173_237.0),
    (2, 0, -1, 1, 55_413.0),
    (2, 0, -1, -1, 46_271.0),
    (2, 0, 0, 1, 32_573.0),
    (0, 0, 2, 1, 17_198.0),
    (2, 0, 1, -1, 9_266.0),
    (0, 0, 2, -1, 8_822.0),
    (2, -1, 0, -1, 8_216.0),
    (2, 0, -2, -1, 4_324.0),
    (2, 0, 1, 1, 4_200.0),
    (2, 1, 0, -1, -3_359.0),
    (2, -1, -1, 1, 2_463.0),
    (2, -1, 0, 1, 2_211.0),
    (2, -1, -1, -1, 2_065.0),
    (0, 1, -1, -1, -1_870.0),
    (4, 0, -1, -1, 1_828.0),
    (0, 1, 0, 1, -1_794.0),
    (0, 0, 0, 3, -1_749.0),
    (0, 1, -1, 1, -1_565.0),
    (1, 0, 0, 1, -1_491.0),
    (0, 1, 1, 1, -1_475.0),
    (0, 1, 1, -1, -1_410.0),
    (0, 1, 0, -1, -1_344.0),
    (1, 0, 0, -1, -1_335.0),
    (0, 0, 3, 1, 1_107.0),
    (4, 0, 0, -1, 1_021.0),
    (4, 0, -1, 1, 833.0),
];

/// Fundamental lunar arguments, degrees.
#[derive(Debug, Clone, Copy)]
struct LunarArguments {
    /// Mean longitude L'
    mean_longitude: f64,
    /// Mean elongation D
    elongation: f64,
    /// Sun's mean anomaly M
    sun_anomaly: f64,
    /// Moon's mean anomaly M'
    moon_anomaly: f64,
    /// Argument of latitude F
    latitude_argument: f64,
}

impl LunarArguments {
    fn at(t: f64) -> Self {
        let t2 = t * t;
        let t3 = t2 * t;
        let t4 = t3 * t;
        Self {
            mean_longitude: 218.3164477 + 481_267.88123421 * t - 0.0015786 * t2 + t3 / 538_841.0
                - t4 / 65_194_000.0,
            elongation: 297.8501921 + 445_267.1114034 * t - 0.0018819 * t2 + t3 / 545_868.0
                - t4 / 113_065_000.0,
            sun_anomaly: 357.5291092 + 35_999.0502909 * t - 0.0001536 * t2 + t3 / 24_490_000.0,
            moon_anomaly: 134.9633964 + 477_198.8675055 * t + 0.0087414 * t2 + t3 / 69_699.0
                - t4 / 14_712_000.0,
            latitude_argument: 93.2720950 + 483_202.0175233 * t - 0.0036539 * t2
                - t3 / 3_526_000.0
                + t4 / 863_310_000.0,
        }
    }

    fn argument(&self, d: i8, m: i8, mp: i8, f: i8) -> f64 {
        (d as f64 * self.elongation
            + m as f64 * self.sun_anomaly
            + mp as f64 * self.moon_anomaly
            + f as f64 * self.latitude_argument)
            .to_radians()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LunarPosition {
    /// Geometric longitude referred to the mean equinox of date, degrees
    pub longitude: f64,
    pub latitude: f64,
    pub distance_km: f64,
}

/// Geocentric Moon. `t` is Julian centuries of TT from J2000.
pub fn moon(t: f64) -> LunarPosition {
    let args = LunarArguments::at(t);
    // Decreasing eccentricity of the Earth's orbit scales the terms in M.
    let e = 1.0 - 0.002516 * t - 0.0000074 * t * t;
    let eccentricity_factor = |m: i8| match m.abs() {
        0 => 1.0,
        1 => e,
        _ => e * e,
    };

    let mut sum_l = 0.0;
    let mut sum_r = 0.0;
    for &(d, m, mp, f, coeff_l, coeff_r) in LONGITUDE_DISTANCE_TERMS {
        let arg = args.argument(d, m, mp, f);
        let factor = eccentricity_factor(m);
        sum_l += coeff_l * factor * arg.sin();
        sum_r += coeff_r * factor * arg.cos();
    }

    let mut sum_b = 0.0;
    for &(d, m, mp, f, coeff_b) in LATITUDE_TERMS {
        sum_b += coeff_b * eccentricity_factor(m) * args.argument(d, m, mp, f).sin();
    }

    // Venus, Jupiter and flattening-of-the-Earth terms
    let a1 = (119.75 + 131.849 * t).to_radians();
    let a2 = (53.09 + 479_264.290 * t).to_radians();
    let a3 = (313.45 + 481_266.484 * t).to_radians();
    let l = args.mean_longitude.to_radians();
    let mp = args.moon_anomaly.to_radians();
    let f = args.latitude_argument.to_radians();

    sum_l += 3958.0 * a1.sin() + 1962.0 * (l - f).sin() + 318.0 * a2.sin();
    sum_b += -2235.0 * l.sin() + 382.0 * a3.sin() + 175.0 * (a1 - f).sin() + 175.0 * (a1 + f).sin()
        + 127.0 * (l - mp).sin()
        - 115.0 * (l + mp).sin();

    LunarPosition {
        longitude: normalize_longitude(args.mean_longitude + sum_l / 1e6),
        latitude: sum_b / 1e6,
        distance_km: 385_000.56 + sum_r / 1000.0,
    }
}

/// True (osculating) ascending node: the mean node plus its principal
/// periodic terms.
pub fn true_node(t: f64) -> f64 {
    let args = LunarArguments::at(t);
    let d = args.elongation.to_radians();
    let m = args.sun_anomaly.to_radians();
    let mp = args.moon_anomaly.to_radians();
    let f = args.latitude_argument.to_radians();

    normalize_longitude(
        mean_lunar_node(t) - 1.4979 * (2.0 * (d - f)).sin() - 0.1500 * m.sin()
            + 0.1226 * (2.0 * d).sin()
            + 0.1176 * (2.0 * f).sin()
            + 0.0801 * (2.0 * (mp - f)).sin(),
    )
}

/// Mean lunar apogee ("Black Moon Lilith"): the mean perigee plus 180 degrees,
/// projected from the mean lunar orbit onto the ecliptic.
pub fn mean_apogee(t: f64) -> f64 {
    let perigee = 83.3532465 + 4069.0137287 * t - 0.0103200 * t * t - t.powi(3) / 80_053.0
        + t.powi(4) / 18_999_000.0;
    let node = mean_lunar_node(t);
    let u = (perigee + 180.0 - node).to_radians();
    let inclination = MEAN_LUNAR_INCLINATION.to_radians();
    let projected = (u.sin() * inclination.cos()).atan2(u.cos()).to_degrees();
    normalize_longitude(node + projected)
}
