pub mod analytical;
pub mod swiss;
pub mod types;

pub use analytical::AnalyticalEphemeris;
pub use swiss::SwissEphemerisAdapter;
pub use types::{CelestialBody, PrecisionMode, RawPosition};

use crate::error::EphemerisError;

/// Anything that can place a body on the ecliptic at an instant.
///
/// Implementations must be callable from several threads at once; the chart
/// assembler fans bodies out over a thread pool.
pub trait EphemerisSource: Send + Sync {
    fn position(
        &self,
        body: CelestialBody,
        julian_day_ut: f64,
        mode: PrecisionMode,
    ) -> Result<RawPosition, EphemerisError>;
}

/// The production source: Swiss Ephemeris for high precision, closed-form
/// series for the fallback.
pub struct Ephemeris {
    swiss: SwissEphemerisAdapter,
    analytical: AnalyticalEphemeris,
}

impl Ephemeris {
    pub fn new(swiss: SwissEphemerisAdapter) -> Self {
        Self {
            swiss,
            analytical: AnalyticalEphemeris::new(),
        }
    }
}

impl EphemerisSource for Ephemeris {
    fn position(
        &self,
        body: CelestialBody,
        julian_day_ut: f64,
        mode: PrecisionMode,
    ) -> Result<RawPosition, EphemerisError> {
        match mode {
            PrecisionMode::HighPrecision => self.swiss.calc_body_position(body, julian_day_ut),
            PrecisionMode::AnalyticalFallback => {
                self.analytical.calc_body_position(body, julian_day_ut)
            }
        }
    }
}

/// Pick the precision mode for a whole chart by trying the Sun first.
///
/// High precision is kept only if the Sun resolves under it; otherwise every
/// body of the request is computed analytically.
pub fn negotiate_mode(source: &dyn EphemerisSource, julian_day_ut: f64) -> PrecisionMode {
    match source.position(CelestialBody::Sun, julian_day_ut, PrecisionMode::HighPrecision) {
        Ok(_) => {
            log::debug!("High-precision ephemeris available");
            PrecisionMode::HighPrecision
        }
        Err(e) => {
            log::info!("Ephemeris mode degraded to analytical series: {}", e);
            PrecisionMode::AnalyticalFallback
        }
    }
}
