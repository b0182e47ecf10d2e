//! Natal chart engine.
//!
//! Resolves a birth timestamp to a Julian Day, places thirteen bodies on the
//! ecliptic (Swiss Ephemeris when its data files are present, closed-form
//! series otherwise), computes Placidus houses and classifies everything by
//! zodiac sign.

pub mod astro;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod houses;
pub mod interpretation;
pub mod time;
pub mod zodiac;

pub use chart::{BirthData, ChartAssembler, ChartComputation, NatalChart};
pub use ephemeris::{
    CelestialBody, Ephemeris, EphemerisSource, PrecisionMode, SwissEphemerisAdapter,
};
pub use error::{ChartError, EphemerisError, HouseError, InterpretationError};
pub use houses::HouseSystem;
pub use zodiac::Sign;

use std::path::PathBuf;

/// One-shot chart with the default ephemeris stack.
///
/// Builds a fresh adapter each call; long-running callers should keep a
/// [`ChartAssembler`] around instead.
pub fn compute_natal_chart(
    input: &BirthData,
    ephemeris_path: Option<PathBuf>,
) -> Result<NatalChart, ChartError> {
    let ephemeris = Ephemeris::new(SwissEphemerisAdapter::new(ephemeris_path));
    let computation = ChartAssembler::new(ephemeris).compute(input)?;
    Ok(computation.chart)
}
