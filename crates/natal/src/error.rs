use crate::ephemeris::{CelestialBody, PrecisionMode};
use thiserror::Error;

/// Errors that abort a chart request.
///
/// Everything else the engine runs into (missing data files, a single body
/// failing, polar house degeneracy) is absorbed into partial results and
/// reported through [`crate::chart::ChartDiagnostics`].
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Cannot parse birth timestamp {input:?}: {message}")]
    TemporalParse { input: String, message: String },
}

/// Errors raised by an ephemeris source for a single body.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("{body} is not available in {mode} mode: {message}")]
    Unavailable {
        body: CelestialBody,
        mode: PrecisionMode,
        message: String,
    },
    #[error("Failed to calculate position for {body} at JD {julian_day}: {message}")]
    CalculationFailed {
        body: CelestialBody,
        julian_day: f64,
        message: String,
    },
}

impl EphemerisError {
    pub fn body(&self) -> CelestialBody {
        match self {
            EphemerisError::Unavailable { body, .. } => *body,
            EphemerisError::CalculationFailed { body, .. } => *body,
        }
    }
}

/// Why a house computation produced no cusps.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HouseError {
    #[error("Invalid house system: {system}. Valid systems: {valid:?}")]
    InvalidHouseSystem { system: String, valid: Vec<String> },
    #[error("Placidus is undefined at latitude {latitude}: {message}")]
    Undefined { latitude: f64, message: String },
    #[error("House cusp {house} did not converge after {iterations} iterations")]
    NoConvergence { house: u8, iterations: usize },
}

#[derive(Error, Debug)]
pub enum InterpretationError {
    #[error("Interpretation service timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("Interpretation service failed: {0}")]
    Service(String),
}
