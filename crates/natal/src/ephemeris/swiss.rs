use crate::ephemeris::types::{CelestialBody, PrecisionMode, RawPosition};
use crate::error::EphemerisError;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

pub const EPHEMERIS_PATH_ENV: &str = "SWISS_EPHEMERIS_PATH";
pub const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";

const FLG_SWIEPH: i32 = 2;
const FLG_SPEED: i32 = 256;
const CALC_FLAGS: i32 = FLG_SWIEPH | FLG_SPEED;

// The C library keeps its file handles and caches in process-global state.
static SWISS_LOCK: Mutex<()> = Mutex::new(());
static CONFIGURED_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Data file families shipped with the Swiss Ephemeris.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFileFamily {
    /// `sepl*.se1`: Sun and planets
    Planets,
    /// `semo*.se1`: Moon, lunar node and apogee
    Moon,
    /// `seas*.se1`: main asteroids and Chiron
    Asteroids,
}

impl DataFileFamily {
    pub fn prefix(self) -> &'static str {
        match self {
            DataFileFamily::Planets => "sepl",
            DataFileFamily::Moon => "semo",
            DataFileFamily::Asteroids => "seas",
        }
    }

    pub fn for_body(body: CelestialBody) -> DataFileFamily {
        match body {
            CelestialBody::Moon | CelestialBody::TrueNode | CelestialBody::Lilith => {
                DataFileFamily::Moon
            }
            CelestialBody::Chiron => DataFileFamily::Asteroids,
            _ => DataFileFamily::Planets,
        }
    }
}

/// Which data file families were found in the ephemeris directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DataFiles {
    pub planets: bool,
    pub moon: bool,
    pub asteroids: bool,
}

impl DataFiles {
    /// Scan a directory for Swiss Ephemeris data files.
    pub fn scan(path: &Path) -> DataFiles {
        let mut files = DataFiles::default();
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(_) => return files,
        };
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_lowercase();
            if !name.ends_with(".se1") {
                continue;
            }
            if name.starts_with(DataFileFamily::Planets.prefix()) {
                files.planets = true;
            } else if name.starts_with(DataFileFamily::Moon.prefix()) {
                files.moon = true;
            } else if name.starts_with(DataFileFamily::Asteroids.prefix()) {
                files.asteroids = true;
            }
        }
        files
    }

    pub fn has(&self, family: DataFileFamily) -> bool {
        match family {
            DataFileFamily::Planets => self.planets,
            DataFileFamily::Moon => self.moon,
            DataFileFamily::Asteroids => self.asteroids,
        }
    }
}

/// High-precision positions from the Swiss Ephemeris data files.
///
/// Construction never fails. Whether a body can be resolved depends on which
/// data files are present, and that is checked on every call so a missing
/// directory shows up as [`EphemerisError::Unavailable`] rather than as a
/// silent switch to the library's built-in low-precision theory.
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
    data_files: DataFiles,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path
    pub fn new(ephemeris_path: Option<PathBuf>) -> Self {
        let path = resolve_ephemeris_path(ephemeris_path);
        let data_files = if path.is_dir() {
            DataFiles::scan(&path)
        } else {
            log::warn!(
                "Ephemeris path {} does not exist; high-precision mode is unavailable",
                path.display()
            );
            DataFiles::default()
        };
        log::debug!("Swiss Ephemeris data at {}: {:?}", path.display(), data_files);

        if data_files != DataFiles::default() {
            configure_library_path(&path);
        }

        Self {
            ephemeris_path: path,
            data_files,
        }
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }

    pub fn data_files(&self) -> DataFiles {
        self.data_files
    }

    pub fn is_available(&self, body: CelestialBody) -> bool {
        cfg!(feature = "swiss-ephemeris") && self.data_files.has(DataFileFamily::for_body(body))
    }

    /// Calculate position for a single body
    pub fn calc_body_position(
        &self,
        body: CelestialBody,
        jd: f64,
    ) -> Result<RawPosition, EphemerisError> {
        if !self.is_available(body) {
            let family = DataFileFamily::for_body(body);
            return Err(EphemerisError::Unavailable {
                body,
                mode: PrecisionMode::HighPrecision,
                message: format!(
                    "no {}*.se1 data files under {}",
                    family.prefix(),
                    self.ephemeris_path.display()
                ),
            });
        }

        let (out, return_flags) =
            calc_ut(body, jd).map_err(|message| EphemerisError::CalculationFailed {
                body,
                julian_day: jd,
                message,
            })?;
        check_return_flags(body, jd, return_flags)?;

        let [longitude, latitude, distance, speed_longitude] = out;
        let position = RawPosition {
            longitude,
            latitude,
            distance,
            speed_longitude,
        };
        if !position.is_finite() {
            return Err(EphemerisError::CalculationFailed {
                body,
                julian_day: jd,
                message: "Swiss Ephemeris returned a non-finite value".to_string(),
            });
        }
        Ok(position)
    }
}

/// Explicit path, else `SWISS_EPHEMERIS_PATH`, else the system default.
pub fn resolve_ephemeris_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        env::var(EPHEMERIS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_EPHEMERIS_PATH))
    })
}

/// Point the C library at the data directory. The library reads
/// `SE_EPHE_PATH` when it opens its files, and only the first directory
/// configured in a process takes effect.
fn configure_library_path(path: &Path) {
    let first = CONFIGURED_PATH.get_or_init(|| {
        let _guard = SWISS_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::set_var("SE_EPHE_PATH", path);
        path.to_path_buf()
    });
    if first != path {
        log::warn!(
            "Swiss Ephemeris already configured for {}; ignoring {}",
            first.display(),
            path.display()
        );
    }
}

/// The library answers from its built-in Moshier theory, and clears
/// `FLG_SWIEPH` in the returned flags, when the date lies outside the
/// installed files. That answer is not high precision.
fn check_return_flags(
    body: CelestialBody,
    jd: f64,
    return_flags: i32,
) -> Result<(), EphemerisError> {
    if return_flags & FLG_SWIEPH == 0 {
        return Err(EphemerisError::Unavailable {
            body,
            mode: PrecisionMode::HighPrecision,
            message: format!(
                "JD {} is outside the installed data files (return flags {:#x})",
                jd, return_flags
            ),
        });
    }
    Ok(())
}

#[cfg(feature = "swiss-ephemeris")]
fn calc_ut(body: CelestialBody, jd: f64) -> Result<([f64; 4], i32), String> {
    let _guard = SWISS_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let result = swisseph::swe::calc_ut(jd, body.swiss_id() as u32, CALC_FLAGS as u32)
        .map_err(|e| format!("Swiss Ephemeris error: {}", e))?;
    let out = result.out;
    Ok(([out[0], out[1], out[2], out[3]], result.code))
}

#[cfg(not(feature = "swiss-ephemeris"))]
fn calc_ut(_body: CelestialBody, _jd: f64) -> Result<([f64; 4], i32), String> {
    let _ = CALC_FLAGS;
    Err("built without the swiss-ephemeris feature".to_string())
}
