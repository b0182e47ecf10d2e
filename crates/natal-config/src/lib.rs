use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const EPHEMERIS_PATH_ENV: &str = "SWISS_EPHEMERIS_PATH";
pub const VALID_HOUSE_SYSTEMS: &[&str] = &["placidus"];
pub const DEFAULT_FALLBACK_TEXT: &str = "Interpretation is unavailable right now.";

/// Resolved engine settings. Strings here are validated but not parsed into
/// engine types, so this crate stays independent of the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// `None` leaves the choice to the engine (its own env lookup and default).
    pub ephemeris_path: Option<PathBuf>,
    pub house_system: String,
    pub parallel: bool,
    pub interpretation_timeout: Duration,
    pub fallback_text: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ephemeris_path: None,
            house_system: default_house_system(),
            parallel: true,
            interpretation_timeout: Duration::from_millis(default_timeout_ms()),
            fallback_text: default_fallback_text(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EphemerisToml {
    #[serde(default)]
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChartToml {
    #[serde(default = "default_house_system")]
    house_system: String,
    #[serde(default = "default_parallel")]
    parallel: bool,
}

impl Default for ChartToml {
    fn default() -> Self {
        Self {
            house_system: default_house_system(),
            parallel: default_parallel(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct InterpretationToml {
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
    #[serde(default = "default_fallback_text")]
    fallback_text: String,
}

impl Default for InterpretationToml {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            fallback_text: default_fallback_text(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    ephemeris: EphemerisToml,
    #[serde(default)]
    chart: ChartToml,
    #[serde(default)]
    interpretation: InterpretationToml,
}

fn default_house_system() -> String {
    "placidus".to_string()
}

fn default_parallel() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_fallback_text() -> String {
    DEFAULT_FALLBACK_TEXT.to_string()
}

/// Try the common relative paths for `configs/natal.toml`. `None` if neither
/// exists.
pub fn read_natal_toml_text() -> Option<(PathBuf, String)> {
    let paths = ["configs/natal.toml", "../../configs/natal.toml"];
    paths.iter().find_map(|p| {
        fs::read_to_string(p)
            .ok()
            .map(|text| (PathBuf::from(p), text))
    })
}

/// Parse settings from TOML text. Does not consult the environment.
pub fn parse_engine_settings(text: &str) -> anyhow::Result<EngineSettings> {
    let root: RootConfigToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse natal.toml: {e}"))?;

    let house_system = root.chart.house_system.trim().to_lowercase();
    if !VALID_HOUSE_SYSTEMS.contains(&house_system.as_str()) {
        anyhow::bail!(
            "Unsupported chart.house_system {:?}; valid: {:?}",
            root.chart.house_system,
            VALID_HOUSE_SYSTEMS
        );
    }
    if root.interpretation.timeout_ms == 0 {
        anyhow::bail!("interpretation.timeout_ms must be greater than zero");
    }

    Ok(EngineSettings {
        ephemeris_path: root.ephemeris.path,
        house_system,
        parallel: root.chart.parallel,
        interpretation_timeout: Duration::from_millis(root.interpretation.timeout_ms),
        fallback_text: root.interpretation.fallback_text,
    })
}

/// Load from an explicit file, which must exist.
pub fn load_engine_settings_from(path: &Path) -> anyhow::Result<EngineSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read config file {}", path.display()))?;
    let settings = parse_engine_settings(&text)
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    Ok(apply_env_overrides(settings))
}

/// Load from the default locations, falling back to defaults when no file is
/// found. `SWISS_EPHEMERIS_PATH` overrides the configured ephemeris path.
pub fn load_engine_settings() -> anyhow::Result<EngineSettings> {
    let settings = match read_natal_toml_text() {
        Some((path, text)) => parse_engine_settings(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?,
        None => EngineSettings::default(),
    };
    Ok(apply_env_overrides(settings))
}

fn apply_env_overrides(settings: EngineSettings) -> EngineSettings {
    apply_ephemeris_override(settings, env::var_os(EPHEMERIS_PATH_ENV).map(PathBuf::from))
}

fn apply_ephemeris_override(
    mut settings: EngineSettings,
    from_env: Option<PathBuf>,
) -> EngineSettings {
    if let Some(path) = from_env.filter(|p| !p.as_os_str().is_empty()) {
        settings.ephemeris_path = Some(path);
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = parse_engine_settings("").unwrap();
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn test_full_file() {
        let settings = parse_engine_settings(
            r#"
            [ephemeris]
            path = "/opt/swisseph"

            [chart]
            house_system = "Placidus"
            parallel = false

            [interpretation]
            timeout_ms = 250
            fallback_text = "later"
            "#,
        )
        .unwrap();
        assert_eq!(settings.ephemeris_path, Some(PathBuf::from("/opt/swisseph")));
        assert_eq!(settings.house_system, "placidus");
        assert!(!settings.parallel);
        assert_eq!(settings.interpretation_timeout, Duration::from_millis(250));
        assert_eq!(settings.fallback_text, "later");
    }

    #[test]
    fn test_unknown_house_system_lists_valid_names() {
        let err = parse_engine_settings("[chart]\nhouse_system = \"koch\"\n").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("koch"));
        assert!(message.contains("placidus"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(parse_engine_settings("[chart]\nhouses = \"placidus\"\n").is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(parse_engine_settings("[interpretation]\ntimeout_ms = 0\n").is_err());
    }

    #[test]
    fn test_env_path_overrides_file() {
        let settings = EngineSettings {
            ephemeris_path: Some(PathBuf::from("/from/file")),
            ..EngineSettings::default()
        };
        let settings = apply_ephemeris_override(settings, Some(PathBuf::from("/from/env")));
        assert_eq!(settings.ephemeris_path, Some(PathBuf::from("/from/env")));

        let untouched = apply_ephemeris_override(EngineSettings::default(), Some(PathBuf::new()));
        assert_eq!(untouched.ephemeris_path, None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chart]\nparallel = false").unwrap();
        let settings = load_engine_settings_from(file.path()).unwrap();
        assert!(!settings.parallel);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_engine_settings_from(&dir.path().join("natal.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("Could not read config file"));
    }
}
