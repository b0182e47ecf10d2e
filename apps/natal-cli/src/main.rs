use anyhow::Context;
use clap::Parser;
use natal::chart::{BirthData, ChartComputation};
use natal::ephemeris::swiss::DataFiles;
use natal::interpretation::{interpret_with_fallback, InterpretationKind, StaticInterpreter};
use natal::{ChartAssembler, Ephemeris, HouseSystem, SwissEphemerisAdapter};
use natal_config::EngineSettings;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compute a natal chart and print it as JSON")]
struct Args {
    /// Birth timestamp, e.g. 1990-06-15T08:30:00 (an explicit offset wins over --zone).
    #[arg(long)]
    datetime: String,

    /// Latitude in degrees, north positive.
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude in degrees, east positive.
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// IANA time zone used when the timestamp has no offset.
    #[arg(long, default_value = "UTC")]
    zone: String,

    /// Config file (default: configs/natal.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Swiss Ephemeris data directory; overrides config and SWISS_EPHEMERIS_PATH.
    #[arg(long)]
    ephemeris_path: Option<PathBuf>,

    /// Compute bodies one at a time instead of on the thread pool.
    #[arg(long)]
    sequential: bool,

    /// Pretty-print the JSON.
    #[arg(long)]
    pretty: bool,

    /// Include chart diagnostics (precision mode, skipped bodies, house failure).
    #[arg(long)]
    diagnostics: bool,

    /// Append interpretation text: natal, synastry or personal_horoscope.
    #[arg(long)]
    interpret: Option<InterpretationKind>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Output<'a> {
    Chart(&'a natal::NatalChart),
    WithDiagnostics(&'a ChartComputation),
}

fn load_settings(args: &Args) -> anyhow::Result<EngineSettings> {
    let mut settings = match &args.config {
        Some(path) => natal_config::load_engine_settings_from(path)?,
        None => natal_config::load_engine_settings()?,
    };
    if let Some(path) = &args.ephemeris_path {
        settings.ephemeris_path = Some(path.clone());
    }
    if args.sequential {
        settings.parallel = false;
    }
    Ok(settings)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let settings = load_settings(&args)?;
    log::debug!("Settings: {:?}", settings);

    let house_system: HouseSystem = settings
        .house_system
        .parse()
        .context("Invalid house system in settings")?;

    let adapter = SwissEphemerisAdapter::new(settings.ephemeris_path.clone());
    if adapter.data_files() == DataFiles::default() {
        log::info!(
            "No Swiss Ephemeris data files under {}; charts use the analytical series",
            adapter.ephemeris_path().display()
        );
    }
    let assembler = ChartAssembler::new(Ephemeris::new(adapter))
        .with_house_system(house_system)
        .with_parallel(settings.parallel);

    let input = BirthData {
        birth_date_time: args.datetime.clone(),
        latitude: args.lat,
        longitude: args.lon,
        zone_id: args.zone.clone(),
    };
    let computation = assembler
        .compute(&input)
        .with_context(|| format!("Failed to compute chart for {:?}", args.datetime))?;
    log::info!(
        "Chart computed in {} mode: {} bodies, {} houses",
        computation.diagnostics.mode,
        computation.chart.bodies.len(),
        computation.chart.houses.len()
    );

    let output = if args.diagnostics {
        Output::WithDiagnostics(&computation)
    } else {
        Output::Chart(&computation.chart)
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", json);

    if let Some(kind) = args.interpret {
        let text = interpret_with_fallback(
            &StaticInterpreter,
            kind,
            &computation.chart,
            settings.interpretation_timeout,
            &settings.fallback_text,
        )
        .await;
        println!();
        println!("{}", text);
    }

    Ok(())
}
