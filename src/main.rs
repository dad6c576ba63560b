use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use lapvis::{
    AnalysisConfig, DriverNames, LapComparison, LapOverview, LapVisError, load_lap_jsonl,
};
use log::{error, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare a challenger lap against a reference lap
    Compare {
        #[arg(short, long)]
        reference: PathBuf,

        #[arg(short, long)]
        challenger: PathBuf,

        #[arg(long, default_value = "A")]
        reference_name: String,

        #[arg(long, default_value = "B")]
        challenger_name: String,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the whole report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Style labels and hazard scans of a single lap
    Profile {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, LapVisError> {
    if let Some(path) = path {
        return AnalysisConfig::from_file(path);
    }
    match AnalysisConfig::from_local_file() {
        Some(config) => config,
        None => {
            info!("No local config file, using default analysis parameters");
            Ok(AnalysisConfig::default())
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, LapVisError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| LapVisError::ReportSerializeError { source: e })
}

fn compare(
    reference: &Path,
    challenger: &Path,
    names: DriverNames,
    config: Option<&Path>,
    json: bool,
) -> Result<(), LapVisError> {
    let config = load_config(config)?;
    let lap_a = load_lap_jsonl(reference)?;
    let lap_b = load_lap_jsonl(challenger)?;

    let report = LapComparison::new(&lap_a, &lap_b, &config)?.report(&names);
    if json {
        println!("{}", to_json(&report)?);
    } else {
        for insight in &report.insights {
            println!("{insight}");
        }
    }
    Ok(())
}

fn profile(input: &Path, config: Option<&Path>, json: bool) -> Result<(), LapVisError> {
    let config = load_config(config)?;
    let lap = load_lap_jsonl(input)?;
    let overview = LapOverview::new(&lap, &config);
    if json {
        println!("{}", to_json(&overview)?);
        return Ok(());
    }

    let style = &overview.style;
    println!("Braking style: {}", style.braking_style);
    println!("Throttle style: {}", style.throttle_style);
    println!("Smoothness: {}", style.smoothness);
    println!("Corner priority: {}", style.corner_priority);

    let hazards = &overview.hazards;
    println!("Anomalous slow zones: {}", hazards.anomalies.len());
    println!("High-risk braking samples: {}", hazards.risky_braking.len());
    println!(
        "Strategy: {} ({})",
        hazards.strategy.strategy,
        hazards.strategy.strategy.reason()
    );
    Ok(())
}

fn main() {
    colog::init();

    let cli = Args::parse();
    let result = match &cli.command {
        Commands::Compare {
            reference,
            challenger,
            reference_name,
            challenger_name,
            config,
            json,
        } => compare(
            reference,
            challenger,
            DriverNames::new(reference_name, challenger_name),
            config.as_deref(),
            *json,
        ),
        Commands::Profile {
            input,
            config,
            json,
        } => profile(input, config.as_deref(), *json),
    };
    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}
