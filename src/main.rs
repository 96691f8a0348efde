use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pillar_score::chart::{ChartInput, PillarInput};
use pillar_score::cycle::{Branch, Stem, CYCLE};
use pillar_score::scoring::{ScoringConfig, ScoringEngine};
use pillar_score::ScoreError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID_CHART: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a chart against the rule library
    Score {
        /// Year pillar as stem:branch (e.g. gui:you)
        #[arg(long, value_parser = PillarInput::parse)]
        year: Option<PillarInput>,

        /// Month pillar as stem:branch
        #[arg(long, value_parser = PillarInput::parse)]
        month: Option<PillarInput>,

        /// Day pillar as stem:branch
        #[arg(long, value_parser = PillarInput::parse)]
        day: Option<PillarInput>,

        /// Hour pillar as stem:branch
        #[arg(long, value_parser = PillarInput::parse)]
        hour: Option<PillarInput>,

        /// Read the chart from a YAML file instead of --year/--month/--day/--hour
        #[arg(long, conflicts_with_all = ["year", "month", "day", "hour"])]
        chart: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List the 60 stem/branch pairs of the sexagenary cycle
    Cycle,
    /// Check whether a stem/branch pair occurs in the cycle
    Check {
        stem: String,
        branch: String,
    },
    /// Print the built-in scoring configuration as YAML
    Defaults,
}

#[derive(Parser, Debug)]
#[command(name = "pillar-score")]
#[command(about = "Element scoring for Four Pillars charts", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/pillar-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match pillar_score::config::load_config(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let code = match cli.command {
        Commands::Score {
            year,
            month,
            day,
            hour,
            chart,
            format,
        } => run_score(&config, year, month, day, hour, chart, format, cli.verbose),
        Commands::Cycle => {
            println!(
                "{}",
                pillar_score::output::format_cycle(&CYCLE, config.label_field)
            );
            Ok(EXIT_SUCCESS)
        }
        Commands::Check { stem, branch } => Ok(run_check(&config, &stem, &branch)),
        Commands::Defaults => serde_saphyr::to_string(&ScoringConfig::default())
            .map(|yaml| {
                print!("{}", yaml);
                EXIT_SUCCESS
            })
            .map_err(|e| anyhow::anyhow!("Failed to serialize default config: {}", e)),
    };

    match code {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_score(
    config: &ScoringConfig,
    year: Option<PillarInput>,
    month: Option<PillarInput>,
    day: Option<PillarInput>,
    hour: Option<PillarInput>,
    chart_path: Option<PathBuf>,
    format: OutputFormat,
    verbose: bool,
) -> Result<i32> {
    let chart = match (chart_path, year, month, day, hour) {
        (Some(path), ..) => ChartInput::load(&path)?,
        (None, Some(year), Some(month), Some(day), Some(hour)) => ChartInput {
            year,
            month,
            day,
            hour,
        },
        _ => bail!("a chart needs --year, --month, --day and --hour (or --chart FILE)"),
    };

    let mut engine = match ScoringEngine::new(&chart, config) {
        Ok(engine) => engine,
        Err(ScoreError::InvalidConfiguration(errors)) => {
            eprintln!("Scoring config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            return Ok(EXIT_CONFIG);
        }
        Err(ScoreError::InvalidChart { slots }) => {
            eprintln!("Invalid chart:");
            for slot in slots {
                eprintln!("  - {}", slot);
            }
            return Ok(EXIT_INVALID_CHART);
        }
    };

    let result = engine.evaluate();
    let use_colors = pillar_score::output::should_use_colors();

    match format {
        OutputFormat::Table => println!(
            "{}",
            pillar_score::output::format_result(&result, config.label_field, verbose, use_colors)
        ),
        OutputFormat::Tsv => println!("{}", pillar_score::output::format_tsv(&result.scores)),
        OutputFormat::Json => println!("{}", pillar_score::output::format_json(&result)?),
    }

    Ok(EXIT_SUCCESS)
}

fn run_check(config: &ScoringConfig, stem: &str, branch: &str) -> i32 {
    let field = config.label_field;
    let (Some(s), Some(b)) = (Stem::from_label(field, stem), Branch::from_label(field, branch))
    else {
        eprintln!("Unknown label: '{}' / '{}'", stem, branch);
        return EXIT_INVALID_CHART;
    };

    match CYCLE.index_of(s, b) {
        Some(index) => {
            println!("{} is position {} of 60", CYCLE.value_at(index).name(field), index + 1);
            EXIT_SUCCESS
        }
        None => {
            println!("{}-{} does not occur in the cycle", stem, branch);
            EXIT_INVALID_CHART
        }
    }
}
