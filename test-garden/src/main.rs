//! Demo runner for the bundled scenario suites.
//!
//! Loads `garden.toml` (if present), applies command-line overrides and runs
//! each selected suite in its own garden.

mod demos;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;

use test_garden::io::config::load_config;
use test_garden::{Garden, GardenConfig, GardenError, Summary, exit_codes, logging};

#[derive(Parser, Debug)]
#[command(
    name = "test-garden",
    version,
    about = "Run the bundled scenario suites"
)]
struct Cli {
    /// Also print entered, skipped, passed and incomplete scenarios.
    #[arg(short, long)]
    verbose: bool,

    /// TOML config file; missing means defaults.
    #[arg(short, long, value_name = "CONFIG", default_value = "garden.toml")]
    config: PathBuf,

    #[arg(long, value_enum, default_value_t = Suite::All)]
    suite: Suite,

    /// Print each summary as a JSON line after the report.
    #[arg(long)]
    json: bool,

    /// Log pass and navigation decisions to stderr.
    #[arg(long)]
    trace: bool,

    /// Case-insensitive regex per nesting depth; replaces the config's patterns.
    patterns: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Suite {
    All,
    Array,
    Ftp,
    Thing,
}

type Demo = fn(Garden) -> Result<Summary, GardenError>;

const DEMOS: [(Suite, Demo); 3] = [
    (Suite::Array, demos::array::run),
    (Suite::Ftp, demos::ftp::run),
    (Suite::Thing, demos::thing::run),
];

impl Suite {
    fn selected(self) -> impl Iterator<Item = (Suite, Demo)> {
        DEMOS
            .into_iter()
            .filter(move |(suite, _)| self == Suite::All || *suite == self)
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(if cli.trace { "test_garden=debug" } else { "warn" });
    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = resolve_config(cli)?;
    let mut code = exit_codes::OK;
    for (suite, demo) in cli.suite.selected() {
        debug!(?suite, "running suite");
        let garden = Garden::new(config.clone()).context("build garden")?;
        let summary = demo(garden)
            .with_context(|| format!("suite {suite:?} aborted"))?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string(&summary).context("serialize summary")?
            );
        }
        if !summary.is_success() {
            code = exit_codes::FAILED;
        }
    }
    Ok(code)
}

fn resolve_config(cli: &Cli) -> Result<GardenConfig> {
    let mut config = load_config(&cli.config)?;
    if cli.verbose {
        config.verbose = true;
    }
    if !cli.patterns.is_empty() {
        config.patterns.clone_from(&cli.patterns);
    }
    config.validate().context("invalid command-line patterns")?;
    Ok(config)
}
