//! Screenstats CLI: statistics for a tokenized screenplay.
//!
//! Usage:
//!   screenstats <TOKENS.json> [--config FILE.yaml] [--stat NAME] [--pretty] [-v...]

use clap::{Parser, ValueEnum};
use screenstats::stats::{self, Basics, Statistics};
use screenstats::{Query, StatsConfig, StatsResult, Token};
use serde::Serialize;
use serde_json::Value;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(
    name = "screenstats",
    version,
    about = "Statistics for tokenized screenplays"
)]
struct Cli {
    /// JSON file holding the token array
    tokens: PathBuf,
    /// YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Analysis to print
    #[arg(long, value_enum, default_value = "all")]
    stat: Stat,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Stat {
    All,
    DaysAndNights,
    SceneLength,
    Basics,
    Characters,
    Locations,
    LocationsBreakdown,
    Network,
    PageBalance,
    Tempo,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_tokens(path: &Path) -> StatsResult<Vec<Token>> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn query_records<K, A, S>(
    query: &Query<K, A, S>,
    tokens: &[Token],
    config: &StatsConfig,
) -> StatsResult<Value>
where
    K: Clone + Eq + Hash + Serialize,
    A: Clone + Serialize,
    S: Default,
{
    let result = query.run(tokens, config)?;
    info!(query = query.name(), groups = result.len(), "computed");
    Ok(serde_json::to_value(query.records(&result)?)?)
}

fn compute(stat: Stat, tokens: &[Token], config: &StatsConfig) -> StatsResult<Value> {
    let value = match stat {
        Stat::All => serde_json::to_value(Statistics::compute(tokens, config)?)?,
        Stat::DaysAndNights => query_records(&stats::days_and_nights(), tokens, config)?,
        Stat::SceneLength => query_records(&stats::scene_length(), tokens, config)?,
        Stat::Basics => serde_json::to_value(Basics::compute(tokens, config)?)?,
        Stat::Characters => {
            let basics = Basics::compute(tokens, config)?;
            let query = stats::characters(&basics).sort_by("lines", |c| c.lines as f64);
            query_records(&query, tokens, config)?
        }
        Stat::Locations => query_records(&stats::locations(), tokens, config)?,
        Stat::LocationsBreakdown => query_records(&stats::locations_breakdown(), tokens, config)?,
        Stat::Network => {
            let basics = Basics::compute(tokens, config)?;
            let network = stats::character_network(tokens, config, &basics)?;
            serde_json::to_value(network.to_records()?)?
        }
        Stat::PageBalance => query_records(&stats::page_balance(), tokens, config)?,
        Stat::Tempo => serde_json::to_value(stats::tempo(tokens, config)?)?,
    };
    Ok(value)
}

fn run(cli: &Cli) -> StatsResult<String> {
    let config = match &cli.config {
        Some(path) => StatsConfig::load(path)?,
        None => StatsConfig::default(),
    };
    let tokens = read_tokens(&cli.tokens)?;
    info!(path = %cli.tokens.display(), tokens = tokens.len(), "loaded tokens");

    let value = compute(cli.stat, &tokens, &config)?;
    let output = if cli.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(output)
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(&cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
