//! Expedition CLI - run explorer raids against a configured island.
//!
//! - `expedition run` - fire one expedition and export its trace
//! - `expedition init` - write an example run configuration

mod raiders;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use expedition_core::{export, RunConfig, RunOutcome, TurnEngine, UniformCostPolicy};

#[derive(Parser)]
#[command(name = "expedition")]
#[command(about = "Turn-based evaluation harness for explorer raids", version)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fire one expedition
    Run {
        /// Run configuration (YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory for exports
        #[arg(short, long, default_value = "./outputs")]
        out: PathBuf,

        /// Built-in raider to evaluate (stopper, forager)
        #[arg(short, long, default_value = "forager")]
        raider: String,

        /// Skip the event-log export
        #[arg(long)]
        no_logs: bool,

        /// Skip the visibility-map export
        #[arg(long)]
        no_map: bool,

        /// Print the raid's final report on success
        #[arg(long)]
        show_report: bool,
    },

    /// Write an example configuration to the given path
    Init {
        #[arg(default_value = "expedition.yaml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Run {
            config,
            out,
            raider,
            no_logs,
            no_map,
            show_report,
        } => run_expedition(&config, &out, &raider, no_logs, no_map, show_report),
        Commands::Init { path } => init_config(&path),
    }
}

fn run_expedition(
    config_path: &std::path::Path,
    out: &std::path::Path,
    raider: &str,
    no_logs: bool,
    no_map: bool,
    show_report: bool,
) -> Result<()> {
    let config = RunConfig::load(config_path)?;
    let Some(explorer) = raiders::by_name(raider) else {
        bail!("unknown raider {raider:?} (expected: stopper, forager)");
    };

    let island = config.build_island()?;
    let policy = UniformCostPolicy;
    let engine = TurnEngine::new(&island, &policy, &config);
    let report = engine.run(explorer)?;

    match &report.outcome {
        RunOutcome::Success {
            remaining_budget,
            collected,
            report: raid_report,
        } => {
            println!("Outcome: success ({remaining_budget} action points left)");
            for (kind, amount) in collected {
                println!("  collected {kind}: {amount}");
            }
            if show_report {
                match raid_report {
                    Some(text) => println!("Report: [{text}]"),
                    None => println!("Report: undefined"),
                }
            }
        }
        RunOutcome::BudgetExhausted => println!("Outcome: budget exhausted"),
        RunOutcome::InvalidDecision(reason) => println!("Outcome: invalid decision ({reason:?})"),
        RunOutcome::AgentFailure(cause) => println!("Outcome: agent failure ({cause:?})"),
    }
    println!("Turns executed: {}", report.events.len());

    if !no_logs {
        let path = export::write_event_log(out, &report)?;
        println!("Event log: {}", path.display());
    }
    if !no_map {
        let path = export::write_visibility(out, &report)?;
        println!("Visibility: {}", path.display());
    }

    Ok(())
}

fn init_config(path: &std::path::Path) -> Result<()> {
    let example = "\
name: Lian_Yu
seed: 0
budget: 7000
crew: 15
timeout_ms: 2000
landmarks: 10
start:
  x: 1
  y: 1
  heading: EAST
contract:
  WOOD: 1000
map:
  width: 30
  height: 30
  deposits:
    - resource: WOOD
      x: 1
      y: 1
";
    std::fs::write(path, example)?;
    println!("Wrote example configuration to {}", path.display());
    Ok(())
}
