//! RaffleWheel Simulator
//!
//! Usage:
//!   rw-sim spin --min 1 --max 50 --hold-ms 800,1200,2000
//!   rw-sim scratch --options-file names.txt --count 5
//!   rw-sim config --preset quick

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use rw_sim::{SpinPlan, load_config, preset, run_scratch, run_spins};

#[derive(Parser)]
#[command(name = "rw-sim", about = "Replay raffle spins and scratch cards headlessly")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spin the number wheel once per hold duration
    Spin {
        /// Lowest number in the pool
        #[arg(long, default_value = "0")]
        min: String,
        /// Highest number in the pool
        #[arg(long, default_value = "100")]
        max: String,
        /// How long the spin key is held for each spin, in milliseconds
        #[arg(long, value_delimiter = ',', required = true)]
        hold_ms: Vec<f64>,
        /// Simulated frame rate
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Reset the scratch card repeatedly and print each concealed answer
    Scratch {
        /// File with one option per line
        #[arg(long)]
        options_file: PathBuf,
        /// RNG seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Number of resets
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print a config preset as JSON
    Config {
        #[arg(long, default_value = "standard")]
        preset: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Spin {
            min,
            max,
            hold_ms,
            fps,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let plan = SpinPlan {
                min,
                max,
                hold_ms,
                fps,
                seed: 0,
            };
            let report = run_spins(config, &plan)?;
            for (i, draw) in report.draws.iter().enumerate() {
                println!(
                    "#{:<3} held {:>6.0}ms  ->  {:>6}  ({} left)",
                    i + 1,
                    draw.hold_ms,
                    draw.result,
                    draw.remaining
                );
            }
            if let Some(reason) = &report.stopped {
                println!("stopped: {}", reason);
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Scratch {
            options_file,
            seed,
            count,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let raw = fs::read_to_string(&options_file)
                .with_context(|| format!("Failed to read {}", options_file.display()))?;
            for answer in run_scratch(config, &raw, seed, count)? {
                println!("{}", answer);
            }
        }
        Commands::Config { preset: name } => {
            println!("{}", preset(&name)?.to_json_pretty()?);
        }
    }
    Ok(())
}
