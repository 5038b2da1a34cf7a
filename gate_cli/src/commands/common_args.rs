use anyhow::{Context, Result};
use clap::Args;
use gate_puzzle::PuzzleSpec;
use gate_sim::{EvalConfig, MAX_ITERATIONS};
use serde::de::DeserializeOwned;
use std::{fs::File, io::BufReader, path::Path, path::PathBuf};

use crate::solution::Solution;

/// Options shared by every command.
#[derive(Clone, Args)]
pub struct SandboxOptions {
    /// The puzzle definition (JSON).
    pub puzzle: PathBuf,

    /// Upper bound on relaxation passes per evaluation.
    #[arg(long, default_value_t = MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Raise the log level; repeat for more detail. `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl SandboxOptions {
    /// Try set up the logger based on the verbosity level
    pub fn try_setup_logger(&self) {
        use tracing_subscriber::{
            filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
            Registry,
        };

        let level = match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();
        let fmt_layer = fmt::layer()
            .compact()
            .with_thread_ids(false)
            .with_thread_names(false)
            .without_time()
            .with_writer(std::io::stderr);

        Registry::default()
            .with(fmt_layer)
            .with(filter)
            .try_init()
            .ok();
    }

    pub fn eval_config(&self) -> EvalConfig {
        EvalConfig {
            max_iterations: self.max_iterations,
        }
    }

    pub fn load_puzzle(&self) -> Result<PuzzleSpec> {
        let spec: PuzzleSpec = read_json(&self.puzzle).context("failed to load puzzle")?;
        tracing::info!(
            "loaded puzzle {:?} from {}",
            spec.name,
            self.puzzle.display()
        );
        Ok(spec)
    }
}

pub fn load_solution(path: &Path) -> Result<Solution> {
    read_json(path).context("failed to load solution")
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))
}
