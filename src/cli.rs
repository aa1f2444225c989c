use std::io::{self, Write};
use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::combat::derive_difficulty;
use crate::config::AppConfig;
use crate::error::{Result, WoundsimError};
use crate::parallel::{BatchRunner, WorkerPool};
use crate::report::write_outcomes_csv;
use crate::server;
use crate::server::api::{self, SimulateRequest, SimulateResponse};

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INVALID_INPUT: i32 = 2;

/// Monte Carlo estimator for touch/hurt/save attack sequences
#[derive(Parser, Debug)]
#[command(name = "woundsim", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API
    Serve {
        /// Listen address; overrides WOUNDSIM_BIND
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Run a batch of trials and print the outcomes
    Simulate(SimulateArgs),
    /// Print the wound difficulty for a strength/endurance pair
    Difficulty {
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        strength: u32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        endurance: u32,
    },
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub strength: i64,
    #[arg(long, allow_negative_numbers = true)]
    pub endurance: i64,
    /// Dice thrown in the to-hit roll
    #[arg(long = "dice", allow_negative_numbers = true)]
    pub dice_number: i64,
    /// Minimum face counted as a hit (2-6)
    #[arg(long = "touch", allow_negative_numbers = true)]
    pub touch_difficulty: i64,
    /// Armor save threshold (0 disables)
    #[arg(long = "armor", default_value_t = 0, allow_negative_numbers = true)]
    pub armor_save: i64,
    /// Invulnerability save threshold (0 disables)
    #[arg(long = "invu", default_value_t = 0, allow_negative_numbers = true)]
    pub invu_save: i64,
    /// Number of trials (1-1000)
    #[arg(long = "runs", default_value_t = 1, allow_negative_numbers = true)]
    pub run_number: i64,
    /// Seed for a reproducible batch
    #[arg(long)]
    pub seed: Option<u64>,
    /// Draw touch and hurt dice on the shifted 2-7 faces
    #[arg(long)]
    pub legacy_faces: bool,
    /// Include per-stage counts for every trial in JSON output
    #[arg(long)]
    pub trace: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
    /// Worker threads; overrides WOUNDSIM_WORKERS
    #[arg(long)]
    pub workers: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
}

impl SimulateArgs {
    fn to_request(&self) -> SimulateRequest {
        SimulateRequest {
            strength: Some(self.strength),
            endurance: Some(self.endurance),
            dice_number: Some(self.dice_number),
            touch_difficulty: Some(self.touch_difficulty),
            armor_save: Some(self.armor_save),
            invu_save: Some(self.invu_save),
            run_number: Some(self.run_number),
            seed: self.seed,
            legacy_faces: self.legacy_faces,
            trace: self.trace,
        }
    }
}

pub fn run_with_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return err.exit_code();
        }
    };

    match cli.command {
        Command::Serve { bind } => handle_serve(bind),
        Command::Simulate(args) => handle_simulate(&args),
        Command::Difficulty {
            strength,
            endurance,
        } => {
            println!("{}", derive_difficulty(strength, endurance));
            EXIT_OK
        }
    }
}

/// Read by `serve` and `simulate` only; `difficulty` never touches the environment.
fn load_config() -> Option<AppConfig> {
    match AppConfig::from_env() {
        Ok(config) => Some(config),
        Err(err) => {
            eprintln!("configuration error: {err}");
            None
        }
    }
}

fn handle_serve(bind: Option<SocketAddr>) -> i32 {
    let Some(mut config) = load_config() else {
        return EXIT_FAILURE;
    };
    if let Some(addr) = bind {
        config.bind_addr = addr;
    }
    match server::run_server(&config) {
        Ok(()) => EXIT_OK,
        Err(err) => {
            eprintln!("server error: {err}");
            EXIT_FAILURE
        }
    }
}

fn handle_simulate(args: &SimulateArgs) -> i32 {
    let Some(config) = load_config() else {
        return EXIT_FAILURE;
    };
    let validated = match api::validate_request(&args.to_request()) {
        Ok(validated) => validated,
        Err(violations) => {
            eprintln!("validation failed: {} issue(s)", violations.len());
            for violation in violations {
                eprintln!("- {violation}");
            }
            return EXIT_INVALID_INPUT;
        }
    };

    let runner = BatchRunner {
        pool: WorkerPool::with_workers(args.workers.unwrap_or(config.workers)),
        parallel_threshold: config.parallel_threshold,
    };
    let response = match api::simulate(&validated, &runner) {
        Ok(response) => response,
        Err(err) => {
            eprintln!("simulation failed: {err}");
            return EXIT_FAILURE;
        }
    };

    let stdout = io::stdout();
    let written = match args.format {
        OutputFormat::Json => print_json(stdout.lock(), &response),
        OutputFormat::Table => print_table(stdout.lock(), &response),
        OutputFormat::Csv => {
            write_outcomes_csv(stdout.lock(), &response.results).map_err(WoundsimError::from)
        }
    };
    match written {
        Ok(()) => EXIT_OK,
        Err(err) => {
            eprintln!("failed to write simulation result: {err}");
            EXIT_FAILURE
        }
    }
}

fn print_json<W: Write>(mut out: W, response: &SimulateResponse) -> Result<()> {
    let payload = serde_json::to_string_pretty(response)?;
    writeln!(out, "{payload}")?;
    Ok(())
}

fn print_table<W: Write>(mut out: W, response: &SimulateResponse) -> Result<()> {
    let summary = &response.summary;
    let params = &response.params;
    writeln!(out, "runs\tseed\tdice\ttouch\thurt\tarmor\tinvu\tmean\tmin\tmax")?;
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.6}\t{}\t{}",
        summary.runs,
        response.seed,
        params.dice_number,
        params.touch_difficulty,
        params.hurt_difficulty,
        params.armor_save,
        params.invu_save,
        summary.mean,
        summary.min,
        summary.max
    )?;
    Ok(())
}
