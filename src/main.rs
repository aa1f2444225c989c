use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;
use woundsim::cli;
use woundsim::config::DEFAULT_LOG_FILTER;

fn main() -> ExitCode {
    // Logs go to stderr so simulate output on stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let code = cli::run_with_args(env::args_os());
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
