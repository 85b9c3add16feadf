use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use varguard_cli::{run_and_render, Args};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(err) => {
            eprintln!("error: cannot determine working directory: {err}");
            return ExitCode::from(2);
        }
    };

    let mut stdout = std::io::stdout().lock();
    match run_and_render(&args, &cwd, &mut stdout).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
