//! # emsim CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// emsim: validate electromagnetic simulation configuration files.
#[derive(Parser, Debug)]
#[command(name = "emsim", version, about)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate one or more configuration files.
    Validate(emsim_cli::validate::ValidateArgs),
    /// Print the validated configuration of a file as JSON.
    Dump(emsim_cli::dump::DumpArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Commands::Validate(args) => {
            let report = emsim_cli::validate::run_validate(&args, &mut stdout)?;
            if report.failed > 0 {
                anyhow::bail!(
                    "{} of {} configuration file(s) failed validation",
                    report.failed,
                    report.total()
                );
            }
        }
        Commands::Dump(args) => emsim_cli::dump::run_dump(&args, &mut stdout)?,
    }

    Ok(())
}
