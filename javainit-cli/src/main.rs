//! javainit: init-style supervisor for a single JVM service.
//!
//! # Usage
//!
//! ```text
//! javainit [--lock] start    # launch unless already running
//! javainit [--lock] status   # 0 running, 1 stale pidfile, 3 no/unreadable pidfile
//! javainit [--lock] stop     # SIGTERM and wait up to 240 seconds
//! ```
//!
//! Paths are fixed relative to the working directory:
//! `service/bin/launcher-static.yml`, `var/conf/launcher-custom.yml`,
//! `var/log/startup.log` and `var/run/service.pid`.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use javainit_supervisor::{Supervisor, SupervisorConfig, EXIT_FAILURE};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "javainit",
    version,
    about = "Start, stop and check a pidfile-tracked JVM service",
    long_about = None,
)]
struct Cli {
    /// Hold an exclusive advisory lock next to the pidfile while starting or stopping.
    #[arg(long, global = true)]
    lock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch the service in the background unless it is already running.
    Start,

    /// Exit 0 if the service is running, 1 if the pidfile is stale, 3 if there is no pidfile.
    Status,

    /// Send SIGTERM and wait for the service to exit.
    Stop,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let supervisor = Supervisor::new(SupervisorConfig {
        lock: cli.lock,
        ..SupervisorConfig::default()
    });

    let result = match cli.command {
        Commands::Start => commands::start::run(&supervisor),
        Commands::Status => Ok(commands::status::run(&supervisor)),
        Commands::Stop => Ok(commands::stop::run(&supervisor)),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Log to stderr, quiet by default so successful verbs print nothing.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
