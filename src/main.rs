mod bus;
mod cli;
mod clipboard;
mod daemon;
mod filter;
mod monitor;
mod settings;

use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

use daemon::WatchOptions;
use daemon::output::OutputFormat;
use monitor::MonitorConfig;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries notifications only.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Watch {
            backend,
            min_wait,
            max_wait,
            backoff_step,
            recovery_step,
            auto_copy,
            json,
        } => {
            let opts = WatchOptions {
                backend,
                config: MonitorConfig::from_millis(min_wait, max_wait, backoff_step, recovery_step),
                auto_copy,
                format: if json {
                    OutputFormat::Json
                } else {
                    OutputFormat::Plain
                },
            };
            if let Err(e) = daemon::run(opts).await {
                tracing::error!(error = %e, "watch failed");
                eprintln!("clipwatchd watch: {e}");
                std::process::exit(1);
            }
        }
        Command::Probe { backend } => {
            if let Err(e) = daemon::probe(backend) {
                tracing::error!(error = %e, "probe failed");
                eprintln!("clipwatchd probe: {e}");
                std::process::exit(1);
            }
        }
    }
}
