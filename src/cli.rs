use clap::{Parser, Subcommand};

use crate::clipboard::Backend;

#[derive(Parser)]
#[command(name = "clipwatchd", about = "Clipboard change monitor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Watch the clipboard and print every change
    Watch {
        /// Clipboard backend
        #[arg(long, value_enum, default_value_t = Backend::Arboard)]
        backend: Backend,

        /// Shortest poll interval in milliseconds
        #[arg(long, default_value_t = 100)]
        min_wait: u64,

        /// Longest poll interval in milliseconds
        #[arg(long, default_value_t = 3000)]
        max_wait: u64,

        /// Interval increase after a failed read, in milliseconds
        #[arg(long, default_value_t = 100)]
        backoff_step: u64,

        /// Interval decrease after a successful read, in milliseconds
        #[arg(long, default_value_t = 10)]
        recovery_step: u64,

        /// Ignore the first change after each processing cycle ends
        #[arg(long)]
        auto_copy: bool,

        /// Print notifications as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Read the clipboard once and describe its content
    Probe {
        /// Clipboard backend
        #[arg(long, value_enum, default_value_t = Backend::Arboard)]
        backend: Backend,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_defaults() {
        let cli = Cli::try_parse_from(["clipwatchd", "watch"]).unwrap();
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
                assert_eq!(backend, Backend::Arboard);
                assert_eq!((min_wait, max_wait), (100, 3000));
                assert_eq!((backoff_step, recovery_step), (100, 10));
                assert!(!auto_copy);
                assert!(!json);
            }
            Command::Probe { .. } => panic!("expected watch"),
        }
    }

    #[test]
    fn watch_flags() {
        let cli = Cli::try_parse_from([
            "clipwatchd",
            "watch",
            "--backend",
            "xclip",
            "--min-wait",
            "50",
            "--auto-copy",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Watch {
                backend,
                min_wait,
                auto_copy,
                json,
                ..
            } => {
                assert_eq!(backend, Backend::Xclip);
                assert_eq!(min_wait, 50);
                assert!(auto_copy);
                assert!(json);
            }
            Command::Probe { .. } => panic!("expected watch"),
        }
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["clipwatchd", "probe", "--backend", "wayland"]).is_err());
    }
}
