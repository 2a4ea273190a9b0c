use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config;

/// Browse the PokeAPI catalog as an infinitely scrolling card grid
#[derive(Debug, Parser)]
#[command(name = "dexgrid", version, about)]
pub struct Cli {
    /// Config file (defaults to ~/.config/dexgrid/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// API root, e.g. https://pokeapi.co/api/v2
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// Entries per page
    #[arg(long, global = true)]
    pub page_size: Option<usize>,

    /// Write logs here (defaults to stderr for `dump`, and to the cache
    /// directory while the TUI owns the terminal)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch pages without the TUI and print one JSON record per line
    Dump {
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: usize,
    },
}

/// Where the fmt layer writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Stderr,
    File(PathBuf),
    /// No writable location and stderr belongs to the TUI
    Off,
}

impl Cli {
    pub fn log_sink(&self) -> LogSink {
        if let Some(path) = &self.log_file {
            return LogSink::File(path.clone());
        }
        match self.command {
            Some(Command::Dump { .. }) => LogSink::Stderr,
            None => config::log_path().map_or(LogSink::Off, LogSink::File),
        }
    }
}
