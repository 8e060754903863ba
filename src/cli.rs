//! Clap adapter for the `polygen` binary.
//!
//! Compiled only with the `clap` Cargo feature (on by default). The only
//! bridge to the core is [`Cli::into_action()`], which converts parsed
//! arguments into an [`Action`](crate::Action) for [`run`](crate::ops::run).

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::types::Action;

/// Generate polymorphic JSON codecs for Rust enums.
#[derive(Debug, Parser)]
#[command(name = "polygen", version, about)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the generated source for every configured type.
    Generate {
        /// Print to stdout instead of writing files.
        #[arg(long)]
        stdout: bool,
    },
    /// Validate the configuration without writing anything.
    Check,
    /// Print the JSON Schema of the configuration file.
    Schema,
}

impl Cli {
    /// Bare `polygen` is `polygen generate`.
    pub fn into_action(self) -> Action {
        let config = self.config;
        match self.command {
            None => Action::Generate {
                config,
                stdout: false,
            },
            Some(Command::Generate { stdout }) => Action::Generate { config, stdout },
            Some(Command::Check) => Action::Check { config },
            Some(Command::Schema) => Action::Schema,
        }
    }

    /// Default `tracing` filter directive for the verbosity flag.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "polygen=warn",
            1 => "polygen=info",
            _ => "polygen=debug",
        }
    }
}
