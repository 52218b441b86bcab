//! Command-line interface parsing for skygaze
//!
//! This module handles parsing of CLI arguments using clap: an optional
//! free-text place query that pre-fills the search on launch, and a switch
//! to turn off the periodic background refresh.

use clap::Parser;
use thiserror::Error;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// A query was given but contained nothing searchable
    #[error("The place query is empty")]
    EmptyQuery,
}

/// skygaze - Night-sky observation conditions in the terminal
#[derive(Parser, Debug)]
#[command(name = "skygaze")]
#[command(about = "Check cloud cover, seeing, and tonight's observation window for any place")]
#[command(version)]
pub struct Cli {
    /// Place to search for on launch (words are joined)
    ///
    /// Examples:
    ///   skygaze                  # Open on the search screen
    ///   skygaze brest            # Search for "brest" right away
    ///   skygaze san sebastian    # Multi-word queries need no quotes
    #[arg(value_name = "PLACE")]
    pub query: Vec<String>,

    /// Disable the periodic forecast refresh
    #[arg(long)]
    pub no_refresh: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Query to run as soon as the app starts, if one was given
    pub initial_query: Option<String>,
    /// Whether the background refresh ticker runs
    pub auto_refresh: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            initial_query: None,
            auto_refresh: true,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the query is only whitespace
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_query = if cli.query.is_empty() {
            None
        } else {
            let joined = cli.query.join(" ");
            let trimmed = joined.trim();
            if trimmed.is_empty() {
                return Err(CliError::EmptyQuery);
            }
            Some(trimmed.to_string())
        };

        Ok(StartupConfig {
            initial_query,
            auto_refresh: !cli.no_refresh,
        })
    }
}
