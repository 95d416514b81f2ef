//! Command implementations

mod config;
mod query;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config_file = cli.config.as_deref();

    let result = match cli.command {
        Commands::Query(args) => query::execute(args, config_file, &output),
        Commands::Config(args) => config::execute(args, config_file, &output),
    };

    if let Err(e) = &result {
        output.error(format!("{:#}", e));
    }

    result
}
