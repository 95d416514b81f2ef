//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use geoservices_core::config::{parse_id_field, CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

use crate::cli::OverrideArgs;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "geoservices.toml";

/// Load layered configuration: defaults, file, environment, then CLI overrides
pub fn load_config(explicit: Option<&Path>, overrides: &OverrideArgs) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_path(explicit) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(cli_overrides(overrides)?);
    Ok(config)
}

/// An explicit path must exist; the default file is optional
fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

fn cli_overrides(args: &OverrideArgs) -> Result<CliConfigOverrides> {
    let id_field = args.id_field.as_deref().map(parse_id_field).transpose()?;

    if args.max_record_count == Some(0) {
        anyhow::bail!("--max-record-count must be greater than zero");
    }

    Ok(CliConfigOverrides {
        id_field,
        string_field_length: args.string_field_length,
        max_record_count: args.max_record_count,
    })
}
