use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Geoservices - Feature queries over GeoJSON
#[derive(Parser, Debug)]
#[command(name = "geoservices")]
#[command(about = "Answer Geoservices feature queries over GeoJSON datasets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./geoservices.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a feature query against a dataset
    Query(QueryArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// GeoJSON FeatureCollection file, optionally with provider members
    pub dataset: PathBuf,

    /// Request parameter as key=value (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Configuration overrides shared by every command
#[derive(Args, Debug, Default)]
pub struct OverrideArgs {
    /// Identifier field name
    #[arg(long)]
    pub id_field: Option<String>,

    /// Length reported for string statistics fields
    #[arg(long)]
    pub string_field_length: Option<u32>,

    /// Upper bound on features per response
    #[arg(long)]
    pub max_record_count: Option<usize>,
}

/// Split `key=value` at the first `=`
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid key=value: no '=' found in '{}'", s))?;

    if key.trim().is_empty() {
        return Err(format!("invalid key=value: empty key in '{}'", s));
    }

    Ok((key.trim().to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("where=name = 'a'").unwrap(),
            ("where".to_string(), "name = 'a'".to_string())
        );
        assert_eq!(parse_key_val("f=").unwrap(), ("f".to_string(), String::new()));
        assert!(parse_key_val("returnCountOnly").is_err());
        assert!(parse_key_val("=1").is_err());
    }

    #[test]
    fn test_query_args() {
        let cli = Cli::parse_from([
            "geoservices",
            "query",
            "parks.geojson",
            "-p",
            "returnCountOnly=true",
            "--param",
            "where=acres > 10",
            "--id-field",
            "FID",
            "--json",
        ]);

        assert!(cli.json);
        match cli.command {
            Commands::Query(args) => {
                assert_eq!(args.params.len(), 2);
                assert_eq!(args.overrides.id_field.as_deref(), Some("FID"));
            }
            other => panic!("expected query command, got {:?}", other),
        }
    }
}
