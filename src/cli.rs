//! Command-line argument parsing for the Athena console.

use crate::config::SessionConfig;
use crate::output::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Athena interactive console.
#[derive(Parser, Debug)]
#[command(name = "athena")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Execute a statement in batch mode and exit
    #[arg(short = 'e', long, value_name = "STATEMENT")]
    pub execute: Option<String>,

    /// Output format [ALIGNED, TRUNCATE, VERTICAL, CSV, TSV, CSV_HEADER, TSV_HEADER]
    #[arg(long, value_name = "FORMAT")]
    pub output_format: Option<OutputFormat>,

    /// Default schema
    #[arg(long, visible_aliases = ["database", "db"], value_name = "SCHEMA")]
    pub schema: Option<String>,

    /// AWS profile
    #[arg(long, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// AWS region
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// S3 location for query results
    #[arg(long = "s3-bucket", visible_alias = "bucket", value_name = "BUCKET")]
    pub bucket: Option<String>,

    /// Use server-side encryption for query results
    #[arg(long = "server-side-encryption", visible_alias = "encryption")]
    pub encryption: bool,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Session settings given on the command line, without file or environment values.
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            schema: self.schema.clone(),
            output_format: self.output_format,
            profile: self.profile.clone(),
            region: self.region.clone(),
            result_location: self.bucket.clone(),
            encryption: self.encryption,
        }
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Returns the statement to run when in batch mode.
    pub fn batch_statement(&self) -> Option<&str> {
        self.execute.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    #[test]
    fn test_no_args_starts_shell() {
        let cli = parse_args(&["athena"]);
        assert!(cli.batch_statement().is_none());
        assert!(!cli.debug);
        assert!(!cli.encryption);
        assert_eq!(cli.output_format, None);
    }

    #[test]
    fn test_parse_batch_args() {
        let cli = parse_args(&[
            "athena",
            "--execute",
            "SELECT 1",
            "--output-format",
            "csv_header",
            "--schema",
            "sales",
        ]);

        assert_eq!(cli.batch_statement(), Some("SELECT 1"));
        assert_eq!(cli.output_format, Some(OutputFormat::CsvHeader));
        assert_eq!(cli.schema, Some("sales".to_string()));
    }

    #[test]
    fn test_schema_aliases() {
        let cli = parse_args(&["athena", "--database", "logs"]);
        assert_eq!(cli.schema, Some("logs".to_string()));

        let cli = parse_args(&["athena", "--db", "events"]);
        assert_eq!(cli.schema, Some("events".to_string()));
    }

    #[test]
    fn test_bucket_and_encryption_aliases() {
        let cli = parse_args(&["athena", "--bucket", "s3://out/", "--encryption"]);
        assert_eq!(cli.bucket, Some("s3://out/".to_string()));
        assert!(cli.encryption);

        let cli = parse_args(&[
            "athena",
            "--s3-bucket",
            "s3://other/",
            "--server-side-encryption",
        ]);
        assert_eq!(cli.bucket, Some("s3://other/".to_string()));
        assert!(cli.encryption);
    }

    #[test]
    fn test_invalid_output_format() {
        let result = Cli::try_parse_from(["athena", "--output-format", "json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_to_session_config() {
        let cli = parse_args(&[
            "athena",
            "--profile",
            "analytics",
            "--region",
            "eu-west-1",
            "--bucket",
            "s3://results/",
        ]);
        let session = cli.to_session_config();

        assert_eq!(session.profile, Some("analytics".to_string()));
        assert_eq!(session.region, Some("eu-west-1".to_string()));
        assert_eq!(session.result_location, Some("s3://results/".to_string()));
        assert_eq!(session.schema, None);
    }

    #[test]
    fn test_parse_config_and_log_paths() {
        let cli = parse_args(&[
            "athena",
            "--config",
            "/path/to/config.toml",
            "--log-file",
            "/tmp/athena.log",
        ]);
        assert_eq!(cli.config_path(), PathBuf::from("/path/to/config.toml"));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/athena.log")));
    }

    #[test]
    fn test_default_config_path() {
        let cli = parse_args(&["athena"]);
        assert_eq!(cli.config_path(), crate::config::Config::default_path());
    }
}
