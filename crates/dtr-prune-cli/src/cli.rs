use std::path::PathBuf;

use clap::Parser;
use dtr_prune::Config;

use crate::error::CliResult;
use crate::output::OutputFormat;

/// Remove Docker Trusted Registry images that are older than n days based on
/// the timestamp in their tags.
#[derive(Parser, Debug)]
#[command(name = "dtr-prune")]
#[command(version)]
pub struct Cli {
    #[clap(long, short, help = "(required) DTR namespace (e.g., cs)")]
    pub namespace: String,

    #[clap(
        long,
        short = 'a',
        value_name = "DAYS",
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Maximum age in days (default = 90)"
    )]
    pub expiration: Option<u32>,

    #[clap(
        long,
        short,
        help = "Prune the images (defaults to false, i.e. a dry run)"
    )]
    pub prune: bool,

    #[clap(long, short = 'c', help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[clap(long, help = "Registry hostname (default = dtr.cucloud.net)")]
    pub hostname: Option<String>,

    #[clap(long, help = "chrono format of the tag timestamp (default = %m%d%Y-%H%M%S)")]
    pub format: Option<String>,

    #[clap(long, short, help = "Output in JSON format")]
    pub json: bool,

    #[clap(long, short, help = "Enable debug logging")]
    pub verbose: bool,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Table
        }
    }

    /// Default tracing filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "info,dtr_prune=debug"
        } else {
            "warn,dtr_prune=info"
        }
    }

    /// Apply command-line overrides on top of a loaded config.
    pub fn apply_overrides(&self, mut config: Config) -> CliResult<Config> {
        if let Some(days) = self.expiration {
            config.retention.expiration_age_days = days;
        }
        if let Some(format) = &self.format {
            config.retention.datetime_format = format.clone();
        }
        if let Some(hostname) = &self.hostname {
            config.registry.hostname = hostname.clone();
        }
        config.validate()?;
        Ok(config)
    }

    /// Load the config file (or defaults) and apply overrides.
    pub fn resolve_config(&self) -> CliResult<Config> {
        let config = Config::load(self.config.as_deref())?;
        self.apply_overrides(config)
    }
}
