use crate::config::toml_config::SiteConfig;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::Parser;
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "product-site")]
#[command(about = "Plan catalog and review board API")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "site.toml")]
    pub config: String,

    /// Override the listen address from the config file
    #[arg(long)]
    pub bind: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CliConfig {
    /// Loads the config file (defaults when it does not exist) and applies CLI overrides.
    pub fn load(&self) -> Result<SiteConfig> {
        let mut config = if Path::new(&self.config).exists() {
            SiteConfig::from_file(&self.config)?
        } else {
            SiteConfig::default()
        };

        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if self.verbose {
            config.logging.verbose = true;
        }
        if self.json_logs {
            config.logging.format = LogFormat::Json;
        }

        Ok(config)
    }
}
