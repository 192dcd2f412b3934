#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::rut::Strictness;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;
#[cfg(feature = "cli")]
use self::toml_config::IntakeConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "rut-intake")]
#[command(about = "Validate Chilean contact data and send it to a CRM webhook")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Webhook URL, overrides the config file
    #[arg(long, global = true)]
    pub webhook_url: Option<String>,

    /// Business unit the record is filed under, overrides the config file
    #[arg(long, global = true)]
    pub business_unit: Option<String>,

    /// RUT strictness: standard or strict
    #[arg(long, global = true)]
    pub strictness: Option<Strictness>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Clean, format and validate a RUT
    Check { rut: String },
    /// Print a RUT as body-check
    Format { rut: String },
    /// Validate a contact and post it to the webhook
    Submit(cli::SubmitArgs),
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// File configuration with command line overrides applied. Not validated.
    pub fn load(&self) -> Result<IntakeConfig> {
        let mut config = match &self.config {
            Some(path) => IntakeConfig::from_file(path)?,
            None => IntakeConfig::default(),
        };

        if let Some(url) = &self.webhook_url {
            config.webhook.url = url.clone();
        }
        if let Some(unit) = &self.business_unit {
            config.form.business_unit = Some(unit.clone());
        }
        if let Some(strictness) = self.strictness {
            config.form.strictness = Some(strictness);
        }
        if let Some(timeout) = self.timeout {
            config.webhook.timeout_seconds = Some(timeout);
        }

        Ok(config)
    }
}
