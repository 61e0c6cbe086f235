#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::report::ReportFormat;
#[cfg(feature = "cli")]
use crate::domain::model::Service;
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cred-check", version)]
#[command(about = "Validate third-party API credentials with one live request each")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[arg(long, global = true, default_value = "text")]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    #[arg(long, global = true)]
    pub concurrency: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check a single credential
    Check(CheckArgs),
    /// Check every credential listed in a TOML file
    Batch(BatchArgs),
    /// Check credentials found by TruffleHog (ND-JSON output)
    Findings(FindingsArgs),
}

#[cfg(feature = "cli")]
#[derive(Clone, Args)]
pub struct CheckArgs {
    /// zoho, aws, stripe, npm, cloudflare or github
    pub service: Service,

    /// Token, key or (for Zoho) refresh token
    #[arg(long, env = "CRED_CHECK_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    #[arg(long, env = "ZOHO_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    #[arg(long, env = "ZOHO_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key_id: Option<String>,

    #[arg(long, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<String>,

    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Override the service's API base URL
    #[arg(long)]
    pub endpoint: Option<String>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    #[arg(short, long, default_value = "credentials.toml")]
    pub config: PathBuf,

    /// Validate entries and show planned requests without sending them
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct FindingsArgs {
    #[arg(short, long)]
    pub input: PathBuf,

    /// Only check these services
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<Service>,

    /// Optional TOML file providing [http] and [endpoints]
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
