pub mod toml_config;

pub use toml_config::WidgetConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "advice-board")]
#[command(about = "Random advice card for the terminal")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the advice API endpoint
    #[arg(long)]
    pub api_endpoint: Option<String>,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Render one advice and exit
    #[arg(long)]
    pub once: bool,

    /// Print the final view snapshot as JSON (requires --once)
    #[arg(long, requires = "once")]
    pub json: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔 (若有)，套用命令列覆蓋後驗證
    pub fn resolve(&self) -> Result<WidgetConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                WidgetConfig::from_file(path)?
            }
            None => WidgetConfig::default(),
        };

        if let Some(endpoint) = &self.api_endpoint {
            config.source.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.source.timeout_seconds = Some(timeout);
        }

        config.validate()?;
        Ok(config)
    }
}
