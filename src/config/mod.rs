pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

pub use toml_config::TomlConfig;

/// Command-line overrides. Every flag is optional and wins over the value
/// loaded from `--config`.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "embassy-watch")]
#[command(about = "Probe French embassy websites and render a static status map")]
pub struct CliConfig {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Base URL used to resolve relative data sources
    #[arg(long)]
    pub base_url: Option<String>,

    /// Embassy directory URL or path
    #[arg(long)]
    pub directory_url: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long)]
    pub max_attempts: Option<u32>,

    #[arg(long)]
    pub concurrent_probes: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入配置檔 (若有) 並套用命令列覆寫
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(base_url) = &self.base_url {
            config.sources.base_url = Some(base_url.clone());
        }
        if let Some(directory) = &self.directory_url {
            config.sources.directory = directory.clone();
        }
        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
        }
        if let Some(max_attempts) = self.max_attempts {
            config.fetch.max_attempts = max_attempts;
        }
        if let Some(concurrent_probes) = self.concurrent_probes {
            config.fetch.concurrent_probes = concurrent_probes;
        }

        Ok(config)
    }
}
