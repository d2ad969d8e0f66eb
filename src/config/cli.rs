use crate::adapters::pubchem::DEFAULT_BASE_URL;
use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "pubchem-proxy")]
#[command(about = "HTTP proxy that augments compound lists with PubChem properties")]
pub struct CliConfig {
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub bind_addr: String,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, default_value = "10", help = "Timeout for each upstream request")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = "1000", help = "LRU response cache size, 0 disables it")]
    pub cache_capacity: usize,

    #[arg(long, default_value = "5")]
    pub concurrent_requests: usize,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 若有指定 `--config`，改用 TOML 設定檔
    pub fn load_toml(&self) -> Result<Option<TomlConfig>> {
        self.config.as_deref().map(TomlConfig::from_file).transpose()
    }

    /// 與 `--config` 同時給定、但會被設定檔取代的旗標
    pub fn ignored_with_config(&self) -> Vec<&'static str> {
        if self.config.is_none() {
            return Vec::new();
        }
        let defaults = Self::parse_from(["pubchem-proxy"]);
        let mut ignored = Vec::new();
        if self.bind_addr != defaults.bind_addr {
            ignored.push("--bind-addr");
        }
        if self.base_url != defaults.base_url {
            ignored.push("--base-url");
        }
        if self.timeout_seconds != defaults.timeout_seconds {
            ignored.push("--timeout-seconds");
        }
        if self.cache_capacity != defaults.cache_capacity {
            ignored.push("--cache-capacity");
        }
        if self.concurrent_requests != defaults.concurrent_requests {
            ignored.push("--concurrent-requests");
        }
        ignored
    }
}

impl ConfigProvider for CliConfig {
    fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_socket_addr("bind_addr", &self.bind_addr)?;
        validate_url("base_url", &self.base_url)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 300)?;
        validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        if let Some(path) = &self.config {
            validate_non_empty_string("config", path)?;
        }
        Ok(())
    }
}
