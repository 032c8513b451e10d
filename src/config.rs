use crate::ui::Timeframe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_COIN: &str = "bitcoin";
pub const DEFAULT_VS_CURRENCY: &str = "usd";
pub const DEFAULT_LOG_FILE: &str = "btcchart.log";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub coin: String,
    pub vs_currency: String,
    pub timeframe: Timeframe,
    pub dark_mode: bool,
    pub frame_interval_ms: u64,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            coin: DEFAULT_COIN.to_string(),
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            timeframe: Timeframe::OneMonth,
            dark_mode: false,
            frame_interval_ms: 100,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    pub fn sanitized(mut self) -> Self {
        if self.api_base.trim().is_empty() {
            self.api_base = DEFAULT_API_BASE.to_string();
        }

        if self.coin.trim().is_empty() {
            self.coin = DEFAULT_COIN.to_string();
        }

        if self.vs_currency.trim().is_empty() {
            self.vs_currency = DEFAULT_VS_CURRENCY.to_string();
        }

        if self.log_file.as_os_str().is_empty() {
            self.log_file = PathBuf::from(DEFAULT_LOG_FILE);
        }

        self.frame_interval_ms = self.frame_interval_ms.clamp(16, 1000);
        self
    }
}

pub fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".btcchart.json")
}

pub fn load_config(path: &Path) -> AppConfig {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return AppConfig::default(),
    };

    serde_json::from_str::<AppConfig>(&contents)
        .map(|cfg| cfg.sanitized())
        .unwrap_or_default()
}
