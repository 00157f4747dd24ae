use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::error::ConfigError;

/// Local dev server that fronts the reply model
const DEFAULT_REPLY_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Rows per dashboard page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Seconds between emotion samples during a live session
    #[serde(default = "default_sample_interval")]
    pub sample_interval_secs: u64,

    #[serde(default)]
    pub reply: ReplyConfig,

    #[serde(default)]
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            data_dir: default_data_dir(),
            page_size: default_page_size(),
            sample_interval_secs: default_sample_interval(),
            reply: ReplyConfig::default(),
            debug: false,
        }
    }
}

fn default_working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_data_dir() -> String {
    ".companion".into()
}

fn default_page_size() -> usize {
    10
}

fn default_sample_interval() -> u64 {
    3
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyConfig {
    #[serde(default = "default_reply_url")]
    pub base_url: String,

    #[serde(default = "default_reply_timeout")]
    pub timeout_secs: u64,
}

fn default_reply_url() -> String {
    DEFAULT_REPLY_URL.into()
}

fn default_reply_timeout() -> u64 {
    30
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            base_url: default_reply_url(),
            timeout_secs: default_reply_timeout(),
        }
    }
}

pub fn load_config(working_dir: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    let wd = working_dir.unwrap_or_else(default_working_dir);

    let mut config = AppConfig {
        working_dir: wd.clone(),
        ..Default::default()
    };

    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("companion").join("config.json");
        if global_path.exists() {
            merge_config(&mut config, read_config_file(&global_path)?);
        }
    }

    let local_path = wd.join("companion.json");
    if local_path.exists() {
        merge_config(&mut config, read_config_file(&local_path)?);
    }

    apply_env(&mut config);

    if config.page_size == 0 {
        return Err(ConfigError::Invalid("page_size must be at least 1".into()));
    }

    Ok(config)
}

fn read_config_file(path: &std::path::Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::File(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()))
}

fn merge_config(base: &mut AppConfig, overlay: AppConfig) {
    if overlay.data_dir != default_data_dir() {
        base.data_dir = overlay.data_dir;
    }
    if overlay.page_size != default_page_size() {
        base.page_size = overlay.page_size;
    }
    if overlay.sample_interval_secs != default_sample_interval() {
        base.sample_interval_secs = overlay.sample_interval_secs;
    }
    if overlay.reply.base_url != default_reply_url() {
        base.reply.base_url = overlay.reply.base_url;
    }
    if overlay.reply.timeout_secs != default_reply_timeout() {
        base.reply.timeout_secs = overlay.reply.timeout_secs;
    }
    if overlay.debug {
        base.debug = true;
    }
}

fn apply_env(config: &mut AppConfig) {
    if let Ok(url) = std::env::var("COMPANION_REPLY_URL") {
        if !url.is_empty() {
            config.reply.base_url = url;
        }
    }
    if let Ok(dir) = std::env::var("COMPANION_DATA_DIR") {
        if !dir.is_empty() {
            config.data_dir = dir;
        }
    }
}

impl AppConfig {
    pub fn data_path(&self) -> PathBuf {
        self.working_dir.join(&self.data_dir)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.sample_interval_secs.max(1))
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.reply.timeout_secs)
    }
}
