use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::ConsoleError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_console_title")]
    pub console_title: String,
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    pub operator: OperatorConfig,
    #[serde(default = "default_health_interval")]
    pub health_interval_secs: u64,
    #[serde(default = "default_sse_interval")]
    pub sse_interval_secs: u64,
    #[serde(default = "default_debounce_ms")]
    pub editor_debounce_ms: u64,
    #[serde(default)]
    pub table: TableConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperatorConfig {
    pub base_url: String,
    /// Pre-issued session cookie forwarded verbatim to the backend.
    #[serde(default)]
    pub session_cookie: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_container_width")]
    pub container_width: f64,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            container_width: default_container_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

fn default_console_title() -> String {
    "Operator Console".to_string()
}

fn default_listen_port() -> u16 {
    9090
}

fn default_health_interval() -> u64 {
    15
}

fn default_sse_interval() -> u64 {
    5
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_container_width() -> f64 {
    1200.0
}

fn default_viewport_height() -> u32 {
    600
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConsoleError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ConsoleError::Config(format!("reading config {}: {}", path.display(), e)))?;
        Self::parse(&data)
    }

    pub fn parse(data: &str) -> Result<Self, ConsoleError> {
        let mut cfg: Config = serde_yaml::from_str(data)
            .map_err(|e| ConsoleError::Config(format!("parsing config: {}", e)))?;

        let base = cfg.operator.base_url.trim().trim_end_matches('/').to_string();
        if base.is_empty() {
            return Err(ConsoleError::Config(
                "operator.base_url must be configured".to_string(),
            ));
        }
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(ConsoleError::Config(format!(
                "operator.base_url {:?} must start with http:// or https://",
                base
            )));
        }
        cfg.operator.base_url = base;

        if cfg.health_interval_secs == 0 {
            cfg.health_interval_secs = default_health_interval();
        }
        if cfg.sse_interval_secs == 0 {
            cfg.sse_interval_secs = default_sse_interval();
        }

        Ok(cfg)
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.listen_port)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs)
    }

    pub fn sse_interval(&self) -> Duration {
        Duration::from_secs(self.sse_interval_secs)
    }

    pub fn editor_debounce(&self) -> Duration {
        Duration::from_millis(self.editor_debounce_ms)
    }
}
