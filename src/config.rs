use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Keyword is required and must not be empty")]
    MissingKeyword,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub region: String,
    /// Trigger keyword, stored lowercased.
    pub keyword: String,
    pub connect: ConnectConfig,
    pub pinpoint: PinpointConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8093,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectConfig {
    pub contact_flow_id: String,
    pub instance_id: String,
    pub queue_id: String,
    /// Number actually dialed for the hand-over leg; the caller's own number
    /// rides along in the contact attributes.
    pub fallback_number: String,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PinpointConfig {
    pub application_id: String,
    pub endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            region: "us-east-1".to_string(),
            keyword: String::new(),
            connect: ConnectConfig::default(),
            pinpoint: PinpointConfig::default(),
        }
    }
}

impl Config {
    pub fn connect_endpoint(&self) -> String {
        self.connect
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://connect.{}.amazonaws.com", self.region))
    }

    pub fn pinpoint_endpoint(&self) -> String {
        self.pinpoint
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://pinpoint.{}.amazonaws.com", self.region))
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn resolve_config_path() -> PathBuf {
    env::var("CALLBACK_BRIDGE_CONFIG")
        .ok()
        .map(PathBuf::from)
        .unwrap_or_else(|| expand_tilde("~/.callback-bridge/callback-bridge.json"))
}

fn env_nonempty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Reads the optional JSON config file, then applies environment overrides.
/// The environment names match the deployment contract verbatim.
pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = resolve_config_path();

    let mut cfg = Config::default();

    if config_path.exists() {
        if let Ok(raw) = fs::read_to_string(&config_path) {
            if let Ok(file_cfg) = serde_json::from_str::<Config>(&raw) {
                cfg = file_cfg;
            }
        }
    }

    if let Some(region) = env_nonempty("region") {
        cfg.region = region;
    }

    if let Some(flow_id) = env_nonempty("ConnectContactFlowId") {
        cfg.connect.contact_flow_id = flow_id;
    }

    if let Some(instance_id) = env_nonempty("ConnectInstanceId") {
        cfg.connect.instance_id = instance_id;
    }

    if let Some(queue_id) = env_nonempty("ConnectQueueId") {
        cfg.connect.queue_id = queue_id;
    }

    if let Some(app_id) = env_nonempty("PinpointApplicationId") {
        cfg.pinpoint.application_id = app_id;
    }

    if let Some(keyword) = env_nonempty("Keyword") {
        cfg.keyword = keyword;
    }

    if let Some(number) = env_nonempty("FakeNumber") {
        cfg.connect.fallback_number = number;
    }

    if let Some(endpoint) = env_nonempty("CONNECT_ENDPOINT") {
        cfg.connect.endpoint = Some(endpoint);
    }

    if let Some(endpoint) = env_nonempty("PINPOINT_ENDPOINT") {
        cfg.pinpoint.endpoint = Some(endpoint);
    }

    if cfg.keyword.trim().is_empty() {
        return Err(ConfigError::MissingKeyword);
    }
    cfg.keyword = cfg.keyword.trim().to_lowercase();

    Ok(cfg)
}
