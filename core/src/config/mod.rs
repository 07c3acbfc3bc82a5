use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const WAYFINDER_DIR: &str = ".wayfinder";
const API_KEY_ENV: &str = "WAYFINDER_API_KEY";

pub const DEFAULT_MAX_ITERATIONS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Credential forwarded to the location gateway.
    pub api_key: String,
    /// Caller identity, used for log attribution only.
    pub user_id: String,
    pub gateway_url: Option<String>,
    pub max_iterations: usize,
    pub verbose: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            api_key: String::new(),
            user_id: "default".to_string(),
            gateway_url: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            verbose: false,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            anyhow::bail!("max_iterations must be at least 1");
        }
        Ok(())
    }

    /// The environment variable wins over the configured key.
    pub fn resolve_api_key(&self) -> String {
        std::env::var(API_KEY_ENV).unwrap_or_else(|_| self.api_key.clone())
    }
}

pub fn get_wayfinder_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(WAYFINDER_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_wayfinder_dir().join("config.toml")
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}

pub fn load_config() -> Result<AgentConfig> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(path: &Path) -> Result<AgentConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!(
                "Config file not found at {}. Run 'wayfinder config --save' to create one.",
                path.display()
            )
        } else {
            anyhow::anyhow!("Failed to read config from {}: {}", path.display(), e)
        }
    })?;

    let config: AgentConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", path.display()))?;
    config.validate()?;

    Ok(config)
}

pub fn save_config(config: &AgentConfig) -> Result<()> {
    let dir = get_wayfinder_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory at {}", dir.display()))?;
    }
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &AgentConfig, path: &Path) -> Result<()> {
    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}
