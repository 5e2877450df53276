use serde::{Deserialize, Serialize};

use crate::configs::*;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
  #[serde(default)]
  pub sources: SourcesConfig,
  #[serde(default)]
  pub session: SessionConfig,
  #[serde(default)]
  pub flosports: Option<FloSportsConfig>,
  pub logging: Option<LoggingConfig>,
}

/// Where the browser-exported session cookies live.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SessionConfig {
  pub cookies_file: Option<String>,
}

use crate::common::types::AnyResult;

impl Config {
  pub fn load() -> AnyResult<Self> {
    let config_path = if std::path::Path::new("config.toml").exists() {
      "config.toml"
    } else if std::path::Path::new("config.default.toml").exists() {
      "config.default.toml"
    } else {
      // No config on disk: run on defaults, everything else comes from CLI flags.
      return Ok(Self::default());
    };

    println!("Loading configuration from: {}", config_path);

    let config_str = std::fs::read_to_string(config_path)?;
    if config_str.is_empty() {
      return Err(format!("{} is empty", config_path).into());
    }

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
  }
}
