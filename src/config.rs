use crate::domain::SQUAD_SIZE;
use crate::engine::{CompositionRules, DEFAULT_TEAM_CAP};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    /// Most players a squad may take from one real-world team.
    pub squad_team_cap: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let squad_team_cap = match env_map.get("SQUAD_TEAM_CAP") {
            None => DEFAULT_TEAM_CAP,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(cap) if (1..=SQUAD_SIZE).contains(&cap) => cap,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "SQUAD_TEAM_CAP".to_string(),
                        format!("must be an integer between 1 and {}, got {}", SQUAD_SIZE, raw),
                    ))
                }
            },
        };

        Ok(Config {
            port,
            database_path,
            squad_team_cap,
        })
    }

    /// Composition rules with the configured team cap.
    pub fn composition_rules(&self) -> CompositionRules {
        CompositionRules::default().with_team_cap(self.squad_team_cap)
    }
}
