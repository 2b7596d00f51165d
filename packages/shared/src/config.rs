use std::env;
use std::fmt;

pub const DEFAULT_VALORANT_API_BASE_URL: &str = "https://api.henrikdev.xyz";
pub const DEFAULT_VALORANT_REGION: &str = "ap";

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    Missing(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => {
                write!(f, "{} environment variable must be set", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn required<F>(lookup: &F, name: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConfigError::Missing(name.to_string()))
}

/// Reads a single required variable; empty values count as missing.
pub fn required_env(name: &str) -> Result<String, ConfigError> {
    required(&|name: &str| env::var(name).ok(), name)
}

/// Settings for the upstream Valorant API.
#[derive(Debug, Clone, PartialEq)]
pub struct ValorantApiConfig {
    /// Absent keys are reported per request rather than at start-up.
    pub api_key: Option<String>,
    pub base_url: String,
    pub region: String,
}

impl ValorantApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&|name: &str| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|value| !value.is_empty());
        ValorantApiConfig {
            api_key: optional("VALORANT_API_KEY"),
            base_url: optional("VALORANT_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_VALORANT_API_BASE_URL.to_string()),
            region: optional("VALORANT_REGION")
                .unwrap_or_else(|| DEFAULT_VALORANT_REGION.to_string()),
        }
    }
}

/// Runtime configuration of the HTTP API.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub players_table: String,
    pub chats_table: String,
    pub messages_table: String,
    pub jwt_secret: String,
    pub valorant: ValorantApiConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(AppConfig {
            players_table: required(&lookup, "PLAYERS_TABLE")?,
            chats_table: required(&lookup, "CHATS_TABLE")?,
            messages_table: required(&lookup, "MESSAGES_TABLE")?,
            jwt_secret: required(&lookup, "JWT_SECRET")?,
            valorant: ValorantApiConfig::from_lookup(&lookup),
        })
    }
}

pub async fn dynamodb_client() -> aws_sdk_dynamodb::Client {
    let config = aws_config::load_from_env().await;
    aws_sdk_dynamodb::Client::new(&config)
}
