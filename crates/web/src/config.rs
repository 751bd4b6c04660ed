use anyhow::{Context, Result};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub api_keys: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            database_max_connections: parse_max_connections(
                std::env::var("DATABASE_MAX_CONNECTIONS").ok().as_deref(),
            )?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
        })
    }
}

fn parse_max_connections(value: Option<&str>) -> Result<u32> {
    match value {
        None => Ok(DEFAULT_MAX_CONNECTIONS),
        Some(raw) => raw
            .trim()
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a positive number"),
    }
}
