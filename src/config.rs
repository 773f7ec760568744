use dotenvy::dotenv;
use std::env;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// PostgreSQL connection string. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub cors_allow_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let port = parse_var("PORT", "u16 number", 3000)?;
        let max_connections = parse_var("DATABASE_MAX_CONNECTIONS", "u32 number", 5)?;

        Ok(Self {
            host: non_empty_var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            database_url: non_empty_var("DATABASE_URL"),
            max_connections,
            cors_allow_origin: non_empty_var("CORS_ALLOW_ORIGIN"),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match non_empty_var(name) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
        None => Ok(default),
    }
}
