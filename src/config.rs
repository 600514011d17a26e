use crate::errors::{AppError, AppResult};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub server_host: String,
    pub server_port: u16,
    pub db_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let server_port = env_var_or("SERVER_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| AppError::Config(format!("SERVER_PORT: {e}")))?;

        let db_timeout_ms = env_var_or("DB_TIMEOUT_MS", "5000")
            .parse::<u64>()
            .map_err(|e| AppError::Config(format!("DB_TIMEOUT_MS: {e}")))?;
        if db_timeout_ms == 0 {
            return Err(AppError::Config("DB_TIMEOUT_MS must be positive".into()));
        }

        Ok(Self {
            database_path: PathBuf::from(env_var_or("DATABASE_PATH", "data/bs.db")),
            server_host: env_var_or("SERVER_HOST", "0.0.0.0"),
            server_port,
            db_timeout: Duration::from_millis(db_timeout_ms),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/bs.db"),
            server_host: "0.0.0.0".into(),
            server_port: 5000,
            db_timeout: Duration::from_secs(5),
        }
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
