use crate::error::{BookingError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

fn default_http_email_endpoint() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_database_path() -> String {
    "bookings.db".to_string()
}

/// Deployment configuration for the booking pipeline.
///
/// Constructed once at startup and injected into the dispatcher and
/// orchestrator constructors; pipeline code never reads the environment
/// directly. When `http_email_api_key` is set the HTTP email provider is
/// used for every send, otherwise SMTP.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http_email_api_key: Option<String>,
    #[serde(default = "default_http_email_endpoint")]
    pub http_email_endpoint: String,
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_user: String,
    #[serde(default)]
    pub smtp_pass: String,
    pub from_address: String,
    pub restaurant_address: String,
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Config {
    /// Loads configuration from a TOML file when one exists, otherwise from
    /// the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.unwrap_or_else(|| Path::new("booking.toml"));
        if config_path.exists() {
            let config_content = fs::read_to_string(config_path).map_err(|e| {
                BookingError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            let config: Config = toml::from_str(&config_content)?;
            Ok(config)
        } else {
            Self::from_env()
        }
    }

    /// Builds configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let required = |key: &str| {
            std::env::var(key)
                .map_err(|_| BookingError::Config(format!("{key} is not set")))
        };
        Ok(Self {
            http_email_api_key: std::env::var("HTTP_EMAIL_API_KEY").ok().filter(|k| !k.is_empty()),
            http_email_endpoint: std::env::var("HTTP_EMAIL_ENDPOINT")
                .unwrap_or_else(|_| default_http_email_endpoint()),
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_default(),
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(default_smtp_port),
            smtp_user: std::env::var("SMTP_USER").unwrap_or_default(),
            smtp_pass: std::env::var("SMTP_PASS").unwrap_or_default(),
            from_address: required("FROM_ADDRESS")?,
            restaurant_address: required("RESTAURANT_ADDRESS")?,
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| default_database_path()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment-backed tests share the process environment, so they take
    // this lock to keep from interleaving.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn toml_config_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            from_address = "bookings@example.com"
            restaurant_address = "kitchen@example.com"
            smtp_host = "smtp.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.smtp_port, 587);
        assert_eq!(config.database_path, "bookings.db");
        assert!(config.http_email_api_key.is_none());
        assert_eq!(config.http_email_endpoint, "https://api.resend.com/emails");
    }

    #[test]
    fn from_env_reads_the_process_environment() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("FROM_ADDRESS", "bookings@example.com");
        std::env::set_var("RESTAURANT_ADDRESS", "kitchen@example.com");
        std::env::set_var("SMTP_HOST", "smtp.example.com");
        std::env::set_var("SMTP_PORT", "2525");
        std::env::remove_var("HTTP_EMAIL_API_KEY");
        std::env::remove_var("DATABASE_PATH");

        let config = Config::from_env().unwrap();
        assert_eq!(config.from_address, "bookings@example.com");
        assert_eq!(config.restaurant_address, "kitchen@example.com");
        assert_eq!(config.smtp_host, "smtp.example.com");
        assert_eq!(config.smtp_port, 2525);
        assert!(config.http_email_api_key.is_none());
        assert_eq!(config.database_path, "bookings.db");

        // Pointing load at a missing file falls back to the environment.
        let loaded = Config::load(Some(Path::new("/nonexistent/booking.toml"))).unwrap();
        assert_eq!(loaded.restaurant_address, "kitchen@example.com");

        std::env::remove_var("FROM_ADDRESS");
        std::env::remove_var("RESTAURANT_ADDRESS");
        std::env::remove_var("SMTP_HOST");
        std::env::remove_var("SMTP_PORT");
    }

    #[test]
    fn from_env_requires_both_addresses() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var("FROM_ADDRESS");
        std::env::remove_var("RESTAURANT_ADDRESS");
        assert!(Config::from_env().is_err());
    }
}
