//! Configuration management for the contacts backend.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file in the working directory is loaded first if present.

use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Default image host API root (Cloudinary-compatible).
pub const DEFAULT_IMAGE_HOST_URL: &str = "https://api.cloudinary.com/v1_1";

/// Configuration for the contacts backend.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind (default: "0.0.0.0")
    pub host: String,

    /// Port to listen on (default: 5000)
    pub port: u16,

    /// Image host API root URL
    pub image_host_url: String,

    /// Image host cloud (account) name
    pub image_host_cloud_name: String,

    /// Image host API key
    pub image_host_api_key: String,

    /// Image host API secret used for request signing
    pub image_host_api_secret: String,

    /// Image host request timeout in seconds (default: 30)
    pub image_host_timeout: u64,

    /// Retries for transient image host failures (default: 2)
    pub image_host_max_retries: u32,

    /// Whole-request timeout in seconds (default: 60)
    pub request_timeout: u64,

    /// Maximum accepted request body in bytes (default: 5 MiB)
    pub max_upload_bytes: usize,

    /// Log level (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `IMAGE_HOST_CLOUD_NAME`: image host account name
    /// - `IMAGE_HOST_API_KEY`: image host API key
    /// - `IMAGE_HOST_API_SECRET`: image host API secret
    ///
    /// Optional environment variables:
    /// - `HOST` (default: "0.0.0.0"), `PORT` (default: 5000)
    /// - `IMAGE_HOST_BASE_URL`: API root (default: Cloudinary)
    /// - `IMAGE_HOST_TIMEOUT`: seconds (default: 30)
    /// - `IMAGE_HOST_MAX_RETRIES`: (default: 2)
    /// - `REQUEST_TIMEOUT`: seconds (default: 60)
    /// - `MAX_UPLOAD_BYTES`: (default: 5242880)
    /// - `LOG_LEVEL`: (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        let _ = dotenvy::dotenv();

        let image_host_url =
            env::var("IMAGE_HOST_BASE_URL").unwrap_or_else(|_| DEFAULT_IMAGE_HOST_URL.to_string());

        if !image_host_url.starts_with("http://") && !image_host_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "IMAGE_HOST_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let image_host_cloud_name = Self::required_non_empty("IMAGE_HOST_CLOUD_NAME")?;
        let image_host_api_key = Self::required_non_empty("IMAGE_HOST_API_KEY")?;
        let image_host_api_secret = Self::required_non_empty("IMAGE_HOST_API_SECRET")?;

        let defaults = Config::default();
        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = Self::parse_env("PORT", defaults.port)?;
        let image_host_timeout = Self::parse_env("IMAGE_HOST_TIMEOUT", defaults.image_host_timeout)?;
        let image_host_max_retries =
            Self::parse_env("IMAGE_HOST_MAX_RETRIES", defaults.image_host_max_retries)?;
        let request_timeout = Self::parse_env("REQUEST_TIMEOUT", defaults.request_timeout)?;
        let max_upload_bytes = Self::parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?;

        if request_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                var: "REQUEST_TIMEOUT".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Config {
            host,
            port,
            image_host_url,
            image_host_cloud_name,
            image_host_api_key,
            image_host_api_secret,
            image_host_timeout,
            image_host_max_retries,
            request_timeout,
            max_upload_bytes,
            log_level,
        })
    }

    fn required_non_empty(var_name: &str) -> ConfigResult<String> {
        let value =
            env::var(var_name).map_err(|_| ConfigError::MissingVar(var_name.to_string()))?;
        if value.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }
        Ok(value)
    }

    /// Parse an environment variable with a default value.
    fn parse_env<T: std::str::FromStr>(var_name: &str, default: T) -> ConfigResult<T> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a non-negative number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 5000,
            image_host_url: DEFAULT_IMAGE_HOST_URL.to_string(),
            image_host_cloud_name: String::new(),
            image_host_api_key: String::new(),
            image_host_api_secret: String::new(),
            image_host_timeout: 30,
            image_host_max_retries: 2,
            request_timeout: 60,
            max_upload_bytes: 5 * 1024 * 1024,
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    // Helper to set and unset env vars for testing
    struct EnvGuard {
        vars: Vec<String>,
    }

    impl EnvGuard {
        fn new() -> Self {
            EnvGuard { vars: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
            self.vars.push(key.to_string());
        }

        fn set_required(&mut self) {
            self.set("IMAGE_HOST_CLOUD_NAME", "demo");
            self.set("IMAGE_HOST_API_KEY", "key-123");
            self.set("IMAGE_HOST_API_SECRET", "secret-456");
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for var in &self.vars {
                env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.image_host_timeout, 30);
        assert_eq!(config.image_host_max_retries, 2);
        assert_eq!(config.request_timeout, 60);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
    }

    #[test]
    #[serial]
    fn test_config_from_env_valid() {
        let mut guard = EnvGuard::new();
        guard.set_required();
        guard.set("PORT", "8080");
        guard.set("IMAGE_HOST_MAX_RETRIES", "0");

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.image_host_cloud_name, "demo");
        assert_eq!(config.image_host_api_key, "key-123");
        assert_eq!(config.image_host_max_retries, 0);
    }

    #[test]
    #[serial]
    fn test_config_missing_required() {
        let mut guard = EnvGuard::new();
        guard.set_required();
        env::remove_var("IMAGE_HOST_API_SECRET");

        // A .env file could supply the secret again; only assert when it does not
        let result = Config::from_env();
        if env::var("IMAGE_HOST_API_SECRET").is_err() {
            match result {
                Err(ConfigError::MissingVar(var)) => assert_eq!(var, "IMAGE_HOST_API_SECRET"),
                other => panic!("Expected MissingVar error, got: {:?}", other),
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_empty_secret() {
        let mut guard = EnvGuard::new();
        guard.set_required();
        guard.set("IMAGE_HOST_API_KEY", "   ");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "IMAGE_HOST_API_KEY"),
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_url() {
        let mut guard = EnvGuard::new();
        guard.set_required();
        guard.set("IMAGE_HOST_BASE_URL", "ftp://example.com");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "IMAGE_HOST_BASE_URL"),
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_invalid_number() {
        let mut guard = EnvGuard::new();
        guard.set_required();
        guard.set("PORT", "not-a-port");

        match Config::from_env() {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "PORT"),
            other => panic!("Expected InvalidValue error, got: {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_config_zero_request_timeout() {
        let mut guard = EnvGuard::new();
        guard.set_required();
        guard.set("REQUEST_TIMEOUT", "0");

        assert!(Config::from_env().is_err());
    }

    #[test]
    fn test_parse_env_default() {
        let result: u64 = Config::parse_env("CONTACTS_NONEXISTENT_VAR", 10).unwrap();
        assert_eq!(result, 10);
    }
}
