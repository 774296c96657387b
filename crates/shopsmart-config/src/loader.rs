//! Configuration loader with layered sources.

use crate::{AppConfig, DEFAULT_JWT_SECRET};
use config::{Config, ConfigError, Environment, File};
use shopsmart_core::ShopError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use url::Url;

/// Prefix of environment variables overriding file configuration.
pub const ENV_PREFIX: &str = "SHOPSMART";

/// Layered configuration, loaded and validated once at startup.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Untracked local overrides
    /// 4. Environment variables such as `SHOPSMART_SERVER__REST_PORT`
    ///
    /// The environment name comes from `SHOPSMART_ENVIRONMENT` and defaults
    /// to `development`.
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self, ShopError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }
        let environment = std::env::var("SHOPSMART_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        Self::with_environment(config_dir, environment)
    }

    /// Creates a loader for an explicit environment name.
    pub fn with_environment(config_dir: impl Into<PathBuf>, environment: impl Into<String>) -> Result<Self, ShopError> {
        let config_dir: PathBuf = config_dir.into();
        let environment: String = environment.into();
        let config = Self::load_config(&config_dir, &environment)?;
        Ok(Self { config })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, ShopError> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    fn load_config(config_dir: &Path, environment: &str) -> Result<AppConfig, ShopError> {
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder().set_override("app.environment", environment).map_err(config_error)?;

        for name in ["default", environment, "local"] {
            let path = config_dir.join(format!("{name}.toml"));
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let app_config: AppConfig = builder
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)?;

        validate_config(&app_config)?;

        Ok(app_config)
    }
}

/// Validates critical configuration values.
pub fn validate_config(config: &AppConfig) -> Result<(), ShopError> {
    if config.app.is_production() && config.security.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("Using default JWT secret in production! This is a security risk.");
    }

    if config.database.url.is_empty() {
        return Err(ShopError::Configuration("Database URL is required".to_string()));
    }
    Url::parse(&config.database.url)
        .map_err(|e| ShopError::Configuration(format!("Invalid database URL: {e}")))?;

    if config.redis.enabled {
        Url::parse(&config.redis.url).map_err(|e| ShopError::Configuration(format!("Invalid Redis URL: {e}")))?;
    }

    Url::parse(&config.mail.reset_link_base)
        .map_err(|e| ShopError::Configuration(format!("Invalid password reset link base: {e}")))?;

    if config.security.jwt_secret.len() < 16 {
        return Err(ShopError::Configuration(
            "JWT secret must be at least 16 characters".to_string(),
        ));
    }

    if config.rate_limit.enabled && config.rate_limit.auth_requests_per_minute == 0 {
        return Err(ShopError::Configuration(
            "auth_requests_per_minute must be positive when rate limiting is enabled".to_string(),
        ));
    }

    Ok(())
}

fn config_error(err: ConfigError) -> ShopError {
    ShopError::Configuration(err.to_string())
}
