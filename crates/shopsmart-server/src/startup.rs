//! Server startup utilities.

use shopsmart_config::{AppConfig, ObservabilityConfig};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Calling this twice keeps the
/// first subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer().with_target(true)).try_init()
    };

    if let Err(e) = result {
        debug!("Tracing subscriber already installed: {}", e);
    }
}

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r"
   _____ __                _____                      __
  / ___// /_  ____  ____  / ___/____ ___  ____ ______/ /_
  \__ \/ __ \/ __ \/ __ \ \__ \/ __ `__ \/ __ `/ ___/ __/
 ___/ / / / / /_/ / /_/ /___/ / / / / / / /_/ / /  / /_
/____/_/ /_/\____/ .___//____/_/ /_/ /_/\__,_/_/   \__/
                /_/
    "
    );
}

/// Prints where the server can be reached.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let addr = config.server.rest_addr();
    info!("{}", separator);
    info!("REST API:  http://{}/api/v1", addr);
    info!("Health:    http://{}/health", addr);
    info!("API Docs:  http://{}/swagger-ui", addr);
    info!("Uploads:   {} -> {}", config.storage.upload_dir, config.storage.public_base_url);
    if config.scheduler.enabled {
        info!("Low-stock report: '{}'", config.scheduler.low_stock_cron);
    }
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_does_not_panic() {
        init_logging(&ObservabilityConfig::default());
        init_logging(&ObservabilityConfig {
            log_format: "json".to_string(),
            ..ObservabilityConfig::default()
        });
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();

        let mut config = AppConfig::default();
        print_startup_info(&config);
        config.scheduler.enabled = false;
        print_startup_info(&config);
    }
}
