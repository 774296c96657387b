//! # ShopSmart Server
//!
//! Loads configuration, connects MySQL and Redis, wires the services and
//! serves the REST API. The low-stock report scheduler runs in the same
//! process and stops with the server.

use shopsmart_config::{AppConfig, ConfigLoader, ObservabilityConfig};
use shopsmart_core::{ShopError, ShopResult};
use shopsmart_jobs::low_stock_scheduler;
use shopsmart_repository::{create_pool, DatabasePoolInterface};
use shopsmart_rest::middleware::AuthRateLimiter;
use shopsmart_rest::{create_router, RouterOptions};
use shopsmart_server::di::{create_cache, AppModuleBuilder};
use shopsmart_server::startup::{init_logging, print_banner, print_startup_info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let loader = match ConfigLoader::from_default_location() {
        Ok(loader) => loader,
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    let config = loader.get().clone();
    init_logging(&config.observability);

    print_banner();
    info!("Starting ShopSmart server v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> ShopResult<()> {
    let db_pool = create_pool(&config.database).await?;
    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }
    let cache = create_cache(&config.redis)?;

    tokio::fs::create_dir_all(&config.storage.upload_dir)
        .await
        .map_err(|e| ShopError::internal(format!("Failed to create upload directory: {e}")))?;

    let module = AppModuleBuilder::new(config.clone())
        .with_database_pool(db_pool.clone())
        .with_cache(cache)
        .build()?;

    let rate_limiter = AuthRateLimiter::from_config(&config.rate_limit);
    let limiter_cleanup = {
        let limiter = rate_limiter.clone();
        let every = config.rate_limit.cleanup_interval();
        tokio::spawn(async move { limiter.clean_state(every).await })
    };

    let options = RouterOptions::new(config.server.clone())
        .with_rate_limiter(rate_limiter)
        .with_upload_dir(config.storage.upload_dir.clone());
    let router = create_router(module.app_state(), module.token_provider.clone(), &options);

    let mut scheduler_shutdown: Option<broadcast::Sender<()>> = None;
    let scheduler_task = if config.scheduler.enabled {
        let scheduler = low_stock_scheduler(&config.scheduler, module.product_service.clone())
            .map_err(|e| ShopError::Configuration(e.to_string()))?;
        let scheduler = Arc::new(scheduler);
        scheduler_shutdown = Some(scheduler.shutdown_handle());
        Some(tokio::spawn(async move {
            if let Err(e) = scheduler.start().await {
                error!("Scheduler stopped with error: {}", e);
            }
        }))
    } else {
        info!("Scheduler disabled");
        None
    };

    let rest_addr = config.server.rest_addr();
    let listener = tokio::net::TcpListener::bind(&rest_addr)
        .await
        .map_err(|e| ShopError::internal(format!("Failed to bind REST: {e}")))?;
    print_startup_info(&config);

    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            if let Some(tx) = scheduler_shutdown {
                // No receiver means the scheduler already stopped
                let _ = tx.send(());
            }
        })
        .await
        .map_err(|e| ShopError::internal(format!("REST server error: {e}")))?;

    limiter_cleanup.abort();
    if let Some(task) = scheduler_task {
        if let Err(e) = task.await {
            warn!("Scheduler task did not finish cleanly: {}", e);
        }
    }
    db_pool.close().await;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
