//! Per-client rate limiting for the authentication endpoints.

use crate::responses::AppError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};
use shopsmart_config::RateLimitConfig;
use shopsmart_core::ShopError;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

type KeyedLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Request budget per client IP.
///
/// Requests without connection info (in-process tests, unix sockets) share
/// one bucket.
#[derive(Clone)]
pub struct AuthRateLimiter {
    limiter: Option<Arc<KeyedLimiter>>,
}

impl AuthRateLimiter {
    /// Allows `requests_per_minute` per client.
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: Some(Arc::new(RateLimiter::keyed(quota))),
        }
    }

    /// A limiter that lets every request through.
    pub fn disabled() -> Self {
        Self { limiter: None }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        if config.enabled {
            Self::per_minute(config.auth_requests_per_minute)
        } else {
            Self::disabled()
        }
    }

    /// Clients currently holding a bucket.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.as_ref().map_or(0, |limiter| limiter.len())
    }

    /// Drops buckets of clients whose budget has fully refilled.
    pub fn prune(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
            limiter.shrink_to_fit();
            debug!(clients = limiter.len(), "Pruned auth rate limiter");
        }
    }

    /// Prunes every `every` until the task is dropped. Returns at once for a
    /// disabled limiter.
    pub async fn clean_state(&self, every: Duration) {
        if self.limiter.is_none() {
            return;
        }
        let mut interval = tokio::time::interval(every.max(Duration::from_millis(10)));
        loop {
            interval.tick().await;
            self.prune();
        }
    }

    /// Takes one request from `client`'s budget.
    pub fn check(&self, client: IpAddr) -> Result<(), ShopError> {
        match &self.limiter {
            Some(limiter) => limiter.check_key(&client).map_err(|_| ShopError::RateLimitExceeded),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for AuthRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthRateLimiter")
            .field("enabled", &self.limiter.is_some())
            .finish()
    }
}

/// Rejects with 429 once the caller's budget is spent.
pub async fn rate_limit_middleware(State(limiter): State<AuthRateLimiter>, request: Request, next: Next) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |info| info.0.ip());

    if let Err(e) = limiter.check(client) {
        warn!("Rate limit exceeded for {} on {}", client, request.uri().path());
        return AppError(e).into_response();
    }

    next.run(request).await
}
