// ============================
// crates/backend-lib/src/auth/rate_limit.rs
// ============================
//! Rate limiting for authentication attempts.
//!
//! An injectable, process-local limiter keyed by client address. State is
//! non-durable: a restart clears every bucket. Multi-instance deployments
//! would need a shared backing store, which is out of scope here.
use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use crate::error::AppError;
use crate::AppState;

/// Default attempt window (15 minutes)
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Default number of attempts allowed per window
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// One client's bucket within the current window.
#[derive(Debug, Clone)]
struct Bucket {
    count: u32,
    reset_at: Instant,
}

/// Rate limiter for authentication attempts, keyed by client address.
#[derive(Debug)]
pub struct AuthRateLimiter {
    buckets: DashMap<String, Bucket>,
    window: Duration,
    max_attempts: u32,
}

impl Default for AuthRateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW, DEFAULT_MAX_ATTEMPTS)
    }
}

impl AuthRateLimiter {
    pub fn new(window: Duration, max_attempts: u32) -> Self {
        Self {
            buckets: DashMap::new(),
            window,
            max_attempts,
        }
    }

    /// Count one attempt for this client and decide whether it may proceed.
    ///
    /// The reset-or-increment runs under the bucket's entry lock, so
    /// concurrent attempts from one address never lose updates.
    pub fn check(&self, client: &str) -> Result<(), AppError> {
        let now = Instant::now();
        let mut bucket = self
            .buckets
            .entry(client.to_string())
            .or_insert_with(|| Bucket {
                count: 0,
                reset_at: now + self.window,
            });

        if now > bucket.reset_at {
            bucket.count = 0;
            bucket.reset_at = now + self.window;
        }

        bucket.count += 1;
        if bucket.count > self.max_attempts {
            tracing::warn!(%client, "authentication rate limit exceeded");
            return Err(AppError::RateLimited);
        }
        Ok(())
    }
}

/// Middleware guarding the register and login routes. Runs before any
/// validation or store access.
pub async fn auth_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_address(&request);
    state.rate_limiter.check(&client)?;
    Ok(next.run(request).await)
}

/// Client address: proxy header first, then the peer address.
fn client_address(request: &Request) -> String {
    if let Some(ip) = request
        .headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
    {
        return ip.to_string();
    }
    request
        .extensions()
        .get::<axum::extract::ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixth_attempt_in_window_is_denied() {
        let limiter = AuthRateLimiter::new(Duration::from_secs(900), 5);
        for _ in 0..5 {
            assert!(limiter.check("10.0.0.1").is_ok());
        }
        assert!(matches!(
            limiter.check("10.0.0.1"),
            Err(AppError::RateLimited)
        ));
        // and it stays denied within the window
        assert!(limiter.check("10.0.0.1").is_err());
    }

    #[test]
    fn buckets_are_per_client() {
        let limiter = AuthRateLimiter::new(Duration::from_secs(900), 5);
        for _ in 0..6 {
            let _ = limiter.check("10.0.0.1");
        }
        assert!(limiter.check("10.0.0.2").is_ok());
    }

    #[test]
    fn window_elapse_resets_the_bucket() {
        let limiter = AuthRateLimiter::new(Duration::from_millis(20), 5);
        for _ in 0..6 {
            let _ = limiter.check("10.0.0.1");
        }
        assert!(limiter.check("10.0.0.1").is_err());

        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.check("10.0.0.1").is_ok());
    }
}
