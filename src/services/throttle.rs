// src/services/throttle.rs
// DOCUMENTATION: Per-client rate limit for credential endpoints
// PURPOSE: Slow down password and verification-code guessing

use crate::errors::PortalError;
use actix_web::HttpRequest;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

pub struct AuthThrottle {
    limiter: DefaultKeyedRateLimiter<String>,
    trust_forwarded: bool,
}

impl AuthThrottle {
    /// Allow `attempts` per minute per client (minimum 1)
    pub fn per_minute(attempts: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(attempts).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: RateLimiter::keyed(quota),
            trust_forwarded: false,
        }
    }

    /// Key on `Forwarded` / `X-Forwarded-For` instead of the socket peer.
    /// Only safe behind a proxy that overwrites those headers.
    pub fn trusting_forwarded(mut self, trust: bool) -> Self {
        self.trust_forwarded = trust;
        self
    }

    pub fn check(&self, client: &str) -> Result<(), PortalError> {
        self.limiter.check_key(&client.to_string()).map_err(|_| {
            log::warn!("Auth rate limit hit for {}", client);
            PortalError::RateLimitExceeded
        })
    }

    /// Key the request by the peer IP, or the forwarded client when trusted.
    /// The port is dropped so reconnecting does not reset the quota.
    pub fn check_request(&self, req: &HttpRequest) -> Result<(), PortalError> {
        let client = if self.trust_forwarded {
            req.connection_info()
                .realip_remote_addr()
                .map(client_ip)
                .unwrap_or_else(|| "unknown".to_string())
        } else {
            req.peer_addr()
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|| "unknown".to_string())
        };
        self.check(&client)
    }

    /// Forget clients whose quota has fully replenished
    pub fn cleanup(&self) {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        let after = self.limiter.len();

        if before > after {
            log::info!(
                "Auth throttle cleanup: dropped {} idle clients ({} remaining)",
                before - after,
                after
            );
        }
    }
}

/// "203.0.113.7:5000" → "203.0.113.7"; anything that is not ip:port is kept as is
fn client_ip(addr: &str) -> String {
    addr.parse::<SocketAddr>()
        .map(|socket| socket.ip().to_string())
        .unwrap_or_else(|_| addr.to_string())
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically drops idle rate-limit state
pub fn start_cleanup_task(throttle: Arc<AuthThrottle>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            throttle.cleanup();
        }
    });
}
