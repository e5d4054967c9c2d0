//! Per-IP request limits over fixed windows.
//!
//! Each client IP may make `limit` requests per window. The window opens on
//! the first request and the count resets once it has run out.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::warn;

const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Whether a request may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    opened: Instant,
    hits: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    windows: DashMap<IpAddr, Window>,
    limit: u32,
    window: Duration,
    blocked_count: AtomicU64,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            limit,
            window,
            blocked_count: AtomicU64::new(0),
        }
    }

    /// Requests allowed per IP and window.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Counts a request from `ip` and decides whether it may proceed.
    pub fn check(&self, ip: IpAddr) -> RateDecision {
        let now = Instant::now();
        let mut entry = self.windows.entry(ip).or_insert(Window { opened: now, hits: 0 });
        let window = entry.value_mut();

        if now.duration_since(window.opened) >= self.window {
            *window = Window { opened: now, hits: 0 };
        }

        if window.hits < self.limit {
            window.hits += 1;
            RateDecision::Allowed {
                remaining: self.limit - window.hits,
            }
        } else {
            self.blocked_count.fetch_add(1, Ordering::Relaxed);
            RateDecision::Limited {
                retry_after: self.window.saturating_sub(now.duration_since(window.opened)),
            }
        }
    }

    /// Total number of rejected requests since startup.
    pub fn get_blocked_count(&self) -> u64 {
        self.blocked_count.load(Ordering::Relaxed)
    }

    pub fn tracked_ips(&self) -> usize {
        self.windows.len()
    }

    /// Forgets IPs whose window has run out.
    pub fn cleanup_old_entries(&self) {
        let window = self.window;
        self.windows.retain(|_, w| w.opened.elapsed() < window);
    }
}

/// Middleware rejecting requests from IPs that are over their limit.
///
/// Requests without connection info (e.g. in-process calls) share one window.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    let limiter = &state.rate_limiter;
    match limiter.check(ip) {
        RateDecision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(limiter.limit()));
            headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(remaining));
            response
        }
        RateDecision::Limited { retry_after } => {
            warn!("🚫 Rate limit exceeded for {}", ip);
            let mut response = ApiError::RateLimited.into_response();
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            response
                .headers_mut()
                .insert(axum::http::header::RETRY_AFTER, HeaderValue::from(secs));
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCAL: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn test_counts_down_then_limits() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        assert_eq!(limiter.check(LOCAL), RateDecision::Allowed { remaining: 2 });
        assert_eq!(limiter.check(LOCAL), RateDecision::Allowed { remaining: 1 });
        assert_eq!(limiter.check(LOCAL), RateDecision::Allowed { remaining: 0 });

        let RateDecision::Limited { retry_after } = limiter.check(LOCAL) else {
            panic!("fourth request should be limited");
        };
        assert!(retry_after <= Duration::from_secs(60));
        assert!(retry_after > Duration::from_secs(55));
        assert_eq!(limiter.get_blocked_count(), 1);
    }

    #[test]
    fn test_limits_are_per_ip() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let other = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(matches!(limiter.check(LOCAL), RateDecision::Allowed { .. }));
        assert!(matches!(limiter.check(LOCAL), RateDecision::Limited { .. }));
        assert!(matches!(limiter.check(other), RateDecision::Allowed { .. }));
        assert_eq!(limiter.tracked_ips(), 2);
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = RateLimiter::new(2, Duration::from_millis(100));

        limiter.check(LOCAL);
        limiter.check(LOCAL);
        assert!(matches!(limiter.check(LOCAL), RateDecision::Limited { .. }));

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(limiter.check(LOCAL), RateDecision::Allowed { remaining: 1 });
    }

    #[tokio::test]
    async fn test_cleanup_forgets_expired_windows() {
        let limiter = RateLimiter::new(2, Duration::from_millis(50));
        limiter.check(LOCAL);

        tokio::time::sleep(Duration::from_millis(200)).await;
        limiter.cleanup_old_entries();

        assert_eq!(limiter.tracked_ips(), 0);
    }
}
