//! Per-domain request floor with adaptive backoff.
//!
//! Consecutive requests to a domain start at least `current_delay` apart.
//! 429 and 503 responses double the delay up to a cap; a run of successes
//! walks it back down to the configured floor.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Configured floor between requests. Zero disables throttling.
    pub base_delay: Duration,
    /// Smallest delay once backing off, so a zero floor still slows down.
    pub min_backoff: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub recovery_multiplier: f64,
    /// Successes needed before each recovery step.
    pub recovery_threshold: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(100),
            min_backoff: Duration::from_millis(500),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            recovery_multiplier: 0.5,
            recovery_threshold: 5,
        }
    }
}

impl RateLimitConfig {
    pub fn with_base_delay(base_delay: Duration) -> Self {
        Self {
            base_delay,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
struct DomainState {
    current_delay: Duration,
    last_request: Option<Instant>,
    consecutive_successes: u32,
    in_backoff: bool,
    total_requests: u64,
    rate_limit_hits: u64,
}

impl DomainState {
    fn new(base_delay: Duration) -> Self {
        Self {
            current_delay: base_delay,
            last_request: None,
            consecutive_successes: 0,
            in_backoff: false,
            total_requests: 0,
            rate_limit_hits: 0,
        }
    }

    fn time_until_ready(&self) -> Duration {
        match self.last_request {
            Some(last) => self.current_delay.saturating_sub(last.elapsed()),
            None => Duration::ZERO,
        }
    }
}

/// Snapshot of one domain's limiter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainStats {
    pub current_delay: Duration,
    pub in_backoff: bool,
    pub total_requests: u64,
    pub rate_limit_hits: u64,
}

/// Cloning shares the underlying state.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    domains: Arc<RwLock<HashMap<String, DomainState>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            domains: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn extract_domain(url: &str) -> Option<String> {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|s| s.to_string()))
    }

    pub fn is_rate_limit(status_code: u16) -> bool {
        matches!(status_code, 429 | 503)
    }

    /// Wait until the domain's floor has passed, then mark a request as
    /// started. Returns the domain for later reporting.
    pub async fn acquire(&self, url: &str) -> Option<String> {
        let domain = Self::extract_domain(url)?;

        let wait = {
            let domains = self.domains.read().await;
            domains
                .get(&domain)
                .map(|s| s.time_until_ready())
                .unwrap_or(Duration::ZERO)
        };
        if wait > Duration::ZERO {
            debug!("Rate limiting {}: waiting {:?}", domain, wait);
            tokio::time::sleep(wait).await;
        }

        let mut domains = self.domains.write().await;
        let state = domains
            .entry(domain.clone())
            .or_insert_with(|| DomainState::new(self.config.base_delay));
        state.last_request = Some(Instant::now());
        state.total_requests += 1;

        Some(domain)
    }

    pub async fn report_success(&self, domain: &str) {
        let mut domains = self.domains.write().await;
        let Some(state) = domains.get_mut(domain) else {
            return;
        };
        state.consecutive_successes += 1;

        if state.in_backoff && state.consecutive_successes >= self.config.recovery_threshold {
            state.consecutive_successes = 0;
            let reduced = state.current_delay.mul_f64(self.config.recovery_multiplier);
            if reduced <= self.config.base_delay || reduced < self.config.min_backoff {
                state.current_delay = self.config.base_delay;
                state.in_backoff = false;
                info!("Domain {} recovered from rate limit backoff", domain);
            } else {
                state.current_delay = reduced;
                debug!("Domain {} delay reduced to {:?}", domain, reduced);
            }
        }
    }

    pub async fn report_rate_limit(&self, domain: &str, status_code: u16) {
        let mut domains = self.domains.write().await;
        let Some(state) = domains.get_mut(domain) else {
            return;
        };
        state.rate_limit_hits += 1;
        state.consecutive_successes = 0;
        state.in_backoff = true;
        state.current_delay = state
            .current_delay
            .mul_f64(self.config.backoff_multiplier)
            .max(self.config.min_backoff)
            .min(self.config.max_delay);

        warn!(
            "Rate limited by {} (HTTP {}), backing off to {:?}",
            domain, status_code, state.current_delay
        );
    }

    pub async fn stats(&self, domain: &str) -> Option<DomainStats> {
        let domains = self.domains.read().await;
        domains.get(domain).map(|s| DomainStats {
            current_delay: s.current_delay,
            in_backoff: s.in_backoff,
            total_requests: s.total_requests,
            rate_limit_hits: s.rate_limit_hits,
        })
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}
