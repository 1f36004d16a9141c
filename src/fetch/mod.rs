//! Outbound HTTP: a rate-limited client for the archive host.

pub mod http_client;
pub mod rate_limiter;

pub use http_client::{resolve_user_agent, HeadResponse, HttpClient, HttpResponse, USER_AGENT};
pub use rate_limiter::{DomainStats, RateLimitConfig, RateLimiter};
