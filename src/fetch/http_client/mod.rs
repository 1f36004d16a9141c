//! HTTP client for the archive: fixed user agent, explicit timeout and
//! adaptive rate limiting on every request.

mod response;
mod user_agent;

pub use response::{HeadResponse, HttpResponse};
pub use user_agent::{resolve_user_agent, USER_AGENT};

use std::time::Duration;

use reqwest::{Client, StatusCode};

use super::rate_limiter::RateLimiter;
use crate::error::FetchError;

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    rate_limiter: RateLimiter,
}

impl HttpClient {
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        rate_limiter: RateLimiter,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// GET a URL once the rate limiter allows it.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let domain = self.rate_limiter.acquire(url).await;
        let response = self.client.get(url).send().await?;
        self.report(domain.as_deref(), response.status()).await;
        Ok(HttpResponse::new(response))
    }

    /// HEAD a URL once the rate limiter allows it.
    pub async fn head(&self, url: &str) -> Result<HeadResponse, reqwest::Error> {
        let domain = self.rate_limiter.acquire(url).await;
        let response = self.client.head(url).send().await?;
        self.report(domain.as_deref(), response.status()).await;
        Ok(HeadResponse::new(&response))
    }

    /// Feed the response status back into the limiter.
    async fn report(&self, domain: Option<&str>, status: StatusCode) {
        let Some(domain) = domain else {
            return;
        };
        if RateLimiter::is_rate_limit(status.as_u16()) {
            self.rate_limiter
                .report_rate_limit(domain, status.as_u16())
                .await;
        } else if status.is_success() {
            self.rate_limiter.report_success(domain).await;
        }
    }
}
