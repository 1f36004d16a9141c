//! Everything a pipeline stage needs, passed explicitly.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;
use url::Url;

use crate::fetch::{HttpClient, RateLimitConfig, RateLimiter, USER_AGENT};
use crate::error::FetchError;
use crate::repository::DbContext;

/// Cooperative cancellation flag shared by every stage.
///
/// Long loops call [`Shutdown::is_triggered`] between files, so the file in
/// flight is always finished (written and recorded) before the loop exits.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been requested.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        // An error means the sender is gone, which only happens at exit.
        let _ = rx.wait_for(|stop| *stop).await;
    }

    /// Trigger on Ctrl-C, or SIGTERM on Unix.
    pub fn listen_for_signals(&self) -> JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            let ctrl_c = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            };

            #[cfg(unix)]
            let terminate = async {
                use tokio::signal::unix::{signal, SignalKind};
                match signal(SignalKind::terminate()) {
                    Ok(mut sig) => {
                        sig.recv().await;
                    }
                    Err(e) => {
                        warn!("Failed to listen for SIGTERM: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            };
            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => {}
                _ = terminate => {}
            }
            warn!("Shutdown requested, finishing the current file");
            shutdown.trigger();
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct PipelineContext {
    pub db: DbContext,
    pub cache_dir: PathBuf,
    pub unpacked_dir: PathBuf,
    pub base_url: Url,
    /// Floor between consecutive requests; zero disables throttling.
    pub rate_limit: Duration,
    pub retry_limit: u32,
    pub timeout: Duration,
    pub user_agent: String,
    pub shutdown: Shutdown,
}

impl PipelineContext {
    pub fn new(
        db: DbContext,
        cache_dir: impl Into<PathBuf>,
        unpacked_dir: impl Into<PathBuf>,
        base_url: Url,
    ) -> Self {
        Self {
            db,
            cache_dir: cache_dir.into(),
            unpacked_dir: unpacked_dir.into(),
            base_url,
            rate_limit: Duration::from_millis(100),
            retry_limit: 5,
            timeout: Duration::from_secs(30),
            user_agent: USER_AGENT.to_string(),
            shutdown: Shutdown::new(),
        }
    }

    pub fn with_rate_limit(mut self, rate_limit: Duration) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_retry_limit(mut self, retry_limit: u32) -> Self {
        self.retry_limit = retry_limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn http_client(&self) -> Result<HttpClient, FetchError> {
        let limiter = RateLimiter::new(RateLimitConfig::with_base_delay(self.rate_limit));
        HttpClient::new(&self.user_agent, self.timeout, limiter)
    }

    /// Local file mirroring a URL's path under `root`.
    pub fn mirror_path(root: &Path, url: &str) -> Option<PathBuf> {
        let parsed = Url::parse(url).ok()?;
        let relative = parsed.path().trim_start_matches('/');
        if relative.is_empty() || relative.split('/').any(|c| c == "..") {
            return None;
        }
        Some(root.join(relative))
    }

    pub fn cache_path(&self, url: &str) -> Option<PathBuf> {
        Self::mirror_path(&self.cache_dir, url)
    }

    pub fn unpacked_path(&self, url: &str) -> Option<PathBuf> {
        Self::mirror_path(&self.unpacked_dir, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_path() {
        let root = Path::new("/cache");
        assert_eq!(
            PipelineContext::mirror_path(
                root,
                "https://www.sec.gov/Archives/edgar/monthly/xbrlrss-2021-06.xml"
            ),
            Some(PathBuf::from("/cache/Archives/edgar/monthly/xbrlrss-2021-06.xml"))
        );
        assert_eq!(PipelineContext::mirror_path(root, "https://www.sec.gov/"), None);
        assert_eq!(PipelineContext::mirror_path(root, "not a url"), None);
    }

    #[tokio::test]
    async fn test_shutdown() {
        let shutdown = Shutdown::new();
        let clone = shutdown.clone();
        assert!(!clone.is_triggered());
        shutdown.trigger();
        assert!(clone.is_triggered());
        clone.wait().await;
    }
}
