//! Bounded reachability probing for illustration URLs.
//!
//! A page must always end up with something displayable. The probe
//! checks a URL a bounded number of times with a short linear backoff
//! and falls back to the page's placeholder image when every attempt
//! fails. Failures never leave this module.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::assets::resolver::AssetResolver;
use crate::config::ProbeConfig;

/// Why one probe attempt failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeFailure {
    #[error("probe timed out")]
    Timeout,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("network error: {0}")]
    Network(String),
}

/// A single reachability check.
#[async_trait]
pub trait ReachabilityCheck: Send + Sync {
    async fn check(&self, url: &str) -> Result<(), ProbeFailure>;
}

/// GET-based check: any 2xx response counts as reachable. The body is
/// never read.
#[derive(Debug, Clone)]
pub struct HttpReachability {
    client: reqwest::Client,
}

impl HttpReachability {
    pub fn new(config: &ProbeConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ReachabilityCheck for HttpReachability {
    async fn check(&self, url: &str) -> Result<(), ProbeFailure> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProbeFailure::Timeout
            } else {
                ProbeFailure::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ProbeFailure::Status(status.as_u16()))
        }
    }
}

/// Retries a [`ReachabilityCheck`] and substitutes placeholders.
pub struct AvailabilityProbe<C> {
    checker: C,
    resolver: AssetResolver,
    config: ProbeConfig,
}

impl<C: ReachabilityCheck> AvailabilityProbe<C> {
    pub fn new(checker: C, resolver: AssetResolver, config: &ProbeConfig) -> Self {
        Self {
            checker,
            resolver,
            config: config.clone(),
        }
    }

    pub fn resolver(&self) -> &AssetResolver {
        &self.resolver
    }

    /// Probe with the configured attempt budget.
    pub async fn ensure_reachable_default(&self, url: &str, index: u32) -> String {
        self.ensure_reachable(url, index, self.config.max_attempts).await
    }

    /// Return `url` if it answers within `max_attempts` tries, otherwise
    /// the placeholder for page `index`. `max_attempts == 0` is one try.
    #[instrument(skip(self, url), fields(attempts = max_attempts.max(1)))]
    pub async fn ensure_reachable(&self, url: &str, index: u32, max_attempts: u32) -> String {
        let attempts = max_attempts.max(1);

        for attempt in 1..=attempts {
            match self.checker.check(url).await {
                Ok(()) => {
                    debug!(attempt, "illustration reachable");
                    return url.to_string();
                }
                Err(failure) => {
                    warn!(attempt, error = %failure, "illustration probe failed");
                    if attempt < attempts {
                        tokio::time::sleep(self.config.backoff(attempt)).await;
                    }
                }
            }
        }

        warn!("falling back to placeholder");
        self.resolver.placeholder_url(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Fails the first `failures` checks, then succeeds.
    struct FlakyCheck {
        failures: u32,
        calls: Arc<AtomicU32>,
    }

    impl FlakyCheck {
        fn new(failures: u32) -> (Self, Arc<AtomicU32>) {
            let calls = Arc::new(AtomicU32::new(0));
            (
                Self {
                    failures,
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl ReachabilityCheck for FlakyCheck {
        async fn check(&self, _url: &str) -> Result<(), ProbeFailure> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(ProbeFailure::Status(503))
            } else {
                Ok(())
            }
        }
    }

    fn probe(checker: FlakyCheck) -> AvailabilityProbe<FlakyCheck> {
        let config = ProbeConfig {
            backoff_step_ms: 1,
            ..ProbeConfig::default()
        };
        AvailabilityProbe::new(checker, AssetResolver::default(), &config)
    }

    const URL: &str = "https://image.example/prompt/fox?seed=1";

    #[tokio::test]
    async fn reachable_url_is_returned() {
        let (checker, calls) = FlakyCheck::new(0);
        assert_eq!(probe(checker).ensure_reachable(URL, 0, 2).await, URL);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn second_attempt_succeeds() {
        let (checker, calls) = FlakyCheck::new(1);
        assert_eq!(probe(checker).ensure_reachable(URL, 0, 2).await, URL);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhausted_attempts_fall_back_to_placeholder() {
        let (checker, calls) = FlakyCheck::new(u32::MAX);
        let out = probe(checker).ensure_reachable(URL, 6, 3).await;
        assert_ne!(out, URL);
        assert!(out.contains("Image%206"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_attempts_still_probes_once() {
        let (checker, calls) = FlakyCheck::new(u32::MAX);
        let out = probe(checker).ensure_reachable(URL, 1, 0).await;
        assert!(out.contains("Image%201"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
