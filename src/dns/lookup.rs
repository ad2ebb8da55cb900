//! The DNS lookup seam and its retry wrapper.
//!
//! Everything that talks to DNS goes through [`DnsLookup`]. The production
//! implementation is [`super::HickoryLookup`]; tests use
//! [`super::StaticLookup`].

use std::future::Future;
use std::time::Duration;

use log::{debug, warn};
use tokio_retry::RetryIf;

use crate::config::{
    Nameservers, DNS_RETRY_ATTEMPTS, DNS_RETRY_BASE_DELAY_MS, DNS_TIMEOUT_SECS,
};
use crate::error_handling::{get_retry_strategy, DnsError};

/// Resolves TXT records for an owner name.
///
/// Implementations return every TXT record at the name, with multi-string
/// records already concatenated.
pub trait DnsLookup: Send + Sync {
    /// Queries TXT records at `name`.
    fn lookup_txt(&self, name: &str)
        -> impl Future<Output = Result<Vec<String>, DnsError>> + Send;
}

/// Resolver configuration passed to the DNS adapter at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsSettings {
    /// Per-query timeout
    pub timeout: Duration,
    /// Retries after a transient failure
    pub retries: usize,
    /// Delay before the first retry; doubles for each further retry
    pub retry_base_delay: Duration,
    /// Upstream nameservers
    pub nameservers: Nameservers,
}

impl Default for DnsSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DNS_TIMEOUT_SECS),
            retries: DNS_RETRY_ATTEMPTS,
            retry_base_delay: Duration::from_millis(DNS_RETRY_BASE_DELAY_MS),
            nameservers: Nameservers::System,
        }
    }
}

/// Wraps a [`DnsLookup`] and retries transient failures.
///
/// `Timeout`, `ServerFailure` and `Other` are retried with exponential
/// backoff; `NxDomain` and `NoAnswer` are returned immediately.
#[derive(Debug, Clone)]
pub struct Retrying<L> {
    inner: L,
    retries: usize,
    base_delay: Duration,
}

impl<L: DnsLookup> Retrying<L> {
    /// Wraps `inner` with the retry policy from `settings`.
    pub fn new(inner: L, settings: &DnsSettings) -> Self {
        Self {
            inner,
            retries: settings.retries,
            base_delay: settings.retry_base_delay,
        }
    }

    /// The wrapped lookup.
    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: DnsLookup> DnsLookup for Retrying<L> {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        let strategy = get_retry_strategy(self.retries, self.base_delay);
        let mut attempt = 0usize;

        RetryIf::spawn(
            strategy,
            || {
                attempt += 1;
                if attempt > 1 {
                    debug!("Retrying TXT lookup for {name} (attempt {attempt})");
                }
                self.inner.lookup_txt(name)
            },
            |e: &DnsError| {
                let retry = e.is_transient();
                if retry {
                    warn!("Transient DNS failure for {name}: {e}");
                }
                retry
            },
        )
        .await
    }
}
