//! DNS resolver initialization.

use std::sync::Arc;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::system_conf::read_system_conf;
use hickory_resolver::TokioAsyncResolver;
use log::{debug, warn};

use crate::config::Nameservers;
use crate::dns::{DnsSettings, HickoryLookup, Retrying};
use crate::error_handling::InitializationError;

/// Initializes the DNS resolver for TXT lookups.
///
/// Uses the host's resolver configuration for [`Nameservers::System`], falling
/// back to hickory's default (Google DNS) when it cannot be read. hickory's own retries are
/// disabled: transient failures are retried by [`Retrying`] so the retry
/// count stays what the caller configured.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` for a zero timeout.
pub fn init_resolver(
    settings: &DnsSettings,
) -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    if settings.timeout.is_zero() {
        return Err(InitializationError::DnsResolverError(
            "DNS timeout must be greater than zero".to_string(),
        ));
    }

    let (config, mut opts) = match settings.nameservers {
        Nameservers::System => read_system_conf().unwrap_or_else(|e| {
            warn!("Could not read system DNS configuration ({e}); using hickory defaults");
            (ResolverConfig::default(), ResolverOpts::default())
        }),
        Nameservers::Google => (ResolverConfig::google(), ResolverOpts::default()),
        Nameservers::Cloudflare => (ResolverConfig::cloudflare(), ResolverOpts::default()),
        Nameservers::Quad9 => (ResolverConfig::quad9(), ResolverOpts::default()),
    };

    opts.timeout = settings.timeout;
    opts.attempts = 1;
    // Absolute names only; never append search domains
    opts.ndots = 0;

    debug!(
        "DNS resolver: {:?} nameservers, {}s timeout, {} retr{}",
        settings.nameservers,
        settings.timeout.as_secs(),
        settings.retries,
        if settings.retries == 1 { "y" } else { "ies" }
    );

    Ok(Arc::new(TokioAsyncResolver::tokio(config, opts)))
}

/// Builds the production lookup stack: hickory plus transient-failure retries.
pub fn init_dns_lookup(
    settings: &DnsSettings,
) -> Result<Retrying<HickoryLookup>, InitializationError> {
    let resolver = init_resolver(settings)?;
    Ok(Retrying::new(HickoryLookup::new(resolver), settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_init_resolver_public_nameservers() {
        for nameservers in [
            Nameservers::Google,
            Nameservers::Cloudflare,
            Nameservers::Quad9,
        ] {
            let settings = DnsSettings {
                nameservers,
                ..Default::default()
            };
            assert!(init_resolver(&settings).is_ok());
        }
    }

    #[tokio::test]
    async fn test_init_resolver_rejects_zero_timeout() {
        let settings = DnsSettings {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            init_resolver(&settings),
            Err(InitializationError::DnsResolverError(_))
        ));
    }

    #[tokio::test]
    async fn test_init_dns_lookup() {
        assert!(init_dns_lookup(&DnsSettings::default()).is_ok());
    }
}
