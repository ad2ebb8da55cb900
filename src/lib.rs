//! mailauth_check library: email authentication record auditing
//!
//! This library fetches and validates the SPF, DKIM and DMARC records a domain
//! publishes in DNS and reports each finding as pass, warn or fail.
//!
//! # Example
//!
//! ```no_run
//! use mailauth_check::{run_check, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     dkim: Some(vec!["selector1".to_string()]),
//!     ..Default::default()
//! };
//!
//! let report = run_check(&config, "example.com").await?;
//! println!(
//!     "{}: {} passed, {} warning(s), {} failed",
//!     report.domain, report.summary.pass, report.summary.warn, report.summary.fail
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod dkim;
pub mod dmarc;
pub mod dns;
mod domain;
mod error_handling;
pub mod initialization;
pub mod report;
pub mod spf;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel, Nameservers, OutputFormat};
pub use domain::{normalize_domain, resolve_domain};
pub use error_handling::{DnsError, InitializationError, UsageError};
pub use report::{render_json, render_plain, CheckReport, CheckResult, Mechanism, Section, Status};
pub use run::{check_domain, run_check};

// Internal run module (wires the three checks together)
mod run {
    use anyhow::{Context, Result};
    use log::info;

    use crate::config::Config;
    use crate::dkim::check_dkim;
    use crate::dmarc::check_dmarc;
    use crate::dns::DnsLookup;
    use crate::domain::normalize_domain;
    use crate::initialization::init_dns_lookup;
    use crate::report::CheckReport;
    use crate::spf::check_spf;

    /// Runs the SPF, DKIM and DMARC checks for an already-normalized domain.
    ///
    /// The three checks run concurrently and are independent: a lookup
    /// failure in one shows up in its own section and never stops the others.
    pub async fn check_domain<L: DnsLookup>(
        lookup: &L,
        domain: &str,
        selectors: &[String],
        dkim_concurrency: usize,
    ) -> CheckReport {
        info!(
            "Checking {domain} (DKIM selectors: {})",
            selectors.join(", ")
        );

        let (spf, dkim, dmarc) = tokio::join!(
            check_spf(lookup, domain),
            check_dkim(lookup, domain, selectors, dkim_concurrency),
            check_dmarc(lookup, domain),
        );

        let report = CheckReport::new(domain, vec![spf, dkim, dmarc]);
        info!(
            "Finished {domain}: {} passed, {} warning(s), {} failed",
            report.summary.pass, report.summary.warn, report.summary.fail
        );
        report
    }

    /// Checks `domain` against live DNS using the resolver settings in `config`.
    ///
    /// # Errors
    ///
    /// Fails when `domain` is not a usable domain name or the resolver cannot
    /// be set up. Record problems are never errors; they are in the report.
    pub async fn run_check(config: &Config, domain: &str) -> Result<CheckReport> {
        let domain = normalize_domain(domain)?;
        let lookup = init_dns_lookup(&config.dns_settings())
            .context("Failed to initialize DNS resolver")?;

        Ok(check_domain(
            &lookup,
            &domain,
            &config.dkim_selectors(),
            config.dkim_concurrency(),
        )
        .await)
    }
}
