//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_DKIM_SELECTORS, DKIM_MAX_CONCURRENCY, DNS_RETRY_ATTEMPTS, DNS_RETRY_BASE_DELAY_MS,
    DNS_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Report output format written to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Section headers and one colored status line per finding
    Plain,
    /// The full report as pretty-printed JSON
    Json,
}

/// Upstream nameservers used by the DNS resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Nameservers {
    /// Whatever the host is configured with (`/etc/resolv.conf` or the OS equivalent)
    System,
    /// 8.8.8.8 / 8.8.4.4
    Google,
    /// 1.1.1.1 / 1.0.0.1
    Cloudflare,
    /// 9.9.9.9
    Quad9,
}

/// Library configuration, also used directly as the CLI definition.
///
/// # Examples
///
/// ```no_run
/// use mailauth_check::Config;
///
/// let config = Config {
///     domain: Some("example.com".to_string()),
///     dkim: Some(vec!["selector1".to_string(), "selector2".to_string()]),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mailauth_check",
    version,
    about = "Checks the SPF, DKIM and DMARC records published for a domain",
    after_help = "Example: mailauth_check -d example.com --dkim selector1,selector2"
)]
pub struct Config {
    /// Domain to check (e.g., example.com)
    #[arg(value_name = "DOMAIN", conflicts_with = "domain")]
    pub target: Option<String>,

    /// Domain to check (e.g., example.com); read from stdin when omitted
    #[arg(short = 'd', long = "domain", value_name = "DOMAIN")]
    pub domain: Option<String>,

    /// Comma-separated list of DKIM selectors to check (default: default,google)
    #[arg(long = "dkim", value_name = "SELECTORS", value_delimiter = ',')]
    pub dkim: Option<Vec<String>>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Per-query DNS timeout in seconds (at least 1)
    #[arg(
        long,
        default_value_t = DNS_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub dns_timeout: u64,

    /// Retries for transient DNS failures (SERVFAIL, timeout)
    #[arg(long, default_value_t = DNS_RETRY_ATTEMPTS)]
    pub dns_retries: usize,

    /// Nameservers to query
    #[arg(long, value_enum, default_value_t = Nameservers::System)]
    pub resolver: Nameservers,

    /// Maximum DKIM selector lookups in flight at once
    #[arg(long, default_value_t = DKIM_MAX_CONCURRENCY)]
    pub dkim_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: None,
            domain: None,
            dkim: None,
            format: OutputFormat::Plain,
            no_color: false,
            log_level: LogLevel::Warn,
            log_format: LogFormat::Plain,
            dns_timeout: DNS_TIMEOUT_SECS,
            dns_retries: DNS_RETRY_ATTEMPTS,
            resolver: Nameservers::System,
            dkim_concurrency: DKIM_MAX_CONCURRENCY,
        }
    }
}

impl Config {
    /// The domain given on the command line, positional form first.
    pub fn requested_domain(&self) -> Option<&str> {
        self.target.as_deref().or(self.domain.as_deref())
    }

    /// DKIM selectors to try, trimmed, lowercased and de-duplicated.
    ///
    /// Falls back to [`DEFAULT_DKIM_SELECTORS`] when `--dkim` was not given.
    pub fn dkim_selectors(&self) -> Vec<String> {
        let raw: Vec<String> = match &self.dkim {
            Some(list) => list.clone(),
            None => DEFAULT_DKIM_SELECTORS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let mut selectors: Vec<String> = Vec::with_capacity(raw.len());
        for selector in raw {
            let normalized = selector.trim().trim_end_matches('.').to_ascii_lowercase();
            if !normalized.is_empty() && !selectors.contains(&normalized) {
                selectors.push(normalized);
            }
        }
        selectors
    }

    /// DKIM fan-out limit; never below one.
    pub fn dkim_concurrency(&self) -> usize {
        self.dkim_concurrency.max(1)
    }

    /// DNS settings derived from the CLI options.
    pub fn dns_settings(&self) -> crate::dns::DnsSettings {
        crate::dns::DnsSettings {
            timeout: Duration::from_secs(self.dns_timeout),
            retries: self.dns_retries,
            retry_base_delay: Duration::from_millis(DNS_RETRY_BASE_DELAY_MS),
            nameservers: self.resolver,
        }
    }
}
