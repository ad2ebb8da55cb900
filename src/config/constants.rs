//! Configuration constants.
//!
//! This module defines the defaults and protocol limits used throughout the
//! application, including DNS timeouts, retry parameters and SPF limits.

// DNS operation parameters
/// DNS query timeout in seconds
/// Most TXT lookups complete well under a second; 5s leaves room for slow authoritative servers
pub const DNS_TIMEOUT_SECS: u64 = 5;
/// Number of retries for transient DNS failures (SERVFAIL, timeout)
pub const DNS_RETRY_ATTEMPTS: usize = 1;
/// Base delay before the first DNS retry, in milliseconds
pub const DNS_RETRY_BASE_DELAY_MS: u64 = 200;
/// Upper bound for any single retry delay, in seconds
pub const DNS_RETRY_MAX_DELAY_SECS: u64 = 2;

// DKIM
/// Selectors tried when none are supplied on the command line
pub const DEFAULT_DKIM_SELECTORS: &[&str] = &["default", "google"];
/// Maximum number of DKIM selector queries in flight at once
pub const DKIM_MAX_CONCURRENCY: usize = 5;
/// Label inserted between the selector and the domain (RFC 6376 Section 3.6.2.1)
pub const DKIM_DOMAINKEY_LABEL: &str = "_domainkey";

// SPF
/// Maximum number of DNS-querying terms allowed in an SPF evaluation (RFC 7208 Section 4.6.4)
pub const SPF_MAX_DNS_LOOKUPS: usize = 10;
/// Version token every SPF record must begin with
pub const SPF_VERSION: &str = "v=spf1";

// DMARC
/// Owner name prefix for DMARC policy records
pub const DMARC_LABEL: &str = "_dmarc";
/// Required value of the leading `v` tag (compared case-sensitively)
pub const DMARC_VERSION: &str = "DMARC1";
/// Default `pct` when the tag is absent
pub const DMARC_DEFAULT_PERCENTAGE: u8 = 100;

// Domain name limits (RFC 1035 Section 2.3.4)
pub const MAX_DOMAIN_LENGTH: usize = 253;
pub const MAX_LABEL_LENGTH: usize = 63;

// Report rendering
/// Width of the `=` bars framing each report section
pub const REPORT_WIDTH: usize = 50;
/// Column width reserved for the label of each status line
pub const REPORT_LABEL_WIDTH: usize = 15;
