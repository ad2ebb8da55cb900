//! DMARC record model (RFC 7489).

use std::collections::BTreeMap;

use thiserror::Error;

/// DMARC policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// No action, monitoring only.
    None,
    /// Treat as suspicious (spam folder).
    Quarantine,
    /// Reject the message.
    Reject,
}

impl Policy {
    /// Parse policy string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Some(Policy::None),
            "quarantine" => Some(Policy::Quarantine),
            "reject" => Some(Policy::Reject),
            _ => Option::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Policy::None => "none",
            Policy::Quarantine => "quarantine",
            Policy::Reject => "reject",
        }
    }

    /// Whether receivers are asked to act on failing mail.
    pub fn enforces(&self) -> bool {
        !matches!(self, Policy::None)
    }
}

/// Alignment mode for DKIM/SPF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentMode {
    /// Organizational domain match.
    #[default]
    Relaxed,
    /// Exact domain match.
    Strict,
}

impl AlignmentMode {
    /// Parse alignment mode: "r" → Relaxed, "s" → Strict.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "r" => Some(AlignmentMode::Relaxed),
            "s" => Some(AlignmentMode::Strict),
            _ => Option::None,
        }
    }
}

/// Failure reporting option (fo= tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOption {
    /// Generate report if all mechanisms fail.
    Zero,
    /// Generate report if any mechanism fails.
    One,
    /// Generate report if DKIM fails.
    D,
    /// Generate report if SPF fails.
    S,
}

impl FailureOption {
    /// Parse a single failure option character (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "0" => Some(FailureOption::Zero),
            "1" => Some(FailureOption::One),
            "d" => Some(FailureOption::D),
            "s" => Some(FailureOption::S),
            _ => Option::None,
        }
    }
}

/// Problems that make a DMARC record invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DmarcError {
    #[error("No DMARC record found")]
    NoRecord,

    #[error("record must start with 'v=DMARC1', found '{0}'")]
    InvalidVersion(String),

    #[error("malformed tag '{0}' (expected tag=value)")]
    MalformedTag(String),

    #[error("missing required tag '{0}'")]
    MissingTag(String),

    #[error("invalid p value '{0}' (expected none, quarantine or reject)")]
    InvalidPolicy(String),

    #[error("invalid value '{value}' for tag '{tag}'")]
    InvalidTagValue { tag: String, value: String },

    #[error("pct value '{0}' is outside 0-100")]
    PercentageOutOfRange(String),

    #[error("{0} DMARC records published; receivers ignore all of them")]
    MultipleRecords(usize),
}

/// Weak or suspicious configurations. Warnings never affect validity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DmarcWarning {
    /// `pct` below 100 on an enforcing policy.
    PartialEnforcement(u8),
    /// A tag appears more than once; the last value wins.
    DuplicateTag(String),
    /// A `rua`/`ruf` entry is not a usable `mailto:` URI.
    MalformedUri(String),
    /// Tag not defined by RFC 7489 or RFC 9091.
    UnknownTag(String),
    /// `sp=none` under an enforcing `p`.
    WeakSubdomainPolicy,
    /// `fo` without any `ruf` destination.
    FailureOptionsWithoutRuf,
}

impl std::fmt::Display for DmarcWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DmarcWarning::PartialEnforcement(pct) => write!(
                f,
                "pct={pct}: the policy applies to only {pct}% of failing mail"
            ),
            DmarcWarning::DuplicateTag(tag) => {
                write!(f, "tag '{tag}' appears more than once; the last value is used")
            }
            DmarcWarning::MalformedUri(uri) => {
                write!(f, "'{uri}' is not a valid mailto: reporting URI")
            }
            DmarcWarning::UnknownTag(tag) => write!(f, "unknown tag '{tag}' is ignored"),
            DmarcWarning::WeakSubdomainPolicy => f.write_str(
                "sp=none leaves subdomains unprotected while the domain itself enforces a policy",
            ),
            DmarcWarning::FailureOptionsWithoutRuf => {
                f.write_str("fo is set but no ruf address receives failure reports")
            }
        }
    }
}

/// A parsed DMARC record with everything found wrong with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DmarcRecord {
    /// Every well-formed tag, keyed by lowercase name (last occurrence wins)
    pub tags: BTreeMap<String, String>,
    /// `p`; `None` when missing or invalid
    pub policy: Option<Policy>,
    /// `sp`
    pub subdomain_policy: Option<Policy>,
    /// `np` (RFC 9091)
    pub nonexistent_subdomain_policy: Option<Policy>,
    /// `pct`, 0-100
    pub percentage: u8,
    /// `rua` entries as published
    pub reporting_uris: Vec<String>,
    /// `ruf` entries as published
    pub failure_uris: Vec<String>,
    pub dkim_alignment: AlignmentMode,
    pub spf_alignment: AlignmentMode,
    pub failure_options: Vec<FailureOption>,
    /// `ri` in seconds
    pub report_interval: Option<u32>,
    pub valid: bool,
    pub errors: Vec<DmarcError>,
    pub warnings: Vec<DmarcWarning>,
}

impl Default for DmarcRecord {
    fn default() -> Self {
        Self {
            tags: BTreeMap::new(),
            policy: None,
            subdomain_policy: None,
            nonexistent_subdomain_policy: None,
            percentage: crate::config::DMARC_DEFAULT_PERCENTAGE,
            reporting_uris: Vec::new(),
            failure_uris: Vec::new(),
            dkim_alignment: AlignmentMode::Relaxed,
            spf_alignment: AlignmentMode::Relaxed,
            failure_options: Vec::new(),
            report_interval: None,
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl DmarcRecord {
    /// Parses a raw TXT record; `None` means nothing was published.
    pub fn parse(raw: Option<&str>) -> Self {
        super::parser::parse_dmarc(raw)
    }

    pub(crate) fn add_error(&mut self, error: DmarcError) {
        self.errors.push(error);
        self.valid = false;
    }
}
