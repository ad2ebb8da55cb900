//! Error type definitions.
//!
//! This module defines the error types shared across the application: DNS
//! lookup failures, initialization failures and usage errors.

use log::SetLoggerError;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Outcome of a failed DNS query.
///
/// `NxDomain` and `NoAnswer` are authoritative answers and therefore terminal;
/// the remaining variants may succeed on a later attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    /// The queried name does not exist.
    #[error("NXDOMAIN: domain does not exist")]
    NxDomain,

    /// The name exists but holds no records of the requested type.
    #[error("no answer: name exists but has no TXT record")]
    NoAnswer,

    /// No response arrived within the configured timeout.
    #[error("DNS query timed out")]
    Timeout,

    /// The server answered SERVFAIL.
    #[error("SERVFAIL: server failure")]
    ServerFailure,

    /// Any other resolver or transport failure.
    #[error("DNS error: {0}")]
    Other(String),
}

impl DnsError {
    /// Whether a retry may produce a different result.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DnsError::Timeout | DnsError::ServerFailure | DnsError::Other(_)
        )
    }

    /// Whether the error means the name (or its TXT set) is simply absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DnsError::NxDomain | DnsError::NoAnswer)
    }
}

impl Serialize for DnsError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// Errors that stop the run before any check starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// Neither the command line nor stdin supplied a domain.
    #[error("no domain provided; pass a domain or use -d/--domain")]
    MissingDomain,

    /// The supplied text is not a usable domain name.
    #[error("invalid domain '{input}': {reason}")]
    InvalidDomain {
        /// What the user typed
        input: String,
        /// Why it was rejected
        reason: String,
    },
}
