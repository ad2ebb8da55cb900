//! Error handling.
//!
//! This module provides:
//! - Error type definitions (DNS, initialization, usage)
//! - Retry strategy configuration for transient DNS failures
//!
//! Parse errors and configuration warnings for SPF and DMARC live next to
//! their parsers; they are findings to report, not failures of the run.

mod categorization;
mod types;

// Re-export public API
pub use categorization::get_retry_strategy;
pub use types::{DnsError, InitializationError, UsageError};
