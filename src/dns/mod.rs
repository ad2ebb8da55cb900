//! DNS resolution and record retrieval.
//!
//! This module provides async DNS operations:
//! - The [`DnsLookup`] trait, the only way the checks reach DNS
//! - A `hickory-resolver` implementation and a retrying wrapper
//! - An in-memory implementation for tests
//! - SPF/DMARC record extraction from TXT sets
//!
//! All operations are async and respect the configured timeout and retry policy.

mod extract;
mod lookup;
mod records;
mod static_lookup;

// Re-export public API
pub use extract::{
    dmarc_owner_name, extract_dmarc_records, extract_spf_records, fetch_dmarc, fetch_spf,
    RawRecord, RecordKind,
};
pub use lookup::{DnsLookup, DnsSettings, Retrying};
pub use records::HickoryLookup;
pub use static_lookup::StaticLookup;
