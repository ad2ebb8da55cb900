//! Record retrieval and extraction.
//!
//! This module fetches the TXT set at the right owner name and picks out the
//! SPF or DMARC record from it, keeping track of how many candidates were
//! published and whether the lookup itself failed.

use log::{debug, warn};

use super::lookup::DnsLookup;
use crate::config::{DMARC_LABEL, DMARC_VERSION, SPF_VERSION};
use crate::error_handling::DnsError;

/// Which policy record a [`RawRecord`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// SPF policy at the domain apex
    Spf,
    /// DMARC policy at `_dmarc.<domain>`
    Dmarc,
}

/// The raw outcome of fetching one policy record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Name that was queried
    pub owner_name: String,
    /// Record type being looked for
    pub record_type: RecordKind,
    /// First matching record, if any was published
    pub text: Option<String>,
    /// Set when the lookup failed for a reason other than absence
    pub lookup_error: Option<DnsError>,
    /// Number of matching records published at the name
    pub candidates: usize,
}

impl RawRecord {
    fn absent(owner_name: String, record_type: RecordKind) -> Self {
        Self {
            owner_name,
            record_type,
            text: None,
            lookup_error: None,
            candidates: 0,
        }
    }
}

/// Extracts SPF records from TXT records.
///
/// An SPF record's first whitespace-separated token is `v=spf1`, compared
/// case-insensitively.
///
/// # Arguments
///
/// * `txt_records` - Vector of TXT record strings
///
/// # Returns
///
/// Every SPF record found, trimmed, in the order published.
pub fn extract_spf_records(txt_records: &[String]) -> Vec<String> {
    txt_records
        .iter()
        .filter(|txt| {
            txt.split_whitespace()
                .next()
                .is_some_and(|token| token.eq_ignore_ascii_case(SPF_VERSION))
        })
        .map(|s| s.trim().to_string())
        .collect()
}

/// Extracts DMARC records from TXT records.
///
/// A DMARC record's first tag is `v=DMARC1`. The version value is matched
/// case-insensitively here so that a miscased version is still handed to the
/// parser, which reports it.
///
/// # Arguments
///
/// * `txt_records` - Vector of TXT record strings from `_dmarc.<domain>`
///
/// # Returns
///
/// Every DMARC record found, trimmed, in the order published.
pub fn extract_dmarc_records(txt_records: &[String]) -> Vec<String> {
    txt_records
        .iter()
        .filter(|txt| {
            let first = txt.split(';').next().unwrap_or("");
            match first.split_once('=') {
                Some((tag, value)) => {
                    tag.trim().eq_ignore_ascii_case("v")
                        && value.trim().eq_ignore_ascii_case(DMARC_VERSION)
                }
                None => false,
            }
        })
        .map(|s| s.trim().to_string())
        .collect()
}

/// Name holding the DMARC record for `domain`.
pub fn dmarc_owner_name(domain: &str) -> String {
    format!("{DMARC_LABEL}.{domain}")
}

/// Fetches the SPF record published at `domain`.
pub async fn fetch_spf<L: DnsLookup>(lookup: &L, domain: &str) -> RawRecord {
    fetch(lookup, domain.to_string(), RecordKind::Spf).await
}

/// Fetches the DMARC record published at `_dmarc.<domain>`.
pub async fn fetch_dmarc<L: DnsLookup>(lookup: &L, domain: &str) -> RawRecord {
    fetch(lookup, dmarc_owner_name(domain), RecordKind::Dmarc).await
}

async fn fetch<L: DnsLookup>(lookup: &L, owner_name: String, kind: RecordKind) -> RawRecord {
    match lookup.lookup_txt(&owner_name).await {
        Ok(txt_records) => {
            let candidates = match kind {
                RecordKind::Spf => extract_spf_records(&txt_records),
                RecordKind::Dmarc => extract_dmarc_records(&txt_records),
            };
            debug!(
                "{owner_name}: {} TXT record(s), {} {kind:?} candidate(s)",
                txt_records.len(),
                candidates.len()
            );
            RawRecord {
                text: candidates.first().cloned(),
                candidates: candidates.len(),
                ..RawRecord::absent(owner_name, kind)
            }
        }
        Err(e) if e.is_not_found() => {
            debug!("{owner_name}: no TXT records ({e})");
            RawRecord::absent(owner_name, kind)
        }
        Err(e) => {
            warn!("Failed to lookup {kind:?} record at {owner_name}: {e}");
            RawRecord {
                lookup_error: Some(e),
                ..RawRecord::absent(owner_name, kind)
            }
        }
    }
}
