//! TXT record queries against real DNS.
//!
//! This module provides [`HickoryLookup`], the [`DnsLookup`] implementation
//! backed by `hickory-resolver`.

use std::sync::Arc;

use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;
use log::debug;

use super::lookup::DnsLookup;
use crate::error_handling::DnsError;

/// [`DnsLookup`] backed by a shared `TokioAsyncResolver`.
#[derive(Clone)]
pub struct HickoryLookup {
    resolver: Arc<TokioAsyncResolver>,
}

impl HickoryLookup {
    /// Creates a lookup adapter around an initialized resolver.
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        Self { resolver }
    }
}

impl DnsLookup for HickoryLookup {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        // Query the absolute name so search domains never get appended
        let fqdn = fully_qualified(name);
        debug!("TXT lookup for {fqdn}");

        match self.resolver.lookup(fqdn.as_str(), RecordType::TXT).await {
            Ok(lookup) => {
                let txt_records: Vec<String> = lookup
                    .iter()
                    .filter_map(|rdata| {
                        if let RData::TXT(txt) = rdata {
                            // TXT records can contain multiple strings - join them
                            Some(
                                txt.iter()
                                    .map(|bytes| String::from_utf8_lossy(bytes).to_string())
                                    .collect::<Vec<String>>()
                                    .join(""),
                            )
                        } else {
                            None
                        }
                    })
                    .collect();
                debug!("{} TXT record(s) at {fqdn}", txt_records.len());
                Ok(txt_records)
            }
            Err(e) => {
                let classified = classify_resolve_error(&e);
                debug!("TXT lookup for {fqdn} failed: {e} ({classified:?})");
                Err(classified)
            }
        }
    }
}

/// Appends the root label unless the name already ends with it.
pub(crate) fn fully_qualified(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}

/// Maps a hickory resolver error onto [`DnsError`].
///
/// hickory reports every non-success rcode as `NoRecordsFound`; only
/// `NOERROR` with an empty answer means the TXT set is absent.
pub(crate) fn classify_resolve_error(e: &ResolveError) -> DnsError {
    match e.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => match *response_code {
            ResponseCode::NoError => DnsError::NoAnswer,
            ResponseCode::NXDomain => DnsError::NxDomain,
            ResponseCode::ServFail => DnsError::ServerFailure,
            other => DnsError::Other(other.to_string()),
        },
        ResolveErrorKind::Timeout => DnsError::Timeout,
        _ => classify_error_message(&e.to_string()),
    }
}

/// Fallback classification for errors that only carry a message.
pub(crate) fn classify_error_message(message: &str) -> DnsError {
    let lower = message.to_lowercase();
    if lower.contains("nxdomain") {
        DnsError::NxDomain
    } else if lower.contains("no record found") || lower.contains("no records found") {
        DnsError::NoAnswer
    } else if lower.contains("timeout") || lower.contains("timed out") {
        DnsError::Timeout
    } else if lower.contains("servfail") {
        DnsError::ServerFailure
    } else {
        DnsError::Other(message.to_string())
    }
}
