//! SPF (Sender Policy Framework) parsing and evaluation.
//!
//! This module validates a published SPF record against the RFC 7208 grammar
//! and flags risky configurations:
//! - Unknown mechanisms and malformed arguments (errors, record invalid)
//! - Too many DNS lookups, unreachable mechanisms, dead `redirect` (warnings)
//!
//! Records are validated only; nothing is evaluated against a sender IP.

mod parser;
mod types;

use log::debug;

use crate::dns::{fetch_spf, DnsLookup, RawRecord};
use crate::report::{CheckResult, Mechanism, Section, Status};

// Re-export public API
pub use parser::parse_spf;
pub use types::{MechanismKind, Qualifier, SpfError, SpfMechanism, SpfRecord, SpfWarning};

const RECORD_LABEL: &str = "SPF Record";
const ERROR_LABEL: &str = "SPF Error";
const WARNING_LABEL: &str = "SPF Warning";

/// Fetches and checks the SPF record for `domain`.
pub async fn check_spf<L: DnsLookup>(lookup: &L, domain: &str) -> Section {
    let raw = fetch_spf(lookup, domain).await;
    evaluate_spf(&raw)
}

/// Parses a fetched record, applying the one-record-only rule.
pub fn parse_raw_spf(raw: &RawRecord) -> SpfRecord {
    let mut record = parse_spf(raw.text.as_deref());
    if raw.candidates > 1 {
        record.add_error(SpfError::MultipleRecords(raw.candidates));
    }
    record
}

/// Turns a fetched SPF record into a report section.
pub fn evaluate_spf(raw: &RawRecord) -> Section {
    if let Some(error) = &raw.lookup_error {
        return Section::new(
            Mechanism::Spf,
            Status::Fail,
            vec![CheckResult::fail(
                RECORD_LABEL,
                format!("DNS lookup for {} failed: {error}", raw.owner_name),
            )],
        );
    }

    let Some(text) = raw.text.as_deref() else {
        return Section::new(
            Mechanism::Spf,
            Status::Fail,
            vec![CheckResult::fail(RECORD_LABEL, "No SPF record found.")],
        );
    };

    let record = parse_raw_spf(raw);
    debug!(
        "SPF for {}: {} mechanism(s), {} lookup(s), {} error(s), {} warning(s)",
        raw.owner_name,
        record.mechanisms.len(),
        record.lookup_count(),
        record.errors.len(),
        record.warnings.len()
    );

    let mut results = Vec::new();
    let status = if record.valid {
        results.push(CheckResult::pass(RECORD_LABEL, format!("Found: {text}")));
        if record.warnings.is_empty() {
            Status::Pass
        } else {
            Status::Warn
        }
    } else {
        results.push(CheckResult::fail(
            RECORD_LABEL,
            format!("Invalid SPF record: {text}"),
        ));
        results.extend(
            record
                .errors
                .iter()
                .map(|e| CheckResult::fail(ERROR_LABEL, e.to_string())),
        );
        Status::Fail
    };
    results.extend(
        record
            .warnings
            .iter()
            .map(|w| CheckResult::warn(WARNING_LABEL, w.to_string())),
    );

    Section::new(Mechanism::Spf, status, results)
}
