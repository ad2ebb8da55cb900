//! DMARC (Domain-based Message Authentication, Reporting & Conformance).
//!
//! Parses the tag list published at `_dmarc.<domain>`, validates each known
//! tag and classifies the policy into a report status.

mod parser;
mod types;

use log::debug;

use crate::dns::{fetch_dmarc, DnsLookup, RawRecord};
use crate::report::{CheckResult, Mechanism, Section, Status};

// Re-export public API
pub use parser::parse_dmarc;
pub use types::{AlignmentMode, DmarcError, DmarcRecord, DmarcWarning, FailureOption, Policy};

const RECORD_LABEL: &str = "DMARC Record";
const POLICY_LABEL: &str = "DMARC Policy";
const ERROR_LABEL: &str = "DMARC Error";
const WARNING_LABEL: &str = "DMARC Warning";

impl DmarcRecord {
    /// The report line describing what the published policy does.
    pub fn classify(&self) -> CheckResult {
        match self.policy {
            Some(Policy::None) => CheckResult::warn(
                POLICY_LABEL,
                "Policy is 'none'. This allows for monitoring but doesn't block spoofing.",
            ),
            Some(Policy::Quarantine) => CheckResult::pass(
                POLICY_LABEL,
                "Policy is 'quarantine'. Suspicious emails will be sent to spam.",
            ),
            Some(Policy::Reject) => CheckResult::pass(
                POLICY_LABEL,
                "Policy is 'reject'. Suspicious emails will be blocked.",
            ),
            None => CheckResult::fail(POLICY_LABEL, "No valid policy (p=) is published."),
        }
    }
}

/// Fetches and checks the DMARC record for `domain`.
pub async fn check_dmarc<L: DnsLookup>(lookup: &L, domain: &str) -> Section {
    let raw = fetch_dmarc(lookup, domain).await;
    evaluate_dmarc(&raw)
}

/// Parses a fetched record, applying the one-record-only rule.
pub fn parse_raw_dmarc(raw: &RawRecord) -> DmarcRecord {
    let mut record = parse_dmarc(raw.text.as_deref());
    if raw.candidates > 1 {
        record.add_error(DmarcError::MultipleRecords(raw.candidates));
    }
    record
}

/// Turns a fetched DMARC record into a report section.
pub fn evaluate_dmarc(raw: &RawRecord) -> Section {
    if let Some(error) = &raw.lookup_error {
        return Section::new(
            Mechanism::Dmarc,
            Status::Fail,
            vec![CheckResult::fail(
                RECORD_LABEL,
                format!("DNS lookup for {} failed: {error}", raw.owner_name),
            )],
        );
    }

    let Some(text) = raw.text.as_deref() else {
        return Section::new(
            Mechanism::Dmarc,
            Status::Fail,
            vec![CheckResult::fail(RECORD_LABEL, "No DMARC record found.")],
        );
    };

    let record = parse_raw_dmarc(raw);
    debug!(
        "DMARC for {}: policy {:?}, pct {}, {} error(s), {} warning(s)",
        raw.owner_name,
        record.policy.map(|p| p.as_str()),
        record.percentage,
        record.errors.len(),
        record.warnings.len()
    );

    let mut results = Vec::new();
    if record.valid {
        results.push(CheckResult::pass(RECORD_LABEL, format!("Found: {text}")));
        results.push(record.classify());
    } else {
        results.push(CheckResult::fail(
            RECORD_LABEL,
            format!("Invalid DMARC record: {text}"),
        ));
        results.extend(
            record
                .errors
                .iter()
                .map(|e| CheckResult::fail(ERROR_LABEL, e.to_string())),
        );
    }
    results.extend(
        record
            .warnings
            .iter()
            .map(|w| CheckResult::warn(WARNING_LABEL, w.to_string())),
    );

    let status = results
        .iter()
        .map(|r| r.status)
        .max()
        .unwrap_or(Status::Fail);
    Section::new(Mechanism::Dmarc, status, results)
}
