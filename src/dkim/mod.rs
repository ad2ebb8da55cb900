//! DKIM presence checks.
//!
//! Only the existence of a TXT record at `<selector>._domainkey.<domain>` is
//! checked. Key syntax and signatures are out of scope.

use futures::stream::{self, StreamExt};
use log::{debug, info};

use crate::config::DKIM_DOMAINKEY_LABEL;
use crate::dns::DnsLookup;
use crate::error_handling::DnsError;
use crate::report::{CheckResult, Mechanism, Section, Status};

const RECORD_LABEL: &str = "DKIM Record";
const CHECK_LABEL: &str = "DKIM Check";

/// What a single selector lookup produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DkimOutcome {
    /// TXT records published at the selector name
    Found(Vec<String>),
    /// Nothing published; common and not an error
    NotFound,
    /// The resolver could not answer
    LookupError(DnsError),
}

impl DkimOutcome {
    fn from_lookup(result: Result<Vec<String>, DnsError>) -> Self {
        match result {
            Ok(records) if records.is_empty() => DkimOutcome::NotFound,
            Ok(records) => DkimOutcome::Found(records),
            Err(DnsError::NxDomain) => DkimOutcome::NotFound,
            Err(e) => DkimOutcome::LookupError(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorResult {
    pub selector: String,
    pub owner_name: String,
    pub outcome: DkimOutcome,
}

/// Per-selector outcomes in the order the selectors were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DkimReport {
    pub results: Vec<SelectorResult>,
}

impl DkimReport {
    /// Selectors with a published record.
    pub fn found(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, DkimOutcome::Found(_)))
            .map(|r| r.selector.as_str())
            .collect()
    }

    /// Pass when any selector was found, Warn otherwise.
    pub fn status(&self) -> Status {
        if self.found().is_empty() {
            Status::Warn
        } else {
            Status::Pass
        }
    }

    /// Report section for these outcomes.
    pub fn to_section(&self) -> Section {
        let mut results = Vec::new();

        if self.results.is_empty() {
            results.push(CheckResult::warn(
                RECORD_LABEL,
                "No DKIM selectors were given to check.",
            ));
            return Section::new(Mechanism::Dkim, Status::Warn, results);
        }

        let found = self.found();
        if found.is_empty() {
            let tried: Vec<&str> = self.results.iter().map(|r| r.selector.as_str()).collect();
            results.push(CheckResult::warn(
                RECORD_LABEL,
                format!("No DKIM records found for selectors: {}", tried.join(", ")),
            ));
        } else {
            results.extend(found.iter().map(|selector| {
                CheckResult::pass(
                    RECORD_LABEL,
                    format!("Found a DKIM record with selector: '{selector}'"),
                )
            }));
        }

        for result in &self.results {
            if let DkimOutcome::LookupError(e) = &result.outcome {
                results.push(CheckResult::fail(
                    CHECK_LABEL,
                    format!("Selector '{}': {e}", result.selector),
                ));
            }
        }

        Section::new(Mechanism::Dkim, self.status(), results)
    }
}

/// `<selector>._domainkey.<domain>`
pub fn dkim_owner_name(selector: &str, domain: &str) -> String {
    format!("{selector}.{DKIM_DOMAINKEY_LABEL}.{domain}")
}

/// Looks up every selector, at most `concurrency` queries in flight.
pub async fn check_selectors<L: DnsLookup>(
    lookup: &L,
    domain: &str,
    selectors: &[String],
    concurrency: usize,
) -> DkimReport {
    let results = stream::iter(selectors)
        .map(|selector| async move {
            let owner_name = dkim_owner_name(selector, domain);
            let outcome = DkimOutcome::from_lookup(lookup.lookup_txt(&owner_name).await);
            debug!("DKIM {owner_name}: {outcome:?}");
            SelectorResult {
                selector: selector.clone(),
                owner_name,
                outcome,
            }
        })
        .buffered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    let report = DkimReport { results };
    info!(
        "DKIM for {domain}: {} of {} selector(s) found",
        report.found().len(),
        selectors.len()
    );
    report
}

/// Checks DKIM presence for `domain` and returns the report section.
pub async fn check_dkim<L: DnsLookup>(
    lookup: &L,
    domain: &str,
    selectors: &[String],
    concurrency: usize,
) -> Section {
    check_selectors(lookup, domain, selectors, concurrency)
        .await
        .to_section()
}

#[cfg(test)]
mod tests;
