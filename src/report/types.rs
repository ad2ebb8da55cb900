//! Report data model.
//!
//! Every check produces a [`Section`] of [`CheckResult`] lines; the renderers
//! only ever see these types.

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Outcome of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, EnumIter)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// Configured correctly
    Pass,
    /// Works, but weaker than it should be
    Warn,
    /// Missing, broken or unreachable
    Fail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Warn => "WARN",
            Status::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub status: Status,
    pub label: String,
    pub message: String,
}

impl CheckResult {
    pub fn new(status: Status, label: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            label: label.into(),
            message: message.into(),
        }
    }

    pub fn pass(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Status::Pass, label, message)
    }

    pub fn warn(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Status::Warn, label, message)
    }

    pub fn fail(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Status::Fail, label, message)
    }
}

/// The mechanism a report section covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Mechanism {
    Spf,
    Dkim,
    Dmarc,
}

impl Mechanism {
    /// Section heading.
    pub fn title(&self) -> &'static str {
        match self {
            Mechanism::Spf => "SPF (Sender Policy Framework) Check",
            Mechanism::Dkim => "DKIM (DomainKeys Identified Mail) Check",
            Mechanism::Dmarc => {
                "DMARC (Domain-based Message Authentication, Reporting & Conformance) Check"
            }
        }
    }
}

/// All findings for one mechanism plus its overall status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub mechanism: Mechanism,
    pub title: String,
    pub status: Status,
    pub results: Vec<CheckResult>,
}

impl Section {
    pub fn new(mechanism: Mechanism, status: Status, results: Vec<CheckResult>) -> Self {
        Self {
            mechanism,
            title: mechanism.title().to_string(),
            status,
            results,
        }
    }
}

/// Number of result lines per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub pass: usize,
    pub warn: usize,
    pub fail: usize,
}

impl Summary {
    fn from_sections(sections: &[Section]) -> Self {
        let mut summary = Summary::default();
        for status in Status::iter() {
            let count = sections
                .iter()
                .flat_map(|section| section.results.iter())
                .filter(|result| result.status == status)
                .count();
            match status {
                Status::Pass => summary.pass = count,
                Status::Warn => summary.warn = count,
                Status::Fail => summary.fail = count,
            }
        }
        summary
    }
}

/// Results of checking one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Domain that was checked
    pub domain: String,
    /// When the check ran (RFC 3339)
    pub checked_at: String,
    /// One section per mechanism, in SPF, DKIM, DMARC order
    pub sections: Vec<Section>,
    /// Line counts per status
    pub summary: Summary,
}

impl CheckReport {
    pub fn new(domain: impl Into<String>, sections: Vec<Section>) -> Self {
        let summary = Summary::from_sections(&sections);
        Self {
            domain: domain.into(),
            checked_at: chrono::Utc::now().to_rfc3339(),
            sections,
            summary,
        }
    }

    /// The section for `mechanism`, if it was checked.
    pub fn section(&self, mechanism: Mechanism) -> Option<&Section> {
        self.sections.iter().find(|s| s.mechanism == mechanism)
    }

    /// All result lines in report order.
    pub fn results(&self) -> impl Iterator<Item = &CheckResult> {
        self.sections.iter().flat_map(|s| s.results.iter())
    }
}
