//! Integration tests for the mailauth_check library.
//!
//! These tests drive `check_domain()` end to end against an in-memory DNS
//! table, so they make no network requests.
//!
//! Tests marked `#[ignore]` query live DNS. To run them: `cargo test -- --ignored`

use mailauth_check::dns::StaticLookup;
use mailauth_check::{
    check_domain, render_json, render_plain, DnsError, Mechanism, Status,
};

fn selectors(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn well_configured() -> StaticLookup {
    StaticLookup::new()
        .with_txt("example.com", "v=spf1 include:_spf.example.net -all")
        .with_txt("example.com", "google-site-verification=abc123")
        .with_txt("google._domainkey.example.com", "v=DKIM1; k=rsa; p=MIGfMA0")
        .with_txt(
            "_dmarc.example.com",
            "v=DMARC1; p=reject; rua=mailto:dmarc@example.com",
        )
}

#[tokio::test]
async fn test_well_configured_domain_passes() {
    let lookup = well_configured();
    let report = check_domain(&lookup, "example.com", &selectors(&["default", "google"]), 5).await;

    assert_eq!(report.domain, "example.com");
    let mechanisms: Vec<Mechanism> = report.sections.iter().map(|s| s.mechanism).collect();
    assert_eq!(
        mechanisms,
        vec![Mechanism::Spf, Mechanism::Dkim, Mechanism::Dmarc]
    );
    for section in &report.sections {
        assert_eq!(section.status, Status::Pass, "{:?}", section);
    }
    assert_eq!(report.summary.fail, 0);
    assert_eq!(report.summary.warn, 0);
    assert_eq!(report.summary.pass, 4);
}

#[tokio::test]
async fn test_domain_with_nothing_published() {
    let lookup = StaticLookup::new();
    let report = check_domain(&lookup, "example.com", &selectors(&["default", "google"]), 5).await;

    let spf = report.section(Mechanism::Spf).expect("SPF section");
    assert_eq!(spf.status, Status::Fail);
    assert_eq!(spf.results[0].message, "No SPF record found.");

    let dkim = report.section(Mechanism::Dkim).expect("DKIM section");
    assert_eq!(dkim.status, Status::Warn);
    assert_eq!(
        dkim.results[0].message,
        "No DKIM records found for selectors: default, google"
    );

    let dmarc = report.section(Mechanism::Dmarc).expect("DMARC section");
    assert_eq!(dmarc.status, Status::Fail);
    assert_eq!(dmarc.results[0].message, "No DMARC record found.");
}

#[tokio::test]
async fn test_one_failing_lookup_does_not_stop_other_checks() {
    let lookup = well_configured().with_error("example.com", DnsError::ServerFailure);
    let report = check_domain(&lookup, "example.com", &selectors(&["google"]), 5).await;

    let spf = report.section(Mechanism::Spf).expect("SPF section");
    assert_eq!(spf.status, Status::Fail);
    assert!(spf.results[0].message.contains("SERVFAIL"));

    assert_eq!(
        report.section(Mechanism::Dkim).map(|s| s.status),
        Some(Status::Pass)
    );
    assert_eq!(
        report.section(Mechanism::Dmarc).map(|s| s.status),
        Some(Status::Pass)
    );
}

#[tokio::test]
async fn test_weak_configuration_warns() {
    let lookup = StaticLookup::new()
        .with_txt("example.com", "v=spf1 mx +all")
        .with_txt("_dmarc.example.com", "v=DMARC1; p=none");
    let report = check_domain(&lookup, "example.com", &selectors(&["default"]), 5).await;

    for mechanism in [Mechanism::Spf, Mechanism::Dkim, Mechanism::Dmarc] {
        assert_eq!(
            report.section(mechanism).map(|s| s.status),
            Some(Status::Warn),
            "{mechanism:?}"
        );
    }
    assert!(report
        .results()
        .any(|r| r.message.starts_with("Policy is 'none'")));
}

#[tokio::test]
async fn test_invalid_records_are_reported_not_fatal() {
    let lookup = StaticLookup::new()
        .with_txt("example.com", "v=spf1 ip4:999.0.0.1 -all")
        .with_txt("_dmarc.example.com", "v=DMARC1; pct=50");
    let report = check_domain(&lookup, "example.com", &selectors(&["default"]), 5).await;

    let spf = report.section(Mechanism::Spf).expect("SPF section");
    assert_eq!(spf.status, Status::Fail);
    assert!(spf
        .results
        .iter()
        .any(|r| r.label == "SPF Error" && r.message.contains("999.0.0.1")));

    let dmarc = report.section(Mechanism::Dmarc).expect("DMARC section");
    assert_eq!(dmarc.status, Status::Fail);
    assert_eq!(
        dmarc.results[0].message,
        "Invalid DMARC record: v=DMARC1; pct=50"
    );
}

#[tokio::test]
async fn test_rendered_output() {
    let lookup = well_configured();
    let report = check_domain(&lookup, "example.com", &selectors(&["google"]), 5).await;

    let plain = render_plain(&report, false);
    assert!(plain.contains("SPF (Sender Policy Framework) Check"));
    assert!(plain.contains("DKIM (DomainKeys Identified Mail) Check"));
    assert!(plain.contains("Found a DKIM record with selector: 'google'"));
    assert!(plain.contains("Check Complete"));
    assert!(!plain.contains('\u{1b}'));

    let json: serde_json::Value =
        serde_json::from_str(&render_json(&report).expect("serializes")).expect("valid JSON");
    assert_eq!(json["domain"], "example.com");
    assert_eq!(json["sections"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["sections"][0]["status"], "PASS");
    assert_eq!(json["summary"]["fail"], 0);
}

/// End-to-end test against live DNS (requires network access)
#[tokio::test]
#[ignore]
async fn test_run_check_live_dns() {
    let config = mailauth_check::Config::default();
    let report = mailauth_check::run_check(&config, "google.com")
        .await
        .expect("resolver initializes");
    assert_eq!(report.sections.len(), 3);
    assert_eq!(
        report.section(Mechanism::Spf).map(|s| s.status),
        Some(Status::Pass)
    );
}
