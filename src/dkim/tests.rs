use super::*;
use crate::dns::StaticLookup;

fn selectors(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_dkim_owner_name() {
    assert_eq!(
        dkim_owner_name("selector1", "example.com"),
        "selector1._domainkey.example.com"
    );
}

#[test]
fn test_outcome_classification() {
    assert_eq!(
        DkimOutcome::from_lookup(Ok(vec!["v=DKIM1; p=abc".to_string()])),
        DkimOutcome::Found(vec!["v=DKIM1; p=abc".to_string()])
    );
    assert_eq!(DkimOutcome::from_lookup(Ok(vec![])), DkimOutcome::NotFound);
    assert_eq!(
        DkimOutcome::from_lookup(Err(DnsError::NxDomain)),
        DkimOutcome::NotFound
    );
    assert_eq!(
        DkimOutcome::from_lookup(Err(DnsError::NoAnswer)),
        DkimOutcome::LookupError(DnsError::NoAnswer)
    );
    assert_eq!(
        DkimOutcome::from_lookup(Err(DnsError::Timeout)),
        DkimOutcome::LookupError(DnsError::Timeout)
    );
}

#[tokio::test]
async fn test_one_of_two_selectors_found() {
    let lookup =
        StaticLookup::new().with_txt("google._domainkey.example.com", "v=DKIM1; k=rsa; p=MIGf");
    let report =
        check_selectors(&lookup, "example.com", &selectors(&["default", "google"]), 5).await;

    assert_eq!(report.status(), Status::Pass);
    assert_eq!(report.found(), vec!["google"]);
    assert_eq!(report.results[0].selector, "default");
    assert_eq!(report.results[0].outcome, DkimOutcome::NotFound);

    let section = report.to_section();
    assert_eq!(section.status, Status::Pass);
    assert_eq!(
        section.results,
        vec![CheckResult::pass(
            "DKIM Record",
            "Found a DKIM record with selector: 'google'"
        )]
    );
}

#[tokio::test]
async fn test_results_keep_input_order() {
    let lookup = StaticLookup::new()
        .with_txt("s1._domainkey.example.com", "v=DKIM1; p=a")
        .with_txt("s3._domainkey.example.com", "v=DKIM1; p=c")
        .with_txt("s4._domainkey.example.com", "v=DKIM1; p=d");
    let report = check_selectors(
        &lookup,
        "example.com",
        &selectors(&["s4", "s1", "s2", "s3"]),
        2,
    )
    .await;
    let order: Vec<&str> = report.results.iter().map(|r| r.selector.as_str()).collect();
    assert_eq!(order, vec!["s4", "s1", "s2", "s3"]);
    assert_eq!(report.found(), vec!["s4", "s1", "s3"]);
    assert_eq!(lookup.queries().len(), 4);
}

#[tokio::test]
async fn test_nothing_found_warns_with_tried_selectors() {
    let lookup = StaticLookup::new();
    let section = check_dkim(&lookup, "example.com", &selectors(&["default", "google"]), 5).await;
    assert_eq!(section.mechanism, Mechanism::Dkim);
    assert_eq!(section.status, Status::Warn);
    assert_eq!(
        section.results,
        vec![CheckResult::warn(
            "DKIM Record",
            "No DKIM records found for selectors: default, google"
        )]
    );
}

#[tokio::test]
async fn test_lookup_errors_surface_as_fail_lines() {
    let lookup = StaticLookup::new()
        .with_error("default._domainkey.example.com", DnsError::NoAnswer)
        .with_error("google._domainkey.example.com", DnsError::ServerFailure);
    let section = check_dkim(&lookup, "example.com", &selectors(&["default", "google"]), 5).await;

    assert_eq!(section.status, Status::Warn);
    assert_eq!(section.results.len(), 3);
    assert_eq!(section.results[0].status, Status::Warn);
    assert_eq!(
        section.results[1],
        CheckResult::fail(
            "DKIM Check",
            "Selector 'default': no answer: name exists but has no TXT record"
        )
    );
    assert_eq!(section.results[2].status, Status::Fail);
    assert!(section.results[2].message.starts_with("Selector 'google':"));
}

#[tokio::test]
async fn test_lookup_error_kept_when_another_selector_found() {
    let lookup = StaticLookup::new()
        .with_txt("google._domainkey.example.com", "v=DKIM1; p=abc")
        .with_error("default._domainkey.example.com", DnsError::Timeout);
    let section = check_dkim(&lookup, "example.com", &selectors(&["default", "google"]), 1).await;

    assert_eq!(section.status, Status::Pass);
    assert_eq!(section.results.len(), 2);
    assert_eq!(section.results[0].status, Status::Pass);
    assert_eq!(section.results[1].status, Status::Fail);
}

#[tokio::test]
async fn test_empty_selector_list() {
    let lookup = StaticLookup::new();
    let section = check_dkim(&lookup, "example.com", &[], 5).await;
    assert_eq!(section.status, Status::Warn);
    assert_eq!(section.results.len(), 1);
    assert!(lookup.queries().is_empty());
}

#[tokio::test]
async fn test_zero_concurrency_still_checks() {
    let lookup = StaticLookup::new().with_txt("default._domainkey.example.com", "v=DKIM1; p=x");
    let report = check_selectors(&lookup, "example.com", &selectors(&["default"]), 0).await;
    assert_eq!(report.found(), vec!["default"]);
}
