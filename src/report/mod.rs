//! Check results and their rendering.

mod render;
mod types;

pub use render::{render_json, render_plain};
pub use types::{CheckReport, CheckResult, Mechanism, Section, Status, Summary};

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> CheckReport {
        CheckReport::new(
            "example.com",
            vec![
                Section::new(
                    Mechanism::Spf,
                    Status::Pass,
                    vec![CheckResult::pass("SPF Record", "Found: v=spf1 -all")],
                ),
                Section::new(
                    Mechanism::Dkim,
                    Status::Warn,
                    vec![CheckResult::warn(
                        "DKIM Record",
                        "No DKIM records found for selectors: default, google",
                    )],
                ),
                Section::new(
                    Mechanism::Dmarc,
                    Status::Fail,
                    vec![
                        CheckResult::fail("DMARC Record", "No DMARC record found."),
                        CheckResult::fail("DMARC Error", "missing required tag 'p'"),
                    ],
                ),
            ],
        )
    }

    #[test]
    fn test_summary_counts() {
        let report = sample_report();
        assert_eq!(
            report.summary,
            Summary {
                pass: 1,
                warn: 1,
                fail: 2
            }
        );
        assert_eq!(report.results().count(), 4);
    }

    #[test]
    fn test_section_lookup() {
        let report = sample_report();
        assert_eq!(report.section(Mechanism::Dkim).unwrap().status, Status::Warn);
        assert!(report.section(Mechanism::Dmarc).unwrap().title.starts_with("DMARC"));
    }

    #[test]
    fn test_status_ordering_worst_last() {
        assert!(Status::Pass < Status::Warn);
        assert!(Status::Warn < Status::Fail);
    }

    #[test]
    fn test_render_plain_without_color() {
        let text = render_plain(&sample_report(), false);
        assert!(text.contains("SPF Record      [PASS] Found: v=spf1 -all\n"));
        assert!(text.contains("DMARC Error     [FAIL] missing required tag 'p'\n"));
        assert!(text.contains(&"=".repeat(50)));
        assert!(text.contains("Check Complete"));
        assert!(text.contains("1 passed, 1 warning(s), 2 failed"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_render_plain_section_order() {
        let text = render_plain(&sample_report(), false);
        let spf = text.find("SPF (Sender Policy Framework) Check").unwrap();
        let dkim = text.find("DKIM (DomainKeys Identified Mail) Check").unwrap();
        let dmarc = text.find("DMARC (Domain-based").unwrap();
        assert!(spf < dkim && dkim < dmarc);
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["domain"], "example.com");
        assert_eq!(value["sections"][0]["mechanism"], "spf");
        assert_eq!(value["sections"][0]["results"][0]["status"], "PASS");
        assert_eq!(value["sections"][2]["status"], "FAIL");
        assert_eq!(value["summary"]["fail"], 2);
    }
}
