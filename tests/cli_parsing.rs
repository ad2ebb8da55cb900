//! Tests for command-line parsing.

use clap::Parser;
use mailauth_check::{Config, LogFormat, LogLevel, Nameservers, OutputFormat};

#[test]
fn test_cli_domain_flag() {
    let config = Config::try_parse_from(["mailauth_check", "-d", "example.com"])
        .expect("Should parse -d");
    assert_eq!(config.requested_domain(), Some("example.com"));

    let config = Config::try_parse_from(["mailauth_check", "--domain", "example.com"])
        .expect("Should parse --domain");
    assert_eq!(config.requested_domain(), Some("example.com"));
}

#[test]
fn test_cli_positional_domain() {
    let config =
        Config::try_parse_from(["mailauth_check", "example.com"]).expect("Should parse domain");
    assert_eq!(config.requested_domain(), Some("example.com"));
}

#[test]
fn test_cli_positional_and_flag_conflict() {
    let result = Config::try_parse_from(["mailauth_check", "a.example", "-d", "b.example"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_no_domain_is_allowed() {
    // The domain then comes from stdin
    let config = Config::try_parse_from(["mailauth_check"]).expect("Should parse");
    assert_eq!(config.requested_domain(), None);
}

#[test]
fn test_cli_defaults() {
    let config = Config::try_parse_from(["mailauth_check", "example.com"]).expect("Should parse");
    assert_eq!(config.dkim_selectors(), vec!["default", "google"]);
    assert_eq!(config.format, OutputFormat::Plain);
    assert_eq!(config.log_level, LogLevel::Warn);
    assert_eq!(config.log_format, LogFormat::Plain);
    assert_eq!(config.resolver, Nameservers::System);
    assert_eq!(config.dns_timeout, 5);
    assert_eq!(config.dns_retries, 1);
    assert_eq!(config.dkim_concurrency(), 5);
    assert!(!config.no_color);
}

#[test]
fn test_cli_dkim_selector_list() {
    let config = Config::try_parse_from([
        "mailauth_check",
        "-d",
        "example.com",
        "--dkim",
        "selector1, Selector2,,selector1",
    ])
    .expect("Should parse --dkim");
    assert_eq!(config.dkim_selectors(), vec!["selector1", "selector2"]);
}

#[test]
fn test_cli_all_options() {
    let config = Config::try_parse_from([
        "mailauth_check",
        "example.com",
        "--format",
        "json",
        "--no-color",
        "--log-level",
        "debug",
        "--log-format",
        "json",
        "--dns-timeout",
        "2",
        "--dns-retries",
        "0",
        "--resolver",
        "cloudflare",
        "--dkim-concurrency",
        "3",
    ])
    .expect("Should parse all options");

    assert_eq!(config.format, OutputFormat::Json);
    assert!(config.no_color);
    assert_eq!(
        log::LevelFilter::from(config.log_level),
        log::LevelFilter::Debug
    );
    assert_eq!(config.log_format, LogFormat::Json);
    assert_eq!(config.dns_timeout, 2);
    assert_eq!(config.dns_retries, 0);
    assert_eq!(config.resolver, Nameservers::Cloudflare);
    assert_eq!(config.dkim_concurrency(), 3);
}

#[test]
fn test_cli_rejects_unknown_values() {
    assert!(Config::try_parse_from(["mailauth_check", "example.com", "--format", "xml"]).is_err());
    assert!(
        Config::try_parse_from(["mailauth_check", "example.com", "--resolver", "opendns"]).is_err()
    );
    assert!(
        Config::try_parse_from(["mailauth_check", "example.com", "--dns-timeout", "soon"]).is_err()
    );
}

#[test]
fn test_cli_rejects_zero_dns_timeout() {
    let result = Config::try_parse_from(["mailauth_check", "example.com", "--dns-timeout", "0"]);
    assert!(result.is_err());

    let config = Config::try_parse_from(["mailauth_check", "example.com", "--dns-timeout", "1"])
        .expect("Should accept a one-second timeout");
    assert_eq!(config.dns_timeout, 1);
}
