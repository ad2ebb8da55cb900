//! Domain input normalization.
//!
//! Turns whatever the user typed (a bare host, a host with a trailing dot,
//! or a full URL) into the lowercase domain name the checks query.

use std::io::BufRead;

use crate::config::{Config, MAX_DOMAIN_LENGTH, MAX_LABEL_LENGTH};
use crate::error_handling::UsageError;

/// Normalizes and validates a domain supplied by the user.
///
/// # Arguments
///
/// * `input` - Raw input, e.g. `Example.COM.` or `https://www.example.com/path`
///
/// # Returns
///
/// The lowercase domain without trailing dot (e.g. `example.com`).
///
/// # Errors
///
/// Returns `UsageError::MissingDomain` for blank input and
/// `UsageError::InvalidDomain` when the input is not a syntactically valid
/// host name (IP addresses included).
pub fn normalize_domain(input: &str) -> Result<String, UsageError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UsageError::MissingDomain);
    }

    let host = if trimmed.contains("://") {
        let parsed = url::Url::parse(trimmed).map_err(|e| invalid(trimmed, &e.to_string()))?;
        match parsed.host() {
            Some(url::Host::Domain(domain)) => domain.to_string(),
            Some(_) => return Err(invalid(trimmed, "IP addresses have no mail policy records")),
            None => return Err(invalid(trimmed, "URL has no host component")),
        }
    } else {
        trimmed.to_string()
    };

    let domain = host.trim_end_matches('.').to_ascii_lowercase();
    validate_domain_name(&domain).map_err(|reason| invalid(trimmed, &reason))?;
    Ok(domain)
}

/// Checks host name syntax (RFC 1035 Section 2.3.1, relaxed to allow `_`).
///
/// Returns a human-readable reason on failure.
pub fn validate_domain_name(domain: &str) -> Result<(), String> {
    if domain.is_empty() {
        return Err("empty domain".to_string());
    }
    if domain.len() > MAX_DOMAIN_LENGTH {
        return Err(format!("longer than {MAX_DOMAIN_LENGTH} characters"));
    }
    if domain.parse::<std::net::IpAddr>().is_ok() {
        return Err("IP addresses have no mail policy records".to_string());
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err("empty label".to_string());
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Err(format!("label '{label}' longer than {MAX_LABEL_LENGTH} characters"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("label '{label}' starts or ends with a hyphen"));
        }
        if let Some(c) = label
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(format!("invalid character '{c}' in label '{label}'"));
        }
    }
    Ok(())
}

/// The domain to check: from the command line when given, else the first
/// line of `input`.
///
/// # Errors
///
/// `UsageError::MissingDomain` when neither source supplies one (EOF or a
/// blank line), or whatever [`normalize_domain`] rejects.
pub fn resolve_domain<R: BufRead>(config: &Config, mut input: R) -> Result<String, UsageError> {
    if let Some(domain) = config.requested_domain() {
        return normalize_domain(domain);
    }

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => Err(UsageError::MissingDomain),
        Ok(_) => normalize_domain(&line),
    }
}

fn invalid(input: &str, reason: &str) -> UsageError {
    UsageError::InvalidDomain {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
