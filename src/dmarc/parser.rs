//! DMARC tag-list parser.

use log::debug;

use super::types::{AlignmentMode, DmarcError, DmarcRecord, DmarcWarning, FailureOption, Policy};
use crate::config::DMARC_VERSION;
use crate::domain::validate_domain_name;

/// Parses a DMARC record string. `None` yields a record carrying `NoRecord`.
///
/// Every segment is examined even after an error, so the returned record lists
/// all problems at once.
pub fn parse_dmarc(raw: Option<&str>) -> DmarcRecord {
    let mut record = DmarcRecord::default();

    let Some(text) = raw else {
        record.add_error(DmarcError::NoRecord);
        return record;
    };

    let mut segments = text.split(';').map(str::trim).filter(|s| !s.is_empty());

    match segments.next() {
        Some(first) => match first.split_once('=') {
            Some((name, value))
                if name.trim().eq_ignore_ascii_case("v") && value.trim() == DMARC_VERSION =>
            {
                record.tags.insert("v".to_string(), DMARC_VERSION.to_string());
            }
            _ => {
                record.add_error(DmarcError::InvalidVersion(first.to_string()));
                // A misplaced tag still counts; anything else is already reported
                if first
                    .split_once('=')
                    .is_some_and(|(name, _)| !name.trim().is_empty())
                {
                    insert_tag(&mut record, first);
                }
            }
        },
        None => record.add_error(DmarcError::InvalidVersion(String::new())),
    }

    for segment in segments {
        insert_tag(&mut record, segment);
    }

    apply_tags(&mut record);
    check_semantics(&mut record);
    record
}

/// Adds one `name=value` segment; the last occurrence of a tag wins.
fn insert_tag(record: &mut DmarcRecord, segment: &str) {
    let Some((name, value)) = segment.split_once('=') else {
        record.add_error(DmarcError::MalformedTag(segment.to_string()));
        return;
    };
    let name = name.trim().to_ascii_lowercase();
    if name.is_empty() {
        record.add_error(DmarcError::MalformedTag(segment.to_string()));
        return;
    }
    if record.tags.contains_key(&name) {
        record.warnings.push(DmarcWarning::DuplicateTag(name.clone()));
    }
    record.tags.insert(name, value.trim().to_string());
}

/// Interprets the collected tags into typed fields.
fn apply_tags(record: &mut DmarcRecord) {
    let tags = record.tags.clone();

    match tags.get("p") {
        None => record.add_error(DmarcError::MissingTag("p".to_string())),
        Some(value) => match Policy::parse(value) {
            Some(policy) => record.policy = Some(policy),
            None => record.add_error(DmarcError::InvalidPolicy(value.clone())),
        },
    }

    for (name, value) in &tags {
        match name.as_str() {
            "v" | "p" => {}
            "sp" => record.subdomain_policy = parse_or_error(record, name, value, Policy::parse),
            "np" => {
                record.nonexistent_subdomain_policy =
                    parse_or_error(record, name, value, Policy::parse)
            }
            "adkim" => {
                if let Some(mode) = parse_or_error(record, name, value, AlignmentMode::parse) {
                    record.dkim_alignment = mode;
                }
            }
            "aspf" => {
                if let Some(mode) = parse_or_error(record, name, value, AlignmentMode::parse) {
                    record.spf_alignment = mode;
                }
            }
            "pct" => match parse_percentage(value) {
                Ok(pct) => record.percentage = pct,
                Err(error) => record.add_error(error),
            },
            "rua" => record.reporting_uris = parse_uri_list(record, value),
            "ruf" => record.failure_uris = parse_uri_list(record, value),
            "fo" => {
                let options: Option<Vec<FailureOption>> =
                    value.split(':').map(|o| FailureOption::parse(o.trim())).collect();
                match options {
                    Some(options) => record.failure_options = options,
                    None => record.add_error(invalid_value(name, value)),
                }
            }
            "rf" => {
                if !value.split(':').all(|f| f.trim().eq_ignore_ascii_case("afrf")) {
                    record.add_error(invalid_value(name, value));
                }
            }
            "ri" => match value.parse::<u32>() {
                Ok(seconds) => record.report_interval = Some(seconds),
                Err(_) => record.add_error(invalid_value(name, value)),
            },
            _ => {
                debug!("Unknown DMARC tag '{name}={value}'");
                record.warnings.push(DmarcWarning::UnknownTag(name.clone()));
            }
        }
    }
}

fn parse_or_error<T>(
    record: &mut DmarcRecord,
    name: &str,
    value: &str,
    parse: fn(&str) -> Option<T>,
) -> Option<T> {
    let parsed = parse(value);
    if parsed.is_none() {
        record.add_error(invalid_value(name, value));
    }
    parsed
}

/// `pct` is a plain decimal integer in 0-100.
fn parse_percentage(value: &str) -> Result<u8, DmarcError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid_value("pct", value));
    }
    match value.parse::<u32>() {
        Ok(pct) if pct <= 100 => Ok(pct as u8),
        _ => Err(DmarcError::PercentageOutOfRange(value.to_string())),
    }
}

/// Splits a `rua`/`ruf` list. Bad entries are kept and flagged with a warning.
fn parse_uri_list(record: &mut DmarcRecord, value: &str) -> Vec<String> {
    let uris: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect();
    for uri in &uris {
        if !is_valid_mailto(uri) {
            record.warnings.push(DmarcWarning::MalformedUri(uri.clone()));
        }
    }
    uris
}

/// Accepts `mailto:local@domain` with an optional `!size[kmgt]` limit.
pub(crate) fn is_valid_mailto(uri: &str) -> bool {
    let Some(scheme) = uri.get(..7) else {
        return false;
    };
    if !scheme.eq_ignore_ascii_case("mailto:") {
        return false;
    }
    let target = &uri[7..];
    let address = match target.rsplit_once('!') {
        Some((address, size)) if is_valid_size(size) => address,
        Some(_) => return false,
        None => target,
    };
    match address.rsplit_once('@') {
        Some((local, domain)) => !local.is_empty() && validate_domain_name(domain).is_ok(),
        None => false,
    }
}

fn is_valid_size(size: &str) -> bool {
    let digits = size.trim_end_matches(|c: char| {
        matches!(c.to_ascii_lowercase(), 'k' | 'm' | 'g' | 't')
    });
    size.len() - digits.len() <= 1
        && !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
}

fn check_semantics(record: &mut DmarcRecord) {
    let enforcing = record.policy.is_some_and(|p| p.enforces());

    if enforcing && record.percentage < 100 {
        record
            .warnings
            .push(DmarcWarning::PartialEnforcement(record.percentage));
    }
    if enforcing && record.subdomain_policy == Some(Policy::None) {
        record.warnings.push(DmarcWarning::WeakSubdomainPolicy);
    }
    if record.tags.contains_key("fo") && record.failure_uris.is_empty() {
        record.warnings.push(DmarcWarning::FailureOptionsWithoutRuf);
    }
}

fn invalid_value(tag: &str, value: &str) -> DmarcError {
    DmarcError::InvalidTagValue {
        tag: tag.to_string(),
        value: value.to_string(),
    }
}
