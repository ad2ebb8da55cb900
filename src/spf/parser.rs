//! SPF record parser.
//!
//! Parsing never stops at the first bad term: every term is examined and each
//! problem is recorded, so one report lists everything wrong with a record.

use std::collections::HashSet;
use std::net::{Ipv4Addr, Ipv6Addr};

use log::debug;

use super::types::{MechanismKind, Qualifier, SpfError, SpfMechanism, SpfRecord, SpfWarning};
use crate::config::{SPF_MAX_DNS_LOOKUPS, SPF_VERSION};
use crate::domain::validate_domain_name;

/// Parses an SPF record string. `None` yields a record carrying `NoRecord`.
pub fn parse_spf(raw: Option<&str>) -> SpfRecord {
    let mut record = SpfRecord {
        valid: true,
        ..Default::default()
    };

    let Some(text) = raw else {
        record.add_error(SpfError::NoRecord);
        return record;
    };

    let mut terms = text.split_whitespace();
    match terms.next() {
        Some(version) if version.eq_ignore_ascii_case(SPF_VERSION) => {}
        other => {
            record.add_error(SpfError::InvalidVersion(other.unwrap_or("").to_string()));
            return record;
        }
    }

    // redirect/exp seen so far, valid or not
    let mut seen_modifiers = HashSet::new();
    for term in terms {
        if let Some((name, value)) = split_modifier(term) {
            parse_modifier(&mut record, &mut seen_modifiers, term, name, value);
        } else {
            match parse_mechanism(term) {
                Ok(mechanism) => record.mechanisms.push(mechanism),
                Err(error) => record.add_error(error),
            }
        }
    }

    check_semantics(&mut record);
    record
}

/// Splits `name=value` when `name` is a valid modifier name.
///
/// A modifier name is ALPHA *( ALPHA / DIGIT / "-" / "_" / "." ), which never
/// collides with a mechanism term: those carry `:`/`/` or a qualifier first.
fn split_modifier(term: &str) -> Option<(&str, &str)> {
    let (name, value) = term.split_once('=')?;
    let mut chars = name.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')) {
        return None;
    }
    Some((name, value))
}

fn parse_modifier(
    record: &mut SpfRecord,
    seen: &mut HashSet<String>,
    term: &str,
    name: &str,
    value: &str,
) {
    let name = name.to_ascii_lowercase();
    if name != "redirect" && name != "exp" {
        debug!("Ignoring unknown SPF modifier '{term}'");
        return;
    }

    if !seen.insert(name.clone()) {
        record.add_error(SpfError::DuplicateModifier(name));
        return;
    }
    if let Err(reason) = validate_domain_spec(value) {
        record.add_error(invalid(term, &reason));
        return;
    }
    let slot = if name == "redirect" {
        &mut record.redirect_modifier
    } else {
        &mut record.explanation_modifier
    };
    *slot = Some(value.to_string());
}

/// Parses `[qualifier]name[:argument][/cidr]`.
fn parse_mechanism(term: &str) -> Result<SpfMechanism, SpfError> {
    let mut chars = term.chars();
    let (qualifier, rest) = match chars.next().and_then(Qualifier::from_char) {
        Some(q) => (q, chars.as_str()),
        None => (Qualifier::Pass, term),
    };

    let name_end = rest.find(|c: char| c == ':' || c == '/').unwrap_or(rest.len());
    let (name, argument) = rest.split_at(name_end);
    let kind = MechanismKind::parse(name)
        .ok_or_else(|| SpfError::UnknownMechanism(term.to_string()))?;

    let value = validate_argument(kind, argument).map_err(|reason| invalid(term, &reason))?;

    Ok(SpfMechanism {
        qualifier,
        kind,
        value,
    })
}

/// Validates the text following the mechanism name and returns the stored value.
fn validate_argument(kind: MechanismKind, argument: &str) -> Result<Option<String>, String> {
    match kind {
        MechanismKind::All => {
            if argument.is_empty() {
                Ok(None)
            } else {
                Err("'all' takes no argument".to_string())
            }
        }
        MechanismKind::Include | MechanismKind::Exists => {
            let domain = required_argument(kind, argument)?;
            validate_domain_spec(domain)?;
            Ok(Some(domain.to_string()))
        }
        MechanismKind::A | MechanismKind::Mx => {
            if argument.is_empty() {
                return Ok(None);
            }
            let (domain, cidr) = match argument.strip_prefix(':') {
                Some(rest) => {
                    let split = rest.find('/').unwrap_or(rest.len());
                    let (domain, cidr) = rest.split_at(split);
                    validate_domain_spec(domain)?;
                    (Some(domain), cidr)
                }
                None => (None, argument),
            };
            validate_dual_cidr(cidr)?;
            Ok(Some(match domain {
                Some(_) => argument[1..].to_string(),
                None => cidr.to_string(),
            }))
        }
        MechanismKind::Ptr => {
            if argument.is_empty() {
                return Ok(None);
            }
            let domain = argument
                .strip_prefix(':')
                .ok_or_else(|| "'ptr' does not accept a CIDR length".to_string())?;
            validate_domain_spec(domain)?;
            Ok(Some(domain.to_string()))
        }
        MechanismKind::Ip4 => {
            let network = required_argument(kind, argument)?;
            let (addr, prefix) = split_prefix(network);
            addr.parse::<Ipv4Addr>()
                .map_err(|_| format!("'{addr}' is not an IPv4 address"))?;
            if let Some(prefix) = prefix {
                parse_prefix(prefix, 32)?;
            }
            Ok(Some(network.to_string()))
        }
        MechanismKind::Ip6 => {
            let network = required_argument(kind, argument)?;
            let (addr, prefix) = split_prefix(network);
            addr.parse::<Ipv6Addr>()
                .map_err(|_| format!("'{addr}' is not an IPv6 address"))?;
            if let Some(prefix) = prefix {
                parse_prefix(prefix, 128)?;
            }
            Ok(Some(network.to_string()))
        }
    }
}

fn required_argument(kind: MechanismKind, argument: &str) -> Result<&str, String> {
    match argument.strip_prefix(':') {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(format!("'{}' requires an argument", kind.as_str())),
    }
}

fn split_prefix(network: &str) -> (&str, Option<&str>) {
    match network.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (network, None),
    }
}

/// Validates `[/cidr4][//cidr6]`.
fn validate_dual_cidr(cidr: &str) -> Result<(), String> {
    if cidr.is_empty() {
        return Ok(());
    }
    let (v4, v6) = match cidr.find("//") {
        Some(pos) => (&cidr[..pos], Some(&cidr[pos + 2..])),
        None => (cidr, None),
    };
    if !v4.is_empty() {
        let length = v4
            .strip_prefix('/')
            .ok_or_else(|| format!("malformed CIDR length '{cidr}'"))?;
        parse_prefix(length, 32)?;
    }
    if let Some(length) = v6 {
        parse_prefix(length, 128)?;
    }
    Ok(())
}

/// Parses a prefix length: digits only, no leading zero, at most `max`.
fn parse_prefix(length: &str, max: u8) -> Result<u8, String> {
    let well_formed = !length.is_empty()
        && length.len() <= 3
        && length.chars().all(|c| c.is_ascii_digit())
        && (length == "0" || !length.starts_with('0'));
    let value = if well_formed {
        length.parse::<u8>().ok()
    } else {
        None
    };
    match value {
        Some(v) if v <= max => Ok(v),
        _ => Err(format!("CIDR length '{length}' is not in 0-{max}")),
    }
}

/// Validates a domain-spec. Specs containing macros are only checked for
/// well-formed macro syntax since they expand at evaluation time.
fn validate_domain_spec(spec: &str) -> Result<(), String> {
    if spec.is_empty() {
        return Err("empty domain".to_string());
    }
    if spec.contains('%') {
        return validate_macro_string(spec);
    }
    validate_domain_name(spec.trim_end_matches('.'))
}

/// Checks `%{...}`, `%%`, `%_` and `%-` usage (RFC 7208 Section 7.1).
fn validate_macro_string(spec: &str) -> Result<(), String> {
    let mut chars = spec.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        match chars.next() {
            Some('%') | Some('_') | Some('-') => {}
            Some('{') => {
                let letter = chars.next();
                if !letter.is_some_and(|l| "slodiphcrtvSLODIPHCRTV".contains(l)) {
                    return Err(format!("invalid macro letter in '{spec}'"));
                }
                if !chars.any(|c| c == '}') {
                    return Err(format!("unterminated macro in '{spec}'"));
                }
            }
            _ => return Err(format!("invalid macro in '{spec}'")),
        }
    }
    Ok(())
}

/// Adds warnings for valid-but-risky configurations.
fn check_semantics(record: &mut SpfRecord) {
    let lookups = record.lookup_count();
    if lookups > SPF_MAX_DNS_LOOKUPS {
        record.warnings.push(SpfWarning::TooManyLookups(lookups));
    }

    let all_position = record
        .mechanisms
        .iter()
        .position(|m| m.kind == MechanismKind::All);

    if let Some(position) = all_position {
        let unreachable = record.mechanisms.len() - position - 1;
        if unreachable > 0 {
            record.warnings.push(SpfWarning::AllNotLast { unreachable });
        }
        if record.redirect_modifier.is_some() {
            record.warnings.push(SpfWarning::RedundantRedirect);
        }
    } else if record.redirect_modifier.is_none() {
        record.warnings.push(SpfWarning::NoAllMechanism);
    }

    if record
        .mechanisms
        .iter()
        .any(|m| m.kind == MechanismKind::All && m.qualifier == Qualifier::Pass)
    {
        record.warnings.push(SpfWarning::PassAll);
    }

    if record
        .mechanisms
        .iter()
        .any(|m| m.kind == MechanismKind::Ptr)
    {
        record.warnings.push(SpfWarning::PtrMechanism);
    }
}

fn invalid(term: &str, reason: &str) -> SpfError {
    SpfError::InvalidArgument {
        term: term.to_string(),
        reason: reason.to_string(),
    }
}
