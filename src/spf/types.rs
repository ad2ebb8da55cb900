//! SPF record model (RFC 7208).

use thiserror::Error;

/// Qualifier prefix on a mechanism (RFC 7208 Section 4.6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    Pass,     // + (default)
    Fail,     // -
    SoftFail, // ~
    Neutral,  // ?
}

impl Qualifier {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Qualifier::Pass),
            '-' => Some(Qualifier::Fail),
            '~' => Some(Qualifier::SoftFail),
            '?' => Some(Qualifier::Neutral),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Qualifier::Pass => '+',
            Qualifier::Fail => '-',
            Qualifier::SoftFail => '~',
            Qualifier::Neutral => '?',
        }
    }
}

/// Mechanism kinds (RFC 7208 Section 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MechanismKind {
    All,
    Include,
    A,
    Mx,
    Ptr,
    Ip4,
    Ip6,
    Exists,
}

impl MechanismKind {
    /// Parses a mechanism name (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "all" => Some(MechanismKind::All),
            "include" => Some(MechanismKind::Include),
            "a" => Some(MechanismKind::A),
            "mx" => Some(MechanismKind::Mx),
            "ptr" => Some(MechanismKind::Ptr),
            "ip4" => Some(MechanismKind::Ip4),
            "ip6" => Some(MechanismKind::Ip6),
            "exists" => Some(MechanismKind::Exists),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MechanismKind::All => "all",
            MechanismKind::Include => "include",
            MechanismKind::A => "a",
            MechanismKind::Mx => "mx",
            MechanismKind::Ptr => "ptr",
            MechanismKind::Ip4 => "ip4",
            MechanismKind::Ip6 => "ip6",
            MechanismKind::Exists => "exists",
        }
    }

    /// Whether evaluating this mechanism costs a DNS query (RFC 7208 Section 4.6.4).
    pub fn causes_dns_lookup(&self) -> bool {
        matches!(
            self,
            MechanismKind::Include
                | MechanismKind::A
                | MechanismKind::Mx
                | MechanismKind::Ptr
                | MechanismKind::Exists
        )
    }
}

/// One mechanism, in record order.
///
/// `value` is the argument exactly as published, without the `:` separator:
/// `_spf.example.com` for `include:_spf.example.com`, `192.0.2.0/24` for
/// `ip4:192.0.2.0/24`, `/24` for `a/24`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpfMechanism {
    pub qualifier: Qualifier,
    pub kind: MechanismKind,
    pub value: Option<String>,
}

impl std::fmt::Display for SpfMechanism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.qualifier != Qualifier::Pass {
            write!(f, "{}", self.qualifier.symbol())?;
        }
        f.write_str(self.kind.as_str())?;
        match &self.value {
            Some(v) if v.starts_with('/') => f.write_str(v),
            Some(v) => write!(f, ":{v}"),
            None => Ok(()),
        }
    }
}

/// Structural problems that make a record invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpfError {
    #[error("No SPF record found")]
    NoRecord,

    #[error("record must start with 'v=spf1', found '{0}'")]
    InvalidVersion(String),

    #[error("unknown mechanism '{0}'")]
    UnknownMechanism(String),

    #[error("invalid term '{term}': {reason}")]
    InvalidArgument { term: String, reason: String },

    #[error("duplicate '{0}' modifier")]
    DuplicateModifier(String),

    #[error("{0} SPF records published; receivers treat this as a permanent error")]
    MultipleRecords(usize),
}

/// Risky but well-formed configurations. Warnings never affect validity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpfWarning {
    /// More DNS-querying terms than the RFC 7208 limit of 10.
    TooManyLookups(usize),
    /// `all` is followed by other mechanisms.
    AllNotLast { unreachable: usize },
    /// `redirect` alongside `all`, which makes it dead.
    RedundantRedirect,
    /// `+all` (or bare `all`).
    PassAll,
    /// `ptr` is deprecated.
    PtrMechanism,
    /// Neither `all` nor `redirect`.
    NoAllMechanism,
}

impl std::fmt::Display for SpfWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpfWarning::TooManyLookups(count) => write!(
                f,
                "record needs {count} DNS lookups; receivers stop at 10 and return permerror"
            ),
            SpfWarning::AllNotLast { unreachable } => write!(
                f,
                "'all' is not the last mechanism; {unreachable} mechanism(s) after it are never evaluated"
            ),
            SpfWarning::RedundantRedirect => {
                f.write_str("'redirect' modifier is ignored because the record contains 'all'")
            }
            SpfWarning::PassAll => {
                f.write_str("'+all' authorizes every host on the internet to send as this domain")
            }
            SpfWarning::PtrMechanism => f.write_str(
                "'ptr' mechanism is deprecated (RFC 7208 Section 5.5) and may be ignored by receivers",
            ),
            SpfWarning::NoAllMechanism => f.write_str(
                "record has neither 'all' nor 'redirect'; unmatched senders get a neutral result",
            ),
        }
    }
}

/// A parsed SPF record with everything found wrong with it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpfRecord {
    pub mechanisms: Vec<SpfMechanism>,
    pub redirect_modifier: Option<String>,
    pub explanation_modifier: Option<String>,
    pub valid: bool,
    pub errors: Vec<SpfError>,
    pub warnings: Vec<SpfWarning>,
}

impl SpfRecord {
    /// Parses a raw TXT record; `None` means nothing was published.
    pub fn parse(raw: Option<&str>) -> Self {
        super::parser::parse_spf(raw)
    }

    /// DNS-querying mechanisms plus `redirect`.
    pub fn lookup_count(&self) -> usize {
        let mechanisms = self
            .mechanisms
            .iter()
            .filter(|m| m.kind.causes_dns_lookup())
            .count();
        mechanisms + usize::from(self.redirect_modifier.is_some())
    }

    pub fn has_all(&self) -> bool {
        self.mechanisms.iter().any(|m| m.kind == MechanismKind::All)
    }

    pub(crate) fn add_error(&mut self, error: SpfError) {
        self.errors.push(error);
        self.valid = false;
    }
}
