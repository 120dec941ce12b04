//! Syntactic address classifiers.
//!
//! These never fail: anything that is not a well formed address is simply
//! reported as "not an address". Octets with leading zeros (`0127.0.0.1`,
//! `8.8.8.08`) are rejected to avoid octal ambiguity.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// One decimal octet, 0-255 without leading zeros.
pub(crate) const V4_OCTET: &str = r"(?:0|[1-9][0-9]?|1[0-9][0-9]|2[0-4][0-9]|25[0-5])";

/// One hextet, 1-4 hex digits.
const V6_GROUP: &str = r"[0-9a-fA-F]{1,4}";

/// Optional zone id suffix (`%eth0`, `%utun2`).
pub(crate) const V6_ZONE: &str = r"(?:%[0-9a-zA-Z]+)?";

static IPV4_REGEX: OnceLock<Regex> = OnceLock::new();
static IPV6_REGEX: OnceLock<Regex> = OnceLock::new();

/// Dotted quad body without anchors.
pub(crate) fn v4_pattern() -> String {
    format!(r"{o}(?:\.{o}){{3}}", o = V4_OCTET)
}

fn get_ipv4_regex() -> &'static Regex {
    IPV4_REGEX.get_or_init(|| Regex::new(&format!("^{}$", v4_pattern())).expect("Invalid Regex"))
}

fn get_ipv6_regex() -> &'static Regex {
    IPV6_REGEX.get_or_init(|| {
        let v4 = v4_pattern();
        let g = V6_GROUP;
        // One alternative per count of leading explicit groups, each allowing
        // the remainder to be explicit groups, a `::` tail or a dotted quad.
        let body = [
            format!(r"(?:{g}:){{7}}(?:{g}|:)"),
            format!(r"(?:{g}:){{6}}(?:{v4}|:{g}|:)"),
            format!(r"(?:{g}:){{5}}(?::{v4}|(?::{g}){{1,2}}|:)"),
            format!(r"(?:{g}:){{4}}(?:(?::{g}){{0,1}}:{v4}|(?::{g}){{1,3}}|:)"),
            format!(r"(?:{g}:){{3}}(?:(?::{g}){{0,2}}:{v4}|(?::{g}){{1,4}}|:)"),
            format!(r"(?:{g}:){{2}}(?:(?::{g}){{0,3}}:{v4}|(?::{g}){{1,5}}|:)"),
            format!(r"(?:{g}:){{1}}(?:(?::{g}){{0,4}}:{v4}|(?::{g}){{1,6}}|:)"),
            format!(r"(?::(?:(?::{g}){{0,5}}:{v4}|(?::{g}){{1,7}}|:))"),
        ]
        .join("|");
        Regex::new(&format!("^(?:{body}){V6_ZONE}$")).expect("Invalid Regex")
    })
}

/// Address family of a textual address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    /// The numeric tag used by [`is_ip`].
    pub fn number(self) -> u8 {
        match self {
            IpFamily::V4 => 4,
            IpFamily::V6 => 6,
        }
    }

    /// Longest valid prefix length for the family.
    pub fn max_prefix(self) -> u8 {
        match self {
            IpFamily::V4 => 32,
            IpFamily::V6 => 128,
        }
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IpFamily::V4 => write!(f, "IPv4"),
            IpFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// True if `s` is a dotted quad with four octets in 0-255, no leading zeros.
pub fn is_ipv4(s: &str) -> bool {
    get_ipv4_regex().is_match(s)
}

/// True if `s` is an IPv6 address, optionally `::` compressed, optionally
/// ending in a dotted quad and optionally carrying a `%zone` suffix.
pub fn is_ipv6(s: &str) -> bool {
    get_ipv6_regex().is_match(s)
}

/// Returns 4 or 6 for the detected family, 0 if `s` is neither.
pub fn is_ip(s: &str) -> u8 {
    family_of(s).map_or(0, IpFamily::number)
}

/// Detected family of `s`, if any.
pub fn family_of(s: &str) -> Option<IpFamily> {
    if is_ipv4(s) {
        Some(IpFamily::V4)
    } else if is_ipv6(s) {
        Some(IpFamily::V6)
    } else {
        None
    }
}
