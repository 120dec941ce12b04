//! CIDR subnet notation.
//!
//! Provides [`Cidr`], a validated `address/prefix` value, and the splitting
//! routine the family engines use for their subnet arguments.

use crate::error::{IpError, Result};
use crate::validate::{family_of, is_ipv4, is_ipv6, IpFamily};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Split `subnet` into its base address and prefix length for `family`.
///
/// # Arguments
/// * `subnet` - The subnet string, e.g. "10.0.0.0/8"
/// * `family` - The family the base address must belong to
///
/// # Returns
/// * `Ok((base, prefix))` - The base address text and the prefix length
/// * `Err` - If the `/prefix` part is missing, is not an integer, is out of
///   range for the family, or the base address is malformed
pub(crate) fn split_subnet(subnet: &str, family: IpFamily) -> Result<(&str, u8)> {
    let (base, prefix) = subnet
        .split_once('/')
        .ok_or_else(|| IpError::invalid_subnet(subnet, "missing /prefix length"))?;

    let base_is_valid = match family {
        IpFamily::V4 => is_ipv4(base),
        IpFamily::V6 => is_ipv6(base),
    };
    if !base_is_valid {
        let reason = match family {
            IpFamily::V4 => "base address is not a valid IPv4 address",
            IpFamily::V6 => "base address is not a valid IPv6 address",
        };
        return Err(IpError::invalid_subnet(subnet, reason));
    }

    if !is_plain_integer(prefix) {
        return Err(IpError::invalid_subnet(subnet, "prefix length is not an integer"));
    }
    let prefix: i64 = prefix
        .parse()
        .map_err(|_| IpError::invalid_subnet(subnet, "prefix length is not an integer"))?;
    let max = family.max_prefix();
    if prefix < 0 || prefix > i64::from(max) {
        return Err(IpError::PrefixOutOfRange {
            subnet: subnet.to_string(),
            prefix,
            max,
        });
    }

    Ok((base, prefix as u8))
}

// Decimal digits with an optional minus sign, no `+` and no leading zero.
fn is_plain_integer(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
}

/// A validated subnet in CIDR notation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cidr {
    family: IpFamily,
    text: String,
    prefix: u8,
}

impl Cidr {
    /// Parse a CIDR string (e.g., "10.0.0.0/24" or "fc00::/7").
    pub fn new(subnet: &str) -> Result<Cidr> {
        let subnet = subnet.trim();
        let base = subnet.split_once('/').map_or(subnet, |(base, _)| base);
        let family = family_of(base).ok_or_else(|| IpError::UnknownSubnetFamily {
            subnets: vec![subnet.to_string()],
        })?;
        let (_, prefix) = split_subnet(subnet, family)?;
        Ok(Cidr {
            family,
            text: subnet.to_string(),
            prefix,
        })
    }

    pub fn family(&self) -> IpFamily {
        self.family
    }

    /// The base address as written.
    pub fn base(&self) -> &str {
        self.text
            .split_once('/')
            .map_or(self.text.as_str(), |(base, _)| base)
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Check whether `address` belongs to this subnet.
    ///
    /// IPv4-mapped IPv6 addresses also match IPv4 subnets.
    pub fn contains(&self, address: &str) -> Result<bool> {
        crate::dispatch::is_in_subnet(address, self.text.as_str())
    }
}

impl AsRef<str> for Cidr {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl FromStr for Cidr {
    type Err = IpError;

    fn from_str(s: &str) -> Result<Cidr> {
        Cidr::new(s)
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl Serialize for Cidr {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Cidr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cidr::new(&s).map_err(|e| de::Error::custom(format!("invalid CIDR {s}: {e}")))
    }
}
