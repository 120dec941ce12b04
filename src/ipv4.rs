//! IPv4 engine.
//!
//! Addresses are handled as `u32` values; a subnet matches when the top
//! `prefix` bits of both values are equal.

use crate::error::{AddressKind, IpError, Result};
use crate::models::{split_subnet, IntoSubnets};
use crate::ranges::{Range, RangeRegistry};
use crate::validate::{is_ipv4, IpFamily};
use std::net::Ipv4Addr;

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH: u8 = 32;

static REGISTRY: RangeRegistry<Checker> = RangeRegistry::new(IpFamily::V4, build_range_checker);

fn build_range_checker(subnets: &[&'static str]) -> Result<Checker> {
    Checker::new(subnets)
}

/// Convert a dotted quad to its 32-bit value.
///
/// # Examples
/// ```
/// use subnet_check::ipv4::ipv4_to_long;
/// assert_eq!(ipv4_to_long("10.0.0.1").unwrap(), 0x0A000001);
/// ```
pub fn ipv4_to_long(ip: &str) -> Result<u32> {
    if !is_ipv4(ip) {
        return Err(IpError::invalid_address(AddressKind::Ipv4, ip));
    }
    Ok(parse_validated(ip))
}

/// Convert a 32-bit value back to a dotted quad.
pub fn long_to_ipv4(long: u32) -> String {
    Ipv4Addr::from(long).to_string()
}

// Caller guarantees `ip` passed `is_ipv4`.
pub(crate) fn parse_validated(ip: &str) -> u32 {
    ip.split('.')
        .map(|octet| octet.parse::<u32>().unwrap_or(0))
        .fold(0, |long, octet| (long << 8) | octet)
}

/// One parsed subnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SubnetMatcher {
    network: u32,
    prefix: u8,
}

impl SubnetMatcher {
    fn new(subnet: &str) -> Result<SubnetMatcher> {
        let (base, prefix) = split_subnet(subnet, IpFamily::V4)?;
        Ok(SubnetMatcher {
            network: parse_validated(base),
            prefix,
        })
    }

    fn matches(&self, long: u32) -> bool {
        // A zero prefix is the universal route; a 32 bit shift would overflow.
        if self.prefix == 0 {
            return true;
        }
        let shift = u32::from(MAX_LENGTH - self.prefix);
        (long >> shift) == (self.network >> shift)
    }
}

/// Membership test over a fixed set of IPv4 subnets.
///
/// An address matches if it belongs to any of the subnets, so an empty
/// checker never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checker {
    subnets: Vec<SubnetMatcher>,
}

impl Checker {
    /// Parse `subnets` once, failing on the first malformed one.
    pub fn new<T: IntoSubnets>(subnets: T) -> Result<Checker> {
        let subnets = subnets
            .subnet_strs()
            .into_iter()
            .map(SubnetMatcher::new)
            .collect::<Result<Vec<_>>>()?;
        log::trace!("created IPv4 checker over {} subnets", subnets.len());
        Ok(Checker { subnets })
    }

    /// Check a dotted-quad address.
    pub fn check(&self, address: &str) -> Result<bool> {
        Ok(self.contains(ipv4_to_long(address)?))
    }

    /// Check an already parsed address.
    pub fn contains(&self, long: u32) -> bool {
        self.subnets.iter().any(|subnet| subnet.matches(long))
    }

    pub fn len(&self) -> usize {
        self.subnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }
}

pub fn create_checker<T: IntoSubnets>(subnets: T) -> Result<Checker> {
    Checker::new(subnets)
}

/// Check whether `address` belongs to any of `subnets`.
///
/// # Returns
/// * `Ok(bool)` - Whether the address matched
/// * `Err` - If a subnet or the address is malformed
pub fn is_in_subnet<T: IntoSubnets>(address: &str, subnets: T) -> Result<bool> {
    create_checker(subnets)?.check(address)
}

/// Shared checker for a named range, built on first use.
pub fn range_checker(range: Range) -> &'static Checker {
    REGISTRY.get(range)
}

pub fn is_private(address: &str) -> Result<bool> {
    range_checker(Range::Private).check(address)
}

pub fn is_localhost(address: &str) -> Result<bool> {
    range_checker(Range::Localhost).check(address)
}

pub fn is_reserved(address: &str) -> Result<bool> {
    range_checker(Range::Reserved).check(address)
}

/// Private, localhost or reserved.
pub fn is_special(address: &str) -> Result<bool> {
    range_checker(Range::Special).check(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_to_long() {
        assert_eq!(ipv4_to_long("0.0.0.0").unwrap(), 0);
        assert_eq!(ipv4_to_long("1.2.3.4").unwrap(), 0x01020304);
        assert_eq!(ipv4_to_long("255.255.255.255").unwrap(), u32::MAX);
        assert_eq!(ipv4_to_long("192.168.1.42").unwrap(), 0xC0A8012A);
        assert!(ipv4_to_long("1.2.3").is_err());
        assert!(ipv4_to_long("0127.0.0.1").is_err());
    }

    #[test]
    fn test_long_to_ipv4() {
        assert_eq!(long_to_ipv4(0x7F000001), "127.0.0.1");
        assert_eq!(long_to_ipv4(ipv4_to_long("10.20.30.40").unwrap()), "10.20.30.40");
    }

    #[test]
    fn test_is_in_subnet() {
        assert!(is_in_subnet("10.5.0.1", "10.0.0.0/8").unwrap());
        assert!(!is_in_subnet("11.5.0.1", "10.0.0.0/8").unwrap());
        assert!(is_in_subnet("192.168.1.255", "192.168.1.0/24").unwrap());
        assert!(!is_in_subnet("192.168.2.0", "192.168.1.0/24").unwrap());
        assert!(is_in_subnet("172.31.255.255", "172.16.0.0/12").unwrap());
        assert!(!is_in_subnet("172.32.0.0", "172.16.0.0/12").unwrap());
    }

    #[test]
    fn test_unaligned_base_address() {
        assert!(is_in_subnet("127.1.2.3", "127.0.0.1/8").unwrap());
        assert!(is_in_subnet("10.1.1.17", "10.1.1.20/28").unwrap());
        assert!(!is_in_subnet("10.1.1.32", "10.1.1.20/28").unwrap());
    }

    #[test]
    fn test_edge_prefixes() {
        assert!(is_in_subnet("8.8.8.8", "0.0.0.0/0").unwrap());
        assert!(is_in_subnet("255.255.255.255", "1.2.3.4/0").unwrap());
        assert!(is_in_subnet("8.8.8.8", "8.8.8.8/32").unwrap());
        assert!(!is_in_subnet("8.8.8.9", "8.8.8.8/32").unwrap());
        assert!(is_in_subnet("128.0.0.0", "255.0.0.0/1").unwrap());
        assert!(!is_in_subnet("127.255.255.255", "255.0.0.0/1").unwrap());
    }

    #[test]
    fn test_subnet_list_is_or() {
        let subnets = ["10.0.0.0/8", "192.168.0.0/16"];
        assert!(is_in_subnet("10.0.0.1", &subnets).unwrap());
        assert!(is_in_subnet("192.168.3.3", &subnets).unwrap());
        assert!(!is_in_subnet("172.16.0.1", &subnets).unwrap());
        let none: [&str; 0] = [];
        assert!(!is_in_subnet("10.0.0.1", &none).unwrap());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            is_in_subnet("1.2.3.4", "1.2.3.4"),
            Err(IpError::InvalidSubnet { .. })
        ));
        assert!(matches!(
            is_in_subnet("1.2.3.4", "1.2.3.0/33"),
            Err(IpError::PrefixOutOfRange { prefix: 33, .. })
        ));
        assert!(matches!(
            is_in_subnet("1.2.3.4", "::/0"),
            Err(IpError::InvalidSubnet { .. })
        ));
        assert!(matches!(
            is_in_subnet("1.2.233333.4", "1.2.0.0/16"),
            Err(IpError::InvalidAddress {
                expected: AddressKind::Ipv4,
                ..
            })
        ));
        assert!(is_in_subnet("::1", "0.0.0.0/0").is_err());
    }

    #[test]
    fn test_checker_is_reusable() {
        let checker = create_checker(vec!["10.0.0.0/8", "127.0.0.0/8"]).unwrap();
        assert_eq!(checker.len(), 2);
        assert!(checker.check("127.0.0.1").unwrap());
        assert!(checker.check("10.255.0.1").unwrap());
        assert!(!checker.check("9.255.255.255").unwrap());
        assert!(checker.check("x").is_err());
        assert!(Checker::default().is_empty());
    }

    #[test]
    fn test_named_ranges() {
        assert!(is_private("10.0.0.1").unwrap());
        assert!(is_private("172.16.5.4").unwrap());
        assert!(is_private("192.168.0.1").unwrap());
        assert!(is_private("169.254.10.1").unwrap());
        assert!(!is_private("8.8.8.8").unwrap());
        assert!(is_localhost("127.0.0.1").unwrap());
        assert!(is_localhost("127.200.0.1").unwrap());
        assert!(!is_localhost("128.0.0.1").unwrap());
        assert!(is_reserved("0.0.0.0").unwrap());
        assert!(is_reserved("255.255.255.255").unwrap());
        assert!(is_reserved("224.0.0.251").unwrap());
        assert!(!is_reserved("1.1.1.1").unwrap());
        assert!(is_special("127.0.0.1").unwrap());
        assert!(is_special("10.1.1.1").unwrap());
        assert!(is_special("198.51.100.7").unwrap());
        assert!(!is_special("93.184.216.34").unwrap());
        assert!(is_private("::1").is_err());
    }
}
