//! Family-independent entry points.
//!
//! Subnet lists may mix IPv4 and IPv6 subnets. An IPv4-mapped IPv6 address
//! (`::ffff:a.b.c.d`) is tested against the IPv6 subnets as written and
//! against the IPv4 subnets as its embedded dotted quad.

use crate::error::{AddressKind, IpError, Result};
use crate::models::IntoSubnets;
use crate::ranges::Range;
use crate::validate::{family_of, IpFamily};
use crate::{ipv4, ipv6};

/// Membership test over a mixed list of IPv4 and IPv6 subnets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checker {
    v4: ipv4::Checker,
    v6: ipv6::Checker,
}

impl Checker {
    /// Partition `subnets` by family and parse each group.
    ///
    /// # Returns
    /// * `Ok(Checker)` - The combined checker
    /// * `Err(IpError::UnknownSubnetFamily)` - Listing every subnet whose base
    ///   address is neither IPv4 nor IPv6
    /// * `Err` - The first per-family parse error otherwise
    pub fn new<T: IntoSubnets>(subnets: T) -> Result<Checker> {
        let mut v4 = Vec::new();
        let mut v6 = Vec::new();
        let mut unknown = Vec::new();

        for subnet in subnets.subnet_strs() {
            let base = subnet.split_once('/').map_or(subnet, |(base, _)| base);
            match family_of(base) {
                Some(IpFamily::V4) => v4.push(subnet),
                Some(IpFamily::V6) => v6.push(subnet),
                None => unknown.push(subnet.to_string()),
            }
        }

        if !unknown.is_empty() {
            return Err(IpError::UnknownSubnetFamily { subnets: unknown });
        }

        log::trace!(
            "created checker over {} IPv4 and {} IPv6 subnets",
            v4.len(),
            v6.len()
        );
        Ok(Checker {
            v4: ipv4::Checker::new(v4)?,
            v6: ipv6::Checker::new(v6)?,
        })
    }

    /// Check an address of either family.
    pub fn check(&self, address: &str) -> Result<bool> {
        match family_of(address) {
            Some(IpFamily::V4) => Ok(self.v4.contains(ipv4::parse_validated(address))),
            Some(IpFamily::V6) => {
                let segments = ipv6::parse_validated(address)?;
                if segments.is_ipv4_mapped() {
                    Ok(self.v6.contains(&segments)
                        || self.v4.contains(segments.mapped_ipv4_long()))
                } else {
                    Ok(self.v6.contains(&segments))
                }
            }
            None => Err(IpError::invalid_address(AddressKind::Any, address)),
        }
    }

    pub fn ipv4(&self) -> &ipv4::Checker {
        &self.v4
    }

    pub fn ipv6(&self) -> &ipv6::Checker {
        &self.v6
    }
}

pub fn create_checker<T: IntoSubnets>(subnets: T) -> Result<Checker> {
    Checker::new(subnets)
}

/// Check whether `address` belongs to any of `subnets`.
///
/// # Examples
/// ```
/// use subnet_check::is_in_subnet;
/// let trusted = ["127.0.0.1/8", "::1/128", "10.0.0.0/8", "fc00::/7"];
/// assert!(is_in_subnet("127.1.2.3", &trusted).unwrap());
/// assert!(!is_in_subnet("1.2.3.4", &trusted).unwrap());
/// assert!(is_in_subnet("::ffff:172.16.10.10", "172.16.0.0/16").unwrap());
/// ```
pub fn is_in_subnet<T: IntoSubnets>(address: &str, subnets: T) -> Result<bool> {
    create_checker(subnets)?.check(address)
}

// Mapped addresses (dotted tail) are classified by their IPv4 form.
fn in_range(address: &str, range: Range) -> Result<bool> {
    match family_of(address) {
        Some(IpFamily::V4) => {
            Ok(ipv4::range_checker(range).contains(ipv4::parse_validated(address)))
        }
        Some(IpFamily::V6) => {
            let segments = ipv6::parse_validated(address)?;
            if segments.is_ipv4_mapped() {
                Ok(ipv4::range_checker(range).contains(segments.mapped_ipv4_long()))
            } else {
                Ok(ipv6::range_checker(range).contains(&segments))
            }
        }
        None => Err(IpError::invalid_address(AddressKind::Any, address)),
    }
}

pub fn is_private(address: &str) -> Result<bool> {
    in_range(address, Range::Private)
}

pub fn is_localhost(address: &str) -> Result<bool> {
    in_range(address, Range::Localhost)
}

pub fn is_reserved(address: &str) -> Result<bool> {
    in_range(address, Range::Reserved)
}

pub fn is_special(address: &str) -> Result<bool> {
    in_range(address, Range::Special)
}

/// False for IPv4 input and for anything unparseable.
pub fn is_ipv4_mapped_address(address: &str) -> bool {
    ipv6::is_ipv4_mapped_address(address)
}
