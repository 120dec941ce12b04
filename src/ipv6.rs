//! IPv6 engine.
//!
//! Addresses are expanded into eight 16-bit segments and compared segment by
//! segment against each subnet prefix. Elided (`::`) segments are kept as
//! `None` and read as zero.

use crate::error::{AddressKind, IpError, Result};
use crate::ipv4;
use crate::models::{split_subnet, IntoSubnets};
use crate::ranges::{Range, RangeRegistry};
use crate::validate::{is_ipv4, is_ipv6, IpFamily};
use std::fmt;

/// Maximum length for an IPv6 prefix (128 bits).
pub const MAX_LENGTH: u8 = 128;

const SEGMENT_BITS: i32 = 16;

static REGISTRY: RangeRegistry<Checker> = RangeRegistry::new(IpFamily::V6, build_range_checker);

fn build_range_checker(subnets: &[&'static str]) -> Result<Checker> {
    Checker::new(subnets)
}

/// An IPv6 address as eight segments in address order.
///
/// Remembers whether the last 32 bits were written as a dotted quad, which
/// is what separates `::ffff:127.0.0.1` from the hex value `::ffff:7f00:1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ipv6Segments {
    segments: [Option<u16>; 8],
    dotted_tail: bool,
}

impl Ipv6Segments {
    /// Numeric value of segment `index`, zero when elided.
    pub fn value(&self, index: usize) -> u16 {
        self.segments[index].unwrap_or(0)
    }

    /// True if segment `index` was covered by `::`.
    pub fn is_elided(&self, index: usize) -> bool {
        self.segments[index].is_none()
    }

    pub fn to_u128(&self) -> u128 {
        (0..8).fold(0, |acc, i| (acc << 16) | u128::from(self.value(i)))
    }

    /// True if the last two segments were written as a valid dotted quad.
    pub fn has_dotted_tail(&self) -> bool {
        self.dotted_tail
    }

    /// True for `::ffff:0:0/96` addresses written as `::ffff:a.b.c.d`.
    ///
    /// Hex values in the same prefix (`::ffff:1234:5678`) are not mapped.
    pub fn is_ipv4_mapped(&self) -> bool {
        self.dotted_tail && (0..5).all(|i| self.value(i) == 0) && self.value(5) == 0xffff
    }

    /// The trailing 32 bits as an IPv4 value.
    pub fn mapped_ipv4_long(&self) -> u32 {
        (u32::from(self.value(6)) << 16) | u32::from(self.value(7))
    }
}

impl fmt::Display for Ipv6Segments {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for i in 0..8 {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{:x}", self.value(i))?;
        }
        Ok(())
    }
}

/// Expand `ip` into its eight segments.
///
/// A zone id is ignored. A trailing dotted quad is folded into the last two
/// segments.
///
/// # Examples
/// ```
/// use subnet_check::ipv6::get_ipv6_segments;
/// let segments = get_ipv6_segments("fe80::1%eth0").unwrap();
/// assert_eq!(segments.to_string(), "fe80:0:0:0:0:0:0:1");
/// assert!(segments.is_elided(1));
/// ```
pub fn get_ipv6_segments(ip: &str) -> Result<Ipv6Segments> {
    if !is_ipv6(ip) {
        return Err(IpError::invalid_address(AddressKind::Ipv6, ip));
    }
    parse_validated(ip)
}

// Caller guarantees `ip` passed `is_ipv6`.
pub(crate) fn parse_validated(ip: &str) -> Result<Ipv6Segments> {
    let unzoned = ip.split_once('%').map_or(ip, |(address, _)| address);

    if unzoned.contains('.') {
        let folded = fold_ipv4_tail(ip, unzoned)?;
        let segments = expand(ip, &folded)?;
        return Ok(Ipv6Segments {
            dotted_tail: true,
            ..segments
        });
    }
    expand(ip, unzoned)
}

// Rewrite `prefix:a.b.c.d` into `prefix:hhhh:hhhh`.
fn fold_ipv4_tail(ip: &str, unzoned: &str) -> Result<String> {
    let (prefix, quad) = unzoned
        .rsplit_once(':')
        .filter(|(_, quad)| is_ipv4(quad))
        .ok_or_else(|| IpError::invalid_address(AddressKind::Ipv6, ip))?;
    let long = ipv4::parse_validated(quad);
    Ok(format!("{prefix}:{:x}:{:x}", long >> 16, long & 0xffff))
}

fn expand(ip: &str, unzoned: &str) -> Result<Ipv6Segments> {
    let invalid = || IpError::invalid_address(AddressKind::Ipv6, ip);
    let groups = |part: &str| -> Result<Vec<Option<u16>>> {
        if part.is_empty() {
            return Ok(Vec::new());
        }
        part.split(':')
            .map(|group| u16::from_str_radix(group, 16).map(Some).map_err(|_| invalid()))
            .collect()
    };

    let (before, after, compressed) = match unzoned.split_once("::") {
        Some((before, after)) => (groups(before)?, groups(after)?, true),
        None => (groups(unzoned)?, Vec::new(), false),
    };
    let explicit = before.len() + after.len();
    let elided = if compressed {
        8usize.checked_sub(explicit).ok_or_else(invalid)?
    } else {
        0
    };
    if explicit + elided != 8 {
        return Err(invalid());
    }

    let mut segments = [None; 8];
    for (slot, segment) in segments
        .iter_mut()
        .zip(before.into_iter().chain(std::iter::repeat(None).take(elided)).chain(after))
    {
        *slot = segment;
    }
    Ok(Ipv6Segments {
        segments,
        dotted_tail: false,
    })
}

/// Prefix comparison against one subnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentChecker {
    network: Ipv6Segments,
    prefix: u8,
}

impl SegmentChecker {
    /// Parse a subnet such as "fc00::/7".
    pub fn new(subnet: &str) -> Result<SegmentChecker> {
        let (base, prefix) = split_subnet(subnet, IpFamily::V6)?;
        Ok(SegmentChecker {
            network: get_ipv6_segments(base)?,
            prefix,
        })
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// True if the first `prefix` bits of `segments` equal the subnet's.
    pub fn matches(&self, segments: &Ipv6Segments) -> bool {
        for i in 0..8 {
            let bit_count =
                (i32::from(self.prefix) - i as i32 * SEGMENT_BITS).clamp(0, SEGMENT_BITS);
            if bit_count <= 0 {
                break;
            }
            let shift = (SEGMENT_BITS - bit_count) as u32;
            if (self.network.value(i) >> shift) != (segments.value(i) >> shift) {
                return false;
            }
        }
        true
    }
}

/// Membership test over a fixed set of IPv6 subnets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checker {
    subnets: Vec<SegmentChecker>,
}

impl Checker {
    pub fn new<T: IntoSubnets>(subnets: T) -> Result<Checker> {
        let subnets = subnets
            .subnet_strs()
            .into_iter()
            .map(SegmentChecker::new)
            .collect::<Result<Vec<_>>>()?;
        log::trace!("created IPv6 checker over {} subnets", subnets.len());
        Ok(Checker { subnets })
    }

    /// Check an IPv6 address, parsing it once for all subnets.
    pub fn check(&self, address: &str) -> Result<bool> {
        Ok(self.contains(&get_ipv6_segments(address)?))
    }

    pub fn contains(&self, segments: &Ipv6Segments) -> bool {
        self.subnets.iter().any(|subnet| subnet.matches(segments))
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

pub fn is_in_subnet<T: IntoSubnets>(address: &str, subnets: T) -> Result<bool> {
    create_checker(subnets)?.check(address)
}

/// True if `address` is written as `::ffff:a.b.c.d`.
///
/// Never fails; anything unparseable is simply not mapped. The deprecated
/// IPv4-compatible form `::a.b.c.d` is not mapped.
pub fn is_ipv4_mapped_address(address: &str) -> bool {
    get_ipv6_segments(address).is_ok_and(|segments| segments.is_ipv4_mapped())
}

/// The dotted quad carried by an IPv4-mapped address.
///
/// # Examples
/// ```
/// use subnet_check::ipv6::extract_mapped_ipv4;
/// assert_eq!(extract_mapped_ipv4("::ffff:10.1.2.3").unwrap(), "10.1.2.3");
/// assert!(extract_mapped_ipv4("::10.1.2.3").is_err());
/// ```
pub fn extract_mapped_ipv4(address: &str) -> Result<String> {
    let not_mapped = || IpError::NotMapped {
        address: address.to_string(),
    };
    let segments = get_ipv6_segments(address).map_err(|_| not_mapped())?;
    if !segments.is_ipv4_mapped() {
        return Err(not_mapped());
    }
    Ok(ipv4::long_to_ipv4(segments.mapped_ipv4_long()))
}

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

pub fn is_special(address: &str) -> Result<bool> {
    range_checker(Range::Special).check(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(ip: &str) -> [u16; 8] {
        let segments = get_ipv6_segments(ip).unwrap();
        std::array::from_fn(|i| segments.value(i))
    }

    #[test]
    fn test_segments_full_form() {
        assert_eq!(
            values("2001:db8:1:2:3:4:5:6"),
            [0x2001, 0xdb8, 1, 2, 3, 4, 5, 6]
        );
        assert_eq!(values("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff"), [0xffff; 8]);
    }

    #[test]
    fn test_segments_compressed() {
        assert_eq!(values("::"), [0; 8]);
        assert_eq!(values("::1"), [0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(values("1::"), [1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(values("fe80::1:2"), [0xfe80, 0, 0, 0, 0, 0, 1, 2]);
        assert_eq!(values("1:2:3:4:5:6:7::"), [1, 2, 3, 4, 5, 6, 7, 0]);
    }

    #[test]
    fn test_elided_segments_are_none() {
        let segments = get_ipv6_segments("fe80::1").unwrap();
        assert!(!segments.is_elided(0));
        assert!((1..7).all(|i| segments.is_elided(i)));
        assert!(!segments.is_elided(7));
        let explicit = get_ipv6_segments("fe80:0:0:0:0:0:0:1").unwrap();
        assert!(!explicit.is_elided(3));
        assert_eq!(segments.to_u128(), explicit.to_u128());
    }

    #[test]
    fn test_segments_ipv4_tail() {
        assert_eq!(
            values("::ffff:127.0.0.1"),
            [0, 0, 0, 0, 0, 0xffff, 0x7f00, 0x0001]
        );
        assert_eq!(values("::1.2.3.4"), [0, 0, 0, 0, 0, 0, 0x0102, 0x0304]);
        assert_eq!(
            values("1:2:3:4:5:6:192.168.0.1"),
            [1, 2, 3, 4, 5, 6, 0xc0a8, 0x0001]
        );
        assert_eq!(
            values("::ffff:10.0.0.1%eth0"),
            [0, 0, 0, 0, 0, 0xffff, 0x0a00, 0x0001]
        );
    }

    #[test]
    fn test_dotted_tail_is_recorded() {
        let dotted = get_ipv6_segments("::ffff:127.0.0.1").unwrap();
        let hex = get_ipv6_segments("::ffff:7f00:1").unwrap();
        assert!(dotted.has_dotted_tail());
        assert!(!hex.has_dotted_tail());
        assert_eq!(dotted.to_u128(), hex.to_u128());
        assert!(dotted.is_ipv4_mapped());
        assert!(!hex.is_ipv4_mapped());
        assert!(get_ipv6_segments("::1.2.3.4").unwrap().has_dotted_tail());
    }

    #[test]
    fn test_segments_zone_is_ignored() {
        assert_eq!(
            values("fe80::5555:1111:2222:7777%utun2"),
            [0xfe80, 0, 0, 0, 0x5555, 0x1111, 0x2222, 0x7777]
        );
    }

    #[test]
    fn test_segments_invalid() {
        for ip in ["", "1::2::3", "1.2.3.4", "::ffff:1.2.3.04", "12345::", "1:2:3:4:5:6:7"] {
            assert!(get_ipv6_segments(ip).is_err(), "{ip:?}");
        }
    }

    #[test]
    fn test_segment_checker_prefix_bits() {
        let checker = SegmentChecker::new("fc00::/7").unwrap();
        assert!(checker.matches(&get_ipv6_segments("fd12:3456::1").unwrap()));
        assert!(checker.matches(&get_ipv6_segments("fc00::").unwrap()));
        assert!(!checker.matches(&get_ipv6_segments("fe00::").unwrap()));

        let checker = SegmentChecker::new("2001:db8::/32").unwrap();
        assert!(checker.matches(&get_ipv6_segments("2001:db8:ffff::1").unwrap()));
        assert!(!checker.matches(&get_ipv6_segments("2001:db9::1").unwrap()));

        let checker = SegmentChecker::new("2001:db8:aaaa:bbbb::/60").unwrap();
        assert!(checker.matches(&get_ipv6_segments("2001:db8:aaaa:bbbf::").unwrap()));
        assert!(!checker.matches(&get_ipv6_segments("2001:db8:aaaa:bbcb::").unwrap()));
    }

    #[test]
    fn test_segment_checker_edges() {
        let any = SegmentChecker::new("::/0").unwrap();
        assert_eq!(any.prefix(), 0);
        assert!(any.matches(&get_ipv6_segments("ffff::ffff").unwrap()));

        let host = SegmentChecker::new("::1/128").unwrap();
        assert!(host.matches(&get_ipv6_segments("0:0:0:0:0:0:0:1").unwrap()));
        assert!(!host.matches(&get_ipv6_segments("::2").unwrap()));

        assert!(SegmentChecker::new("::1/129").is_err());
        assert!(SegmentChecker::new("::1").is_err());
        assert!(SegmentChecker::new("10.0.0.0/8").is_err());
    }

    #[test]
    fn test_is_in_subnet() {
        assert!(is_in_subnet("2001:db8::1", "2001:db8::/32").unwrap());
        assert!(!is_in_subnet("2001:db9::1", "2001:db8::/32").unwrap());
        assert!(is_in_subnet("::ffff:10.1.1.1", "::ffff:10.0.0.0/104").unwrap());
        assert!(!is_in_subnet("::ffff:11.1.1.1", "::ffff:10.0.0.0/104").unwrap());
        assert!(is_in_subnet("fe80::1", &["fc00::/7", "fe80::/10"]).unwrap());
        assert!(!is_in_subnet("fe80::1", Vec::<String>::new()).unwrap());
        assert!(is_in_subnet("10.0.0.1", "::/0").is_err());
    }

    #[test]
    fn test_mapped_address() {
        assert!(is_ipv4_mapped_address("::ffff:127.0.0.1"));
        assert!(is_ipv4_mapped_address("::FFFF:1.2.3.4"));
        assert!(is_ipv4_mapped_address("0:0:0:0:0:ffff:127.0.0.1"));
        assert!(!is_ipv4_mapped_address("::ffff:1234:5678"));
        assert!(!is_ipv4_mapped_address("0:0:0:0:0:ffff:7f00:1"));
        assert!(!is_ipv4_mapped_address("::127.0.0.1"));
        assert!(!is_ipv4_mapped_address("::1"));
        assert!(!is_ipv4_mapped_address("1::ffff:1.2.3.4"));
        assert!(!is_ipv4_mapped_address("127.0.0.1"));
        assert!(!is_ipv4_mapped_address("garbage"));
    }

    #[test]
    fn test_extract_mapped_ipv4() {
        assert_eq!(extract_mapped_ipv4("::ffff:172.16.10.10").unwrap(), "172.16.10.10");
        assert!(matches!(
            extract_mapped_ipv4("::ffff:1234:5678"),
            Err(IpError::NotMapped { .. })
        ));
        assert!(extract_mapped_ipv4("::ffff:7f00:1").is_err());
        assert!(matches!(
            extract_mapped_ipv4("::172.16.10.10"),
            Err(IpError::NotMapped { .. })
        ));
        assert!(extract_mapped_ipv4("fe80::1").is_err());
        assert!(extract_mapped_ipv4("1.2.3.4").is_err());
    }

    #[test]
    fn test_named_ranges() {
        assert!(is_private("fe80::5555:1111:2222:7777%utun2").unwrap());
        assert!(is_private("fd00::1").unwrap());
        assert!(!is_private("2a00:1450::1").unwrap());
        assert!(is_localhost("::1").unwrap());
        assert!(!is_localhost("::2").unwrap());
        assert!(is_reserved("::").unwrap());
        assert!(is_reserved("2001:db8::1").unwrap());
        assert!(is_reserved("ff02::1").unwrap());
        assert!(is_reserved("::ffff:8.8.8.8").unwrap());
        assert!(!is_reserved("2a00:1450::1").unwrap());
        assert!(is_special("::1").unwrap());
        assert!(is_special("fc00::").unwrap());
        assert!(!is_special("2606:4700:4700::1111").unwrap());
        assert!(is_localhost("127.0.0.1").is_err());
    }
}
