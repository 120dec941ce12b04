//! Well-known address ranges and the lazily built checkers over them.
//!
//! https://en.wikipedia.org/wiki/Reserved_IP_addresses

use crate::error::Result;
use crate::validate::IpFamily;
use std::fmt;
use std::sync::OnceLock;

pub const IPV4_PRIVATE: &[&str] = &[
    "10.0.0.0/8",
    "169.254.0.0/16",
    "172.16.0.0/12",
    "192.168.0.0/16",
];

pub const IPV4_LOCALHOST: &[&str] = &["127.0.0.0/8"];

pub const IPV4_RESERVED: &[&str] = &[
    "0.0.0.0/8",
    "100.64.0.0/10",
    "192.0.0.0/24",
    "192.0.2.0/24",
    "192.88.99.0/24",
    "198.18.0.0/15",
    "198.51.100.0/24",
    "203.0.113.0/24",
    "224.0.0.0/4",
    "233.252.0.0/24",
    "240.0.0.0/4",
    "255.255.255.255/32",
];

pub const IPV6_PRIVATE: &[&str] = &["fc00::/7", "fe80::/10"];

pub const IPV6_LOCALHOST: &[&str] = &["::1/128"];

pub const IPV6_RESERVED: &[&str] = &[
    "::/128",
    "::ffff:0:0/96",
    "::ffff:0:0:0/96",
    "64:ff9b::/96",
    "64:ff9b:1::/48",
    "100::/64",
    "2001::/32",
    "2001:20::/28",
    "2001:db8::/32",
    "2002::/16",
    "3fff::/20",
    "5f00::/16",
    "ff00::/8",
];

/// Named address range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Range {
    Private,
    Localhost,
    Reserved,
    /// Union of the three above.
    Special,
}

impl Range {
    pub const ALL: [Range; 4] = [
        Range::Private,
        Range::Localhost,
        Range::Reserved,
        Range::Special,
    ];

    fn index(self) -> usize {
        match self {
            Range::Private => 0,
            Range::Localhost => 1,
            Range::Reserved => 2,
            Range::Special => 3,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Range::Private => write!(f, "private"),
            Range::Localhost => write!(f, "localhost"),
            Range::Reserved => write!(f, "reserved"),
            Range::Special => write!(f, "special"),
        }
    }
}

/// Subnets making up `range` for the given family.
///
/// `Special` is the plain concatenation of private, localhost and reserved,
/// overlapping subnets are kept as they are.
pub fn table(family: IpFamily, range: Range) -> Vec<&'static str> {
    let (private, localhost, reserved) = match family {
        IpFamily::V4 => (IPV4_PRIVATE, IPV4_LOCALHOST, IPV4_RESERVED),
        IpFamily::V6 => (IPV6_PRIVATE, IPV6_LOCALHOST, IPV6_RESERVED),
    };
    match range {
        Range::Private => private.to_vec(),
        Range::Localhost => localhost.to_vec(),
        Range::Reserved => reserved.to_vec(),
        Range::Special => [private, localhost, reserved].concat(),
    }
}

/// Process-wide cache of range checkers for one address family.
///
/// Each slot is built on first use and never invalidated. Concurrent first
/// callers block on the same `OnceLock`, so a checker is built exactly once.
pub struct RangeRegistry<C> {
    family: IpFamily,
    build: fn(&[&'static str]) -> Result<C>,
    slots: [OnceLock<C>; 4],
}

impl<C> RangeRegistry<C> {
    pub const fn new(family: IpFamily, build: fn(&[&'static str]) -> Result<C>) -> Self {
        RangeRegistry {
            family,
            build,
            slots: [
                OnceLock::new(),
                OnceLock::new(),
                OnceLock::new(),
                OnceLock::new(),
            ],
        }
    }

    /// Checker for `range`, building it on first call.
    ///
    /// # Panics
    /// * If the static range table holds an unparseable subnet
    pub fn get(&self, range: Range) -> &C {
        self.slots[range.index()].get_or_init(|| {
            let subnets = table(self.family, range);
            log::debug!(
                "building {} {} range checker over {} subnets",
                self.family,
                range,
                subnets.len()
            );
            (self.build)(&subnets).expect("Invalid static range table")
        })
    }

    /// True if the checker for `range` has already been built.
    pub fn is_built(&self, range: Range) -> bool {
        self.slots[range.index()].get().is_some()
    }
}
