//! Error type shared by the validators, the family engines and the dispatcher.

use std::fmt;

/// Which kind of address a parser expected to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    Ipv4,
    Ipv6,
    /// Either family (used by the dispatcher).
    Any,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AddressKind::Ipv4 => write!(f, "IPv4"),
            AddressKind::Ipv6 => write!(f, "IPv6"),
            AddressKind::Any => write!(f, "IPv4 or IPv6"),
        }
    }
}

/// Everything that can go wrong while parsing addresses or subnets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IpError {
    #[error("\"{value}\" is not a valid {expected} address")]
    InvalidAddress { expected: AddressKind, value: String },

    #[error("\"{subnet}\" is not a valid subnet: {reason}")]
    InvalidSubnet {
        subnet: String,
        reason: &'static str,
    },

    #[error("prefix length {prefix} is out of range 0..={max} in subnet \"{subnet}\"")]
    PrefixOutOfRange {
        subnet: String,
        prefix: i64,
        max: u8,
    },

    #[error("subnets are neither IPv4 nor IPv6: {}", .subnets.join(", "))]
    UnknownSubnetFamily { subnets: Vec<String> },

    #[error("\"{address}\" is not an IPv4-mapped IPv6 address")]
    NotMapped { address: String },
}

impl IpError {
    pub(crate) fn invalid_address(expected: AddressKind, value: &str) -> Self {
        IpError::InvalidAddress {
            expected,
            value: value.to_string(),
        }
    }

    pub(crate) fn invalid_subnet(subnet: &str, reason: &'static str) -> Self {
        IpError::InvalidSubnet {
            subnet: subnet.to_string(),
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, IpError>;
