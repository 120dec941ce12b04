//! Named-range verdicts for one address.

use crate::dispatch;
use crate::error::{AddressKind, IpError, Result};
use crate::ipv6;
use crate::validate::family_of;
use serde::Serialize;

/// Every classification the crate knows about, for display.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub address: String,
    /// 4 or 6.
    pub family: u8,
    pub private: bool,
    pub localhost: bool,
    pub reserved: bool,
    pub special: bool,
    pub ipv4_mapped: bool,
    /// The embedded dotted quad of a mapped address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapped_ipv4: Option<String>,
}

impl Classification {
    pub fn of(address: &str) -> Result<Classification> {
        let family = family_of(address)
            .ok_or_else(|| IpError::invalid_address(AddressKind::Any, address))?;
        let mapped_ipv4 = ipv6::extract_mapped_ipv4(address).ok();

        Ok(Classification {
            address: address.to_string(),
            family: family.number(),
            private: dispatch::is_private(address)?,
            localhost: dispatch::is_localhost(address)?,
            reserved: dispatch::is_reserved(address)?,
            special: dispatch::is_special(address)?,
            ipv4_mapped: mapped_ipv4.is_some(),
            mapped_ipv4,
        })
    }

    /// `(name, verdict)` pairs in display order.
    pub fn flags(&self) -> [(&'static str, bool); 5] {
        [
            ("private", self.private),
            ("localhost", self.localhost),
            ("reserved", self.reserved),
            ("special", self.special),
            ("ipv4_mapped", self.ipv4_mapped),
        ]
    }
}
