//! IPv4 / IPv6 subnet membership and address classification.
//!
//! Pure text-to-bits checks with no I/O: validate an address, test it
//! against one or more CIDR subnets, or ask whether it is private,
//! localhost, reserved or an IPv4-mapped IPv6 address.
//!
//! ```
//! use subnet_check::{create_checker, is_localhost, is_private};
//!
//! let trusted = create_checker(["10.0.0.0/8", "fc00::/7"]).unwrap();
//! assert!(trusted.check("10.1.2.3").unwrap());
//! assert!(trusted.check("::ffff:10.1.2.3").unwrap());
//! assert!(is_private("192.168.0.1").unwrap());
//! assert!(is_localhost("::ffff:127.0.0.1").unwrap());
//! ```

mod dispatch;
mod error;

pub mod config;
pub mod ipv4;
pub mod ipv6;
pub mod models;
pub mod output;
pub mod ranges;
pub mod validate;

pub use dispatch::{
    create_checker, is_in_subnet, is_ipv4_mapped_address, is_localhost, is_private, is_reserved,
    is_special, Checker,
};
pub use error::{AddressKind, IpError, Result};
pub use ipv6::extract_mapped_ipv4;
pub use models::{Cidr, IntoSubnets};
pub use validate::{family_of, is_ip, is_ipv4, is_ipv6, IpFamily};
