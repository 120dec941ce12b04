//! Value types used across the crate:
//! - [`Cidr`] - validated subnet in CIDR notation
//! - [`IntoSubnets`] and [`SubnetList`] - subnet list arguments
//! - [`Classification`] - every named-range verdict for one address

mod cidr;
mod classification;
mod subnets;

// Re-export public types
pub(crate) use cidr::split_subnet;
pub use cidr::Cidr;
pub use classification::Classification;
pub use subnets::{IntoSubnets, SubnetList};
