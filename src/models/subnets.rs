//! Subnet list arguments.

use super::Cidr;
use serde::{Deserialize, Serialize};

/// Anything that can be viewed as a list of subnet strings.
///
/// A single string is a one-element list, so every checker accepts either
/// `"10.0.0.0/8"` or `&["10.0.0.0/8", "fc00::/7"]`.
pub trait IntoSubnets {
    fn subnet_strs(&self) -> Vec<&str>;
}

impl IntoSubnets for str {
    fn subnet_strs(&self) -> Vec<&str> {
        vec![self]
    }
}

impl IntoSubnets for String {
    fn subnet_strs(&self) -> Vec<&str> {
        vec![self.as_str()]
    }
}

impl<S: AsRef<str>> IntoSubnets for [S] {
    fn subnet_strs(&self) -> Vec<&str> {
        self.iter().map(|s| s.as_ref()).collect()
    }
}

impl<S: AsRef<str>, const N: usize> IntoSubnets for [S; N] {
    fn subnet_strs(&self) -> Vec<&str> {
        self.as_slice().subnet_strs()
    }
}

impl<S: AsRef<str>> IntoSubnets for Vec<S> {
    fn subnet_strs(&self) -> Vec<&str> {
        self.as_slice().subnet_strs()
    }
}

impl<T: IntoSubnets + ?Sized> IntoSubnets for &T {
    fn subnet_strs(&self) -> Vec<&str> {
        (**self).subnet_strs()
    }
}

/// A subnet list as read from a JSON document, e.g.
/// `{ "subnets": ["10.0.0.0/8", "fc00::/7"] }`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetList {
    #[serde(default)]
    pub subnets: Vec<Cidr>,
}

impl SubnetList {
    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }
}

impl IntoSubnets for SubnetList {
    fn subnet_strs(&self) -> Vec<&str> {
        self.subnets.subnet_strs()
    }
}
