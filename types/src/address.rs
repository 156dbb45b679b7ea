//! Caller / voter address.

use crate::error::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An authenticated principal on the ledger.
///
/// The hosting environment is responsible for authenticating whoever presents
/// an address; the ledger only compares them.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string is empty or contains whitespace. Use
    /// [`Address::parse`] for untrusted input.
    pub fn new(raw: impl Into<String>) -> Self {
        match Self::parse(raw) {
            Ok(addr) => addr,
            Err(e) => panic!("{e}"),
        }
    }

    /// Parse an address, rejecting empty strings and embedded whitespace.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TypeError> {
        let s = raw.into();
        if s.is_empty() {
            return Err(TypeError::InvalidAddress("address is empty".into()));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidAddress(format!(
                "address {s:?} contains whitespace"
            )));
        }
        Ok(Self(s))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Address {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.0
    }
}
