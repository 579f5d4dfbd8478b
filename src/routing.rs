//! ABA routing numbers, checked once when parsed.

use crate::validate::valid_routing_number;
use std::fmt;
use std::str::FromStr;

/// A 9-digit routing number that passed the 3-7-1 checksum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutingNumber(String);

/// Returned when a routing number fails the length, digit or checksum test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRoutingNumber;

impl RoutingNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first 8 digits, used as the ODFI identification in records.
    pub fn prefix(&self) -> &str {
        &self.0[..8]
    }

    /// The first 8 digits read as an integer, summed into entry hashes.
    pub fn hash_value(&self) -> u64 {
        self.prefix()
            .bytes()
            .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
    }
}

impl FromStr for RoutingNumber {
    type Err = InvalidRoutingNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if valid_routing_number(s) {
            Ok(RoutingNumber(s.to_string()))
        } else {
            Err(InvalidRoutingNumber)
        }
    }
}

impl fmt::Display for RoutingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
