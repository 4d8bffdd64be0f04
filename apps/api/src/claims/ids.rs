//! Claim identifiers of the form `<PREFIX>-<YEAR>-<NUM>`, e.g. `MN-2024-555`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::claims::ClaimError;

const MAX_PREFIX_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClaimId(String);

impl ClaimId {
    /// Builds an id from its parts. `number` comes from the store's sequence,
    /// so ids minted this way never repeat within one store.
    pub fn new(prefix: &str, year: i32, number: u64) -> Result<Self, ClaimError> {
        validate_prefix(prefix)?;
        if !(1000..=9999).contains(&year) {
            return Err(ClaimError::InvalidClaimId(format!(
                "year {year} must have four digits"
            )));
        }
        Ok(ClaimId(format!("{prefix}-{year}-{number}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Checks that a configured prefix is 1-8 uppercase ASCII letters.
pub fn validate_prefix(prefix: &str) -> Result<(), ClaimError> {
    if prefix.is_empty()
        || prefix.len() > MAX_PREFIX_LEN
        || !prefix.bytes().all(|b| b.is_ascii_uppercase())
    {
        return Err(ClaimError::InvalidClaimId(format!(
            "prefix '{prefix}' must be 1-{MAX_PREFIX_LEN} uppercase letters"
        )));
    }
    Ok(())
}

impl FromStr for ClaimId {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClaimError::InvalidClaimId(format!("'{s}' is not <PREFIX>-<YEAR>-<NUM>"));

        let mut parts = s.split('-');
        let (Some(prefix), Some(year), Some(number), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        validate_prefix(prefix).map_err(|_| invalid())?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        Ok(ClaimId(s.to_string()))
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ClaimId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ClaimId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
