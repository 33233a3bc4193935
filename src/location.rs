//! Viewer location keys
//!
//! A location key is either a validated 5-digit ZIP code or the `default`
//! sentinel used as the fallback entry in every regional override table.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::LocationError;

pub const DEFAULT_KEY: &str = "default";

const ZIP_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocationKey {
    Zip(String),
    Default,
}

impl LocationKey {
    /// Validate a ZIP code: exactly five ASCII decimal digits, nothing else.
    pub fn parse_zip(candidate: &str) -> Result<Self, LocationError> {
        if is_valid_zip(candidate) {
            Ok(LocationKey::Zip(candidate.to_string()))
        } else {
            Err(LocationError::InvalidZip(candidate.to_string()))
        }
    }

    /// Validate optional user input, trimming surrounding whitespace first.
    pub fn from_input(candidate: Option<&str>) -> Result<Self, LocationError> {
        match candidate {
            Some(raw) => Self::parse_zip(raw.trim()),
            None => Err(LocationError::Missing),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LocationKey::Zip(zip) => zip,
            LocationKey::Default => DEFAULT_KEY,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, LocationKey::Default)
    }
}

pub fn is_valid_zip(candidate: &str) -> bool {
    candidate.len() == ZIP_LEN && candidate.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationKey {
    type Err = LocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == DEFAULT_KEY {
            Ok(LocationKey::Default)
        } else {
            Self::parse_zip(s)
        }
    }
}

impl Serialize for LocationKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LocationKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
