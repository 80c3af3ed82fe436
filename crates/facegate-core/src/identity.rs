//! Identity newtypes and the enrollment record.
//!
//! [`IdentityId`] and [`IdentityName`] can only be built through validating
//! constructors, so every value that reaches the store already satisfies
//! the input rules operators are held to:
//!
//! - ids are digit strings that fit a signed 64-bit SQLite integer key
//! - names are letters and spaces with at least one letter
//!
//! Raw input is trimmed before validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::embedding::Embedding;
use crate::errors::IdentityError;

/// Largest id the store can key on (`INTEGER PRIMARY KEY` is signed).
const MAX_ID: u64 = i64::MAX.unsigned_abs();

/// Unique numeric identity key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct IdentityId(u64);

impl IdentityId {
    /// Build from a number, rejecting values above `i64::MAX`.
    pub fn new(value: u64) -> Result<Self, IdentityError> {
        if value > MAX_ID {
            return Err(IdentityError::IdOutOfRange(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parse raw operator input: trimmed, non-empty, ASCII digits only.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(IdentityError::EmptyId);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdentityError::NonNumericId(s.to_owned()));
        }
        let value: u64 = s
            .parse()
            .map_err(|_| IdentityError::IdOutOfRange(s.to_owned()))?;
        Self::new(value)
    }

    /// Rebuild from a stored SQLite key.
    pub fn from_sql_key(key: i64) -> Result<Self, IdentityError> {
        u64::try_from(key)
            .map(Self)
            .map_err(|_| IdentityError::IdOutOfRange(key.to_string()))
    }

    /// The SQLite key for this id.
    #[allow(clippy::cast_possible_wrap)]
    pub fn to_sql_key(self) -> i64 {
        // bounded by MAX_ID at construction
        self.0 as i64
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for IdentityId {
    type Error = IdentityError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IdentityId> for u64 {
    fn from(id: IdentityId) -> Self {
        id.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name of an enrolled identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityName(String);

impl IdentityName {
    /// Parse raw operator input: trimmed, letters and spaces only, at least
    /// one letter.
    pub fn parse(raw: &str) -> Result<Self, IdentityError> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(IdentityError::EmptyName);
        }
        let valid = s.chars().all(|c| c == ' ' || c.is_alphabetic())
            && s.chars().any(char::is_alphabetic);
        if !valid {
            return Err(IdentityError::InvalidName(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for IdentityName {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IdentityName> for String {
    fn from(name: IdentityName) -> Self {
        name.0
    }
}

impl AsRef<str> for IdentityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One enrolled identity: the unit the store persists and scans.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRecord {
    /// Unique numeric key.
    pub identity_id: IdentityId,
    /// Unique display name.
    pub identity_name: IdentityName,
    /// The enrolled face embedding.
    pub embedding: Embedding,
}

impl IdentityRecord {
    /// Bundle the three fields.
    pub fn new(identity_id: IdentityId, identity_name: IdentityName, embedding: Embedding) -> Self {
        Self {
            identity_id,
            identity_name,
            embedding,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
