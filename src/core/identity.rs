//! Entity identity: opaque string IDs, with type-prefixed ULIDs for new records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Entity type prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityPrefix {
    /// Restoration project
    Proj,
    /// Part tracked against a project
    Part,
    /// Sub-project (a phase of work within a project)
    Sub,
    /// Photo (project gallery or inspiration)
    Photo,
}

impl EntityPrefix {
    /// Get the string representation of the prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Proj => "PROJ",
            EntityPrefix::Part => "PART",
            EntityPrefix::Sub => "SUB",
            EntityPrefix::Photo => "PHOTO",
        }
    }

    /// Get all valid prefixes
    pub fn all() -> &'static [EntityPrefix] {
        &[
            EntityPrefix::Proj,
            EntityPrefix::Part,
            EntityPrefix::Sub,
            EntityPrefix::Photo,
        ]
    }
}

impl fmt::Display for EntityPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PROJ" => Ok(EntityPrefix::Proj),
            "PART" => Ok(EntityPrefix::Part),
            "SUB" => Ok(EntityPrefix::Sub),
            "PHOTO" => Ok(EntityPrefix::Photo),
            _ => Err(IdParseError::InvalidPrefix(s.to_string())),
        }
    }
}

/// An opaque entity identifier
///
/// Any non-empty string is a valid ID. Freshly created entities get a
/// `<PREFIX>-<ULID>` value so IDs never collide across a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    /// Create a new unique EntityId with the given prefix
    pub fn new(prefix: EntityPrefix) -> Self {
        Self(format!("{}-{}", prefix, Ulid::new()))
    }

    /// Parse an EntityId from a string
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The type prefix, if this ID was generated with one
    pub fn prefix(&self) -> Option<EntityPrefix> {
        self.0
            .split_once('-')
            .and_then(|(prefix, _)| prefix.parse().ok())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IdParseError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Errors that can occur when parsing entity IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid entity prefix: '{0}' (valid: PROJ, PART, SUB, PHOTO)")]
    InvalidPrefix(String),

    #[error("entity ID cannot be empty")]
    Empty,
}
