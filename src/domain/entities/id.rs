use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Store-assigned identifier. Ordering follows creation order, so it doubles
/// as the pagination key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(ObjectId);

impl RecordId {
    /// The all-zero identifier, never produced by `generate`.
    pub const UNSET: RecordId = RecordId(ObjectId::from_bytes([0; 12]));

    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn parse(hex: &str) -> Result<Self, DomainError> {
        ObjectId::parse_str(hex)
            .map(Self)
            .map_err(|e| DomainError::invalid_argument(format!("invalid id {hex:?}: {e}")))
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for RecordId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl From<RecordId> for ObjectId {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl From<RecordId> for Bson {
    fn from(id: RecordId) -> Self {
        Bson::ObjectId(id.0)
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Keyset position: either the newest end of a collection, or strictly
/// below a previously seen identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor(Option<RecordId>);

impl Cursor {
    pub const START: Cursor = Cursor(None);

    /// An unset identifier collapses to `START`.
    pub fn after(id: RecordId) -> Self {
        if id.is_unset() {
            Self::START
        } else {
            Self(Some(id))
        }
    }

    /// Missing or empty text means "start from the newest record".
    pub fn parse(raw: Option<&str>) -> Result<Self, DomainError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::START),
            Some(hex) => RecordId::parse(hex).map(Self::after),
        }
    }

    pub fn is_start(&self) -> bool {
        self.0.is_none()
    }

    pub fn position(&self) -> Option<RecordId> {
        self.0
    }

    pub fn admits(&self, id: RecordId) -> bool {
        match self.0 {
            Some(bound) => id < bound,
            None => true,
        }
    }
}

impl From<RecordId> for Cursor {
    fn from(id: RecordId) -> Self {
        Self::after(id)
    }
}
