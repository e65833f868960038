//! Sparse field-level merge for partial updates.
//!
//! An update value marks each field as provided (`Some`) or not (`None`).
//! Only provided fields reach the store, so an update can never blank out
//! data the caller did not mention.

use mongodb::bson::{self, Bson, Document};
use serde::Serialize;

use crate::domain::errors::DomainError;

/// Capability shared by every partial-update type.
pub trait Patch: Serialize {
    /// Storage name of the entity's identity field. It is never part of the
    /// merged document.
    const IDENTITY_FIELD: &'static str;

    /// Returns the provided fields keyed by storage name, or `None` when the
    /// update carries nothing to change.
    fn set_fields(&self) -> Result<Option<Document>, DomainError> {
        let mut fields = bson::to_document(self)
            .map_err(|e| DomainError::internal(format!("failed to encode update: {e}")))?;
        fields.remove(Self::IDENTITY_FIELD);

        if fields.is_empty() {
            Ok(None)
        } else {
            Ok(Some(fields))
        }
    }
}

/// Overwrites `target`'s fields with `fields`, returning whether any value
/// actually changed. Integers compare by value, so an `Int32` equal to a
/// stored `Int64` is not a change, matching the store's own `$set`.
pub fn merge_fields(target: &mut Document, fields: &Document) -> bool {
    let mut changed = false;
    for (key, value) in fields {
        if !target.get(key).is_some_and(|current| same_value(current, value)) {
            target.insert(key.clone(), value.clone());
            changed = true;
        }
    }
    changed
}

fn same_value(a: &Bson, b: &Bson) -> bool {
    match (a, b) {
        (Bson::Int32(x), Bson::Int64(y)) | (Bson::Int64(y), Bson::Int32(x)) => {
            i64::from(*x) == *y
        }
        _ => a == b,
    }
}
