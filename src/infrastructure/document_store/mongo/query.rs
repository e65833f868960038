//! Query builders for keyset pagination and embedded-array mutation.

use mongodb::bson::{doc, Bson, Document};

use crate::domain::{Cursor, PageRequest, RecordId};

/// Restricts `base` to keys strictly below the cursor. The two predicates are
/// always combined with `$and`, so the cursor never widens `base`.
pub fn keyset_filter(base: Document, key: &str, cursor: &Cursor) -> Document {
    let Some(bound) = cursor.position() else {
        return base;
    };

    let below = doc! { key: { "$lt": bound } };
    if base.is_empty() {
        below
    } else {
        doc! { "$and": [base, below] }
    }
}

/// Matches any of `ids` by `_id`.
pub fn id_in(ids: &[RecordId]) -> Document {
    let ids: Vec<Bson> = ids.iter().copied().map(Bson::from).collect();
    doc! { "_id": { "$in": ids } }
}

pub fn newest_first(key: &str) -> Document {
    doc! { key: -1 }
}

/// List view: no long description, no services.
pub fn summary_projection() -> Document {
    doc! { "long_description": 0, "services": 0 }
}

/// Detail view: no short description, services capped at `preview_len`.
pub fn detail_projection(preview_len: i64) -> Document {
    doc! { "short_description": 0, "services": { "$slice": preview_len } }
}

/// Rewrites plain field names to target the array element matched by the
/// update filter (`services.$.price`, ...).
pub fn positional_set(array: &str, fields: Document) -> Document {
    fields
        .into_iter()
        .map(|(key, value)| (format!("{array}.$.{key}"), value))
        .collect()
}

/// Paginates the elements of one parent's embedded array: select the parent,
/// keep only the array, unwind it into rows, promote each row to the root,
/// then apply the same cursor/sort/limit as a top-level listing.
pub fn nested_page_pipeline(
    parent_id: RecordId,
    array: &str,
    child_key: &str,
    page: &PageRequest,
) -> Vec<Document> {
    let array_path = Bson::String(format!("${array}"));

    let mut pipeline = vec![
        doc! { "$match": { "_id": parent_id } },
        doc! { "$project": { "_id": 0, array: 1 } },
        doc! { "$unwind": array_path.clone() },
        doc! { "$replaceRoot": { "newRoot": array_path } },
    ];

    if let Some(bound) = page.cursor.position() {
        pipeline.push(doc! { "$match": { child_key: { "$lt": bound } } });
    }

    pipeline.push(doc! { "$sort": newest_first(child_key) });
    pipeline.push(doc! { "$limit": page.limit() });
    pipeline
}
