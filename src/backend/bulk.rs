//! NDJSON encoding of bulk create requests

use serde::Serialize;
use std::sync::Arc;

use crate::trajectory::TrackedItem;
use crate::types::{DocumentId, IdPolicy, RecordSchema};

#[derive(Serialize)]
struct CreateAction {
    create: ActionMeta,
}

#[derive(Serialize)]
struct ActionMeta {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<DocumentId>,
}

/// Stored form of an item
#[derive(Serialize)]
struct Document<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    indexed: Option<i64>,
    #[serde(flatten)]
    item: &'a TrackedItem,
}

/// Encode one bulk request body for the items created at `time_step`
///
/// Every item becomes a `create` action line followed by its document line.
/// `indexed` is the wall-clock epoch second stamped on each document when the
/// schema carries it. The body ends with a newline.
pub fn encode_batch(
    time_step: i64,
    items: &[Arc<TrackedItem>],
    schema: RecordSchema,
    indexed: i64,
) -> serde_json::Result<String> {
    let mut body = String::new();

    for (index, item) in items.iter().enumerate() {
        let id = match schema.id_policy() {
            IdPolicy::Composed => Some(DocumentId::composed(time_step, index)),
            IdPolicy::BackendAssigned => None,
        };
        let action = CreateAction { create: ActionMeta { id } };
        let document = Document {
            indexed: schema.has_indexed().then_some(indexed),
            item: item.as_ref(),
        };

        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(&document)?);
        body.push('\n');
    }

    Ok(body)
}
