//! Idempotent create-or-patch by natural key.

use serde_json::{Value, json};
use tracing::{debug, instrument};

use contentseed_shared::{NaturalKey, Result};
use contentseed_store::{DocumentStore, Fields, KeyFilter};
use contentseed_transform::TransformedDocument;

use crate::retry::RetryPolicy;

/// What an upsert did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(String),
    Updated(String),
}

impl UpsertOutcome {
    pub fn id(&self) -> &str {
        match self {
            UpsertOutcome::Created(id) | UpsertOutcome::Updated(id) => id,
        }
    }
}

/// Create `doc` or, when a document with the same natural key exists, patch
/// its top-level fields. Fields absent from `doc` are left untouched.
///
/// Every remote call goes through `retry`; a failure after retries is
/// returned to the caller as is.
#[instrument(skip_all, fields(doc_type = doc.spec.doc_type, key = %doc.key_value))]
pub async fn upsert(
    store: &dyn DocumentStore,
    retry: &RetryPolicy,
    doc: &TransformedDocument,
) -> Result<UpsertOutcome> {
    let spec = &doc.spec;
    let filter = KeyFilter::new(spec.natural_key.field(), doc.key_value.as_str())?;

    let existing = retry
        .execute("query", || store.query(spec.doc_type, &filter))
        .await?;

    if let Some(existing) = existing {
        retry
            .execute("patch", || store.patch(&existing.id, &doc.fields))
            .await?;
        debug!(id = %existing.id, "patched existing document");
        return Ok(UpsertOutcome::Updated(existing.id));
    }

    let document = new_document(doc);
    let id = retry
        .execute("create", || store.create(&document))
        .await?;
    debug!(%id, "created document");
    Ok(UpsertOutcome::Created(id))
}

/// `_type`, the embedded natural key, then the transformed fields.
fn new_document(doc: &TransformedDocument) -> Fields {
    let mut document = Fields::new();
    document.insert("_type".into(), json!(doc.spec.doc_type));
    match doc.spec.natural_key {
        NaturalKey::Singleton(id) => {
            document.insert("_id".into(), json!(id));
        }
        NaturalKey::Slug => {
            document.insert(
                "slug".into(),
                json!({"_type": "slug", "current": doc.key_value}),
            );
        }
        NaturalKey::Title => {
            document.insert("title".into(), Value::String(doc.key_value.clone()));
        }
    }
    for (key, value) in &doc.fields {
        document.insert(key.clone(), value.clone());
    }
    document
}
