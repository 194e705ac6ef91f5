//! In-process document store.
//!
//! Mirrors the remote semantics the seeder relies on: typed documents with
//! string ids, equality queries on dotted field paths, `set` patches that
//! leave unmentioned fields alone, and content-addressed asset ids.

use async_trait::async_trait;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use uuid::Uuid;

use contentseed_shared::{Result, SeedError};

use crate::{AssetUpload, DocumentStore, Fields, KeyFilter, RemoteDocument};

/// A recorded asset upload.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Default)]
struct MemoryState {
    /// Documents in creation order.
    documents: Vec<Fields>,
    /// Every upload call, including repeats of identical bytes.
    uploads: Vec<StoredAsset>,
    creates: usize,
    patches: usize,
}

/// Document store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all documents of `doc_type`, in creation order.
    pub async fn documents_of_type(&self, doc_type: &str) -> Vec<Fields> {
        let state = self.state.lock().await;
        state
            .documents
            .iter()
            .filter(|d| d.get("_type").and_then(Value::as_str) == Some(doc_type))
            .cloned()
            .collect()
    }

    /// Snapshot of one document by id.
    pub async fn document(&self, id: &str) -> Option<Fields> {
        let state = self.state.lock().await;
        state
            .documents
            .iter()
            .find(|d| document_id(d) == Some(id))
            .cloned()
    }

    pub async fn document_count(&self) -> usize {
        self.state.lock().await.documents.len()
    }

    /// Number of `upload_asset` calls received.
    pub async fn upload_count(&self) -> usize {
        self.state.lock().await.uploads.len()
    }

    pub async fn uploads(&self) -> Vec<StoredAsset> {
        self.state.lock().await.uploads.clone()
    }

    /// `(creates, patches)` received so far.
    pub async fn write_counts(&self) -> (usize, usize) {
        let state = self.state.lock().await;
        (state.creates, state.patches)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query(&self, doc_type: &str, filter: &KeyFilter) -> Result<Option<RemoteDocument>> {
        let state = self.state.lock().await;
        let found = state.documents.iter().find(|d| {
            d.get("_type").and_then(Value::as_str) == Some(doc_type)
                && lookup(d, filter.field()).and_then(Value::as_str) == Some(filter.value())
        });
        Ok(found.cloned().and_then(RemoteDocument::from_fields))
    }

    async fn create(&self, document: &Fields) -> Result<String> {
        if document
            .get("_type")
            .and_then(Value::as_str)
            .is_none_or(str::is_empty)
        {
            return Err(SeedError::Remote {
                status: 400,
                message: "document is missing _type".into(),
            });
        }

        let mut state = self.state.lock().await;
        let id = match document_id(document) {
            Some(id) => {
                if state.documents.iter().any(|d| document_id(d) == Some(id)) {
                    return Err(SeedError::Remote {
                        status: 409,
                        message: format!("document '{id}' already exists"),
                    });
                }
                id.to_string()
            }
            None => Uuid::now_v7().to_string(),
        };

        let mut stored = document.clone();
        stored.insert("_id".into(), Value::String(id.clone()));
        state.documents.push(stored);
        state.creates += 1;
        Ok(id)
    }

    async fn patch(&self, id: &str, fields: &Fields) -> Result<()> {
        let mut state = self.state.lock().await;
        let doc = state
            .documents
            .iter_mut()
            .find(|d| document_id(d) == Some(id))
            .ok_or_else(|| SeedError::Remote {
                status: 404,
                message: format!("document '{id}' not found"),
            })?;

        for (key, value) in fields {
            if key == "_id" || key == "_type" {
                continue;
            }
            doc.insert(key.clone(), value.clone());
        }
        state.patches += 1;
        Ok(())
    }

    async fn upload_asset(&self, upload: AssetUpload<'_>) -> Result<String> {
        let digest = format!("{:x}", Sha256::digest(upload.bytes));
        let extension = upload
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".into());
        let id = format!(
            "{}-{}-{extension}",
            upload.kind.field_type(),
            &digest[..40]
        );

        let mut state = self.state.lock().await;
        state.uploads.push(StoredAsset {
            id: id.clone(),
            filename: upload.filename.to_string(),
            content_type: upload.content_type.to_string(),
            size: upload.bytes.len(),
        });
        Ok(id)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

fn document_id(doc: &Fields) -> Option<&str> {
    doc.get("_id").and_then(Value::as_str)
}

/// Resolve a dotted path such as `slug.current` inside a document.
fn lookup<'a>(doc: &'a Fields, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AssetKind;
    use serde_json::json;

    fn obj(v: Value) -> Fields {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn create_then_query_by_nested_field() {
        let store = MemoryStore::new();
        let id = store
            .create(&obj(json!({
                "_type": "seoService",
                "slug": {"_type": "slug", "current": "acme"},
                "title": "Acme"
            })))
            .await
            .unwrap();

        let filter = KeyFilter::new("slug.current", "acme").unwrap();
        let found = store.query("seoService", &filter).await.unwrap().unwrap();
        assert_eq!(found.id, id);

        // Same key, different type: no match.
        assert!(store.query("blogPost", &filter).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn patch_merges_fields() {
        let store = MemoryStore::new();
        let id = store
            .create(&obj(json!({"_type": "faqCategory", "title": "General", "a": 1, "b": 2})))
            .await
            .unwrap();

        store
            .patch(&id, &obj(json!({"b": 3, "c": 4, "_type": "ignored"})))
            .await
            .unwrap();

        let doc = store.document(&id).await.unwrap();
        assert_eq!(doc["a"], 1);
        assert_eq!(doc["b"], 3);
        assert_eq!(doc["c"], 4);
        assert_eq!(doc["_type"], "faqCategory");
    }

    #[tokio::test]
    async fn fixed_ids_cannot_be_created_twice() {
        let store = MemoryStore::new();
        let doc = obj(json!({"_id": "navbar", "_type": "navbar"}));
        assert_eq!(store.create(&doc).await.unwrap(), "navbar");
        let err = store.create(&doc).await.unwrap_err();
        assert!(matches!(err, SeedError::Remote { status: 409, .. }));
    }

    #[tokio::test]
    async fn patch_unknown_document_fails() {
        let store = MemoryStore::new();
        let err = store.patch("missing", &Fields::new()).await.unwrap_err();
        assert!(matches!(err, SeedError::Remote { status: 404, .. }));
    }

    #[tokio::test]
    async fn uploads_are_content_addressed_and_counted() {
        let store = MemoryStore::new();
        let upload = AssetUpload {
            bytes: b"png-bytes",
            filename: "hero.PNG",
            content_type: "image/png",
            kind: AssetKind::Image,
        };
        let a = store.upload_asset(upload).await.unwrap();
        let b = store.upload_asset(upload).await.unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("image-"));
        assert!(a.ends_with("-png"));
        assert_eq!(store.upload_count().await, 2);
    }
}
