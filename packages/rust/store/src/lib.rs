//! Remote document store abstraction.
//!
//! The seeder needs exactly four remote operations: fetch one document by a
//! natural-key filter, create a document, patch fields into a document, and
//! upload a binary asset. [`DocumentStore`] captures them; two backends
//! implement it:
//! - [`HttpStore`] — the hosted content API over HTTPS
//! - [`MemoryStore`] — in-process store for dry runs and tests

mod http;
mod memory;

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{Map, Value};

use contentseed_shared::{Result, SeedError};

pub use http::HttpStore;
pub use memory::MemoryStore;

/// A JSON object as stored remotely.
pub type Fields = Map<String, Value>;

static FIELD_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Request/response types
// ---------------------------------------------------------------------------

/// Equality filter on a (possibly nested) document field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFilter {
    field: String,
    value: String,
}

impl KeyFilter {
    /// Build a filter. `field` must be a dotted identifier path such as
    /// `slug.current`; it ends up inside a query expression.
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let field = field.into();
        if !FIELD_PATH_RE.is_match(&field) {
            return Err(SeedError::validation(format!(
                "invalid filter field '{field}'"
            )));
        }
        Ok(Self {
            field,
            value: value.into(),
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An existing document returned by [`DocumentStore::query`].
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteDocument {
    pub id: String,
    pub fields: Fields,
}

impl RemoteDocument {
    /// Build from a raw store document; `None` if it carries no `_id`.
    pub fn from_fields(fields: Fields) -> Option<Self> {
        let id = fields.get("_id")?.as_str()?.to_string();
        Some(Self { id, fields })
    }
}

/// Which asset endpoint an upload goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    File,
}

impl AssetKind {
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("image/") {
            AssetKind::Image
        } else {
            AssetKind::File
        }
    }

    /// Path segment of the upload endpoint.
    pub fn endpoint(self) -> &'static str {
        match self {
            AssetKind::Image => "images",
            AssetKind::File => "files",
        }
    }

    /// `_type` of a field that references an asset of this kind.
    pub fn field_type(self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::File => "file",
        }
    }
}

/// One binary asset upload.
#[derive(Debug, Clone, Copy)]
pub struct AssetUpload<'a> {
    pub bytes: &'a [u8],
    pub filename: &'a str,
    pub content_type: &'a str,
    pub kind: AssetKind,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// The remote operations the seeding pipeline depends on.
///
/// Implementations perform exactly one round trip per call and never retry
/// internally; retrying is the caller's job.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the first document of `doc_type` matching `filter`.
    async fn query(&self, doc_type: &str, filter: &KeyFilter) -> Result<Option<RemoteDocument>>;

    /// Create a document. `document` carries its `_type` and may carry `_id`.
    /// Returns the id of the new document.
    async fn create(&self, document: &Fields) -> Result<String>;

    /// Set the given top-level fields on document `id`, leaving all other
    /// fields untouched.
    async fn patch(&self, id: &str, fields: &Fields) -> Result<()>;

    /// Upload a binary asset and return its asset document id.
    async fn upload_asset(&self, upload: AssetUpload<'_>) -> Result<String>;

    /// Human-readable backend name for tracing.
    fn name(&self) -> &str;
}
