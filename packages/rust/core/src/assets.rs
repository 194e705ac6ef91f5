//! Asset uploader with a per-run cache.
//!
//! Local media files are uploaded once per run. The cache is keyed by the
//! canonical absolute path, so `/images/a.png` and `images/a.png` share one
//! upload.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use contentseed_store::{AssetKind, AssetUpload, DocumentStore};
use contentseed_transform::{AssetReference, Fields, apply_assets, collect_asset_paths};

use crate::retry::RetryPolicy;

/// Resolves local media paths to uploaded asset references.
#[derive(Debug)]
pub struct AssetUploader {
    media_root: PathBuf,
    cache: HashMap<PathBuf, AssetReference>,
    uploads: usize,
    cache_hits: usize,
}

impl AssetUploader {
    pub fn new(media_root: impl Into<PathBuf>) -> Self {
        let media_root = media_root.into();
        let media_root = std::fs::canonicalize(&media_root).unwrap_or(media_root);
        Self {
            media_root,
            cache: HashMap::new(),
            uploads: 0,
            cache_hits: 0,
        }
    }

    /// Files uploaded so far.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Lookups answered from the cache.
    pub fn cache_hits(&self) -> usize {
        self.cache_hits
    }

    /// Resolve `path` (relative to the media root; a leading `/` is ignored)
    /// to an uploaded asset.
    ///
    /// Returns `None` for remote URLs, missing files, files outside the
    /// media root, and uploads that failed after retries. None of these is
    /// an error for the record.
    pub async fn resolve(
        &mut self,
        store: &dyn DocumentStore,
        retry: &RetryPolicy,
        path: &str,
        alt: Option<&str>,
    ) -> Option<AssetReference> {
        let alt = alt.map(str::to_string);
        let path = path.trim();
        if path.starts_with("http://") || path.starts_with("https://") {
            warn!(path, "remote media URL is not a local asset, skipping");
            return None;
        }

        let candidate = self.media_root.join(path.trim_start_matches('/'));
        let canonical = match tokio::fs::canonicalize(&candidate).await {
            Ok(canonical) => canonical,
            Err(_) => {
                warn!(path, resolved = %candidate.display(), "asset file not found, skipping");
                return None;
            }
        };
        if !canonical.starts_with(&self.media_root) {
            warn!(path, "asset path escapes the media directory, skipping");
            return None;
        }

        if let Some(cached) = self.cache.get(&canonical) {
            self.cache_hits += 1;
            debug!(path, asset_id = %cached.asset_id, "asset cache hit");
            return Some(cached.clone().with_alt(alt));
        }

        let bytes = match tokio::fs::read(&canonical).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path, error = %e, "failed to read asset file, skipping");
                return None;
            }
        };
        let content_type = content_type_for(&canonical);
        let kind = AssetKind::from_content_type(content_type);
        let filename = canonical
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("asset");
        let upload = AssetUpload {
            bytes: &bytes,
            filename,
            content_type,
            kind,
        };

        match retry
            .execute("upload_asset", || store.upload_asset(upload))
            .await
        {
            Ok(asset_id) => {
                self.uploads += 1;
                info!(path, %asset_id, kind = kind.field_type(), size = bytes.len(), "asset uploaded");
                let reference = AssetReference::new(asset_id, kind);
                self.cache.insert(canonical, reference.clone());
                Some(reference.with_alt(alt))
            }
            Err(e) => {
                error!(path, error = %e, "asset upload failed, field omitted");
                None
            }
        }
    }

    /// Resolve every asset placeholder in `fields`. Placeholders that do
    /// not resolve are removed; returns how many.
    pub async fn resolve_document(
        &mut self,
        store: &dyn DocumentStore,
        retry: &RetryPolicy,
        fields: &mut Fields,
    ) -> usize {
        let mut resolved = HashMap::new();
        for path in collect_asset_paths(fields) {
            if let Some(reference) = self.resolve(store, retry, &path, None).await {
                resolved.insert(path, reference);
            }
        }
        apply_assets(fields, |path| resolved.get(path).cloned())
    }
}

/// MIME type from the file extension.
fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
