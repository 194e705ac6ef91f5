//! Asset placeholders inside transformed documents.
//!
//! Transformers stay synchronous: wherever a record points at a local media
//! file they emit a placeholder object. The seeder later collects the
//! placeholder paths, uploads them, and swaps each placeholder for a real
//! asset reference. Placeholders whose file could not be resolved are
//! removed, taking the field (or array element) with them.

use serde_json::{Map, Value, json};

use contentseed_store::AssetKind;

use crate::Fields;

/// Marker key of a placeholder object.
pub const ASSET_SLOT: &str = "$asset";

/// A resolved, uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
    pub asset_id: String,
    pub kind: AssetKind,
    pub alt: Option<String>,
}

impl AssetReference {
    pub fn new(asset_id: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            asset_id: asset_id.into(),
            kind,
            alt: None,
        }
    }

    pub fn with_alt(mut self, alt: Option<String>) -> Self {
        self.alt = alt;
        self
    }

    /// The field value stored on a document.
    pub fn to_fields(&self) -> Fields {
        let mut fields = Map::new();
        fields.insert("_type".into(), json!(self.kind.field_type()));
        fields.insert(
            "asset".into(),
            json!({ "_type": "reference", "_ref": self.asset_id }),
        );
        if let Some(alt) = &self.alt {
            fields.insert("alt".into(), json!(alt));
        }
        fields
    }
}

/// Placeholder for the local file at `path`.
pub fn asset_slot(path: &str, alt: Option<String>) -> Value {
    let mut slot = Map::new();
    slot.insert("path".into(), json!(path));
    if let Some(alt) = alt {
        slot.insert("alt".into(), json!(alt));
    }
    let mut placeholder = Map::new();
    placeholder.insert(ASSET_SLOT.into(), Value::Object(slot));
    Value::Object(placeholder)
}

/// Distinct placeholder paths in document order.
pub fn collect_asset_paths(fields: &Fields) -> Vec<String> {
    let mut paths = Vec::new();
    for value in fields.values() {
        collect_in(value, &mut paths);
    }
    paths
}

fn collect_in(value: &Value, paths: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(path) = slot_path(map) {
                if !paths.iter().any(|p| p == path) {
                    paths.push(path.to_string());
                }
                return;
            }
            for v in map.values() {
                collect_in(v, paths);
            }
        }
        Value::Array(items) => {
            for v in items {
                collect_in(v, paths);
            }
        }
        _ => {}
    }
}

/// Replace every placeholder using `lookup`; unresolved placeholders are
/// removed. Returns how many were removed.
pub fn apply_assets<F>(fields: &mut Fields, lookup: F) -> usize
where
    F: Fn(&str) -> Option<AssetReference>,
{
    let mut dropped = 0;
    fields.retain(|_, v| resolve_value(v, &lookup, &mut dropped));
    dropped
}

/// Returns whether `value` survives.
fn resolve_value<F>(value: &mut Value, lookup: &F, dropped: &mut usize) -> bool
where
    F: Fn(&str) -> Option<AssetReference>,
{
    match value {
        Value::Object(map) => {
            if let Some(path) = slot_path(map) {
                let alt = map
                    .get(ASSET_SLOT)
                    .and_then(|s| s.get("alt"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                return match lookup(path) {
                    Some(reference) => {
                        let mut resolved = reference.with_alt(alt).to_fields();
                        for (k, v) in map.iter() {
                            if k != ASSET_SLOT {
                                resolved.insert(k.clone(), v.clone());
                            }
                        }
                        *map = resolved;
                        true
                    }
                    None => {
                        *dropped += 1;
                        false
                    }
                };
            }
            map.retain(|_, v| resolve_value(v, lookup, dropped));
            true
        }
        Value::Array(items) => {
            items.retain_mut(|v| resolve_value(v, lookup, dropped));
            true
        }
        _ => true,
    }
}

fn slot_path(map: &Map<String, Value>) -> Option<&str> {
    map.get(ASSET_SLOT)?.get("path")?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Fields {
        json!({
            "title": "Case",
            "cover": asset_slot("/img/cover.png", Some("Cover".into())),
            "gallery": [
                {"_key": "g-0", "$asset": {"path": "img/a.png"}},
                {"_key": "g-1", "$asset": {"path": "img/missing.png"}},
                {"_key": "g-2", "$asset": {"path": "/img/cover.png"}}
            ],
            "hero": {"heading": "Hi", "image": asset_slot("img/missing.png", None)}
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    fn lookup(path: &str) -> Option<AssetReference> {
        (!path.contains("missing"))
            .then(|| AssetReference::new(format!("image-{}", path.len()), AssetKind::Image))
    }

    #[test]
    fn collects_distinct_paths_in_order() {
        let paths = collect_asset_paths(&doc());
        assert_eq!(paths, vec!["/img/cover.png", "img/a.png", "img/missing.png"]);
    }

    #[test]
    fn resolved_slots_become_references() {
        let mut fields = doc();
        let dropped = apply_assets(&mut fields, lookup);
        assert_eq!(dropped, 2);

        assert_eq!(fields["cover"]["_type"], "image");
        assert_eq!(fields["cover"]["asset"]["_ref"], "image-14");
        assert_eq!(fields["cover"]["alt"], "Cover");

        let gallery = fields["gallery"].as_array().unwrap();
        assert_eq!(gallery.len(), 2);
        assert_eq!(gallery[0]["_key"], "g-0");
        assert_eq!(gallery[1]["_key"], "g-2");
        assert!(gallery[1].get(ASSET_SLOT).is_none());

        // The section survives, only its image is gone.
        assert_eq!(fields["hero"]["heading"], "Hi");
        assert!(fields["hero"].get("image").is_none());
        assert!(collect_asset_paths(&fields).is_empty());
    }

    #[test]
    fn reference_shape() {
        let r = AssetReference::new("file-abc-mp4", AssetKind::File);
        let fields = r.to_fields();
        assert_eq!(fields["_type"], "file");
        assert_eq!(fields["asset"]["_type"], "reference");
        assert!(fields.get("alt").is_none());
    }
}
