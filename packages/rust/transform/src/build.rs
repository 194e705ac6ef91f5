//! Output-side helpers: object builder, keyed arrays, media fields.

use serde_json::{Value, json};

use crate::Fields;
use crate::assets::asset_slot;
use crate::record::{Record, scalar_text};

/// Where a transformer is working; used for `_key`s and error messages.
#[derive(Debug, Clone, Copy)]
pub struct Ctx<'a> {
    pub domain: &'static str,
    pub entry: &'a str,
}

impl Ctx<'_> {
    /// Stable key for element `index` of array `field`.
    pub fn key(&self, field: &str, index: usize) -> String {
        format!("{}-{field}-{index}", self.domain)
    }
}

/// Small builder over a JSON object.
#[derive(Debug, Default, Clone)]
pub struct Obj(Fields);

impl Obj {
    pub fn new() -> Self {
        Self::default()
    }

    /// Object with a `_type` marker, for typed sub-objects.
    pub fn typed(type_name: &str) -> Self {
        let mut obj = Self::new();
        obj.set("_type", type_name);
        obj
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Set only when `value` is `Some`.
    pub fn set_opt<V: Into<Value>>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            self.0.insert(key.to_string(), v.into());
        }
        self
    }

    /// Set only when the array is non-empty.
    pub fn set_nonempty(&mut self, key: &str, value: Value) -> &mut Self {
        if value.as_array().is_some_and(|a| !a.is_empty()) {
            self.0.insert(key.to_string(), value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.keys().all(|k| k == "_type")
    }

    pub fn into_fields(self) -> Fields {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// `None` when nothing but `_type` was set.
    pub fn into_opt(self) -> Option<Value> {
        (!self.is_empty()).then(|| self.into_value())
    }
}

/// Map records to objects and give each a stable `_key`: the source's own
/// `_key` when it has one, `{domain}-{field}-{index}` otherwise.
pub fn keyed<'a, F>(ctx: Ctx<'_>, field: &str, records: Vec<Record<'a>>, mut build: F) -> Value
where
    F: FnMut(Record<'a>, usize) -> Obj,
{
    let items = records
        .into_iter()
        .enumerate()
        .map(|(index, rec)| {
            let mut obj = build(rec, index);
            let key = rec
                .opt_text(&["_key"])
                .unwrap_or_else(|| ctx.key(field, index));
            obj.set("_key", key);
            obj.into_value()
        })
        .collect();
    Value::Array(items)
}

/// Like [`keyed`] but for builders that may reject an element.
pub fn keyed_filter<'a, F>(ctx: Ctx<'_>, field: &str, records: Vec<Record<'a>>, mut build: F) -> Value
where
    F: FnMut(Record<'a>, usize) -> Option<Obj>,
{
    let mut items = Vec::new();
    for (index, rec) in records.into_iter().enumerate() {
        let Some(mut obj) = build(rec, index) else {
            continue;
        };
        let key = rec
            .opt_text(&["_key"])
            .unwrap_or_else(|| ctx.key(field, index));
        obj.set("_key", key);
        items.push(obj.into_value());
    }
    Value::Array(items)
}

/// Media field from a string path or an object with a path and alt text.
///
/// Accepted shapes: `"img/a.png"`, `{"src": "img/a.png", "alt": "..."}`
/// (also `url`, `path`, `image`, `file`). Remote URLs are passed through as
/// placeholders too; the uploader decides what is local.
pub fn media(value: &Value, fallback_alt: Option<&str>) -> Option<Value> {
    let (path, alt) = match value {
        Value::String(_) => (scalar_text(value)?, None),
        Value::Object(_) => {
            let rec = Record::new(value)?;
            let path = rec.opt_text(&["src", "url", "path", "image", "file", "asset"])?;
            (path, rec.opt_text(&["alt", "altText", "caption"]))
        }
        _ => return None,
    };
    let alt = alt.or_else(|| fallback_alt.filter(|a| !a.is_empty()).map(str::to_string));
    Some(asset_slot(&path, alt))
}

/// Media field read from the first matching alias of `rec`, with alt text
/// from `alt_aliases` or `fallback_alt`.
pub fn media_field(
    rec: Record<'_>,
    aliases: &[&str],
    alt_aliases: &[&str],
    fallback_alt: Option<&str>,
) -> Option<Value> {
    let alt = rec.opt_text(alt_aliases);
    let fallback = alt.as_deref().or(fallback_alt);
    media(rec.raw(aliases)?, fallback)
}

/// Keyed array of media items, e.g. a gallery.
pub fn media_list(ctx: Ctx<'_>, field: &str, rec: Record<'_>, aliases: &[&str]) -> Value {
    let Some(items) = rec.array(aliases) else {
        return json!([]);
    };
    let mut out = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let Some(Value::Object(mut slot)) = media(item, None) else {
            continue;
        };
        let key = Record::new(item)
            .and_then(|r| r.opt_text(&["_key"]))
            .unwrap_or_else(|| ctx.key(field, index));
        slot.insert("_key".into(), json!(key));
        if let Some(caption) = Record::new(item).and_then(|r| r.opt_text(&["caption"])) {
            slot.insert("caption".into(), json!(caption));
        }
        out.push(Value::Object(slot));
    }
    Value::Array(out)
}

/// `{"_type": "slug", "current": ...}`.
pub fn slug_value(slug: &str) -> Value {
    json!({ "_type": "slug", "current": slug })
}
