//! Record transformation: raw JSON content records into CMS document fields.
//!
//! [`transform`] is pure and synchronous. Media references come out as
//! asset placeholders (see [`assets`]) that the seeder resolves afterwards.

pub mod assets;
pub mod build;
mod domains;
pub mod record;

use serde_json::Value;
use tracing::debug;

use contentseed_shared::{ContentDomain, DomainSpec, NaturalKey, Result, SeedError};

pub use assets::{ASSET_SLOT, AssetReference, apply_assets, collect_asset_paths};
pub use contentseed_store::Fields;

use build::{Ctx, slug_value};
use record::Record;

/// A record mapped onto its document type, ready for asset resolution and
/// upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedDocument {
    pub spec: DomainSpec,
    /// Value of the natural key (slug, title, or singleton id).
    pub key_value: String,
    pub fields: Fields,
}

/// Transform one raw record of `domain`. `entry` is the record's key in the
/// source file (the singleton id for single-document domains).
pub fn transform(domain: ContentDomain, entry: &str, raw: &Value) -> Result<TransformedDocument> {
    let spec = domain.spec();
    let Some(rec) = Record::new(raw) else {
        return Err(SeedError::InvalidShape {
            domain: spec.id.to_string(),
            entry: entry.to_string(),
            message: format!("expected a JSON object, found {}", kind_of(raw)),
        });
    };

    let ctx = Ctx {
        domain: spec.id,
        entry,
    };
    let mut fields = domains::map_fields(domain, ctx, rec);

    let key_value = match spec.natural_key {
        NaturalKey::Slug => {
            let slug = source_slug(rec).unwrap_or_else(|| entry.trim().to_string());
            if slug.is_empty() {
                return Err(missing_key(&spec, entry));
            }
            fields.insert("slug".into(), slug_value(&slug));
            slug
        }
        NaturalKey::Title => match fields.get("title").and_then(Value::as_str) {
            Some(title) if !title.trim().is_empty() => title.to_string(),
            _ => return Err(missing_key(&spec, entry)),
        },
        NaturalKey::Singleton(id) => id.to_string(),
    };

    debug!(
        domain = spec.id,
        entry,
        key = %key_value,
        fields = fields.len(),
        "record transformed"
    );

    Ok(TransformedDocument {
        spec,
        key_value,
        fields,
    })
}

/// An explicit `slug` in the record: `"acme"` or `{"current": "acme"}`.
fn source_slug(rec: Record<'_>) -> Option<String> {
    rec.opt_text(&["slug"])
        .or_else(|| rec.section(&["slug"]).and_then(|s| s.opt_text(&["current"])))
}

fn missing_key(spec: &DomainSpec, entry: &str) -> SeedError {
    SeedError::MissingNaturalKey {
        domain: spec.id.to_string(),
        entry: entry.to_string(),
        field: spec.natural_key.field().to_string(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn seo_entry_gets_slug_from_key() {
        let raw = json!({"title": "Acme SEO", "hero": {"heading": "Grow"}});
        let doc = transform(ContentDomain::Seo, "acme", &raw).unwrap();
        assert_eq!(doc.spec.doc_type, "seoService");
        assert_eq!(doc.key_value, "acme");
        assert_eq!(doc.fields["slug"]["current"], "acme");
        assert_eq!(doc.fields["title"], "Acme SEO");
        assert_eq!(doc.fields["hero"]["heading"], "Grow");
    }

    #[test]
    fn explicit_slug_wins_over_entry_key() {
        let raw = json!({"title": "Bakery", "slug": {"_type": "slug", "current": "bakery-site"}});
        let doc = transform(ContentDomain::Portfolio, "bakery", &raw).unwrap();
        assert_eq!(doc.key_value, "bakery-site");
        assert_eq!(doc.fields["slug"]["current"], "bakery-site");
    }

    #[test]
    fn blank_slug_is_missing_natural_key() {
        let raw = json!({"title": "No slug"});
        let err = transform(ContentDomain::Blog, "  ", &raw).unwrap_err();
        assert!(matches!(err, SeedError::MissingNaturalKey { ref field, .. } if field == "slug.current"));
    }

    #[test]
    fn title_keyed_domain_requires_title() {
        let raw = json!({"price": "49"});
        let err = transform(ContentDomain::Pricing, "starter", &raw).unwrap_err();
        assert_eq!(err.to_string(), "pricing/starter: missing natural key `title`");

        let raw = json!({"title": "Starter", "price": "49"});
        let doc = transform(ContentDomain::Pricing, "starter", &raw).unwrap();
        assert_eq!(doc.key_value, "Starter");
        assert!(doc.fields.get("slug").is_none());
    }

    #[test]
    fn singleton_uses_fixed_id() {
        let raw = json!({"links": []});
        let doc = transform(ContentDomain::Navbar, "navbar", &raw).unwrap();
        assert_eq!(doc.key_value, "navbar");
        assert_eq!(doc.spec.doc_type, "navbar");
    }

    #[test]
    fn non_object_is_invalid_shape() {
        let err = transform(ContentDomain::Team, "bo", &json!(["not", "an", "object"])).unwrap_err();
        match err {
            SeedError::InvalidShape { domain, entry, message } => {
                assert_eq!(domain, "team");
                assert_eq!(entry, "bo");
                assert!(message.contains("an array"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn every_domain_transforms_an_empty_record() {
        for domain in ContentDomain::ALL {
            let spec = domain.spec();
            let raw = match spec.natural_key {
                NaturalKey::Title => json!({"title": "T"}),
                _ => json!({}),
            };
            let doc = transform(domain, "entry", &raw).unwrap();
            assert_eq!(doc.spec.domain, domain);
        }
    }
}
