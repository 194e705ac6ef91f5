//! Alias-aware read access to hand-authored JSON records.
//!
//! Content files were written by different people over time, so one field
//! appears under several names (`heading`, `title`, `headline`...). Every
//! accessor takes an alias list and reads the first alias holding a usable
//! value. `null` and blank strings count as absent.

use serde_json::{Map, Value};

/// Read-only view over one JSON object.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    /// View `value` as a record; `None` unless it is an object.
    pub fn new(value: &'a Value) -> Option<Self> {
        value.as_object().map(|fields| Self { fields })
    }

    /// First present, non-null value among `aliases`.
    pub fn raw(&self, aliases: &[&str]) -> Option<&'a Value> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .find(|v| is_present(v))
    }

    /// First alias holding a scalar, as a trimmed string.
    pub fn opt_text(&self, aliases: &[&str]) -> Option<String> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .find_map(scalar_text)
    }

    /// Like [`Record::opt_text`] but defaults to an empty string.
    pub fn text(&self, aliases: &[&str]) -> String {
        self.opt_text(aliases).unwrap_or_default()
    }

    /// Numeric value; numeric strings such as `"4.5"` are accepted.
    pub fn number(&self, aliases: &[&str]) -> Option<f64> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .find_map(|v| match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
    }

    /// Boolean value; `"true"` / `"false"` strings are accepted.
    pub fn flag(&self, aliases: &[&str]) -> Option<bool> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .find_map(|v| match v {
                Value::Bool(b) => Some(*b),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" => Some(true),
                    "false" | "no" => Some(false),
                    _ => None,
                },
                _ => None,
            })
    }

    /// Nested object under the first matching alias.
    pub fn section(&self, aliases: &[&str]) -> Option<Record<'a>> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .find_map(Record::new)
    }

    /// Object elements of the first alias holding an array. Non-object
    /// elements are skipped.
    pub fn records(&self, aliases: &[&str]) -> Vec<Record<'a>> {
        self.array(aliases)
            .map(|items| items.iter().filter_map(Record::new).collect())
            .unwrap_or_default()
    }

    /// Scalar elements of the first alias holding an array; a lone string
    /// counts as a one-element list.
    pub fn strings(&self, aliases: &[&str]) -> Vec<String> {
        match self.raw(aliases) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(v) => scalar_text(v).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// The first alias holding an array.
    pub fn array(&self, aliases: &[&str]) -> Option<&'a Vec<Value>> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .find_map(Value::as_array)
    }

    /// Iterate the raw key/value pairs in source order.
    pub fn entries(&self) -> impl Iterator<Item = (&'a String, &'a Value)> {
        self.fields.iter()
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

/// Strings, numbers and booleans as text; everything else is not a scalar.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_present_alias_wins() {
        let value = json!({"title": "  ", "headline": "Grow", "heading": null});
        let rec = Record::new(&value).unwrap();
        assert_eq!(rec.text(&["heading", "title", "headline"]), "Grow");
        assert_eq!(rec.text(&["missing"]), "");
        assert!(rec.opt_text(&["title"]).is_none());
    }

    #[test]
    fn scalars_are_stringified() {
        let value = json!({"price": 49, "year": "2023", "featured": "yes"});
        let rec = Record::new(&value).unwrap();
        assert_eq!(rec.text(&["price"]), "49");
        assert_eq!(rec.number(&["year"]), Some(2023.0));
        assert_eq!(rec.flag(&["featured"]), Some(true));
        assert_eq!(rec.flag(&["price"]), None);
    }

    #[test]
    fn lists_and_sections() {
        let value = json!({
            "tags": "solo",
            "stack": ["Rust", 1, {"x": 1}],
            "items": [{"a": 1}, "skip", {"a": 2}],
            "hero": {"heading": "Hi"}
        });
        let rec = Record::new(&value).unwrap();
        assert_eq!(rec.strings(&["tags"]), vec!["solo"]);
        assert_eq!(rec.strings(&["stack"]), vec!["Rust", "1"]);
        assert_eq!(rec.records(&["items"]).len(), 2);
        assert_eq!(rec.section(&["hero"]).unwrap().text(&["heading"]), "Hi");
        assert!(rec.section(&["tags"]).is_none());
    }

    #[test]
    fn non_objects_are_not_records() {
        assert!(Record::new(&json!([1, 2])).is_none());
        assert!(Record::new(&json!("text")).is_none());
    }
}
