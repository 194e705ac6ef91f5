//! Reading domain source files from the content directory.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use contentseed_shared::{DomainSpec, NaturalKey, Result, SeedError};

/// One raw record and its key in the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEntry {
    pub key: String,
    pub value: Value,
}

/// Path of `spec`'s source file under `data_dir`.
pub fn source_path(data_dir: &Path, spec: &DomainSpec) -> PathBuf {
    data_dir.join(spec.file)
}

/// Load the entries of one domain in file order.
///
/// `Ok(None)` when the file does not exist. A singleton file holds one
/// record (keyed by the singleton id); any other file must map entry keys
/// to records.
pub async fn load_entries(data_dir: &Path, spec: &DomainSpec) -> Result<Option<Vec<SourceEntry>>> {
    let path = source_path(data_dir, spec);
    if !tokio::fs::try_exists(&path)
        .await
        .map_err(|e| SeedError::io(&path, e))?
    {
        debug!(path = %path.display(), "no source file");
        return Ok(None);
    }

    let text = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| SeedError::io(&path, e))?;
    let value: Value = serde_json::from_str(&text)
        .map_err(|e| SeedError::parse(format!("{}: {e}", spec.file)))?;

    let entries = match spec.natural_key {
        NaturalKey::Singleton(id) => vec![SourceEntry {
            key: id.to_string(),
            value,
        }],
        _ => match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(key, value)| SourceEntry { key, value })
                .collect(),
            other => {
                return Err(SeedError::parse(format!(
                    "{}: expected an object of entries, found {}",
                    spec.file,
                    type_name(&other)
                )));
            }
        },
    };
    Ok(Some(entries))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
