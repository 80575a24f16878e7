//! Locale table files.
//!
//! A locale table is a flat `key -> text` map stored as one JSON object per
//! locale. Nested objects are accepted on read and flattened with `.`.

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

pub type LocaleTable = BTreeMap<String, String>;

/// Read a locale table. Returns `Ok(None)` if the file does not exist.
pub fn read_locale_file(path: &Path) -> Result<Option<LocaleTable>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read locale file: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(Some(LocaleTable::new()));
    }

    let json: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse locale file: {}", path.display()))?;
    if !json.is_object() {
        bail!("Root of locale file must be an object: {}", path.display());
    }

    let mut table = LocaleTable::new();
    flatten_json(&json, String::new(), &mut table);
    Ok(Some(table))
}

/// Write a locale table with keys in lexicographic order.
///
/// `pretty` selects 2-space indentation; the file always ends with a newline.
pub fn write_locale_file(path: &Path, table: &LocaleTable, pretty: bool) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    // BTreeMap iteration is sorted, and preserve_order keeps that order.
    let map: Map<String, Value> = table
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    let value = Value::Object(map);

    let content = if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
    .context("Failed to serialize JSON")?;

    fs::write(path, format!("{}\n", content))
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
}

/// Flatten nested objects into dotted keys. Non-string leaves are stored in
/// their JSON text form; arrays are expanded by index.
pub fn flatten_json(value: &Value, prefix: String, result: &mut LocaleTable) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let new_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_json(val, new_prefix, result);
            }
        }
        Value::Array(arr) => {
            for (index, val) in arr.iter().enumerate() {
                let new_prefix = if prefix.is_empty() {
                    index.to_string()
                } else {
                    format!("{}.{}", prefix, index)
                };
                flatten_json(val, new_prefix, result);
            }
        }
        Value::String(s) => {
            result.insert(prefix, s.clone());
        }
        Value::Null => {}
        other => {
            result.insert(prefix, other.to_string());
        }
    }
}
