// License: MIT

use serde_json::json;

use crate::ast::Value;
use crate::config::SigilConfig;
use crate::SigilError;

/// Export a document to JSON format.
///
/// Converts values to their JSON equivalents:
/// - Strings, numbers, booleans, null → direct mapping
/// - Sequences, mappings → nested JSON structures (key order preserved)
///
/// The exporter preserves the document as loaded: environment references
/// (`${...}` and `environment_variable` mappings) are not evaluated.
/// Resolution depends on the runtime environment and happens elsewhere.
///
/// # Examples
/// ```no_run
/// use sigil_cfg::{SigilConfig, export};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SigilConfig::from_file("config.yml")?;
/// let json = export::export_document_to_json(&config.config(None, true, None)?)?;
/// # Ok(())
/// # }
/// ```
pub fn export_document_to_json(doc: &Value) -> Result<String, SigilError> {
    serde_json::to_string_pretty(&value_to_json(doc)).map_err(|e| SigilError::TypeError {
        message: format!("Failed to serialize document to JSON: {}", e),
        hint: None,
        code: Some(500),
    })
}

fn value_to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => json!(b),
        Value::Number(n) => json!(n),
        Value::String(s) => json!(s),
        Value::Array(arr) => json!(arr.iter().map(value_to_json).collect::<Vec<_>>()),
        Value::Object(map) => {
            let entries = map
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect::<serde_json::Map<_, _>>();
            serde_json::Value::Object(entries)
        }
    }
}

/// Export a YAML file directly to JSON.
///
/// Convenience function that reads, parses, and exports in one call. A
/// single-document file exports as that document; a multi-document stream
/// exports as a JSON array of documents.
///
/// # Errors
/// Returns error if the file doesn't exist or contains invalid YAML.
pub fn export_yaml_file(path: &str) -> Result<String, SigilError> {
    let documents = SigilConfig::load(path)?;

    match documents.as_slice() {
        [single] => export_document_to_json(single),
        many => export_document_to_json(&Value::Array(many.to_vec())),
    }
}
