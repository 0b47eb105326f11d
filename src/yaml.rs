// License: MIT

use indexmap::IndexMap;
use serde::Deserialize;

use crate::ast::Value;
use crate::SigilError;

/// Parse a YAML stream into one `Value` per `---`-separated document.
///
/// A single document without separators yields a one-element set; an empty
/// stream yields an empty set.
pub fn parse_documents(content: &str) -> Result<Vec<Value>, SigilError> {
    let mut documents = Vec::new();
    for de in serde_yaml::Deserializer::from_str(content) {
        let raw = serde_yaml::Value::deserialize(de).map_err(parse_error)?;
        documents.push(decode(raw)?);
    }
    Ok(documents)
}

fn parse_error(err: serde_yaml::Error) -> SigilError {
    let (line, column) = err
        .location()
        .map(|loc| (loc.line(), loc.column()))
        .unwrap_or((0, 0));
    SigilError::ParseError {
        message: err.to_string(),
        line,
        column,
        hint: Some("Check the YAML syntax".into()),
        code: Some(302),
    }
}

/// Decode a `serde_yaml::Value` into the crate's value tree.
///
/// Tags are unwrapped to their inner value; the substitution model has no
/// tag semantics.
fn decode(raw: serde_yaml::Value) -> Result<Value, SigilError> {
    match raw {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_yaml::Value::Number(n) => Ok(Value::Number(n.as_f64().unwrap_or(0.0))),
        serde_yaml::Value::String(s) => Ok(Value::String(s)),
        serde_yaml::Value::Sequence(seq) => {
            let mut items = Vec::with_capacity(seq.len());
            for item in seq {
                items.push(decode(item)?);
            }
            Ok(Value::Array(items))
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = IndexMap::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(scalar_key(key)?, decode(value)?);
            }
            Ok(Value::Object(map))
        }
        serde_yaml::Value::Tagged(tagged) => decode(tagged.value),
    }
}

/// Render a mapping key to its canonical string form.
///
/// Scalar keys like `8080`, `true`, or `null` become `"8080"`, `"true"`,
/// `"null"`. Sequence- or mapping-valued keys cannot be held by the
/// string-keyed data model and fail the parse.
fn scalar_key(key: serde_yaml::Value) -> Result<String, SigilError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => scalar_key(tagged.value),
        other => Err(SigilError::ParseError {
            message: format!("Unsupported mapping key: {:?}", other),
            line: 0,
            column: 0,
            hint: Some("Use scalar mapping keys".into()),
            code: Some(302),
        }),
    }
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_document() {
        let docs = parse_documents("test:\n  env: value\n").unwrap();
        assert_eq!(docs.len(), 1);

        let root = docs[0].as_object().expect("Expected mapping document");
        let test = root["test"].as_object().expect("Expected nested mapping");
        assert_eq!(test["env"], Value::String("value".to_string()));
    }

    #[test]
    fn test_parse_multi_document_stream() {
        let content = "name: first\n---\nname: second\n---\nname: third\n";
        let docs = parse_documents(content).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(
            docs[2].as_object().unwrap()["name"],
            Value::String("third".to_string())
        );
    }

    #[test]
    fn test_parse_empty_stream() {
        let docs = parse_documents("").unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_parse_malformed_yaml() {
        let err = parse_documents("key: [1, 2\n").unwrap_err();
        match err {
            SigilError::ParseError { code, .. } => assert_eq!(code, Some(302)),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_scalar_keys_render_to_strings() {
        let docs = parse_documents("8080: upstream\ntrue: enabled\nnull: none\n").unwrap();
        let root = docs[0].as_object().unwrap();
        assert_eq!(root["8080"], Value::String("upstream".to_string()));
        assert_eq!(root["true"], Value::String("enabled".to_string()));
        assert_eq!(root["null"], Value::String("none".to_string()));
    }

    #[test]
    fn test_container_key_is_rejected() {
        let err = parse_documents("? [1, 2]\n: value\n").unwrap_err();
        assert!(matches!(err, SigilError::ParseError { .. }));
    }

    #[test]
    fn test_tags_unwrap_to_inner_value() {
        let docs = parse_documents("value: !Custom plain\n").unwrap();
        let root = docs[0].as_object().unwrap();
        assert_eq!(root["value"], Value::String("plain".to_string()));
    }

    #[test]
    fn test_scalar_types_decode() {
        let docs = parse_documents("num: 3.5\nint: 42\nflag: true\nnothing: null\n").unwrap();
        let root = docs[0].as_object().unwrap();
        assert_eq!(root["num"], Value::Number(3.5));
        assert_eq!(root["int"], Value::Number(42.0));
        assert_eq!(root["flag"], Value::Bool(true));
        assert_eq!(root["nothing"], Value::Null);
    }

    #[test]
    fn test_mapping_order_is_preserved() {
        let docs = parse_documents("alpha: 1\nbeta: 2\ngamma: 3\n").unwrap();
        let keys: Vec<&String> = docs[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["alpha", "beta", "gamma"]);
    }
}
