// License: MIT

use std::collections::HashMap;
use std::env;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::Value;

/// Reserved mapping key marking a structured environment reference.
///
/// A mapping carrying this key (with a string value) is always treated as a
/// lookup and replaced wholesale, never traversed. It shadows any real config
/// key of the same name.
pub const RESERVED_KEY: &str = "environment_variable";

/// Literal substituted whenever a referenced variable is unset.
pub const DEFAULT_VALUE: &str = "*****";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{[^}]*\}").expect("placeholder pattern is valid"));

/// A name-to-value lookup the resolver reads environment variables through.
///
/// The default is the live process environment; tests and embedders can
/// inject a plain map instead.
pub trait EnvLookup {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Reads the process environment at resolution time; nothing is cached.
#[derive(Debug)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Substitutes environment variable references into config values.
///
/// Two reference forms are recognized:
/// 1. Inline `${NAME}` inside string scalars.
/// 2. A mapping containing the reserved key [`RESERVED_KEY`] with a string
///    value naming the variable; the whole mapping is replaced.
///
/// Unset variables resolve to [`DEFAULT_VALUE`]. Resolution builds a fresh
/// tree and never mutates its input. No re-resolution pass is performed:
/// if a variable's value itself contains `${...}`, that text is kept as-is.
#[derive(Debug)]
pub struct EnvAdapter<L: EnvLookup = ProcessEnv> {
    lookup: L,
}

impl EnvAdapter<ProcessEnv> {
    /// Adapter over the live process environment.
    pub fn new() -> Self {
        Self { lookup: ProcessEnv }
    }
}

impl Default for EnvAdapter<ProcessEnv> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: EnvLookup> EnvAdapter<L> {
    /// Adapter over an injected lookup (e.g. a `HashMap<String, String>`).
    pub fn with_lookup(lookup: L) -> Self {
        Self { lookup }
    }

    fn lookup_or_default(&self, name: &str) -> String {
        match self.lookup.lookup(name) {
            Some(value) => value,
            None => {
                debug!("environment variable '{}' is unset, using default", name);
                DEFAULT_VALUE.to_string()
            }
        }
    }

    /// Replace every `${NAME}` occurrence in a string.
    ///
    /// The original string is scanned left-to-right for non-overlapping
    /// placeholders; each matched segment is then replaced wherever that
    /// exact segment appears (whole-string substring replacement, not
    /// per-match positional replacement). Strings without placeholders come
    /// back unchanged.
    pub fn inline_replace(&self, line: &str) -> String {
        let mut result = line.to_string();
        for found in PLACEHOLDER.find_iter(line) {
            let segment = found.as_str();
            let value = self.lookup_or_default(&segment[2..segment.len() - 1]);
            result = result.replace(segment, &value);
        }
        result
    }

    /// Resolve all environment references in a value, top-down.
    ///
    /// Traversal policy, kept bug-for-bug compatible with the behavior this
    /// crate replaces: mapping values recurse fully, but inside sequences
    /// only mapping elements are resolved. Strings and nested sequences
    /// sitting directly in a sequence are copied through untouched. Likely
    /// an incompleteness, but it is observable, test-covered behavior.
    pub fn resolve(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(name)) = map.get(RESERVED_KEY) {
                    return Value::String(self.lookup_or_default(name));
                }
                Value::Object(
                    map.iter()
                        .map(|(key, val)| (key.clone(), self.resolve(val)))
                        .collect(),
                )
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| match item {
                        Value::Object(_) => self.resolve(item),
                        other => other.clone(),
                    })
                    .collect(),
            ),
            Value::String(s) => Value::String(self.inline_replace(s)),
            other => other.clone(),
        }
    }
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn adapter(pairs: &[(&str, &str)]) -> EnvAdapter<HashMap<String, String>> {
        let lookup: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvAdapter::with_lookup(lookup)
    }

    fn object(pairs: Vec<(&str, Value)>) -> Value {
        Value::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<IndexMap<String, Value>>(),
        )
    }

    fn env_ref(name: &str) -> Value {
        object(vec![(RESERVED_KEY, Value::String(name.to_string()))])
    }

    #[test]
    fn test_inline_no_placeholders_unchanged() {
        let adapter = adapter(&[]);
        assert_eq!(adapter.inline_replace("plain text"), "plain text");
        assert_eq!(adapter.inline_replace(""), "");
        assert_eq!(adapter.inline_replace("almost ${open"), "almost ${open");
    }

    #[test]
    fn test_inline_simple() {
        let adapter = adapter(&[("vv", "value")]);
        assert_eq!(adapter.inline_replace("${vv}"), "value");
    }

    #[test]
    fn test_inline_complex() {
        let adapter = adapter(&[("cc", "complex"), ("vv", "value")]);
        assert_eq!(adapter.inline_replace("my-${cc}-${vv}"), "my-complex-value");
    }

    #[test]
    fn test_inline_unset_uses_default() {
        let adapter = adapter(&[]);
        assert_eq!(adapter.inline_replace("${MISSING}"), DEFAULT_VALUE);
    }

    #[test]
    fn test_inline_empty_name_uses_default() {
        let adapter = adapter(&[]);
        assert_eq!(adapter.inline_replace("x-${}-y"), format!("x-{}-y", DEFAULT_VALUE));
    }

    #[test]
    fn test_inline_repeated_segment_replaced_everywhere() {
        let adapter = adapter(&[("vv", "value")]);
        assert_eq!(adapter.inline_replace("${vv}/${vv}"), "value/value");
    }

    #[test]
    fn test_inline_reads_process_env() {
        unsafe {
            std::env::set_var("SIGIL_TEST_INLINE", "hello_world");
        }
        let adapter = EnvAdapter::new();
        assert_eq!(adapter.inline_replace("${SIGIL_TEST_INLINE}"), "hello_world");
    }

    #[test]
    fn test_resolve_structured_reference() {
        let adapter = adapter(&[("vv", "value")]);
        let input = object(vec![("test", env_ref("vv"))]);

        let resolved = adapter.resolve(&input);
        let expected = object(vec![("test", Value::String("value".to_string()))]);
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_resolve_structured_reference_unset() {
        let adapter = adapter(&[]);
        let input = object(vec![("test", env_ref("MISSING"))]);

        let resolved = adapter.resolve(&input);
        let expected = object(vec![("test", Value::String(DEFAULT_VALUE.to_string()))]);
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_resolve_list_of_maps() {
        let adapter = adapter(&[("vv", "value")]);
        let input = object(vec![(
            "items",
            Value::Array(vec![object(vec![("test", env_ref("vv"))])]),
        )]);

        let resolved = adapter.resolve(&input);
        let expected = object(vec![(
            "items",
            Value::Array(vec![object(vec![("test", Value::String("value".to_string()))])]),
        )]);
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_resolve_skips_strings_inside_sequences() {
        // Sequence elements other than mappings pass through untouched.
        let adapter = adapter(&[("vv", "value")]);
        let input = object(vec![(
            "items",
            Value::Array(vec![
                Value::String("${vv}".to_string()),
                Value::Array(vec![Value::String("${vv}".to_string())]),
                Value::Number(1.0),
            ]),
        )]);

        let resolved = adapter.resolve(&input);
        assert_eq!(resolved, input);
    }

    #[test]
    fn test_resolve_reserved_key_at_root() {
        let adapter = adapter(&[("vv", "value")]);
        let resolved = adapter.resolve(&env_ref("vv"));
        assert_eq!(resolved, Value::String("value".to_string()));
    }

    #[test]
    fn test_resolve_reserved_key_as_sequence_element() {
        let adapter = adapter(&[("vv", "value")]);
        let input = Value::Array(vec![env_ref("vv")]);
        let resolved = adapter.resolve(&input);
        assert_eq!(resolved, Value::Array(vec![Value::String("value".to_string())]));
    }

    #[test]
    fn test_resolve_non_string_reserved_value_is_ordinary_map() {
        let adapter = adapter(&[("vv", "value")]);
        let input = object(vec![(RESERVED_KEY, Value::Number(7.0))]);
        let resolved = adapter.resolve(&input);
        assert_eq!(resolved, input);
    }

    #[test]
    fn test_resolve_reserved_key_wins_over_siblings() {
        let adapter = adapter(&[("vv", "value")]);
        let input = object(vec![(
            "db",
            object(vec![
                (RESERVED_KEY, Value::String("vv".to_string())),
                ("other", Value::String("${vv}".to_string())),
            ]),
        )]);

        // The whole mapping collapses; siblings are never traversed.
        let resolved = adapter.resolve(&input);
        let expected = object(vec![("db", Value::String("value".to_string()))]);
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_resolve_nested_maps_and_scalars() {
        let adapter = adapter(&[("TEST_ENV", "test_resolve")]);
        let input = object(vec![(
            "test",
            object(vec![
                (
                    "list",
                    Value::Array(vec![
                        Value::String("a".to_string()),
                        Value::String("b".to_string()),
                        Value::String("c".to_string()),
                    ]),
                ),
                ("env", Value::String("${TEST_ENV}".to_string())),
                (
                    "level",
                    object(vec![("two", object(vec![("a", Value::String("a".to_string()))]))]),
                ),
            ]),
        )]);

        let resolved = adapter.resolve(&input);
        let expected = object(vec![(
            "test",
            object(vec![
                (
                    "list",
                    Value::Array(vec![
                        Value::String("a".to_string()),
                        Value::String("b".to_string()),
                        Value::String("c".to_string()),
                    ]),
                ),
                ("env", Value::String("test_resolve".to_string())),
                (
                    "level",
                    object(vec![("two", object(vec![("a", Value::String("a".to_string()))]))]),
                ),
            ]),
        )]);
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_resolve_leaves_input_untouched() {
        let adapter = adapter(&[("vv", "value")]);
        let input = object(vec![("test", env_ref("vv"))]);
        let snapshot = input.clone();

        let _ = adapter.resolve(&input);
        assert_eq!(input, snapshot);
    }

    #[test]
    fn test_resolve_no_second_pass() {
        // A variable whose value looks like a placeholder is not re-resolved.
        let adapter = adapter(&[("outer", "${inner}"), ("inner", "surprise")]);
        assert_eq!(adapter.inline_replace("${outer}"), "${inner}");
    }
}
