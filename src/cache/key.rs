//! Cache key derivation.
//!
//! A key is the query string plus a canonical serialization of its
//! parameters. Object keys are sorted at every nesting level before
//! serializing, so `{a:1,b:2}` and `{b:2,a:1}` produce the same key.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Named query parameters, kept sorted by name.
pub type QueryParams = BTreeMap<String, Value>;

/// Build [`QueryParams`] from `(name, value)` pairs.
pub fn params<I, K, V>(pairs: I) -> QueryParams
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Serialize,
{
    pairs
        .into_iter()
        .map(|(k, v)| {
            let value = serde_json::to_value(v).unwrap_or(Value::Null);
            (k.into(), value)
        })
        .collect()
}

/// Deterministic identity of one `(query, params)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    query: String,
    params: String,
}

impl CacheKey {
    pub fn new(query: &str, params: &QueryParams) -> Self {
        let mut out = String::new();
        out.push('{');
        for (i, (name, value)) in params.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_string(&mut out, name);
            out.push(':');
            write_canonical(&mut out, value);
        }
        out.push('}');
        Self {
            query: query.to_string(),
            params: out,
        }
    }

    /// Build a key from any JSON object, regardless of its key order.
    pub fn from_value(query: &str, params: &Value) -> Self {
        let mut out = String::new();
        write_canonical(&mut out, params);
        Self {
            query: query.to_string(),
            params: out,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn params(&self) -> &str {
        &self.params
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.query, self.params)
    }
}

fn write_canonical(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (name, v)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, name);
                out.push(':');
                write_canonical(out, v);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, v) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(out, v);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push_str(&Value::String(s.to_string()).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_order_does_not_matter() {
        let a = CacheKey::from_value("*[page == $page]", &json!({"a": 1, "b": 2}));
        let b = CacheKey::from_value("*[page == $page]", &json!({"b": 2, "a": 1}));
        assert_eq!(a, b);
    }

    #[test]
    fn test_nested_objects_are_sorted() {
        let a = CacheKey::from_value("q", &json!({"outer": {"z": 1, "y": [ {"b": 1, "a": 2} ]}}));
        assert_eq!(a.params(), r#"{"outer":{"y":[{"a":2,"b":1}],"z":1}}"#);
    }

    #[test]
    fn test_params_helper_matches_value_form() {
        let p = params([("page", "home"), ("section", "hero")]);
        let from_params = CacheKey::new("q", &p);
        let from_value = CacheKey::from_value("q", &json!({"section": "hero", "page": "home"}));
        assert_eq!(from_params, from_value);
    }

    #[test]
    fn test_different_queries_differ() {
        let p = params([("page", "home")]);
        assert_ne!(CacheKey::new("q1", &p), CacheKey::new("q2", &p));
    }

    #[test]
    fn test_values_are_typed() {
        // "1" and 1 must not collide
        let a = CacheKey::from_value("q", &json!({"n": 1}));
        let b = CacheKey::from_value("q", &json!({"n": "1"}));
        assert_ne!(a, b);
    }

    #[test]
    fn test_array_order_is_significant() {
        let a = CacheKey::from_value("q", &json!({"ids": ["a", "b"]}));
        let b = CacheKey::from_value("q", &json!({"ids": ["b", "a"]}));
        assert_ne!(a, b);
    }
}
