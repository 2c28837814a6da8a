//! JSON helpers

use serde_json::{Number, Value};

/// Largest magnitude at which every integer is exactly representable as f64
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Rewrite integral floats (`30.0`) as integers (`30`), recursively
///
/// Gate treats all numbers as doubles, so `30` and `30.0` are the same value
/// once stored.
pub fn canonicalize_numbers(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            let whole = n
                .as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER);
            if let Some(f) = whole {
                *n = Number::from(f as i64);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(canonicalize_numbers),
        Value::Object(map) => map.values_mut().for_each(canonicalize_numbers),
        _ => {}
    }
}

/// Compare two JSON texts by value, ignoring formatting, key order and
/// the integer/float spelling of whole numbers
pub fn are_equal_json(a: &str, b: &str) -> serde_json::Result<bool> {
    let mut a: Value = serde_json::from_str(a)?;
    let mut b: Value = serde_json::from_str(b)?;
    canonicalize_numbers(&mut a);
    canonicalize_numbers(&mut b);
    Ok(a == b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_and_order_are_ignored() {
        let compact = r#"{"schema":"v2","metadata":{"name":"a","scopes":["global"]}}"#;
        let pretty = r#"{
            "metadata": { "scopes": [ "global" ], "name": "a" },
            "schema": "v2"
        }"#;

        assert!(are_equal_json(compact, pretty).unwrap());
    }

    #[test]
    fn test_array_order_matters() {
        assert!(!are_equal_json("[1, 2]", "[2, 1]").unwrap());
    }

    #[test]
    fn test_whole_floats_equal_integers() {
        let stored = r#"{"variables":[{"name":"waitTime","defaultValue":30}]}"#;
        let written = r#"{"variables":[{"name":"waitTime","defaultValue":30.0}]}"#;
        assert!(are_equal_json(stored, written).unwrap());

        assert!(!are_equal_json(r#"{"n":30}"#, r#"{"n":30.5}"#).unwrap());
    }

    #[test]
    fn test_canonicalize_numbers() {
        let mut value = serde_json::json!({"a": [1.0, -2.0, 2.5], "b": {"c": 1e3}});
        canonicalize_numbers(&mut value);
        assert_eq!(value.to_string(), r#"{"a":[1,-2,2.5],"b":{"c":1000}}"#);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(are_equal_json("{", "{}").is_err());
    }
}
