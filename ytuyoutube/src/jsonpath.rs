//! Optional-chaining over `serde_json::Value`
//!
//! YouTube's embedded page data is deep and unstable. Paths are written as a
//! slice of [`Step`]s; any missing key, out-of-range index or type mismatch
//! yields `None` instead of an error.

use serde_json::Value;

/// One step of a path into a JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    /// Object member
    Key(&'a str),
    /// Array element
    Index(usize),
    /// Last array element
    Last,
}

pub use Step::{Index, Key, Last};

/// Follows `path` from `value`
pub fn pluck<'v>(value: &'v Value, path: &[Step<'_>]) -> Option<&'v Value> {
    path.iter().try_fold(value, |current, step| match step {
        Step::Key(k) => current.as_object()?.get(*k),
        Step::Index(i) => current.as_array()?.get(*i),
        Step::Last => current.as_array()?.last(),
    })
}

/// Follows `path` and expects a string
pub fn pluck_str<'v>(value: &'v Value, path: &[Step<'_>]) -> Option<&'v str> {
    pluck(value, path)?.as_str()
}

/// Follows `path` and expects an array, empty when absent
pub fn pluck_array<'v>(value: &'v Value, path: &[Step<'_>]) -> &'v [Value] {
    pluck(value, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pluck() {
        let v = json!({"a": {"b": [{"c": "x"}, {"c": "y"}]}});
        assert_eq!(pluck_str(&v, &[Key("a"), Key("b"), Index(0), Key("c")]), Some("x"));
        assert_eq!(pluck_str(&v, &[Key("a"), Key("b"), Last, Key("c")]), Some("y"));
        assert_eq!(pluck(&v, &[Key("a"), Key("zz")]), None);
        assert_eq!(pluck(&v, &[Key("a"), Index(0)]), None);
        assert_eq!(pluck(&v, &[Key("a"), Key("b"), Index(7)]), None);
        assert_eq!(pluck(&v, &[]), Some(&v));
    }

    #[test]
    fn test_pluck_array() {
        let v = json!({"list": [1, 2], "scalar": 3});
        assert_eq!(pluck_array(&v, &[Key("list")]).len(), 2);
        assert!(pluck_array(&v, &[Key("scalar")]).is_empty());
        assert!(pluck_array(&v, &[Key("missing")]).is_empty());
        assert!(pluck(&json!([]), &[Last]).is_none());
    }
}
