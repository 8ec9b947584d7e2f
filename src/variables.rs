//! Helpers to compare the variables of an incoming operation against the variables
//! a [`Mock`] was registered with.
//!
//! [`Mock`]: crate::Mock
use assert_json_diff::{assert_json_matches_no_panic, CompareMode, Config};
use serde_json::{Map, Value};

/// The variables sent alongside a GraphQL operation.
pub type Variables = Map<String, Value>;

/// Return a copy of `variables` without the top-level properties listed in `ignored`.
///
/// Properties that are listed but missing from `variables` are skipped.
pub fn strip_ignored<S: AsRef<str>>(variables: &Variables, ignored: &[S]) -> Variables {
    let mut variables = variables.clone();
    for property in ignored {
        variables.remove(property.as_ref());
    }
    variables
}

/// Compare two JSON values structurally.
///
/// - Objects are equal if they have the same set of keys and the values behind each key
///   are equal. The order of the keys is irrelevant.
/// - Arrays are equal if they have the same length and their elements are equal
///   position by position: `[1, 2]` and `[2, 1]` are **not** equal.
/// - Numbers are compared by value, `1` is equal to `1.0`.
pub fn structurally_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(l), Value::Bool(r)) => l == r,
        (Value::String(l), Value::String(r)) => l == r,
        (Value::Number(l), Value::Number(r)) => {
            if let (Some(l), Some(r)) = (l.as_i64(), r.as_i64()) {
                l == r
            } else if let (Some(l), Some(r)) = (l.as_u64(), r.as_u64()) {
                l == r
            } else {
                l.as_f64() == r.as_f64()
            }
        }
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(l, r)| structurally_equal(l, r))
        }
        (Value::Object(l), Value::Object(r)) => variables_equal(l, r),
        _ => false,
    }
}

/// [`structurally_equal`], specialised to two sets of variables.
pub fn variables_equal(lhs: &Variables, rhs: &Variables) -> bool {
    lhs.len() == rhs.len()
        && lhs
            .iter()
            .all(|(key, l)| rhs.get(key).is_some_and(|r| structurally_equal(l, r)))
}

/// A human-readable description of the differences between two JSON values,
/// used in the diagnostics returned when no mock matches an incoming operation.
pub fn diff(lhs: &Value, rhs: &Value) -> String {
    match assert_json_matches_no_panic(lhs, rhs, Config::new(CompareMode::Strict)) {
        Ok(()) => "Compared values have no visual differences.".to_string(),
        Err(differences) => differences,
    }
}

/// Interpret the `variables` field of a GraphQL request: anything that is not
/// a JSON object is treated as "no variables".
pub(crate) fn from_request_value(value: Option<Value>) -> Variables {
    match value {
        Some(Value::Object(variables)) => variables,
        _ => Variables::new(),
    }
}
