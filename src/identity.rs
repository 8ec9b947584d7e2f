//! Stable identities for registered mocks.
use crate::variables::{strip_ignored, Variables};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt::{Display, Formatter};

/// The identity of a registered mock, derived from its operation name and the variables
/// it expects (minus the ones it ignores).
///
/// Two mocks registered for the same operation with the same variables share the same
/// `MockId`, no matter the order in which the variables' keys were specified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MockId(String);

impl MockId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MockId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the [`MockId`] of a mock for the operation `name`.
///
/// The properties listed in `ignored` are removed from `variables` before hashing.
/// The hash is taken over a canonical rendering of the variables: object keys are sorted
/// at every nesting level, array elements keep their order.
pub fn compute_identity<S: AsRef<str>>(
    name: &str,
    variables: Option<&Variables>,
    ignored: &[S],
) -> MockId {
    let variables = variables
        .map(|variables| strip_ignored(variables, ignored))
        .unwrap_or_default();

    let mut canonical = String::new();
    write_canonical(&Value::Object(variables), &mut canonical);

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    MockId(format!("{}__{}", name, hex::encode(hasher.finalize())))
}

fn write_canonical(value: &Value, buffer: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|(l, _), (r, _)| l.cmp(r));
            buffer.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    buffer.push(',');
                }
                buffer.push_str(&Value::String(key.clone()).to_string());
                buffer.push(':');
                write_canonical(value, buffer);
            }
            buffer.push('}');
        }
        Value::Array(elements) => {
            buffer.push('[');
            for (i, element) in elements.iter().enumerate() {
                if i > 0 {
                    buffer.push(',');
                }
                write_canonical(element, buffer);
            }
            buffer.push(']');
        }
        // Scalars have a single JSON rendering.
        scalar => buffer.push_str(&scalar.to_string()),
    }
}
