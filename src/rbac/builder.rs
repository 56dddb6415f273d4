use serde_json::Value;

use crate::rbac::policy::Policy;

/// Convert a JSON policy source into a [`Policy`] tree.
///
/// | Source            | Policy                       |
/// |-------------------|------------------------------|
/// | `true` / `false`  | `True` / `False`             |
/// | `"GET"`           | `Set {"GET"}`                |
/// | `["GET", "PUT"]`  | `Set {"GET", "PUT"}`         |
/// | `{ "k": <src> }`  | `Dict` of recursively built children |
/// | anything else     | `False`                      |
///
/// Never fails: unrecognised shapes deny.
pub fn build(source: &Value) -> Policy {
    build_node(source, "$")
}

fn build_node(source: &Value, at: &str) -> Policy {
    match source {
        Value::Bool(allow) => Policy::from(*allow),
        Value::String(member) => Policy::set([member.as_str()]),
        Value::Array(items) => {
            let members: Option<Vec<&str>> = items.iter().map(Value::as_str).collect();
            match members {
                Some(members) => Policy::set(members),
                None => {
                    tracing::debug!(at, "policy list contains a non-string entry, denying");
                    Policy::False
                }
            }
        }
        Value::Object(entries) => Policy::dict(entries.iter().filter_map(|(key, child)| {
            if key.is_empty() {
                tracing::debug!(at, "ignoring empty policy key");
                return None;
            }
            Some((key.as_str(), build_node(child, &format!("{at}.{key}"))))
        })),
        Value::Null | Value::Number(_) => {
            tracing::debug!(at, source = %source, "unrecognised policy shape, denying");
            Policy::False
        }
    }
}

impl From<&Value> for Policy {
    fn from(source: &Value) -> Self {
        build(source)
    }
}
