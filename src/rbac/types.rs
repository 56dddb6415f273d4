use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the caller wants to do: an action on a type of resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    /// e.g. "GET"
    pub action: String,
    /// e.g. "Invoice"
    pub resource_type: String,
}

impl Permission {
    pub fn new(action: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            resource_type: resource_type.into(),
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.action, self.resource_type)
    }
}

// ---------- API request/response types ----------

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    /// Context id, e.g. a tenant or module name
    pub context: String,
    #[serde(flatten)]
    pub permission: Permission,
    /// Passed through to the policy untouched
    #[serde(default)]
    pub subject: Value,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub allowed: bool,
}
