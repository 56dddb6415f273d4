use serde_json::Value;

use crate::rbac::builder::build;
use crate::rbac::policy::Policy;
use crate::rbac::types::Permission;

/// Accumulated policy for every loaded context.
///
/// Starts out denying everything and only ever grows: each `add_*` call
/// replaces the held tree with its union with the new fragment. To drop
/// fragments, build a fresh `RootPolicy`.
///
/// `add_*` is a read-modify-write of the held tree; callers sharing one
/// `RootPolicy` between writers must serialise those calls themselves.
#[derive(Debug, Clone, Default)]
pub struct RootPolicy {
    policy: Policy,
}

impl RootPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn into_policy(self) -> Policy {
        self.policy
    }

    pub fn add_policy(&mut self, policy: Policy) -> &mut Self {
        self.policy = self.policy.merge(&policy);
        tracing::trace!(policy = %self.policy.to_json(), "merged policy fragment");
        self
    }

    /// Scope `policy` under `context` and merge it in.
    pub fn add_policy_for_context(&mut self, policy: Policy, context: &str) -> &mut Self {
        if context.is_empty() {
            tracing::warn!("ignoring policy fragment with an empty context id");
            return self;
        }
        self.add_policy(Policy::dict([(context, policy)]))
    }

    pub fn add_json_policy_for_context(&mut self, source: &Value, context: &str) -> &mut Self {
        self.add_policy_for_context(build(source), context)
    }

    /// Decide `permission` within `context_id` by walking
    /// `[context_id, action, resource_type]`.
    pub fn should_allow<T: ?Sized>(
        &self,
        permission: &Permission,
        context_id: &str,
        subject: &T,
    ) -> bool {
        let path = [
            context_id,
            permission.action.as_str(),
            permission.resource_type.as_str(),
        ];
        self.policy.evaluate(&path, subject)
    }
}

impl From<Policy> for RootPolicy {
    fn from(policy: Policy) -> Self {
        Self { policy }
    }
}
