//! Policy decision trees and the union ("sum") operation over them.
//!
//! A [`Policy`] answers allow/deny for an ordered path of string segments.
//! Policies from independent sources are combined with [`Policy::merge`],
//! which is commutative and associative with [`Policy::False`] as identity and
//! [`Policy::True`] as absorbing element, so the order in which fragments are
//! loaded never changes a decision.

use std::collections::{BTreeMap, BTreeSet};
use std::iter::Sum;
use std::ops::Add;
use std::sync::Arc;

use serde_json::{Map, Value};

/// A node in a policy decision tree.
///
/// Values are immutable. Cloning is cheap (an `Arc` bump for the compound
/// variants) and merging shares every untouched child with its operands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Policy {
    /// Allows every path, including the empty one.
    True,
    /// Denies every path.
    #[default]
    False,
    /// Allows iff the next segment is a member. Remaining segments are ignored.
    Set(Arc<BTreeSet<String>>),
    /// Dispatches on the next segment. A missing key denies.
    Dict(Arc<BTreeMap<String, Policy>>),
}

impl Policy {
    /// Build a `Set` leaf. Empty strings are dropped.
    pub fn set<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed = allowed
            .into_iter()
            .map(Into::into)
            .filter(|member: &String| !member.is_empty())
            .collect();
        Policy::Set(Arc::new(allowed))
    }

    /// Build a `Dict` node. Empty keys are dropped and repeated keys are merged.
    pub fn dict<I, K>(children: I) -> Self
    where
        I: IntoIterator<Item = (K, Policy)>,
        K: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (key, child) in children {
            let key = key.into();
            if key.is_empty() {
                continue;
            }
            merge_child(&mut map, &key, &child);
        }
        Policy::Dict(Arc::new(map))
    }

    pub fn is_allow_all(&self) -> bool {
        matches!(self, Policy::True)
    }

    pub fn is_deny_all(&self) -> bool {
        matches!(self, Policy::False)
    }

    /// Decide whether `path` is allowed.
    ///
    /// `subject` is carried down to every level untouched; no variant
    /// inspects it.
    pub fn evaluate<S, T>(&self, path: &[S], subject: &T) -> bool
    where
        S: AsRef<str>,
        T: ?Sized,
    {
        match self {
            Policy::True => true,
            Policy::False => false,
            Policy::Set(allowed) => path
                .first()
                .is_some_and(|segment| allowed.contains(segment.as_ref())),
            Policy::Dict(children) => match path.split_first() {
                Some((segment, rest)) => children
                    .get(segment.as_ref())
                    .is_some_and(|child| child.evaluate(rest, subject)),
                None => false,
            },
        }
    }

    /// Union of two policies: the least restrictive policy that allows
    /// everything either operand allows. Neither operand is modified.
    pub fn merge(&self, other: &Policy) -> Policy {
        match (self, other) {
            (Policy::True, _) | (_, Policy::True) => Policy::True,
            (Policy::False, kept) | (kept, Policy::False) => kept.clone(),
            (Policy::Set(a), Policy::Set(b)) => {
                if b.is_subset(a) {
                    self.clone()
                } else if a.is_subset(b) {
                    other.clone()
                } else {
                    Policy::Set(Arc::new(a.union(b).cloned().collect()))
                }
            }
            (Policy::Set(allowed), Policy::Dict(children))
            | (Policy::Dict(children), Policy::Set(allowed)) => {
                let mut merged = (**children).clone();
                for key in allowed.iter().filter(|key| !key.is_empty()) {
                    merge_child(&mut merged, key, &Policy::True);
                }
                Policy::Dict(Arc::new(merged))
            }
            (Policy::Dict(a), Policy::Dict(b)) => {
                if Arc::ptr_eq(a, b) {
                    return self.clone();
                }
                let mut merged = (**a).clone();
                for (key, child) in b.iter() {
                    merge_child(&mut merged, key, child);
                }
                Policy::Dict(Arc::new(merged))
            }
        }
    }

    /// JSON projection of the tree. Building a policy from this value yields
    /// an equivalent policy.
    pub fn to_json(&self) -> Value {
        match self {
            Policy::True => Value::Bool(true),
            Policy::False => Value::Bool(false),
            Policy::Set(allowed) => {
                Value::Array(allowed.iter().cloned().map(Value::String).collect())
            }
            Policy::Dict(children) => Value::Object(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

/// Merge `child` into `children[key]`, inserting it as-is when the key is new.
fn merge_child(children: &mut BTreeMap<String, Policy>, key: &str, child: &Policy) {
    match children.get_mut(key) {
        Some(current) => *current = current.merge(child),
        None => {
            children.insert(key.to_owned(), child.clone());
        }
    }
}

impl From<bool> for Policy {
    fn from(allow: bool) -> Self {
        if allow {
            Policy::True
        } else {
            Policy::False
        }
    }
}

impl Add for &Policy {
    type Output = Policy;

    fn add(self, rhs: &Policy) -> Policy {
        self.merge(rhs)
    }
}

impl Add for Policy {
    type Output = Policy;

    fn add(self, rhs: Policy) -> Policy {
        self.merge(&rhs)
    }
}

impl Sum for Policy {
    fn sum<I: Iterator<Item = Policy>>(iter: I) -> Self {
        iter.fold(Policy::False, |acc, policy| acc.merge(&policy))
    }
}

impl<'a> Sum<&'a Policy> for Policy {
    fn sum<I: Iterator<Item = &'a Policy>>(iter: I) -> Self {
        iter.fold(Policy::False, |acc, policy| acc.merge(policy))
    }
}
