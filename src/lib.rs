//! Scoped RBAC - compositional authorization policy engine
//!
//! Policies are trees of allow/deny decisions scoped by context id. Fragments
//! from independent sources are unioned into one root policy, and the result
//! never depends on the order they were loaded in.

pub mod errors;
pub mod rbac;
pub mod settings;
