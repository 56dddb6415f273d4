//! Scoped RBAC: policy trees per context, merged additively from
//! independent fragments.

pub mod builder;
pub mod loader;
pub mod policy;
pub mod root;
pub mod types;
pub mod web;

pub use builder::build;
pub use policy::Policy;
pub use root::RootPolicy;
pub use types::Permission;
