use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while hosting the engine: reading configuration and policy
/// fragments. Policy evaluation itself never fails.
#[derive(Debug, Error, Diagnostic)]
pub enum RbacError {
    #[error("Failed to load policy file `{path}`")]
    #[diagnostic(
        code(scoped_rbac::policy_load),
        help("Check that the file exists and is readable")
    )]
    PolicyLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in policy file `{path}`")]
    #[diagnostic(
        code(scoped_rbac::json),
        help("Policy fragments must be valid JSON documents")
    )]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid policy fragment: {0}")]
    #[diagnostic(
        code(scoped_rbac::invalid_fragment),
        help("A fragment is a JSON object mapping context ids to policies, e.g. {{\"tenant-a\": {{\"GET\": true}}}}")
    )]
    InvalidFragment(String),

    #[error("Config error: {0}")]
    #[diagnostic(code(scoped_rbac::config))]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    #[diagnostic(code(scoped_rbac::io))]
    Io(#[from] std::io::Error),
}
