use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::RbacError;

const ENV_PREFIX: &str = "SCOPED_RBAC";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub server: Server,
    pub policies: Policies,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policies {
    /// Directory holding `*.json` policy fragments. Default: policies
    pub dir: PathBuf,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8181,
        }
    }
}

impl Default for Policies {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("policies"),
        }
    }
}

impl Settings {
    /// Defaults, then the TOML file at `path` if it exists, then
    /// `SCOPED_RBAC__*` environment overrides.
    pub fn load(path: &str) -> Result<Self, RbacError> {
        Self::load_with_env_prefix(path, ENV_PREFIX)
    }

    fn load_with_env_prefix(path: &str, env_prefix: &str) -> Result<Self, RbacError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", Server::default().host)?
            .set_default("server.port", Server::default().port)?
            .set_default(
                "policies.dir",
                Policies::default().dir.to_string_lossy().to_string(),
            )?;

        // Optional file
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment overrides: SCOPED_RBAC__SERVER__PORT=9090, etc.
        builder = builder.add_source(config::Environment::with_prefix(env_prefix).separator("__"));

        let mut s: Settings = builder.build()?.try_deserialize()?;

        if s.policies.dir.is_relative() {
            s.policies.dir = std::env::current_dir()?.join(&s.policies.dir);
        }

        Ok(s)
    }
}
