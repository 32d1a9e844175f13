//! Agent configuration
//!
//! Resolved in layers: compiled defaults, an optional YAML file, environment
//! variables, then command-line flags applied by the binary.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `LOCAL_AGENT_HOST` | `server.host` |
//! | `LOCAL_AGENT_PORT` | `server.port` |
//! | `LOCAL_AGENT_ALLOWED_ORIGINS` | `server.allowed_origins` (comma separated) |
//! | `LOCAL_AGENT_PARSE_CACHE_CAPACITY` | `parse_cache_capacity` |
//! | `LOCAL_AGENT_PLAN_TIMEOUT_SECS` | `plan_timeout_secs` |
//! | `LOCAL_AGENT_DRY_RUN` | `dry_run` |
//! | `GEMINI_API_KEY` | `llm.api_key` |
//! | `GEMINI_MODEL` | `llm.model` |
//! | `GEMINI_BASE_URL` | `llm.base_url` |

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use llm::RemoteLlmConfig;
use serde::{Deserialize, Serialize};
use tooling::config::{env_flag, env_key, env_list, env_parse, env_var, ConfigBuilder};
use tooling::{Result, ToolingError};

use crate::actions::ActionTiming;

/// Prefix for the agent's own environment variables.
pub const ENV_PREFIX: &str = "LOCAL_AGENT_";

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the API from a browser
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5005,
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

/// Complete agent configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub server: ServerConfig,
    pub llm: RemoteLlmConfig,
    pub timing: ActionTiming,
    /// Maximum number of cached command parses; unbounded when absent
    pub parse_cache_capacity: Option<usize>,
    /// Limit for a whole plan run; unbounded when absent
    pub plan_timeout_secs: Option<u64>,
    /// Record process launches instead of starting them
    pub dry_run: bool,
    /// Base directory for relative file paths in commands
    pub working_dir: Option<PathBuf>,
}

impl AgentConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ToolingError::InvalidConfig(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        serde_yaml::from_str(&content)
            .map_err(|e| ToolingError::InvalidConfig(format!("Failed to parse YAML config: {}", e)))
    }

    /// Defaults, overlaid with `path` when given, then the environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path)?.with_env(ENV_PREFIX),
            None => Self::load(ENV_PREFIX),
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| {
                ToolingError::InvalidConfig(format!(
                    "invalid listen address {}:{}: {}",
                    self.server.host, self.server.port, e
                ))
            })
    }

    pub fn plan_timeout(&self) -> Option<Duration> {
        self.plan_timeout_secs.map(Duration::from_secs)
    }
}

impl ConfigBuilder for AgentConfig {
    fn apply_env(&mut self, prefix: &str) -> Result<()> {
        if let Some(host) = env_var(&env_key(prefix, "host"))? {
            self.server.host = host;
        }
        if let Some(port) = env_parse(&env_key(prefix, "port"))? {
            self.server.port = port;
        }
        if let Some(origins) = env_list(&env_key(prefix, "allowed_origins"))? {
            self.server.allowed_origins = origins;
        }
        if let Some(capacity) = env_parse(&env_key(prefix, "parse_cache_capacity"))? {
            self.parse_cache_capacity = Some(capacity);
        }
        if let Some(secs) = env_parse(&env_key(prefix, "plan_timeout_secs"))? {
            self.plan_timeout_secs = Some(secs);
        }
        if let Some(dry_run) = env_flag(&env_key(prefix, "dry_run"))? {
            self.dry_run = dry_run;
        }

        if let Some(key) = env_var("GEMINI_API_KEY")? {
            self.llm.api_key = key;
        }
        if let Some(model) = env_var("GEMINI_MODEL")? {
            self.llm.model = model;
        }
        if let Some(base_url) = env_var("GEMINI_BASE_URL")? {
            self.llm.base_url = base_url.trim_end_matches('/').to_string();
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ToolingError::InvalidConfig("server.port must be non-zero".into()));
        }
        if let Some(origin) = self
            .server
            .allowed_origins
            .iter()
            .find(|o| !(o.starts_with("http://") || o.starts_with("https://")))
        {
            return Err(ToolingError::InvalidConfig(format!(
                "allowed origin {:?} must start with http:// or https://",
                origin
            )));
        }
        if self.plan_timeout_secs == Some(0) {
            return Err(ToolingError::InvalidConfig(
                "plan_timeout_secs must be greater than zero".into(),
            ));
        }
        self.llm
            .validate()
            .map_err(|e| ToolingError::InvalidConfig(e.to_string()))
    }
}
