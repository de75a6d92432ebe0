//! Server configuration
//!
//! Config is searched in order:
//! 1. An explicit path (`--config`)
//! 2. `GIT_MCP_CONFIG` env var
//! 3. `./git-mcp.toml`
//! 4. `$XDG_CONFIG_HOME/mcp-server-git/config.toml`
//! 5. Default config if none found

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::types::{GitError, GitResult};

pub const CONFIG_ENV: &str = "GIT_MCP_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Restrict every tool call to this repository
    #[serde(default)]
    pub repository: Option<PathBuf>,
    #[serde(default)]
    pub defaults: Defaults,
}

/// Fallbacks for optional tool parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Context lines for diff tools
    #[serde(default = "default_context_lines")]
    pub context_lines: u32,
    /// Commits returned by git_log
    #[serde(default = "default_max_count")]
    pub max_count: usize,
}

fn default_context_lines() -> u32 {
    3
}

fn default_max_count() -> usize {
    10
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            context_lines: default_context_lines(),
            max_count: default_max_count(),
        }
    }
}

impl Config {
    /// Parse a config file, failing loudly
    pub fn from_file(path: &Path) -> GitResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GitError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content).map_err(|e| GitError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load config from an explicit path or the standard locations
    ///
    /// An explicit path must exist and parse. Files found by searching are
    /// skipped with a warning when they do not parse.
    pub fn load(explicit: Option<&Path>) -> GitResult<Self> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)?;
            tracing::info!("Loaded config from {}", path.display());
            return Ok(config);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                let config = Self::from_file(&path)?;
                tracing::info!("Loaded config from {}={}", CONFIG_ENV, path.display());
                return Ok(config);
            }
            tracing::warn!("{}={} does not exist", CONFIG_ENV, env_path);
        }

        let mut config_paths = vec![PathBuf::from("git-mcp.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("mcp-server-git").join("config.toml"));
        }

        for path in config_paths {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return Ok(config);
                }
                Err(e) => tracing::warn!("Skipping config: {}", e),
            }
        }

        tracing::debug!("Using default configuration");
        Ok(Self::default())
    }
}
