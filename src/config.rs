//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treekit/treekit.toml`
//! 3. Local config: `<dir>/.treekit.toml`
//! 4. Environment variables: `TREEKIT_*` prefix

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};

/// Where `insert` routes a value equal to the node it is compared against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Equal values descend into the right subtree
    #[default]
    Right,
    /// Equal values descend into the left subtree
    Left,
    /// Equal values are dropped, no node is created
    Ignore,
}

/// Which neighbour replaces a deleted node that has two children.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Replacement {
    /// Maximum of the left subtree
    #[default]
    Predecessor,
    /// Minimum of the right subtree
    Successor,
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DuplicatePolicy::Right => "right",
            DuplicatePolicy::Left => "left",
            DuplicatePolicy::Ignore => "ignore",
        };
        write!(f, "{name}")
    }
}

impl FromStr for DuplicatePolicy {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "right" => Ok(DuplicatePolicy::Right),
            "left" => Ok(DuplicatePolicy::Left),
            "ignore" => Ok(DuplicatePolicy::Ignore),
            other => Err(TreeError::Config {
                message: format!("unknown duplicate policy: {other}"),
            }),
        }
    }
}

impl fmt::Display for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Replacement::Predecessor => "predecessor",
            Replacement::Successor => "successor",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Replacement {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "predecessor" => Ok(Replacement::Predecessor),
            "successor" => Ok(Replacement::Successor),
            other => Err(TreeError::Config {
                message: format!("unknown replacement: {other}"),
            }),
        }
    }
}

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub duplicates: Option<DuplicatePolicy>,
    pub replacement: Option<Replacement>,
}

/// Tree policies for treekit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Routing of duplicate values on insert (default: right)
    pub duplicates: DuplicatePolicy,
    /// Replacement node for two-child deletion (default: predecessor)
    pub replacement: Replacement,
}

/// Get the XDG config directory for treekit.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treekit").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treekit.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treekit.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> TreeResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| TreeError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| TreeError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            duplicates: overlay.duplicates.unwrap_or(self.duplicates),
            replacement: overlay.replacement.unwrap_or(self.replacement),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.treekit.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/treekit/treekit.toml`
    /// 3. Local config: `<local_dir>/.treekit.toml`
    /// 4. Environment variables: `TREEKIT_*` prefix
    #[instrument(level = "debug")]
    pub fn load(local_dir: Option<&Path>) -> TreeResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current, None)?;
        debug!("effective settings: {:?}", current);

        Ok(current)
    }

    /// Load a single TOML file on top of the compiled defaults.
    pub fn from_file(path: &Path) -> TreeResult<Self> {
        let raw = load_raw_settings(path)?;
        Ok(Self::default().merge_with(&raw))
    }

    /// Apply TREEKIT_* environment variables as explicit overrides.
    ///
    /// `source` replaces the process environment when given.
    fn apply_env_overrides(
        mut settings: Self,
        source: Option<config::Map<String, String>>,
    ) -> TreeResult<Self> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("TREEKIT").source(source))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("duplicates") {
            settings.duplicates = val.parse()?;
        }
        if let Ok(val) = config.get_string("replacement") {
            settings.replacement = val.parse()?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> TreeResult<String> {
        toml::to_string_pretty(self).map_err(|e| TreeError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treekit configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treekit/treekit.toml
#   Local:  <dir>/.treekit.toml
#   Env:    TREEKIT_* environment variables

# Where insert routes a value equal to the compared node: "right", "left" or "ignore"
# duplicates = "right"

# Node copied into a deleted two-child node: "predecessor" or "successor"
# replacement = "predecessor"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> TreeError {
    TreeError::Config {
        message: e.to_string(),
    }
}
