//! Project configuration.
//!
//! Settings are layered, later sources winning:
//!
//! 1. Defaults (built-ins on, no extra catalogs)
//! 2. `.doctype.yaml` in the project directory
//! 3. `doctype.toml` in the project directory
//! 4. `DOCTYPE_*` environment variables
//!
//! Command-line flags are applied on top by the caller.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CliError;

pub const YAML_CONFIG_FILE: &str = ".doctype.yaml";
pub const TOML_CONFIG_FILE: &str = "doctype.toml";
pub const ENV_PREFIX: &str = "DOCTYPE_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoctypeConfig {
    /// Extra catalog files or directories, relative to the project directory
    pub catalogs: Vec<PathBuf>,
    /// Whether the built-in field types are loaded
    pub builtins: bool,
}

impl Default for DoctypeConfig {
    fn default() -> Self {
        Self {
            catalogs: Vec::new(),
            builtins: true,
        }
    }
}

impl DoctypeConfig {
    /// Load configuration for the current directory.
    pub fn load() -> Result<Self, CliError> {
        Self::load_from(Path::new("."))
    }

    /// Load configuration for the project rooted at `dir`.
    pub fn load_from(dir: &Path) -> Result<Self, CliError> {
        let mut config: DoctypeConfig = Self::figment(dir).extract()?;
        config.catalogs = config
            .catalogs
            .into_iter()
            .map(|p| if p.is_relative() { dir.join(p) } else { p })
            .collect();
        debug!(?config, "loaded configuration");
        Ok(config)
    }

    fn figment(dir: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(DoctypeConfig::default()))
            .merge(Yaml::file(dir.join(YAML_CONFIG_FILE)))
            .merge(Toml::file(dir.join(TOML_CONFIG_FILE)))
            .merge(Env::prefixed(ENV_PREFIX).map(|key| key.as_str().to_lowercase().into()))
    }

    /// Apply command-line flags: `--catalog` adds to the configured list,
    /// `--no-builtins` switches the built-ins off.
    pub fn with_overrides(mut self, catalogs: &[PathBuf], no_builtins: bool) -> Self {
        self.catalogs.extend(catalogs.iter().cloned());
        if no_builtins {
            self.builtins = false;
        }
        self
    }
}
