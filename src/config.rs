//! Location of the theme registry file.

use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration directory.
pub const CONFIG_DIR_ENV: &str = "THEME_PATCHES_CONFIG_DIR";

/// File name of the theme registry inside the configuration directory.
pub const DEFAULT_REGISTRY_FILE: &str = "themes.json";

/// Where patch state is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchConfig {
    config_dir: PathBuf,
    registry_file: String,
}

impl PatchConfig {
    /// Create a config rooted at the given directory.
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            registry_file: DEFAULT_REGISTRY_FILE.to_string(),
        }
    }

    /// Resolve the config directory from the environment.
    ///
    /// Uses `THEME_PATCHES_CONFIG_DIR` when set, otherwise the platform
    /// config directory (e.g. `~/.config/theme-patches`).
    #[cfg(feature = "runtime")]
    pub fn from_env() -> crate::error::Result<Self> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(Self::new(dir));
        }
        dirs::config_dir()
            .map(|dir| Self::new(dir.join("theme-patches")))
            .ok_or(crate::error::PatchError::ConfigDirUnavailable)
    }

    /// Use a different registry file name.
    pub fn with_registry_file(mut self, name: impl Into<String>) -> Self {
        self.registry_file = name.into();
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Full path of the theme registry file.
    pub fn registry_path(&self) -> PathBuf {
        self.config_dir.join(&self.registry_file)
    }
}
