//! Error types for patch resolution and injection.

use std::io;
use std::path::PathBuf;

/// Errors produced while resolving or installing theme patches.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// The theme registry file could not be read.
    #[error("failed to read theme registry {path:?}")]
    RegistryLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The theme registry file is not valid registry JSON.
    #[error("malformed theme registry {path:?}")]
    RegistryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The registry has no condition entry for this theme.
    #[error("theme {theme:?} has no entry in the theme registry")]
    UnknownTheme { theme: String },

    /// The theme's registry entry is not a map of condition values.
    #[error("theme {theme:?} has a malformed entry in the theme registry")]
    MalformedTheme { theme: String },

    /// The manifest declares a condition the registry has no active value for.
    #[error("theme {theme:?} declares condition {condition:?} but the registry has no value for it")]
    MissingCondition { theme: String, condition: String },

    /// The manifest JSON does not have the expected shape.
    #[error("malformed patch manifest")]
    ManifestParse(#[source] serde_json::Error),

    /// No configuration directory could be determined.
    #[error("no configuration directory available")]
    ConfigDirUnavailable,

    /// The host failed to install or remove a browser module.
    #[error("host {operation} failed for {target}")]
    Host {
        operation: &'static str,
        target: String,
        #[source]
        source: anyhow::Error,
    },
}

impl PatchError {
    /// True for the two registry-file failures (unreadable or malformed).
    pub fn is_registry_load(&self) -> bool {
        matches!(
            self,
            PatchError::RegistryLoad { .. } | PatchError::RegistryParse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PatchError>;
