//! Host capability surface.
//!
//! The surrounding runtime owns the real CSS/JS injection mechanism. This
//! module only describes it: install a text-matching rule against a target
//! resource and get back a handle, later remove the rule by handle.

use std::fmt;
use std::path::Path;

/// Opaque token identifying one active browser module on the host side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ModuleHandle(pub u64);

impl fmt::Display for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module-{}", self.0)
    }
}

/// Injection primitives provided by the host runtime.
///
/// This abstraction allows:
/// - Testing with recording implementations
/// - Hosts that forward to a remote browser over IPC
pub trait BrowserHost: Send + Sync {
    /// Inject the stylesheet at `path` into every page whose URL matches `match_regex`.
    fn install_css(&self, path: &Path, match_regex: &str) -> anyhow::Result<ModuleHandle>;

    /// Inject the script at `path` into every page whose URL matches `match_regex`.
    fn install_js(&self, path: &Path, match_regex: &str) -> anyhow::Result<ModuleHandle>;

    /// Remove a previously installed module.
    fn uninstall(&self, handle: ModuleHandle) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_handle_display() {
        assert_eq!(ModuleHandle(7).to_string(), "module-7");
    }

    #[test]
    fn test_module_handle_serializes_as_number() {
        let json = serde_json::to_string(&ModuleHandle(42)).unwrap();
        assert_eq!(json, "42");
    }
}
