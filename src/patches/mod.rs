//! Theme patch module with separated pure types and I/O operations.
//!
//! This module is split into:
//! - `types`: Manifest and directive data types (no filesystem access)
//! - `resolver`: Pure manifest -> directive resolution
//! - `loader`: Theme registry file loading (runtime only)
//! - `lifecycle`: Installs resolved directives through a [`BrowserHost`](crate::host::BrowserHost) (runtime only)
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use theme_patches::{PatchConfig, PatchLifecycle, PatchManifest};
//!
//! // One lifecycle per host, created at startup
//! let mut lifecycle = PatchLifecycle::new(Arc::new(host), PatchConfig::from_env()?);
//!
//! // Re-run whenever the theme or one of its conditions changes
//! let manifest = PatchManifest::from_json(&std::fs::read_to_string("skin.json")?)?;
//! lifecycle.apply(Path::new("/themes/Fluenty"), &manifest, "Fluenty");
//! ```

// Loader and lifecycle require filesystem access - runtime only
#[cfg(feature = "runtime")]
mod lifecycle;
#[cfg(feature = "runtime")]
mod loader;
mod resolver;
mod types;

#[cfg(feature = "runtime")]
pub use lifecycle::*;
#[cfg(feature = "runtime")]
pub use loader::*;
pub use resolver::*;
pub use types::*;
