//! Conditional CSS/JS theme patches for browser-hosted themes.
//!
//! A theme ships a [`PatchManifest`]: unconditional patch rules plus
//! condition-dependent effects. [`resolve`] flattens it into injection
//! [`Directive`]s for the theme's active condition values, and
//! `PatchLifecycle` installs them through the host's [`BrowserHost`]
//! capability, removing the previous cycle's patches first.

pub mod config;
pub mod error;
pub mod host;
pub mod patches;

pub use config::PatchConfig;
pub use error::{PatchError, Result};
pub use host::{BrowserHost, ModuleHandle};
pub use patches::*;
