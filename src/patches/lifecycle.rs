//! Install/uninstall lifecycle of theme patches on the host.
//!
//! [`PatchLifecycle`] owns two independent sets of host modules:
//! - conditional patches, torn down and rebuilt on every [`PatchLifecycle::apply`]
//! - always-on static modules, only removed by [`PatchLifecycle::unregister_all`]
//!
//! The host constructs exactly one lifecycle at startup and passes it to
//! every call site. Calls must be serialized by the caller; wrap the
//! lifecycle in a `Mutex` if theme switches can race.

use std::path::Path;
use std::sync::Arc;

use super::loader::{resolve_for_theme, ConditionRegistry};
use super::types::{FileType, InstalledPatch, PatchManifest};
use crate::config::PatchConfig;
use crate::error::{PatchError, Result};
use crate::host::{BrowserHost, ModuleHandle};

/// Match pattern used by static modules when none is given.
pub const MATCH_ALL: &str = ".*";

/// Maximum manifest length included in failure logs.
const MANIFEST_EXCERPT_LEN: usize = 512;

pub struct PatchLifecycle {
    host: Arc<dyn BrowserHost>,
    config: PatchConfig,
    /// Conditional patches installed by the last apply cycle
    installed: Vec<InstalledPatch>,
    /// Always-on modules, never touched by apply/clear
    static_handles: Vec<ModuleHandle>,
}

impl PatchLifecycle {
    pub fn new(host: Arc<dyn BrowserHost>, config: PatchConfig) -> Self {
        Self {
            host,
            config,
            installed: Vec::new(),
            static_handles: Vec::new(),
        }
    }

    pub fn config(&self) -> &PatchConfig {
        &self.config
    }

    /// Conditional patches currently installed.
    pub fn installed(&self) -> &[InstalledPatch] {
        &self.installed
    }

    pub fn installed_len(&self) -> usize {
        self.installed.len()
    }

    /// Always-on modules currently installed.
    pub fn static_handles(&self) -> &[ModuleHandle] {
        &self.static_handles
    }

    /// Uninstall every conditional patch.
    ///
    /// Works on a snapshot of the installed set. A patch leaves the set only
    /// once the host has removed it, so on error the set still holds the
    /// failed patch and everything after it.
    pub fn clear(&mut self) -> Result<()> {
        let snapshot = self.installed.clone();
        for patch in snapshot {
            self.host
                .uninstall(patch.handle)
                .map_err(|source| PatchError::Host {
                    operation: "uninstall",
                    target: patch.path.display().to_string(),
                    source,
                })?;
            tracing::debug!("Removed patch {} ({:?})", patch.handle, patch.path);
            // Snapshot order matches the set, so the front entry is this patch
            self.installed.remove(0);
        }
        Ok(())
    }

    /// Re-evaluate `manifest` for `theme` and install the resulting patches.
    ///
    /// Resolved target paths are relative to `base_path`. Failures are logged
    /// and written to stderr, never returned. Patches installed before a
    /// failure stay installed.
    pub fn apply(&mut self, base_path: &Path, manifest: &PatchManifest, theme: &str) {
        if let Err(e) = self.try_apply(base_path, manifest, theme) {
            tracing::error!(
                theme = theme,
                manifest = %manifest_excerpt(manifest),
                "Error applying conditional patches: {}",
                e
            );
            eprintln!("{:?}", anyhow::Error::from(e));
        }
    }

    /// Fallible body of [`apply`](Self::apply); returns the number of installed patches.
    pub fn try_apply(
        &mut self,
        base_path: &Path,
        manifest: &PatchManifest,
        theme: &str,
    ) -> Result<usize> {
        self.clear()?;

        let registry = ConditionRegistry::load(&self.config.registry_path())?;
        let directives = resolve_for_theme(manifest, &registry, theme)?;

        for directive in &directives {
            let Some(target_path) = directive.target_path.as_deref() else {
                continue;
            };
            let path = base_path.join(target_path);
            let match_string = directive.match_string.as_str();

            let (operation, result) = match directive.file_type {
                FileType::TargetCss => {
                    ("install css", self.host.install_css(&path, match_string))
                }
                FileType::TargetJs => ("install js", self.host.install_js(&path, match_string)),
                FileType::Other(_) => continue,
            };
            let handle = result.map_err(|source| PatchError::Host {
                operation,
                target: path.display().to_string(),
                source,
            })?;

            tracing::debug!("Installed {} for {:?} as {}", directive.file_type, path, handle);
            self.installed.push(InstalledPatch { path, handle });
        }

        Ok(self.installed.len())
    }

    /// Install an always-on stylesheet on every page.
    pub fn add_static_css(&mut self, path: &Path) -> Result<ModuleHandle> {
        self.add_static_css_matching(path, MATCH_ALL)
    }

    /// Install an always-on stylesheet on pages matching `match_regex`.
    pub fn add_static_css_matching(
        &mut self,
        path: &Path,
        match_regex: &str,
    ) -> Result<ModuleHandle> {
        let handle = self
            .host
            .install_css(path, match_regex)
            .map_err(|source| PatchError::Host {
                operation: "install css",
                target: path.display().to_string(),
                source,
            })?;
        self.static_handles.push(handle);
        Ok(handle)
    }

    /// Install an always-on script on every page.
    pub fn add_static_js(&mut self, path: &Path) -> Result<ModuleHandle> {
        self.add_static_js_matching(path, MATCH_ALL)
    }

    /// Install an always-on script on pages matching `match_regex`.
    pub fn add_static_js_matching(
        &mut self,
        path: &Path,
        match_regex: &str,
    ) -> Result<ModuleHandle> {
        let handle = self
            .host
            .install_js(path, match_regex)
            .map_err(|source| PatchError::Host {
                operation: "install js",
                target: path.display().to_string(),
                source,
            })?;
        self.static_handles.push(handle);
        Ok(handle)
    }

    /// Remove every always-on module. Used when the theme is disabled or at shutdown.
    pub fn unregister_all(&mut self) -> Result<()> {
        let snapshot = self.static_handles.clone();
        for handle in snapshot {
            self.host
                .uninstall(handle)
                .map_err(|source| PatchError::Host {
                    operation: "uninstall",
                    target: handle.to_string(),
                    source,
                })?;
            self.static_handles.remove(0);
        }
        Ok(())
    }
}

fn manifest_excerpt(manifest: &PatchManifest) -> String {
    let mut json = serde_json::to_string(manifest).unwrap_or_default();
    if json.len() > MANIFEST_EXCERPT_LEN {
        let mut end = MANIFEST_EXCERPT_LEN;
        while !json.is_char_boundary(end) {
            end -= 1;
        }
        json.truncate(end);
        json.push_str("...");
    }
    json
}
