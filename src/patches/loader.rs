//! Theme registry loading.
//!
//! The registry file records, per theme, which value each condition is
//! currently set to:
//!
//! ```json
//! { "conditions": { "Fluenty": { "colorway": "dark" } } }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::resolver::{resolve, ThemeConditions};
use super::types::{Directive, PatchManifest};
use crate::error::{PatchError, Result};

/// Active condition values for every known theme.
///
/// This is a pure data structure; [`ConditionRegistry::load`] reads it from disk.
/// Theme entries stay raw JSON until looked up, so one malformed entry does
/// not affect other themes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConditionRegistry {
    #[serde(default)]
    conditions: HashMap<String, Value>,
}

impl ConditionRegistry {
    /// Read and parse the registry file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PatchError::RegistryLoad {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| PatchError::RegistryParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse registry JSON that did not come from a file.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Active condition values of `theme`.
    pub fn theme(&self, theme: &str) -> Result<ThemeConditions> {
        let entry = self
            .conditions
            .get(theme)
            .ok_or_else(|| PatchError::UnknownTheme {
                theme: theme.to_string(),
            })?;

        let values = entry.as_object().ok_or_else(|| PatchError::MalformedTheme {
            theme: theme.to_string(),
        })?;

        Ok(values
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    /// Names of all themes with registry entries.
    pub fn themes(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

/// Look up `theme` in `registry` and resolve `manifest` against it.
pub fn resolve_for_theme(
    manifest: &PatchManifest,
    registry: &ConditionRegistry,
    theme: &str,
) -> Result<Vec<Directive>> {
    resolve(manifest, theme, &registry.theme(theme)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patches::types::FileType;

    #[test]
    fn test_load_registry_from_file() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("themes.json");
        std::fs::write(
            &path,
            r#"{ "conditions": { "Fluenty": { "colorway": "dark", "tabs": "compact" } }, "active": "Fluenty" }"#,
        )
        .expect("Failed to write registry");

        let registry = ConditionRegistry::load(&path).unwrap();
        let fluenty = registry.theme("Fluenty").unwrap();
        assert_eq!(fluenty.get("colorway").and_then(Value::as_str), Some("dark"));
        assert_eq!(fluenty.get("tabs").and_then(Value::as_str), Some("compact"));
        assert_eq!(registry.themes().collect::<Vec<_>>(), vec!["Fluenty"]);
    }

    #[test]
    fn test_missing_registry_file() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let err = ConditionRegistry::load(&temp_dir.path().join("themes.json")).unwrap_err();
        assert!(matches!(err, PatchError::RegistryLoad { .. }));
        assert!(err.is_registry_load());
    }

    #[test]
    fn test_malformed_registry_file() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("themes.json");
        std::fs::write(&path, "{ not json").expect("Failed to write registry");

        let err = ConditionRegistry::load(&path).unwrap_err();
        assert!(matches!(err, PatchError::RegistryParse { .. }));
        assert!(err.is_registry_load());
    }

    #[test]
    fn test_mixed_type_entries_only_affect_their_theme() {
        let registry = ConditionRegistry::from_json(
            r#"{"conditions":{
                "Fluenty":{"colorway":"dark"},
                "Other":{"blur":true,"layout":{"nested":1}},
                "Broken":"not a map"
            }}"#,
        )
        .unwrap();

        let fluenty = registry.theme("Fluenty").unwrap();
        assert_eq!(fluenty.get("colorway").and_then(Value::as_str), Some("dark"));

        let other = registry.theme("Other").unwrap();
        assert_eq!(other.get("blur"), Some(&Value::Bool(true)));

        assert!(matches!(
            registry.theme("Broken"),
            Err(PatchError::MalformedTheme { theme }) if theme == "Broken"
        ));
    }

    #[test]
    fn test_non_string_condition_value_resolves_to_nothing() {
        let registry = ConditionRegistry::from_json(
            r#"{"conditions":{"Glass":{"blur":true},"Fluenty":{"colorway":"dark"}}}"#,
        )
        .unwrap();
        let manifest = PatchManifest::from_json(
            r#"{
                "Conditions":{"blur":{"values":{"true":{"TargetCss":{"affects":[".*"],"src":"blur.css"}}}}},
                "Patches":[{"MatchRegexString":".*","TargetCss":"base.css"}]
            }"#,
        )
        .unwrap();

        let directives = resolve_for_theme(&manifest, &registry, "Glass").unwrap();
        assert_eq!(
            directives,
            vec![Directive::new(".*", "base.css", FileType::TargetCss)]
        );
    }

    #[test]
    fn test_registry_without_conditions_is_empty() {
        let registry = ConditionRegistry::from_json("{}").unwrap();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.theme("anything"),
            Err(PatchError::UnknownTheme { .. })
        ));
    }

    #[test]
    fn test_resolve_for_theme() {
        let registry =
            ConditionRegistry::from_json(r#"{"conditions":{"Glass":{"blur":"on"}}}"#).unwrap();
        let manifest = PatchManifest::from_json(
            r#"{"Conditions":{"blur":{"values":{"on":{"TargetCss":{"affects":["^Steam$"],"src":"blur.css"}}}}}}"#,
        )
        .unwrap();

        let directives = resolve_for_theme(&manifest, &registry, "Glass").unwrap();
        assert_eq!(
            directives,
            vec![Directive::new("^Steam$", "blur.css", FileType::TargetCss)]
        );

        let err = resolve_for_theme(&manifest, &registry, "Other").unwrap_err();
        assert!(matches!(err, PatchError::UnknownTheme { theme } if theme == "Other"));
    }
}
