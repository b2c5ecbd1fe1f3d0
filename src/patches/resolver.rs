//! Conditional patch resolution.
//!
//! Turns a theme's [`PatchManifest`] plus the theme's active condition values
//! into a flat, deduplicated list of [`Directive`]s. No I/O happens here.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;

use super::types::{Directive, FileType, PatchManifest};
use crate::error::{PatchError, Result};

/// Active condition values of one theme: condition key -> selected value.
///
/// Values are raw JSON; only string values can select a declared effect.
pub type ThemeConditions = IndexMap<String, Value>;

/// Resolve `manifest` against the active condition values of `theme`.
///
/// Condition directives come first, then unconditional patches, each in
/// manifest order. Duplicate `(match_string, target_path)` pairs keep their
/// first occurrence.
pub fn resolve(
    manifest: &PatchManifest,
    theme: &str,
    active: &ThemeConditions,
) -> Result<Vec<Directive>> {
    let mut directives = Vec::new();

    for (key, condition) in &manifest.conditions {
        let value = active
            .get(key)
            .ok_or_else(|| PatchError::MissingCondition {
                theme: theme.to_string(),
                condition: key.clone(),
            })?;

        // An active value with no declared effects contributes nothing
        let Some(effects) = value.as_str().and_then(|v| condition.values.get(v)) else {
            if !value.is_string() {
                tracing::debug!("Condition {} has non-string value {}, no effects", key, value);
            }
            continue;
        };

        for (kind, effect) in effects {
            push_effect(&mut directives, key, kind, effect);
        }
    }

    for patch in &manifest.patches {
        for (kind, targets) in patch.targets() {
            for target in targets.as_slice() {
                directives.push(Directive::new(&patch.match_regex, target, kind.clone()));
            }
        }
    }

    let directives = dedup(directives);

    tracing::info!(
        "Resolved {} patch directives for theme {}: {}",
        directives.len(),
        theme,
        serde_json::to_string(&directives).unwrap_or_default()
    );

    Ok(directives)
}

/// Emit one directive per entry of an effect descriptor's `affects` list.
fn push_effect(directives: &mut Vec<Directive>, key: &str, kind: &str, effect: &Value) {
    let Some(descriptor) = effect.as_object() else {
        tracing::warn!("Condition {} effect {} is not an object, skipping", key, kind);
        return;
    };

    let Some(affects) = descriptor.get("affects").and_then(Value::as_array) else {
        return;
    };

    let target_path = descriptor
        .get("src")
        .and_then(Value::as_str)
        .map(str::to_string);

    for match_string in affects {
        match match_string.as_str() {
            Some(match_string) => directives.push(Directive {
                match_string: match_string.to_string(),
                target_path: target_path.clone(),
                file_type: FileType::from(kind),
            }),
            None => tracing::warn!(
                "Condition {} effect {} has non-string match {}, skipping",
                key,
                kind,
                match_string
            ),
        }
    }
}

/// Drop later directives whose identity was already seen, keeping order.
fn dedup(directives: Vec<Directive>) -> Vec<Directive> {
    let mut seen = HashSet::new();
    directives
        .into_iter()
        .filter(|d| seen.insert((d.match_string.clone(), d.target_path.clone())))
        .collect()
}
