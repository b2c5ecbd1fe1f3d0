//! Pure data types for theme patch manifests and resolved directives.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PatchError, Result};
use crate::host::ModuleHandle;

/// Declarative patch rules shipped with a theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchManifest {
    /// Condition key -> possible values -> effects.
    #[serde(rename = "Conditions", default)]
    pub conditions: IndexMap<String, ConditionSpec>,
    /// Unconditional rules, always active.
    #[serde(rename = "Patches", default)]
    pub patches: Vec<StaticPatch>,
}

impl PatchManifest {
    /// Parse a manifest from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(PatchError::ManifestParse)
    }

    /// Parse a manifest from an already-decoded JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(PatchError::ManifestParse)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.patches.is_empty()
    }
}

/// One theme condition and the effects of each of its values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    /// Value -> output kind -> effect descriptor.
    ///
    /// Descriptors are kept as raw JSON: malformed ones are skipped at
    /// resolution time instead of rejecting the whole manifest.
    #[serde(default)]
    pub values: IndexMap<String, IndexMap<String, Value>>,
}

/// An unconditional patch rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticPatch {
    #[serde(rename = "MatchRegexString")]
    pub match_regex: String,
    #[serde(rename = "TargetCss", default, skip_serializing_if = "Option::is_none")]
    pub target_css: Option<TargetList>,
    #[serde(rename = "TargetJs", default, skip_serializing_if = "Option::is_none")]
    pub target_js: Option<TargetList>,
}

impl StaticPatch {
    /// The targets of each fixed output kind, in `TargetCss`, `TargetJs` order.
    pub fn targets(&self) -> impl Iterator<Item = (FileType, &TargetList)> {
        [
            (FileType::TargetCss, self.target_css.as_ref()),
            (FileType::TargetJs, self.target_js.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, targets)| targets.map(|t| (kind, t)))
    }
}

/// A target given either as a single path or as a list of paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetList {
    One(String),
    Many(Vec<String>),
}

impl TargetList {
    pub fn as_slice(&self) -> &[String] {
        match self {
            TargetList::One(path) => std::slice::from_ref(path),
            TargetList::Many(paths) => paths,
        }
    }
}

/// Kind of a resolved directive.
///
/// Only `TargetCss` and `TargetJs` are installable; any other kind a
/// condition declares is carried through for description only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileType {
    TargetCss,
    TargetJs,
    Other(String),
}

impl FileType {
    pub fn as_str(&self) -> &str {
        match self {
            FileType::TargetCss => "TargetCss",
            FileType::TargetJs => "TargetJs",
            FileType::Other(kind) => kind,
        }
    }

    pub fn is_installable(&self) -> bool {
        matches!(self, FileType::TargetCss | FileType::TargetJs)
    }
}

impl From<&str> for FileType {
    fn from(kind: &str) -> Self {
        match kind {
            "TargetCss" => FileType::TargetCss,
            "TargetJs" => FileType::TargetJs,
            other => FileType::Other(other.to_string()),
        }
    }
}

impl From<String> for FileType {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "TargetCss" => FileType::TargetCss,
            "TargetJs" => FileType::TargetJs,
            _ => FileType::Other(kind),
        }
    }
}

impl From<FileType> for String {
    fn from(kind: FileType) -> Self {
        match kind {
            FileType::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete injection rule produced by the resolver.
///
/// Identity is `(match_string, target_path)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    pub match_string: String,
    /// `None` when a condition effect has no `src`; such directives are never installed.
    pub target_path: Option<String>,
    pub file_type: FileType,
}

impl Directive {
    pub fn new(
        match_string: impl Into<String>,
        target_path: impl Into<String>,
        file_type: FileType,
    ) -> Self {
        Self {
            match_string: match_string.into(),
            target_path: Some(target_path.into()),
            file_type,
        }
    }

    /// Dedup key of this directive.
    pub fn identity(&self) -> (&str, Option<&str>) {
        (&self.match_string, self.target_path.as_deref())
    }

    /// Whether a page at `url` would receive this directive.
    pub fn applies_to(&self, url: &str) -> std::result::Result<bool, regex::Error> {
        Ok(regex::Regex::new(&self.match_string)?.is_match(url))
    }
}

/// Directives from `directives` whose match pattern accepts `url`.
///
/// Stops at the first directive whose pattern does not compile.
pub fn directives_for_url<'a>(
    directives: &'a [Directive],
    url: &str,
) -> std::result::Result<Vec<&'a Directive>, regex::Error> {
    let mut matching = Vec::new();
    for directive in directives {
        if directive.applies_to(url)? {
            matching.push(directive);
        }
    }
    Ok(matching)
}

/// A directive that is currently installed on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPatch {
    /// Absolute path of the injected resource.
    pub path: PathBuf,
    pub handle: ModuleHandle,
}
