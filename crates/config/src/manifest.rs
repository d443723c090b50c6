//! Scaffold options read from the host project's package manifest
//!
//! The manifest is a JSON document; the options live under
//! `extra.<key>` (default key `ne-platform-scaffold`):
//!
//! ```json
//! {
//!   "extra": {
//!     "ne-platform-scaffold": {
//!       "artifact": { "url": "https://example.org/platform-{version}.tar.gz" },
//!       "version": "2.5.1",
//!       "directories": { "build": "build" },
//!       "patches": { "Fix menu": "https://example.org/patches/menu.patch" }
//!     }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use pscaf_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Component, Path, PathBuf};

use crate::constants::VERSION_PLACEHOLDER;

/// Options of one scaffolding run, immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldOptions {
    pub artifact: ArtifactOptions,
    pub version: String,
    pub directories: DirectoryOptions,
    /// Description to patch URL, in declaration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patches: Option<IndexMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactOptions {
    /// URL template containing the `{version}` placeholder
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryOptions {
    /// Build directory, relative to the project root
    pub build: PathBuf,
}

const REQUIRED_FIELDS: [&str; 3] = ["artifact.url", "version", "directories.build"];

impl ScaffoldOptions {
    /// Read options from a manifest file on disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, is not valid JSON, lacks the
    /// scaffold section or a required field, or fails validation.
    pub async fn from_manifest_file(path: &Path, extra_key: &str) -> Result<Self, Error> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| crate::read_error(&e, path))?;
        Self::from_manifest_str(&contents, extra_key)
    }

    /// Parse options out of manifest JSON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON, lacks the scaffold
    /// section or a required field, or fails validation.
    pub fn from_manifest_str(contents: &str, extra_key: &str) -> Result<Self, Error> {
        let manifest: Value = serde_json::from_str(contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;

        let section_path = format!("extra.{extra_key}");
        let mut section = manifest
            .get("extra")
            .and_then(|extra| extra.get(extra_key))
            .cloned()
            .ok_or_else(|| ConfigError::MissingField {
                field: section_path.clone(),
            })?;

        for field in REQUIRED_FIELDS {
            let pointer = format!("/{}", field.replace('.', "/"));
            match section.pointer(&pointer) {
                Some(Value::String(_)) => {}
                Some(other) => {
                    return Err(ConfigError::InvalidValue {
                        field: format!("{section_path}.{field}"),
                        value: other.to_string(),
                    }
                    .into())
                }
                None => {
                    return Err(ConfigError::MissingField {
                        field: format!("{section_path}.{field}"),
                    }
                    .into())
                }
            }
        }

        // An empty patch list is commonly serialized as `[]`
        if let Some(map) = section.as_object_mut() {
            let empty = match map.get("patches") {
                Some(Value::Null) => true,
                Some(Value::Array(items)) => items.is_empty(),
                Some(Value::Object(items)) => items.is_empty(),
                _ => false,
            };
            if empty {
                map.remove("patches");
            }
        }

        let options: Self =
            serde_json::from_value(section).map_err(|e| ConfigError::InvalidValue {
                field: format!("{section_path}.patches"),
                value: e.to_string(),
            })?;
        options.validate()?;
        Ok(options)
    }

    /// Apply CLI overrides and re-validate
    ///
    /// # Errors
    ///
    /// Returns an error if the overridden values fail validation.
    pub fn with_overrides(
        mut self,
        version: Option<String>,
        build_dir: Option<PathBuf>,
    ) -> Result<Self, Error> {
        if let Some(version) = version {
            self.version = version;
        }
        if let Some(build) = build_dir {
            self.directories.build = build;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check invariants the workflow relies on
    ///
    /// # Errors
    ///
    /// Returns an error on an empty version, a build directory that is not a
    /// plain relative path, or a patch URL that is not absolute.
    pub fn validate(&self) -> Result<(), Error> {
        if self.version.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "version".to_string(),
                value: self.version.clone(),
            }
            .into());
        }

        // The build directory is removed recursively on every run
        let build = &self.directories.build;
        let has_normal = build
            .components()
            .any(|c| matches!(c, Component::Normal(_)));
        let escapes = build
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
        if !has_normal || escapes {
            return Err(ConfigError::InvalidValue {
                field: "directories.build".to_string(),
                value: build.display().to_string(),
            }
            .into());
        }

        for (description, patch_url) in self.patches.iter().flatten() {
            if url::Url::parse(patch_url).is_err() {
                return Err(ConfigError::InvalidValue {
                    field: format!("patches.{description}"),
                    value: patch_url.clone(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Whether the artifact URL template contains the version placeholder
    #[must_use]
    pub fn has_version_placeholder(&self) -> bool {
        self.artifact.url.contains(VERSION_PLACEHOLDER)
    }
}
