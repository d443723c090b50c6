//! Filesystem locations of a run

use pscaf_config::constants::ARTIFACT_FILENAME;
use pscaf_config::ScaffoldOptions;
use std::path::{Path, PathBuf};

/// Resolved locations, all derived from the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldPaths {
    /// Directory containing the manifest
    pub root: PathBuf,
    /// `root/<directories.build>`, recreated on every run
    pub build_dir: PathBuf,
    /// `root/artifact.tar.gz`, present only between download and extraction
    pub artifact: PathBuf,
    /// Bundled patches applied to every build
    pub patches_dir: PathBuf,
}

impl ScaffoldPaths {
    #[must_use]
    pub fn new(root: &Path, options: &ScaffoldOptions, patches_dir: PathBuf) -> Self {
        Self {
            root: root.to_path_buf(),
            build_dir: root.join(&options.directories.build),
            artifact: root.join(ARTIFACT_FILENAME),
            patches_dir,
        }
    }

    /// Resolve paths relative to the directory holding `manifest`
    #[must_use]
    pub fn from_manifest_path(
        manifest: &Path,
        options: &ScaffoldOptions,
        patches_dir: PathBuf,
    ) -> Self {
        let root = match manifest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::new(root, options, patches_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pscaf_config::{ArtifactOptions, DirectoryOptions};

    fn options() -> ScaffoldOptions {
        ScaffoldOptions {
            artifact: ArtifactOptions {
                url: "https://example.org/{version}.tar.gz".into(),
            },
            version: "1.0".into(),
            directories: DirectoryOptions {
                build: PathBuf::from("web/build"),
            },
            patches: None,
        }
    }

    #[test]
    fn resolves_against_manifest_dir() {
        let paths = ScaffoldPaths::from_manifest_path(
            Path::new("/srv/site/composer.json"),
            &options(),
            PathBuf::from("/opt/pscaf/patches"),
        );
        assert_eq!(paths.root, PathBuf::from("/srv/site"));
        assert_eq!(paths.build_dir, PathBuf::from("/srv/site/web/build"));
        assert_eq!(paths.artifact, PathBuf::from("/srv/site/artifact.tar.gz"));
    }

    #[test]
    fn bare_manifest_name_uses_current_dir() {
        let paths = ScaffoldPaths::from_manifest_path(
            Path::new("composer.json"),
            &options(),
            PathBuf::from("patches"),
        );
        assert_eq!(paths.root, PathBuf::from("."));
        assert_eq!(paths.build_dir, PathBuf::from("./web/build"));
    }
}
