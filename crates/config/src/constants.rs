//! Fixed names shared by the scaffolding workflow
//!
//! These are deliberately not configurable: the artifact file name and the
//! placeholder token are part of the manifest contract.

/// Name of the downloaded release archive, relative to the project root
pub const ARTIFACT_FILENAME: &str = "artifact.tar.gz";

/// Token substituted with the configured version in the artifact URL
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Key under the manifest's `extra` section holding the scaffold options
pub const DEFAULT_EXTRA_KEY: &str = "ne-platform-scaffold";

/// Default manifest file name, relative to the working directory
pub const DEFAULT_MANIFEST: &str = "composer.json";

/// Directory of bundled patches, relative to the executable
pub const PATCHES_DIR_NAME: &str = "patches";

/// Glob matching patch files removed from the build directory after a run
pub const PATCH_GLOB: &str = "*.patch";
