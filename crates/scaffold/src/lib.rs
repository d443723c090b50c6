#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform scaffolding workflow
//!
//! A run downloads the release artifact, extracts it into a freshly
//! recreated build directory, applies the bundled patches and then the
//! patches declared in the manifest, and finally removes every `*.patch`
//! file it left behind:
//!
//! ```text
//! preflight -> download -> extract -> remove artifact
//!           -> local patches -> remote patches -> clean up
//! ```
//!
//! Failed patches are reported and do not stop the run; everything else is
//! fatal. Network access and process execution go through the [`Fetcher`]
//! and [`ProcessRunner`](pscaf_platform::ProcessRunner) seams.

mod artifact;
mod context;
mod fetch;
mod patches;
mod paths;
mod report;
mod scaffolder;
mod uri;

pub use context::ScaffoldContext;
pub use fetch::{Fetcher, NetFetcher};
pub use paths::ScaffoldPaths;
pub use report::{PatchOutcome, PatchReport, ScaffoldReport};
pub use scaffolder::Scaffolder;
pub use uri::{artifact_uri, patch_file_name};
