use pscaf_config::constants::VERSION_PLACEHOLDER;
use pscaf_config::ScaffoldOptions;
use pscaf_errors::{Error, ScaffoldError};
use url::Url;

/// Artifact URL with every `{version}` token replaced by the version
#[must_use]
pub fn artifact_uri(options: &ScaffoldOptions) -> String {
    options
        .artifact
        .url
        .replace(VERSION_PLACEHOLDER, &options.version)
}

/// Local file name of a remote patch: the last segment of the URL path
///
/// # Errors
///
/// Returns [`ScaffoldError::InvalidPatchUrl`] if the URL does not parse or
/// its path ends with an empty segment.
pub fn patch_file_name(url: &str) -> Result<String, Error> {
    let invalid = || ScaffoldError::InvalidPatchUrl {
        url: url.to_string(),
    };
    let parsed = Url::parse(url).map_err(|_| invalid())?;
    let segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(invalid)?;

    // Percent-encoded names are kept as written
    Ok(segment.to_string())
}
