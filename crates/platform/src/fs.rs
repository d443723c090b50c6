//! Filesystem helpers for staging and cleaning the build directory.

use globset::Glob;
use ignore::WalkBuilder;
use pscaf_errors::{Error, PlatformError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Result type for filesystem operations
pub type Result<T> = std::result::Result<T, Error>;

fn fs_failure(operation: &str, path: &Path, error: &std::io::Error) -> Error {
    PlatformError::FilesystemOperationFailed {
        operation: operation.to_string(),
        message: format!("{}: {error}", path.display()),
    }
    .into()
}

/// Remove a file, returning whether it existed
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub async fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(fs_failure("remove_file", path, &e)),
    }
}

/// Remove a file that must exist
///
/// # Errors
///
/// Returns an error if the file is missing or cannot be removed.
pub async fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path)
        .await
        .map_err(|e| fs_failure("remove_file", path, &e))
}

/// Remove a directory tree if present and create it again, empty
///
/// On Unix the directory is created with mode `0o777`, subject to the umask.
///
/// # Errors
///
/// Returns an error if the old tree cannot be removed or the directory cannot
/// be created.
pub async fn recreate_dir(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "removed existing directory"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(fs_failure("remove_dir_all", path, &e)),
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o777);
    builder
        .create(path)
        .await
        .map_err(|e| fs_failure("create_dir", path, &e))
}

/// Copy `src` into `dir` under its own file name, returning that name
///
/// # Errors
///
/// Returns an error if `src` has no file name or the copy fails.
pub async fn copy_into(src: &Path, dir: &Path) -> Result<String> {
    let name = src
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| PlatformError::FilesystemOperationFailed {
            operation: "copy".to_string(),
            message: format!("{} has no file name", src.display()),
        })?;
    fs::copy(src, dir.join(&name))
        .await
        .map_err(|e| fs_failure("copy", src, &e))?;
    Ok(name)
}

/// List every regular file below `dir`, recursively
///
/// Hidden and ignored files are included. Entries are sorted by file name
/// within each directory, so the order is stable across runs.
///
/// # Errors
///
/// Returns an error if `dir` or one of its subdirectories cannot be read.
pub async fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let root = dir.to_path_buf();
    tokio::task::spawn_blocking(move || walk_files(&root))
        .await
        .map_err(|e| Error::internal(format!("file listing task failed: {e}")))?
}

fn walk_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| PlatformError::FilesystemOperationFailed {
            operation: "list_files".to_string(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_some_and(|t| t.is_file()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Delete files directly inside `dir` whose name matches `pattern`
///
/// Subdirectories are not descended into. Returns the number of files
/// removed.
///
/// # Errors
///
/// Returns an error if the pattern is invalid, `dir` cannot be read, or a
/// matching file cannot be removed.
pub async fn remove_matching(dir: &Path, pattern: &str) -> Result<usize> {
    let matcher = Glob::new(pattern)
        .map_err(|e| PlatformError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?
        .compile_matcher();

    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| fs_failure("read_dir", dir, &e))?;
    let mut removed = 0;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| fs_failure("read_dir", dir, &e))?
    {
        let path = entry.path();
        let is_file = entry
            .file_type()
            .await
            .map_err(|e| fs_failure("stat", &path, &e))?
            .is_file();
        if is_file && matcher.is_match(entry.file_name()) {
            remove_file(&path).await?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn recreate_dir_empties_existing_tree() {
        let temp = tempdir().unwrap();
        let build = temp.path().join("web").join("build");
        std::fs::create_dir_all(build.join("core")).unwrap();
        std::fs::write(build.join("core").join("old.php"), "<?php").unwrap();

        recreate_dir(&build).await.unwrap();

        assert!(build.is_dir());
        assert_eq!(std::fs::read_dir(&build).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn remove_file_if_exists_reports_presence() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("artifact.tar.gz");
        assert!(!remove_file_if_exists(&file).await.unwrap());
        std::fs::write(&file, "x").unwrap();
        assert!(remove_file_if_exists(&file).await.unwrap());
        assert!(!file.exists());
    }

    #[tokio::test]
    async fn list_files_is_recursive_and_sorted() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("b.patch"), "").unwrap();
        std::fs::write(root.join("a.diff"), "").unwrap();
        std::fs::write(root.join(".hidden.patch"), "").unwrap();
        std::fs::write(root.join("sub").join("c.patch"), "").unwrap();

        let names: Vec<_> = list_files(root)
            .await
            .unwrap()
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from(".hidden.patch"),
                PathBuf::from("a.diff"),
                PathBuf::from("b.patch"),
                PathBuf::from("sub").join("c.patch"),
            ]
        );
    }

    #[tokio::test]
    async fn remove_matching_is_not_recursive() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("one.patch"), "").unwrap();
        std::fs::write(root.join("two.patch"), "").unwrap();
        std::fs::write(root.join("keep.diff"), "").unwrap();
        std::fs::write(root.join("sub").join("nested.patch"), "").unwrap();

        assert_eq!(remove_matching(root, "*.patch").await.unwrap(), 2);
        assert!(root.join("keep.diff").exists());
        assert!(root.join("sub").join("nested.patch").exists());
        assert!(!root.join("one.patch").exists());
    }

    #[tokio::test]
    async fn invalid_pattern_is_reported() {
        let temp = tempdir().unwrap();
        let err = remove_matching(temp.path(), "[").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Platform(PlatformError::InvalidPattern { .. })
        ));
    }
}
