//! Integration tests for config

#[cfg(test)]
mod tests {
    use pscaf_config::*;
    use pscaf_errors::ConfigError;
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[general]
color = "never"
verbose = true

[network]
retries = 5

[paths]
patches_dir = "/srv/scaffold/patches"

[tools]
git = "/usr/local/bin/git"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.general.color, ColorChoice::Never);
        assert!(config.general.verbose);
        assert!(!config.general.strict);
        assert_eq!(config.network.retries, 5);
        assert_eq!(config.network.timeout, 300);
        assert_eq!(config.patches_dir(), PathBuf::from("/srv/scaffold/patches"));
        assert_eq!(config.tools.git, "/usr/local/bin/git");
        assert_eq!(config.tools.tar, "tar");
        assert_eq!(config.manifest.extra_key, constants::DEFAULT_EXTRA_KEY);
    }

    #[tokio::test]
    async fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load_or_default(Some(missing.as_path())).await,
            Err(pscaf_errors::Error::Config(ConfigError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_unreadable_file_keeps_io_kind() {
        let dir = tempfile::tempdir().unwrap();

        let err = Config::load_from_file(dir.path()).await.unwrap_err();
        assert!(
            matches!(err, pscaf_errors::Error::Io { path: Some(ref p), .. } if p == dir.path()),
            "unexpected error: {err:?}"
        );

        let err = ScaffoldOptions::from_manifest_file(dir.path(), constants::DEFAULT_EXTRA_KEY)
            .await
            .unwrap_err();
        assert!(matches!(err, pscaf_errors::Error::Io { .. }), "unexpected error: {err:?}");

        let missing = dir.path().join("composer.json");
        let err = ScaffoldOptions::from_manifest_file(&missing, constants::DEFAULT_EXTRA_KEY)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            pscaf_errors::Error::Config(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_merge_env() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PSCAF_COLOR", "always"),
            ("PSCAF_STRICT", "yes"),
            ("PSCAF_PATCHES_DIR", "/tmp/patches"),
            ("PSCAF_NETWORK_RETRIES", "0"),
        ]);

        let mut config = Config::default();
        config
            .merge_env_from(|name| vars.get(name).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.general.color, ColorChoice::Always);
        assert!(config.general.strict);
        assert_eq!(config.patches_dir(), PathBuf::from("/tmp/patches"));
        assert_eq!(config.network.retries, 0);
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = Config::default();
        let result = config.merge_env_from(|name| {
            (name == "PSCAF_VERBOSE").then(|| "sometimes".to_string())
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_manifest_file() {
        let mut manifest = NamedTempFile::new().unwrap();
        write!(
            manifest,
            r#"{{
                "name": "org/site",
                "extra": {{
                    "custom-key": {{
                        "artifact": {{"url": "https://example.org/platform-{{version}}.tar.gz"}},
                        "version": "2.5.1",
                        "directories": {{"build": "build"}}
                    }}
                }}
            }}"#
        )
        .unwrap();

        let options = ScaffoldOptions::from_manifest_file(manifest.path(), "custom-key")
            .await
            .unwrap();
        assert_eq!(
            options.artifact.url,
            "https://example.org/platform-{version}.tar.gz"
        );
        assert!(options.has_version_placeholder());
        assert!(options.patches.is_none());

        assert!(
            ScaffoldOptions::from_manifest_file(manifest.path(), constants::DEFAULT_EXTRA_KEY)
                .await
                .is_err()
        );
    }
}
