//! Integration tests for pscaf CLI

use std::path::Path;
use std::process::Command;

fn pscaf(dir: &Path) -> Command {
    let config = dir.join("config.toml");
    if !config.exists() {
        std::fs::write(&config, "").expect("write config");
    }
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pscaf"));
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("PSCAF_PATCHES_DIR")
        .env_remove("PSCAF_MANIFEST")
        .env_remove("PSCAF_EXTRA_KEY")
        .arg("--config")
        .arg(&config);
    cmd
}

fn write_manifest(dir: &Path, url: &str, build: &str) {
    let manifest = format!(
        r#"{{
            "name": "acme/site",
            "extra": {{
                "ne-platform-scaffold": {{
                    "artifact": {{ "url": "{url}" }},
                    "version": "3.2.1",
                    "directories": {{ "build": "{build}" }},
                    "patches": []
                }}
            }}
        }}"#
    );
    std::fs::write(dir.join("composer.json"), manifest).expect("write manifest");
}

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_pscaf"))
        .arg("--version")
        .output()
        .expect("Failed to execute pscaf");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pscaf"));
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_pscaf"))
        .arg("--help")
        .output()
        .expect("Failed to execute pscaf");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Scaffold a platform build"));
    assert!(stdout.contains("scaffold"));
    assert!(stdout.contains("uri"));
}

#[test]
fn test_cli_invalid_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_pscaf"))
        .arg("invalid-command")
        .output()
        .expect("Failed to execute pscaf");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn test_uri_substitutes_version() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(
        dir.path(),
        "https://example.com/releases/{version}/platform-{version}.tar.gz",
        "build",
    );

    let output = pscaf(dir.path())
        .arg("uri")
        .output()
        .expect("Failed to execute pscaf");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        "https://example.com/releases/3.2.1/platform-3.2.1.tar.gz"
    );
}

#[test]
fn test_uri_version_override_and_json() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(
        dir.path(),
        "https://example.com/platform-{version}.tar.gz",
        "build",
    );

    let output = pscaf(dir.path())
        .args(["--json", "uri", "--version", "4.0.0"])
        .output()
        .expect("Failed to execute pscaf");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json["artifact_url"],
        "https://example.com/platform-4.0.0.tar.gz"
    );
}

#[test]
fn test_missing_manifest_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = pscaf(dir.path())
        .arg("uri")
        .output()
        .expect("Failed to execute pscaf");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_escaping_build_dir_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(
        dir.path(),
        "https://example.com/platform-{version}.tar.gz",
        "../outside",
    );

    let output = pscaf(dir.path())
        .arg("scaffold")
        .output()
        .expect("Failed to execute pscaf");

    assert!(!output.status.success());
    assert!(!dir.path().join("artifact.tar.gz").exists());
}
