//! pscaf - scaffold a platform build from a release artifact and patches
//!
//! This is the CLI front end. It merges configuration, reads the scaffold
//! options from the manifest and drives a run of the scaffold crate while
//! rendering its events.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands, ManifestArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use pscaf_config::constants::VERSION_PLACEHOLDER;
use pscaf_config::{Config, ScaffoldOptions};
use pscaf_events::{AppEvent, EventEmitter, EventMessage, EventReceiver, GeneralEvent};
use pscaf_net::{NetClient, NetConfig};
use pscaf_platform::TokioProcessRunner;
use pscaf_scaffold::{NetFetcher, ScaffoldContext, ScaffoldPaths, ScaffoldReport, Scaffolder};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    // Run the application and handle errors
    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global, &cli.command);

    // Tracing needs the log directory, so it starts after the config is known
    init_tracing(cli.global.json, cli.global.debug, &config.log_dir());
    info!("Starting pscaf v{}", env!("CARGO_PKG_VERSION"));

    let renderer = OutputRenderer::new(cli.global.json, config.general.color);
    let mut event_handler =
        EventHandler::new(config.general.color, cli.global.json, cli.global.debug);

    match cli.command {
        Commands::Uri { manifest, version } => {
            let (_, options) = load_options(&config, &manifest, version, None).await?;
            if !options.has_version_placeholder() {
                event_handler.handle_event(EventMessage::from_event(placeholder_warning(&options)));
            }
            renderer.render_uri(&pscaf_scaffold::artifact_uri(&options))?;
        }

        Commands::Scaffold {
            manifest,
            version,
            build_dir,
            ..
        } => {
            let (manifest_path, options) =
                load_options(&config, &manifest, version, build_dir).await?;
            let paths =
                ScaffoldPaths::from_manifest_path(&manifest_path, &options, config.patches_dir());

            let (event_sender, event_receiver) = pscaf_events::channel();
            if !options.has_version_placeholder() {
                event_sender.emit(placeholder_warning(&options));
            }

            let client = NetClient::new(NetConfig::from(&config.network))?;
            let ctx = ScaffoldContext::new(
                event_sender,
                Arc::new(NetFetcher::new(client)),
                Arc::new(TokioProcessRunner::new()),
            )
            .with_tools(config.tools.clone())
            .with_verbose(config.general.verbose);
            info!(run_id = %ctx.run_id, build_dir = %paths.build_dir.display(), "scaffolding");

            let scaffolder = Scaffolder::new(options, paths, ctx);
            let report =
                execute_with_events(scaffolder.run(), event_receiver, &mut event_handler).await?;

            renderer.render_report(&report)?;
            check_strict(&report, config.general.strict)?;
        }
    }

    info!("Command completed successfully");
    Ok(())
}

/// Drive a run while rendering its events as they arrive
async fn execute_with_events<F>(
    run: F,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<ScaffoldReport, CliError>
where
    F: Future<Output = Result<ScaffoldReport, pscaf_errors::Error>>,
{
    let mut run = Box::pin(run);

    loop {
        select! {
            // Run completed
            result = &mut run => {
                // Drain any remaining events
                while let Ok(message) = event_receiver.try_recv() {
                    event_handler.handle_event(message);
                }
                return result.map_err(CliError::from);
            }

            // Event received
            message = event_receiver.recv() => {
                if let Some(message) = message {
                    event_handler.handle_event(message);
                } else {
                    // Every sender is gone; nothing left to render
                    return run.await.map_err(CliError::from);
                }
            }
        }
    }
}

/// Read the scaffold options named by the manifest arguments
async fn load_options(
    config: &Config,
    args: &ManifestArgs,
    version: Option<String>,
    build_dir: Option<PathBuf>,
) -> Result<(PathBuf, ScaffoldOptions), CliError> {
    let manifest_path = args
        .manifest
        .clone()
        .unwrap_or_else(|| config.manifest.path.clone());
    let extra_key = args
        .extra_key
        .as_deref()
        .unwrap_or(&config.manifest.extra_key);

    let options = ScaffoldOptions::from_manifest_file(&manifest_path, extra_key)
        .await?
        .with_overrides(version, build_dir)?;
    Ok((manifest_path, options))
}

fn placeholder_warning(options: &ScaffoldOptions) -> AppEvent {
    AppEvent::General(GeneralEvent::warning_with_context(
        format!("artifact URL has no {VERSION_PLACEHOLDER} placeholder"),
        options.artifact.url.clone(),
    ))
}

/// Fail the command when patches failed and strict mode is on
fn check_strict(report: &ScaffoldReport, strict: bool) -> Result<(), CliError> {
    if strict && report.has_failures() {
        return Err(CliError::PatchesFailed(report.failed_count()));
    }
    Ok(())
}

/// Apply CLI configuration overrides
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs, command: &Commands) {
    // Global CLI flags override everything
    if let Some(color) = &global.color {
        config.general.color = *color;
    }
    if global.verbose {
        config.general.verbose = true;
    }

    // Command-specific CLI flags
    if let Commands::Scaffold {
        patches_dir,
        strict,
        ..
    } = command
    {
        if let Some(dir) = patches_dir {
            config.paths.patches_dir = Some(dir.clone());
        }
        if *strict {
            config.general.strict = true;
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool, log_dir: &Path) {
    // Check if debug logging is enabled
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if json_mode {
        // JSON mode: suppress all console output to avoid contaminating JSON
        if debug_enabled {
            // In debug mode with JSON, still log to file
            if std::fs::create_dir_all(log_dir).is_ok() {
                if let Ok(file) = std::fs::File::create(log_file_path(log_dir)) {
                    tracing_subscriber::fmt()
                        .json()
                        .with_writer(file)
                        .with_env_filter(
                            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                                |_| tracing_subscriber::EnvFilter::new("info,pscaf=debug"),
                            ),
                        )
                        .init();
                    return;
                }
            }
        }
        // Fallback: disable all logging in JSON mode
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        // Debug mode: structured JSON logs to file
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!("Warning: Failed to create log directory: {e}");
        }

        let log_file = log_file_path(log_dir);
        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| tracing_subscriber::EnvFilter::new("info,pscaf=debug"),
                        ),
                    )
                    .init();

                eprintln!("Debug logging enabled: {}", log_file.display());
            }
            Err(e) => {
                eprintln!("Warning: Failed to create log file: {e}");
                // Fallback to stderr
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                    )
                    .init();
            }
        }
    } else {
        // Normal mode: minimal logging to stderr. The CLI prints events and
        // the final error itself, so its own records are dropped here.
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,pscaf=off")
                }),
            )
            .init();
    }
}

fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!(
        "pscaf-{}.log",
        chrono::Utc::now().format("%Y%m%d-%H%M%S")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pscaf_config::ColorChoice;
    use pscaf_events::PatchOrigin;
    use pscaf_scaffold::{PatchOutcome, PatchReport};

    fn report_with(outcomes: Vec<PatchOutcome>) -> ScaffoldReport {
        ScaffoldReport {
            artifact_url: "https://example.com/platform-1.0.0.tar.gz".to_string(),
            build_dir: PathBuf::from("build"),
            patches: outcomes
                .into_iter()
                .enumerate()
                .map(|(i, outcome)| PatchReport {
                    file_name: format!("{i}.patch"),
                    origin: PatchOrigin::Local {
                        source: PathBuf::from(format!("patches/{i}.patch")),
                    },
                    outcome,
                })
                .collect(),
            cleaned: 0,
            duration_ms: 1,
        }
    }

    #[test]
    fn test_strict_mode_fails_on_patch_failures() {
        let report = report_with(vec![
            PatchOutcome::Applied,
            PatchOutcome::CheckFailed {
                diagnostics: "error: corrupt patch".to_string(),
            },
        ]);

        assert!(check_strict(&report, false).is_ok());
        assert!(matches!(
            check_strict(&report, true),
            Err(CliError::PatchesFailed(1))
        ));
        assert!(check_strict(&report_with(vec![PatchOutcome::Applied]), true).is_ok());
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "pscaf",
            "--color",
            "never",
            "-v",
            "scaffold",
            "--patches-dir",
            "/opt/patches",
            "--strict",
        ]);
        let mut config = Config::default();
        apply_cli_config(&mut config, &cli.global, &cli.command);

        assert_eq!(config.general.color, ColorChoice::Never);
        assert!(config.general.verbose);
        assert!(config.general.strict);
        assert_eq!(config.patches_dir(), PathBuf::from("/opt/patches"));
    }

    #[tokio::test]
    async fn test_events_sent_before_completion_are_rendered() {
        let (tx, rx) = pscaf_events::channel();
        let (mut handler, out, _) = crate::events::tests::handler(false, true);

        tx.emit_debug("first");
        let run = async move {
            tx.emit_debug("second");
            Ok::<_, pscaf_errors::Error>(report_with(Vec::new()))
        };

        let report = execute_with_events(run, rx, &mut handler).await;
        assert!(report.is_ok());
        assert_eq!(out.contents(), "[debug] first\n[debug] second\n");
    }
}
