//! Process operations on top of `tokio::process`
//!
//! Both pipes are drained concurrently with the wait so that a chatty child
//! (tar in verbose mode lists every extracted file) never blocks on a full
//! pipe.

use async_trait::async_trait;
use pscaf_errors::{Error, PlatformError};
use pscaf_events::{AppEvent, EventEmitter, OutputStream, ProcessEvent};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use crate::core::PlatformContext;
use crate::process::{CommandOutput, PlatformCommand, ProcessRunner};

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn spawn_error(program: &str, error: &std::io::Error) -> PlatformError {
    if error.kind() == std::io::ErrorKind::NotFound {
        PlatformError::CommandNotFound {
            command: program.to_string(),
        }
    } else {
        PlatformError::ProcessExecutionFailed {
            command: program.to_string(),
            message: error.to_string(),
        }
    }
}

/// Collect a pipe, emitting each line when the context is verbose
async fn drain<R>(ctx: &PlatformContext, pipe: R, stream: OutputStream) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(pipe);
    let mut captured = Vec::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        if ctx.verbose() {
            let text = String::from_utf8_lossy(&line);
            ctx.emit(AppEvent::Process(ProcessEvent::Output {
                stream,
                line: text.trim_end_matches(['\r', '\n']).to_string(),
            }));
        }
        captured.extend_from_slice(&line);
    }

    Ok(captured)
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn execute(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, Error> {
        let start = Instant::now();
        let program = cmd.program().to_string();

        if ctx.verbose() {
            ctx.emit(AppEvent::Process(ProcessEvent::Started {
                program: program.clone(),
                args: cmd.get_args().to_vec(),
            }));
        }
        tracing::debug!(
            command = %ProcessEvent::command_line(&program, cmd.get_args()),
            "executing command"
        );

        let mut command = Command::new(&program);
        command
            .args(cmd.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| spawn_error(&program, &e))?;

        let missing_pipe = || PlatformError::ProcessExecutionFailed {
            command: program.clone(),
            message: "child output was not captured".to_string(),
        };
        let stdout = child.stdout.take().ok_or_else(missing_pipe)?;
        let stderr = child.stderr.take().ok_or_else(missing_pipe)?;

        let (stdout, stderr, status) = tokio::join!(
            drain(ctx, stdout, OutputStream::Stdout),
            drain(ctx, stderr, OutputStream::Stderr),
            child.wait(),
        );

        let io_failure = |e: std::io::Error| PlatformError::ProcessExecutionFailed {
            command: program.clone(),
            message: e.to_string(),
        };
        let output = CommandOutput {
            status: status.map_err(io_failure)?,
            stdout: stdout.map_err(io_failure)?,
            stderr: stderr.map_err(io_failure)?,
        };

        if ctx.verbose() {
            ctx.emit(AppEvent::Process(ProcessEvent::Completed {
                program,
                exit_code: output.status.code(),
                duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            }));
        }

        Ok(output)
    }

    async fn which(&self, program: &str) -> Result<PathBuf, Error> {
        which::which(program).map_err(|_| {
            PlatformError::CommandNotFound {
                command: program.to_string(),
            }
            .into()
        })
    }
}
