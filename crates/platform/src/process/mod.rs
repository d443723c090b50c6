//! Process execution operations

use async_trait::async_trait;
use pscaf_errors::Error;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use crate::core::PlatformContext;

/// Typed command: a program and an ordered argument list, never a shell string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformCommand {
    program: String,
    args: Vec<String>,
}

impl PlatformCommand {
    /// Create a new platform command
    #[must_use]
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    /// Add an argument to the command
    #[must_use]
    pub fn arg<S: AsRef<str>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Add a path argument, converted lossily to UTF-8
    #[must_use]
    pub fn path_arg(self, path: &Path) -> Self {
        let arg = path.to_string_lossy().into_owned();
        self.arg(arg)
    }

    /// Add multiple arguments to the command
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_string()));
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }
}

/// Output from command execution
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Whether the process exited with status zero
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }

    #[must_use]
    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    #[must_use]
    pub fn stderr_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

/// Trait for process execution operations
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Execute a command to completion and return its captured output
    ///
    /// A non-zero exit status is not an error; callers inspect
    /// [`CommandOutput::success`].
    async fn execute(&self, ctx: &PlatformContext, cmd: PlatformCommand)
        -> Result<CommandOutput, Error>;

    /// Find the path to an executable
    async fn which(&self, program: &str) -> Result<PathBuf, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_argument_order() {
        let cmd = PlatformCommand::new("git")
            .arg("-C")
            .path_arg(Path::new("/srv/site/build"))
            .args(["apply", "--check", "-v"])
            .arg("fix menu.patch");

        assert_eq!(cmd.program(), "git");
        assert_eq!(
            cmd.get_args(),
            ["-C", "/srv/site/build", "apply", "--check", "-v", "fix menu.patch"]
        );
    }
}
