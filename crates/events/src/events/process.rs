use serde::{Deserialize, Serialize};

/// Which pipe a line of child output came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// External process events, only emitted in verbose mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessEvent {
    /// Echo of the command about to run
    Started {
        program: String,
        args: Vec<String>,
    },

    /// One line of child output
    Output { stream: OutputStream, line: String },

    Completed {
        program: String,
        exit_code: Option<i32>,
        duration_ms: u64,
    },
}

impl ProcessEvent {
    /// Render the command line the way a shell user would type it
    #[must_use]
    pub fn command_line(program: &str, args: &[String]) -> String {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                line.push('\'');
                line.push_str(&arg.replace('\'', "'\\''"));
                line.push('\'');
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}
