// Shell command execution primitive

use crate::error::{Result, ValetError};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Captured result of a finished shell command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Text handed to error handlers: stderr, or stdout when stderr is empty
    pub fn error_text(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// Runs shell command lines on the host.
///
/// Implementors only provide `execute`; the convenience wrappers used by the
/// distro strategies are built on top of it.
pub trait CommandLine: Send + Sync {
    /// Run a command line to completion and capture its output.
    ///
    /// Returns `Err` only when the process could not be started. A non-zero
    /// exit status is reported through `CommandOutput::success`.
    fn execute(&self, command: &str) -> Result<CommandOutput>;

    /// Run a command and return its stdout, whatever the exit status
    fn run(&self, command: &str) -> Result<String> {
        Ok(self.execute(command)?.stdout)
    }

    /// Run a command; on a non-zero exit hand the error text to `on_error`
    /// and abort with the error it returns.
    fn run_or_else(
        &self,
        command: &str,
        on_error: &dyn Fn(&str) -> ValetError,
    ) -> Result<String> {
        let output = self.execute(command)?;

        if !output.success {
            return Err(on_error(output.error_text()));
        }

        Ok(output.stdout)
    }

    /// Run a command, discarding output and never failing
    fn quietly(&self, command: &str) {
        match self.execute(command) {
            Ok(output) if !output.success => {
                warn!(command, stderr = %output.stderr.trim(), "Quiet command failed");
            }
            Ok(_) => {}
            Err(e) => warn!(command, error = %e, "Quiet command could not start"),
        }
    }
}

/// `CommandLine` backed by `sh -c`
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellCommandLine;

impl CommandLine for ShellCommandLine {
    fn execute(&self, command: &str) -> Result<CommandOutput> {
        debug!(command, "Executing shell command");

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ValetError::Command {
                command: command.to_string(),
                message: e.to_string(),
            })?;

        let result = CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        debug!(success = result.success, exit_code = ?output.status.code(), "Shell command finished");

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_echo() {
        let output = ShellCommandLine.run("echo hello world").unwrap();
        assert_eq!(output.trim(), "hello world");
    }

    #[test]
    fn test_run_supports_pipelines() {
        let output = ShellCommandLine.run("printf 'a b\\nc d\\n' | cut -d ' ' -f 2").unwrap();
        assert_eq!(output, "b\nd\n");
    }

    #[test]
    fn test_run_returns_output_on_failure() {
        let output = ShellCommandLine.run("echo partial; exit 3").unwrap();
        assert_eq!(output.trim(), "partial");
    }

    #[test]
    fn test_run_or_else_invokes_handler_with_stderr() {
        let result = ShellCommandLine.run_or_else("echo broken >&2; exit 1", &|text| {
            ValetError::installation("thing", text)
        });

        match result {
            Err(ValetError::Installation { package, output }) => {
                assert_eq!(package, "thing");
                assert_eq!(output.trim(), "broken");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_run_or_else_passes_through_on_success() {
        let output = ShellCommandLine
            .run_or_else("echo fine", &|_| ValetError::configuration("unreachable"))
            .unwrap();
        assert_eq!(output.trim(), "fine");
    }

    #[test]
    fn test_quietly_swallows_failure() {
        ShellCommandLine.quietly("exit 1");
        ShellCommandLine.quietly("nonexistent_command_12345");
    }

    #[test]
    fn test_error_text_prefers_stderr() {
        let output = CommandOutput {
            success: false,
            stdout: "out".to_string(),
            stderr: "err".to_string(),
        };
        assert_eq!(output.error_text(), "err");
        assert_eq!(CommandOutput::failed("").error_text(), "");
        assert_eq!(
            CommandOutput {
                success: false,
                stdout: "only stdout".to_string(),
                stderr: "  ".to_string(),
            }
            .error_text(),
            "only stdout"
        );
    }
}
