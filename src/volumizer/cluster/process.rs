use crate::error::{Result, VolumizerError};
use std::process::Command;
use tracing::debug;

/// Captured result of an external command that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandOutput {
    pub command_line: String,
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Trimmed stdout and stderr joined, for matching and error messages.
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (false, false) => format!("{}\n{}", stdout, stderr),
            (false, true) => stdout.to_string(),
            (true, false) => stderr.to_string(),
            (true, true) => String::new(),
        }
    }

    pub fn into_error(self) -> VolumizerError {
        let mut message = self.combined();
        if message.is_empty() {
            message = match self.code {
                Some(code) => format!("exit code {}", code),
                None => "terminated by signal".to_string(),
            };
        }
        VolumizerError::remote(self.command_line, message)
    }

    /// Stdout on success, a `RemoteCall` error otherwise.
    pub fn into_stdout(self) -> Result<String> {
        if self.success {
            Ok(self.stdout)
        } else {
            Err(self.into_error())
        }
    }
}

/// Runs `program args..` to completion. Only a failure to spawn is an `Err`.
pub(crate) fn run(program: &str, args: &[String]) -> Result<CommandOutput> {
    let command_line = std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    debug!(command = %command_line, "Running subprocess");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| VolumizerError::remote(&command_line, format!("failed to spawn: {}", e)))?;

    let result = CommandOutput {
        command_line,
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !result.success {
        debug!(
            command = %result.command_line,
            code = ?result.code,
            output = %result.combined(),
            "Subprocess returned a non-zero exit code"
        );
    }

    Ok(result)
}
