//! A thin wrapper over `std::process::Command` so every toolchain-tool
//! invocation gets the same error decoration and is swappable in tests.

use crate::error::ToolchainError;
use std::path::Path;
use std::process::Command;

/// The captured result of running an external tool to completion.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Abstraction over spawning a tool and waiting for it, so the target-info
/// sub-invocation (and any other toolchain tool call) can be driven by a
/// fake in tests instead of a real subprocess.
pub trait ProcessRunner {
    fn run(&self, command: &Path, args: &[String]) -> Result<ProcessOutput, ToolchainError>;
}

/// Spawns the real subprocess via `std::process::Command`.
pub struct RealProcessRunner;

impl ProcessRunner for RealProcessRunner {
    fn run(&self, command: &Path, args: &[String]) -> Result<ProcessOutput, ToolchainError> {
        tracing::debug!(command = %command.display(), ?args, "invoking toolchain tool");
        let output = Command::new(command)
            .args(args)
            .output()
            .map_err(|source| ToolchainError::Spawn {
                command: command.display().to_string(),
                source,
            })?;
        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(any(test, feature = "test-util"))]
pub struct FakeProcessRunner {
    pub output: Result<ProcessOutput, String>,
}

#[cfg(any(test, feature = "test-util"))]
impl ProcessRunner for FakeProcessRunner {
    fn run(&self, _command: &Path, _args: &[String]) -> Result<ProcessOutput, ToolchainError> {
        match &self.output {
            Ok(out) => Ok(out.clone()),
            Err(msg) => Err(ToolchainError::FailedToRunFrontend {
                code: Some(1),
                stderr: msg.clone(),
            }),
        }
    }
}
