//! Errors raised by toolchain selection and frontend sub-invocation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolchainError {
    #[error("unknown or unsupported target triple '{0}'")]
    UnknownTriple(String),

    #[error("the Windows toolchain is not implemented")]
    WindowsUnsupported,

    #[error("failed to spawn frontend '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("frontend exited with status {code:?} while retrieving target info: {stderr}")]
    FailedToRunFrontend { code: Option<i32>, stderr: String },

    #[error("unable to read frontend target info output")]
    UnableToReadTargetInfo,

    #[error("unable to decode frontend target info: {detail} (raw output: {raw_output})")]
    UnableToDecodeTargetInfo { raw_output: String, detail: String },
}
