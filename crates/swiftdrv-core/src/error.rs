//! The stable, diagnostic-bearing error kinds that abort construction.
//!
//! Everything else (warnings, remarks, notes) routes through a
//! [`swiftdrv_common::DiagnosticSink`] and planning continues; only these
//! variants stop the pipeline.

use swiftdrv_options::OptionsError;
use swiftdrv_toolchain::ToolchainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("invalid driver name '{name}'")]
    InvalidDriverName { name: String },

    #[error("no input files")]
    NoInputFiles,

    #[error("invalid argument value for {option}: {value}")]
    InvalidArgumentValue { option: String, value: String },

    #[error("relative frontend path is not allowed: {0}")]
    RelativeFrontendPath(String),

    #[error("subcommand passed to driver: {0}")]
    SubcommandPassedToDriver(String),

    #[error("the integrated REPL has been removed; use `-repl` instead")]
    IntegratedReplRemoved,

    #[error("conflicting options: {a} and {b}")]
    ConflictingOptions { a: String, b: String },

    #[error("unable to load output file map at {path}: {detail}")]
    UnableToLoadOutputFileMap { path: String, detail: String },

    #[error("missing profiling data: {0}")]
    MissingProfilingData(String),

    #[error("conditional compilation flag has a redundant -D prefix: {0}")]
    ConditionalCompilationFlagHasRedundantPrefix(String),

    #[error("conditional compilation flag is not a valid identifier: {0}")]
    ConditionalCompilationFlagIsNotValidIdentifier(String),

    #[error("the -i flag has been removed")]
    ObsoleteIFlag,

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
}
