//! Shared value types for the swiftdrv compiler driver.
//!
//! Nothing in this crate touches options parsing or planning; it holds the
//! vocabulary (`VirtualPath`, `FileType`, diagnostics, the environment
//! handle) that every other crate in the workspace builds on.

mod diagnostic;
mod environment;
mod virtual_path;

pub use diagnostic::{CollectingDiagnosticSink, ConsoleDiagnosticSink, Diagnostic, DiagnosticSink, Severity};
pub use environment::Environment;
pub use virtual_path::{EncodedVirtualPath, FileType, TypedVirtualPath, VirtualPath};
