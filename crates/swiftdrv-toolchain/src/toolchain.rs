//! Toolchain capability dispatch.
//!
//! A `Toolchain` is selected once, by target-triple OS family, and is
//! queried by the validators and the target-info acquisition step. There
//! is no inheritance: each variant is a plain struct implementing the same
//! trait, selected by a tagged match in [`select_toolchain`].

use crate::error::ToolchainError;
use crate::process::{ProcessOutput, ProcessRunner};
use crate::target_info::FrontendTargetInfo;
use crate::triple::{OsFamily, Triple};
use std::path::{Path, PathBuf};

/// What to ask the frontend's `-print-target-info` job for.
#[derive(Debug, Clone, Default)]
pub struct TargetInfoRequest {
    pub target: Option<String>,
    pub target_variant: Option<String>,
    pub sdk: Option<String>,
    pub resource_dir: Option<String>,
    pub runtime_compatibility_version: Option<String>,
    pub use_static_resource_dir: bool,
}

/// The capability set every toolchain variant implements. No method here
/// depends on which variant it's called on from the caller's point of
/// view; the differences (default SDK, supported sanitizers, tool lookup)
/// live entirely inside each impl.
pub trait Toolchain: Send + Sync {
    fn family(&self) -> OsFamily;

    /// Build the argument vector for a `-print-target-info` frontend job,
    /// given whatever prefix args `-driver-use-frontend-path` supplied.
    fn print_target_info_args(&self, prefix_args: &[String], request: &TargetInfoRequest) -> Vec<String> {
        let mut args = prefix_args.to_vec();
        args.push("-frontend".to_string());
        args.push("-print-target-info".to_string());
        if let Some(t) = &request.target {
            args.push("-target".to_string());
            args.push(t.clone());
        }
        if let Some(v) = &request.target_variant {
            args.push("-target-variant".to_string());
            args.push(v.clone());
        }
        if let Some(sdk) = &request.sdk {
            args.push("-sdk".to_string());
            args.push(sdk.clone());
        }
        if let Some(dir) = &request.resource_dir {
            args.push("-resource-dir".to_string());
            args.push(dir.clone());
        }
        if let Some(v) = &request.runtime_compatibility_version {
            args.push("-runtime-compatibility-version".to_string());
            args.push(v.clone());
        }
        if request.use_static_resource_dir {
            args.push("-use-static-resource-dir".to_string());
        }
        args
    }

    /// Whether this toolchain ships a runtime library for the given
    /// sanitizer kind (`"address"`, `"thread"`, `"undefined"`, `"scudo"`, …).
    fn runtime_library_exists(&self, sanitizer_kind: &str) -> bool;

    /// The SDK path to fall back to when neither `-sdk` nor `SDKROOT` is
    /// set. Only consulted by the core in `immediate`/`repl` mode.
    fn default_sdk_path(&self) -> Option<PathBuf>;

    /// Resolve the path to a named helper tool (e.g. `"clang"`, `"ld"`),
    /// honoring a `-tools-directory` override when `tools_directory` is set.
    fn tool_path(&self, name: &str, tools_directory: Option<&Path>) -> PathBuf {
        match tools_directory {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}

pub struct DarwinToolchain;
pub struct GenericUnixToolchain;
pub struct WebAssemblyToolchain;

impl Toolchain for DarwinToolchain {
    fn family(&self) -> OsFamily {
        OsFamily::Darwin
    }

    fn runtime_library_exists(&self, sanitizer_kind: &str) -> bool {
        matches!(sanitizer_kind, "address" | "thread" | "undefined")
    }

    fn default_sdk_path(&self) -> Option<PathBuf> {
        Some(PathBuf::from("/Applications/Xcode.app/Contents/Developer/Platforms/MacOSX.platform/Developer/SDKs/MacOSX.sdk"))
    }
}

impl Toolchain for GenericUnixToolchain {
    fn family(&self) -> OsFamily {
        OsFamily::GenericUnix
    }

    fn runtime_library_exists(&self, sanitizer_kind: &str) -> bool {
        matches!(sanitizer_kind, "address" | "thread" | "undefined" | "scudo" | "leak")
    }

    fn default_sdk_path(&self) -> Option<PathBuf> {
        None
    }
}

impl Toolchain for WebAssemblyToolchain {
    fn family(&self) -> OsFamily {
        OsFamily::WebAssembly
    }

    fn runtime_library_exists(&self, _sanitizer_kind: &str) -> bool {
        false
    }

    fn default_sdk_path(&self) -> Option<PathBuf> {
        None
    }
}

/// Select a toolchain variant by the target triple's OS family. The
/// Windows toolchain is referenced by the spec but not implemented here;
/// rather than guess at its behavior, selecting it is a hard error.
pub fn select_toolchain(triple: &Triple) -> Result<Box<dyn Toolchain>, ToolchainError> {
    match triple.os_family() {
        Some(OsFamily::Darwin) => Ok(Box::new(DarwinToolchain)),
        Some(OsFamily::GenericUnix) => Ok(Box::new(GenericUnixToolchain)),
        Some(OsFamily::WebAssembly) => Ok(Box::new(WebAssemblyToolchain)),
        Some(OsFamily::Windows) => Err(ToolchainError::WindowsUnsupported),
        None => Err(ToolchainError::UnknownTriple(triple.as_str().to_string())),
    }
}

/// Run the frontend's `-print-target-info` job through `runner` and decode
/// its stdout, mapping every failure mode in §4.6 to its own error variant.
pub fn acquire_target_info(
    toolchain: &dyn Toolchain,
    frontend_path: &Path,
    prefix_args: &[String],
    request: &TargetInfoRequest,
    runner: &dyn ProcessRunner,
) -> Result<FrontendTargetInfo, ToolchainError> {
    let args = toolchain.print_target_info_args(prefix_args, request);
    let output: ProcessOutput = runner.run(frontend_path, &args)?;

    if !output.success {
        return Err(ToolchainError::FailedToRunFrontend {
            code: output.code,
            stderr: output.stderr,
        });
    }
    if output.stdout.trim().is_empty() {
        return Err(ToolchainError::UnableToReadTargetInfo);
    }
    FrontendTargetInfo::decode(&output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::FakeProcessRunner;

    #[test]
    fn select_toolchain_maps_darwin() {
        let t = Triple::parse("arm64-apple-macosx13.0").unwrap();
        let tc = select_toolchain(&t).unwrap();
        assert_eq!(tc.family(), OsFamily::Darwin);
    }

    #[test]
    fn select_toolchain_rejects_windows() {
        let t = Triple::parse("x86_64-pc-windows-msvc").unwrap();
        assert!(matches!(
            select_toolchain(&t),
            Err(ToolchainError::WindowsUnsupported)
        ));
    }

    #[test]
    fn select_toolchain_rejects_unknown_os() {
        let t = Triple::parse("x86_64-unknown-plan9").unwrap();
        assert!(matches!(select_toolchain(&t), Err(ToolchainError::UnknownTriple(_))));
    }

    #[test]
    fn acquire_target_info_decodes_on_success() {
        let runner = FakeProcessRunner {
            output: Ok(ProcessOutput {
                success: true,
                code: Some(0),
                stdout: r#"{"target":{"triple":"x86_64-unknown-linux-gnu"},"compilerVersion":"1.0"}"#
                    .to_string(),
                stderr: String::new(),
            }),
        };
        let tc = GenericUnixToolchain;
        let info = acquire_target_info(
            &tc,
            Path::new("swift-frontend"),
            &[],
            &TargetInfoRequest::default(),
            &runner,
        )
        .unwrap();
        assert_eq!(info.target.triple, "x86_64-unknown-linux-gnu");
    }

    #[test]
    fn acquire_target_info_reports_nonzero_exit() {
        let runner = FakeProcessRunner {
            output: Ok(ProcessOutput {
                success: false,
                code: Some(1),
                stdout: String::new(),
                stderr: "boom".to_string(),
            }),
        };
        let tc = GenericUnixToolchain;
        let err = acquire_target_info(
            &tc,
            Path::new("swift-frontend"),
            &[],
            &TargetInfoRequest::default(),
            &runner,
        )
        .unwrap_err();
        assert!(matches!(err, ToolchainError::FailedToRunFrontend { code: Some(1), .. }));
    }

    #[test]
    fn acquire_target_info_reports_empty_output() {
        let runner = FakeProcessRunner {
            output: Ok(ProcessOutput {
                success: true,
                code: Some(0),
                stdout: "   ".to_string(),
                stderr: String::new(),
            }),
        };
        let tc = GenericUnixToolchain;
        let err = acquire_target_info(
            &tc,
            Path::new("swift-frontend"),
            &[],
            &TargetInfoRequest::default(),
            &runner,
        )
        .unwrap_err();
        assert!(matches!(err, ToolchainError::UnableToReadTargetInfo));
    }
}
