//! Target-triple classification, toolchain capability dispatch, and
//! frontend target-info acquisition.

mod error;
mod process;
mod target_info;
mod toolchain;
mod triple;

pub use error::ToolchainError;
pub use process::{ProcessOutput, ProcessRunner, RealProcessRunner};
#[cfg(any(test, feature = "test-util"))]
pub use process::FakeProcessRunner;
pub use target_info::{FrontendTargetInfo, TripleInfo};
pub use toolchain::{
    acquire_target_info, select_toolchain, DarwinToolchain, GenericUnixToolchain, TargetInfoRequest,
    Toolchain, WebAssemblyToolchain,
};
pub use triple::{OsFamily, Triple};
