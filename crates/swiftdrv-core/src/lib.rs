//! The invocation-to-plan pipeline: mode resolution, module and
//! supplementary-output planning, argument validation, and the run
//! dispatcher that turns a planned job list into print output or an
//! executed (or submitted) workload.
//!
//! Job *construction* itself, the real job graph scheduler, and the
//! incremental-compilation state engine are out of scope; this crate
//! defines the `DriverExecutor` seam they would plug into and a minimal
//! reference implementation sufficient to exercise every dispatcher
//! branch end to end.

mod dispatcher;
mod driver;
mod error;
mod executor;
mod inputs;
mod invocation;
mod job;
mod mode_resolver;
mod module_info;
mod mtime;
mod output_file_map;
mod supplementary_outputs;
mod types;
mod validators;

pub use dispatcher::{dispatch, BuildRecord, DispatchOutcome, JobRecord};
pub use driver::Driver;
pub use error::DriverError;
pub use executor::{DriverExecutor, InPlaceExecutor, JobResult, Workload};
pub use inputs::collect_inputs;
pub use invocation::{classify_invocation, InvocationMode};
pub use job::{Job, JobKind};
pub use mode_resolver::{resolve_compiler_mode, resolve_driver_kind};
pub use module_info::plan_module_info;
pub use mtime::{snapshot, RecordedInputModificationDates};
pub use output_file_map::OutputFileMap;
pub use supplementary_outputs::{
    plan_bridging_pch, place_adjacent_to_module, plan_supplementary_outputs, resolve_primary_output, PrimaryOutputInfo,
    SupplementaryOutputPaths,
};
pub use types::{
    BatchModeInfo, CompilerMode, DebugInfo, DebugInfoFormat, DebugInfoLevel, DriverKind, LinkOutputType,
    ModuleOutputInfo, ModuleOutputKind,
};
pub use validators::{validate, ValidatedOptions};
