//! A minimal, runnable stand-in for the real job planner (out of scope):
//! just enough shape for the dispatcher to exercise every branch.

use swiftdrv_common::TypedVirtualPath;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobKind {
    Compile,
    Link,
    MergeModule,
    ModuleWrap,
    GenerateDsym,
    VersionRequest,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub kind: JobKind,
    pub tool: String,
    pub inputs: Vec<TypedVirtualPath>,
    pub outputs: Vec<TypedVirtualPath>,
    pub arguments: Vec<String>,
}

impl Job {
    pub fn rendered_command_line(&self) -> String {
        let mut parts = vec![self.tool.clone()];
        parts.extend(self.arguments.iter().cloned());
        parts.join(" ")
    }

    pub fn requests_in_place_execution(&self) -> bool {
        matches!(self.kind, JobKind::VersionRequest)
    }
}
