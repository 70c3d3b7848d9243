//! The closed sum types the rest of the pipeline pattern-matches on.
//! No behavior beyond the obvious classification helpers lives here.

use swiftdrv_common::VirtualPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    Interactive,
    Batch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutputType {
    Executable,
    DynamicLibrary,
    StaticLibrary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchModeInfo {
    pub seed: Option<u64>,
    pub count: Option<u32>,
    pub size_limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilerMode {
    StandardCompile,
    SingleCompile,
    BatchCompile(BatchModeInfo),
    Immediate,
    Repl,
    CompilePcm,
}

impl CompilerMode {
    pub fn is_single_compilation(&self) -> bool {
        matches!(self, CompilerMode::SingleCompile | CompilerMode::CompilePcm)
    }

    pub fn is_batch_compile(&self) -> bool {
        matches!(self, CompilerMode::BatchCompile(_))
    }

    /// Whether this mode can ever emit a module (`repl`/`immediate` cannot).
    pub fn supports_module_emission(&self) -> bool {
        !matches!(self, CompilerMode::Repl | CompilerMode::Immediate)
    }

    /// Whether this mode supports a bridging PCH at all.
    pub fn supports_bridging_pch(&self) -> bool {
        !matches!(self, CompilerMode::Repl | CompilerMode::Immediate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugInfoFormat {
    Dwarf,
    CodeView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugInfoLevel {
    AstTypes,
    LineTables,
    DwarfTypes,
}

impl DebugInfoLevel {
    /// `astTypes` and `dwarfTypes` need the type information that only a
    /// module's serialized AST carries; `lineTables` does not.
    pub fn requires_module(self) -> bool {
        matches!(self, DebugInfoLevel::AstTypes | DebugInfoLevel::DwarfTypes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugInfo {
    pub format: DebugInfoFormat,
    pub level: Option<DebugInfoLevel>,
    pub should_verify: bool,
}

impl DebugInfo {
    pub fn none() -> Self {
        Self { format: DebugInfoFormat::Dwarf, level: None, should_verify: false }
    }

    pub fn requires_module(&self) -> bool {
        self.level.is_some_and(DebugInfoLevel::requires_module)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleOutputKind {
    None,
    TopLevel(VirtualPath),
    Auxiliary(VirtualPath),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOutputInfo {
    pub output: ModuleOutputKind,
    pub name: String,
    pub name_is_fallback: bool,
}

impl ModuleOutputInfo {
    pub fn module_path(&self) -> Option<&VirtualPath> {
        match &self.output {
            ModuleOutputKind::TopLevel(p) | ModuleOutputKind::Auxiliary(p) => Some(p),
            ModuleOutputKind::None => None,
        }
    }
}
