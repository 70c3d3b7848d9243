//! The closed set of CLI flags the driver understands, and how each one's
//! argument (if any) is spelled on the command line.
//!
//! Real option tables (the thing this crate's `OptionId` stands in for) are
//! generated from a `.td`-style definition file and run to several hundred
//! entries; this is the behaviorally load-bearing subset from the external
//! interface surface.

/// How an option's argument, if any, is spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No argument; presence is the whole signal.
    Flag,
    /// The argument is the following token: `-o out.o`.
    Separate,
    /// The argument follows a literal `=` in the same token: `-lto=full`.
    JoinedEquals,
    /// The argument is appended directly with no separator: `-DDEBUG`.
    JoinedNoSeparator,
    /// May appear bare (`Flag`) or with a joined `=value`.
    FlagOrJoinedEquals,
}

/// Ties a family of mutually-constraining options together so
/// `ParsedOptions::get_last_in_group` and `hasFlag`-style positive/negative
/// pairing can find the winner without the caller hardcoding every member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionGroup {
    BatchMode,
    WholeModuleOptimization,
    BridgingPch,
    DebugLevel,
}

/// Every flag this driver recognizes. Grouped to mirror §6 of the spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionId {
    DriverMode,
    WorkingDirectory,
    Target,
    TargetVariant,
    Sdk,
    ResourceDir,
    ToolsDirectory,
    DriverUseFrontendPath,
    OutputFileMap,
    Output,
    ModuleName,

    EmitModule,
    EmitModulePath,
    EmitObjcHeader,
    EmitObjcHeaderPath,
    EmitModuleInterface,
    EmitModuleInterfacePath,
    EmitPrivateModuleInterfacePath,
    EmitModuleDoc,
    EmitModuleDocPath,
    EmitModuleSourceInfo,
    EmitModuleSourceInfoPath,
    AvoidEmitModuleSourceInfo,
    EmitDependencies,
    EmitDependenciesPath,
    EmitLoadedModuleTrace,
    EmitLoadedModuleTracePath,
    EmitTbd,
    EmitTbdPath,

    EmitExecutable,
    EmitLibrary,
    EmitObject,
    CompileOnly,
    EmitAssembly,
    AssemblyOnly,
    EmitSil,
    EmitSilgen,
    EmitSib,
    EmitSibgen,
    EmitPcm,
    EmitImportedModules,
    EmitIr,
    EmitBc,
    DumpAst,
    IndexFile,
    IndexFilePath,
    IndexStorePath,
    IndexIgnoreSystemModules,
    UpdateCode,
    ObsoleteIFlag,
    Repl,
    LldbRepl,
    DeprecatedIntegratedRepl,
    Interpret,
    ScanDependencies,
    ScanClangDependencies,
    ParseAsLibrary,
    ParseStdlib,

    EnableBatchMode,
    DisableBatchMode,
    DriverBatchSeed,
    DriverBatchCount,
    DriverBatchSizeLimit,
    WholeModuleOptimization,
    NoWholeModuleOptimization,
    Jobs,
    NumThreads,

    EnableBridgingPch,
    DisableBridgingPch,
    ImportObjcHeader,
    PchOutputDir,

    Sanitize,
    SanitizeCoverage,
    ConditionalCompilationFlag,
    FrameworkSearchPath,
    FrameworkSearchPathSystem,
    ProfileGenerate,
    ProfileUse,
    CoveragePrefixMap,
    DebugPrefixMap,
    DebugLevelFull,
    DebugLevelLineTablesOnly,
    DebugLevelDwarfTypes,
    DebugLevelNone,
    DebugInfoFormat,
    VerifyDebugInfo,
    Lto,
    SaveOptimizationRecord,
    SaveOptimizationRecordPath,
    EmbedBitcode,
    EmbedBitcodeMarker,
    RuntimeCompatibilityVersion,
    ContinueBuildingAfterErrors,
    ParseableOutput,
    Verbose,

    DriverPrintJobs,
    DriverPrintBindings,
    DriverPrintActions,
    DriverPrintGraphviz,
    DriverPrintOutputFileMap,
    DriverShowJobLifecycle,
    DriverWarnUnusedOptions,
    DriverForceResponseFiles,
    DriverUseFilelists,
    DriverFilelistThreshold,

    Static,
    SuppressWarnings,
    WarningsAsErrors,
}

/// One entry in the option table: a canonical spelling, its argument
/// shape, and the mutually-exclusive group it belongs to (if any).
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub id: OptionId,
    pub spelling: &'static str,
    pub arity: Arity,
    pub group: Option<OptionGroup>,
}

const fn spec(id: OptionId, spelling: &'static str, arity: Arity) -> OptionSpec {
    OptionSpec { id, spelling, arity, group: None }
}

const fn grouped(id: OptionId, spelling: &'static str, arity: Arity, group: OptionGroup) -> OptionSpec {
    OptionSpec { id, spelling, arity, group: Some(group) }
}

/// The full table, in no particular order; lookups are by exact/prefix
/// match on `spelling`, never by table position.
pub static OPTION_TABLE: &[OptionSpec] = &[
    spec(OptionId::DriverMode, "--driver-mode", Arity::JoinedEquals),
    spec(OptionId::WorkingDirectory, "-working-directory", Arity::Separate),
    spec(OptionId::Target, "-target", Arity::Separate),
    spec(OptionId::TargetVariant, "-target-variant", Arity::Separate),
    spec(OptionId::Sdk, "-sdk", Arity::Separate),
    spec(OptionId::ResourceDir, "-resource-dir", Arity::Separate),
    spec(OptionId::ToolsDirectory, "-tools-directory", Arity::Separate),
    spec(OptionId::DriverUseFrontendPath, "-driver-use-frontend-path", Arity::Separate),
    spec(OptionId::OutputFileMap, "-output-file-map", Arity::Separate),
    spec(OptionId::Output, "-o", Arity::Separate),
    spec(OptionId::ModuleName, "-module-name", Arity::Separate),

    spec(OptionId::EmitModule, "-emit-module", Arity::Flag),
    spec(OptionId::EmitModulePath, "-emit-module-path", Arity::Separate),
    spec(OptionId::EmitObjcHeader, "-emit-objc-header", Arity::Flag),
    spec(OptionId::EmitObjcHeaderPath, "-emit-objc-header-path", Arity::Separate),
    spec(OptionId::EmitModuleInterface, "-emit-module-interface", Arity::Flag),
    spec(OptionId::EmitModuleInterfacePath, "-emit-module-interface-path", Arity::Separate),
    spec(OptionId::EmitPrivateModuleInterfacePath, "-emit-private-module-interface-path", Arity::Separate),
    spec(OptionId::EmitModuleDoc, "-emit-module-doc", Arity::Flag),
    spec(OptionId::EmitModuleDocPath, "-emit-module-doc-path", Arity::Separate),
    spec(OptionId::EmitModuleSourceInfo, "-emit-module-source-info", Arity::Flag),
    spec(OptionId::EmitModuleSourceInfoPath, "-emit-module-source-info-path", Arity::Separate),
    spec(OptionId::AvoidEmitModuleSourceInfo, "-avoid-emit-module-source-info", Arity::Flag),
    spec(OptionId::EmitDependencies, "-emit-dependencies", Arity::Flag),
    spec(OptionId::EmitDependenciesPath, "-emit-dependencies-path", Arity::Separate),
    spec(OptionId::EmitLoadedModuleTrace, "-emit-loaded-module-trace", Arity::Flag),
    spec(OptionId::EmitLoadedModuleTracePath, "-emit-loaded-module-trace-path", Arity::Separate),
    spec(OptionId::EmitTbd, "-emit-tbd", Arity::Flag),
    spec(OptionId::EmitTbdPath, "-emit-tbd-path", Arity::Separate),

    spec(OptionId::EmitExecutable, "-emit-executable", Arity::Flag),
    spec(OptionId::EmitLibrary, "-emit-library", Arity::Flag),
    spec(OptionId::EmitObject, "-emit-object", Arity::Flag),
    spec(OptionId::CompileOnly, "-c", Arity::Flag),
    spec(OptionId::EmitAssembly, "-emit-assembly", Arity::Flag),
    spec(OptionId::AssemblyOnly, "-S", Arity::Flag),
    spec(OptionId::EmitSil, "-emit-sil", Arity::Flag),
    spec(OptionId::EmitSilgen, "-emit-silgen", Arity::Flag),
    spec(OptionId::EmitSib, "-emit-sib", Arity::Flag),
    spec(OptionId::EmitSibgen, "-emit-sibgen", Arity::Flag),
    spec(OptionId::EmitPcm, "-emit-pcm", Arity::Flag),
    spec(OptionId::EmitImportedModules, "-emit-imported-modules", Arity::Flag),
    spec(OptionId::EmitIr, "-emit-ir", Arity::Flag),
    spec(OptionId::EmitBc, "-emit-bc", Arity::Flag),
    spec(OptionId::DumpAst, "-dump-ast", Arity::Flag),
    spec(OptionId::IndexFile, "-index-file", Arity::Flag),
    spec(OptionId::IndexFilePath, "-index-file-path", Arity::Separate),
    spec(OptionId::IndexStorePath, "-index-store-path", Arity::Separate),
    spec(OptionId::IndexIgnoreSystemModules, "-index-ignore-system-modules", Arity::Flag),
    spec(OptionId::UpdateCode, "-update-code", Arity::Flag),
    spec(OptionId::ObsoleteIFlag, "-i", Arity::Flag),
    spec(OptionId::Repl, "-repl", Arity::Flag),
    spec(OptionId::LldbRepl, "-lldb-repl", Arity::Flag),
    spec(OptionId::DeprecatedIntegratedRepl, "-deprecated-integrated-repl", Arity::Flag),
    spec(OptionId::Interpret, "-interpret", Arity::Flag),
    spec(OptionId::ScanDependencies, "-scan-dependencies", Arity::Flag),
    spec(OptionId::ScanClangDependencies, "-scan-clang-dependencies", Arity::Flag),
    spec(OptionId::ParseAsLibrary, "-parse-as-library", Arity::Flag),
    spec(OptionId::ParseStdlib, "-parse-stdlib", Arity::Flag),

    grouped(OptionId::EnableBatchMode, "-enable-batch-mode", Arity::Flag, OptionGroup::BatchMode),
    grouped(OptionId::DisableBatchMode, "-disable-batch-mode", Arity::Flag, OptionGroup::BatchMode),
    spec(OptionId::DriverBatchSeed, "-driver-batch-seed", Arity::Separate),
    spec(OptionId::DriverBatchCount, "-driver-batch-count", Arity::Separate),
    spec(OptionId::DriverBatchSizeLimit, "-driver-batch-size-limit", Arity::Separate),
    grouped(
        OptionId::WholeModuleOptimization,
        "-whole-module-optimization",
        Arity::Flag,
        OptionGroup::WholeModuleOptimization,
    ),
    grouped(
        OptionId::NoWholeModuleOptimization,
        "-no-whole-module-optimization",
        Arity::Flag,
        OptionGroup::WholeModuleOptimization,
    ),
    spec(OptionId::Jobs, "-j", Arity::Separate),
    spec(OptionId::NumThreads, "-num-threads", Arity::Separate),

    grouped(OptionId::EnableBridgingPch, "-enable-bridging-pch", Arity::Flag, OptionGroup::BridgingPch),
    grouped(OptionId::DisableBridgingPch, "-disable-bridging-pch", Arity::Flag, OptionGroup::BridgingPch),
    spec(OptionId::ImportObjcHeader, "-import-objc-header", Arity::Separate),
    spec(OptionId::PchOutputDir, "-pch-output-dir", Arity::Separate),

    spec(OptionId::Sanitize, "-sanitize", Arity::JoinedEquals),
    spec(OptionId::SanitizeCoverage, "-sanitize-coverage", Arity::JoinedEquals),
    spec(OptionId::ConditionalCompilationFlag, "-D", Arity::JoinedNoSeparator),
    spec(OptionId::FrameworkSearchPath, "-F", Arity::Separate),
    spec(OptionId::FrameworkSearchPathSystem, "-Fsystem", Arity::Separate),
    spec(OptionId::ProfileGenerate, "-profile-generate", Arity::Flag),
    spec(OptionId::ProfileUse, "-profile-use", Arity::Separate),
    spec(OptionId::CoveragePrefixMap, "-coverage-prefix-map", Arity::Separate),
    spec(OptionId::DebugPrefixMap, "-debug-prefix-map", Arity::Separate),
    grouped(OptionId::DebugLevelFull, "-g", Arity::Flag, OptionGroup::DebugLevel),
    grouped(OptionId::DebugLevelLineTablesOnly, "-gline-tables-only", Arity::Flag, OptionGroup::DebugLevel),
    grouped(OptionId::DebugLevelDwarfTypes, "-gdwarf-types", Arity::Flag, OptionGroup::DebugLevel),
    grouped(OptionId::DebugLevelNone, "-gnone", Arity::Flag, OptionGroup::DebugLevel),
    spec(OptionId::DebugInfoFormat, "-debug-info-format", Arity::JoinedEquals),
    spec(OptionId::VerifyDebugInfo, "-verify-debug-info", Arity::Flag),
    spec(OptionId::Lto, "-lto", Arity::JoinedEquals),
    spec(OptionId::SaveOptimizationRecord, "-save-optimization-record", Arity::FlagOrJoinedEquals),
    spec(OptionId::SaveOptimizationRecordPath, "-save-optimization-record-path", Arity::Separate),
    spec(OptionId::EmbedBitcode, "-embed-bitcode", Arity::Flag),
    spec(OptionId::EmbedBitcodeMarker, "-embed-bitcode-marker", Arity::Flag),
    spec(OptionId::RuntimeCompatibilityVersion, "-runtime-compatibility-version", Arity::Separate),
    spec(OptionId::ContinueBuildingAfterErrors, "-continue-building-after-errors", Arity::Flag),
    spec(OptionId::ParseableOutput, "-parseable-output", Arity::Flag),
    spec(OptionId::Verbose, "-v", Arity::Flag),

    spec(OptionId::DriverPrintJobs, "-driver-print-jobs", Arity::Flag),
    spec(OptionId::DriverPrintBindings, "-driver-print-bindings", Arity::Flag),
    spec(OptionId::DriverPrintActions, "-driver-print-actions", Arity::Flag),
    spec(OptionId::DriverPrintGraphviz, "-driver-print-graphviz", Arity::Flag),
    spec(OptionId::DriverPrintOutputFileMap, "-driver-print-output-file-map", Arity::Flag),
    spec(OptionId::DriverShowJobLifecycle, "-driver-show-job-lifecycle", Arity::Flag),
    spec(OptionId::DriverWarnUnusedOptions, "-driver-warn-unused-options", Arity::Flag),
    spec(OptionId::DriverForceResponseFiles, "-driver-force-response-files", Arity::Flag),
    spec(OptionId::DriverUseFilelists, "-driver-use-filelists", Arity::Flag),
    spec(OptionId::DriverFilelistThreshold, "-driver-filelist-threshold", Arity::JoinedEquals),

    spec(OptionId::Static, "-static", Arity::Flag),
    spec(OptionId::SuppressWarnings, "-suppress-warnings", Arity::Flag),
    spec(OptionId::WarningsAsErrors, "-warnings-as-errors", Arity::Flag),
];

pub fn find_by_id(id: OptionId) -> &'static OptionSpec {
    OPTION_TABLE
        .iter()
        .find(|s| s.id == id)
        .expect("every OptionId has a table entry")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_option_id_has_exactly_one_table_entry() {
        for spec in OPTION_TABLE {
            let matches = OPTION_TABLE.iter().filter(|s| s.id == spec.id).count();
            assert_eq!(matches, 1, "duplicate entry for {:?}", spec.id);
        }
    }

    #[test]
    fn spellings_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for spec in OPTION_TABLE {
            assert!(seen.insert(spec.spelling), "duplicate spelling {}", spec.spelling);
        }
    }
}
