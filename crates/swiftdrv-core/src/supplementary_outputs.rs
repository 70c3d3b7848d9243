//! Primary output resolution and every side-band artifact path (§4.7 and
//! §4.8): dependencies, module interfaces, docs, source info, the loaded
//! module trace, TBD, optimization records, the ObjC header, and the
//! bridging PCH.

use crate::error::DriverError;
use crate::types::{CompilerMode, DriverKind, LinkOutputType};
use std::path::PathBuf;
use swiftdrv_common::{Diagnostic, DiagnosticSink, Environment, FileType, VirtualPath};
use swiftdrv_options::{OptionId, ParsedOptions};

use crate::output_file_map::OutputFileMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryOutputInfo {
    pub output_type: Option<FileType>,
    pub link_output_type: Option<LinkOutputType>,
}

fn object_like_type(options: &ParsedOptions) -> FileType {
    if options.get_last_argument(OptionId::Lto).is_some() {
        FileType::LlvmBitcode
    } else {
        FileType::Object
    }
}

const DIRECT_MODE_FLAGS: &[(OptionId, FileType)] = &[
    (OptionId::EmitObject, FileType::Object),
    (OptionId::CompileOnly, FileType::Object),
    (OptionId::EmitAssembly, FileType::Assembly),
    (OptionId::AssemblyOnly, FileType::Assembly),
    (OptionId::EmitSil, FileType::Sil),
    (OptionId::EmitSilgen, FileType::RawSil),
    (OptionId::EmitSib, FileType::Sib),
    (OptionId::EmitSibgen, FileType::RawSib),
    (OptionId::EmitIr, FileType::LlvmIR),
    (OptionId::EmitBc, FileType::LlvmBitcode),
    (OptionId::DumpAst, FileType::Ast),
    (OptionId::EmitPcm, FileType::Pcm),
    (OptionId::EmitImportedModules, FileType::ImportedModules),
    (OptionId::IndexFile, FileType::IndexData),
    (OptionId::ScanDependencies, FileType::JsonDependencies),
    (OptionId::ScanClangDependencies, FileType::JsonClangDependencies),
];

/// Resolve what the compiler's own primary output is, and the link output
/// type if the result feeds a linker. `-i` is an immediate hard error
/// (the "obsolete flag" resolution of the spec's open question).
pub fn resolve_primary_output(
    driver_kind: DriverKind,
    mode: &CompilerMode,
    options: &ParsedOptions,
    sink: &dyn DiagnosticSink,
) -> Result<PrimaryOutputInfo, DriverError> {
    if options.has_argument(OptionId::ObsoleteIFlag) {
        return Err(DriverError::ObsoleteIFlag);
    }
    if matches!(mode, CompilerMode::Repl | CompilerMode::Immediate) {
        return Ok(PrimaryOutputInfo { output_type: None, link_output_type: None });
    }

    for (id, file_type) in DIRECT_MODE_FLAGS {
        if options.has_argument(*id) {
            return Ok(PrimaryOutputInfo { output_type: Some(*file_type), link_output_type: None });
        }
    }

    let wants_executable = options.has_argument(OptionId::EmitExecutable);
    let wants_library = options.has_argument(OptionId::EmitLibrary);
    if wants_executable && wants_library {
        return Err(DriverError::ConflictingOptions {
            a: "-emit-executable".to_string(),
            b: "-emit-library".to_string(),
        });
    }
    let is_static = options.has_argument(OptionId::Static);

    if wants_executable {
        if is_static {
            return Err(DriverError::ConflictingOptions {
                a: "-static".to_string(),
                b: "-emit-executable".to_string(),
            });
        }
        return Ok(finish_primary(options, object_like_type(options), LinkOutputType::Executable, sink));
    }
    if wants_library {
        let link = if is_static { LinkOutputType::StaticLibrary } else { LinkOutputType::DynamicLibrary };
        return Ok(finish_primary(options, object_like_type(options), link, sink));
    }
    if options.has_argument(OptionId::EmitModule) || options.has_argument(OptionId::EmitModulePath) {
        return Ok(PrimaryOutputInfo { output_type: Some(FileType::SwiftModule), link_output_type: None });
    }
    if matches!(driver_kind, DriverKind::Interactive) {
        return Ok(PrimaryOutputInfo { output_type: None, link_output_type: None });
    }

    Ok(finish_primary(options, object_like_type(options), LinkOutputType::Executable, sink))
}

fn finish_primary(
    options: &ParsedOptions,
    output_type: FileType,
    link_output_type: LinkOutputType,
    sink: &dyn DiagnosticSink,
) -> PrimaryOutputInfo {
    let embed_requested =
        options.has_argument(OptionId::EmbedBitcode) || options.has_argument(OptionId::EmbedBitcodeMarker);
    if embed_requested && output_type != FileType::Object {
        sink.emit(Diagnostic::warning(
            "-embed-bitcode(-marker) has no effect on a non-object primary output; ignoring",
        ));
        options.erase(OptionId::EmbedBitcode);
        options.erase(OptionId::EmbedBitcodeMarker);
    }
    PrimaryOutputInfo { output_type: Some(output_type), link_output_type: Some(link_output_type) }
}

/// The general supplementary-output placement algorithm (§4.8, steps 2-5),
/// given that the caller has already established the output kind is
/// requested. `primary_is_this_type` is whether the compiler's own
/// primary output already equals `file_type` (so `-o` can be reused
/// verbatim).
fn plan_output_path(
    mode: &CompilerMode,
    output_map: &OutputFileMap,
    file_type: FileType,
    explicit_output: Option<&VirtualPath>,
    primary_is_this_type: bool,
    module_name: &str,
) -> VirtualPath {
    if mode.is_single_compilation() {
        if let Some(p) = output_map.existing_output_for_single_input(file_type) {
            return p.clone();
        }
    }
    if let Some(o) = explicit_output {
        if primary_is_this_type {
            return o.clone();
        }
        let parent = o.parent_directory().unwrap_or(VirtualPath::Relative(PathBuf::from(".")));
        return parent.appending(&format!("{}.{}", module_name, file_type.extension()));
    }
    VirtualPath::Relative(PathBuf::from(format!("{}.{}", module_name, file_type.extension())))
}

/// One supplementary output kind: the flags that ask for it, the flag
/// carrying an explicit path (if any), and its file type.
struct OutputSpec {
    path_flag: Option<OptionId>,
    presence_flags: &'static [OptionId],
    file_type: FileType,
}

fn plan_one(
    options: &ParsedOptions,
    spec: &OutputSpec,
    mode: &CompilerMode,
    output_map: &OutputFileMap,
    explicit_output: Option<&VirtualPath>,
    primary: &PrimaryOutputInfo,
    module_name: &str,
) -> Option<VirtualPath> {
    if let Some(path_flag) = spec.path_flag {
        if let Some(path) = options.get_last_argument(path_flag) {
            for id in spec.presence_flags {
                options.has_argument(*id);
            }
            return Some(VirtualPath::from_string(path));
        }
    }
    let present = spec.presence_flags.iter().any(|id| options.has_argument(*id));
    if !present {
        return None;
    }
    let primary_is_this_type = primary.output_type == Some(spec.file_type);
    Some(plan_output_path(mode, output_map, spec.file_type, explicit_output, primary_is_this_type, module_name))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplementaryOutputPaths {
    pub dependencies: Option<VirtualPath>,
    pub loaded_module_trace: Option<VirtualPath>,
    pub tbd: Option<VirtualPath>,
    pub objc_header: Option<VirtualPath>,
    pub module_interface: Option<VirtualPath>,
    pub private_module_interface: Option<VirtualPath>,
    pub module_doc: Option<VirtualPath>,
    pub module_source_info: Option<VirtualPath>,
    pub optimization_record: Option<VirtualPath>,
}

/// Plan every supplementary output except the bridging PCH (which has its
/// own eligibility rule, see [`plan_bridging_pch`]) and the module-adjacent
/// doc/source-info pair's special placement (handled by the caller once
/// the module's own path is known). The loaded module trace can also be
/// enabled without any flag via `SWIFT_LOADED_MODULE_TRACE_FILE`, which
/// supplies the path directly; an explicit `-emit-loaded-module-trace-path`
/// still wins.
pub fn plan_supplementary_outputs(
    options: &ParsedOptions,
    mode: &CompilerMode,
    output_map: &OutputFileMap,
    explicit_output: Option<&VirtualPath>,
    primary: &PrimaryOutputInfo,
    module_name: &str,
    env: &Environment,
) -> SupplementaryOutputPaths {
    let plan = |spec: &OutputSpec| plan_one(options, spec, mode, output_map, explicit_output, primary, module_name);

    SupplementaryOutputPaths {
        dependencies: plan(&OutputSpec {
            path_flag: Some(OptionId::EmitDependenciesPath),
            presence_flags: &[OptionId::EmitDependencies],
            file_type: FileType::Dependencies,
        }),
        loaded_module_trace: plan(&OutputSpec {
            path_flag: Some(OptionId::EmitLoadedModuleTracePath),
            presence_flags: &[OptionId::EmitLoadedModuleTrace],
            file_type: FileType::ModuleTrace,
        })
        .or_else(|| env.get("SWIFT_LOADED_MODULE_TRACE_FILE").filter(|p| !p.is_empty()).map(VirtualPath::from_string)),
        tbd: plan(&OutputSpec {
            path_flag: Some(OptionId::EmitTbdPath),
            presence_flags: &[OptionId::EmitTbd],
            file_type: FileType::Tbd,
        }),
        objc_header: plan(&OutputSpec {
            path_flag: Some(OptionId::EmitObjcHeaderPath),
            presence_flags: &[OptionId::EmitObjcHeader],
            file_type: FileType::ObjcHeader,
        }),
        module_interface: plan(&OutputSpec {
            path_flag: Some(OptionId::EmitModuleInterfacePath),
            presence_flags: &[OptionId::EmitModuleInterface],
            file_type: FileType::SwiftInterface,
        }),
        private_module_interface: plan(&OutputSpec {
            path_flag: Some(OptionId::EmitPrivateModuleInterfacePath),
            presence_flags: &[OptionId::EmitPrivateModuleInterfacePath],
            file_type: FileType::PrivateSwiftInterface,
        }),
        module_doc: plan(&OutputSpec {
            path_flag: Some(OptionId::EmitModuleDocPath),
            presence_flags: &[OptionId::EmitModuleDoc],
            file_type: FileType::SwiftDocumentation,
        }),
        module_source_info: if options.has_argument(OptionId::AvoidEmitModuleSourceInfo) {
            None
        } else {
            plan(&OutputSpec {
                path_flag: Some(OptionId::EmitModuleSourceInfoPath),
                presence_flags: &[OptionId::EmitModuleSourceInfo],
                file_type: FileType::SwiftSourceInfoFile,
            })
        },
        optimization_record: plan(&OutputSpec {
            path_flag: Some(OptionId::SaveOptimizationRecordPath),
            presence_flags: &[OptionId::SaveOptimizationRecord],
            file_type: FileType::YamlOptimizationRecord,
        }),
    }
}

/// Place a module-adjacent output (docs, source-info, interface) next to
/// a known module path, swapping the extension, rather than the general
/// algorithm above.
pub fn place_adjacent_to_module(module_path: &VirtualPath, file_type: FileType) -> VirtualPath {
    module_path.with_extension(file_type)
}

/// The bridging PCH is only planned when the mode supports it, an ObjC
/// bridging header was given, and the enable/disable pair (default on)
/// resolves positively.
pub fn plan_bridging_pch(
    options: &ParsedOptions,
    mode: &CompilerMode,
    output_map: &OutputFileMap,
) -> Option<VirtualPath> {
    if !mode.supports_bridging_pch() {
        return None;
    }
    let header = options.get_last_argument(OptionId::ImportObjcHeader)?;
    let enabled = options.has_flag(OptionId::EnableBridgingPch, OptionId::DisableBridgingPch, true);
    if !enabled {
        return None;
    }
    if let Some(p) = output_map.existing_output("", FileType::Pch) {
        return Some(p.clone());
    }
    let basename = VirtualPath::from_string(&header).basename_without_ext().unwrap_or_else(|| "bridging".to_string());
    if let Some(dir) = options.get_last_argument(OptionId::PchOutputDir) {
        return Some(VirtualPath::from_string(dir).appending(&format!("{}.pch", basename)));
    }
    Some(VirtualPath::temporary(format!("{}.pch", basename)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiftdrv_common::CollectingDiagnosticSink;
    use swiftdrv_options::Argument;

    fn opt(id: OptionId, arg: Argument, index: usize) -> swiftdrv_options::ParsedOption {
        swiftdrv_options::ParsedOption { id, argument: arg, index }
    }

    #[test]
    fn emit_object_is_direct() {
        let bag = ParsedOptions::new(vec![opt(OptionId::EmitObject, Argument::None, 0)]);
        let sink = CollectingDiagnosticSink::new();
        let info = resolve_primary_output(DriverKind::Batch, &CompilerMode::StandardCompile, &bag, &sink).unwrap();
        assert_eq!(info.output_type, Some(FileType::Object));
        assert_eq!(info.link_output_type, None);
    }

    #[test]
    fn emit_library_static_picks_static_link() {
        let bag = ParsedOptions::new(vec![
            opt(OptionId::EmitLibrary, Argument::None, 0),
            opt(OptionId::Static, Argument::None, 1),
        ]);
        let sink = CollectingDiagnosticSink::new();
        let info = resolve_primary_output(DriverKind::Batch, &CompilerMode::StandardCompile, &bag, &sink).unwrap();
        assert_eq!(info.link_output_type, Some(LinkOutputType::StaticLibrary));
    }

    #[test]
    fn static_and_executable_conflict() {
        let bag = ParsedOptions::new(vec![
            opt(OptionId::EmitExecutable, Argument::None, 0),
            opt(OptionId::Static, Argument::None, 1),
        ]);
        let sink = CollectingDiagnosticSink::new();
        assert!(matches!(
            resolve_primary_output(DriverKind::Batch, &CompilerMode::StandardCompile, &bag, &sink),
            Err(DriverError::ConflictingOptions { .. })
        ));
    }

    #[test]
    fn obsolete_i_flag_is_a_hard_error() {
        let bag = ParsedOptions::new(vec![opt(OptionId::ObsoleteIFlag, Argument::None, 0)]);
        let sink = CollectingDiagnosticSink::new();
        assert!(matches!(
            resolve_primary_output(DriverKind::Batch, &CompilerMode::StandardCompile, &bag, &sink),
            Err(DriverError::ObsoleteIFlag)
        ));
    }

    #[test]
    fn embed_bitcode_on_non_object_output_warns_and_is_erased() {
        let bag = ParsedOptions::new(vec![
            opt(OptionId::EmitLibrary, Argument::None, 0),
            opt(OptionId::EmbedBitcode, Argument::None, 1),
            opt(OptionId::Lto, Argument::Single("llvm-full".into()), 2),
        ]);
        let sink = CollectingDiagnosticSink::new();
        let info = resolve_primary_output(DriverKind::Batch, &CompilerMode::StandardCompile, &bag, &sink).unwrap();
        assert_eq!(info.output_type, Some(FileType::LlvmBitcode));
        assert!(!sink.diagnostics().is_empty());
        assert!(!bag.has_argument(OptionId::EmbedBitcode));
    }

    #[test]
    fn dependencies_path_wins_and_consumes_presence_flag() {
        let bag = ParsedOptions::new(vec![
            opt(OptionId::EmitDependencies, Argument::None, 0),
            opt(OptionId::EmitDependenciesPath, Argument::Single("custom.d".into()), 1),
        ]);
        let map = OutputFileMap::default();
        let primary = PrimaryOutputInfo { output_type: Some(FileType::Object), link_output_type: Some(LinkOutputType::Executable) };
        let env = Environment::for_test("/tmp");
        let paths = plan_supplementary_outputs(&bag, &CompilerMode::StandardCompile, &map, None, &primary, "main", &env);
        assert_eq!(paths.dependencies, Some(VirtualPath::from_string("custom.d")));
        assert!(bag.unconsumed().is_empty());
    }

    #[test]
    fn loaded_module_trace_env_var_enables_emission_without_a_flag() {
        let bag = ParsedOptions::new(vec![]);
        let map = OutputFileMap::default();
        let primary = PrimaryOutputInfo { output_type: Some(FileType::Object), link_output_type: Some(LinkOutputType::Executable) };
        let env = Environment::for_test("/tmp").with_var("SWIFT_LOADED_MODULE_TRACE_FILE", "/tmp/trace.json");
        let paths = plan_supplementary_outputs(&bag, &CompilerMode::StandardCompile, &map, None, &primary, "main", &env);
        assert_eq!(paths.loaded_module_trace, Some(VirtualPath::from_string("/tmp/trace.json")));
    }

    #[test]
    fn loaded_module_trace_flag_wins_over_env_var() {
        let bag = ParsedOptions::new(vec![opt(OptionId::EmitLoadedModuleTracePath, Argument::Single("flag.json".into()), 0)]);
        let map = OutputFileMap::default();
        let primary = PrimaryOutputInfo { output_type: Some(FileType::Object), link_output_type: Some(LinkOutputType::Executable) };
        let env = Environment::for_test("/tmp").with_var("SWIFT_LOADED_MODULE_TRACE_FILE", "/tmp/trace.json");
        let paths = plan_supplementary_outputs(&bag, &CompilerMode::StandardCompile, &map, None, &primary, "main", &env);
        assert_eq!(paths.loaded_module_trace, Some(VirtualPath::from_string("flag.json")));
    }

    #[test]
    fn no_presence_flag_means_no_output() {
        let bag = ParsedOptions::new(vec![]);
        let map = OutputFileMap::default();
        let primary = PrimaryOutputInfo { output_type: Some(FileType::Object), link_output_type: Some(LinkOutputType::Executable) };
        let env = Environment::for_test("/tmp");
        let paths = plan_supplementary_outputs(&bag, &CompilerMode::StandardCompile, &map, None, &primary, "main", &env);
        assert_eq!(paths.dependencies, None);
    }

    #[test]
    fn avoid_source_info_suppresses_it_even_with_flag() {
        let bag = ParsedOptions::new(vec![
            opt(OptionId::EmitModuleSourceInfo, Argument::None, 0),
            opt(OptionId::AvoidEmitModuleSourceInfo, Argument::None, 1),
        ]);
        let map = OutputFileMap::default();
        let primary = PrimaryOutputInfo { output_type: Some(FileType::Object), link_output_type: Some(LinkOutputType::Executable) };
        let env = Environment::for_test("/tmp");
        let paths = plan_supplementary_outputs(&bag, &CompilerMode::StandardCompile, &map, None, &primary, "main", &env);
        assert_eq!(paths.module_source_info, None);
    }

    #[test]
    fn bridging_pch_requires_header_and_enabled_flag() {
        let bag = ParsedOptions::new(vec![opt(OptionId::ImportObjcHeader, Argument::Single("Bridging.h".into()), 0)]);
        let map = OutputFileMap::default();
        let pch = plan_bridging_pch(&bag, &CompilerMode::StandardCompile, &map);
        assert!(matches!(pch, Some(VirtualPath::Temporary(_))));
    }

    #[test]
    fn bridging_pch_absent_without_header() {
        let bag = ParsedOptions::new(vec![]);
        let map = OutputFileMap::default();
        assert_eq!(plan_bridging_pch(&bag, &CompilerMode::StandardCompile, &map), None);
    }

    #[test]
    fn bridging_pch_disabled_explicitly() {
        let bag = ParsedOptions::new(vec![
            opt(OptionId::ImportObjcHeader, Argument::Single("Bridging.h".into()), 0),
            opt(OptionId::DisableBridgingPch, Argument::None, 1),
        ]);
        let map = OutputFileMap::default();
        assert_eq!(plan_bridging_pch(&bag, &CompilerMode::StandardCompile, &map), None);
    }
}
