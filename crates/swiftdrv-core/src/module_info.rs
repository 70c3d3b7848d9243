//! Module name and module-emission-kind derivation (§4.7).

use crate::error::DriverError;
use crate::supplementary_outputs::PrimaryOutputInfo;
use crate::types::{CompilerMode, DebugInfo, LinkOutputType, ModuleOutputInfo, ModuleOutputKind};
use std::path::PathBuf;
use swiftdrv_common::{Diagnostic, DiagnosticSink, FileType, TypedVirtualPath, VirtualPath};
use swiftdrv_options::{OptionId, ParsedOptions};

/// The compiler's own standard-library module name; using it as a
/// user module name without `-parse-stdlib` is rejected.
const STDLIB_SENTINEL: &str = "Swift";

fn wants_module_emit(options: &ParsedOptions) -> bool {
    options.has_argument(OptionId::EmitModule) || options.has_argument(OptionId::EmitModulePath)
}

fn wants_module_adjacent_auxiliary(mode: &CompilerMode, options: &ParsedOptions) -> bool {
    if mode.is_single_compilation() {
        return false;
    }
    options.has_argument(OptionId::EmitObjcHeader)
        || options.has_argument(OptionId::EmitObjcHeaderPath)
        || options.has_argument(OptionId::EmitModuleInterface)
        || options.has_argument(OptionId::EmitModuleInterfacePath)
        || options.has_argument(OptionId::EmitPrivateModuleInterfacePath)
}

fn decide_kind_tag(
    mode: &CompilerMode,
    options: &ParsedOptions,
    debug_info: &DebugInfo,
    primary: &PrimaryOutputInfo,
) -> ModuleKindTag {
    if wants_module_emit(options) {
        return ModuleKindTag::TopLevel;
    }
    let linker_output_expected = primary.link_output_type.is_some();
    if debug_info.requires_module() && linker_output_expected {
        return ModuleKindTag::Auxiliary;
    }
    if wants_module_adjacent_auxiliary(mode, options) {
        return ModuleKindTag::Auxiliary;
    }
    ModuleKindTag::None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleKindTag {
    TopLevel,
    Auxiliary,
    None,
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn derive_raw_name(
    is_repl: bool,
    options: &ParsedOptions,
    explicit_output: Option<&VirtualPath>,
    link_output_type: Option<LinkOutputType>,
    inputs: &[TypedVirtualPath],
) -> Option<String> {
    if let Some(name) = options.get_last_argument(OptionId::ModuleName) {
        return Some(name);
    }
    if is_repl {
        return Some("REPL".to_string());
    }
    if let Some(o) = explicit_output {
        if let Some(mut stem) = o.basename_without_ext() {
            if link_output_type == Some(LinkOutputType::DynamicLibrary)
                || link_output_type == Some(LinkOutputType::StaticLibrary)
            {
                if o.extension().is_some() {
                    if let Some(stripped) = stem.strip_prefix("lib") {
                        stem = stripped.to_string();
                    }
                }
            }
            return Some(stem);
        }
    }
    if inputs.len() == 1 {
        if let Some(stem) = inputs[0].file.basename_without_ext() {
            return Some(stem);
        }
    }
    None
}

/// Derive the module name and whether it had to fall back to a synthetic
/// value, applying the identifier/sentinel checks from §4.7.
fn derive_name(
    is_repl: bool,
    options: &ParsedOptions,
    explicit_output: Option<&VirtualPath>,
    primary: &PrimaryOutputInfo,
    inputs: &[TypedVirtualPath],
    sink: &dyn DiagnosticSink,
) -> (String, bool) {
    let raw = derive_raw_name(is_repl, options, explicit_output, primary.link_output_type, inputs)
        .unwrap_or_default();

    let parse_stdlib = options.has_argument(OptionId::ParseStdlib);
    let rejects_sentinel = raw == STDLIB_SENTINEL && !parse_stdlib;
    let valid = !raw.is_empty() && is_valid_identifier(&raw) && !rejects_sentinel;
    if valid {
        return (raw, false);
    }

    let probably_building_executable =
        primary.output_type.is_none() || primary.link_output_type == Some(LinkOutputType::Executable);
    if probably_building_executable {
        (String::from("main"), true)
    } else {
        sink.emit(Diagnostic::error(format!(
            "module name '{}' is not a valid identifier",
            raw
        )));
        (String::from("__bad__"), true)
    }
}

/// Plan the module's kind and output path, then its name, clearing the
/// kind entirely for modes that cannot emit a module at all.
pub fn plan_module_info(
    mode: &CompilerMode,
    options: &ParsedOptions,
    debug_info: &DebugInfo,
    primary: &PrimaryOutputInfo,
    explicit_output: Option<&VirtualPath>,
    inputs: &[TypedVirtualPath],
    is_repl: bool,
    sink: &dyn DiagnosticSink,
) -> Result<ModuleOutputInfo, DriverError> {
    let (name, name_is_fallback) = derive_name(is_repl, options, explicit_output, primary, inputs, sink);

    if !mode.supports_module_emission() {
        if wants_module_emit(options) {
            sink.emit(Diagnostic::error("a module cannot be emitted in this compilation mode"));
        }
        return Ok(ModuleOutputInfo { output: ModuleOutputKind::None, name, name_is_fallback });
    }

    let kind = decide_kind_tag(mode, options, debug_info, primary);
    let output = match kind {
        ModuleKindTag::None => ModuleOutputKind::None,
        ModuleKindTag::TopLevel => {
            ModuleOutputKind::TopLevel(plan_module_path(options, mode, &name, explicit_output, primary))
        }
        ModuleKindTag::Auxiliary => ModuleOutputKind::Auxiliary(VirtualPath::temporary(format!("{}.swiftmodule", name))),
    };
    Ok(ModuleOutputInfo { output, name, name_is_fallback })
}

fn plan_module_path(
    options: &ParsedOptions,
    mode: &CompilerMode,
    module_name: &str,
    explicit_output: Option<&VirtualPath>,
    primary: &PrimaryOutputInfo,
) -> VirtualPath {
    if let Some(path) = options.get_last_argument(OptionId::EmitModulePath) {
        return VirtualPath::from_string(path);
    }
    let _ = mode;
    if primary.output_type == Some(FileType::SwiftModule) {
        if let Some(o) = explicit_output {
            return o.clone();
        }
    }
    if let Some(o) = explicit_output {
        let parent = o.parent_directory().unwrap_or(VirtualPath::Relative(PathBuf::from(".")));
        return parent.appending(&format!("{}.swiftmodule", module_name));
    }
    VirtualPath::Relative(PathBuf::from(format!("{}.swiftmodule", module_name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DebugInfoFormat, DebugInfoLevel};
    use swiftdrv_common::CollectingDiagnosticSink;
    use swiftdrv_options::Argument;

    fn opt(id: OptionId, arg: Argument, index: usize) -> swiftdrv_options::ParsedOption {
        swiftdrv_options::ParsedOption { id, argument: arg, index }
    }

    fn primary(output_type: Option<FileType>, link: Option<LinkOutputType>) -> PrimaryOutputInfo {
        PrimaryOutputInfo { output_type, link_output_type: link }
    }

    #[test]
    fn s5_module_name_fallback_strips_lib_prefix() {
        let bag = ParsedOptions::new(vec![]);
        let sink = CollectingDiagnosticSink::new();
        let inputs = vec![
            TypedVirtualPath::new(VirtualPath::from_string("a.swift"), FileType::Swift),
            TypedVirtualPath::new(VirtualPath::from_string("b.swift"), FileType::Swift),
        ];
        let output = VirtualPath::from_string("libfoo.dylib");
        let primary = primary(Some(FileType::Object), Some(LinkOutputType::DynamicLibrary));
        let info = plan_module_info(
            &CompilerMode::StandardCompile,
            &bag,
            &DebugInfo::none(),
            &primary,
            Some(&output),
            &inputs,
            false,
            &sink,
        )
        .unwrap();
        assert_eq!(info.name, "foo");
        assert!(!info.name_is_fallback);
    }

    #[test]
    fn repl_module_name_is_repl() {
        let bag = ParsedOptions::new(vec![]);
        let sink = CollectingDiagnosticSink::new();
        let primary = primary(None, None);
        let info = plan_module_info(&CompilerMode::Repl, &bag, &DebugInfo::none(), &primary, None, &[], true, &sink)
            .unwrap();
        assert_eq!(info.name, "REPL");
        assert_eq!(info.output, ModuleOutputKind::None);
    }

    #[test]
    fn explicit_emit_module_is_top_level() {
        let bag = ParsedOptions::new(vec![opt(OptionId::EmitModule, Argument::None, 0)]);
        let sink = CollectingDiagnosticSink::new();
        let inputs = vec![TypedVirtualPath::new(VirtualPath::from_string("a.swift"), FileType::Swift)];
        let primary = primary(Some(FileType::SwiftModule), None);
        let info = plan_module_info(
            &CompilerMode::StandardCompile,
            &bag,
            &DebugInfo::none(),
            &primary,
            None,
            &inputs,
            false,
            &sink,
        )
        .unwrap();
        assert!(matches!(info.output, ModuleOutputKind::TopLevel(_)));
        assert_eq!(info.name, "a");
    }

    #[test]
    fn debug_info_requiring_module_with_linker_output_is_auxiliary() {
        let bag = ParsedOptions::new(vec![]);
        let sink = CollectingDiagnosticSink::new();
        let inputs = vec![TypedVirtualPath::new(VirtualPath::from_string("a.swift"), FileType::Swift)];
        let primary = primary(Some(FileType::Object), Some(LinkOutputType::Executable));
        let debug = DebugInfo { format: DebugInfoFormat::Dwarf, level: Some(DebugInfoLevel::AstTypes), should_verify: false };
        let info =
            plan_module_info(&CompilerMode::StandardCompile, &bag, &debug, &primary, None, &inputs, false, &sink)
                .unwrap();
        assert!(matches!(info.output, ModuleOutputKind::Auxiliary(_)));
    }

    #[test]
    fn invalid_name_falls_back_to_main_when_building_executable() {
        let bag = ParsedOptions::new(vec![opt(OptionId::ModuleName, Argument::Single("1bad".into()), 0)]);
        let sink = CollectingDiagnosticSink::new();
        let primary = primary(Some(FileType::Object), Some(LinkOutputType::Executable));
        let info =
            plan_module_info(&CompilerMode::StandardCompile, &bag, &DebugInfo::none(), &primary, None, &[], false, &sink)
                .unwrap();
        assert_eq!(info.name, "main");
        assert!(info.name_is_fallback);
    }

    #[test]
    fn stdlib_sentinel_without_parse_stdlib_falls_back() {
        let bag = ParsedOptions::new(vec![opt(OptionId::ModuleName, Argument::Single("Swift".into()), 0)]);
        let sink = CollectingDiagnosticSink::new();
        let primary = primary(Some(FileType::Object), Some(LinkOutputType::Executable));
        let info =
            plan_module_info(&CompilerMode::StandardCompile, &bag, &DebugInfo::none(), &primary, None, &[], false, &sink)
                .unwrap();
        assert!(info.name_is_fallback);
    }

    #[test]
    fn stdlib_sentinel_with_parse_stdlib_is_accepted() {
        let bag = ParsedOptions::new(vec![
            opt(OptionId::ModuleName, Argument::Single("Swift".into()), 0),
            opt(OptionId::ParseStdlib, Argument::None, 1),
        ]);
        let sink = CollectingDiagnosticSink::new();
        let primary = primary(Some(FileType::Object), Some(LinkOutputType::Executable));
        let info =
            plan_module_info(&CompilerMode::StandardCompile, &bag, &DebugInfo::none(), &primary, None, &[], false, &sink)
                .unwrap();
        assert_eq!(info.name, "Swift");
        assert!(!info.name_is_fallback);
    }

    #[test]
    fn immediate_mode_clears_module_kind() {
        let bag = ParsedOptions::new(vec![opt(OptionId::EmitModule, Argument::None, 0)]);
        let sink = CollectingDiagnosticSink::new();
        let primary = primary(None, None);
        let info = plan_module_info(&CompilerMode::Immediate, &bag, &DebugInfo::none(), &primary, None, &[], false, &sink)
            .unwrap();
        assert_eq!(info.output, ModuleOutputKind::None);
        assert!(sink.has_severity(swiftdrv_common::Severity::Error));
    }
}
