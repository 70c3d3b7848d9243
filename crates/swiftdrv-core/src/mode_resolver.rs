//! Driver-kind and compilation-mode resolution (§4.3 of the pipeline).
//!
//! Both are pure functions over the parsed invocation; neither touches the
//! filesystem or the toolchain.

use crate::error::DriverError;
use crate::types::{BatchModeInfo, CompilerMode, DriverKind};
use swiftdrv_common::{Diagnostic, DiagnosticSink};
use swiftdrv_options::{OptionGroup, OptionId, ParsedOptions};

/// Resolve the driver kind from the invoked basename, honoring an explicit
/// `--driver-mode=<name>` override (which takes priority and is consumed).
pub fn resolve_driver_kind(basename: &str, options: &ParsedOptions) -> Result<DriverKind, DriverError> {
    if let Some(name) = options.get_last_argument(OptionId::DriverMode) {
        return match name.as_str() {
            "swift" => Ok(DriverKind::Interactive),
            "swiftc" => Ok(DriverKind::Batch),
            other => Err(DriverError::InvalidDriverName { name: other.to_string() }),
        };
    }
    match basename {
        "swift" => Ok(DriverKind::Interactive),
        _ => Ok(DriverKind::Batch),
    }
}

/// Resolve the compilation mode, in the priority order laid out in §4.3:
/// an explicit mode flag first, then driver-kind defaults, then the batch
/// interaction matrix over WMO / index-file / batch-mode / dump-ast.
pub fn resolve_compiler_mode(
    kind: DriverKind,
    options: &ParsedOptions,
    has_inputs: bool,
    sink: &dyn DiagnosticSink,
) -> Result<CompilerMode, DriverError> {
    if options.has_argument(OptionId::DeprecatedIntegratedRepl) {
        return Err(DriverError::IntegratedReplRemoved);
    }
    if options.has_argument(OptionId::EmitImportedModules) {
        return Ok(CompilerMode::SingleCompile);
    }
    if options.has_argument(OptionId::Repl) || options.has_argument(OptionId::LldbRepl) {
        return Ok(CompilerMode::Repl);
    }
    if options.has_argument(OptionId::EmitPcm) {
        return Ok(CompilerMode::CompilePcm);
    }

    match kind {
        DriverKind::Interactive => {
            if has_inputs {
                Ok(CompilerMode::Immediate)
            } else {
                Ok(CompilerMode::Repl)
            }
        }
        DriverKind::Batch => resolve_batch_mode(options, sink),
    }
}

fn resolve_batch_mode(options: &ParsedOptions, sink: &dyn DiagnosticSink) -> Result<CompilerMode, DriverError> {
    let use_wmo = options.has_flag(OptionId::WholeModuleOptimization, OptionId::NoWholeModuleOptimization, false);
    let has_index_file = options.has_argument(OptionId::IndexFile);
    let want_batch = options.has_flag(OptionId::EnableBatchMode, OptionId::DisableBatchMode, false);
    let dump_ast = options.has_argument(OptionId::DumpAst);

    if dump_ast && use_wmo {
        sink.emit(
            Diagnostic::warning("whole-module-optimization is overridden by -dump-ast")
                .with_location("-dump-ast"),
        );
        options.erase_group(OptionGroup::WholeModuleOptimization);
        return Ok(CompilerMode::StandardCompile);
    }
    if dump_ast && has_index_file {
        sink.emit(
            Diagnostic::warning("-index-file is overridden by -dump-ast").with_location("-dump-ast"),
        );
        options.erase(OptionId::IndexFile);
        options.erase(OptionId::IndexFilePath);
        return Ok(CompilerMode::StandardCompile);
    }
    if use_wmo || has_index_file {
        if want_batch {
            sink.emit(Diagnostic::warning(
                "-enable-batch-mode is ignored together with whole-module-optimization or -index-file",
            ));
        }
        return Ok(CompilerMode::SingleCompile);
    }
    if want_batch {
        let seed = parse_batch_u64(options, OptionId::DriverBatchSeed, "-driver-batch-seed")?;
        let count = parse_batch_u32(options, OptionId::DriverBatchCount, "-driver-batch-count")?;
        let size_limit = parse_batch_u32(options, OptionId::DriverBatchSizeLimit, "-driver-batch-size-limit")?;
        return Ok(CompilerMode::BatchCompile(BatchModeInfo { seed, count, size_limit }));
    }
    Ok(CompilerMode::StandardCompile)
}

fn parse_batch_u64(options: &ParsedOptions, id: OptionId, name: &str) -> Result<Option<u64>, DriverError> {
    match options.get_last_argument(id) {
        Some(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| DriverError::InvalidArgumentValue { option: name.to_string(), value }),
        None => Ok(None),
    }
}

fn parse_batch_u32(options: &ParsedOptions, id: OptionId, name: &str) -> Result<Option<u32>, DriverError> {
    match options.get_last_argument(id) {
        Some(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|_| DriverError::InvalidArgumentValue { option: name.to_string(), value }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiftdrv_common::CollectingDiagnosticSink;
    use swiftdrv_options::{Argument, ParsedOption};

    fn opt(id: OptionId, arg: Argument, index: usize) -> ParsedOption {
        ParsedOption { id, argument: arg, index }
    }

    #[test]
    fn driver_mode_override_wins_over_basename() {
        let bag = ParsedOptions::new(vec![opt(OptionId::DriverMode, Argument::Single("swiftc".into()), 0)]);
        assert_eq!(resolve_driver_kind("swift", &bag).unwrap(), DriverKind::Batch);
    }

    #[test]
    fn unknown_driver_mode_name_fails() {
        let bag = ParsedOptions::new(vec![opt(OptionId::DriverMode, Argument::Single("bogus".into()), 0)]);
        assert!(matches!(resolve_driver_kind("swift", &bag), Err(DriverError::InvalidDriverName { .. })));
    }

    #[test]
    fn interactive_with_inputs_is_immediate() {
        let bag = ParsedOptions::new(vec![]);
        let sink = CollectingDiagnosticSink::new();
        let mode = resolve_compiler_mode(DriverKind::Interactive, &bag, true, &sink).unwrap();
        assert_eq!(mode, CompilerMode::Immediate);
    }

    #[test]
    fn interactive_without_inputs_is_repl() {
        let bag = ParsedOptions::new(vec![]);
        let sink = CollectingDiagnosticSink::new();
        let mode = resolve_compiler_mode(DriverKind::Interactive, &bag, false, &sink).unwrap();
        assert_eq!(mode, CompilerMode::Repl);
    }

    #[test]
    fn s6_dump_ast_overrides_wmo() {
        let bag = ParsedOptions::new(vec![
            opt(OptionId::WholeModuleOptimization, Argument::None, 0),
            opt(OptionId::DumpAst, Argument::None, 1),
        ]);
        let sink = CollectingDiagnosticSink::new();
        let mode = resolve_compiler_mode(DriverKind::Batch, &bag, true, &sink).unwrap();
        assert_eq!(mode, CompilerMode::StandardCompile);
        assert!(sink.has_severity(swiftdrv_common::Severity::Warning));
        assert!(bag.get_last(OptionId::WholeModuleOptimization).is_none());
    }

    #[test]
    fn wmo_alone_is_single_compile() {
        let bag = ParsedOptions::new(vec![opt(OptionId::WholeModuleOptimization, Argument::None, 0)]);
        let sink = CollectingDiagnosticSink::new();
        let mode = resolve_compiler_mode(DriverKind::Batch, &bag, true, &sink).unwrap();
        assert_eq!(mode, CompilerMode::SingleCompile);
    }

    #[test]
    fn batch_mode_parses_batch_info() {
        let bag = ParsedOptions::new(vec![
            opt(OptionId::EnableBatchMode, Argument::None, 0),
            opt(OptionId::DriverBatchSeed, Argument::Single("42".into()), 1),
        ]);
        let sink = CollectingDiagnosticSink::new();
        let mode = resolve_compiler_mode(DriverKind::Batch, &bag, true, &sink).unwrap();
        match mode {
            CompilerMode::BatchCompile(info) => assert_eq!(info.seed, Some(42)),
            other => panic!("expected batch compile, got {:?}", other),
        }
    }

    #[test]
    fn no_flags_is_standard_compile() {
        let bag = ParsedOptions::new(vec![]);
        let sink = CollectingDiagnosticSink::new();
        let mode = resolve_compiler_mode(DriverKind::Batch, &bag, true, &sink).unwrap();
        assert_eq!(mode, CompilerMode::StandardCompile);
    }

    #[test]
    fn deprecated_integrated_repl_hard_fails() {
        let bag = ParsedOptions::new(vec![opt(OptionId::DeprecatedIntegratedRepl, Argument::None, 0)]);
        let sink = CollectingDiagnosticSink::new();
        assert!(matches!(
            resolve_compiler_mode(DriverKind::Interactive, &bag, false, &sink),
            Err(DriverError::IntegratedReplRemoved)
        ));
    }
}
