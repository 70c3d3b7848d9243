//! Cross-option validation (§4.9): sanitizers, coverage, profiling, debug
//! info, framework search paths, and conditional-compilation flags.

use crate::error::DriverError;
use crate::types::{CompilerMode, DebugInfo, DebugInfoFormat, DebugInfoLevel};
use std::path::Path;
use swiftdrv_common::{Diagnostic, DiagnosticSink, Environment};
use swiftdrv_options::{OptionGroup, OptionId, ParsedOptions};
use swiftdrv_toolchain::{OsFamily, Toolchain, Triple};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOptions {
    pub debug_info: DebugInfo,
    pub enabled_sanitizers: Vec<String>,
    pub num_parallel_jobs: u32,
    pub num_threads: u32,
    pub filelist_threshold: u32,
    pub continue_building_after_errors: bool,
    pub conditional_compilation_flags: Vec<String>,
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn validate(
    options: &ParsedOptions,
    mode: &CompilerMode,
    triple: &Triple,
    toolchain: &dyn Toolchain,
    env: &Environment,
    sink: &dyn DiagnosticSink,
) -> Result<ValidatedOptions, DriverError> {
    validate_warnings(options)?;
    validate_profiling(options)?;
    let conditional_compilation_flags = validate_conditional_compilation(options)?;
    validate_framework_search_paths(options, sink);
    let debug_info = validate_debug_info(options, sink)?;
    let enabled_sanitizers = validate_sanitizers(options, triple, toolchain, sink)?;
    validate_sanitizer_coverage(options, &enabled_sanitizers)?;
    let num_parallel_jobs = validate_jobs(options, env, sink)?;
    let num_threads = validate_threads(options, mode, sink)?;
    let filelist_threshold = validate_filelist_threshold(options, sink)?;
    let continue_building_after_errors =
        mode.is_batch_compile() || options.has_argument(OptionId::ContinueBuildingAfterErrors);

    Ok(ValidatedOptions {
        debug_info,
        enabled_sanitizers,
        num_parallel_jobs,
        num_threads,
        filelist_threshold,
        continue_building_after_errors,
        conditional_compilation_flags,
    })
}

fn validate_warnings(options: &ParsedOptions) -> Result<(), DriverError> {
    if options.has_argument(OptionId::SuppressWarnings) && options.has_argument(OptionId::WarningsAsErrors) {
        return Err(DriverError::ConflictingOptions {
            a: "-suppress-warnings".to_string(),
            b: "-warnings-as-errors".to_string(),
        });
    }
    Ok(())
}

fn validate_profiling(options: &ParsedOptions) -> Result<(), DriverError> {
    let generate = options.has_argument(OptionId::ProfileGenerate);
    let uses = options.all_with_id(OptionId::ProfileUse);
    if generate && !uses.is_empty() {
        return Err(DriverError::ConflictingOptions {
            a: "-profile-generate".to_string(),
            b: "-profile-use".to_string(),
        });
    }
    for u in &uses {
        if let Some(path) = u.argument.as_single() {
            if !Path::new(path).exists() {
                return Err(DriverError::MissingProfilingData(path.to_string()));
            }
        }
    }
    Ok(())
}

fn validate_conditional_compilation(options: &ParsedOptions) -> Result<Vec<String>, DriverError> {
    let mut flags = Vec::new();
    for opt in options.all_with_id(OptionId::ConditionalCompilationFlag) {
        let value = opt.argument.as_single().unwrap_or_default().to_string();
        if value.starts_with("-D") {
            return Err(DriverError::ConditionalCompilationFlagHasRedundantPrefix(value));
        }
        let ident = value.split('=').next().unwrap_or(&value).to_string();
        if !is_valid_identifier(&ident) {
            return Err(DriverError::ConditionalCompilationFlagIsNotValidIdentifier(value));
        }
        flags.push(ident);
    }
    Ok(flags)
}

fn validate_framework_search_paths(options: &ParsedOptions, sink: &dyn DiagnosticSink) {
    let mut paths = options.all_with_id(OptionId::FrameworkSearchPath);
    paths.extend(options.all_with_id(OptionId::FrameworkSearchPathSystem));
    for opt in paths {
        if let Some(path) = opt.argument.as_single() {
            if path.trim_end_matches('/').ends_with(".framework") {
                sink.emit(Diagnostic::warning(format!(
                    "framework search path '{}' should not include the .framework extension",
                    path
                )));
            }
        }
    }
}

fn validate_debug_info(options: &ParsedOptions, sink: &dyn DiagnosticSink) -> Result<DebugInfo, DriverError> {
    let mut prefix_maps = options.all_with_id(OptionId::DebugPrefixMap);
    prefix_maps.extend(options.all_with_id(OptionId::CoveragePrefixMap));
    for opt in prefix_maps {
        if let Some(v) = opt.argument.as_single() {
            if v.matches('=').count() != 1 {
                return Err(DriverError::InvalidArgumentValue {
                    option: "-debug-prefix-map".to_string(),
                    value: v.to_string(),
                });
            }
        }
    }

    let level = match options.get_last_in_group(OptionGroup::DebugLevel) {
        Some(OptionId::DebugLevelFull) => Some(DebugInfoLevel::AstTypes),
        Some(OptionId::DebugLevelLineTablesOnly) => Some(DebugInfoLevel::LineTables),
        Some(OptionId::DebugLevelDwarfTypes) => Some(DebugInfoLevel::DwarfTypes),
        _ => None,
    };

    let should_verify_requested = options.has_argument(OptionId::VerifyDebugInfo);
    if should_verify_requested && level.is_none() {
        sink.emit(Diagnostic::warning("-verify-debug-info has no effect without any debug info"));
    }
    let should_verify = should_verify_requested && level.is_some();

    let format_given = options.has_argument(OptionId::DebugInfoFormat);
    let format_value = options.get_last_argument(OptionId::DebugInfoFormat);
    if format_given && level.is_none() {
        return Err(DriverError::InvalidArgumentValue {
            option: "-debug-info-format".to_string(),
            value: "requires -g".to_string(),
        });
    }
    let format = match format_value.as_deref() {
        Some("dwarf") | None => DebugInfoFormat::Dwarf,
        Some("codeview") => DebugInfoFormat::CodeView,
        Some(other) => {
            return Err(DriverError::InvalidArgumentValue {
                option: "-debug-info-format".to_string(),
                value: other.to_string(),
            })
        }
    };
    if format == DebugInfoFormat::CodeView
        && matches!(level, Some(DebugInfoLevel::LineTables) | Some(DebugInfoLevel::DwarfTypes))
    {
        return Err(DriverError::ConflictingOptions {
            a: "-debug-info-format=codeview".to_string(),
            b: "-gline-tables-only/-gdwarf-types".to_string(),
        });
    }

    Ok(DebugInfo { format, level, should_verify })
}

fn os_allowed_for_sanitizers(triple: &Triple) -> bool {
    triple.is_darwin()
        || triple.os_family() == Some(OsFamily::Windows)
        || triple.os.to_ascii_lowercase().starts_with("linux")
}

fn validate_sanitizers(
    options: &ParsedOptions,
    triple: &Triple,
    toolchain: &dyn Toolchain,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<String>, DriverError> {
    let requested: Vec<String> = options
        .all_with_id(OptionId::Sanitize)
        .into_iter()
        .filter_map(|o| o.argument.as_single().map(str::to_owned))
        .collect();
    if requested.is_empty() {
        return Ok(Vec::new());
    }
    if !os_allowed_for_sanitizers(triple) {
        return Err(DriverError::InvalidArgumentValue {
            option: "-sanitize".to_string(),
            value: format!("unsupported target {}", triple.as_str()),
        });
    }

    let mut enabled = Vec::new();
    for kind in &requested {
        if toolchain.runtime_library_exists(kind) {
            enabled.push(kind.clone());
        } else {
            sink.emit(Diagnostic::warning(format!("sanitizer '{}' has no runtime on this toolchain", kind)));
        }
    }

    if enabled.iter().any(|k| k == "thread") {
        if !triple.is_64_bit() {
            sink.emit(Diagnostic::error("-sanitize=thread requires a 64-bit target"));
        }
        if enabled.iter().any(|k| k == "address") {
            sink.emit(Diagnostic::error("-sanitize=thread is not allowed with -sanitize=address"));
        }
    }
    if enabled.iter().any(|k| k == "scudo") && enabled.iter().any(|k| k != "scudo" && k != "undefined") {
        sink.emit(Diagnostic::error("-sanitize=scudo is only allowed with itself and -sanitize=undefined"));
    }

    Ok(enabled)
}

const SANITIZER_COVERAGE_MODIFIERS: &[&str] = &[
    "func",
    "bb",
    "edge",
    "indirect-calls",
    "trace-bb",
    "trace-cmp",
    "trace-div",
    "trace-gep",
    "8bit-counters",
    "trace-pc",
    "trace-pc-guard",
    "no-prune",
    "inline-8bit-counters",
    "inline-bool-flag",
];

fn validate_sanitizer_coverage(options: &ParsedOptions, enabled_sanitizers: &[String]) -> Result<(), DriverError> {
    let Some(value) = options.get_last_argument(OptionId::SanitizeCoverage) else {
        return Ok(());
    };
    let parts: Vec<&str> = value.split(',').collect();
    if !parts.iter().any(|p| matches!(*p, "func" | "bb" | "edge")) {
        return Err(DriverError::InvalidArgumentValue { option: "-sanitize-coverage".to_string(), value });
    }
    for p in &parts {
        if !SANITIZER_COVERAGE_MODIFIERS.contains(p) {
            return Err(DriverError::InvalidArgumentValue {
                option: "-sanitize-coverage".to_string(),
                value: (*p).to_string(),
            });
        }
    }
    if enabled_sanitizers.is_empty() {
        return Err(DriverError::InvalidArgumentValue {
            option: "-sanitize-coverage".to_string(),
            value: "requires at least one -sanitize".to_string(),
        });
    }
    Ok(())
}

fn validate_jobs(options: &ParsedOptions, env: &Environment, sink: &dyn DiagnosticSink) -> Result<u32, DriverError> {
    let mut jobs = match options.get_last_argument(OptionId::Jobs) {
        Some(v) => v
            .parse::<u32>()
            .map_err(|_| DriverError::InvalidArgumentValue { option: "-j".to_string(), value: v })?,
        None => 1,
    };
    if jobs < 1 {
        return Err(DriverError::InvalidArgumentValue { option: "-j".to_string(), value: jobs.to_string() });
    }
    if env.is_set_and_nonempty("SWIFTC_MAXIMUM_DETERMINISM") {
        sink.emit(Diagnostic::remark("SWIFTC_MAXIMUM_DETERMINISM forces a single parallel job"));
        jobs = 1;
    }
    Ok(jobs)
}

fn validate_threads(options: &ParsedOptions, mode: &CompilerMode, sink: &dyn DiagnosticSink) -> Result<u32, DriverError> {
    let Some(v) = options.get_last_argument(OptionId::NumThreads) else {
        return Ok(0);
    };
    let threads: i64 = v
        .parse()
        .map_err(|_| DriverError::InvalidArgumentValue { option: "-num-threads".to_string(), value: v.clone() })?;
    if threads < 0 {
        return Err(DriverError::InvalidArgumentValue { option: "-num-threads".to_string(), value: v });
    }
    if mode.is_batch_compile() {
        sink.emit(Diagnostic::warning("-num-threads is ignored in batch mode"));
        return Ok(0);
    }
    Ok(threads as u32)
}

fn validate_filelist_threshold(options: &ParsedOptions, sink: &dyn DiagnosticSink) -> Result<u32, DriverError> {
    if let Some(v) = options.get_last_argument(OptionId::DriverFilelistThreshold) {
        return v
            .parse::<u32>()
            .map_err(|_| DriverError::InvalidArgumentValue { option: "-driver-filelist-threshold".to_string(), value: v });
    }
    if options.has_argument(OptionId::DriverUseFilelists) {
        sink.emit(Diagnostic::warning("-driver-use-filelists is deprecated"));
        return Ok(0);
    }
    Ok(128)
}
