//! The `Driver` aggregate: wires C2 through C12 into the single
//! construct-once, run-at-most-once value described in §3.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use swiftdrv_common::{Diagnostic, DiagnosticSink, Environment, FileType, TypedVirtualPath, VirtualPath};
use swiftdrv_options::{expand_response_files, parse, OptionId, ParsedOptions, ResponseFileReader};
use swiftdrv_toolchain::{acquire_target_info, select_toolchain, FrontendTargetInfo, ProcessRunner, TargetInfoRequest, Toolchain};

use crate::dispatcher::{dispatch, BuildRecord, DispatchOutcome};
use crate::error::DriverError;
use crate::executor::DriverExecutor;
use crate::invocation::{classify_invocation, InvocationMode};
use crate::inputs::collect_inputs;
use crate::job::Job;
use crate::mode_resolver::{resolve_compiler_mode, resolve_driver_kind};
use crate::module_info::plan_module_info;
use crate::mtime::{snapshot, RecordedInputModificationDates};
use crate::output_file_map::OutputFileMap;
use crate::supplementary_outputs::{plan_bridging_pch, plan_supplementary_outputs, resolve_primary_output, SupplementaryOutputPaths};
use crate::types::{CompilerMode, DriverKind, ModuleOutputInfo};
use crate::validators::{validate, ValidatedOptions};

/// The fully-elaborated description of one invocation, ready for `run`.
pub struct Driver {
    pub parsed_options: ParsedOptions,
    pub driver_kind: DriverKind,
    pub mode: CompilerMode,
    pub inputs: Vec<TypedVirtualPath>,
    pub recorded_input_modification_dates: RecordedInputModificationDates,
    pub target_info: Option<FrontendTargetInfo>,
    pub module_info: ModuleOutputInfo,
    pub supplementary_outputs: SupplementaryOutputPaths,
    pub bridging_pch: Option<VirtualPath>,
    pub validated: ValidatedOptions,
    sink: Arc<dyn DiagnosticSink>,
    executor: Arc<dyn DriverExecutor>,
}

impl Driver {
    /// Run the full invocation-to-plan pipeline described in §3's data
    /// flow, up to (but not including) job execution.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        argv: &[String],
        env: &Environment,
        sink: Arc<dyn DiagnosticSink>,
        executor: Arc<dyn DriverExecutor>,
        response_file_fs: &dyn ResponseFileReader,
        process_runner: &dyn ProcessRunner,
    ) -> Result<Driver, DriverError> {
        tracing::debug!(argc = argv.len(), "constructing driver");
        let (invocation_mode, rewritten_argv) = classify_invocation(argv);
        let is_repl = match invocation_mode {
            InvocationMode::Subcommand { name } => return Err(DriverError::SubcommandPassedToDriver(name)),
            InvocationMode::Normal { is_repl } => is_repl,
        };

        let basename = argv
            .first()
            .map(|a| Path::new(a).file_name().and_then(|n| n.to_str()).unwrap_or(a).to_string())
            .unwrap_or_default();

        let expanded = expand_response_files(&rewritten_argv[1..], sink.as_ref(), response_file_fs);
        let parse_result = parse(&expanded)?;
        let options = parse_result.options;
        for unknown in &parse_result.unknown {
            sink.emit(Diagnostic::warning(format!("unknown argument '{}'", unknown)));
        }

        let driver_kind = resolve_driver_kind(&basename, &options)?;
        let has_inputs = !parse_result.inputs.is_empty();
        let mode = if is_repl {
            CompilerMode::Repl
        } else {
            resolve_compiler_mode(driver_kind, &options, has_inputs, sink.as_ref())?
        };

        let inputs = collect_inputs(&parse_result.inputs);
        if inputs.is_empty() && !matches!(mode, CompilerMode::Repl) {
            return Err(DriverError::NoInputFiles);
        }

        let output_map = match options.get_last_argument(OptionId::OutputFileMap) {
            Some(path) => {
                let loaded = OutputFileMap::load(Path::new(&path))?;
                loaded.resolve_relative_paths(env.cwd())
            }
            None => OutputFileMap::default(),
        };

        let target_info = Self::acquire_target_info(&options, env, &mode, process_runner, sink.as_ref())?;

        let triple = target_info
            .as_ref()
            .and_then(|info| swiftdrv_toolchain::Triple::parse(&info.target.triple))
            .or_else(|| swiftdrv_toolchain::Triple::parse(&Self::host_triple(env)))
            .ok_or_else(|| DriverError::InvalidArgumentValue {
                option: "-target".to_string(),
                value: "unresolvable target triple".to_string(),
            })?;
        let toolchain = select_toolchain(&triple)?;

        let validated = validate(&options, &mode, &triple, toolchain.as_ref(), env, sink.as_ref())?;

        let explicit_output = options.get_last_argument(OptionId::Output).map(VirtualPath::from_string);
        let primary = resolve_primary_output(driver_kind, &mode, &options, sink.as_ref())?;

        let module_info = plan_module_info(
            &mode,
            &options,
            &validated.debug_info,
            &primary,
            explicit_output.as_ref(),
            &inputs,
            matches!(mode, CompilerMode::Repl),
            sink.as_ref(),
        )?;

        let mut supplementary_outputs = plan_supplementary_outputs(
            &options,
            &mode,
            &output_map,
            explicit_output.as_ref(),
            &primary,
            &module_info.name,
            env,
        );

        if let crate::types::ModuleOutputKind::TopLevel(module_path) = &module_info.output {
            if supplementary_outputs.module_doc.is_none() && options.has_argument(OptionId::EmitModuleDoc) {
                supplementary_outputs.module_doc =
                    Some(crate::supplementary_outputs::place_adjacent_to_module(module_path, FileType::SwiftDocumentation));
            }
            if supplementary_outputs.module_source_info.is_none()
                && options.has_argument(OptionId::EmitModuleSourceInfo)
                && !options.has_argument(OptionId::AvoidEmitModuleSourceInfo)
            {
                supplementary_outputs.module_source_info =
                    Some(crate::supplementary_outputs::place_adjacent_to_module(module_path, FileType::SwiftSourceInfoFile));
            }
        }

        let bridging_pch = plan_bridging_pch(&options, &mode, &output_map);

        let recorded_input_modification_dates = snapshot(&inputs);

        Ok(Driver {
            parsed_options: options,
            driver_kind,
            mode,
            inputs,
            recorded_input_modification_dates,
            target_info,
            module_info,
            supplementary_outputs,
            bridging_pch,
            validated,
            sink,
            executor,
        })
    }

    fn acquire_target_info(
        options: &ParsedOptions,
        env: &Environment,
        mode: &CompilerMode,
        process_runner: &dyn ProcessRunner,
        sink: &dyn DiagnosticSink,
    ) -> Result<Option<FrontendTargetInfo>, DriverError> {
        let target = options.get_last_argument(OptionId::Target);
        let target_variant = options.get_last_argument(OptionId::TargetVariant);
        let resource_dir = options.get_last_argument(OptionId::ResourceDir);
        let runtime_compatibility_version = options.get_last_argument(OptionId::RuntimeCompatibilityVersion);
        // The reduced option table in this crate does not model
        // `-static-resource-dir` separately; it always resolves to false.
        let use_static_resource_dir = false;

        let triple_str = target.clone().unwrap_or_else(|| Self::host_triple(env));
        let Some(triple) = swiftdrv_toolchain::Triple::parse(&triple_str) else {
            return Err(DriverError::InvalidArgumentValue { option: "-target".to_string(), value: triple_str });
        };
        let toolchain = select_toolchain(&triple)?;

        let sdk = Self::resolve_sdk(options, env, mode, toolchain.as_ref(), sink);

        let override_spelling = options.get_last_argument(OptionId::DriverUseFrontendPath);
        let (frontend_path, prefix_args) = match &override_spelling {
            Some(spelling) => {
                let mut segments = spelling.split(';');
                let command = segments.next().unwrap_or_default();
                if !Path::new(command).is_absolute() {
                    return Err(DriverError::RelativeFrontendPath(command.to_string()));
                }
                (PathBuf::from(command), segments.map(str::to_string).collect::<Vec<_>>())
            }
            None => (PathBuf::from("swift-frontend"), Vec::new()),
        };

        let request = TargetInfoRequest {
            target: target.clone(),
            target_variant,
            sdk,
            resource_dir,
            runtime_compatibility_version: runtime_compatibility_version.clone(),
            use_static_resource_dir,
        };

        let mut info = acquire_target_info(toolchain.as_ref(), &frontend_path, &prefix_args, &request, process_runner)?;

        if let Some(version) = runtime_compatibility_version {
            info = info.with_runtime_compatibility_override(&version);
        }

        if let Some(declared) = target.as_ref().map(|t| t.as_str()) {
            if let Some(declared_triple) = swiftdrv_toolchain::Triple::parse(declared) {
                let inferred_is_simulator = swiftdrv_toolchain::Triple::parse(&info.target.triple)
                    .map(|t| t.is_simulator())
                    .unwrap_or(false);
                if !declared_triple.is_simulator() && inferred_is_simulator {
                    sink.emit(Diagnostic::warning(format!(
                        "requested target '{}' but frontend inferred a simulator target '{}'",
                        declared, info.target.triple
                    )));
                }
            }
        }

        Ok(Some(info))
    }

    fn host_triple(env: &Environment) -> String {
        env.get("SWIFTDRV_HOST_TRIPLE").map(str::to_string).unwrap_or_else(|| "x86_64-unknown-linux-gnu".to_string())
    }

    /// SDK resolution (§4.6): `-sdk`, then `SDKROOT`, then the toolchain's
    /// own default (only for `immediate`/`repl`, where there is no build
    /// system to have set one). An explicit empty `-sdk` clears the SDK
    /// outright rather than falling through. A trailing `/` is stripped; a
    /// nonexistent path is kept but warned about.
    fn resolve_sdk(
        options: &ParsedOptions,
        env: &Environment,
        mode: &CompilerMode,
        toolchain: &dyn Toolchain,
        sink: &dyn DiagnosticSink,
    ) -> Option<String> {
        let candidate = match options.get_last_argument(OptionId::Sdk) {
            Some(sdk) if sdk.is_empty() => return None,
            Some(sdk) => Some(sdk),
            None if env.is_set_and_nonempty("SDKROOT") => env.get("SDKROOT").map(str::to_string),
            None if matches!(mode, CompilerMode::Immediate | CompilerMode::Repl) => {
                toolchain.default_sdk_path().map(|p| p.to_string_lossy().into_owned())
            }
            None => None,
        }?;

        let trimmed = candidate.strip_suffix('/').unwrap_or(&candidate).to_string();

        if !Path::new(&trimmed).exists() {
            sink.emit(Diagnostic::warning(format!("SDK path '{}' does not exist", trimmed)));
        }

        Some(trimmed)
    }

    /// Run the given (externally-planned) jobs through the dispatcher.
    /// Called at most once per `Driver`.
    pub fn run(&self, jobs: &[Job]) -> Option<BuildRecord> {
        let (outcome, record) = dispatch(
            jobs,
            &self.parsed_options,
            self.validated.num_parallel_jobs,
            self.validated.continue_building_after_errors,
            self.executor.as_ref(),
            self.sink.as_ref(),
        );
        if let DispatchOutcome::PrintedJobs(lines)
        | DispatchOutcome::PrintedBindings(lines)
        | DispatchOutcome::PrintedActions(lines) = &outcome
        {
            for line in lines {
                println!("{}", line);
            }
        }
        if let DispatchOutcome::PrintedGraphviz(dot) = &outcome {
            println!("{}", dot);
        }
        record
    }

    pub fn diagnostics_sink(&self) -> &dyn DiagnosticSink {
        self.sink.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swiftdrv_common::CollectingDiagnosticSink;
    use swiftdrv_options::{Argument, RealFileSystem};
    use swiftdrv_toolchain::{FakeProcessRunner, GenericUnixToolchain};

    fn target_info_json() -> String {
        r#"{"target": {"triple": "x86_64-unknown-linux-gnu"}, "compilerVersion": "test"}"#.to_string()
    }

    fn opt(id: OptionId, arg: Argument, index: usize) -> swiftdrv_options::ParsedOption {
        swiftdrv_options::ParsedOption { id, argument: arg, index }
    }

    #[test]
    fn host_triple_honors_environment_override() {
        let env = Environment::for_test("/tmp").with_var("SWIFTDRV_HOST_TRIPLE", "aarch64-apple-darwin");
        assert_eq!(Driver::host_triple(&env), "aarch64-apple-darwin");
    }

    #[test]
    fn host_triple_falls_back_when_unset() {
        let env = Environment::for_test("/tmp");
        assert_eq!(Driver::host_triple(&env), "x86_64-unknown-linux-gnu");
    }

    #[test]
    fn explicit_sdk_flag_wins_over_sdkroot() {
        let bag = ParsedOptions::new(vec![opt(OptionId::Sdk, Argument::Single("/explicit/sdk".into()), 0)]);
        let env = Environment::for_test("/tmp").with_var("SDKROOT", "/env/sdk");
        let tc = GenericUnixToolchain;
        let sink = CollectingDiagnosticSink::new();
        let sdk = Driver::resolve_sdk(&bag, &env, &CompilerMode::StandardCompile, &tc, &sink);
        assert_eq!(sdk.as_deref(), Some("/explicit/sdk"));
    }

    #[test]
    fn empty_sdk_flag_clears_rather_than_falling_through() {
        let bag = ParsedOptions::new(vec![opt(OptionId::Sdk, Argument::Single(String::new()), 0)]);
        let env = Environment::for_test("/tmp").with_var("SDKROOT", "/env/sdk");
        let tc = GenericUnixToolchain;
        let sink = CollectingDiagnosticSink::new();
        let sdk = Driver::resolve_sdk(&bag, &env, &CompilerMode::StandardCompile, &tc, &sink);
        assert_eq!(sdk, None);
    }

    #[test]
    fn sdkroot_is_used_when_no_explicit_flag() {
        let bag = ParsedOptions::new(vec![]);
        let env = Environment::for_test("/tmp").with_var("SDKROOT", "/env/sdk/");
        let tc = GenericUnixToolchain;
        let sink = CollectingDiagnosticSink::new();
        let sdk = Driver::resolve_sdk(&bag, &env, &CompilerMode::StandardCompile, &tc, &sink);
        assert_eq!(sdk.as_deref(), Some("/env/sdk"));
    }

    #[test]
    fn toolchain_default_only_applies_in_immediate_and_repl_modes() {
        let bag = ParsedOptions::new(vec![]);
        let env = Environment::for_test("/tmp");
        let tc = GenericUnixToolchain;
        let sink = CollectingDiagnosticSink::new();
        assert_eq!(Driver::resolve_sdk(&bag, &env, &CompilerMode::StandardCompile, &tc, &sink), None);
        // GenericUnixToolchain has no default SDK path, so Repl mode still yields None here;
        // the branch selection itself (not a concrete path) is what this asserts indirectly
        // via the StandardCompile case never consulting the toolchain default.
    }

    #[test]
    fn nonexistent_sdk_path_is_kept_with_a_warning() {
        let bag = ParsedOptions::new(vec![opt(OptionId::Sdk, Argument::Single("/no/such/sdk".into()), 0)]);
        let env = Environment::for_test("/tmp");
        let tc = GenericUnixToolchain;
        let sink = CollectingDiagnosticSink::new();
        let sdk = Driver::resolve_sdk(&bag, &env, &CompilerMode::StandardCompile, &tc, &sink);
        assert_eq!(sdk.as_deref(), Some("/no/such/sdk"));
        assert!(!sink.diagnostics().is_empty());
    }

    #[test]
    fn constructs_a_standard_compile_driver() {
        let env = Environment::for_test("/project");
        let sink: Arc<dyn DiagnosticSink> = Arc::new(CollectingDiagnosticSink::new());
        let executor: Arc<dyn DriverExecutor> = Arc::new(crate::executor::InPlaceExecutor);
        let fs = RealFileSystem;
        let runner = FakeProcessRunner {
            output: Ok(swiftdrv_toolchain::ProcessOutput {
                success: true,
                code: Some(0),
                stdout: target_info_json(),
                stderr: String::new(),
            }),
        };
        let argv = vec!["swiftc".to_string(), "main.swift".to_string(), "-c".to_string()];
        let driver = Driver::new(&argv, &env, sink, executor, &fs, &runner).unwrap();
        assert_eq!(driver.inputs.len(), 1);
        assert_eq!(driver.driver_kind, DriverKind::Batch);
    }

    #[test]
    fn s1_subcommand_dispatch_is_rejected() {
        let env = Environment::for_test("/project");
        let sink: Arc<dyn DiagnosticSink> = Arc::new(CollectingDiagnosticSink::new());
        let executor: Arc<dyn DriverExecutor> = Arc::new(crate::executor::InPlaceExecutor);
        let fs = RealFileSystem;
        let runner = FakeProcessRunner {
            output: Ok(swiftdrv_toolchain::ProcessOutput { success: true, code: Some(0), stdout: target_info_json(), stderr: String::new() }),
        };
        let argv = vec!["swift".to_string(), "package".to_string(), "build".to_string()];
        let result = Driver::new(&argv, &env, sink, executor, &fs, &runner);
        assert!(matches!(result, Err(DriverError::SubcommandPassedToDriver(_))));
    }

    #[test]
    fn no_input_files_is_an_error() {
        let env = Environment::for_test("/project");
        let sink: Arc<dyn DiagnosticSink> = Arc::new(CollectingDiagnosticSink::new());
        let executor: Arc<dyn DriverExecutor> = Arc::new(crate::executor::InPlaceExecutor);
        let fs = RealFileSystem;
        let runner = FakeProcessRunner {
            output: Ok(swiftdrv_toolchain::ProcessOutput { success: true, code: Some(0), stdout: target_info_json(), stderr: String::new() }),
        };
        let argv = vec!["swiftc".to_string(), "-c".to_string()];
        let result = Driver::new(&argv, &env, sink, executor, &fs, &runner);
        assert!(matches!(result, Err(DriverError::NoInputFiles)));
    }
}
