//! Run Dispatcher (§4.10): the terminal cascade that turns a planned job
//! list into print output, an in-place run, or a submitted workload.

use crate::executor::{DriverExecutor, Workload};
use crate::job::{Job, JobKind};
use serde::{Deserialize, Serialize};
use swiftdrv_common::{Diagnostic, DiagnosticSink, VirtualPath};
use swiftdrv_options::{OptionId, ParsedOptions};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub tool: String,
    pub arguments: Vec<String>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRecord {
    pub jobs: Vec<JobRecord>,
    pub skipped_inputs: Vec<VirtualPath>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    PrintedJobs(Vec<String>),
    PrintedBindings(Vec<String>),
    PrintedActions(Vec<String>),
    PrintedGraphviz(String),
    Ran,
}

pub fn dispatch(
    jobs: &[Job],
    options: &ParsedOptions,
    num_parallel_jobs: u32,
    continue_building_after_errors: bool,
    executor: &dyn DriverExecutor,
    sink: &dyn DiagnosticSink,
) -> (DispatchOutcome, Option<BuildRecord>) {
    if options.has_argument(OptionId::Verbose) {
        sink.emit(Diagnostic::note("swiftdrv-driver version 1.0"));
    }

    if options.has_argument(OptionId::DriverPrintJobs) {
        return (DispatchOutcome::PrintedJobs(jobs.iter().map(|j| j.rendered_command_line()).collect()), None);
    }

    if options.has_argument(OptionId::DriverPrintBindings) {
        let lines = jobs
            .iter()
            .map(|j| {
                let inputs: Vec<String> = j.inputs.iter().map(|i| format!("{:?}", i.file)).collect();
                let output = j
                    .outputs
                    .first()
                    .map(|o| format!("{{type: {:?}, path: {:?}}}", o.file_type, o.file))
                    .unwrap_or_else(|| "{}".to_string());
                format!("\"{}\" - \"{}\", inputs: [{}], output: {}", kind_label(&j.kind), j.tool, inputs.join(", "), output)
            })
            .collect();
        return (DispatchOutcome::PrintedBindings(lines), None);
    }

    if options.has_argument(OptionId::DriverPrintActions) {
        return (DispatchOutcome::PrintedActions(render_actions(jobs)), None);
    }

    if options.has_argument(OptionId::DriverPrintGraphviz) {
        return (DispatchOutcome::PrintedGraphviz(render_graphviz(jobs)), None);
    }

    let run_in_place = jobs.len() == 1
        && (jobs[0].requests_in_place_execution()
            || (!options.has_argument(OptionId::ParseableOutput) && !options.has_argument(OptionId::DriverShowJobLifecycle)));

    let results = if run_in_place {
        jobs.iter().map(|j| executor.execute(j)).collect::<Vec<_>>()
    } else {
        let workload = Workload { jobs: jobs.to_vec(), num_parallel_jobs, continue_building_after_errors };
        executor.execute_workload(&workload)
    };

    let build_record = if options.has_argument(OptionId::DriverShowJobLifecycle) {
        Some(BuildRecord {
            jobs: jobs
                .iter()
                .zip(results.iter())
                .map(|(j, r)| JobRecord { tool: j.tool.clone(), arguments: j.arguments.clone(), success: r.success })
                .collect(),
            skipped_inputs: Vec::new(),
        })
    } else {
        None
    };

    if options.has_argument(OptionId::DriverWarnUnusedOptions) {
        for unused in options.unconsumed() {
            sink.emit(Diagnostic::warning(format!("option at index {} was never used", unused.index)));
        }
    }

    (DispatchOutcome::Ran, build_record)
}

fn kind_label(kind: &JobKind) -> &str {
    match kind {
        JobKind::Compile => "compile",
        JobKind::Link => "link",
        JobKind::MergeModule => "merge-module",
        JobKind::ModuleWrap => "modulewrap",
        JobKind::GenerateDsym => "generate-dSYM",
        JobKind::VersionRequest => "version-request",
        JobKind::Other(label) => label,
    }
}

fn render_actions(jobs: &[Job]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut next_id = 0u32;
    let mut seen_inputs = std::collections::HashMap::new();
    for job in jobs {
        let mut input_ids = Vec::new();
        for input in &job.inputs {
            let key = format!("{:?}", input.file);
            let id = *seen_inputs.entry(key.clone()).or_insert_with(|| {
                let id = next_id;
                next_id += 1;
                lines.push(format!("{}: input, \"{}\", {:?}", id, key, input.file_type));
                id
            });
            input_ids.push(id.to_string());
        }
        let job_id = next_id;
        next_id += 1;
        let out_type = job.outputs.first().map(|o| format!("{:?}", o.file_type)).unwrap_or_else(|| "none".to_string());
        lines.push(format!("{}: {}, {{{}}}, {}", job_id, kind_label(&job.kind), input_ids.join(", "), out_type));
    }
    lines
}

fn render_graphviz(jobs: &[Job]) -> String {
    let mut dot = String::from("digraph Jobs {\n");
    for (i, job) in jobs.iter().enumerate() {
        dot.push_str(&format!("  \"{}\" [label=\"{}\"];\n", i, kind_label(&job.kind)));
    }
    dot.push_str("}\n");
    dot
}
