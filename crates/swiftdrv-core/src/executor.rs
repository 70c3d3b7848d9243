//! The `DriverExecutor` capability and a minimal reference implementation.
//!
//! Job construction and the real incremental-aware scheduler are opaque
//! external collaborators; this crate only defines the interface it calls
//! through and a sequential/thread-pool reference implementation honest
//! enough to run the tests and the CLI's default configuration.

use crate::job::{Job, JobKind};
use std::process::Command;
use std::sync::mpsc;
use std::thread;

#[derive(Debug, Clone)]
pub struct JobResult {
    pub success: bool,
    pub code: Option<i32>,
}

/// A set of jobs plus the run-time policy the core hands to an executor.
#[derive(Debug, Clone)]
pub struct Workload {
    pub jobs: Vec<Job>,
    pub num_parallel_jobs: u32,
    pub continue_building_after_errors: bool,
}

pub trait DriverExecutor: Send + Sync {
    fn description(&self, job: &Job) -> String {
        job.rendered_command_line()
    }

    fn execute(&self, job: &Job) -> JobResult;

    fn execute_workload(&self, workload: &Workload) -> Vec<JobResult>;
}

/// Runs jobs with `std::process::Command`, sequentially when
/// `num_parallel_jobs <= 1`, otherwise spread over a fixed-size thread pool.
pub struct InPlaceExecutor;

impl InPlaceExecutor {
    fn run_one(job: &Job) -> JobResult {
        if job.tool.is_empty() {
            return JobResult { success: true, code: Some(0) };
        }
        match Command::new(&job.tool).args(&job.arguments).status() {
            Ok(status) => JobResult { success: status.success(), code: status.code() },
            Err(_) => JobResult { success: false, code: None },
        }
    }
}

impl DriverExecutor for InPlaceExecutor {
    fn execute(&self, job: &Job) -> JobResult {
        if matches!(job.kind, JobKind::VersionRequest) {
            println!("{}", job.rendered_command_line());
        }
        Self::run_one(job)
    }

    fn execute_workload(&self, workload: &Workload) -> Vec<JobResult> {
        if workload.num_parallel_jobs <= 1 {
            let mut results = Vec::with_capacity(workload.jobs.len());
            for job in &workload.jobs {
                let result = Self::run_one(job);
                let failed = !result.success;
                results.push(result);
                if failed && !workload.continue_building_after_errors {
                    break;
                }
            }
            return results;
        }

        let pool_size = workload.num_parallel_jobs as usize;
        let (tx, rx) = mpsc::channel();
        let jobs = workload.jobs.clone();
        thread::scope(|scope| {
            let chunks: Vec<Vec<Job>> = (0..pool_size).map(|_| Vec::new()).collect();
            let mut chunks = chunks;
            for (i, job) in jobs.into_iter().enumerate() {
                chunks[i % pool_size].push(job);
            }
            for (worker_index, chunk) in chunks.into_iter().enumerate() {
                let tx = tx.clone();
                scope.spawn(move || {
                    for (position, job) in chunk.iter().enumerate() {
                        let result = Self::run_one(job);
                        let _ = tx.send((worker_index, position, result));
                    }
                });
            }
        });
        drop(tx);
        let mut received: Vec<(usize, usize, JobResult)> = rx.into_iter().collect();
        received.sort_by_key(|(worker, position, _)| (*worker, *position));
        received.into_iter().map(|(_, _, result)| result).collect()
    }
}
