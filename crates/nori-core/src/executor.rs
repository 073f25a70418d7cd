//! Parallel execution engine
//!
//! Documents are independent: each owns its immutable tree, so files are
//! scanned concurrently with no shared mutable state. The per-file closure
//! does the host fetch (read + parse) up front and runs the rules on the
//! result; diagnostics are collected append-only and sorted afterwards.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Once};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::diagnostics::Diagnostic;
use crate::document::Document;
use crate::error::NoriError;
use crate::result::Result;

/// Initialize the global Rayon thread pool once
static THREAD_POOL_INIT: Once = Once::new();

pub fn init_thread_pool(threads: usize) {
    THREAD_POOL_INIT.call_once(|| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("nori-worker-{index}"))
            .build_global()
            .unwrap_or_else(|e| {
                warn!(
                    "Could not configure global thread pool (may already be initialized): {}",
                    e
                );
            });
        info!("Configured global rayon thread pool with {} threads", threads);
    });
}

/// Cooperative cancellation signal shared across a scan
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Progress reporting callback type
pub type ProgressCallback = Arc<dyn Fn(ProgressInfo) + Send + Sync>;

/// Information about execution progress
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    pub total_files: usize,
    pub completed_files: usize,
    pub current_file: Option<PathBuf>,
    pub elapsed: Duration,
}

/// Outcome for a single file
#[derive(Debug)]
pub struct FileExecutionResult {
    pub file: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    pub error: Option<NoriError>,
}

/// Outcome of a whole scan
#[derive(Debug, Default)]
pub struct ExecutionResult {
    pub files: Vec<FileExecutionResult>,
    pub cancelled: bool,
}

impl ExecutionResult {
    pub fn all_diagnostics(&self) -> Vec<&Diagnostic> {
        self.files.iter().flat_map(|f| f.diagnostics.iter()).collect()
    }

    pub fn total_diagnostics(&self) -> usize {
        self.files.iter().map(|f| f.diagnostics.len()).sum()
    }
}

/// Executor configuration
#[derive(Clone)]
pub struct ExecutorConfig {
    pub threads: usize,
    pub progress: Option<ProgressCallback>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            progress: None,
        }
    }
}

impl std::fmt::Debug for ExecutorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutorConfig")
            .field("threads", &self.threads)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Scan many files in parallel, running `check` on each parsed document.
///
/// `check` must be pure per document (it is called from worker threads).
/// Cancellation is observed between files: remaining files are skipped and
/// the result is marked cancelled. Per-file recoverable errors (parse
/// failures) are recorded on the file's result; a `MalformedTree` from the
/// host aborts the whole scan.
pub fn scan_files<F>(
    files: Vec<PathBuf>,
    config: &ExecutorConfig,
    cancellation: &CancellationToken,
    check: F,
) -> Result<ExecutionResult>
where
    F: Fn(&Document) -> Vec<Diagnostic> + Send + Sync,
{
    init_thread_pool(config.threads);

    let started = Instant::now();
    let total = files.len();
    let completed = Arc::new(std::sync::atomic::AtomicUsize::new(0));

    debug!("scanning {} files", total);

    let results: Vec<Option<FileExecutionResult>> = files
        .into_par_iter()
        .map(|file| {
            if cancellation.is_cancelled() {
                return None;
            }

            let result = match Document::load(&file) {
                Ok(document) => {
                    let mut diagnostics = check(&document);
                    diagnostics.sort_by_key(|d| d.location.offset);
                    FileExecutionResult {
                        file,
                        diagnostics,
                        error: None,
                    }
                }
                Err(error) => FileExecutionResult {
                    file,
                    diagnostics: Vec::new(),
                    error: Some(error),
                },
            };

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(progress) = &config.progress {
                progress(ProgressInfo {
                    total_files: total,
                    completed_files: done,
                    current_file: Some(result.file.clone()),
                    elapsed: started.elapsed(),
                });
            }
            Some(result)
        })
        .collect();

    let mut execution = ExecutionResult::default();
    for result in results {
        match result {
            Some(file_result) => {
                if let Some(error) = &file_result.error
                    && !error.is_recoverable()
                {
                    return Err(NoriError::execution_error(format!(
                        "scan aborted by '{}': {error}",
                        file_result.file.display()
                    )));
                }
                execution.files.push(file_result);
            }
            None => execution.cancelled = true,
        }
    }
    execution.files.sort_by(|a, b| a.file.cmp(&b.file));

    info!(
        "scanned {} files in {:?}, {} diagnostics",
        execution.files.len(),
        started.elapsed(),
        execution.total_diagnostics()
    );
    Ok(execution)
}
