//! Batch processing of independent source files
//!
//! Discovers sources under a directory and runs the full pipeline on each,
//! on scoped worker threads. Runs share only the read-only language profile;
//! each file gets its own logging context so the global error collector can
//! group events per file.

use crate::config::compile_time::batch::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::runtime::LexicalPreferences;
use crate::grammar::LanguageProfile;
use crate::logging::{self, codes};
use crate::pipeline::{self, PipelineError, PipelineResult};
use crate::source::SourceReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Extensions picked up by discovery when none are configured
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "h", "hh", "hpp", "hxx"];

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    /// Stop discovery after this many files
    pub max_files: Option<usize>,
    pub fail_fast: bool,
    /// Extensions to discover, without the dot
    pub extensions: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .min(MAX_WORKER_THREADS),
            recursive: true,
            max_files: None,
            fail_fast: false,
            extensions: DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl BatchConfig {
    /// Worker count clamped to the compile-time ceiling
    pub fn effective_threads(&self) -> usize {
        self.max_threads.clamp(1, MAX_WORKER_THREADS)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

#[derive(Debug, Default)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, PipelineResult)>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    pub files_discovered: usize,
    pub processing_duration: Duration,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files_processed(&self) -> usize {
        self.successful_files.len() + self.failed_files.len()
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn success_rate(&self) -> f64 {
        match self.files_processed() {
            0 => 0.0,
            n => self.success_count() as f64 / n as f64,
        }
    }

    /// Error diagnostics across every successfully read file
    pub fn diagnostic_error_count(&self) -> usize {
        self.successful_files
            .iter()
            .map(|(_, result)| result.error_count())
            .sum()
    }

    /// Whether any file failed to run or produced error diagnostics
    pub fn has_failures(&self) -> bool {
        !self.failed_files.is_empty() || self.diagnostic_error_count() > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch complete: {} files processed, {} successful ({:.1}%), {} failed, {} error diagnostics, {:.2}s total",
            self.files_processed(),
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.diagnostic_error_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No source files found in directory: {path}")]
    NoInputFiles { path: String },

    #[error("Too many files found: {count} (max: {max})")]
    TooManyFiles { count: usize, max: usize },

    #[error("Error during directory traversal: {message}")]
    Walk { message: String },

    #[error("A batch worker thread panicked")]
    WorkerPanicked,
}

impl BatchError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            BatchError::DirectoryNotFound { .. } => codes::source::INVALID_PATH,
            BatchError::NoInputFiles { .. } => codes::batch::NO_INPUT_FILES,
            BatchError::TooManyFiles { .. } => codes::batch::TOO_MANY_FILES,
            BatchError::Walk { .. } => codes::batch::DIRECTORY_WALK_ERROR,
            BatchError::WorkerPanicked => codes::batch::WORKER_FAILURE,
        }
    }
}

/// Source files under `dir_path`, sorted for a deterministic order
pub fn discover_sources(dir_path: &Path, config: &BatchConfig) -> Result<Vec<PathBuf>, BatchError> {
    if !dir_path.is_dir() {
        let error = BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        };
        crate::log_error!(error.error_code(), "Batch input is not a directory",
            "directory" => dir_path.display()
        );
        return Err(error);
    }

    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(dir_path)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let error = BatchError::Walk {
                message: e.to_string(),
            };
            crate::log_error!(error.error_code(), "Directory traversal failed",
                "directory" => dir_path.display(),
                "error" => e
            );
            error
        })?;

        if entry.file_type().is_file() && config.matches_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        let error = BatchError::NoInputFiles {
            path: dir_path.display().to_string(),
        };
        crate::log_error!(error.error_code(), "No source files found",
            "directory" => dir_path.display(),
            "extensions" => config.extensions.join(",")
        );
        return Err(error);
    }

    if let Some(limit) = config.max_files {
        if files.len() > limit {
            crate::log_warning!("Reached maximum file limit",
                "files_found" => files.len(),
                "limit" => limit
            );
            files.truncate(limit);
        }
    }

    if files.len() > MAX_FILES_PER_BATCH {
        let error = BatchError::TooManyFiles {
            count: files.len(),
            max: MAX_FILES_PER_BATCH,
        };
        crate::log_error!(error.error_code(), "Batch exceeds compile-time file limit",
            "files_found" => files.len(),
            "max" => MAX_FILES_PER_BATCH
        );
        return Err(error);
    }

    crate::log_debug!("File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );
    Ok(files)
}

/// Discover and process every source file under `dir_path`
pub fn process_directory(
    dir_path: &Path,
    config: &BatchConfig,
    profile: &LanguageProfile,
) -> Result<BatchResults, BatchError> {
    crate::log_info!("Starting batch processing",
        "directory" => dir_path.display(),
        "recursive" => config.recursive,
        "threads" => config.effective_threads()
    );
    let files = discover_sources(dir_path, config)?;
    process_files(&files, config, profile)
}

type FileOutcome = (usize, PathBuf, Result<PipelineResult, PipelineError>);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Process `files`, each in full isolation, on up to `max_threads` workers
pub fn process_files(
    files: &[PathBuf],
    config: &BatchConfig,
    profile: &LanguageProfile,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    let reader = SourceReader::new();
    let preferences = LexicalPreferences::default();
    let threads = config.effective_threads().min(files.len()).max(1);

    let next_file = AtomicUsize::new(0);
    let stop = AtomicBool::new(false);
    let outcomes: Mutex<Vec<FileOutcome>> = Mutex::new(Vec::with_capacity(files.len()));

    let worker = || {
        while !stop.load(Ordering::Relaxed) {
            let file_id = next_file.fetch_add(1, Ordering::Relaxed);
            let Some(path) = files.get(file_id) else {
                break;
            };

            let outcome = logging::with_file_context(path.clone(), file_id, || {
                pipeline::process_file_with(path, &reader, profile, &preferences)
            });
            if outcome.is_err() && config.fail_fast {
                stop.store(true, Ordering::Relaxed);
            }
            lock(&outcomes).push((file_id, path.clone(), outcome));
        }
    };

    let panicked = thread::scope(|scope| {
        let handles: Vec<_> = (0..threads).map(|_| scope.spawn(worker)).collect();
        handles
            .into_iter()
            .map(|handle| handle.join())
            .filter(Result::is_err)
            .count()
    });
    if panicked > 0 {
        crate::log_error!(codes::batch::WORKER_FAILURE, "Batch worker panicked",
            "workers" => panicked
        );
        return Err(BatchError::WorkerPanicked);
    }

    let mut outcomes = outcomes.into_inner().unwrap_or_else(|e| e.into_inner());
    outcomes.sort_by_key(|(file_id, _, _)| *file_id);

    let mut results = BatchResults {
        files_discovered: files.len(),
        ..BatchResults::default()
    };
    for (_, path, outcome) in outcomes {
        match outcome {
            Ok(result) => results.successful_files.push((path, result)),
            Err(error) => results.failed_files.push((path, error)),
        }
    }
    if config.fail_fast && results.failure_count() > 0 {
        crate::log_warning!("Fail-fast stopped the batch early",
            "processed" => results.files_processed(),
            "discovered" => results.files_discovered
        );
    }
    results.processing_duration = start_time.elapsed();

    crate::log_performance!(codes::success::BATCH_COMPLETE, "Batch processing complete",
        duration = results.processing_duration,
        "files_processed" => results.files_processed(),
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "threads_used" => threads
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    fn config(threads: usize) -> BatchConfig {
        BatchConfig {
            max_threads: threads,
            ..BatchConfig::default()
        }
    }

    #[test]
    fn test_discovery_filters_and_sorts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.cpp"), "int b;").unwrap();
        fs::write(dir.path().join("a.h"), "int a;").unwrap();
        fs::write(dir.path().join("notes.txt"), "text").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.cc"), "int c;").unwrap();

        let files = discover_sources(dir.path(), &config(1)).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.h", "b.cpp", "c.cc"]);

        let flat = BatchConfig {
            recursive: false,
            ..config(1)
        };
        assert_eq!(discover_sources(dir.path(), &flat).unwrap().len(), 2);
    }

    #[test]
    fn test_discovery_errors() {
        let dir = tempdir().unwrap();
        assert_matches!(
            discover_sources(dir.path(), &config(1)),
            Err(BatchError::NoInputFiles { .. })
        );
        assert_matches!(
            discover_sources(&dir.path().join("missing"), &config(1)),
            Err(BatchError::DirectoryNotFound { .. })
        );
    }

    #[test]
    fn test_max_files_truncates() {
        let dir = tempdir().unwrap();
        for i in 0..5 {
            fs::write(dir.path().join(format!("f{}.cpp", i)), "x;").unwrap();
        }
        let limited = BatchConfig {
            max_files: Some(3),
            ..config(1)
        };
        assert_eq!(discover_sources(dir.path(), &limited).unwrap().len(), 3);
    }

    #[test]
    fn test_parallel_runs_are_isolated_and_ordered() {
        let dir = tempdir().unwrap();
        for i in 0..6 {
            fs::write(
                dir.path().join(format!("f{}.cpp", i)),
                format!("int v{} = {};", i, i),
            )
            .unwrap();
        }

        let results = process_directory(dir.path(), &config(3), &LanguageProfile::cpp()).unwrap();
        assert_eq!(results.success_count(), 6);
        assert_eq!(results.failure_count(), 0);
        assert!(!results.has_failures());

        for (i, (path, result)) in results.successful_files.iter().enumerate() {
            assert!(path.ends_with(format!("f{}.cpp", i)));
            assert_eq!(result.final_text(), format!("int v{} = {};", i, i));
        }
    }

    #[test]
    fn test_failures_are_reported_per_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("good.cpp"), "int x;").unwrap();
        fs::write(dir.path().join("bad.cpp"), [0xFFu8, 0xFE]).unwrap();

        let results = process_directory(dir.path(), &config(2), &LanguageProfile::cpp()).unwrap();
        assert_eq!(results.success_count(), 1);
        assert_eq!(results.failure_count(), 1);
        assert!(results.failed_files[0].0.ends_with("bad.cpp"));
        assert!(results.has_failures());
    }

    #[test]
    fn test_fail_fast_stops_sequential_batch() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.cpp"), [0xFFu8]).unwrap();
        fs::write(dir.path().join("b.cpp"), "int b;").unwrap();

        let fail_fast = BatchConfig {
            fail_fast: true,
            ..config(1)
        };
        let results = process_directory(dir.path(), &fail_fast, &LanguageProfile::cpp()).unwrap();
        assert_eq!(results.files_processed(), 1);
        assert_eq!(results.files_discovered, 2);
    }

    #[test]
    fn test_error_diagnostics_count_as_failures() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.cpp"), "x = @;").unwrap();

        let results = process_directory(dir.path(), &config(1), &LanguageProfile::cpp()).unwrap();
        assert_eq!(results.success_count(), 1);
        assert_eq!(results.diagnostic_error_count(), 1);
        assert!(results.has_failures());
    }
}
