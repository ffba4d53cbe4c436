use crate::config::Config;
use crate::error::{Result, ZipflowError};
use crate::pipeline::records::{LevelRecord, ObjectRecord, SinkMessage};
use crate::pipeline::sink::{RecordSink, SinkSummary};
use crate::pipeline::worker::{ArchiveOutcome, ExtractionWorker};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinSet};
use walkdir::WalkDir;

/// Final accounting for one extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub archives_total: usize,
    pub archives_failed: usize,
    pub documents_decoded: usize,
    pub documents_skipped: usize,
    pub level_rows: u64,
    pub object_rows: u64,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
    pub errors: Vec<String>,
}

/// Orchestrates one extraction run.
///
/// The shutdown protocol is the load-bearing part: both sinks start before
/// any worker, every worker is joined before the end-of-stream marker goes
/// out, and each marker is sent exactly once. Sending the marker while a
/// producer is still pushing would let a sink close with records in flight,
/// which silently loses data.
pub struct PipelineCoordinator {
    archives_dir: PathBuf,
    levels_output: PathBuf,
    objects_output: PathBuf,
    parallelism: usize,
}

impl PipelineCoordinator {
    pub fn new(config: &Config) -> Self {
        Self {
            archives_dir: config.paths.archives_dir.clone(),
            levels_output: config.paths.levels_output.clone(),
            objects_output: config.paths.objects_output.clone(),
            parallelism: num_cpus::get().max(1),
        }
    }

    /// Override the worker pool size. Test seam; the CLI never exposes this.
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Discover input archives: every `.zip` file (case-insensitive) directly
    /// inside the archives directory. An absent directory is fatal; an empty
    /// one yields zero archives and a successful, empty run.
    pub fn discover_archives(&self) -> Result<Vec<PathBuf>> {
        if !self.archives_dir.is_dir() {
            return Err(ZipflowError::NoInputDirectory {
                path: self.archives_dir.display().to_string(),
            });
        }

        let mut archives: Vec<PathBuf> = WalkDir::new(&self.archives_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && is_zip_path(entry.path()))
            .map(|entry| entry.into_path())
            .collect();

        // Deterministic assignment order; completion order stays unspecified.
        archives.sort();
        Ok(archives)
    }

    pub async fn run(
        &self,
        progress_callback: Option<&(dyn Fn(&ArchiveOutcome) + Send + Sync)>,
    ) -> Result<ExtractionReport> {
        let start_time = Instant::now();
        let archives = self.discover_archives()?;

        let (level_tx, level_rx) = mpsc::unbounded_channel::<SinkMessage<LevelRecord>>();
        let (object_tx, object_rx) = mpsc::unbounded_channel::<SinkMessage<Vec<ObjectRecord>>>();

        // Sinks come up before the first worker so no record is ever produced
        // without a consumer.
        let level_sink = RecordSink::open("levels", &self.levels_output, level_rx)?;
        let object_sink = RecordSink::open("objects", &self.objects_output, object_rx)?;
        let level_handle = task::spawn_blocking(move || level_sink.run());
        let object_handle = task::spawn_blocking(move || object_sink.run());

        let semaphore = Arc::new(Semaphore::new(self.parallelism));
        let mut workers: JoinSet<ArchiveOutcome> = JoinSet::new();

        for archive in &archives {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| ZipflowError::Cancelled)?;
            let worker =
                ExtractionWorker::new(archive.clone(), level_tx.clone(), object_tx.clone());

            workers.spawn_blocking(move || {
                let _permit = permit;
                worker.run()
            });
        }

        let mut report = ExtractionReport {
            archives_total: archives.len(),
            archives_failed: 0,
            documents_decoded: 0,
            documents_skipped: 0,
            level_rows: 0,
            object_rows: 0,
            duration: Duration::default(),
            completed_at: Utc::now(),
            errors: Vec::new(),
        };

        // Completion barrier: every worker joins before any marker is sent.
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(outcome) => {
                    report.documents_decoded += outcome.documents_decoded;
                    report.documents_skipped += outcome.documents_skipped;
                    if let Some(ref failure) = outcome.failure {
                        report.archives_failed += 1;
                        report
                            .errors
                            .push(format!("{}: {}", outcome.archive.display(), failure));
                    }
                    if let Some(callback) = progress_callback {
                        callback(&outcome);
                    }
                }
                Err(join_error) => {
                    report.archives_failed += 1;
                    report.errors.push(format!("worker panicked: {}", join_error));
                }
            }
        }

        // Exactly one marker per channel, only now that producers are done.
        level_tx
            .send(SinkMessage::EndOfStream)
            .map_err(|_| ZipflowError::StreamClosed { stream: "levels" })?;
        object_tx
            .send(SinkMessage::EndOfStream)
            .map_err(|_| ZipflowError::StreamClosed { stream: "objects" })?;
        drop(level_tx);
        drop(object_tx);

        let level_summary = join_sink(level_handle).await?;
        let object_summary = join_sink(object_handle).await?;

        report.level_rows = level_summary.rows_written;
        report.object_rows = object_summary.rows_written;
        report.duration = start_time.elapsed();
        report.completed_at = Utc::now();

        Ok(report)
    }
}

async fn join_sink(
    handle: task::JoinHandle<Result<SinkSummary>>,
) -> Result<SinkSummary> {
    handle.await.map_err(|e| ZipflowError::Config {
        message: format!("Sink task failed: {}", e),
    })?
}

fn is_zip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

impl ExtractionReport {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Extraction results:\n  Archives: {} ({} failed)\n  Documents: {} decoded, {} skipped\n  Rows: {} levels, {} objects\n  Duration: {:.2}s\n",
            self.archives_total,
            self.archives_failed,
            self.documents_decoded,
            self.documents_skipped,
            self.level_rows,
            self.object_rows,
            self.duration.as_secs_f64(),
        );

        if !self.errors.is_empty() {
            summary.push_str("  Failures:\n");
            for error in &self.errors {
                summary.push_str(&format!("    {}\n", error));
            }
        }

        summary
    }
}
