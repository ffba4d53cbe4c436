use crate::archive::ArchiveWriter;
use crate::config::Config;
use crate::document::Document;
use crate::error::{Result, ZipflowError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Final accounting for one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub archives_written: usize,
    pub archives_failed: usize,
    pub documents_written: usize,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
    pub errors: Vec<String>,
}

/// Builds the fixed archive population: `archive_count` ZIP files of
/// `documents_per_archive` synthetic documents each.
///
/// Archives are written by independent blocking tasks bounded to available
/// parallelism; one failed archive (disk full, permissions) is recorded and
/// leaves the rest of the population untouched.
pub struct ArchiveGenerator {
    archives_dir: PathBuf,
    archive_count: usize,
    documents_per_archive: usize,
    parallelism: usize,
}

impl ArchiveGenerator {
    pub fn new(config: &Config) -> Self {
        Self {
            archives_dir: config.paths.archives_dir.clone(),
            archive_count: config.population.archive_count,
            documents_per_archive: config.population.documents_per_archive,
            parallelism: num_cpus::get().max(1),
        }
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub async fn run(
        &self,
        progress_callback: Option<&(dyn Fn(&Path) + Send + Sync)>,
    ) -> Result<GenerationReport> {
        let start_time = Instant::now();

        std::fs::create_dir_all(&self.archives_dir)?;

        let semaphore = Arc::new(Semaphore::new(self.parallelism));
        let mut tasks: JoinSet<std::result::Result<PathBuf, (PathBuf, String)>> = JoinSet::new();

        for index in 1..=self.archive_count {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| ZipflowError::Cancelled)?;
            let path = self.archives_dir.join(format!("archive_{}.zip", index));
            let documents = self.documents_per_archive;

            tasks.spawn_blocking(move || {
                let _permit = permit;
                match write_archive(&path, documents) {
                    Ok(()) => Ok(path),
                    Err(e) => Err((path, e.to_string())),
                }
            });
        }

        let mut report = GenerationReport {
            archives_written: 0,
            archives_failed: 0,
            documents_written: 0,
            duration: Duration::default(),
            completed_at: Utc::now(),
            errors: Vec::new(),
        };

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(path)) => {
                    report.archives_written += 1;
                    report.documents_written += self.documents_per_archive;
                    if let Some(callback) = progress_callback {
                        callback(&path);
                    }
                }
                Ok(Err((path, message))) => {
                    report.archives_failed += 1;
                    report
                        .errors
                        .push(format!("{}: {}", path.display(), message));
                }
                Err(join_error) => {
                    report.archives_failed += 1;
                    report
                        .errors
                        .push(format!("generator task panicked: {}", join_error));
                }
            }
        }

        report.duration = start_time.elapsed();
        report.completed_at = Utc::now();

        Ok(report)
    }
}

fn write_archive(path: &Path, documents: usize) -> Result<()> {
    let mut rng = rand::thread_rng();
    let mut writer = ArchiveWriter::create(path)?;

    for index in 1..=documents {
        let document = Document::generate(&mut rng);
        writer.add_member(&format!("doc_{}.json", index), &document.to_bytes())?;
    }

    writer.finish()
}

impl GenerationReport {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Generation results:\n  Archives: {} written, {} failed\n  Documents: {}\n  Duration: {:.2}s\n",
            self.archives_written,
            self.archives_failed,
            self.documents_written,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveReader;
    use tempfile::TempDir;

    fn small_config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.paths.archives_dir = dir.join("archives");
        config.population.archive_count = 3;
        config.population.documents_per_archive = 4;
        config
    }

    #[tokio::test]
    async fn test_population_size_and_member_counts() {
        let temp_dir = TempDir::new().unwrap();
        let config = small_config(temp_dir.path());

        let report = ArchiveGenerator::new(&config)
            .with_parallelism(2)
            .run(None)
            .await
            .unwrap();

        assert_eq!(report.archives_written, 3);
        assert_eq!(report.archives_failed, 0);
        assert_eq!(report.documents_written, 12);

        for index in 1..=3 {
            let path = config
                .paths
                .archives_dir
                .join(format!("archive_{}.zip", index));
            let reader = ArchiveReader::open(&path).unwrap();
            assert_eq!(reader.len(), 4);
        }
    }

    #[tokio::test]
    async fn test_generated_members_decode() {
        let temp_dir = TempDir::new().unwrap();
        let config = small_config(temp_dir.path());

        ArchiveGenerator::new(&config).run(None).await.unwrap();

        let path = config.paths.archives_dir.join("archive_1.zip");
        let mut reader = ArchiveReader::open(&path).unwrap();
        for member in reader.member_names() {
            let bytes = reader.read_member(&member).unwrap();
            let document = Document::from_bytes(&member, &bytes).unwrap();
            assert!(!document.objects.is_empty());
        }
    }
}
