use crate::archive::ArchiveReader;
use crate::document::Document;
use crate::error::{Result, ZipflowError};
use crate::pipeline::records::{LevelRecord, ObjectRecord, SinkMessage};
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;

/// Per-archive result reported back to the coordinator.
///
/// A worker never propagates its failure into the pool: whatever happens to
/// the archive, the unit of work completes and the completion barrier is not
/// stalled.
#[derive(Debug)]
pub struct ArchiveOutcome {
    pub archive: PathBuf,
    pub documents_decoded: usize,
    pub documents_skipped: usize,
    pub level_rows: u64,
    pub object_rows: u64,
    pub failure: Option<String>,
}

impl ArchiveOutcome {
    fn empty(archive: PathBuf) -> Self {
        Self {
            archive,
            documents_decoded: 0,
            documents_skipped: 0,
            level_rows: 0,
            object_rows: 0,
            failure: None,
        }
    }
}

/// Processes one archive: decode every member sequentially, push one
/// `LevelRecord` and one batch of `ObjectRecord`s per document.
///
/// Documents within the archive are handled strictly one at a time (decode,
/// project, push, next) to bound memory; parallelism lives across archives,
/// never inside one.
pub struct ExtractionWorker {
    archive: PathBuf,
    levels: UnboundedSender<SinkMessage<LevelRecord>>,
    objects: UnboundedSender<SinkMessage<Vec<ObjectRecord>>>,
}

impl ExtractionWorker {
    pub fn new(
        archive: PathBuf,
        levels: UnboundedSender<SinkMessage<LevelRecord>>,
        objects: UnboundedSender<SinkMessage<Vec<ObjectRecord>>>,
    ) -> Self {
        Self {
            archive,
            levels,
            objects,
        }
    }

    /// Runs to completion on a blocking thread and always returns an outcome.
    pub fn run(self) -> ArchiveOutcome {
        let mut outcome = ArchiveOutcome::empty(self.archive.clone());

        if let Err(e) = self.process(&mut outcome) {
            outcome.failure = Some(e.to_string());
        }

        outcome
    }

    fn process(&self, outcome: &mut ArchiveOutcome) -> Result<()> {
        let mut reader = ArchiveReader::open(&self.archive)?;

        for member in reader.member_names() {
            let bytes = match reader.read_member(&member) {
                Ok(bytes) => bytes,
                Err(ZipflowError::MemberMissing { .. }) => {
                    // Listed a moment ago but unreadable now; skip it like a
                    // malformed document rather than failing the archive.
                    outcome.documents_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match Document::from_bytes(&member, &bytes) {
                Ok(document) => self.emit(&document, outcome)?,
                Err(_) => outcome.documents_skipped += 1,
            }
        }

        Ok(())
    }

    fn emit(&self, document: &Document, outcome: &mut ArchiveOutcome) -> Result<()> {
        self.levels
            .send(SinkMessage::Record(LevelRecord::from_document(document)))
            .map_err(|_| ZipflowError::StreamClosed { stream: "levels" })?;
        outcome.level_rows += 1;

        let objects = ObjectRecord::from_document(document);
        outcome.object_rows += objects.len() as u64;
        self.objects
            .send(SinkMessage::Record(objects))
            .map_err(|_| ZipflowError::StreamClosed { stream: "objects" })?;

        outcome.documents_decoded += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveWriter;
    use std::path::Path;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    fn write_archive(dir: &Path, name: &str, members: &[(&str, Vec<u8>)]) -> PathBuf {
        let path = dir.join(name);
        let mut writer = ArchiveWriter::create(&path).unwrap();
        for (member, bytes) in members {
            writer.add_member(member, bytes).unwrap();
        }
        writer.finish().unwrap();
        path
    }

    fn drain<T>(rx: &mut mpsc::UnboundedReceiver<SinkMessage<T>>) -> Vec<T> {
        let mut records = Vec::new();
        while let Ok(message) = rx.try_recv() {
            if let SinkMessage::Record(record) = message {
                records.push(record);
            }
        }
        records
    }

    #[test]
    fn test_worker_emits_both_projections() {
        let temp_dir = TempDir::new().unwrap();
        let doc_a = Document::new("a", 5, vec!["x".to_string(), "y".to_string()]);
        let doc_b = Document::new("b", 9, vec!["z".to_string()]);
        let path = write_archive(
            temp_dir.path(),
            "archive_1.zip",
            &[
                ("doc_1.json", doc_a.to_bytes()),
                ("doc_2.json", doc_b.to_bytes()),
            ],
        );

        let (level_tx, mut level_rx) = mpsc::unbounded_channel();
        let (object_tx, mut object_rx) = mpsc::unbounded_channel();

        let outcome = ExtractionWorker::new(path, level_tx, object_tx).run();

        assert!(outcome.failure.is_none());
        assert_eq!(outcome.documents_decoded, 2);
        assert_eq!(outcome.level_rows, 2);
        assert_eq!(outcome.object_rows, 3);

        let levels = drain(&mut level_rx);
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].document_id, "a");

        let batches = drain(&mut object_rx);
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[1][0].object_name, "z");
    }

    #[test]
    fn test_worker_skips_malformed_documents() {
        let temp_dir = TempDir::new().unwrap();
        let good = Document::new("good", 1, vec!["obj".to_string()]);
        let path = write_archive(
            temp_dir.path(),
            "archive_2.zip",
            &[
                ("doc_1.json", b"{\"broken\":".to_vec()),
                ("doc_2.json", good.to_bytes()),
            ],
        );

        let (level_tx, mut level_rx) = mpsc::unbounded_channel();
        let (object_tx, _object_rx) = mpsc::unbounded_channel();

        let outcome = ExtractionWorker::new(path, level_tx, object_tx).run();

        assert!(outcome.failure.is_none());
        assert_eq!(outcome.documents_decoded, 1);
        assert_eq!(outcome.documents_skipped, 1);
        assert_eq!(drain(&mut level_rx).len(), 1);
    }

    #[test]
    fn test_worker_reports_unreadable_archive() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.zip");
        std::fs::write(&path, b"definitely not a zip").unwrap();

        let (level_tx, _level_rx) = mpsc::unbounded_channel();
        let (object_tx, _object_rx) = mpsc::unbounded_channel();

        let outcome = ExtractionWorker::new(path, level_tx, object_tx).run();

        assert!(outcome.failure.is_some());
        assert_eq!(outcome.documents_decoded, 0);
    }
}
