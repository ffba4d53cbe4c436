use crate::error::{Result, ZipflowError};
use crate::pipeline::records::{SinkMessage, SinkRecord};
use std::fs::File;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedReceiver;

/// Dedicated serial consumer for one record stream.
///
/// Exactly one sink exists per record kind, and the sink exclusively owns its
/// output file from construction until it stops; this is what keeps the file
/// free of interleaved writes without any locking.
///
/// The sink blocks on its channel until a record or the end-of-stream marker
/// arrives. Records are appended as they come in; the marker flushes and
/// closes the output and ends the run.
pub struct RecordSink<T> {
    stream_name: &'static str,
    output_path: PathBuf,
    writer: csv::Writer<File>,
    receiver: UnboundedReceiver<SinkMessage<T>>,
}

/// What a sink reports back after observing the end-of-stream marker.
#[derive(Debug, Clone)]
pub struct SinkSummary {
    pub stream_name: &'static str,
    pub output_path: PathBuf,
    pub rows_written: u64,
}

impl<T: SinkRecord> RecordSink<T> {
    /// Open (and truncate) the output stream. Pre-existing files are
    /// overwritten.
    pub fn open<P: AsRef<Path>>(
        stream_name: &'static str,
        output_path: P,
        receiver: UnboundedReceiver<SinkMessage<T>>,
    ) -> Result<Self> {
        let output_path = output_path.as_ref().to_path_buf();
        let file = File::create(&output_path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        Ok(Self {
            stream_name,
            output_path,
            writer,
            receiver,
        })
    }

    /// Drain the channel until the end-of-stream marker, then flush and
    /// return. Must run on a blocking thread.
    pub fn run(mut self) -> Result<SinkSummary> {
        let mut rows_written = 0u64;

        loop {
            match self.receiver.blocking_recv() {
                Some(SinkMessage::Record(record)) => {
                    record.append_to(&mut self.writer)?;
                    rows_written += record.row_count();
                }
                Some(SinkMessage::EndOfStream) => break,
                // All senders dropped without a marker. The coordinator only
                // drops its senders after sending the marker, so treat this
                // as a protocol violation rather than a normal stop.
                None => {
                    self.writer.flush()?;
                    return Err(ZipflowError::StreamClosed {
                        stream: self.stream_name,
                    });
                }
            }
        }

        self.writer.flush()?;

        Ok(SinkSummary {
            stream_name: self.stream_name,
            output_path: self.output_path,
            rows_written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::records::LevelRecord;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::mpsc;
    use tokio::task;

    #[tokio::test]
    async fn test_sink_writes_until_marker() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("levels.csv");

        let (tx, rx) = mpsc::unbounded_channel();
        let sink = RecordSink::open("levels", &output, rx).unwrap();
        let handle = task::spawn_blocking(move || sink.run());

        for i in 0..3u8 {
            tx.send(SinkMessage::Record(LevelRecord {
                document_id: format!("doc-{}", i),
                level: i + 1,
            }))
            .unwrap();
        }

        tx.send(SinkMessage::EndOfStream).unwrap();
        let summary = handle.await.unwrap().unwrap();

        assert_eq!(summary.rows_written, 3);
        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.starts_with("doc-0,1"));
    }

    #[tokio::test]
    async fn test_sink_does_not_stop_before_marker() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("levels.csv");

        let (tx, rx) = mpsc::unbounded_channel::<SinkMessage<LevelRecord>>();
        let sink = RecordSink::open("levels", &output, rx).unwrap();
        let handle = task::spawn_blocking(move || sink.run());

        tx.send(SinkMessage::Record(LevelRecord {
            document_id: "doc-a".to_string(),
            level: 1,
        }))
        .unwrap();

        // Idle channel must leave the sink blocked, not terminated.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!handle.is_finished());

        tx.send(SinkMessage::EndOfStream).unwrap();
        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.rows_written, 1);
    }

    #[tokio::test]
    async fn test_dropped_senders_are_a_protocol_error() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("levels.csv");

        let (tx, rx) = mpsc::unbounded_channel::<SinkMessage<LevelRecord>>();
        let sink = RecordSink::open("levels", &output, rx).unwrap();
        let handle = task::spawn_blocking(move || sink.run());

        drop(tx);
        let result = handle.await.unwrap();
        assert!(matches!(result, Err(ZipflowError::StreamClosed { .. })));
    }

    #[tokio::test]
    async fn test_sink_truncates_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("levels.csv");
        std::fs::write(&output, "stale,rows\nfrom,earlier\n").unwrap();

        let (tx, rx) = mpsc::unbounded_channel::<SinkMessage<LevelRecord>>();
        let sink = RecordSink::open("levels", &output, rx).unwrap();
        let handle = task::spawn_blocking(move || sink.run());

        tx.send(SinkMessage::EndOfStream).unwrap();
        let summary = handle.await.unwrap().unwrap();

        assert_eq!(summary.rows_written, 0);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "");
    }
}
