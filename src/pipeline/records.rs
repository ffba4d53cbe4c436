use crate::document::Document;
use serde::Serialize;
use std::io::Write;

/// Projection of one document onto its level. Exactly one per document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct LevelRecord {
    pub document_id: String,
    pub level: u8,
}

impl LevelRecord {
    pub fn from_document(document: &Document) -> Self {
        Self {
            document_id: document.id.clone(),
            level: document.level,
        }
    }
}

/// Projection of one sub-object. Zero-to-many per document, in sub-object
/// order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ObjectRecord {
    pub document_id: String,
    pub object_name: String,
}

impl ObjectRecord {
    /// One record per sub-object, preserving document order.
    pub fn from_document(document: &Document) -> Vec<Self> {
        document
            .object_names()
            .map(|name| Self {
                document_id: document.id.clone(),
                object_name: name.to_string(),
            })
            .collect()
    }
}

/// Item carried on a sink channel: either a record payload or the
/// end-of-stream marker that moves the sink to its terminal state.
///
/// The coordinator sends `EndOfStream` exactly once per channel, and only
/// after every producer has been joined.
#[derive(Debug, Clone)]
pub enum SinkMessage<T> {
    Record(T),
    EndOfStream,
}

/// How one channel payload appends itself to a CSV output stream.
pub trait SinkRecord: Send + 'static {
    /// Number of rows this payload contributes.
    fn row_count(&self) -> u64;

    fn append_to<W: Write>(&self, writer: &mut csv::Writer<W>) -> csv::Result<()>;
}

impl SinkRecord for LevelRecord {
    fn row_count(&self) -> u64 {
        1
    }

    fn append_to<W: Write>(&self, writer: &mut csv::Writer<W>) -> csv::Result<()> {
        writer.write_record([self.document_id.as_str(), &self.level.to_string()])
    }
}

/// A batch of object records belonging to one document, appended as a single
/// bulk write.
impl SinkRecord for Vec<ObjectRecord> {
    fn row_count(&self) -> u64 {
        self.len() as u64
    }

    fn append_to<W: Write>(&self, writer: &mut csv::Writer<W>) -> csv::Result<()> {
        for record in self {
            writer.write_record([
                record.document_id.as_str(),
                record.object_name.as_str(),
            ])?;
        }
        Ok(())
    }
}
