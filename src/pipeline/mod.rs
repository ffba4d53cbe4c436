pub mod coordinator;
pub mod records;
pub mod sink;
pub mod worker;

pub use coordinator::{ExtractionReport, PipelineCoordinator};
pub use records::{LevelRecord, ObjectRecord, SinkMessage, SinkRecord};
pub use sink::{RecordSink, SinkSummary};
pub use worker::{ArchiveOutcome, ExtractionWorker};
