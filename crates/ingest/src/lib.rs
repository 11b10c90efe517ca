pub mod document;
pub mod pipeline;
pub mod quota;

pub use pipeline::{IngestReport, IngestionPipeline};
pub use quota::{QuotaState, QuotaTracker};
