// Import pipeline: row processing stages and the batch orchestrator

pub mod orchestrator;
pub mod processing;

pub use orchestrator::{batch_fingerprint, BatchStage, ImportOutcome, ImportPipeline};
