//! Segment processing pipeline.
//!
//! A bounded worker pool drives each segment through clip export,
//! transcription, translation, and synthesis, connected by bounded
//! crossbeam channels; results are assembled into a manifest in index order.

pub mod manifest;
pub mod orchestrator;
pub mod report;
pub mod retry;
pub mod text;

pub use manifest::{ProcessingManifest, SegmentResult};
pub use orchestrator::{CancelToken, Orchestrator};
pub use report::{LogReporter, NullReporter, Reporter};
pub use retry::RetryPolicy;
