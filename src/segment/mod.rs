//! Segmentation engine: silence detection and duration-bounded cutting.

pub mod silence;
pub mod splitter;

pub use silence::SilenceInterval;
pub use splitter::{Segment, SegmentationConfig, segment};
