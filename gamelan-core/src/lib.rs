// gamelan-core/src/lib.rs

//! The core logic for the gamelan tuning analyzer.
//! This crate turns a frame-wise f0 track into stable note regions and pitch
//! classes, finds the six-tone scale among them and scores its intervals
//! against the begbeg, sedang and tirus tunings. It is completely headless:
//! audio decoding and pitch estimation happen upstream.

pub mod batch;
pub mod cents;
pub mod config;
pub mod error;
pub mod grouping;
pub mod pipeline;
pub mod pitch;
pub mod scale;
pub mod segmentation;
pub mod stability;
mod stats;
pub mod tuning;

pub use config::{AnalysisConfig, Representative};
pub use error::{Error, Result};
pub use pipeline::{TuningAnalysis, analyze};
pub use scale::{Scale, ScaleSearch};
pub use segmentation::{SegmenterConfig, StableRegionSegmenter, StableSegment};
pub use tuning::{ReferenceTuning, SimilarityResult, TuningSimilarityComputer};
