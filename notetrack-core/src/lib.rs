// notetrack-core/src/lib.rs

//! The core logic for turning a pitch track into notes.
//! This crate partitions a stream of (time, frequency, confidence)
//! observations into sustained notes and names them in 12-tone equal
//! temperament. It is completely headless and performs no I/O.

use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod reduction;
pub mod segmenter;
pub mod tuning;

pub use config::{OffsetCorrection, SegmenterConfig};
pub use error::{NoteError, Result};
pub use reduction::TuningOffset;
pub use segmenter::{NoteSegmenter, NoteSpan, segment, split_spans};

/// A single sample from an upstream pitch estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Time of the sample in seconds.
    pub time: f64,
    /// Estimated frequency in Hz.
    pub frequency: f64,
    /// The estimator's confidence in the frequency (0.0 to 1.0).
    pub confidence: f64,
}

impl Observation {
    pub fn new(time: f64, frequency: f64, confidence: f64) -> Self {
        Self { time, frequency, confidence }
    }
}

/// A finalized note, as handed to downstream consumers.
///
/// Serializes as `{ "name", "frequency", "startTime", "duration" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// The name of the nearest note (e.g. "A4", "C#3").
    pub name: String,
    /// Confidence-weighted mean frequency in Hz.
    pub frequency: f64,
    /// Time of the first observation, in seconds.
    pub start_time: f64,
    /// Span from the first to the last observation, in seconds.
    pub duration: f64,
}

impl Note {
    /// Time of the last observation, in seconds.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}
