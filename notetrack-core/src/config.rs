//! # Segmenter Configuration
//!
//! Tunables for the note segmenter. The struct serializes with camelCase keys
//! so a saved config reads the same as the note output.

use serde::{Deserialize, Serialize};

use crate::error::{NoteError, Result};

/// Default confidence threshold; observations at or below it are dropped.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.82;
/// Default largest time gap (seconds) between neighbours in one note.
pub const DEFAULT_MAX_GAP_SECONDS: f64 = 0.1;
/// Default largest pitch slope (Hz per second) between neighbours in one note.
pub const DEFAULT_MAX_SLOPE_HZ_PER_SEC: f64 = 180.0;
/// Default minimum span (seconds) a note must exceed to be kept.
pub const DEFAULT_MIN_DURATION_SECONDS: f64 = 0.05;

/// How, if at all, a global tuning offset is removed from detected notes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum OffsetCorrection {
    /// Report frequencies as measured.
    #[default]
    None,
    /// Remove a known offset, in cents, from every note.
    Fixed { cents: f64 },
    /// Measure the offset on the first kept note and remove it from all notes.
    FromFirstSegment,
}

/// Parameters of a segmentation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SegmenterConfig {
    pub confidence_threshold: f64,
    pub max_gap_seconds: f64,
    /// Set to infinity to disable the slope test.
    pub max_slope_hz_per_sec: f64,
    pub min_duration_seconds: f64,
    pub offset_correction: OffsetCorrection,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            max_gap_seconds: DEFAULT_MAX_GAP_SECONDS,
            max_slope_hz_per_sec: DEFAULT_MAX_SLOPE_HZ_PER_SEC,
            min_duration_seconds: DEFAULT_MIN_DURATION_SECONDS,
            offset_correction: OffsetCorrection::None,
        }
    }
}

impl SegmenterConfig {
    /// Checks every tunable against its domain.
    ///
    /// Called before any observation is scanned, so a bad config never yields
    /// partial output.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(invalid(
                "confidenceThreshold",
                self.confidence_threshold,
                "must lie in [0, 1]",
            ));
        }
        if !(self.max_gap_seconds.is_finite() && self.max_gap_seconds >= 0.0) {
            return Err(invalid(
                "maxGapSeconds",
                self.max_gap_seconds,
                "must be finite and >= 0",
            ));
        }
        if self.max_slope_hz_per_sec.is_nan() || self.max_slope_hz_per_sec <= 0.0 {
            return Err(invalid(
                "maxSlopeHzPerSec",
                self.max_slope_hz_per_sec,
                "must be > 0",
            ));
        }
        if !(self.min_duration_seconds.is_finite() && self.min_duration_seconds >= 0.0) {
            return Err(invalid(
                "minDurationSeconds",
                self.min_duration_seconds,
                "must be finite and >= 0",
            ));
        }
        if let OffsetCorrection::Fixed { cents } = self.offset_correction {
            if !cents.is_finite() {
                return Err(invalid("offsetCorrection.cents", cents, "must be finite"));
            }
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: f64, reason: &'static str) -> NoteError {
    NoteError::InvalidParameter { name, value, reason }
}
