//! # Span Reduction Module
//!
//! Reduces a closed span of observations to a single named [`Note`].
//!
//! The representative frequency of a span is the confidence-weighted mean of
//! its observations. An optional [`TuningOffset`] is removed from that mean
//! before it is quantized, for recordings that are consistently sharp or flat.

use serde::{Deserialize, Serialize};

use crate::{
    Note, Observation,
    error::{NoteError, Result},
    segmenter::NoteSpan,
    tuning,
};

/// A global pitch offset, in cents, relative to A4 = 440 Hz tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningOffset {
    /// Positive when the source is sharp.
    pub cents: f64,
}

impl TuningOffset {
    pub fn new(cents: f64) -> Self {
        Self { cents }
    }

    /// Measures how far `freq` sits from its nearest equal-tempered note.
    ///
    /// The result lies within about ±50 cents.
    pub fn from_reference(freq: f64) -> Result<Self> {
        let (_, target) = tuning::nearest_note(freq)?;
        Ok(Self::new(tuning::cents_deviation(freq, target)))
    }

    /// Removes the offset from a measured frequency.
    pub fn apply(&self, freq: f64) -> f64 {
        freq * 2.0_f64.powf(-self.cents / 1200.0)
    }
}

/// Computes `Σ(f·c) / Σ(c)` over the observations.
///
/// # Errors
/// `DegenerateSegment` when the weights do not sum to a finite positive value.
pub fn weighted_frequency(observations: &[Observation]) -> Result<f64> {
    let (weighted_sum, weight_sum) = observations
        .iter()
        .fold((0.0, 0.0), |(fs, cs), o| (fs + o.frequency * o.confidence, cs + o.confidence));

    if !(weight_sum.is_finite() && weight_sum > 0.0) {
        return Err(NoteError::DegenerateSegment {
            start_time: observations.first().map_or(f64::NAN, |o| o.time),
        });
    }
    Ok(weighted_sum / weight_sum)
}

/// Reduces a span to a [`Note`], removing `offset` from its frequency first.
///
/// # Errors
/// * `DegenerateSegment` - the span's confidences sum to zero
/// * `InvalidFrequency` - the (corrected) mean frequency cannot be named
pub fn reduce_span(span: &NoteSpan, offset: Option<&TuningOffset>) -> Result<Note> {
    let measured = weighted_frequency(span.observations())?;
    let frequency = offset.map_or(measured, |o| o.apply(measured));
    let name = tuning::note_name(frequency)?;

    Ok(Note {
        name,
        frequency,
        start_time: span.start_time(),
        duration: span.duration(),
    })
}
