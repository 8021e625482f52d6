//! # Note Segmentation Module
//!
//! Single-pass grouping of a pitch track into notes.
//!
//! ## Pipeline
//! 1. **Confidence filter**: observations with `confidence <= confidenceThreshold`
//!    are dropped. Their absence shows up as a time gap to the next survivor.
//! 2. **Adjacency scan**: each survivor joins the open span when it is close
//!    in time (`dt <= maxGapSeconds`) and the pitch moved slowly enough
//!    (`|df| / dt < maxSlopeHzPerSec`). Otherwise the open span is closed and
//!    the survivor seeds a new one. Equal timestamps always join.
//! 3. **Duration filter**: a closed span is kept only if its last and first
//!    observations are more than `minDurationSeconds` apart.
//! 4. **Reduction**: kept spans become [`Note`]s (see [`crate::reduction`]).
//!
//! Notes come out in the order their spans started.

use log::{debug, trace};

use crate::{
    Note, Observation,
    config::{OffsetCorrection, SegmenterConfig},
    error::{NoteError, Result},
    reduction::{self, TuningOffset},
};

/// An accumulating run of observations believed to share one pitch.
///
/// Never empty: a span is always seeded with its first observation.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteSpan {
    observations: Vec<Observation>,
}

// Spans are never empty, so `len` has no `is_empty` partner.
#[allow(clippy::len_without_is_empty)]
impl NoteSpan {
    pub(crate) fn new(seed: Observation) -> Self {
        Self { observations: vec![seed] }
    }

    pub(crate) fn append(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn first(&self) -> &Observation {
        &self.observations[0]
    }

    pub fn last(&self) -> &Observation {
        &self.observations[self.observations.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn start_time(&self) -> f64 {
        self.first().time
    }

    pub fn end_time(&self) -> f64 {
        self.last().time
    }

    /// Time between the first and last observation; zero for a single observation.
    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    /// Whether `next` continues this span under the gap and slope limits.
    fn accepts(
        &self,
        next: &Observation,
        max_gap_seconds: f64,
        max_slope_hz_per_sec: f64,
    ) -> bool {
        let prev = self.last();
        let dt = next.time - prev.time;
        if dt == 0.0 {
            return true;
        }
        let note_diff = (next.frequency - prev.frequency).abs() / dt;
        dt <= max_gap_seconds && note_diff < max_slope_hz_per_sec
    }
}

/// Steps 1 and 2: filters observations and groups them into spans.
#[derive(Debug)]
struct SpanScanner {
    confidence_threshold: f64,
    max_gap_seconds: f64,
    max_slope_hz_per_sec: f64,
    open: Option<NoteSpan>,
    previous_time: Option<f64>,
    seen: usize,
}

impl SpanScanner {
    fn new(config: &SegmenterConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            max_gap_seconds: config.max_gap_seconds,
            max_slope_hz_per_sec: config.max_slope_hz_per_sec,
            open: None,
            previous_time: None,
            seen: 0,
        }
    }

    /// Feeds one raw observation; returns the span it closed, if any.
    fn push(&mut self, observation: Observation) -> Result<Option<NoteSpan>> {
        let previous = self.previous_time.unwrap_or(f64::NEG_INFINITY);
        if !(observation.time >= previous) {
            return Err(NoteError::UnorderedStream {
                index: self.seen,
                time: observation.time,
                previous,
            });
        }
        self.previous_time = Some(observation.time);
        self.seen += 1;

        // NaN confidences fail this comparison and are dropped too.
        if !(observation.confidence > self.confidence_threshold) {
            trace!("dropping low-confidence observation at {}s", observation.time);
            return Ok(None);
        }

        let (max_gap, max_slope) = (self.max_gap_seconds, self.max_slope_hz_per_sec);
        match self.open.as_mut() {
            Some(span) if span.accepts(&observation, max_gap, max_slope) => {
                span.append(observation);
                Ok(None)
            }
            _ => {
                trace!("opening span at {}s", observation.time);
                Ok(self.open.replace(NoteSpan::new(observation)))
            }
        }
    }

    fn finish(self) -> Option<NoteSpan> {
        self.open
    }
}

/// A streaming note segmenter.
///
/// Observations are pushed one at a time in non-decreasing time order. A
/// note is returned as soon as the span it belongs to is closed, either by
/// an observation that cannot join it or by [`NoteSegmenter::finish`].
#[derive(Debug)]
pub struct NoteSegmenter {
    scanner: SpanScanner,
    min_duration_seconds: f64,
    offset_correction: OffsetCorrection,
    offset: Option<TuningOffset>,
}

impl NoteSegmenter {
    /// Creates a segmenter after validating `config`.
    ///
    /// # Errors
    /// `InvalidParameter` if any tunable is out of its domain.
    pub fn new(config: &SegmenterConfig) -> Result<Self> {
        config.validate()?;
        let offset = match config.offset_correction {
            OffsetCorrection::Fixed { cents } => Some(TuningOffset::new(cents)),
            OffsetCorrection::None | OffsetCorrection::FromFirstSegment => None,
        };
        Ok(Self {
            scanner: SpanScanner::new(config),
            min_duration_seconds: config.min_duration_seconds,
            offset_correction: config.offset_correction,
            offset,
        })
    }

    /// The offset being removed from notes, once known.
    pub fn tuning_offset(&self) -> Option<TuningOffset> {
        self.offset
    }

    /// Feeds one raw observation.
    ///
    /// # Returns
    /// * `Ok(Some(note))` - the observation closed a span that became a note
    /// * `Ok(None)` - nothing was finalized
    /// * `Err(e)` - the stream is out of order or a note could not be reduced
    pub fn push(&mut self, observation: Observation) -> Result<Option<Note>> {
        match self.scanner.push(observation)? {
            Some(span) => self.finalize(span),
            None => Ok(None),
        }
    }

    /// Closes the open span, if any, and returns its note.
    pub fn finish(mut self) -> Result<Option<Note>> {
        match self.scanner.open.take() {
            Some(span) => self.finalize(span),
            None => Ok(None),
        }
    }

    /// Steps 3 and 4 for one closed span.
    fn finalize(&mut self, span: NoteSpan) -> Result<Option<Note>> {
        if !(span.duration() > self.min_duration_seconds) {
            debug!(
                "discarding span at {}s: {} observations over {:.3}s",
                span.start_time(),
                span.len(),
                span.duration()
            );
            return Ok(None);
        }

        if self.offset.is_none() && self.offset_correction == OffsetCorrection::FromFirstSegment {
            let reference = reduction::weighted_frequency(span.observations())?;
            let offset = TuningOffset::from_reference(reference)?;
            debug!("tuning offset of {:.2} cents measured at {}s", offset.cents, span.start_time());
            self.offset = Some(offset);
        }

        let note = reduction::reduce_span(&span, self.offset.as_ref())?;
        debug!(
            "note {} ({:.2} Hz) from {}s for {:.3}s",
            note.name, note.frequency, note.start_time, note.duration
        );
        Ok(Some(note))
    }
}

/// Segments a whole pitch track into notes.
///
/// # Arguments
/// * `observations` - Raw pitch track, ordered by non-decreasing time
/// * `config` - Segmentation parameters
///
/// # Returns
/// The notes in start-time order. An empty track, or one where nothing
/// clears the confidence threshold, gives an empty list.
///
/// # Errors
/// Any error aborts the whole call; no partial list is returned.
pub fn segment<I>(observations: I, config: &SegmenterConfig) -> Result<Vec<Note>>
where
    I: IntoIterator<Item = Observation>,
{
    let mut segmenter = NoteSegmenter::new(config)?;
    let mut notes = Vec::new();
    for observation in observations {
        if let Some(note) = segmenter.push(observation)? {
            notes.push(note);
        }
    }
    if let Some(note) = segmenter.finish()? {
        notes.push(note);
    }
    Ok(notes)
}

/// Runs only the confidence filter and adjacency scan.
///
/// Returns every closed span, including those the duration filter would
/// discard.
pub fn split_spans<I>(observations: I, config: &SegmenterConfig) -> Result<Vec<NoteSpan>>
where
    I: IntoIterator<Item = Observation>,
{
    config.validate()?;
    let mut scanner = SpanScanner::new(config);
    let mut spans = Vec::new();
    for observation in observations {
        spans.extend(scanner.push(observation)?);
    }
    spans.extend(scanner.finish());
    Ok(spans)
}
