//! Error types for the `notetrack-core` crate.

use thiserror::Error;

/// Errors surfaced by note segmentation and frequency quantization.
///
/// The core never logs or recovers from these; every failure is handed back
/// to the caller as one of these variants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NoteError {
    /// A frequency that cannot be mapped to a note (zero, negative, NaN or infinite).
    #[error("invalid frequency: {frequency} Hz (must be finite and > 0)")]
    InvalidFrequency {
        /// The offending frequency in Hz.
        frequency: f64,
    },

    /// A tunable supplied outside its valid domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Name of the parameter, as spelled in the config.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// What the parameter must satisfy.
        reason: &'static str,
    },

    /// A segment whose confidence weights sum to zero (or to a non-finite value).
    #[error("degenerate segment starting at {start_time}s: confidence weights sum to zero")]
    DegenerateSegment {
        /// Time of the segment's first observation.
        start_time: f64,
    },

    /// An observation whose time goes backwards relative to the previous one.
    #[error("observation {index} at {time}s is earlier than the previous one at {previous}s")]
    UnorderedStream {
        /// Position of the observation in the raw input stream.
        index: usize,
        /// Time of the offending observation.
        time: f64,
        /// Time of the observation just before it.
        previous: f64,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NoteError>;
