//! # Musical Tuning Module
//!
//! Maps frequencies onto 12-tone equal temperament with A4 = 440 Hz.
//!
//! Every pitch is addressed by its semitone offset `h` above C0, the C that
//! sits 57 semitones (4.75 octaves) below A4. The note name is the pitch class
//! of `h` followed by its octave, e.g. `h = 57` is `"A4"`.
//!
//! ## Rounding
//! A frequency lying exactly halfway between two semitones is rounded to the
//! even semitone (`f64::round_ties_even`).
//!
//! ## Negative offsets
//! Frequencies below C0 give a negative `h`. The octave uses floor division
//! and the pitch class a non-negative modulus, so 15 Hz is `"B-1"` rather than
//! a negative table index.

use once_cell::sync::Lazy;

use crate::error::{NoteError, Result};

/// Reference pitch of A4 in Hz.
pub const A4_FREQUENCY: f64 = 440.0;

/// Semitone offset of A4 above C0.
pub const A4_SEMITONE: i32 = 57;

/// Pitch class names, starting at C.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Frequency of C0, computed once from the A4 reference.
static C0: Lazy<f64> = Lazy::new(|| A4_FREQUENCY * 2.0_f64.powf(-4.75));

/// Returns the frequency of C0 in Hz (about 16.35 Hz).
pub fn c0_frequency() -> f64 {
    *C0
}

fn check_frequency(freq: f64) -> Result<()> {
    if freq.is_finite() && freq > 0.0 {
        Ok(())
    } else {
        Err(NoteError::InvalidFrequency { frequency: freq })
    }
}

/// Rounds a fractional semitone count to the nearest integer, ties to even.
pub fn round_semitone(semitones: f64) -> i32 {
    semitones.round_ties_even() as i32
}

/// Returns the nearest semitone offset above C0 for `freq`.
///
/// # Errors
/// `InvalidFrequency` if `freq` is not finite or not strictly positive.
pub fn semitone_offset(freq: f64) -> Result<i32> {
    check_frequency(freq)?;
    Ok(round_semitone(12.0 * (freq / c0_frequency()).log2()))
}

/// Builds the note name for a semitone offset above C0.
pub fn note_name_for_semitone(h: i32) -> String {
    let octave = h.div_euclid(12);
    let pitch_class = h.rem_euclid(12) as usize;
    format!("{}{}", NOTE_NAMES[pitch_class], octave)
}

/// Returns the equal-tempered frequency of the semitone `h` above C0.
pub fn semitone_frequency(h: i32) -> f64 {
    c0_frequency() * 2.0_f64.powf(h as f64 / 12.0)
}

/// Quantizes a frequency to its nearest note name, e.g. `440.0 -> "A4"`.
///
/// # Errors
/// `InvalidFrequency` if `freq <= 0` or is not finite.
pub fn note_name(freq: f64) -> Result<String> {
    semitone_offset(freq).map(note_name_for_semitone)
}

/// Finds the closest equal-tempered note to a given frequency.
///
/// # Returns
/// * `(note_name, target_frequency)` - Closest note name and its target frequency
pub fn nearest_note(freq: f64) -> Result<(String, f64)> {
    let h = semitone_offset(freq)?;
    Ok((note_name_for_semitone(h), semitone_frequency(h)))
}

/// Calculates the deviation from a target frequency in cents.
///
/// Positive values are sharp, negative values flat; 100 cents make a semitone.
pub fn cents_deviation(freq: f64, target_freq: f64) -> f64 {
    1200.0 * (freq / target_freq).log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_pitches() {
        assert_eq!(note_name(440.0).unwrap(), "A4");
        assert_eq!(note_name(261.63).unwrap(), "C4");
        assert_eq!(note_name(880.0).unwrap(), "A5");
        assert_eq!(note_name(27.5).unwrap(), "A0");
        assert_eq!(note_name(466.16).unwrap(), "A#4");
    }

    #[test]
    fn a4_is_57_semitones_above_c0() {
        assert_eq!(semitone_offset(A4_FREQUENCY).unwrap(), A4_SEMITONE);
        assert_eq!(semitone_offset(c0_frequency()).unwrap(), 0);
        let a4 = semitone_frequency(A4_SEMITONE);
        assert!((a4 - 440.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_and_non_finite() {
        for freq in [0.0, -10.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                note_name(freq),
                Err(NoteError::InvalidFrequency { .. })
            ));
        }
    }

    #[test]
    fn ties_round_to_even() {
        assert_eq!(round_semitone(0.5), 0);
        assert_eq!(round_semitone(1.5), 2);
        assert_eq!(round_semitone(2.5), 2);
        assert_eq!(round_semitone(57.5), 58);
        assert_eq!(round_semitone(-0.5), 0);
        assert_eq!(round_semitone(-1.5), -2);
        assert_eq!(round_semitone(56.51), 57);
    }

    #[test]
    fn below_c0_uses_floor_octave() {
        assert_eq!(note_name_for_semitone(-1), "B-1");
        assert_eq!(note_name_for_semitone(-12), "C-1");
        assert_eq!(note_name_for_semitone(-13), "B-2");
        assert_eq!(note_name(15.0).unwrap(), "B-1");
        assert_eq!(note_name(8.0).unwrap(), "C-1");
    }

    #[test]
    fn semitone_offset_is_monotonic() {
        let mut previous = semitone_offset(100.0).unwrap();
        let mut freq = 100.0;
        while freq < 2000.0 {
            let h = semitone_offset(freq).unwrap();
            assert!(h >= previous, "offset decreased at {freq} Hz");
            previous = h;
            freq += 0.37;
        }
    }

    #[test]
    fn nearest_note_and_cents() {
        let (name, target) = nearest_note(445.0).unwrap();
        assert_eq!(name, "A4");
        assert!((target - 440.0).abs() < 1e-9);
        let cents = cents_deviation(445.0, target);
        assert!((cents - 19.56).abs() < 0.01);
        assert!(cents_deviation(440.0, 440.0).abs() < 1e-12);
        assert!((cents_deviation(880.0, 440.0) - 1200.0).abs() < 1e-9);
    }
}
