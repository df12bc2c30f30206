//! Equal-tempered note to frequency conversion.
//!
//! Note 0 sits six octaves below the 440 Hz reference; every step up is one
//! semitone (a ratio of 2^(1/12)). The reference therefore falls on note 72,
//! three semitones above MIDI's A4. Single precision throughout.

/// Reference pitch for A4.
pub const A4_FREQ: f32 = 440.0;

/// Octaves between note 0 and the 440 Hz reference.
pub const REFERENCE_OCTAVES: i32 = 6;

/// Frequency of note 0 (440 / 2^6 = 6.875 Hz).
#[inline]
pub fn first_note_frequency() -> f32 {
    A4_FREQ / 2.0_f32.powi(REFERENCE_OCTAVES)
}

/// Ratio between adjacent semitones.
#[inline]
pub fn semitone_ratio() -> f32 {
    2.0_f32.powf(1.0 / 12.0)
}

/// Frequency in Hz of `note_number`. Any integer is accepted; there is no
/// clamping to the 0-127 MIDI range and no snapping.
#[inline]
pub fn calculate_frequency(note_number: i32) -> f32 {
    first_note_frequency() * semitone_ratio().powf(note_number as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_note() {
        assert_eq!(first_note_frequency(), 6.875);
        assert_relative_eq!(calculate_frequency(0), 6.875);
    }

    #[test]
    fn test_reference_pitch_lands_on_note_72() {
        // Six octaves above note 0, so 440 Hz is note 72 rather than MIDI A4 (69).
        assert_relative_eq!(calculate_frequency(72), 440.0, max_relative = 1e-4);
        assert_relative_eq!(calculate_frequency(60), 220.0, max_relative = 1e-4);
        assert_relative_eq!(calculate_frequency(84), 880.0, max_relative = 1e-4);
    }

    #[test]
    fn test_midi_a_notes() {
        assert_relative_eq!(calculate_frequency(69), 369.994, max_relative = 1e-4);
        assert_relative_eq!(calculate_frequency(57), 184.997, max_relative = 1e-4);
        assert_relative_eq!(calculate_frequency(81), 739.989, max_relative = 1e-4);
    }

    #[test]
    fn test_matches_closed_form() {
        for note in -24..=160 {
            let expected = 440.0_f64 / 64.0 * 2.0_f64.powf(note as f64 / 12.0);
            assert_relative_eq!(
                calculate_frequency(note) as f64,
                expected,
                max_relative = 1e-4
            );
        }
    }

    #[test]
    fn test_monotonic() {
        for note in -12..140 {
            assert!(calculate_frequency(note + 1) > calculate_frequency(note));
        }
    }

    #[test]
    fn test_negative_notes_stay_positive() {
        assert!(calculate_frequency(-60) > 0.0);
        assert_relative_eq!(calculate_frequency(-12), 6.875 / 2.0, max_relative = 1e-4);
    }
}
