//! Pitch and duration arithmetic
//!
//! Frequencies are derived from a 12-entry equal-tempered table at octave 4
//! and scaled by powers of two. Durations are derived from the tempo with
//! integer arithmetic, so results match firmware that has no FPU for timing.

use crate::config::FrequencyRange;
use crate::note::SILENCE;

/// Octave-4 reference frequencies (Hz), indexed by semitone from C
pub const BASE_FREQUENCIES: [u32; 12] = [262, 277, 294, 311, 330, 349, 370, 392, 415, 440, 466, 494];

/// Octave the reference table is tuned to
pub const REFERENCE_OCTAVE: i32 = 4;

/// Semitone offset from C for a (lowercase) pitch letter, `None` for rests
/// and unknown letters
pub fn semitone(pitch: u8) -> Option<u8> {
    match pitch {
        b'c' => Some(0),
        b'd' => Some(2),
        b'e' => Some(4),
        b'f' => Some(5),
        b'g' => Some(7),
        b'a' => Some(9),
        b'b' => Some(11),
        _ => None,
    }
}

/// Frequency of a pitch letter, or [`SILENCE`] when the letter is a rest or
/// the result falls outside `range`
pub fn note_frequency(pitch: u8, sharp: bool, octave: u8, range: &FrequencyRange) -> u32 {
    let Some(base) = semitone(pitch) else {
        return SILENCE;
    };

    let mut index = base + u8::from(sharp);
    let mut octave = octave as i32;
    // B# is the C of the next octave
    if index >= 12 {
        index -= 12;
        octave += 1;
    }

    let scaled = BASE_FREQUENCIES[index as usize] as f64 * 2f64.powi(octave - REFERENCE_OCTAVE);
    let frequency = scaled.round() as u64;

    if frequency <= u32::MAX as u64 && range.contains(frequency as u32) {
        frequency as u32
    } else {
        SILENCE
    }
}

/// Length of one quarter note at `bpm` (integer division)
pub fn quarter_note_ms(bpm: u32) -> u32 {
    60_000 / bpm.max(1)
}

/// Length of a note with the given duration divisor (4 = quarter, 8 = eighth, ...)
///
/// Dotted notes are extended by half. The result saturates at `u16::MAX`.
pub fn note_duration_ms(quarter_ms: u32, divisor: u32, dotted: bool) -> u16 {
    let mut ms = quarter_ms as u64 * 4 / divisor.max(1) as u64;
    if dotted {
        ms += ms / 2;
    }
    ms.min(u16::MAX as u64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_octave_unchanged() {
        let range = FrequencyRange::default();
        assert_eq!(note_frequency(b'a', false, 4, &range), 440);
        assert_eq!(note_frequency(b'c', false, 4, &range), 262);
    }

    #[test]
    fn test_octave_scaling() {
        let range = FrequencyRange::default();
        assert_eq!(note_frequency(b'e', false, 6, &range), 1320);
        assert_eq!(note_frequency(b'a', false, 5, &range), 880);
        // 440 / 2 = 220, 262 / 4 = 65.5 rounds to 66
        assert_eq!(note_frequency(b'a', false, 3, &range), 220);
        assert_eq!(note_frequency(b'c', false, 2, &range), 66);
    }

    #[test]
    fn test_sharps() {
        let range = FrequencyRange::default();
        assert_eq!(note_frequency(b'f', true, 5, &range), 740);
        assert_eq!(note_frequency(b'c', true, 4, &range), 277);
        assert_eq!(note_frequency(b'e', true, 4, &range), 349);
        assert_eq!(note_frequency(b'b', true, 4, &range), 524);
    }

    #[test]
    fn test_out_of_range_becomes_silence() {
        let range = FrequencyRange::default();
        // 262 / 16 = 16.4 Hz is below the 31 Hz floor
        assert_eq!(note_frequency(b'c', false, 0, &range), SILENCE);
        assert_eq!(note_frequency(b'b', false, 9, &range), 15_808);

        let narrow = FrequencyRange::new(100, 1000);
        assert_eq!(note_frequency(b'e', false, 6, &narrow), SILENCE);
    }

    #[test]
    fn test_rest_and_unknown_letters() {
        let range = FrequencyRange::default();
        assert_eq!(note_frequency(b'p', true, 5, &range), SILENCE);
        assert_eq!(note_frequency(b'h', false, 5, &range), SILENCE);
    }

    #[test]
    fn test_durations() {
        let quarter = quarter_note_ms(225);
        assert_eq!(quarter, 266);
        assert_eq!(note_duration_ms(quarter, 4, false), 266);
        assert_eq!(note_duration_ms(quarter, 8, false), 133);
        assert_eq!(note_duration_ms(quarter, 2, true), 798);
        assert_eq!(note_duration_ms(quarter_note_ms(120), 4, false), 500);
    }

    #[test]
    fn test_duration_clamps() {
        assert_eq!(note_duration_ms(quarter_note_ms(1), 1, true), u16::MAX);
        assert_eq!(quarter_note_ms(0), 60_000);
    }
}
