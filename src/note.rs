//! Notes and melodies
//!
//! A [`Note`] is a (frequency, duration) pair. A [`Melody`] is the ordered
//! note sequence a [`MelodyController`](crate::MelodyController) plays, either
//! borrowed from static data or owned by the controller.

use std::fmt;
use std::ops::Deref;

/// Frequency value meaning "no waveform" (a rest).
pub const SILENCE: u32 = 0;

/// Lowest frequency a buzzer output accepts by default (Hz).
pub const MIN_FREQUENCY: u32 = 31;

/// Highest frequency a buzzer output accepts by default (Hz).
pub const MAX_FREQUENCY: u32 = 65_535;

/// A single note: pitch in Hz (or [`SILENCE`]) held for a number of milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Note {
    /// Frequency in Hz, or [`SILENCE`] for a rest
    pub frequency: u32,
    /// Duration in milliseconds
    pub duration_ms: u16,
}

impl Note {
    /// Create a note
    pub const fn new(frequency: u32, duration_ms: u16) -> Self {
        Note {
            frequency,
            duration_ms,
        }
    }

    /// Create a rest of the given length
    pub const fn rest(duration_ms: u16) -> Self {
        Note {
            frequency: SILENCE,
            duration_ms,
        }
    }

    /// True if this note is a rest
    pub const fn is_rest(&self) -> bool {
        self.frequency == SILENCE
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_rest() {
            write!(f, "rest {}ms", self.duration_ms)
        } else {
            write!(f, "{}Hz {}ms", self.frequency, self.duration_ms)
        }
    }
}

/// Note sequence handed to the melody controller.
///
/// `Static` sequences are caller data that outlive every play and are never
/// released by the controller. `Owned` sequences (typically produced by the
/// notation parser) move into the controller and are dropped as soon as
/// playback ends, whether it completed or was stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Melody {
    /// Caller-owned notes reused across plays
    Static(&'static [Note]),
    /// Notes owned exclusively by whoever holds the melody
    Owned(Box<[Note]>),
}

impl Melody {
    /// Number of notes in the sequence
    pub fn len(&self) -> usize {
        self.notes().len()
    }

    /// True if the sequence has no notes
    pub fn is_empty(&self) -> bool {
        self.notes().is_empty()
    }

    /// Borrow the notes
    pub fn notes(&self) -> &[Note] {
        match self {
            Melody::Static(notes) => notes,
            Melody::Owned(notes) => notes,
        }
    }

    /// True if the sequence is owned (released when playback ends)
    pub fn is_owned(&self) -> bool {
        matches!(self, Melody::Owned(_))
    }

    /// Total length of one pass in milliseconds
    pub fn total_duration_ms(&self) -> u64 {
        self.notes().iter().map(|n| n.duration_ms as u64).sum()
    }
}

impl Deref for Melody {
    type Target = [Note];

    fn deref(&self) -> &[Note] {
        self.notes()
    }
}

impl From<&'static [Note]> for Melody {
    fn from(notes: &'static [Note]) -> Self {
        Melody::Static(notes)
    }
}

impl From<Vec<Note>> for Melody {
    fn from(notes: Vec<Note>) -> Self {
        Melody::Owned(notes.into_boxed_slice())
    }
}

impl From<Box<[Note]>> for Melody {
    fn from(notes: Box<[Note]>) -> Self {
        Melody::Owned(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SCALE: [Note; 3] = [Note::new(262, 100), Note::rest(50), Note::new(330, 100)];

    #[test]
    fn test_note_rest() {
        assert!(Note::rest(10).is_rest());
        assert!(!Note::new(440, 10).is_rest());
        assert_eq!(Note::default(), Note::rest(0));
    }

    #[test]
    fn test_note_display() {
        assert_eq!(Note::new(440, 250).to_string(), "440Hz 250ms");
        assert_eq!(Note::rest(80).to_string(), "rest 80ms");
    }

    #[test]
    fn test_melody_static_and_owned() {
        let fixed = Melody::from(&SCALE[..]);
        assert!(!fixed.is_owned());
        assert_eq!(fixed.len(), 3);
        assert_eq!(fixed.total_duration_ms(), 250);

        let owned = Melody::from(vec![Note::new(440, 10)]);
        assert!(owned.is_owned());
        assert_eq!(owned[0].frequency, 440);
    }

    #[test]
    fn test_empty_melody() {
        let empty = Melody::from(Vec::<Note>::new());
        assert!(empty.is_empty());
        assert_eq!(empty.total_duration_ms(), 0);
    }
}
