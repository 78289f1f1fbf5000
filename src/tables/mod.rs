//! Named tone tables
//!
//! Musical note frequencies and common durations under stable names, plus a
//! short sample melody and the built-in notation library in [`melodies`].
//! Every table is a scoped constant slice with a lookup function; nothing
//! here is mutable.

pub mod melodies;

use crate::note::Note;

/// Named note frequencies (Hz)
pub mod pitch {
    /// Rest
    pub const PAUSE: u32 = 0;

    /// C3
    pub const VERY_LOW_C: u32 = 130;
    /// C#3
    pub const VERY_LOW_C_SHARP: u32 = 138;
    /// D3
    pub const VERY_LOW_D: u32 = 147;

    /// C4
    pub const LOW_C: u32 = 261;
    /// C#4
    pub const LOW_C_SHARP: u32 = 277;
    /// D4
    pub const LOW_D: u32 = 294;
    /// D#4
    pub const LOW_D_SHARP: u32 = 311;
    /// E4
    pub const LOW_E: u32 = 330;
    /// F4
    pub const LOW_F: u32 = 349;
    /// F#4
    pub const LOW_F_SHARP: u32 = 370;
    /// G4
    pub const LOW_G: u32 = 392;
    /// G#4
    pub const LOW_G_SHARP: u32 = 415;
    /// A4
    pub const LOW_A: u32 = 440;
    /// A#4
    pub const LOW_A_SHARP: u32 = 466;
    /// B4
    pub const LOW_B: u32 = 494;

    /// C5
    pub const MEDIUM_C: u32 = 523;
    /// C#5
    pub const MEDIUM_C_SHARP: u32 = 554;
    /// D5
    pub const MEDIUM_D: u32 = 587;
    /// D#5
    pub const MEDIUM_D_SHARP: u32 = 622;
    /// E5
    pub const MEDIUM_E: u32 = 659;
    /// F5
    pub const MEDIUM_F: u32 = 698;
    /// F#5
    pub const MEDIUM_F_SHARP: u32 = 740;
    /// G5
    pub const MEDIUM_G: u32 = 784;
    /// G#5
    pub const MEDIUM_G_SHARP: u32 = 831;
    /// A5
    pub const MEDIUM_A: u32 = 880;
    /// A#5
    pub const MEDIUM_A_SHARP: u32 = 932;
    /// B5
    pub const MEDIUM_B: u32 = 988;

    /// C6
    pub const HIGH_C: u32 = 1047;
    /// C#6
    pub const HIGH_C_SHARP: u32 = 1109;
    /// D6
    pub const HIGH_D: u32 = 1175;
    /// D#6
    pub const HIGH_D_SHARP: u32 = 1245;
    /// E6
    pub const HIGH_E: u32 = 1319;
    /// F6
    pub const HIGH_F: u32 = 1397;
    /// F#6
    pub const HIGH_F_SHARP: u32 = 1480;
    /// G6
    pub const HIGH_G: u32 = 1568;
    /// G#6
    pub const HIGH_G_SHARP: u32 = 1661;
    /// A6
    pub const HIGH_A: u32 = 1760;
    /// A#6
    pub const HIGH_A_SHARP: u32 = 1865;
    /// B6
    pub const HIGH_B: u32 = 1976;

    /// C8
    pub const VERY_HIGH_C: u32 = 4186;
    /// C#8
    pub const VERY_HIGH_C_SHARP: u32 = 4435;
    /// D8
    pub const VERY_HIGH_D: u32 = 4699;

    /// Every named frequency, in ascending order
    pub const ALL: &[(&str, u32)] = &[
        ("PAUSE", PAUSE),
        ("VERY_LOW_C", VERY_LOW_C),
        ("VERY_LOW_C_SHARP", VERY_LOW_C_SHARP),
        ("VERY_LOW_D", VERY_LOW_D),
        ("LOW_C", LOW_C),
        ("LOW_C_SHARP", LOW_C_SHARP),
        ("LOW_D", LOW_D),
        ("LOW_D_SHARP", LOW_D_SHARP),
        ("LOW_E", LOW_E),
        ("LOW_F", LOW_F),
        ("LOW_F_SHARP", LOW_F_SHARP),
        ("LOW_G", LOW_G),
        ("LOW_G_SHARP", LOW_G_SHARP),
        ("LOW_A", LOW_A),
        ("LOW_A_SHARP", LOW_A_SHARP),
        ("LOW_B", LOW_B),
        ("MEDIUM_C", MEDIUM_C),
        ("MEDIUM_C_SHARP", MEDIUM_C_SHARP),
        ("MEDIUM_D", MEDIUM_D),
        ("MEDIUM_D_SHARP", MEDIUM_D_SHARP),
        ("MEDIUM_E", MEDIUM_E),
        ("MEDIUM_F", MEDIUM_F),
        ("MEDIUM_F_SHARP", MEDIUM_F_SHARP),
        ("MEDIUM_G", MEDIUM_G),
        ("MEDIUM_G_SHARP", MEDIUM_G_SHARP),
        ("MEDIUM_A", MEDIUM_A),
        ("MEDIUM_A_SHARP", MEDIUM_A_SHARP),
        ("MEDIUM_B", MEDIUM_B),
        ("HIGH_C", HIGH_C),
        ("HIGH_C_SHARP", HIGH_C_SHARP),
        ("HIGH_D", HIGH_D),
        ("HIGH_D_SHARP", HIGH_D_SHARP),
        ("HIGH_E", HIGH_E),
        ("HIGH_F", HIGH_F),
        ("HIGH_F_SHARP", HIGH_F_SHARP),
        ("HIGH_G", HIGH_G),
        ("HIGH_G_SHARP", HIGH_G_SHARP),
        ("HIGH_A", HIGH_A),
        ("HIGH_A_SHARP", HIGH_A_SHARP),
        ("HIGH_B", HIGH_B),
        ("VERY_HIGH_C", VERY_HIGH_C),
        ("VERY_HIGH_C_SHARP", VERY_HIGH_C_SHARP),
        ("VERY_HIGH_D", VERY_HIGH_D),
    ];

    /// Frequency for a table name (case-insensitive)
    pub fn by_name(name: &str) -> Option<u32> {
        super::lookup(ALL, name)
    }
}

/// Named note lengths (ms)
pub mod duration {
    /// 50 ms
    pub const VERY_SHORT: u32 = 50;
    /// 200 ms
    pub const SHORT: u32 = 200;
    /// 500 ms
    pub const MEDIUM: u32 = 500;
    /// 1000 ms
    pub const LONG: u32 = 1000;

    /// Every named duration
    pub const ALL: &[(&str, u32)] = &[
        ("VERY_SHORT", VERY_SHORT),
        ("SHORT", SHORT),
        ("MEDIUM", MEDIUM),
        ("LONG", LONG),
    ];

    /// Duration for a table name (case-insensitive)
    pub fn by_name(name: &str) -> Option<u32> {
        super::lookup(ALL, name)
    }
}

fn lookup(table: &[(&str, u32)], name: &str) -> Option<u32> {
    table
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|&(_, value)| value)
}

/// C-D-E-F-G scale, half a second per note
pub static SAMPLE_MELODY: [Note; 5] = [
    Note::new(pitch::MEDIUM_C, duration::MEDIUM as u16),
    Note::new(pitch::MEDIUM_D, duration::MEDIUM as u16),
    Note::new(pitch::MEDIUM_E, duration::MEDIUM as u16),
    Note::new(pitch::MEDIUM_F, duration::MEDIUM as u16),
    Note::new(pitch::MEDIUM_G, duration::MEDIUM as u16),
];
