//! Built-in notation library
//!
//! Well-known ringtones in melody notation. Feed them to
//! [`parse_notation`](crate::parse_notation) or
//! [`MelodyController::start_notation`](crate::MelodyController::start_notation).
//! `MISSION` is longer than the default 255-byte working buffer, so its last
//! two notes are cut unless the parser limit is raised.

/// Nokia ringtone
pub const NOKIA: &str = "Nokia:d=4,o=5,b=225:8e6,8d6,f#,g#,8c#6,8b,d,e,8b,8a,c#,e,2a";

/// The X-Files theme
pub const XFILES: &str = "Xfiles:d=4,o=5,b=125:e,b,a,b,d6,2b.,1p,e,b,a,b,e6,2b.,1p,g6,f#6,e6,d6,e6,2b.,1p,g6,f#6,e6,d6,f#6,2b.,1p,e,b,a,b,d6,2b.,1p,e,b,a,b,e6,2b.,1p,e6,2b.";

/// Mission: Impossible theme
pub const MISSION: &str = "MissionImp:d=16,o=6,b=95:32d,32d#,32d,32d#,32d,32d#,32d,32d#,32d,32d,32d#,32e,32f,32f#,32g,g,8p,g,8p,a#,p,c7,p,g,8p,g,8p,f,p,f#,p,g,8p,g,8p,a#,p,c7,p,g,8p,g,8p,f,p,f#,p,a#,g,2d,32p,a#,g,2c#,32p,a#,g,2c,a#5,8c,2p,32p,a#5,g5,2f#,32p,a#5,g5,2f,32p,a#5,g5,2e,d#,8d";

/// The Simpsons theme
pub const SIMPSONS: &str = "The Simpsons:d=4,o=5,b=160:c.6,e6,f#6,8a6,g.6,e6,c6,8a,8f#,8f#,8f#,2g,8p,8p,8f#,8f#,8f#,8g,a#.,8c6,8c6,8c6,c6";

/// Inspector Gadget theme
pub const GADGET: &str = "Gadget:d=16,o=5,b=50:32d#,32f,32f#,32g#,a#,f#,a,f,g#,f#,32d#,32f,32f#,32g#,a#,d#6,4d6,32d#,32f,32f#,32g#,a#,f#,a,f,g#,f#,8d#";

/// Pachelbel's Canon
pub const CANON: &str = "Canon:d=16,o=6,b=125:8a#.,g.,g#.,8a#.,g.,g#.,a#.,a#.5,c.,d.,d#.,f.,g.,g#.,8g.,d#.,f.,8g.,g.5,g#.5,a#.5,c.,a#.5,g#.5,a#.5,g.5,g#.5,a#.5,8g#.5,c.,a#.5,8g#.5,g.5,f.5,g.5,f.5,d#.5,f.5,g.5,g#.5,a#.5,c.,8g#.5,c.,a#.5,8c.,d.,d#.,a#.5,c.,d.,d#.,f.,g.,g#.,8a#";

/// Super Mario World, athletic theme
pub const SUPERMARIO: &str = "smwwd1:d=4,o=5,b=125:a,8f.,16c,16d,16f,16p,f,16d,16c,16p,16f,16p,16f,16p,8c6,8a.,g,16c,a,8f.,16c,16d,16f,16p,f,16d,16c,16p,16f,16p,16a#,16a,16g,2f,16p,8a.,8f.,8c,8a.,f,16g#,16f,16c,16p,8g#.,2g,8a.,8f.,8c,8a.,f,16g#,16f,8c,2c6";

/// Library keys and notation strings
pub const ALL: &[(&str, &str)] = &[
    ("nokia", NOKIA),
    ("xfiles", XFILES),
    ("mission", MISSION),
    ("simpsons", SIMPSONS),
    ("gadget", GADGET),
    ("canon", CANON),
    ("supermario", SUPERMARIO),
];

/// Notation for a library key (case-insensitive)
pub fn by_name(name: &str) -> Option<&'static str> {
    ALL.iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|&(_, notation)| notation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuzzerConfig, ParserLimits};
    use crate::notation::{parse_notation, NotationParser};

    #[test]
    fn test_library_parses() {
        let expected = [
            ("nokia", 13),
            ("xfiles", 44),
            ("simpsons", 23),
            ("gadget", 28),
            ("canon", 56),
            ("supermario", 55),
        ];
        for (key, notes) in expected {
            let melody = parse_notation(by_name(key).unwrap()).unwrap();
            assert_eq!(melody.len(), notes, "{}", key);
            assert!(!melody.is_truncated(), "{}", key);
        }
    }

    #[test]
    fn test_mission_cut_by_working_buffer() {
        let cut = parse_notation(MISSION).unwrap();
        assert_eq!(cut.name(), "MissionImp");
        assert_eq!(cut.len(), 73);
        assert!(cut.is_truncated());

        let parser = NotationParser::with_config(
            &BuzzerConfig::default().parser(ParserLimits::default().max_source_len(512)),
        );
        let full = parser.parse_str(MISSION).unwrap();
        assert_eq!(full.len(), 75);
        assert!(!full.is_truncated());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(by_name("Nokia"), Some(NOKIA));
        assert_eq!(by_name("unknown"), None);
    }
}
