//! Melody notation parser
//!
//! Parses RTTTL-style ringtone strings into note sequences:
//!
//! ```text
//! Nokia:d=4,o=5,b=225:8e6,8d6,f#,g#,8c#6,8b,d,e,8b,8a,c#,e,2a
//! ^^^^^ ^^^^^^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^
//! name  defaults      notes
//! ```
//!
//! Header fields `d` (duration divisor), `o` (octave) and `b` (tempo) override
//! the defaults 4, 6 and 120; other fields are ignored. Each note may give its
//! own divisor, a `#`, an octave digit and a `.` (dotted, one and a half times
//! as long). `p` is a rest.
//!
//! Malformed notes never fail the parse: a token without a pitch letter is
//! skipped and a pitch outside the output range becomes a rest. Only a
//! missing `:` delimiter or empty input is an error.

mod grammar;
pub mod pitch;
mod source;

pub use source::{FlashImage, FlashReader, NotationSource};

use crate::config::{BuzzerConfig, FrequencyRange, ParserLimits};
use crate::note::{Melody, Note};
use crate::{BuzzerError, Result};
use log::{debug, warn};

/// Header defaults applied to notes that omit a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderDefaults {
    /// Duration divisor (4 = quarter note)
    pub duration: u32,
    /// Octave
    pub octave: u8,
    /// Tempo in beats per minute
    pub bpm: u32,
}

impl Default for HeaderDefaults {
    fn default() -> Self {
        HeaderDefaults {
            duration: 4,
            octave: 6,
            bpm: 120,
        }
    }
}

impl HeaderDefaults {
    /// Length of a quarter note at this tempo
    pub fn quarter_note_ms(&self) -> u32 {
        pitch::quarter_note_ms(self.bpm)
    }

    /// Apply `d=`, `o=` and `b=` fields, ignoring anything else.
    ///
    /// A zero value keeps the default so later arithmetic never divides by
    /// zero.
    fn apply(&mut self, header: &[u8]) {
        for field in header.split(|&b| b == b',') {
            match grammar::header_field(field) {
                Ok((_, (_, 0))) => {
                    debug!(target: "buzzer::parser", "ignoring zero header field");
                }
                Ok((_, (b'd', value))) => self.duration = value,
                Ok((_, (b'o', value))) => self.octave = value.min(u8::MAX as u32) as u8,
                Ok((_, (b'b', value))) => self.bpm = value,
                Ok(_) | Err(_) => {}
            }
        }
    }
}

/// Result of parsing a notation string
///
/// Owns exactly as many notes as were parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMelody {
    name: String,
    defaults: HeaderDefaults,
    notes: Box<[Note]>,
    truncated: bool,
}

impl ParsedMelody {
    /// Melody name from the notation header
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved header defaults
    pub fn defaults(&self) -> HeaderDefaults {
        self.defaults
    }

    /// Parsed notes
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Number of parsed notes
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// True if no notes were parsed
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// True if notes were dropped because of the note cap or working buffer size
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Hand the notes over as an owned melody
    pub fn into_melody(self) -> Melody {
        Melody::Owned(self.notes)
    }
}

impl From<ParsedMelody> for Melody {
    fn from(parsed: ParsedMelody) -> Self {
        parsed.into_melody()
    }
}

/// Notation parser with configurable limits
#[derive(Debug, Clone, Copy, Default)]
pub struct NotationParser {
    limits: ParserLimits,
    range: FrequencyRange,
}

impl NotationParser {
    /// Parser with default limits and frequency range
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser using the limits and range of `config`
    pub fn with_config(config: &BuzzerConfig) -> Self {
        NotationParser {
            limits: config.parser,
            range: config.frequency_range,
        }
    }

    /// Limits in effect
    pub fn limits(&self) -> ParserLimits {
        self.limits
    }

    /// Parse a notation string in ordinary memory
    pub fn parse_str(&self, notation: &str) -> Result<ParsedMelody> {
        self.parse(NotationSource::Ram(notation))
    }

    /// Parse a notation string from any source
    pub fn parse(&self, source: NotationSource<'_>) -> Result<ParsedMelody> {
        let (text, mut truncated) = source.working_copy(self.limits.max_source_len);
        if text.is_empty() {
            return Err(BuzzerError::EmptyNotation);
        }
        if truncated {
            warn!(
                target: "buzzer::parser",
                "notation longer than {} bytes, cut off",
                self.limits.max_source_len
            );
        }

        let sections = grammar::split_sections(&text)
            .map_err(|section| BuzzerError::MissingSection { section })?;

        let mut defaults = HeaderDefaults::default();
        defaults.apply(sections.header);
        let quarter_ms = defaults.quarter_note_ms();

        let mut notes = Vec::with_capacity(self.limits.max_notes.min(64));
        let mut tokens = sections
            .notes
            .split(|&b| b == b',')
            .map(grammar::trim)
            .filter(|token| !token.is_empty());

        for token in tokens.by_ref() {
            let parsed = match grammar::note_token(token) {
                Ok((_, parsed)) => parsed,
                Err(_) => {
                    debug!(
                        target: "buzzer::parser",
                        "skipping malformed note '{}'",
                        String::from_utf8_lossy(token)
                    );
                    continue;
                }
            };

            let divisor = parsed.duration.filter(|&d| d > 0).unwrap_or(defaults.duration);
            let octave = parsed.octave.unwrap_or(defaults.octave);
            notes.push(Note {
                frequency: pitch::note_frequency(parsed.pitch, parsed.sharp, octave, &self.range),
                duration_ms: pitch::note_duration_ms(quarter_ms, divisor, parsed.dotted),
            });

            if notes.len() >= self.limits.max_notes {
                break;
            }
        }

        if tokens.any(|token| grammar::note_token(token).is_ok()) {
            truncated = true;
            warn!(
                target: "buzzer::parser",
                "melody exceeds {} notes, remaining notes dropped",
                self.limits.max_notes
            );
        }

        let name = String::from_utf8_lossy(grammar::trim(sections.name)).into_owned();
        debug!(
            target: "buzzer::parser",
            "parsed '{}': {} notes at {} bpm",
            name,
            notes.len(),
            defaults.bpm
        );

        Ok(ParsedMelody {
            name,
            defaults,
            notes: notes.into_boxed_slice(),
            truncated,
        })
    }
}

/// Parse a notation string with default limits
pub fn parse_notation(notation: &str) -> Result<ParsedMelody> {
    NotationParser::new().parse_str(notation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::SILENCE;

    const NOKIA: &str = "Nokia:d=4,o=5,b=225:8e6,8d6,f#,g#,8c#6,8b,d,e,8b,8a,c#,e,2a";

    #[test]
    fn test_parse_nokia() {
        let melody = parse_notation(NOKIA).unwrap();
        assert_eq!(melody.name(), "Nokia");
        assert_eq!(melody.len(), 13);
        assert!(!melody.is_truncated());
        assert_eq!(
            melody.defaults(),
            HeaderDefaults {
                duration: 4,
                octave: 5,
                bpm: 225
            }
        );
        assert_eq!(melody.notes()[0], Note::new(1320, 133));
        // f# at the header octave, quarter note
        assert_eq!(melody.notes()[2], Note::new(740, 266));
        // 2a: half note, octave 5
        assert_eq!(melody.notes()[12], Note::new(880, 532));
    }

    #[test]
    fn test_header_defaults_when_missing() {
        let melody = parse_notation("x::a").unwrap();
        // Default octave 6, quarter note at 120 bpm
        assert_eq!(melody.notes(), &[Note::new(1760, 500)]);
    }

    #[test]
    fn test_unknown_header_fields_ignored() {
        let melody = parse_notation("x:l=9,b=60,zz:4c4").unwrap();
        assert_eq!(melody.defaults().bpm, 60);
        assert_eq!(melody.notes(), &[Note::new(262, 1000)]);
    }

    #[test]
    fn test_zero_header_values_keep_defaults() {
        let melody = parse_notation("x:d=0,b=0:c4").unwrap();
        assert_eq!(melody.defaults(), HeaderDefaults { octave: 6, ..Default::default() });
        assert_eq!(melody.notes()[0].duration_ms, 500);
    }

    #[test]
    fn test_pause_is_always_silent() {
        let melody = parse_notation("x:d=4,o=5,b=120:p,8p,p#,p6,p.,16p#7.").unwrap();
        assert_eq!(melody.len(), 6);
        assert!(melody.notes().iter().all(|n| n.frequency == SILENCE));
        assert_eq!(melody.notes()[1].duration_ms, 250);
        assert_eq!(melody.notes()[4].duration_ms, 750);
    }

    #[test]
    fn test_dotted_notes() {
        let melody = parse_notation("x:d=4,o=5,b=225:2b.,c.6").unwrap();
        assert_eq!(melody.notes()[0], Note::new(988, 798));
        assert_eq!(melody.notes()[1], Note::new(1048, 399));
    }

    #[test]
    fn test_case_and_whitespace_tolerated() {
        let melody = parse_notation("Tune: d=8, o=5, b=120 : C, 4D#6 ,\n e").unwrap();
        assert_eq!(
            melody.notes(),
            &[Note::new(524, 250), Note::new(1244, 500), Note::new(660, 250)]
        );
    }

    #[test]
    fn test_note_cap_truncates_silently() {
        let notes = vec!["8c"; 150].join(",");
        let melody = parse_notation(&format!("x:d=4,o=5,b=120:{}", notes));
        // 150 tokens do not fit in 255 bytes, so lift the buffer limit
        assert!(melody.is_ok());

        let parser = NotationParser::with_config(
            &BuzzerConfig::default().parser(ParserLimits::default().max_source_len(4096)),
        );
        let melody = parser
            .parse_str(&format!("x:d=4,o=5,b=120:{}", notes))
            .unwrap();
        assert_eq!(melody.len(), 100);
        assert!(melody.is_truncated());
    }

    #[test]
    fn test_exact_cap_is_not_truncated() {
        let parser = NotationParser::with_config(
            &BuzzerConfig::default().parser(ParserLimits::default().max_notes(3)),
        );
        let melody = parser.parse_str("x::c,d,e").unwrap();
        assert_eq!(melody.len(), 3);
        assert!(!melody.is_truncated());
    }

    #[test]
    fn test_huge_source_limit_parses() {
        let parser = NotationParser::with_config(
            &BuzzerConfig::default().parser(ParserLimits::default().max_source_len(usize::MAX)),
        );
        assert_eq!(parser.parse_str("x::c").unwrap().len(), 1);

        let image = FlashImage::new(b"x::c,d\0");
        let melody = parser
            .parse(NotationSource::Flash {
                reader: &image,
                address: 0,
            })
            .unwrap();
        assert_eq!(melody.len(), 2);
        assert!(!melody.is_truncated());
    }

    #[test]
    fn test_cap_ignores_trailing_malformed_tokens() {
        let parser = NotationParser::with_config(
            &BuzzerConfig::default().parser(ParserLimits::default().max_notes(2)),
        );
        let melody = parser.parse_str("x::c,d,#, ,9").unwrap();
        assert_eq!(melody.len(), 2);
        assert!(!melody.is_truncated());

        let melody = parser.parse_str("x::c,d,#,e").unwrap();
        assert_eq!(melody.len(), 2);
        assert!(melody.is_truncated());
    }

    #[test]
    fn test_working_copy_limit() {
        let parser = NotationParser::with_config(
            &BuzzerConfig::default().parser(ParserLimits::default().max_source_len(12)),
        );
        // "x:d=4,o=5,b=120:c,d" cut to "x:d=4,o=5,b=" leaves no notes section
        assert!(matches!(
            parser.parse_str("x:d=4,o=5,b=120:c,d"),
            Err(BuzzerError::MissingSection { section: "notes" })
        ));

        let melody = parser.parse_str("x::c,d,e,f,g,a,b").unwrap();
        assert_eq!(melody.len(), 5);
        assert!(melody.is_truncated());
    }

    #[test]
    fn test_failures() {
        assert!(matches!(parse_notation(""), Err(BuzzerError::EmptyNotation)));
        assert!(matches!(
            parse_notation("just text"),
            Err(BuzzerError::MissingSection { section: "header" })
        ));
        assert!(matches!(
            parse_notation("name:d=4"),
            Err(BuzzerError::MissingSection { section: "notes" })
        ));
    }

    #[test]
    fn test_malformed_tokens_skipped() {
        let melody = parse_notation("x:o=5:c,,8,#,d").unwrap();
        assert_eq!(melody.len(), 2);
        assert_eq!(melody.notes()[1].frequency, 588);
    }

    #[test]
    fn test_empty_notes_section_parses() {
        let melody = parse_notation("x:d=4:").unwrap();
        assert!(melody.is_empty());
    }

    #[test]
    fn test_parse_from_flash() {
        let image = FlashImage::new(b"\xff\xffNokia:d=4,o=5,b=225:8e6,8d6\0");
        let melody = NotationParser::new()
            .parse(NotationSource::Flash {
                reader: &image,
                address: 2,
            })
            .unwrap();
        assert_eq!(melody.notes(), &[Note::new(1320, 133), Note::new(1176, 133)]);
    }

    #[test]
    fn test_into_melody_is_owned() {
        let melody: Melody = parse_notation(NOKIA).unwrap().into();
        assert!(melody.is_owned());
        assert_eq!(melody.len(), 13);
    }
}
