//! Notation grammar
//!
//! ```text
//! melody := name ":" header ":" notes
//! header := field ("," field)*        ; d=<int> o=<int> b=<int>
//! notes  := note ("," note)*
//! note   := [digits] pitch ["#"] [octave-digit] ["."]
//! ```
//!
//! The combinators work on bytes so a working copy cut at an arbitrary
//! length never has to be valid UTF-8.

use nom::bytes::complete::take_till;
use nom::character::complete::{char, digit1, satisfy, space0};
use nom::combinator::{map, opt};
use nom::sequence::{terminated, tuple};
use nom::IResult;

/// The three `:`-separated parts of a notation string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Sections<'a> {
    pub name: &'a [u8],
    pub header: &'a [u8],
    pub notes: &'a [u8],
}

/// One note token before pitch/duration resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NoteToken {
    pub duration: Option<u32>,
    pub pitch: u8,
    pub sharp: bool,
    pub octave: Option<u8>,
    pub dotted: bool,
}

/// Bytes up to (not including) the next `:`, consuming the `:`
fn section(input: &[u8]) -> IResult<&[u8], &[u8]> {
    terminated(take_till(|b: u8| b == b':'), char(':'))(input)
}

/// Split a notation string into name, header and notes.
///
/// Returns the name of the first section that could not be delimited.
pub(crate) fn split_sections(input: &[u8]) -> Result<Sections<'_>, &'static str> {
    let (rest, name) = section(input).map_err(|_| "header")?;
    let (notes, header) = section(rest).map_err(|_| "notes")?;
    Ok(Sections {
        name,
        header,
        notes,
    })
}

/// Decimal number, saturating instead of overflowing
fn number(input: &[u8]) -> IResult<&[u8], u32> {
    map(digit1, |digits: &[u8]| {
        digits.iter().fold(0u32, |acc, d| {
            acc.saturating_mul(10).saturating_add(u32::from(d - b'0'))
        })
    })(input)
}

/// `key=value` header field, key lowercased
pub(crate) fn header_field(input: &[u8]) -> IResult<&[u8], (u8, u32)> {
    let (input, _) = space0(input)?;
    let (input, key) = satisfy(|c: char| c.is_ascii_alphabetic())(input)?;
    let (input, _) = tuple((space0, char('='), space0))(input)?;
    let (input, value) = number(input)?;
    Ok((input, (key.to_ascii_lowercase() as u8, value)))
}

fn octave_digit(input: &[u8]) -> IResult<&[u8], u8> {
    map(satisfy(|c: char| c.is_ascii_digit()), |c| c as u8 - b'0')(input)
}

fn dot(input: &[u8]) -> IResult<&[u8], bool> {
    map(opt(char('.')), |d| d.is_some())(input)
}

/// One note token.
///
/// The dot is accepted on either side of the octave digit (`c6.` and the
/// common `c.6` spelling mean the same note).
pub(crate) fn note_token(input: &[u8]) -> IResult<&[u8], NoteToken> {
    let (input, _) = space0(input)?;
    let (input, duration) = opt(number)(input)?;
    let (input, pitch) = satisfy(|c: char| c.is_ascii_alphabetic())(input)?;
    let (input, sharp) = map(opt(char('#')), |s| s.is_some())(input)?;
    let (input, dot_before) = dot(input)?;
    let (input, octave) = opt(octave_digit)(input)?;
    let (input, dot_after) = dot(input)?;
    Ok((
        input,
        NoteToken {
            duration,
            pitch: pitch.to_ascii_lowercase() as u8,
            sharp,
            octave,
            dotted: dot_before || dot_after,
        },
    ))
}

/// Trim ASCII whitespace (including line breaks) from both ends
pub(crate) fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sections() {
        let s = split_sections(b"Nokia:d=4,o=5,b=225:8e6,8d6").unwrap();
        assert_eq!(s.name, b"Nokia");
        assert_eq!(s.header, b"d=4,o=5,b=225");
        assert_eq!(s.notes, b"8e6,8d6");
    }

    #[test]
    fn test_split_sections_missing() {
        assert_eq!(split_sections(b"no separators"), Err("header"));
        assert_eq!(split_sections(b"Name:d=4,o=5"), Err("notes"));
        // Empty sections are still sections
        let s = split_sections(b"::").unwrap();
        assert!(s.name.is_empty() && s.header.is_empty() && s.notes.is_empty());
    }

    #[test]
    fn test_header_field() {
        assert_eq!(header_field(b"d=4").unwrap().1, (b'd', 4));
        assert_eq!(header_field(b" B = 225").unwrap().1, (b'b', 225));
        assert!(header_field(b"=4").is_err());
        assert!(header_field(b"x").is_err());
    }

    #[test]
    fn test_note_token_full() {
        let (rest, token) = note_token(b"8c#6.").unwrap();
        assert!(rest.is_empty());
        assert_eq!(
            token,
            NoteToken {
                duration: Some(8),
                pitch: b'c',
                sharp: true,
                octave: Some(6),
                dotted: true,
            }
        );
    }

    #[test]
    fn test_note_token_minimal() {
        let (_, token) = note_token(b"E").unwrap();
        assert_eq!(token.pitch, b'e');
        assert_eq!(token.duration, None);
        assert_eq!(token.octave, None);
        assert!(!token.sharp && !token.dotted);
    }

    #[test]
    fn test_note_token_dot_before_octave() {
        let (rest, token) = note_token(b"c.6").unwrap();
        assert!(rest.is_empty());
        assert_eq!(token.octave, Some(6));
        assert!(token.dotted);
    }

    #[test]
    fn test_note_token_rejects_missing_pitch() {
        assert!(note_token(b"8").is_err());
        assert!(note_token(b"#").is_err());
    }

    #[test]
    fn test_number_saturates() {
        let (_, token) = note_token(b"99999999999c").unwrap();
        assert_eq!(token.duration, Some(u32::MAX));
    }

    #[test]
    fn test_trim() {
        assert_eq!(trim(b"  8e6\r\n"), b"8e6");
        assert_eq!(trim(b"   "), b"");
    }
}
