//! Command-line argument parsing for the buzzer-fx player.

use buzzer_fx::tables::melodies;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Sound to play
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Melody notation (a built-in melody or a literal string)
    Notation(String),
    /// The built-in C-D-E-F-G sample melody
    Sample,
    /// Single tone
    Tone { frequency: u32, duration_ms: u32 },
    /// Repeating alert
    Beep {
        count: u32,
        frequency: u32,
        duration_ms: u32,
        lapse_ms: u32,
    },
    /// Frequency sweep
    Sweep {
        start: u32,
        end: u32,
        step: i32,
        duration_ms: u32,
    },
    /// Two-tone siren
    Siren { low: u32, high: u32, total_ms: u32 },
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Notation(text) => match text.split(':').next() {
                Some(name) if !name.is_empty() => write!(f, "melody '{}'", name),
                _ => f.write_str("melody"),
            },
            Effect::Sample => f.write_str("sample melody"),
            Effect::Tone { frequency, duration_ms } => {
                write!(f, "tone {} Hz for {} ms", frequency, duration_ms)
            }
            Effect::Beep { count, frequency, .. } => write!(f, "{} beeps at {} Hz", count, frequency),
            Effect::Sweep { start, end, .. } => write!(f, "sweep {} -> {} Hz", start, end),
            Effect::Siren { low, high, .. } => write!(f, "siren {} / {} Hz", low, high),
        }
    }
}

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Sound to play
    pub effect: Option<Effect>,
    /// Melody repeat count
    pub repeat: u8,
    /// JSON config file
    pub config_path: Option<PathBuf>,
    /// Render to this WAV file instead of playing
    pub export_path: Option<PathBuf>,
    /// Print the output commands instead of playing
    pub dry_run: bool,
    /// List the built-in melodies
    pub list: bool,
    /// Whether help was requested
    pub show_help: bool,
}

/// Split `a:b:c` into exactly `N` numbers
fn numbers<T: std::str::FromStr, const N: usize>(value: &str) -> Option<[T; N]> {
    let parts: Vec<T> = value
        .split(':')
        .map(|part| part.trim().parse().ok())
        .collect::<Option<_>>()?;
    parts.try_into().ok()
}

fn parse_effect(flag: &str, value: &str) -> Option<Effect> {
    match flag {
        "--tone" => numbers::<u32, 2>(value).map(|[frequency, duration_ms]| Effect::Tone {
            frequency,
            duration_ms,
        }),
        "--beep" => {
            numbers::<u32, 4>(value).map(|[count, frequency, duration_ms, lapse_ms]| Effect::Beep {
                count,
                frequency,
                duration_ms,
                lapse_ms,
            })
        }
        "--sweep" => {
            let [start, end, step, duration_ms] = numbers::<i64, 4>(value)?;
            Some(Effect::Sweep {
                start: u32::try_from(start).ok()?,
                end: u32::try_from(end).ok()?,
                step: i32::try_from(step).ok()?,
                duration_ms: u32::try_from(duration_ms).ok()?,
            })
        }
        "--siren" => numbers::<u32, 3>(value).map(|[low, high, total_ms]| Effect::Siren {
            low,
            high,
            total_ms,
        }),
        _ => None,
    }
}

impl CliArgs {
    /// Parse arguments from command line.
    pub fn parse() -> Self {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse an explicit argument list (program name excluded).
    pub fn parse_from<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut parsed = Self {
            repeat: 1,
            ..Self::default()
        };
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" | "-h" => parsed.show_help = true,
                "--list" | "-l" => parsed.list = true,
                "--dry-run" | "-n" => parsed.dry_run = true,
                "--sample" => parsed.effect = Some(Effect::Sample),
                "--melody" | "-m" => match iter.next() {
                    Some(name) => match melodies::by_name(&name) {
                        Some(notation) => parsed.effect = Some(Effect::Notation(notation.to_string())),
                        None => {
                            eprintln!("Unknown melody: {} (see --list)", name);
                            parsed.show_help = true;
                        }
                    },
                    None => {
                        eprintln!("--melody requires a name");
                        parsed.show_help = true;
                    }
                },
                "--repeat" | "-r" => match iter.next().and_then(|v| v.parse().ok()) {
                    Some(repeat) => parsed.repeat = repeat,
                    None => {
                        eprintln!("--repeat requires a number between 0 and 255");
                        parsed.show_help = true;
                    }
                },
                "--config" | "-c" => match iter.next() {
                    Some(path) => parsed.config_path = Some(PathBuf::from(path)),
                    None => {
                        eprintln!("--config requires a file path");
                        parsed.show_help = true;
                    }
                },
                "--export" | "-o" => match iter.next() {
                    Some(path) => parsed.export_path = Some(PathBuf::from(path)),
                    None => {
                        eprintln!("--export requires a file path");
                        parsed.show_help = true;
                    }
                },
                "--tone" | "--beep" | "--sweep" | "--siren" => {
                    match iter.next().and_then(|v| parse_effect(&arg, &v)) {
                        Some(effect) => parsed.effect = Some(effect),
                        None => {
                            eprintln!("{} has malformed parameters (see --help)", arg);
                            parsed.show_help = true;
                        }
                    }
                }
                _ if arg.starts_with('-') => {
                    eprintln!("Unknown flag: {}", arg);
                    parsed.show_help = true;
                }
                _ => {
                    let notation = melodies::by_name(&arg).map(str::to_string).unwrap_or(arg);
                    parsed.effect = Some(Effect::Notation(notation));
                }
            }
        }

        parsed
    }

    /// Print help text to stderr.
    pub fn print_help() {
        eprintln!(
            "Usage:\n  buzzer-fx [options] <melody-name | notation>\n  buzzer-fx [options] --tone|--beep|--sweep|--siren <params>\n\n\
             Sounds:\n\
             \x20 <melody-name>              Built-in melody (see --list)\n\
             \x20 <notation>                 Melody notation, e.g. \"Tune:d=4,o=5,b=120:c,e,g\"\n\
             \x20 -m, --melody <name>        Built-in melody\n\
             \x20 --sample                   C-D-E-F-G sample melody\n\
             \x20 --tone <hz:ms>             Single tone\n\
             \x20 --beep <n:hz:ms:lapse>     n beeps, lapse ms apart\n\
             \x20 --sweep <from:to:step:ms>  Frequency sweep, step may be negative\n\
             \x20 --siren <low:high:ms>      Two-tone siren\n\n\
             Options:\n\
             \x20 -r, --repeat <n>           Play a melody n times (default 1)\n\
             \x20 -c, --config <file.json>   Load buzzer configuration\n\
             \x20 -o, --export <file.wav>    Render to WAV (needs the export-wav feature)\n\
             \x20 -n, --dry-run              Print output commands instead of playing\n\
             \x20 -l, --list                 List built-in melodies\n\
             \x20 -h, --help                 Show this help\n\n\
             Set RUST_LOG=debug to trace controller state changes."
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_builtin_melody_by_name() {
        let args = parse(&["nokia", "--repeat", "2"]);
        assert_eq!(args.effect, Some(Effect::Notation(melodies::NOKIA.to_string())));
        assert_eq!(args.repeat, 2);
        assert!(!args.show_help);
    }

    #[test]
    fn test_literal_notation() {
        let args = parse(&["x:d=4:c,e"]);
        assert_eq!(args.effect, Some(Effect::Notation("x:d=4:c,e".to_string())));
    }

    #[test]
    fn test_effect_parameters() {
        assert_eq!(
            parse(&["--sweep", "1000:500:-50:20"]).effect,
            Some(Effect::Sweep {
                start: 1000,
                end: 500,
                step: -50,
                duration_ms: 20
            })
        );
        assert_eq!(
            parse(&["--siren", "600:900:2000"]).effect,
            Some(Effect::Siren {
                low: 600,
                high: 900,
                total_ms: 2000
            })
        );
        assert!(parse(&["--beep", "3:1000"]).show_help);
    }

    #[test]
    fn test_unknown_flag_shows_help() {
        assert!(parse(&["--bogus"]).show_help);
        assert!(parse(&["--melody", "nope"]).show_help);
    }
}
