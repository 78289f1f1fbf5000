//! Non-blocking buzzer sound effects
//!
//! Drives a single-channel square-wave output (a passive piezo buzzer or a
//! speaker on a PWM pin) from a cooperative control loop. Nothing in this
//! crate blocks or sleeps: every controller captures a timestamp when it
//! starts and compares it against the clock each time it is ticked.
//!
//! # Features
//! - RTTTL-style melody notation parser with configurable limits
//! - Tone, melody, alert/beep, frequency sweep and siren controllers
//! - Explicit output channel handles with exclusive channel leases
//! - Named tone tables and a small library of built-in melodies
//! - In-memory simulated buzzer for tests and offline rendering
//!
//! # Crate feature flags
//! - `export-wav` (opt-in): Render controller runs to WAV files (`export`)
//! - `streaming` (opt-in): Play the square wave on the host audio device (`streaming`)
//!
//! # Quick start
//! ```
//! use buzzer_fx::sim::SimulatedBuzzer;
//! use buzzer_fx::{Channel, ChannelId, Controller, MelodyController};
//!
//! let mut buzzer = SimulatedBuzzer::new();
//! let mut melody = MelodyController::new(Channel::new(ChannelId(0)));
//!
//! melody
//!     .start_notation(&mut buzzer, "Nokia:d=4,o=5,b=225:8e6,8d6,f#,g#,8c#6,8b,d,e,8b,8a,c#,e,2a", 1)
//!     .unwrap();
//!
//! // The embedding control loop ticks the controller alongside its other duties.
//! while melody.is_active() {
//!     buzzer.advance(1);
//!     melody.tick(&mut buzzer);
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod controller;
#[cfg(feature = "export-wav")]
pub mod export;
pub mod hal;
pub mod notation;
pub mod note;
pub mod sim;
#[cfg(feature = "streaming")]
pub mod streaming;
pub mod tables;

/// Error types for buzzer operations
#[derive(thiserror::Error, Debug)]
pub enum BuzzerError {
    /// Notation string was empty
    #[error("notation is empty")]
    EmptyNotation,

    /// Notation is missing one of its `:`-separated sections
    #[error("notation has no {section} section")]
    MissingSection {
        /// Name of the section that could not be located
        section: &'static str,
    },

    /// Frequency outside the configured output range
    #[error("frequency {frequency} Hz outside {min}..={max} Hz")]
    FrequencyOutOfRange {
        /// Requested frequency in Hz
        frequency: u32,
        /// Lowest accepted frequency in Hz
        min: u32,
        /// Highest accepted frequency in Hz
        max: u32,
    },

    /// Duration of zero milliseconds
    #[error("duration must be positive")]
    ZeroDuration,

    /// Pulse count of zero
    #[error("pulse count must be positive")]
    ZeroCount,

    /// Sweep step of zero
    #[error("sweep step must be non-zero")]
    ZeroStep,

    /// Melody without notes
    #[error("melody has no notes")]
    EmptyMelody,

    /// Channel already leased by another controller
    #[error("channel {0} is in use by another controller")]
    ChannelBusy(ChannelId),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Error writing audio file
    #[error("Audio file write error: {0}")]
    AudioFileError(String),

    /// Audio device error
    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for BuzzerError {
    /// Converts a String into `BuzzerError::Other`.
    fn from(msg: String) -> Self {
        BuzzerError::Other(msg)
    }
}

impl From<&str> for BuzzerError {
    /// Converts a string slice into `BuzzerError::Other`.
    fn from(msg: &str) -> Self {
        BuzzerError::Other(msg.to_string())
    }
}

/// Result type for buzzer operations
pub type Result<T> = std::result::Result<T, BuzzerError>;

// Public API exports
pub use config::{BuzzerConfig, FrequencyRange, ParserLimits};
pub use controller::{
    AlertController, Controller, MelodyController, SirenController, ToneController,
    ToneSeriesController,
};
pub use hal::{Board, Channel, ChannelArbiter, ChannelId, ChannelLease, Clock, SystemClock};
pub use hal::{ToneHardware, ToneOutput};
pub use notation::{parse_notation, FlashReader, NotationParser, NotationSource, ParsedMelody};
pub use note::{Melody, Note, MAX_FREQUENCY, MIN_FREQUENCY, SILENCE};

#[cfg(feature = "export-wav")]
pub use export::{export_to_wav, ExportConfig};
#[cfg(feature = "streaming")]
pub use streaming::{Speaker, SpeakerOutput};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BuzzerError::ChannelBusy(ChannelId(2)).to_string(),
            "channel #2 is in use by another controller"
        );
        assert!(matches!(BuzzerError::from("oops"), BuzzerError::Other(ref m) if m == "oops"));
    }
}
