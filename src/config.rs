//! Buzzer configuration
//!
//! Limits and timing constants shared by the parser and the controllers.
//! Every field has a default matching common piezo hardware, so a config file
//! only needs to name the values it changes.

use crate::note::{MAX_FREQUENCY, MIN_FREQUENCY};
use crate::{BuzzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default extra delay before a melody advances to its next note (ms).
pub const DEFAULT_SETTLE_MARGIN_MS: u32 = 50;

/// Default number of frequency flips per siren cycle.
pub const DEFAULT_SIREN_DIVISIONS: u32 = 10;

/// Default cap on parsed notes.
pub const DEFAULT_MAX_NOTES: usize = 100;

/// Default size of the notation working copy in bytes.
pub const DEFAULT_MAX_SOURCE_LEN: usize = 255;

/// Largest working copy a config may request in bytes.
pub const MAX_SOURCE_LEN_LIMIT: usize = 64 * 1024;

/// Inclusive frequency range an output channel accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyRange {
    /// Lowest accepted frequency (Hz)
    pub min: u32,
    /// Highest accepted frequency (Hz)
    pub max: u32,
}

impl FrequencyRange {
    /// Create a range
    pub const fn new(min: u32, max: u32) -> Self {
        FrequencyRange { min, max }
    }

    /// True if `frequency` lies inside the range
    pub fn contains(&self, frequency: u32) -> bool {
        (self.min..=self.max).contains(&frequency)
    }

    /// Check a frequency, producing the matching error when it is out of range
    pub fn check(&self, frequency: u32) -> Result<u32> {
        if self.contains(frequency) {
            Ok(frequency)
        } else {
            Err(BuzzerError::FrequencyOutOfRange {
                frequency,
                min: self.min,
                max: self.max,
            })
        }
    }
}

impl Default for FrequencyRange {
    fn default() -> Self {
        FrequencyRange::new(MIN_FREQUENCY, MAX_FREQUENCY)
    }
}

/// Notation parser limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserLimits {
    /// Maximum number of notes kept; further notes are dropped
    pub max_notes: usize,
    /// Maximum number of notation bytes copied into the working buffer
    pub max_source_len: usize,
}

impl Default for ParserLimits {
    fn default() -> Self {
        ParserLimits {
            max_notes: DEFAULT_MAX_NOTES,
            max_source_len: DEFAULT_MAX_SOURCE_LEN,
        }
    }
}

impl ParserLimits {
    /// Set the note cap
    pub fn max_notes(mut self, max_notes: usize) -> Self {
        self.max_notes = max_notes;
        self
    }

    /// Set the working buffer size
    pub fn max_source_len(mut self, max_source_len: usize) -> Self {
        self.max_source_len = max_source_len;
        self
    }
}

/// Configuration for the parser and all controllers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuzzerConfig {
    /// Frequencies accepted by `start()` and produced by the parser
    pub frequency_range: FrequencyRange,
    /// Extra time a melody waits after each note before advancing (ms)
    pub settle_margin_ms: u32,
    /// A siren flips frequency every `total_duration / siren_divisions` ms
    pub siren_divisions: u32,
    /// Parser limits
    pub parser: ParserLimits,
}

impl Default for BuzzerConfig {
    fn default() -> Self {
        BuzzerConfig {
            frequency_range: FrequencyRange::default(),
            settle_margin_ms: DEFAULT_SETTLE_MARGIN_MS,
            siren_divisions: DEFAULT_SIREN_DIVISIONS,
            parser: ParserLimits::default(),
        }
    }
}

impl BuzzerConfig {
    /// Set the accepted frequency range
    pub fn frequency_range(mut self, min: u32, max: u32) -> Self {
        self.frequency_range = FrequencyRange::new(min, max);
        self
    }

    /// Set the melody settling margin
    pub fn settle_margin_ms(mut self, margin: u32) -> Self {
        self.settle_margin_ms = margin;
        self
    }

    /// Set the siren flip divisor
    pub fn siren_divisions(mut self, divisions: u32) -> Self {
        self.siren_divisions = divisions;
        self
    }

    /// Set the parser limits
    pub fn parser(mut self, limits: ParserLimits) -> Self {
        self.parser = limits;
        self
    }

    /// Reject configurations the controllers cannot run with
    pub fn validate(&self) -> Result<()> {
        let range = self.frequency_range;
        if range.min == 0 {
            return Err(BuzzerError::ConfigError(
                "minimum frequency must be above 0 Hz (0 is the silence value)".into(),
            ));
        }
        if range.min > range.max {
            return Err(BuzzerError::ConfigError(format!(
                "frequency range {}..={} is empty",
                range.min, range.max
            )));
        }
        if self.siren_divisions == 0 {
            return Err(BuzzerError::ConfigError(
                "siren_divisions must be at least 1".into(),
            ));
        }
        if self.parser.max_notes == 0 || self.parser.max_source_len == 0 {
            return Err(BuzzerError::ConfigError(
                "parser limits must be non-zero".into(),
            ));
        }
        if self.parser.max_source_len > MAX_SOURCE_LEN_LIMIT {
            return Err(BuzzerError::ConfigError(format!(
                "max_source_len {} exceeds the {} byte limit",
                self.parser.max_source_len, MAX_SOURCE_LEN_LIMIT
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: BuzzerConfig = serde_json::from_str(json)
            .map_err(|e| BuzzerError::ConfigError(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            BuzzerError::ConfigError(format!(
                "failed to read '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BuzzerError::ConfigError(format!("failed to serialize config: {}", e)))
    }
}
