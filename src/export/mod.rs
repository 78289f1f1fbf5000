//! Offline export of buzzer output
//!
//! Captures what a controller run sent to a
//! [`SimulatedBuzzer`](crate::sim::SimulatedBuzzer) and writes it
//! as a square-wave WAV file, so a melody or effect can be auditioned without
//! hardware.
//!
//! ```no_run
//! use buzzer_fx::export::{export_to_wav_with_config, ExportConfig};
//! use buzzer_fx::sim::{run_until_idle, SimulatedBuzzer};
//! use buzzer_fx::tables::melodies;
//! use buzzer_fx::{Channel, ChannelId, MelodyController};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut buzzer = SimulatedBuzzer::new();
//! let mut melody = MelodyController::new(Channel::new(ChannelId(0)));
//! melody.start_notation(&mut buzzer, melodies::NOKIA, 1)?;
//! run_until_idle(&mut melody, &mut buzzer, 1, 60_000);
//!
//! let config = ExportConfig::with_sample_rate(22_050).fade_out(0.2);
//! export_to_wav_with_config(&buzzer, ChannelId(0), "nokia.wav", config)?;
//! # Ok(())
//! # }
//! ```

mod wav;

pub use wav::*;

/// Export configuration options
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Sample rate for export (default: 44100 Hz)
    pub sample_rate: u32,
    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Square-wave amplitude in `0.0..=1.0` (default: 0.5)
    pub volume: f32,
    /// Fade out duration in seconds (0 = no fade)
    pub fade_out_duration: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 1,
            volume: 0.5,
            fade_out_duration: 0.0,
        }
    }
}

impl ExportConfig {
    /// Create config for stereo export
    pub fn stereo() -> Self {
        Self {
            channels: 2,
            ..Default::default()
        }
    }

    /// Create config with custom sample rate
    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Default::default()
        }
    }

    /// Set the square-wave amplitude (clamped to `0.0..=1.0`)
    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Add fade out at the end
    pub fn fade_out(mut self, duration_seconds: f32) -> Self {
        self.fade_out_duration = duration_seconds;
        self
    }
}

/// Apply fade out to the end of audio samples
fn apply_fade_out(samples: &mut [f32], fade_duration: f32, sample_rate: u32) {
    if fade_duration <= 0.0 || samples.is_empty() {
        return;
    }

    let fade_samples = (fade_duration * sample_rate as f32) as usize;
    let start_fade = samples.len().saturating_sub(fade_samples);

    for (i, sample) in samples.iter_mut().enumerate().skip(start_fade) {
        let progress = (i - start_fade) as f32 / fade_samples as f32;
        *sample *= 1.0 - progress;
    }
}
