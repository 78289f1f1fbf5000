//! Host speaker output using rodio
//!
//! A [`SpeakerOutput`] handle records which frequency each channel should be
//! sounding. The rodio source behind a [`Speaker`] reads that table in small
//! batches and synthesizes the square waves, so controllers can drive the
//! host speaker exactly as they would drive a buzzer pin.

use crate::hal::{ChannelId, ToneOutput};
use crate::{BuzzerError, Result};
use parking_lot::Mutex;
use rodio::{OutputStream, Sink, Source};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Samples generated between reads of the shared frequency table
const REFRESH_SAMPLES: usize = 64;

/// [`ToneOutput`] that feeds a [`Speaker`]
///
/// Cheap to clone; all clones drive the same speaker.
#[derive(Debug, Clone, Default)]
pub struct SpeakerOutput {
    sounding: Arc<Mutex<BTreeMap<ChannelId, u32>>>,
}

impl SpeakerOutput {
    /// Frequency currently requested on `channel`
    pub fn sounding(&self, channel: ChannelId) -> Option<u32> {
        self.sounding.lock().get(&channel).copied()
    }

    fn snapshot(&self, into: &mut Vec<u32>) {
        into.clear();
        into.extend(self.sounding.lock().values().copied());
    }
}

impl ToneOutput for SpeakerOutput {
    fn emit(&mut self, channel: ChannelId, frequency: u32) {
        self.sounding.lock().insert(channel, frequency);
    }

    fn silence(&mut self, channel: ChannelId) {
        self.sounding.lock().remove(&channel);
    }
}

/// Square-wave source mixing every sounding channel
struct SquareWaveSource {
    output: SpeakerOutput,
    sample_rate: u32,
    volume: f32,
    finished: Arc<AtomicBool>,
    frequencies: Vec<u32>,
    /// Reused snapshot buffer, swapped with `frequencies` on refresh
    pending: Vec<u32>,
    phases: Vec<f64>,
    until_refresh: usize,
}

impl SquareWaveSource {
    fn new(output: SpeakerOutput, sample_rate: u32, volume: f32, finished: Arc<AtomicBool>) -> Self {
        SquareWaveSource {
            output,
            sample_rate,
            volume,
            finished,
            frequencies: Vec::new(),
            pending: Vec::new(),
            phases: Vec::new(),
            until_refresh: 0,
        }
    }

    fn refresh(&mut self) {
        self.output.snapshot(&mut self.pending);
        if self.pending != self.frequencies {
            std::mem::swap(&mut self.frequencies, &mut self.pending);
            self.phases.clear();
            self.phases.resize(self.frequencies.len(), 0.0);
        }
        self.until_refresh = REFRESH_SAMPLES;
    }
}

impl Source for SquareWaveSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

impl Iterator for SquareWaveSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.finished.load(Ordering::Relaxed) {
            return None;
        }
        if self.until_refresh == 0 {
            self.refresh();
        }
        self.until_refresh -= 1;

        if self.frequencies.is_empty() {
            return Some(0.0);
        }

        let gain = self.volume / self.frequencies.len() as f32;
        let mut mixed = 0.0f32;
        for (hz, phase) in self.frequencies.iter().zip(self.phases.iter_mut()) {
            mixed += if *phase < 0.5 { gain } else { -gain };
            *phase += *hz as f64 / self.sample_rate as f64;
            *phase -= phase.floor();
        }
        Some(mixed)
    }
}

/// Default audio device playing whatever its [`SpeakerOutput`] requests
pub struct Speaker {
    _stream: OutputStream,
    sink: Sink,
    output: SpeakerOutput,
    finished: Arc<AtomicBool>,
}

impl Speaker {
    /// Open the default output device and start the square-wave stream
    ///
    /// # Arguments
    /// * `sample_rate` - Sample rate in Hz (typically 44100)
    /// * `volume` - Square-wave amplitude in `0.0..=1.0`
    pub fn new(sample_rate: u32, volume: f32) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| BuzzerError::AudioDeviceError(format!("failed to create audio stream: {}", e)))?;
        let sink = Sink::try_new(&stream_handle)
            .map_err(|e| BuzzerError::AudioDeviceError(format!("failed to create audio sink: {}", e)))?;

        let output = SpeakerOutput::default();
        let finished = Arc::new(AtomicBool::new(false));
        sink.append(SquareWaveSource::new(
            output.clone(),
            sample_rate,
            volume.clamp(0.0, 1.0),
            Arc::clone(&finished),
        ));

        Ok(Speaker {
            _stream: stream,
            sink,
            output,
            finished,
        })
    }

    /// Handle to pass to controllers (usually inside a [`Board`](crate::Board))
    pub fn output(&self) -> SpeakerOutput {
        self.output.clone()
    }

    /// Pause playback
    pub fn pause(&self) {
        self.sink.pause();
    }

    /// Resume playback
    pub fn play(&self) {
        self.sink.play();
    }

    /// End the stream; the device goes quiet after the current batch
    pub fn finish(&self) {
        self.finished.store(true, Ordering::Relaxed);
    }
}

impl Drop for Speaker {
    fn drop(&mut self) {
        self.finish();
        self.sink.stop();
    }
}
