//! Simulated buzzer
//!
//! [`SimulatedBuzzer`] implements [`ToneOutput`] and [`Clock`] in memory. It
//! records every output command with the time it was issued, and time only
//! moves when the caller advances it. Tests use it to check exact command
//! sequences; the exporter and the CLI dry run use it to capture a full
//! controller run and render it to samples afterwards.

use crate::controller::Controller;
use crate::hal::{elapsed_ms, ChannelId, Clock, ToneOutput};
use std::collections::BTreeMap;
use std::fmt;

/// One recorded output command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneEvent {
    /// Square wave started or retuned
    Emit {
        /// Clock value when the command was issued
        at_ms: u32,
        /// Target channel
        channel: ChannelId,
        /// Frequency in Hz
        frequency: u32,
    },
    /// Waveform stopped
    Silence {
        /// Clock value when the command was issued
        at_ms: u32,
        /// Target channel
        channel: ChannelId,
    },
}

impl ToneEvent {
    /// Time the command was issued
    pub fn at_ms(&self) -> u32 {
        match *self {
            ToneEvent::Emit { at_ms, .. } | ToneEvent::Silence { at_ms, .. } => at_ms,
        }
    }

    /// Channel the command targeted
    pub fn channel(&self) -> ChannelId {
        match *self {
            ToneEvent::Emit { channel, .. } | ToneEvent::Silence { channel, .. } => channel,
        }
    }

    /// Emitted frequency, `None` for silence
    pub fn frequency(&self) -> Option<u32> {
        match *self {
            ToneEvent::Emit { frequency, .. } => Some(frequency),
            ToneEvent::Silence { .. } => None,
        }
    }
}

impl fmt::Display for ToneEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToneEvent::Emit {
                at_ms,
                channel,
                frequency,
            } => write!(f, "{:>7} ms  {}  tone {} Hz", at_ms, channel, frequency),
            ToneEvent::Silence { at_ms, channel } => {
                write!(f, "{:>7} ms  {}  silence", at_ms, channel)
            }
        }
    }
}

/// In-memory buzzer with a manually advanced clock
#[derive(Debug, Clone, Default)]
pub struct SimulatedBuzzer {
    now_ms: u32,
    events: Vec<ToneEvent>,
    sounding: BTreeMap<ChannelId, u32>,
}

impl SimulatedBuzzer {
    /// Buzzer at time 0 with nothing sounding
    pub fn new() -> Self {
        Self::default()
    }

    /// Buzzer whose clock starts at `now_ms`
    pub fn starting_at(now_ms: u32) -> Self {
        SimulatedBuzzer {
            now_ms,
            ..Self::default()
        }
    }

    /// Move the clock forward, wrapping like a hardware counter
    pub fn advance(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
    }

    /// Jump the clock to an absolute value
    pub fn set_time(&mut self, now_ms: u32) {
        self.now_ms = now_ms;
    }

    /// All recorded commands in issue order
    pub fn events(&self) -> &[ToneEvent] {
        &self.events
    }

    /// Number of `emit` commands recorded
    pub fn emit_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ToneEvent::Emit { .. }))
            .count()
    }

    /// Number of `silence` commands recorded
    pub fn silence_count(&self) -> usize {
        self.events.len() - self.emit_count()
    }

    /// Emitted frequencies in order, across all channels
    pub fn emitted_frequencies(&self) -> Vec<u32> {
        self.events.iter().filter_map(ToneEvent::frequency).collect()
    }

    /// Frequency currently sounding on `channel`
    pub fn sounding(&self, channel: ChannelId) -> Option<u32> {
        self.sounding.get(&channel).copied()
    }

    /// Forget recorded commands, keeping the clock and output state
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Render the recorded commands for `channel` as a square wave.
    ///
    /// Covers the span from the first recorded command to the current clock.
    /// Output is mono `f32` in `[-amplitude, amplitude]`, with 0.0 while the
    /// channel is silent.
    pub fn render(&self, channel: ChannelId, sample_rate: u32, amplitude: f32) -> Vec<f32> {
        let events: Vec<&ToneEvent> = self
            .events
            .iter()
            .filter(|e| e.channel() == channel)
            .collect();
        let Some(origin) = events.first().map(|e| e.at_ms()) else {
            return Vec::new();
        };

        let span_ms = elapsed_ms(self.now_ms, origin) as u64;
        let total_samples = (span_ms * sample_rate as u64 / 1000) as usize;
        let mut samples = Vec::with_capacity(total_samples);

        let mut next = 0;
        let mut frequency: Option<u32> = None;
        let mut phase = 0.0f64;

        for i in 0..total_samples {
            let t_ms = (i as u64 * 1000 / sample_rate as u64) as u32;
            while next < events.len() && elapsed_ms(events[next].at_ms(), origin) <= t_ms {
                frequency = events[next].frequency();
                phase = 0.0;
                next += 1;
            }

            match frequency {
                Some(hz) => {
                    samples.push(if phase < 0.5 { amplitude } else { -amplitude });
                    phase += hz as f64 / sample_rate as f64;
                    phase -= phase.floor();
                }
                None => samples.push(0.0),
            }
        }

        samples
    }
}

impl ToneOutput for SimulatedBuzzer {
    fn emit(&mut self, channel: ChannelId, frequency: u32) {
        self.events.push(ToneEvent::Emit {
            at_ms: self.now_ms,
            channel,
            frequency,
        });
        self.sounding.insert(channel, frequency);
    }

    fn silence(&mut self, channel: ChannelId) {
        self.events.push(ToneEvent::Silence {
            at_ms: self.now_ms,
            channel,
        });
        self.sounding.remove(&channel);
    }
}

impl Clock for SimulatedBuzzer {
    fn now_ms(&self) -> u32 {
        self.now_ms
    }
}

/// Tick `controller` every `step_ms` until it goes idle or `limit_ms` passes.
///
/// Returns the simulated time spent.
pub fn run_until_idle(
    controller: &mut dyn Controller,
    buzzer: &mut SimulatedBuzzer,
    step_ms: u32,
    limit_ms: u32,
) -> u32 {
    let step_ms = step_ms.max(1);
    let mut spent = 0u32;
    while controller.is_active() && spent < limit_ms {
        buzzer.advance(step_ms);
        spent = spent.saturating_add(step_ms);
        controller.tick(buzzer);
    }
    spent
}
