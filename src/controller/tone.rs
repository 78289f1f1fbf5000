//! Single tone for a fixed duration

use super::{check_duration, Controller};
use crate::config::{BuzzerConfig, FrequencyRange};
use crate::hal::{elapsed_ms, Channel, ChannelId, ChannelLease, ToneHardware};
use crate::note::SILENCE;
use crate::Result;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToneState {
    Idle,
    Playing {
        frequency: u32,
        duration_ms: u32,
        started_at: u32,
    },
}

/// Plays one frequency for one duration
///
/// ```
/// use buzzer_fx::sim::SimulatedBuzzer;
/// use buzzer_fx::{Channel, ChannelId, Controller, ToneController};
///
/// let mut buzzer = SimulatedBuzzer::new();
/// let mut tone = ToneController::new(Channel::new(ChannelId(0)));
/// tone.start(&mut buzzer, 440, 200).unwrap();
///
/// buzzer.advance(200);
/// tone.tick(&mut buzzer);
/// assert!(!tone.is_active());
/// ```
#[derive(Debug)]
pub struct ToneController {
    channel: Channel,
    range: FrequencyRange,
    state: ToneState,
    lease: Option<ChannelLease>,
}

impl ToneController {
    /// Tone controller with the default frequency range
    pub fn new(channel: Channel) -> Self {
        Self::with_config(channel, &BuzzerConfig::default())
    }

    /// Tone controller using the frequency range of `config`
    pub fn with_config(channel: Channel, config: &BuzzerConfig) -> Self {
        ToneController {
            channel,
            range: config.frequency_range,
            state: ToneState::Idle,
            lease: None,
        }
    }

    /// Start sounding `frequency` for `duration_ms`.
    ///
    /// [`SILENCE`] is accepted and plays a rest of the given length. Starting
    /// while already playing restarts with the new parameters.
    pub fn start(&mut self, hw: &mut dyn ToneHardware, frequency: u32, duration_ms: u32) -> Result<()> {
        if let Err(e) = self.validate(frequency, duration_ms) {
            debug!(target: "buzzer::tone", "{}: start rejected: {}", self.channel.id(), e);
            return Err(e);
        }
        if self.lease.is_none() {
            self.lease = Some(self.channel.try_lease()?);
        }
        debug!(
            target: "buzzer::tone",
            "{}: {} Hz for {} ms",
            self.channel.id(),
            frequency,
            duration_ms
        );
        self.sound(hw, frequency, duration_ms);
        Ok(())
    }

    /// Play a note on behalf of an owner that already holds the channel lease
    pub(crate) fn play_note(
        &mut self,
        hw: &mut dyn ToneHardware,
        frequency: u32,
        duration_ms: u32,
    ) -> Result<()> {
        self.validate(frequency, duration_ms)?;
        self.sound(hw, frequency, duration_ms);
        Ok(())
    }

    /// Drop back to Idle without issuing a command
    pub(crate) fn reset(&mut self) {
        self.state = ToneState::Idle;
        self.lease = None;
    }

    /// Frequency currently playing, `None` when idle
    pub fn frequency(&self) -> Option<u32> {
        match self.state {
            ToneState::Playing { frequency, .. } => Some(frequency),
            ToneState::Idle => None,
        }
    }

    /// Milliseconds left before the tone ends, `None` when idle
    pub fn remaining_ms(&self, now_ms: u32) -> Option<u32> {
        match self.state {
            ToneState::Playing {
                duration_ms,
                started_at,
                ..
            } => Some(duration_ms.saturating_sub(elapsed_ms(now_ms, started_at))),
            ToneState::Idle => None,
        }
    }

    fn validate(&self, frequency: u32, duration_ms: u32) -> Result<()> {
        if frequency != SILENCE {
            self.range.check(frequency)?;
        }
        check_duration(duration_ms)?;
        Ok(())
    }

    fn sound(&mut self, hw: &mut dyn ToneHardware, frequency: u32, duration_ms: u32) {
        let id = self.channel.id();
        if frequency == SILENCE {
            hw.silence(id);
        } else {
            hw.emit(id, frequency);
        }
        self.state = ToneState::Playing {
            frequency,
            duration_ms,
            started_at: hw.now_ms(),
        };
    }
}

impl Controller for ToneController {
    fn tick(&mut self, hw: &mut dyn ToneHardware) {
        let ToneState::Playing {
            duration_ms,
            started_at,
            ..
        } = self.state
        else {
            return;
        };
        if elapsed_ms(hw.now_ms(), started_at) >= duration_ms {
            hw.silence(self.channel.id());
            self.reset();
        }
    }

    fn stop(&mut self, hw: &mut dyn ToneHardware) {
        if self.is_active() {
            debug!(target: "buzzer::tone", "{}: stopped", self.channel.id());
            hw.silence(self.channel.id());
            self.reset();
        }
    }

    fn is_active(&self) -> bool {
        matches!(self.state, ToneState::Playing { .. })
    }

    fn channel(&self) -> ChannelId {
        self.channel.id()
    }
}
