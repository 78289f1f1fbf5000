//! Two-tone siren

use super::{check_duration, Controller};
use crate::config::{BuzzerConfig, FrequencyRange};
use crate::hal::{elapsed_ms, Channel, ChannelId, ChannelLease, ToneHardware};
use crate::Result;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Alternation {
    low: u32,
    high: u32,
    total_ms: u32,
    interval_ms: u32,
    started_at: u32,
    flipped_at: u32,
    is_low: bool,
}

impl Alternation {
    fn frequency(&self) -> u32 {
        if self.is_low {
            self.low
        } else {
            self.high
        }
    }
}

/// Alternates between two frequencies for a fixed total time
///
/// Starts on the low frequency and flips every `total / divisions` ms
/// (`divisions` defaults to 10, so a one second siren flips every 100 ms).
#[derive(Debug)]
pub struct SirenController {
    channel: Channel,
    range: FrequencyRange,
    divisions: u32,
    alternation: Option<Alternation>,
    lease: Option<ChannelLease>,
}

impl SirenController {
    /// Siren controller with default settings
    pub fn new(channel: Channel) -> Self {
        Self::with_config(channel, &BuzzerConfig::default())
    }

    /// Siren controller using the range and flip divisor of `config`
    pub fn with_config(channel: Channel, config: &BuzzerConfig) -> Self {
        SirenController {
            channel,
            range: config.frequency_range,
            divisions: config.siren_divisions.max(1),
            alternation: None,
            lease: None,
        }
    }

    /// Alternate `low` and `high` for `total_ms`
    pub fn start(&mut self, hw: &mut dyn ToneHardware, low: u32, high: u32, total_ms: u32) -> Result<()> {
        let checked = self
            .range
            .check(low)
            .and_then(|_| self.range.check(high))
            .and_then(|_| check_duration(total_ms));
        if let Err(e) = checked {
            debug!(target: "buzzer::siren", "{}: start rejected: {}", self.channel.id(), e);
            return Err(e);
        }
        if self.lease.is_none() {
            self.lease = Some(self.channel.try_lease()?);
        }

        let interval_ms = (total_ms / self.divisions).max(1);
        debug!(
            target: "buzzer::siren",
            "{}: {} / {} Hz for {} ms, flip every {} ms",
            self.channel.id(),
            low,
            high,
            total_ms,
            interval_ms
        );
        let now = hw.now_ms();
        hw.emit(self.channel.id(), low);
        self.alternation = Some(Alternation {
            low,
            high,
            total_ms,
            interval_ms,
            started_at: now,
            flipped_at: now,
            is_low: true,
        });
        Ok(())
    }

    /// Frequency currently sounding, `None` when idle
    pub fn frequency(&self) -> Option<u32> {
        self.alternation.map(|a| a.frequency())
    }
}

impl Controller for SirenController {
    fn tick(&mut self, hw: &mut dyn ToneHardware) {
        let Some(alt) = self.alternation.as_mut() else {
            return;
        };
        let now = hw.now_ms();

        if elapsed_ms(now, alt.started_at) >= alt.total_ms {
            debug!(target: "buzzer::siren", "{}: finished", self.channel.id());
            hw.silence(self.channel.id());
            self.alternation = None;
            self.lease = None;
            return;
        }

        if elapsed_ms(now, alt.flipped_at) >= alt.interval_ms {
            alt.is_low = !alt.is_low;
            alt.flipped_at = now;
            hw.emit(self.channel.id(), alt.frequency());
        }
    }

    fn stop(&mut self, hw: &mut dyn ToneHardware) {
        if self.is_active() {
            debug!(target: "buzzer::siren", "{}: stopped", self.channel.id());
            hw.silence(self.channel.id());
            self.alternation = None;
            self.lease = None;
        }
    }

    fn is_active(&self) -> bool {
        self.alternation.is_some()
    }

    fn channel(&self) -> ChannelId {
        self.channel.id()
    }
}
