//! Repeating alert tone

use super::{check_duration, Controller};
use crate::config::{BuzzerConfig, FrequencyRange};
use crate::hal::{elapsed_ms, Channel, ChannelId, ChannelLease, ToneHardware};
use crate::{BuzzerError, Result};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlertState {
    Idle,
    ToneOn { since: u32 },
    Gap { since: u32 },
}

#[derive(Debug, Clone, Copy, Default)]
struct Pattern {
    count: u32,
    frequency: u32,
    duration_ms: u32,
    lapse_ms: u32,
}

/// Sounds one frequency `count` times, separated by silent gaps
///
/// The sequence is tone, gap, tone, ..., tone: the controller goes idle as
/// soon as the last tone ends, without a trailing gap.
#[derive(Debug)]
pub struct AlertController {
    channel: Channel,
    range: FrequencyRange,
    state: AlertState,
    pattern: Pattern,
    completed: u32,
    lease: Option<ChannelLease>,
}

impl AlertController {
    /// Alert controller with the default frequency range
    pub fn new(channel: Channel) -> Self {
        Self::with_config(channel, &BuzzerConfig::default())
    }

    /// Alert controller using the frequency range of `config`
    pub fn with_config(channel: Channel, config: &BuzzerConfig) -> Self {
        AlertController {
            channel,
            range: config.frequency_range,
            state: AlertState::Idle,
            pattern: Pattern::default(),
            completed: 0,
            lease: None,
        }
    }

    /// Sound `frequency` for `duration_ms`, `count` times, `lapse_ms` apart
    pub fn start(
        &mut self,
        hw: &mut dyn ToneHardware,
        count: u32,
        frequency: u32,
        duration_ms: u32,
        lapse_ms: u32,
    ) -> Result<()> {
        let checked = if count == 0 {
            Err(BuzzerError::ZeroCount)
        } else {
            self.range
                .check(frequency)
                .and_then(|_| check_duration(duration_ms))
        };
        if let Err(e) = checked {
            debug!(target: "buzzer::alert", "{}: start rejected: {}", self.channel.id(), e);
            return Err(e);
        }
        if self.lease.is_none() {
            self.lease = Some(self.channel.try_lease()?);
        }

        debug!(
            target: "buzzer::alert",
            "{}: {} x {} Hz ({} ms on, {} ms off)",
            self.channel.id(),
            count,
            frequency,
            duration_ms,
            lapse_ms
        );
        self.pattern = Pattern {
            count,
            frequency,
            duration_ms,
            lapse_ms,
        };
        self.completed = 0;
        hw.emit(self.channel.id(), frequency);
        self.state = AlertState::ToneOn { since: hw.now_ms() };
        Ok(())
    }

    /// Short beep pattern; same behavior as [`AlertController::start`]
    pub fn beep(
        &mut self,
        hw: &mut dyn ToneHardware,
        count: u32,
        frequency: u32,
        duration_ms: u32,
        lapse_ms: u32,
    ) -> Result<()> {
        self.start(hw, count, frequency, duration_ms, lapse_ms)
    }

    /// Tones completed since the last `start()`
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// True while a tone is sounding (as opposed to a gap)
    pub fn is_tone_on(&self) -> bool {
        matches!(self.state, AlertState::ToneOn { .. })
    }
}

impl Controller for AlertController {
    fn tick(&mut self, hw: &mut dyn ToneHardware) {
        let now = hw.now_ms();
        match self.state {
            AlertState::Idle => {}
            AlertState::ToneOn { since } => {
                if elapsed_ms(now, since) < self.pattern.duration_ms {
                    return;
                }
                hw.silence(self.channel.id());
                self.completed += 1;
                if self.completed >= self.pattern.count {
                    debug!(target: "buzzer::alert", "{}: finished", self.channel.id());
                    self.state = AlertState::Idle;
                    self.lease = None;
                } else {
                    self.state = AlertState::Gap { since: now };
                }
            }
            AlertState::Gap { since } => {
                if elapsed_ms(now, since) >= self.pattern.lapse_ms {
                    hw.emit(self.channel.id(), self.pattern.frequency);
                    self.state = AlertState::ToneOn { since: now };
                }
            }
        }
    }

    fn stop(&mut self, hw: &mut dyn ToneHardware) {
        if self.is_active() {
            debug!(target: "buzzer::alert", "{}: stopped", self.channel.id());
            hw.silence(self.channel.id());
            self.state = AlertState::Idle;
            self.lease = None;
        }
    }

    fn is_active(&self) -> bool {
        self.state != AlertState::Idle
    }

    fn channel(&self) -> ChannelId {
        self.channel.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{run_until_idle, SimulatedBuzzer, ToneEvent};

    const CH: ChannelId = ChannelId(0);

    fn alert() -> AlertController {
        AlertController::new(Channel::new(CH))
    }

    #[test]
    fn test_three_beeps() {
        let mut buzzer = SimulatedBuzzer::new();
        let mut alert = alert();
        alert.start(&mut buzzer, 3, 1000, 100, 50).unwrap();

        let spent = run_until_idle(&mut alert, &mut buzzer, 1, 10_000);
        // 3 tones plus 2 gaps
        assert_eq!(spent, 400);
        assert_eq!(alert.completed(), 3);
        assert_eq!(buzzer.emitted_frequencies(), vec![1000, 1000, 1000]);

        let times: Vec<u32> = buzzer.events().iter().map(ToneEvent::at_ms).collect();
        assert_eq!(times, vec![0, 100, 150, 250, 300, 400]);
    }

    #[test]
    fn test_phases() {
        let mut buzzer = SimulatedBuzzer::new();
        let mut alert = alert();
        alert.beep(&mut buzzer, 2, 2000, 30, 20).unwrap();
        assert!(alert.is_tone_on());

        buzzer.advance(30);
        alert.tick(&mut buzzer);
        assert!(!alert.is_tone_on());
        assert!(alert.is_active());
        assert_eq!(buzzer.sounding(CH), None);

        buzzer.advance(19);
        alert.tick(&mut buzzer);
        assert_eq!(buzzer.sounding(CH), None);

        buzzer.advance(1);
        alert.tick(&mut buzzer);
        assert_eq!(buzzer.sounding(CH), Some(2000));
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let mut buzzer = SimulatedBuzzer::new();
        let mut alert = alert();
        assert!(matches!(
            alert.start(&mut buzzer, 0, 1000, 100, 50),
            Err(BuzzerError::ZeroCount)
        ));
        assert!(matches!(
            alert.start(&mut buzzer, 2, 10, 100, 50),
            Err(BuzzerError::FrequencyOutOfRange { .. })
        ));
        assert!(matches!(
            alert.start(&mut buzzer, 2, 1000, 0, 50),
            Err(BuzzerError::ZeroDuration)
        ));
        assert!(!alert.is_active());
        assert!(buzzer.events().is_empty());
    }

    #[test]
    fn test_zero_lapse() {
        let mut buzzer = SimulatedBuzzer::new();
        let mut alert = alert();
        alert.start(&mut buzzer, 2, 1000, 10, 0).unwrap();
        let spent = run_until_idle(&mut alert, &mut buzzer, 1, 1000);
        // The gap lasts until the next tick
        assert_eq!(spent, 21);
        assert_eq!(buzzer.emit_count(), 2);
    }

    #[test]
    fn test_stop_mid_gap() {
        let mut buzzer = SimulatedBuzzer::new();
        let mut alert = alert();
        alert.start(&mut buzzer, 5, 1000, 10, 100).unwrap();
        buzzer.advance(20);
        alert.tick(&mut buzzer);
        alert.stop(&mut buzzer);
        assert!(!alert.is_active());
        assert!(!alert.channel.is_leased());

        let before = buzzer.events().len();
        buzzer.advance(500);
        alert.tick(&mut buzzer);
        assert_eq!(buzzer.events().len(), before);
    }
}
