//! Linear frequency sweep

use super::{check_duration, Controller};
use crate::config::{BuzzerConfig, FrequencyRange};
use crate::hal::{elapsed_ms, Channel, ChannelId, ChannelLease, ToneHardware};
use crate::{BuzzerError, Result};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sweep {
    current: u32,
    end: u32,
    step: i32,
    duration_ms: u32,
    since: u32,
}

impl Sweep {
    /// Next frequency, or `None` once the sweep moves past `end`
    fn next(&self) -> Option<u32> {
        let next = self.current as i64 + self.step as i64;
        let past_end = if self.step > 0 {
            next > self.end as i64
        } else {
            next < self.end as i64
        };
        (!past_end).then_some(next as u32)
    }
}

/// Steps from one frequency to another, holding each step for a fixed time
///
/// The start frequency sounds immediately. Every `duration_ms` the frequency
/// moves by `step`; the first step that would pass `end` silences the
/// output and ends the sweep. A negative `step` sweeps downwards.
#[derive(Debug)]
pub struct ToneSeriesController {
    channel: Channel,
    range: FrequencyRange,
    sweep: Option<Sweep>,
    lease: Option<ChannelLease>,
}

impl ToneSeriesController {
    /// Sweep controller with the default frequency range
    pub fn new(channel: Channel) -> Self {
        Self::with_config(channel, &BuzzerConfig::default())
    }

    /// Sweep controller using the frequency range of `config`
    pub fn with_config(channel: Channel, config: &BuzzerConfig) -> Self {
        ToneSeriesController {
            channel,
            range: config.frequency_range,
            sweep: None,
            lease: None,
        }
    }

    /// Sweep from `start` towards `end` in `step` Hz increments
    pub fn start(
        &mut self,
        hw: &mut dyn ToneHardware,
        start: u32,
        end: u32,
        step: i32,
        duration_ms: u32,
    ) -> Result<()> {
        let checked = self
            .range
            .check(start)
            .and_then(|_| self.range.check(end))
            .and_then(|_| if step == 0 { Err(BuzzerError::ZeroStep) } else { Ok(0) })
            .and_then(|_| check_duration(duration_ms));
        if let Err(e) = checked {
            debug!(target: "buzzer::series", "{}: start rejected: {}", self.channel.id(), e);
            return Err(e);
        }
        if self.lease.is_none() {
            self.lease = Some(self.channel.try_lease()?);
        }

        debug!(
            target: "buzzer::series",
            "{}: sweep {} -> {} Hz, step {} every {} ms",
            self.channel.id(),
            start,
            end,
            step,
            duration_ms
        );
        hw.emit(self.channel.id(), start);
        self.sweep = Some(Sweep {
            current: start,
            end,
            step,
            duration_ms,
            since: hw.now_ms(),
        });
        Ok(())
    }

    /// Frequency currently sounding, `None` when idle
    pub fn frequency(&self) -> Option<u32> {
        self.sweep.map(|s| s.current)
    }
}

impl Controller for ToneSeriesController {
    fn tick(&mut self, hw: &mut dyn ToneHardware) {
        let Some(sweep) = self.sweep.as_mut() else {
            return;
        };
        let now = hw.now_ms();
        if elapsed_ms(now, sweep.since) < sweep.duration_ms {
            return;
        }

        match sweep.next() {
            Some(frequency) => {
                hw.emit(self.channel.id(), frequency);
                sweep.current = frequency;
                sweep.since = now;
            }
            None => {
                debug!(target: "buzzer::series", "{}: finished at {} Hz", self.channel.id(), sweep.current);
                hw.silence(self.channel.id());
                self.sweep = None;
                self.lease = None;
            }
        }
    }

    fn stop(&mut self, hw: &mut dyn ToneHardware) {
        if self.is_active() {
            debug!(target: "buzzer::series", "{}: stopped", self.channel.id());
            hw.silence(self.channel.id());
            self.sweep = None;
            self.lease = None;
        }
    }

    fn is_active(&self) -> bool {
        self.sweep.is_some()
    }

    fn channel(&self) -> ChannelId {
        self.channel.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{run_until_idle, SimulatedBuzzer};

    const CH: ChannelId = ChannelId(0);

    fn series() -> ToneSeriesController {
        ToneSeriesController::new(Channel::new(CH))
    }

    #[test]
    fn test_rising_sweep() {
        let mut buzzer = SimulatedBuzzer::new();
        let mut series = series();
        series.start(&mut buzzer, 500, 800, 100, 20).unwrap();
        assert_eq!(buzzer.sounding(CH), Some(500));

        let spent = run_until_idle(&mut series, &mut buzzer, 1, 10_000);
        assert_eq!(buzzer.emitted_frequencies(), vec![500, 600, 700, 800]);
        assert_eq!(spent, 80);
        assert_eq!(buzzer.sounding(CH), None);
    }

    #[test]
    fn test_falling_sweep_stops_before_passing_end() {
        let mut buzzer = SimulatedBuzzer::new();
        let mut series = series();
        series.start(&mut buzzer, 1000, 750, -100, 10).unwrap();
        run_until_idle(&mut series, &mut buzzer, 1, 10_000);
        assert_eq!(buzzer.emitted_frequencies(), vec![1000, 900, 800]);
    }

    #[test]
    fn test_zero_step_rejected() {
        let mut buzzer = SimulatedBuzzer::new();
        let mut series = series();
        assert!(matches!(
            series.start(&mut buzzer, 500, 800, 0, 20),
            Err(BuzzerError::ZeroStep)
        ));
        assert!(!series.is_active());
        assert!(buzzer.events().is_empty());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut buzzer = SimulatedBuzzer::new();
        let mut series = series();
        assert!(series.start(&mut buzzer, 10, 800, 10, 20).is_err());
        assert!(series.start(&mut buzzer, 500, 70_000, 10, 20).is_err());
        assert!(series.start(&mut buzzer, 500, 800, 10, 0).is_err());
        assert!(buzzer.events().is_empty());
    }

    #[test]
    fn test_start_equal_to_end() {
        let mut buzzer = SimulatedBuzzer::new();
        let mut series = series();
        series.start(&mut buzzer, 440, 440, -5, 30).unwrap();
        let spent = run_until_idle(&mut series, &mut buzzer, 1, 1000);
        assert_eq!(spent, 30);
        assert_eq!(buzzer.emit_count(), 1);
    }

    #[test]
    fn test_stop_mid_sweep() {
        let mut buzzer = SimulatedBuzzer::new();
        let mut series = series();
        series.start(&mut buzzer, 200, 2000, 50, 10).unwrap();
        buzzer.advance(35);
        series.tick(&mut buzzer);
        assert_eq!(series.frequency(), Some(250));
        series.stop(&mut buzzer);
        assert!(series.frequency().is_none());
        assert!(!series.channel.is_leased());
    }
}
