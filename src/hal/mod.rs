//! Hardware seams
//!
//! The controllers never touch a pin or a timer directly. They issue output
//! commands through [`ToneOutput`] and read time through [`Clock`]; firmware
//! implements both for its PWM/LEDC peripheral and tick counter.
//!
//! Output lines are addressed by [`ChannelId`]. Each controller is built with
//! a [`Channel`] handle and must hold that channel's [`ChannelLease`] while it
//! is active, so two controllers can never drive the same line at once.

pub mod lease;

pub use lease::{Channel, ChannelArbiter, ChannelLease};

use std::fmt;
use std::time::Instant;

/// Identifier of one physical tone output line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ChannelId(pub u8);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Square-wave output primitive
pub trait ToneOutput {
    /// Start (or retune) a square wave at `frequency` Hz on `channel`.
    ///
    /// Never called with a frequency of 0; silence goes through [`ToneOutput::silence`].
    fn emit(&mut self, channel: ChannelId, frequency: u32);

    /// Stop any waveform on `channel`.
    fn silence(&mut self, channel: ChannelId);
}

/// Monotonic millisecond clock
///
/// The counter is allowed to wrap; controllers measure elapsed time with
/// wrapping subtraction.
pub trait Clock {
    /// Current time in milliseconds
    fn now_ms(&self) -> u32;
}

/// Output plus clock, the capability every controller is ticked with
pub trait ToneHardware: ToneOutput + Clock {}

impl<T: ToneOutput + Clock + ?Sized> ToneHardware for T {}

impl<T: ToneOutput + ?Sized> ToneOutput for &mut T {
    fn emit(&mut self, channel: ChannelId, frequency: u32) {
        (**self).emit(channel, frequency)
    }

    fn silence(&mut self, channel: ChannelId) {
        (**self).silence(channel)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Milliseconds from `since` to `now` on a wrapping 32-bit counter
#[inline]
pub fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// Combines a separate output driver and clock into one [`ToneHardware`]
///
/// Useful when the PWM peripheral and the tick source come from different
/// drivers.
#[derive(Debug, Clone, Default)]
pub struct Board<O, C> {
    /// Tone output driver
    pub output: O,
    /// Millisecond clock
    pub clock: C,
}

impl<O: ToneOutput, C: Clock> Board<O, C> {
    /// Pair an output with a clock
    pub fn new(output: O, clock: C) -> Self {
        Board { output, clock }
    }

    /// Split back into parts
    pub fn into_parts(self) -> (O, C) {
        (self.output, self.clock)
    }
}

impl<O: ToneOutput, C> ToneOutput for Board<O, C> {
    fn emit(&mut self, channel: ChannelId, frequency: u32) {
        self.output.emit(channel, frequency);
    }

    fn silence(&mut self, channel: ChannelId) {
        self.output.silence(channel);
    }
}

impl<O, C: Clock> Clock for Board<O, C> {
    fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }
}

/// Clock counting milliseconds since its creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Start a clock at 0 ms
    pub fn new() -> Self {
        SystemClock {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        // Truncation to the low 32 bits is the wrapping counter semantics.
        self.epoch.elapsed().as_millis() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pin {
        last: Option<(ChannelId, u32)>,
    }

    impl ToneOutput for Pin {
        fn emit(&mut self, channel: ChannelId, frequency: u32) {
            self.last = Some((channel, frequency));
        }

        fn silence(&mut self, _channel: ChannelId) {
            self.last = None;
        }
    }

    struct Fixed(u32);

    impl Clock for Fixed {
        fn now_ms(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn test_elapsed_wraps() {
        assert_eq!(elapsed_ms(10, 4), 6);
        assert_eq!(elapsed_ms(5, u32::MAX - 4), 10);
    }

    #[test]
    fn test_board_combines_parts() {
        let mut board = Board::new(Pin::default(), Fixed(42));
        let hw: &mut dyn ToneHardware = &mut board;
        hw.emit(ChannelId(2), 440);
        assert_eq!(hw.now_ms(), 42);

        let (pin, _) = board.into_parts();
        assert_eq!(pin.last, Some((ChannelId(2), 440)));
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }

    #[test]
    fn test_channel_id_display() {
        assert_eq!(ChannelId(3).to_string(), "#3");
    }
}
