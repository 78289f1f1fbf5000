//! Playback controllers
//!
//! Every controller is a small state machine driven by the caller's control
//! loop. `start()` validates its parameters, takes the channel lease and issues
//! the first output command; `tick()` compares the clock against the
//! timestamp captured at the last transition and moves the machine forward.
//! Nothing waits.
//!
//! | Controller               | States                        |
//! |--------------------------|-------------------------------|
//! | [`ToneController`]       | Idle, Playing                 |
//! | [`MelodyController`]     | Idle, Playing(note, pass)     |
//! | [`AlertController`]      | Idle, ToneOn, Gap             |
//! | [`ToneSeriesController`] | Idle, Sweeping(frequency)     |
//! | [`SirenController`]      | Idle, Alternating(low/high)   |
//!
//! A rejected `start()` returns an error and issues no hardware command. An
//! idle controller ignores `tick()` and `stop()`.

mod alert;
mod melody;
mod series;
mod siren;
mod tone;

pub use alert::AlertController;
pub use melody::MelodyController;
pub use series::ToneSeriesController;
pub use siren::SirenController;
pub use tone::ToneController;

use crate::hal::{ChannelId, ToneHardware};

/// Common surface of all playback controllers
///
/// Object safe, so a control loop can keep heterogeneous controllers in one
/// list:
///
/// ```
/// use buzzer_fx::sim::SimulatedBuzzer;
/// use buzzer_fx::{ChannelArbiter, ChannelId, Controller, SirenController, ToneController};
///
/// let arbiter = ChannelArbiter::new();
/// let mut buzzer = SimulatedBuzzer::new();
///
/// let mut tone = ToneController::new(arbiter.channel(ChannelId(0)));
/// let mut siren = SirenController::new(arbiter.channel(ChannelId(1)));
/// tone.start(&mut buzzer, 440, 100).unwrap();
/// siren.start(&mut buzzer, 600, 900, 1000).unwrap();
///
/// let mut effects: Vec<&mut dyn Controller> = vec![&mut tone, &mut siren];
/// buzzer.advance(100);
/// for effect in effects.iter_mut() {
///     effect.tick(&mut buzzer);
/// }
/// assert!(!effects[0].is_active());
/// assert!(effects[1].is_active());
/// ```
pub trait Controller {
    /// Advance the state machine against the current clock
    fn tick(&mut self, hw: &mut dyn ToneHardware);

    /// Silence immediately and return to Idle, releasing the channel
    fn stop(&mut self, hw: &mut dyn ToneHardware);

    /// True while the controller holds its channel
    fn is_active(&self) -> bool;

    /// Channel this controller drives
    fn channel(&self) -> ChannelId;
}

/// Validate a duration argument
fn check_duration(duration_ms: u32) -> crate::Result<u32> {
    if duration_ms == 0 {
        Err(crate::BuzzerError::ZeroDuration)
    } else {
        Ok(duration_ms)
    }
}
