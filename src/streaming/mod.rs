//! Real-time playback on the host audio device
//!
//! Pair a [`SpeakerOutput`] with a [`SystemClock`](crate::SystemClock) in a
//! [`Board`](crate::Board) and tick controllers against it to hear them
//! through the default output device.

mod speaker;

pub use speaker::{Speaker, SpeakerOutput};
