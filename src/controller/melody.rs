//! Note-by-note melody playback
//!
//! The melody controller owns a [`ToneController`] that plays each note for
//! its duration. After a note ends the controller waits a short settling
//! margin (50 ms by default) before starting the next one, so consecutive
//! notes of the same pitch stay audibly separate.
//!
//! Owned melodies (anything produced by the parser) move into the controller
//! and are dropped the moment playback ends: on completion, on `stop()`, and
//! when a new `start()` replaces them.

use super::{Controller, ToneController};
use crate::config::BuzzerConfig;
use crate::hal::{elapsed_ms, Channel, ChannelId, ChannelLease, ToneHardware};
use crate::notation::{NotationParser, NotationSource};
use crate::note::{Melody, Note};
use crate::{BuzzerError, Result};
use log::debug;

#[derive(Debug)]
struct Playback {
    melody: Melody,
    index: usize,
    pass: u8,
    passes: u8,
    note_started_at: u32,
}

/// Plays a [`Melody`] a given number of times
#[derive(Debug)]
pub struct MelodyController {
    channel: Channel,
    tone: ToneController,
    parser: NotationParser,
    settle_margin_ms: u32,
    playback: Option<Playback>,
    lease: Option<ChannelLease>,
    notes_started: u32,
}

impl MelodyController {
    /// Melody controller with default settings
    pub fn new(channel: Channel) -> Self {
        Self::with_config(channel, &BuzzerConfig::default())
    }

    /// Melody controller using the margin, range and parser limits of `config`
    pub fn with_config(channel: Channel, config: &BuzzerConfig) -> Self {
        MelodyController {
            tone: ToneController::with_config(channel.clone(), config),
            channel,
            parser: NotationParser::with_config(config),
            settle_margin_ms: config.settle_margin_ms,
            playback: None,
            lease: None,
            notes_started: 0,
        }
    }

    /// Start playing `melody` `repeat` times (0 plays once).
    ///
    /// Replaces any melody already playing; an owned melody being replaced
    /// is released.
    pub fn start(
        &mut self,
        hw: &mut dyn ToneHardware,
        melody: impl Into<Melody>,
        repeat: u8,
    ) -> Result<()> {
        let melody = melody.into();
        if melody.is_empty() {
            debug!(target: "buzzer::melody", "{}: start rejected: empty melody", self.channel.id());
            return Err(BuzzerError::EmptyMelody);
        }
        if self.lease.is_none() {
            self.lease = Some(self.channel.try_lease()?);
        }

        let passes = repeat.max(1);
        debug!(
            target: "buzzer::melody",
            "{}: playing {} notes x{} ({})",
            self.channel.id(),
            melody.len(),
            passes,
            if melody.is_owned() { "owned" } else { "static" }
        );

        let first = melody[0];
        self.notes_started = 0;
        self.playback = Some(Playback {
            melody,
            index: 0,
            pass: 0,
            passes,
            note_started_at: hw.now_ms(),
        });
        self.play(hw, first);
        Ok(())
    }

    /// Parse `source` and play the result `repeat` times.
    ///
    /// A parse failure leaves the controller as it was.
    pub fn start_notation<'a>(
        &mut self,
        hw: &mut dyn ToneHardware,
        source: impl Into<NotationSource<'a>>,
        repeat: u8,
    ) -> Result<()> {
        let parsed = self.parser.parse(source.into())?;
        self.start(hw, parsed, repeat)
    }

    /// Melody being played, `None` when idle
    pub fn melody(&self) -> Option<&Melody> {
        self.playback.as_ref().map(|p| &p.melody)
    }

    /// Index of the current note, `None` when idle
    pub fn current_note(&self) -> Option<usize> {
        self.playback.as_ref().map(|p| p.index)
    }

    /// Zero-based index of the current pass, `None` when idle
    pub fn current_pass(&self) -> Option<u8> {
        self.playback.as_ref().map(|p| p.pass)
    }

    /// Notes started since the last `start()`
    pub fn notes_started(&self) -> u32 {
        self.notes_started
    }

    fn play(&mut self, hw: &mut dyn ToneHardware, note: Note) {
        self.notes_started += 1;
        if let Err(e) = self.tone.play_note(hw, note.frequency, note.duration_ms as u32) {
            debug!(target: "buzzer::melody", "{}: note {} not played: {}", self.channel.id(), note, e);
            hw.silence(self.channel.id());
            self.tone.reset();
        }
    }

    /// Silence, drop the melody and release the channel
    fn finish(&mut self, hw: &mut dyn ToneHardware, reason: &str) {
        hw.silence(self.channel.id());
        self.tone.reset();
        if let Some(playback) = self.playback.take() {
            debug!(
                target: "buzzer::melody",
                "{}: {} after {} notes{}",
                self.channel.id(),
                reason,
                self.notes_started,
                if playback.melody.is_owned() { ", owned melody released" } else { "" }
            );
        }
        self.lease = None;
    }
}

impl Controller for MelodyController {
    fn tick(&mut self, hw: &mut dyn ToneHardware) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        self.tone.tick(hw);

        let now = hw.now_ms();
        let note = playback.melody[playback.index];
        let wait = (note.duration_ms as u32).saturating_add(self.settle_margin_ms);
        if elapsed_ms(now, playback.note_started_at) < wait {
            return;
        }

        playback.index += 1;
        if playback.index == playback.melody.len() {
            playback.pass += 1;
            if playback.pass >= playback.passes {
                self.finish(hw, "finished");
                return;
            }
            playback.index = 0;
        }

        let next = playback.melody[playback.index];
        playback.note_started_at = now;
        self.play(hw, next);
    }

    fn stop(&mut self, hw: &mut dyn ToneHardware) {
        if self.is_active() {
            self.finish(hw, "stopped");
        }
    }

    fn is_active(&self) -> bool {
        self.playback.is_some()
    }

    fn channel(&self) -> ChannelId {
        self.channel.id()
    }
}
