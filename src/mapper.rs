//! Monophonic note gating.
//!
//! Last note wins: every accepted note-on retunes the oscillator and becomes the
//! current note. Only the release of the current note stops playback; releasing
//! any other key leaves it sounding.

use monokey_midi::{NoteControl, NoteListener};
use monokey_synth::{calculate_frequency, Oscillator};
use tracing::info;

use crate::config::NoteRange;

pub struct NoteMapper<O> {
    range: NoteRange,
    oscillator: O,
    current_note: Option<i32>,
}

impl<O: Oscillator> NoteMapper<O> {
    pub fn new(range: NoteRange, oscillator: O) -> Self {
        Self {
            range,
            oscillator,
            current_note: None,
        }
    }

    pub fn range(&self) -> NoteRange {
        self.range
    }

    /// The last accepted note. Not cleared on release.
    pub fn current_note(&self) -> Option<i32> {
        self.current_note
    }

    pub fn oscillator(&self) -> &O {
        &self.oscillator
    }

    /// Returns `true` if the note was in range and is now sounding.
    /// `velocity` does not affect the oscillator.
    pub fn note_on(&mut self, note_number: i32, _velocity: f32) -> bool {
        if !self.range.contains(note_number) {
            return false;
        }
        self.oscillator.set_frequency(calculate_frequency(note_number));
        self.oscillator.set_playing(true);
        self.current_note = Some(note_number);
        true
    }

    /// Returns `true` if this release stopped playback.
    pub fn note_off(&mut self, note_number: i32) -> bool {
        if !self.range.contains(note_number) || self.current_note != Some(note_number) {
            return false;
        }
        self.oscillator.set_playing(false);
        true
    }
}

impl<O: Oscillator + Send> NoteListener for NoteMapper<O> {
    fn on_note_on(&mut self, note: &NoteControl, velocity: f32) {
        info!(
            "Note On #{} ({}) vel:{:.2} ch:{} dev:'{}'",
            note.note_number, note.short_display_name, velocity, note.channel, note.device
        );
        self.note_on(note.note_number, velocity);
    }

    fn on_note_off(&mut self, note: &NoteControl) {
        info!(
            "Note Off #{} ({}) ch:{} dev:'{}'",
            note.note_number, note.short_display_name, note.channel, note.device
        );
        self.note_off(note.note_number);
    }
}
