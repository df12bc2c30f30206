//! Listener traits for device changes and note events.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::device::{DeviceChange, InputDevice};
use crate::note::NoteControl;

/// Receives note events from every MIDI device it is registered on.
pub trait NoteListener: Send {
    /// `velocity` is normalized to 0.0-1.0.
    fn on_note_on(&mut self, note: &NoteControl, velocity: f32);

    fn on_note_off(&mut self, note: &NoteControl);
}

/// Receives device arrivals and removals from a [`DeviceHub`](crate::DeviceHub).
pub trait DeviceChangeListener: Send {
    fn on_device_change(&mut self, device: &InputDevice, change: DeviceChange);
}

/// Handle that can be registered on several devices at once.
pub type SharedNoteListener = Arc<Mutex<dyn NoteListener>>;

pub type SharedDeviceChangeListener = Arc<Mutex<dyn DeviceChangeListener>>;
