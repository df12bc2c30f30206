//! Input devices and MIDI note dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

use crate::event::MidiEvent;
use crate::listener::SharedNoteListener;
use crate::note::{velocity_to_gain, NoteControl};
use crate::subscription::{Registry, Subscription};

/// Hub-assigned device identifier, unique for the lifetime of a hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescription {
    /// Transport the device arrived through, e.g. `"MIDI"` or `"HID"`.
    pub interface: String,
    pub product: String,
    pub manufacturer: String,
}

impl DeviceDescription {
    pub fn midi(product: impl Into<String>) -> Self {
        Self {
            interface: "MIDI".to_string(),
            product: product.into(),
            manufacturer: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    Midi,
    /// Anything without note capability (keyboards, gamepads, ...).
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceChange {
    Added,
    Removed,
}

/// A device known to the hub. Only MIDI devices carry a [`MidiDevice`].
pub struct InputDevice {
    id: DeviceId,
    description: DeviceDescription,
    midi: Option<MidiDevice>,
}

impl InputDevice {
    pub fn new(id: DeviceId, description: DeviceDescription, kind: DeviceKind) -> Self {
        let midi = match kind {
            DeviceKind::Midi => Some(MidiDevice::new(description.product.clone())),
            DeviceKind::Other => None,
        };
        Self {
            id,
            description,
            midi,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn description(&self) -> &DeviceDescription {
        &self.description
    }

    pub fn kind(&self) -> DeviceKind {
        if self.midi.is_some() {
            DeviceKind::Midi
        } else {
            DeviceKind::Other
        }
    }

    /// Narrow to the MIDI capability. `None` for every other device type.
    pub fn as_midi(&self) -> Option<&MidiDevice> {
        self.midi.as_ref()
    }
}

impl fmt::Debug for InputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputDevice")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Note capability of an input device.
pub struct MidiDevice {
    product: String,
    note_on: Registry<SharedNoteListener>,
    note_off: Registry<SharedNoteListener>,
}

impl MidiDevice {
    fn new(product: String) -> Self {
        Self {
            product,
            note_on: Registry::new(),
            note_off: Registry::new(),
        }
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn on_note_on(&self, listener: SharedNoteListener) -> Subscription {
        self.note_on.insert(listener)
    }

    pub fn on_note_off(&self, listener: SharedNoteListener) -> Subscription {
        self.note_off.insert(listener)
    }

    pub fn note_on_listeners(&self) -> usize {
        self.note_on.len()
    }

    pub fn note_off_listeners(&self) -> usize {
        self.note_off.len()
    }

    /// Deliver one event to the registered listeners, in registration order.
    /// Non-note messages are ignored.
    pub fn dispatch(&self, event: &MidiEvent) {
        let Some(note) = event.note() else {
            trace!(product = %self.product, "Ignoring non-note MIDI message");
            return;
        };
        let control = NoteControl::new(note as i32, event.channel_num(), self.product.as_str());

        if event.is_note_on() {
            let velocity = velocity_to_gain(event.velocity().unwrap_or(0));
            for listener in self.note_on.snapshot() {
                listener.lock().on_note_on(&control, velocity);
            }
        } else if event.is_note_off() {
            for listener in self.note_off.snapshot() {
                listener.lock().on_note_off(&control);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::NoteListener;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Recorder {
        on: Vec<(i32, f32)>,
        off: Vec<i32>,
    }

    impl NoteListener for Recorder {
        fn on_note_on(&mut self, note: &NoteControl, velocity: f32) {
            self.on.push((note.note_number, velocity));
        }

        fn on_note_off(&mut self, note: &NoteControl) {
            self.off.push(note.note_number);
        }
    }

    fn keyboard() -> InputDevice {
        InputDevice::new(
            DeviceId(1),
            DeviceDescription::midi("Test Keys"),
            DeviceKind::Midi,
        )
    }

    #[test]
    fn test_non_midi_device_has_no_midi_capability() {
        let gamepad = InputDevice::new(
            DeviceId(2),
            DeviceDescription {
                interface: "HID".into(),
                product: "Pad".into(),
                manufacturer: String::new(),
            },
            DeviceKind::Other,
        );
        assert!(gamepad.as_midi().is_none());
        assert_eq!(gamepad.kind(), DeviceKind::Other);
    }

    #[test]
    fn test_dispatch_routes_on_and_off() {
        let device = keyboard();
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let _on = device.as_midi().unwrap().on_note_on(recorder.clone());
        let _off = device.as_midi().unwrap().on_note_off(recorder.clone());

        let midi = device.as_midi().unwrap();
        midi.dispatch(&MidiEvent::note_on(0, 60, 127));
        midi.dispatch(&MidiEvent::note_on(0, 60, 0));
        midi.dispatch(&MidiEvent::note_off(0, 62, 0));
        midi.dispatch(&MidiEvent::control_change(0, 1, 64));

        let recorder = recorder.lock();
        assert_eq!(recorder.on, vec![(60, 1.0)]);
        assert_eq!(recorder.off, vec![60, 62]);
    }

    #[test]
    fn test_dropped_subscription_stops_delivery() {
        let device = keyboard();
        let midi = device.as_midi().unwrap();
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let sub = midi.on_note_on(recorder.clone());
        assert_eq!(midi.note_on_listeners(), 1);

        drop(sub);
        midi.dispatch(&MidiEvent::note_on(0, 60, 100));
        assert_eq!(midi.note_on_listeners(), 0);
        assert!(recorder.lock().on.is_empty());
    }
}
