//! Attaches a note listener to every MIDI device the hub reports.

use monokey_midi::{
    DeviceChange, DeviceChangeListener, DeviceId, InputDevice, SharedNoteListener, Subscription,
};
use std::collections::HashMap;
use tracing::{debug, trace};

struct DeviceHandlers {
    _note_on: Subscription,
    _note_off: Subscription,
}

pub struct DeviceWatcher {
    listener: SharedNoteListener,
    attached: HashMap<DeviceId, DeviceHandlers>,
}

impl DeviceWatcher {
    pub fn new(listener: SharedNoteListener) -> Self {
        Self {
            listener,
            attached: HashMap::new(),
        }
    }

    pub fn is_attached(&self, id: DeviceId) -> bool {
        self.attached.contains_key(&id)
    }

    pub fn attached_devices(&self) -> usize {
        self.attached.len()
    }

    /// Unregister the listener from every device it was attached to.
    pub fn detach_all(&mut self) {
        if !self.attached.is_empty() {
            debug!(devices = self.attached.len(), "Detaching note handlers");
        }
        self.attached.clear();
    }

    fn attach(&mut self, device: &InputDevice) {
        let Some(midi) = device.as_midi() else {
            trace!(product = %device.description().product, "Not a MIDI device");
            return;
        };
        if self.is_attached(device.id()) {
            return;
        }

        let handlers = DeviceHandlers {
            _note_on: midi.on_note_on(self.listener.clone()),
            _note_off: midi.on_note_off(self.listener.clone()),
        };
        debug!(id = %device.id(), product = %midi.product(), "Attached note handlers");
        self.attached.insert(device.id(), handlers);
    }
}

impl DeviceChangeListener for DeviceWatcher {
    fn on_device_change(&mut self, device: &InputDevice, change: DeviceChange) {
        match change {
            DeviceChange::Added => self.attach(device),
            // The device takes its handlers with it; only forget the guards.
            DeviceChange::Removed => {
                self.attached.remove(&device.id());
            }
        }
    }
}
