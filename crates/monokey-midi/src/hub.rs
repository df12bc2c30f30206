//! Device hub: owns connected devices and delivers their events on one thread.
//!
//! Hardware backends run on their own threads and only talk to the hub through a
//! [`HubSender`]. Nothing reaches a listener until [`DeviceHub::update`] is called;
//! events are then handled synchronously, in the order they were queued.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::device::{DeviceChange, DeviceDescription, DeviceId, DeviceKind, InputDevice};
use crate::event::MidiEvent;
use crate::listener::SharedDeviceChangeListener;
use crate::subscription::{Registry, Subscription};

enum HubMessage {
    Added {
        id: DeviceId,
        description: DeviceDescription,
        kind: DeviceKind,
    },
    Removed(DeviceId),
    Midi {
        device: DeviceId,
        bytes: Vec<u8>,
    },
}

/// Thread-safe handle for feeding a [`DeviceHub`].
#[derive(Clone)]
pub struct HubSender {
    sender: Sender<HubMessage>,
    next_id: Arc<AtomicU32>,
}

impl HubSender {
    /// Queue a device arrival. Returns the id the device will have once the hub
    /// processes the message, or `None` if the hub is gone.
    pub fn device_added(
        &self,
        description: DeviceDescription,
        kind: DeviceKind,
    ) -> Option<DeviceId> {
        let id = DeviceId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sender
            .send(HubMessage::Added {
                id,
                description,
                kind,
            })
            .ok()
            .map(|_| id)
    }

    pub fn device_removed(&self, id: DeviceId) -> bool {
        self.sender.send(HubMessage::Removed(id)).is_ok()
    }

    /// Queue raw bytes received from `device`.
    pub fn midi_message(&self, device: DeviceId, bytes: &[u8]) -> bool {
        self.sender
            .send(HubMessage::Midi {
                device,
                bytes: bytes.to_vec(),
            })
            .is_ok()
    }
}

pub struct DeviceHub {
    devices: Vec<InputDevice>,
    listeners: Registry<SharedDeviceChangeListener>,
    sender: Sender<HubMessage>,
    receiver: Receiver<HubMessage>,
    next_id: Arc<AtomicU32>,
}

impl Default for DeviceHub {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceHub {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            devices: Vec::new(),
            listeners: Registry::new(),
            sender,
            receiver,
            next_id: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn sender(&self) -> HubSender {
        HubSender {
            sender: self.sender.clone(),
            next_id: Arc::clone(&self.next_id),
        }
    }

    /// Register for device arrivals and removals until the guard is dropped.
    pub fn on_device_change(&self, listener: SharedDeviceChangeListener) -> Subscription {
        self.listeners.insert(listener)
    }

    pub fn device_change_listeners(&self) -> usize {
        self.listeners.len()
    }

    /// Connect a device immediately and notify listeners.
    pub fn add_device(&mut self, description: DeviceDescription, kind: DeviceKind) -> DeviceId {
        let id = DeviceId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.insert_device(id, description, kind);
        id
    }

    /// Disconnect a device, notify listeners, then drop it along with every
    /// note handler registered on it. Returns `false` for unknown ids.
    pub fn remove_device(&mut self, id: DeviceId) -> bool {
        let Some(index) = self.devices.iter().position(|d| d.id() == id) else {
            return false;
        };
        let device = self.devices.remove(index);
        debug!(id = %id, product = %device.description().product, "Device removed");
        self.notify(&device, DeviceChange::Removed);
        true
    }

    pub fn device(&self, id: DeviceId) -> Option<&InputDevice> {
        self.devices.iter().find(|d| d.id() == id)
    }

    pub fn devices(&self) -> &[InputDevice] {
        &self.devices
    }

    /// Parse `bytes` and deliver them to `device` right away.
    pub fn send_midi(&self, device: DeviceId, bytes: &[u8]) {
        let Some(midi) = self.device(device).and_then(InputDevice::as_midi) else {
            debug!(id = %device, "MIDI message for unknown or non-MIDI device");
            return;
        };
        match MidiEvent::from_bytes(bytes) {
            Ok(event) => midi.dispatch(&event),
            Err(e) => debug!("Failed to parse MIDI message: {}", e),
        }
    }

    /// Drain everything queued through [`HubSender`]s and dispatch it on the
    /// calling thread. Returns the number of messages handled.
    pub fn update(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.receiver.try_recv() {
            match message {
                HubMessage::Added {
                    id,
                    description,
                    kind,
                } => self.insert_device(id, description, kind),
                HubMessage::Removed(id) => {
                    self.remove_device(id);
                }
                HubMessage::Midi { device, bytes } => self.send_midi(device, &bytes),
            }
            handled += 1;
        }
        if handled > 0 {
            trace!(handled, "Hub update");
        }
        handled
    }

    fn insert_device(&mut self, id: DeviceId, description: DeviceDescription, kind: DeviceKind) {
        if self.device(id).is_some() {
            debug!(id = %id, "Device already connected");
            return;
        }
        debug!(id = %id, product = %description.product, ?kind, "Device added");
        self.devices.push(InputDevice::new(id, description, kind));
        if let Some(device) = self.devices.last() {
            self.notify(device, DeviceChange::Added);
        }
    }

    fn notify(&self, device: &InputDevice, change: DeviceChange) {
        for listener in self.listeners.snapshot() {
            listener.lock().on_device_change(device, change);
        }
    }
}
