//! MIDI hardware watcher.
//!
//! midir has no hotplug notifications, so a dedicated thread re-enumerates the
//! input ports on every poll interval. New ports are connected and announced to
//! the hub; vanished ports are disconnected and reported as removed. Ports are
//! keyed by name plus their position among same-named ports. The thread owns
//! every `MidiInputConnection` for platform thread-safety.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use midir::{Ignore, MidiInput, MidiInputConnection, MidiInputPort};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::device::{DeviceDescription, DeviceId, DeviceKind};
use crate::hub::HubSender;
use crate::{Error, Result};

const CLIENT_NAME: &str = "monokey-midi-input";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Information about an available MIDI input port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiInputDevice {
    /// Port index at enumeration time
    pub index: usize,
    pub name: String,
}

enum HardwareCommand {
    Rescan,
    Shutdown,
}

struct Connected {
    id: DeviceId,
    _connection: MidiInputConnection<()>,
}

/// Background watcher that keeps a [`DeviceHub`](crate::DeviceHub) in sync with
/// the system's MIDI inputs. Stops and reports every device as removed on drop.
pub struct MidiHardware {
    command_sender: Sender<HardwareCommand>,
    thread: Option<JoinHandle<()>>,
}

impl MidiHardware {
    pub fn start(hub: HubSender) -> Result<Self> {
        Self::with_poll_interval(hub, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(hub: HubSender, poll_interval: Duration) -> Result<Self> {
        // Fail early if the platform backend is unavailable.
        drop(MidiInput::new(CLIENT_NAME)?);

        let (command_sender, command_receiver) = bounded(16);
        let thread = thread::Builder::new()
            .name("monokey-midi".to_string())
            .spawn(move || Self::midi_thread(command_receiver, hub, poll_interval))?;

        Ok(Self {
            command_sender,
            thread: Some(thread),
        })
    }

    /// Enumerate the system's MIDI input ports.
    pub fn list_devices() -> Vec<MidiInputDevice> {
        let mut devices = Vec::new();
        if let Ok(midi_input) = MidiInput::new("monokey-device-list") {
            for (index, port) in midi_input.ports().iter().enumerate() {
                let name = midi_input
                    .port_name(port)
                    .unwrap_or_else(|_| format!("Unknown Device {}", index));
                devices.push(MidiInputDevice { index, name });
            }
        }
        devices
    }

    /// Ask the watcher thread to poll now instead of waiting for the interval.
    pub fn rescan(&self) {
        let _ = self.command_sender.send(HardwareCommand::Rescan);
    }

    fn midi_thread(
        command_receiver: Receiver<HardwareCommand>,
        hub: HubSender,
        poll_interval: Duration,
    ) {
        let mut connected: HashMap<PortKey, Connected> = HashMap::new();
        Self::scan(&hub, &mut connected);

        loop {
            match command_receiver.recv_timeout(poll_interval) {
                Ok(HardwareCommand::Rescan) | Err(RecvTimeoutError::Timeout) => {
                    Self::scan(&hub, &mut connected);
                }
                Ok(HardwareCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        for (key, device) in connected.drain() {
            debug!("Closing MIDI input {}", key);
            hub.device_removed(device.id);
        }
    }

    fn scan(hub: &HubSender, connected: &mut HashMap<PortKey, Connected>) {
        let midi_input = match MidiInput::new(CLIENT_NAME) {
            Ok(midi_input) => midi_input,
            Err(e) => {
                warn!("Failed to create MIDI input: {}", e);
                return;
            }
        };

        let names: Vec<String> = midi_input
            .ports()
            .iter()
            .filter_map(|port| midi_input.port_name(port).ok())
            .collect();
        let present: HashSet<PortKey> = port_keys(names).into_iter().collect();

        let stale = stale_names(connected.keys(), &present);
        connected.retain(|key, device| {
            let keep = !stale.contains(&key.name);
            if !keep {
                info!("MIDI input {} disconnected", key);
                hub.device_removed(device.id);
            }
            keep
        });

        for key in &present {
            if connected.contains_key(key) {
                continue;
            }
            match Self::connect(hub, key) {
                Ok(device) => {
                    info!("Connected to MIDI input {}", key);
                    connected.insert(key.clone(), device);
                }
                Err(e) => warn!("Failed to connect to MIDI input {}: {}", key, e),
            }
        }
    }

    fn connect(hub: &HubSender, key: &PortKey) -> Result<Connected> {
        // `connect` consumes the client, so each port gets its own.
        let mut midi_input = MidiInput::new(CLIENT_NAME)?;
        midi_input.ignore(Ignore::All);

        let port = Self::find_port(&midi_input, key)
            .ok_or_else(|| Error::MidiPort(format!("MIDI input {} vanished", key)))?;

        let id = hub
            .device_added(DeviceDescription::midi(&key.name), DeviceKind::Midi)
            .ok_or_else(|| Error::MidiDevice("device hub dropped".to_string()))?;

        let forward = hub.clone();
        let connection = midi_input.connect(
            &port,
            "monokey-input",
            move |_timestamp, message, _| {
                forward.midi_message(id, message);
            },
            (),
        );

        match connection {
            Ok(connection) => Ok(Connected {
                id,
                _connection: connection,
            }),
            Err(e) => {
                hub.device_removed(id);
                Err(e.into())
            }
        }
    }

    fn find_port(midi_input: &MidiInput, key: &PortKey) -> Option<MidiInputPort> {
        midi_input
            .ports()
            .into_iter()
            .filter(|port| midi_input.port_name(port).is_ok_and(|n| n == key.name))
            .nth(key.occurrence)
    }
}

/// Identifies a port across scans. Ports sharing a name are told apart by
/// their position among the same-named ports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PortKey {
    name: String,
    occurrence: usize,
}

impl fmt::Display for PortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.occurrence == 0 {
            write!(f, "'{}'", self.name)
        } else {
            write!(f, "'{}' #{}", self.name, self.occurrence + 1)
        }
    }
}

fn port_keys(names: impl IntoIterator<Item = String>) -> Vec<PortKey> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            let occurrence = *count;
            *count += 1;
            PortKey { name, occurrence }
        })
        .collect()
}
/// Names with at least one vanished port. Positions among same-named ports
/// shift when one goes away, so every port with such a name is reconnected.
fn stale_names<'a>(
    connected: impl IntoIterator<Item = &'a PortKey>,
    present: &HashSet<PortKey>,
) -> HashSet<String> {
    connected
        .into_iter()
        .filter(|key| !present.contains(*key))
        .map(|key| key.name.clone())
        .collect()
}

impl Drop for MidiHardware {
    fn drop(&mut self) {
        let _ = self.command_sender.send(HardwareCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
