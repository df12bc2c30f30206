//! MIDI subsystem for monokey.
//!
//! Provides the device hub, note-event dispatch, and hardware input.
//!
//! # Features
//!
//! - **Device hub**: Device arrivals/removals delivered to listeners on one thread
//! - **Note dispatch**: Per-device note-on/note-off registration with RAII subscriptions
//! - **Hardware I/O**: Port polling and connection via midir (feature: `midi-io`)
//!
//! # Example
//!
//! ```ignore
//! use monokey_midi::{DeviceHub, MidiHardware};
//!
//! let mut hub = DeviceHub::new();
//! let _sub = hub.on_device_change(watcher);
//! let _hardware = MidiHardware::start(hub.sender())?;
//!
//! loop {
//!     hub.update();
//! }
//! ```

pub mod error;
pub use error::{Error, Result};

pub use device::{DeviceChange, DeviceDescription, DeviceId, DeviceKind, InputDevice, MidiDevice};
pub use event::MidiEvent;
pub use hub::{DeviceHub, HubSender};
pub use listener::{
    DeviceChangeListener, NoteListener, SharedDeviceChangeListener, SharedNoteListener,
};
pub use note::{short_display_name, velocity_to_gain, NoteControl};
pub use subscription::Subscription;

#[cfg(feature = "midi-io")]
pub use io::{MidiHardware, MidiInputDevice, DEFAULT_POLL_INTERVAL};

// Re-export essential upstream types
pub use midi_msg::{Channel, ChannelVoiceMsg};

pub(crate) mod device;
pub(crate) mod event;
pub(crate) mod hub;
pub(crate) mod listener;
pub(crate) mod note;
pub(crate) mod subscription;

#[cfg(feature = "midi-io")]
pub(crate) mod io;
