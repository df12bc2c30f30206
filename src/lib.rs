//! # monokey - Monophonic MIDI keyboard controller
//!
//! Plays a single oscillator from any connected MIDI keyboard.
//!
//! ## Architecture
//!
//! monokey is an umbrella crate that coordinates:
//! - **monokey-midi** - Device hub, note dispatch, hardware input (midir)
//! - **monokey-synth** - Oscillator handle, sine voice, equal-tempered tuning
//!
//! and adds the controller itself:
//! - [`DeviceWatcher`] attaches note handlers to each MIDI device that connects
//! - [`NoteMapper`] gates the oscillator on a note range and retunes it,
//!   last note wins
//!
//! ## Quick Start
//!
//! ```ignore
//! use monokey::prelude::*;
//!
//! let mut hub = DeviceHub::new();
//! let osc = SharedOscillator::default();
//!
//! let mut controller = MidiController::builder()
//!     .range(20, 80)
//!     .oscillator(osc.clone())
//!     .build()?;
//! controller.start(&hub);
//!
//! let _hardware = MidiHardware::start(hub.sender())?;
//! loop {
//!     hub.update();
//!     let (frequency, playing) = osc.snapshot();
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `midi-io` (default) - Hardware MIDI input and the `monokey` binary

/// Re-export of monokey-midi for direct access
pub use monokey_midi as midi;

/// Re-export of monokey-synth for direct access
pub use monokey_synth as synth;

mod builder;
mod config;
mod controller;
mod error;
mod mapper;
mod watcher;

pub use builder::MidiControllerBuilder;
pub use config::{ControllerConfig, NoteRange};
pub use controller::MidiController;
pub use error::{Error, Result};
pub use mapper::NoteMapper;
pub use watcher::DeviceWatcher;

pub use monokey_midi::{
    DeviceChange, DeviceDescription, DeviceHub, DeviceId, DeviceKind, HubSender, InputDevice,
    MidiDevice, MidiEvent, NoteControl, NoteListener, Subscription,
};
pub use monokey_synth::{calculate_frequency, Oscillator, SharedOscillator, SineVoice};

#[cfg(feature = "midi-io")]
pub use monokey_midi::MidiHardware;

pub mod prelude {
    pub use crate::{
        calculate_frequency, ControllerConfig, DeviceHub, MidiController, NoteRange, Oscillator,
        SharedOscillator,
    };

    #[cfg(feature = "midi-io")]
    pub use crate::MidiHardware;
}
