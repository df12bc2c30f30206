//! Hardware MIDI input.
//!
//! Port polling, connection, and byte forwarding via midir.
//! Requires the `midi-io` feature.

mod input;

pub use input::{MidiHardware, MidiInputDevice, DEFAULT_POLL_INTERVAL};
