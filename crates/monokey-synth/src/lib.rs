//! Oscillator building blocks for monokey.
//!
//! - [`Oscillator`]: the pitch + on/off surface the note mapper drives
//! - [`SharedOscillator`]: lock-free handle, shareable with an audio callback
//! - [`SineVoice`]: renders a shared oscillator into a sample buffer
//! - [`tuning`]: equal-tempered note to frequency conversion

pub mod error;
pub use error::{Error, Result};

mod oscillator;
pub use oscillator::{Oscillator, SharedOscillator};

pub mod tuning;
pub use tuning::calculate_frequency;

mod voice;
pub use voice::SineVoice;
