//! Oscillator control surface.

use atomic_float::AtomicF32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Anything with a pitch and an on/off switch.
pub trait Oscillator {
    fn frequency(&self) -> f32;

    fn set_frequency(&mut self, hz: f32);

    fn is_playing(&self) -> bool;

    fn set_playing(&mut self, playing: bool);
}

#[derive(Debug)]
struct OscillatorState {
    frequency: AtomicF32,
    playing: AtomicBool,
}

/// Clonable oscillator handle backed by atomics.
///
/// Clones share state: the controller writes through one handle while an audio
/// callback reads through another, without locks.
#[derive(Debug, Clone)]
pub struct SharedOscillator {
    state: Arc<OscillatorState>,
}

impl SharedOscillator {
    pub fn new(frequency: f32) -> Self {
        Self {
            state: Arc::new(OscillatorState {
                frequency: AtomicF32::new(frequency),
                playing: AtomicBool::new(false),
            }),
        }
    }

    /// `(frequency, is_playing)` at this instant.
    pub fn snapshot(&self) -> (f32, bool) {
        (self.frequency(), self.is_playing())
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl Default for SharedOscillator {
    fn default() -> Self {
        Self::new(crate::tuning::A4_FREQ)
    }
}

impl Oscillator for SharedOscillator {
    #[inline]
    fn frequency(&self) -> f32 {
        self.state.frequency.load(Ordering::Acquire)
    }

    #[inline]
    fn set_frequency(&mut self, hz: f32) {
        self.state.frequency.store(hz, Ordering::Release);
    }

    #[inline]
    fn is_playing(&self) -> bool {
        self.state.playing.load(Ordering::Acquire)
    }

    #[inline]
    fn set_playing(&mut self, playing: bool) {
        self.state.playing.store(playing, Ordering::Release);
    }
}
