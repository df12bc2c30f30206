//! Sine renderer that follows a [`SharedOscillator`].

use std::f32::consts::TAU;

use crate::oscillator::{Oscillator, SharedOscillator};
use crate::{Error, Result};

/// Renders a sine at the oscillator's current frequency, or silence while it
/// is stopped. Phase carries across buffers so pitch changes don't click.
#[derive(Debug)]
pub struct SineVoice {
    oscillator: SharedOscillator,
    sample_rate: f32,
    phase: f32,
}

impl SineVoice {
    pub fn new(oscillator: SharedOscillator, sample_rate: f32) -> Result<Self> {
        if !(8000.0..=384000.0).contains(&sample_rate) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                sample_rate
            )));
        }
        Ok(Self {
            oscillator,
            sample_rate,
            phase: 0.0,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Fill `out` with mono samples in -1.0..=1.0.
    pub fn render(&mut self, out: &mut [f32]) {
        let (frequency, playing) = self.oscillator.snapshot();
        if !playing {
            out.fill(0.0);
            return;
        }

        let increment = frequency / self.sample_rate;
        for sample in out.iter_mut() {
            *sample = (self.phase * TAU).sin();
            self.phase = (self.phase + increment).fract();
        }
    }
}
