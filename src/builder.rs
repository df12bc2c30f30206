//! Builder for configuring and constructing a `MidiController`.

use monokey_synth::Oscillator;

use crate::config::{ControllerConfig, NoteRange};
use crate::{Error, MidiController, Result};

/// The note range defaults to [`NoteRange::FULL`]. An oscillator is required.
///
/// # Example
///
/// ```ignore
/// let controller = MidiController::builder()
///     .range(20, 80)
///     .oscillator(SharedOscillator::default())
///     .build()?;
/// ```
pub struct MidiControllerBuilder<O> {
    config: ControllerConfig,
    oscillator: Option<O>,
}

impl<O> Default for MidiControllerBuilder<O> {
    fn default() -> Self {
        Self {
            config: ControllerConfig::default(),
            oscillator: None,
        }
    }
}

impl<O: Oscillator + Send + 'static> MidiControllerBuilder<O> {
    /// Exclusive bounds: notes strictly between `low` and `high` play.
    pub fn range(mut self, low: i32, high: i32) -> Self {
        self.config.range = NoteRange::new(low, high);
        self
    }

    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn oscillator(mut self, oscillator: O) -> Self {
        self.oscillator = Some(oscillator);
        self
    }

    pub fn build(self) -> Result<MidiController<O>> {
        self.config.validate()?;
        let oscillator = self
            .oscillator
            .ok_or_else(|| Error::InvalidConfig("no oscillator set".to_string()))?;
        Ok(MidiController::new(self.config, oscillator))
    }
}
