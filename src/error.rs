//! Centralized error type for the monokey umbrella crate.
//!
//! Wraps subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("MIDI: {0}")]
    Midi(#[from] monokey_midi::Error),

    #[error("Synth: {0}")]
    Synth(#[from] monokey_synth::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
