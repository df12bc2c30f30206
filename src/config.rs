//! Controller configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

/// Accepted note numbers, exclusive at both ends: `low < note < high`.
///
/// The bounds themselves are never accepted. With `(20, 80)`, notes 21 through
/// 79 play and 20 and 80 do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRange {
    pub low: i32,
    pub high: i32,
}

impl NoteRange {
    /// Every MIDI note, 0 through 127.
    pub const FULL: NoteRange = NoteRange { low: -1, high: 128 };

    pub const fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    #[inline]
    pub fn contains(&self, note_number: i32) -> bool {
        note_number > self.low && note_number < self.high
    }

    /// `false` when no integer lies strictly between the bounds.
    pub fn is_valid(&self) -> bool {
        self.high.saturating_sub(self.low) > 1
    }
}

impl Default for NoteRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Configuration for a [`MidiController`](crate::MidiController).
///
/// ```toml
/// [range]
/// low = 20
/// high = 80
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub range: NoteRange,
}

impl ControllerConfig {
    pub fn with_range(low: i32, high: i32) -> Self {
        Self {
            range: NoteRange::new(low, high),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.range.is_valid() {
            return Err(Error::InvalidConfig(format!(
                "note range ({}, {}) accepts no notes; bounds are exclusive",
                self.range.low, self.range.high
            )));
        }
        Ok(())
    }

    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_exclusive() {
        let range = NoteRange::new(20, 80);
        assert!(!range.contains(20));
        assert!(range.contains(21));
        assert!(range.contains(79));
        assert!(!range.contains(80));
        assert!(!range.contains(10));
    }

    #[test]
    fn test_full_range_covers_midi() {
        assert!(NoteRange::FULL.contains(0));
        assert!(NoteRange::FULL.contains(127));
        assert!(!NoteRange::FULL.contains(128));
    }

    #[test]
    fn test_validate() {
        assert!(ControllerConfig::with_range(20, 80).validate().is_ok());
        assert!(ControllerConfig::with_range(20, 22).validate().is_ok());
        assert!(ControllerConfig::with_range(20, 21).validate().is_err());
        assert!(ControllerConfig::with_range(80, 20).validate().is_err());
        assert!(ControllerConfig::with_range(i32::MIN, i32::MAX).validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = ControllerConfig::from_toml_str("[range]\nlow = 20\nhigh = 80\n").unwrap();
        assert_eq!(config.range, NoteRange::new(20, 80));
    }

    #[test]
    fn test_from_toml_defaults_to_full_range() {
        let config = ControllerConfig::from_toml_str("").unwrap();
        assert_eq!(config.range, NoteRange::FULL);
    }

    #[test]
    fn test_from_toml_rejects_empty_range() {
        let err = ControllerConfig::from_toml_str("[range]\nlow = 60\nhigh = 60\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        let err = ControllerConfig::from_toml_str("[range]\nlow = \"C4\"\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
