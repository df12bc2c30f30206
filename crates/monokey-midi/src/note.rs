//! Note naming and the note payload handed to listeners.

const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Short display name in scientific pitch notation, sharps only.
///
/// Middle C (60) is `C4`; note 0 is `C-1`. Works for any integer.
pub fn short_display_name(note_number: i32) -> String {
    let pitch_class = note_number.rem_euclid(12) as usize;
    let octave = note_number.div_euclid(12) - 1;
    format!("{}{}", PITCH_NAMES[pitch_class], octave)
}

/// 0-127 MIDI velocity to 0.0-1.0.
#[inline]
pub fn velocity_to_gain(velocity: u8) -> f32 {
    velocity as f32 / 127.0
}

/// The key that produced a note event, as seen by a [`NoteListener`](crate::NoteListener).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteControl {
    pub note_number: i32,
    pub short_display_name: String,
    /// Zero-based MIDI channel the message arrived on.
    pub channel: u8,
    /// Product name of the device that sent the message.
    pub device: String,
}

impl NoteControl {
    pub fn new(note_number: i32, channel: u8, device: impl Into<String>) -> Self {
        Self {
            note_number,
            short_display_name: short_display_name(note_number),
            channel,
            device: device.into(),
        }
    }
}
