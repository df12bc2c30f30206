//! Channel-voice MIDI events decoded from raw input bytes.

use midi_msg::{Channel, ChannelVoiceMsg, MidiMsg};

use crate::{Error, Result};

/// A single channel-voice message together with its channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiEvent {
    pub channel: Channel,
    pub msg: ChannelVoiceMsg,
}

impl MidiEvent {
    #[inline]
    pub fn new(channel: Channel, msg: ChannelVoiceMsg) -> Self {
        Self { channel, msg }
    }

    #[inline]
    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            channel: Channel::from_u8(channel),
            msg: ChannelVoiceMsg::NoteOn { note, velocity },
        }
    }

    #[inline]
    pub fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            channel: Channel::from_u8(channel),
            msg: ChannelVoiceMsg::NoteOff { note, velocity },
        }
    }

    #[inline]
    pub fn control_change(channel: u8, cc: u8, value: u8) -> Self {
        Self {
            channel: Channel::from_u8(channel),
            msg: ChannelVoiceMsg::ControlChange {
                control: midi_msg::ControlChange::CC { control: cc, value },
            },
        }
    }

    /// Zero-based channel number (0-15).
    #[inline]
    pub fn channel_num(&self) -> u8 {
        self.channel as u8
    }

    #[inline]
    pub fn is_note_on(&self) -> bool {
        matches!(self.msg, ChannelVoiceMsg::NoteOn { velocity, .. } if velocity > 0)
    }

    /// Note Off, or Note On with velocity 0 (running-status release).
    #[inline]
    pub fn is_note_off(&self) -> bool {
        matches!(
            self.msg,
            ChannelVoiceMsg::NoteOff { .. } | ChannelVoiceMsg::NoteOn { velocity: 0, .. }
        )
    }

    #[inline]
    pub fn note(&self) -> Option<u8> {
        match self.msg {
            ChannelVoiceMsg::NoteOn { note, .. }
            | ChannelVoiceMsg::NoteOff { note, .. }
            | ChannelVoiceMsg::HighResNoteOn { note, .. }
            | ChannelVoiceMsg::HighResNoteOff { note, .. }
            | ChannelVoiceMsg::PolyPressure { note, .. } => Some(note),
            _ => None,
        }
    }

    #[inline]
    pub fn velocity(&self) -> Option<u8> {
        match self.msg {
            ChannelVoiceMsg::NoteOn { velocity, .. }
            | ChannelVoiceMsg::NoteOff { velocity, .. } => Some(velocity),
            ChannelVoiceMsg::HighResNoteOn { velocity, .. }
            | ChannelVoiceMsg::HighResNoteOff { velocity, .. } => {
                // 14-bit velocity, keep the upper 7 bits
                Some((velocity >> 7) as u8)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn to_bytes(&self) -> Vec<u8> {
        MidiMsg::ChannelVoice {
            channel: self.channel,
            msg: self.msg,
        }
        .to_midi()
    }

    /// Parse a raw MIDI message. Anything but a channel-voice message is an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (msg, _len) = MidiMsg::from_midi(bytes)?;
        match msg {
            MidiMsg::ChannelVoice { channel, msg } => Ok(Self { channel, msg }),
            _ => Err(Error::Parse("expected a channel voice message".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_note_on() {
        let event = MidiEvent::from_bytes(&[0x90, 60, 100]).unwrap();
        assert_eq!(event.channel, Channel::Ch1);
        assert!(event.is_note_on());
        assert_eq!(event.note(), Some(60));
        assert_eq!(event.velocity(), Some(100));
    }

    #[test]
    fn test_parse_note_on_velocity_zero_is_note_off() {
        let event = MidiEvent::from_bytes(&[0x90, 60, 0]).unwrap();
        assert!(event.is_note_off());
        assert!(!event.is_note_on());
        assert_eq!(event.note(), Some(60));
    }

    #[test]
    fn test_parse_note_off_on_channel() {
        let event = MidiEvent::from_bytes(&[0x83, 64, 40]).unwrap();
        assert!(event.is_note_off());
        assert_eq!(event.channel_num(), 3);
        assert_eq!(event.note(), Some(64));
    }

    #[test]
    fn test_control_change_has_no_note() {
        let event = MidiEvent::from_bytes(&[0xB0, 7, 100]).unwrap();
        assert!(!event.is_note_on());
        assert!(!event.is_note_off());
        assert_eq!(event.note(), None);
        assert_eq!(event.velocity(), None);
    }

    #[test]
    fn test_rejects_non_channel_voice() {
        // Timing clock
        assert!(MidiEvent::from_bytes(&[0xF8]).is_err());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(MidiEvent::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_to_bytes() {
        assert_eq!(MidiEvent::note_on(0, 60, 100).to_bytes(), vec![0x90, 60, 100]);
        assert_eq!(MidiEvent::note_off(2, 61, 0).to_bytes(), vec![0x82, 61, 0]);
    }
}
