#![doc = r#"
The message kinds found in a track, and the tables used to recognize them.

# Hierarchy
```text
                      |-------------|
                      | MessageKind |
                      |-------------|
          /                  |                   \
|-----------------|  |----------------|  |------------|
| Channel voice   |  | System         |  | Meta event |
| (status 8_..E_) |  | (status F0-FE) |  | (FF xx)    |
|-----------------|  |----------------|  |------------|
```
"#]

mod channel;
pub use channel::*;

mod system;
pub use system::*;

use crate::{Note, file::MetaEvent};

#[doc = r#"
A single decoded event from a track.

Note events carry the [`Note`] together with its velocity. A note on with a
velocity of zero is how most files say "note off", see
[`MessageKind::is_note_off`].
"#]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    /// Release a key
    NoteOff {
        /// channel of the message
        channel: Channel,
        /// the released key
        note: Note,
        /// release velocity
        velocity: u8,
    },
    /// Press a key
    NoteOn {
        /// channel of the message
        channel: Channel,
        /// the pressed key
        note: Note,
        /// strike velocity, 0 means release
        velocity: u8,
    },
    /// Aftertouch on a single key
    PolyphonicPressure {
        /// channel of the message
        channel: Channel,
        /// the key under pressure
        note: Note,
        /// pressure amount
        pressure: u8,
    },
    /// A controller moved
    ControlChange {
        /// channel of the message
        channel: Channel,
        /// which controller
        controller: Controller,
        /// new value
        value: u8,
    },
    /// Instrument change
    ProgramChange {
        /// channel of the message
        channel: Channel,
        /// program number
        program: u8,
    },
    /// Aftertouch for the whole channel
    ChannelPressure {
        /// channel of the message
        channel: Channel,
        /// pressure amount
        pressure: u8,
    },
    /// Pitch wheel position
    PitchBend {
        /// channel of the message
        channel: Channel,
        /// 14-bit value, `0x2000` is centered
        value: u16,
    },
    /// A system exclusive packet. Its content is skipped.
    SystemExclusive {
        /// bytes between the status byte and the terminator
        length: usize,
    },
    /// System common and realtime messages
    SystemCommon(SystemMessage),
    /// Meta event
    Meta(MetaEvent),
}

impl MessageKind {
    /// Build a channel message from its status and data bytes.
    ///
    /// `data` must hold at least [`ChannelStatus::data_byte_count`] bytes.
    pub(crate) fn channel(status: ChannelStatus, status_byte: u8, data: &[u8]) -> Self {
        let channel = Channel::from_status(status_byte);
        let first = data.first().copied().unwrap_or_default();
        let second = data.get(1).copied().unwrap_or_default();
        match status {
            ChannelStatus::NoteOff => Self::NoteOff {
                channel,
                note: Note::from_byte(first),
                velocity: second,
            },
            ChannelStatus::NoteOn => Self::NoteOn {
                channel,
                note: Note::from_byte(first),
                velocity: second,
            },
            ChannelStatus::PolyphonicPressure => Self::PolyphonicPressure {
                channel,
                note: Note::from_byte(first),
                pressure: second,
            },
            ChannelStatus::ControlChange => Self::ControlChange {
                channel,
                controller: Controller::new(first),
                value: second,
            },
            ChannelStatus::ProgramChange => Self::ProgramChange {
                channel,
                program: first,
            },
            ChannelStatus::ChannelPressure => Self::ChannelPressure {
                channel,
                pressure: first,
            },
            ChannelStatus::PitchBend => Self::PitchBend {
                channel,
                value: u16::from(first) | (u16::from(second) << 7),
            },
        }
    }

    /// The channel of a channel message
    pub const fn channel_of(&self) -> Option<Channel> {
        match self {
            Self::NoteOff { channel, .. }
            | Self::NoteOn { channel, .. }
            | Self::PolyphonicPressure { channel, .. }
            | Self::ControlChange { channel, .. }
            | Self::ProgramChange { channel, .. }
            | Self::ChannelPressure { channel, .. }
            | Self::PitchBend { channel, .. } => Some(*channel),
            _ => None,
        }
    }

    /// A note on with a non-zero velocity
    pub const fn is_note_on(&self) -> bool {
        matches!(self, Self::NoteOn { velocity, .. } if *velocity > 0)
    }

    /// A note off, or a note on with zero velocity
    pub const fn is_note_off(&self) -> bool {
        matches!(
            self,
            Self::NoteOff { .. } | Self::NoteOn { velocity: 0, .. }
        )
    }

    /// The meta event, if this is one
    pub const fn meta(&self) -> Option<&MetaEvent> {
        match self {
            Self::Meta(meta) => Some(meta),
            _ => None,
        }
    }
}

#[test]
fn zero_velocity_note_on_is_note_off() {
    let on = MessageKind::channel(ChannelStatus::NoteOn, 0x90, &[60, 64]);
    let silent = MessageKind::channel(ChannelStatus::NoteOn, 0x90, &[60, 0]);
    let off = MessageKind::channel(ChannelStatus::NoteOff, 0x80, &[60, 64]);

    assert!(on.is_note_on() && !on.is_note_off());
    assert!(silent.is_note_off() && !silent.is_note_on());
    assert!(off.is_note_off());
}

#[test]
fn pitch_bend_is_fourteen_bits() {
    let centered = MessageKind::channel(ChannelStatus::PitchBend, 0xE3, &[0x00, 0x40]);
    assert_eq!(
        centered,
        MessageKind::PitchBend {
            channel: Channel::Four,
            value: 0x2000
        }
    );
}
