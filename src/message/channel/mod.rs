#![doc = r#"
Channel voice messages

```text
status byte  1sss nnnn   sss = message kind, nnnn = channel
data bytes   0xxx xxxx   one or two, depending on the kind
```
"#]

mod controller;
pub use controller::*;

use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The kind of a channel message, keyed by the high nibble of its status byte.

# Example
```rust
# use midiroll::prelude::*;
let status = ChannelStatus::from_status_byte(0x93).unwrap();
assert_eq!(status, ChannelStatus::NoteOn);
assert_eq!(status.data_byte_count(), 2);

assert!(ChannelStatus::from_status_byte(0xF0).is_none());
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ChannelStatus {
    /// `0b1000`
    NoteOff = 0b1000,
    /// `0b1001`
    NoteOn = 0b1001,
    /// `0b1010`, polyphonic key pressure (aftertouch)
    PolyphonicPressure = 0b1010,
    /// `0b1011`, control change or channel mode message
    ControlChange = 0b1011,
    /// `0b1100`
    ProgramChange = 0b1100,
    /// `0b1101`
    ChannelPressure = 0b1101,
    /// `0b1110`, pitch wheel change
    PitchBend = 0b1110,
}

impl ChannelStatus {
    /// Look up the kind for a full status byte.
    ///
    /// Returns `None` for data bytes and system messages.
    pub fn from_status_byte(status: u8) -> Option<Self> {
        Self::try_from(status >> 4).ok()
    }

    /// How many data bytes follow the status byte
    pub const fn data_byte_count(&self) -> usize {
        match self {
            Self::ProgramChange | Self::ChannelPressure => 1,
            _ => 2,
        }
    }
}

#[doc = r#"
One of the sixteen MIDI channels, taken from the low nibble of a status byte.
"#]
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl Channel {
    /// The channel addressed by a status byte
    pub const fn from_status(status: u8) -> Self {
        use Channel::*;
        match status & 0x0F {
            0 => One,
            1 => Two,
            2 => Three,
            3 => Four,
            4 => Five,
            5 => Six,
            6 => Seven,
            7 => Eight,
            8 => Nine,
            9 => Ten,
            10 => Eleven,
            11 => Twelve,
            12 => Thirteen,
            13 => Fourteen,
            14 => Fifteen,
            _ => Sixteen,
        }
    }

    /// Zero-based channel number, `0..=15`
    pub fn index(self) -> u8 {
        self.into()
    }
}

#[test]
fn status_table_covers_every_channel_nibble() {
    use pretty_assertions::assert_eq;

    let counts: alloc::vec::Vec<_> = (0x80u8..=0xEF)
        .step_by(0x10)
        .map(|status| ChannelStatus::from_status_byte(status).map(|s| s.data_byte_count()))
        .collect();
    assert_eq!(
        counts,
        [Some(2), Some(2), Some(2), Some(2), Some(1), Some(1), Some(2)]
    );

    for byte in 0x00..0x80 {
        assert!(ChannelStatus::from_status_byte(byte).is_none());
    }
    assert!(ChannelStatus::from_status_byte(0xF0).is_none());
}

#[test]
fn channel_from_low_nibble() {
    assert_eq!(Channel::from_status(0x90), Channel::One);
    assert_eq!(Channel::from_status(0x8F), Channel::Sixteen);
    assert_eq!(Channel::from_status(0xB9).index(), 9);
}
