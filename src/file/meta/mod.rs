#![doc = r#"
Meta events: data in a track that is not sent to an instrument.

```text
FF <subtype> <length: vlq> <payload>
```

[`MetaKind`] is the table of subtypes the decoder understands. Each
recognized subtype has a payload decoder in [`MetaEvent::decode`]; subtype
`0x2F` (end of track) has none, it stops the track. Subtypes missing from the
table, and recognized subtypes whose payload does not decode, are kept as
[`MetaEvent::Opaque`].
"#]

mod signature;
pub use signature::*;

mod smpte_offset;
pub use smpte_offset::*;

mod tempo;
pub use tempo::*;

use alloc::{string::String, vec::Vec};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The meta event subtypes understood by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaKind {
    /// `0x00`
    SequenceNumber = 0x00,
    /// `0x01`
    Text = 0x01,
    /// `0x02`
    Copyright = 0x02,
    /// `0x03`
    TrackName = 0x03,
    /// `0x04`
    InstrumentName = 0x04,
    /// `0x05`
    Lyric = 0x05,
    /// `0x06`
    Marker = 0x06,
    /// `0x07`
    CuePoint = 0x07,
    /// `0x20`
    ChannelPrefix = 0x20,
    /// `0x2F`, terminates the track
    EndOfTrack = 0x2F,
    /// `0x51`
    Tempo = 0x51,
    /// `0x54`
    SmpteOffset = 0x54,
    /// `0x58`
    TimeSignature = 0x58,
    /// `0x59`
    KeySignature = 0x59,
    /// `0x7F`
    SequencerSpecific = 0x7F,
}

impl MetaKind {
    /// Look up a subtype byte
    pub fn from_subtype(subtype: u8) -> Option<Self> {
        Self::try_from(subtype).ok()
    }

    /// The text flavour, for the text-carrying subtypes
    pub const fn text_kind(&self) -> Option<TextKind> {
        Some(match self {
            Self::Text => TextKind::Text,
            Self::Copyright => TextKind::Copyright,
            Self::TrackName => TextKind::TrackName,
            Self::InstrumentName => TextKind::InstrumentName,
            Self::Lyric => TextKind::Lyric,
            Self::Marker => TextKind::Marker,
            Self::CuePoint => TextKind::CuePoint,
            _ => return None,
        })
    }
}

/// The flavours of text meta event
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextKind {
    Text,
    Copyright,
    TrackName,
    InstrumentName,
    Lyric,
    Marker,
    CuePoint,
}

/// A decoded meta event payload
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaEvent {
    /// Sequence number. An empty payload means "use the track position".
    SequenceNumber(Option<u16>),
    /// Any of the text events, decoded as Latin-1
    Text {
        /// which text event
        kind: TextKind,
        /// the text
        text: String,
    },
    /// Channel the following meta and sysex events apply to
    ChannelPrefix(u8),
    /// Tempo change
    Tempo(Tempo),
    /// Track start time in SMPTE time code
    SmpteOffset(SmpteOffset),
    /// Time signature
    TimeSignature(TimeSignature),
    /// Key signature
    KeySignature(KeySignature),
    /// Vendor data, kept as is
    SequencerSpecific(Vec<u8>),
    /// A subtype we do not know, or a payload that did not decode
    Opaque {
        /// the subtype byte
        subtype: u8,
        /// the raw payload
        data: Vec<u8>,
    },
}

impl MetaEvent {
    /// Decode the payload of a meta event.
    ///
    /// Returns `None` only for [`MetaKind::EndOfTrack`], which carries no
    /// event.
    pub fn decode(subtype: u8, data: &[u8]) -> Option<Self> {
        let opaque = || Self::Opaque {
            subtype,
            data: data.to_vec(),
        };

        let Some(kind) = MetaKind::from_subtype(subtype) else {
            return Some(opaque());
        };

        let decoded = match kind {
            MetaKind::EndOfTrack => return None,
            MetaKind::SequenceNumber => match data {
                [] => Some(Self::SequenceNumber(None)),
                &[msb, lsb] => Some(Self::SequenceNumber(Some(u16::from_be_bytes([msb, lsb])))),
                _ => None,
            },
            MetaKind::ChannelPrefix => match data {
                &[channel] if channel < 16 => Some(Self::ChannelPrefix(channel)),
                _ => None,
            },
            MetaKind::Tempo => Tempo::from_bytes(data).map(Self::Tempo),
            MetaKind::SmpteOffset => SmpteOffset::parse(data).ok().map(Self::SmpteOffset),
            MetaKind::TimeSignature => TimeSignature::from_bytes(data).map(Self::TimeSignature),
            MetaKind::KeySignature => KeySignature::from_bytes(data).map(Self::KeySignature),
            MetaKind::SequencerSpecific => Some(Self::SequencerSpecific(data.to_vec())),
            text => text.text_kind().map(|kind| Self::Text {
                kind,
                text: latin1(data),
            }),
        };

        Some(decoded.unwrap_or_else(|| {
            log::warn!(
                "Meta event {kind:?} has a malformed {} byte payload, keeping it opaque",
                data.len()
            );
            opaque()
        }))
    }

    /// The tempo, if this is a tempo change
    pub const fn tempo(&self) -> Option<Tempo> {
        match self {
            Self::Tempo(tempo) => Some(*tempo),
            _ => None,
        }
    }
}

/// Every byte is one character; Latin-1 maps directly onto the first 256
/// code points.
fn latin1(data: &[u8]) -> String {
    data.iter().map(|byte| char::from(*byte)).collect()
}

#[test]
fn decodes_text_events() {
    use pretty_assertions::assert_eq;

    assert_eq!(
        MetaEvent::decode(0x03, b"Piano"),
        Some(MetaEvent::Text {
            kind: TextKind::TrackName,
            text: "Piano".into()
        })
    );
    assert_eq!(
        MetaEvent::decode(0x05, &[0x63, 0x61, 0x66, 0xE9]),
        Some(MetaEvent::Text {
            kind: TextKind::Lyric,
            text: "caf\u{e9}".into()
        })
    );
}

#[test]
fn end_of_track_has_no_event() {
    assert_eq!(MetaEvent::decode(0x2F, &[]), None);
}

#[test]
fn unknown_and_malformed_are_opaque() {
    assert_eq!(
        MetaEvent::decode(0x09, &[1, 2, 3]),
        Some(MetaEvent::Opaque {
            subtype: 0x09,
            data: alloc::vec![1, 2, 3]
        })
    );
    assert_eq!(
        MetaEvent::decode(0x51, &[0x07, 0xA1]),
        Some(MetaEvent::Opaque {
            subtype: 0x51,
            data: alloc::vec![0x07, 0xA1]
        })
    );
}

#[test]
fn decodes_fixed_payloads() {
    assert_eq!(
        MetaEvent::decode(0x00, &[0x00, 0x07]),
        Some(MetaEvent::SequenceNumber(Some(7)))
    );
    assert_eq!(
        MetaEvent::decode(0x20, &[0x09]),
        Some(MetaEvent::ChannelPrefix(9))
    );
    assert_eq!(
        MetaEvent::decode(0x51, &[0x07, 0xA1, 0x20]).and_then(|m| m.tempo()),
        Tempo::new(500_000)
    );
}
