#![doc = r#"
Decoding the events of a single `MTrk` chunk.

Every event in a track is a delta-time followed by a message:

```text
<delta: vlq> <status> <data...>        channel message
<delta: vlq> <data...>                 channel message, running status
<delta: vlq> F0 <...> F7               system exclusive
<delta: vlq> FF <subtype> <len> <...>  meta event
```

The decoder is forgiving. Bytes it cannot place are skipped and counted in
[`Track::skipped_bytes`], truncated events end the track early, and unknown
meta events are kept as opaque payloads. The one hard failure is a system
exclusive message without its `0xF7` terminator.
"#]

use crate::{
    TrackError,
    file::{MetaEvent, MetaKind},
    message::{ChannelStatus, MessageKind, SystemMessage, SystemStatus},
    vlq,
};
use alloc::vec::Vec;

/// Introduces a meta event
pub const META_STATUS: u8 = 0xFF;
/// Introduces a system exclusive message
pub const SYSEX_STATUS: u8 = 0xF0;
/// Ends a system exclusive message, or introduces an escaped packet
pub const END_OF_EXCLUSIVE: u8 = 0xF7;

/// One decoded event with the delta-time that preceded it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawEvent {
    delta: u32,
    kind: MessageKind,
    offset: usize,
}

impl RawEvent {
    /// Ticks since the previous event in the track
    pub const fn delta(&self) -> u32 {
        self.delta
    }

    /// What happened
    pub const fn kind(&self) -> &MessageKind {
        &self.kind
    }

    /// Offset of the event's first byte within the track data.
    ///
    /// For meta events and explicit status messages this is the status byte;
    /// under running status it is the first data byte.
    pub const fn offset(&self) -> usize {
        self.offset
    }
}

/// Where a track chunk's data sits in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackMetadata {
    /// Offset of the first event byte, after the `MTrk` magic and length
    pub byte_offset: usize,
    /// Length of the event data
    pub byte_length: usize,
}

#[doc = r#"
The events of one track chunk, in the order they appear.

# Example
```rust
# use midiroll::prelude::*;
let data = [
    0x00, 0x90, 60, 100, // note on
    0x60, 62, 100,       // running status: another note on
    0x00, 0xFF, 0x2F, 0x00,
];
let track = decode_track(&data).unwrap();

assert_eq!(track.events().len(), 2);
assert!(track.ended());
assert!(track.events()[1].kind().is_note_on());
```
"#]
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: Vec<RawEvent>,
    metadata: TrackMetadata,
    ended: bool,
    skipped_bytes: usize,
}

impl Track {
    /// The decoded events
    pub fn events(&self) -> &[RawEvent] {
        &self.events
    }

    /// Where the track sits in the file
    pub const fn metadata(&self) -> TrackMetadata {
        self.metadata
    }

    /// True if the track closed with an end-of-track meta event
    pub const fn ended(&self) -> bool {
        self.ended
    }

    /// Bytes that could not be placed in any event
    pub const fn skipped_bytes(&self) -> usize {
        self.skipped_bytes
    }

    /// Every meta event of the track, with its delta-time
    pub fn meta_events(&self) -> impl Iterator<Item = (u32, &MetaEvent)> {
        self.events
            .iter()
            .filter_map(|event| event.kind.meta().map(|meta| (event.delta, meta)))
    }

    /// The first tempo change in the track
    pub fn first_tempo(&self) -> Option<crate::file::Tempo> {
        self.meta_events().find_map(|(_, meta)| meta.tempo())
    }

    pub(crate) fn at_offset(mut self, byte_offset: usize) -> Self {
        self.metadata.byte_offset = byte_offset;
        self
    }
}

/// Decode the event data of one track chunk.
///
/// `data` is the chunk body, without the `MTrk` magic and length prefix.
pub fn decode_track(data: &[u8]) -> Result<Track, TrackError> {
    TrackDecoder::new(data).run()
}

enum Flow {
    Continue,
    Stop,
}

struct TrackDecoder<'a> {
    data: &'a [u8],
    position: usize,
    /// Start of the provisionally unclassified bytes, which end at `position`
    pending_start: usize,
    running_status: Option<(u8, ChannelStatus)>,
    track: Track,
}

impl<'a> TrackDecoder<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            pending_start: 0,
            running_status: None,
            track: Track {
                metadata: TrackMetadata {
                    byte_offset: 0,
                    byte_length: data.len(),
                },
                ..Default::default()
            },
        }
    }

    fn run(mut self) -> Result<Track, TrackError> {
        while let Some(&byte) = self.data.get(self.position) {
            if byte == META_STATUS && self.is_meta_marker() {
                match self.meta() {
                    Flow::Continue => continue,
                    Flow::Stop => break,
                }
            }

            if !vlq::is_terminator(byte) {
                self.position += 1;
                if self.pending().len() >= vlq::MAX_LEN {
                    // four continuation bytes can't start a delta-time
                    self.skip_pending();
                }
                continue;
            }

            if self.data.get(self.position + 1) == Some(&META_STATUS) {
                // the delta-time of the meta event that follows
                self.position += 1;
                continue;
            }

            self.position += 1;
            let delta_len = self.pending().len();
            let delta = self.pending_delta();
            match self.event(delta, delta_len)? {
                Flow::Continue => {}
                Flow::Stop => break,
            }
        }

        if !self.track.ended {
            log::debug!("Track ended without an end-of-track event");
        }
        Ok(self.track)
    }

    fn pending(&self) -> &'a [u8] {
        let data = self.data;
        &data[self.pending_start..self.position]
    }

    /// A meta marker can only start where an event can: after a complete
    /// delta-time, or with nothing pending at all. With nothing pending, `FF`
    /// may just as well open a long delta-time, so it only counts as a marker
    /// when a known subtype follows.
    fn is_meta_marker(&self) -> bool {
        match self.pending().last() {
            Some(byte) => vlq::is_terminator(*byte),
            None => self
                .data
                .get(self.position + 1)
                .is_some_and(|subtype| MetaKind::from_subtype(*subtype).is_some()),
        }
    }

    fn pending_delta(&self) -> u32 {
        match self.pending() {
            [] => 0,
            // at most three continuation bytes and a terminator
            pending => vlq::decode(pending).unwrap_or_default(),
        }
    }

    fn skip_pending(&mut self) {
        let skipped = self.pending();
        log::debug!(
            "Skipping {} unclassified bytes at {}",
            skipped.len(),
            self.pending_start
        );
        self.track.skipped_bytes += skipped.len();
        self.pending_start = self.position;
    }

    fn advance_to(&mut self, position: usize) {
        self.position = position;
        self.pending_start = position;
    }

    fn push(&mut self, delta: u32, kind: MessageKind, offset: usize) {
        self.track.events.push(RawEvent {
            delta,
            kind,
            offset,
        });
    }

    fn truncated(&self, what: &str, offset: usize) -> Flow {
        log::warn!(
            "Track data ends inside a {what} at {offset}, dropping the rest of the track"
        );
        Flow::Stop
    }

    fn meta(&mut self) -> Flow {
        let data = self.data;
        let start = self.position;
        let delta = self.pending_delta();

        let Some(&subtype) = data.get(start + 1) else {
            return self.truncated("meta event", start);
        };
        if subtype == u8::from(MetaKind::EndOfTrack) {
            self.track.ended = true;
            self.advance_to(data.len());
            return Flow::Stop;
        }

        let length_field = data.get(start + 2..).unwrap_or_default();
        let Ok((length, length_size)) = vlq::read(length_field) else {
            return self.truncated("meta event", start);
        };
        let payload_start = start + 2 + length_size;
        let Some(payload) = data.get(payload_start..payload_start + length as usize) else {
            return self.truncated("meta event", start);
        };

        if let Some(meta) = MetaEvent::decode(subtype, payload) {
            self.push(delta, MessageKind::Meta(meta), start);
        }
        self.advance_to(payload_start + payload.len());
        Flow::Continue
    }

    fn event(&mut self, delta: u32, delta_len: usize) -> Result<Flow, TrackError> {
        let start = self.position;
        let Some(&byte) = self.data.get(start) else {
            log::debug!("Track data ends after a delta-time");
            return Ok(Flow::Stop);
        };

        if let Some(status) = ChannelStatus::from_status_byte(byte) {
            return Ok(self.channel_message(delta, delta_len, start, byte, status, start + 1));
        }
        if !vlq::is_terminator(byte) {
            return self.system_message(delta, start, byte);
        }
        if let Some((status_byte, status)) = self.running_status {
            return Ok(self.channel_message(
                delta,
                delta_len,
                start,
                status_byte,
                status,
                start,
            ));
        }

        log::debug!("Data byte {byte:#04X} at {start} without running status, skipping");
        self.track.skipped_bytes += delta_len;
        self.advance_to(start);
        Ok(Flow::Continue)
    }

    fn channel_message(
        &mut self,
        delta: u32,
        delta_len: usize,
        offset: usize,
        status_byte: u8,
        status: ChannelStatus,
        data_start: usize,
    ) -> Flow {
        let bytes = self.data;
        let data_end = data_start + status.data_byte_count();
        let Some(data) = bytes.get(data_start..data_end) else {
            return self.truncated("channel message", offset);
        };
        if !data.iter().all(|byte| vlq::is_terminator(*byte)) {
            log::debug!("Status {status_byte:#04X} at {offset} is missing its data bytes, skipping");
            // the delta-time goes with the skipped byte
            self.track.skipped_bytes += delta_len + 1;
            self.advance_to(offset + 1);
            return Flow::Continue;
        }

        let kind = MessageKind::channel(status, status_byte, data);
        self.push(delta, kind, offset);
        self.running_status = Some((status_byte, status));
        self.advance_to(data_end);
        Flow::Continue
    }

    fn system_message(&mut self, delta: u32, start: usize, byte: u8) -> Result<Flow, TrackError> {
        let bytes = self.data;
        match byte {
            SYSEX_STATUS => {
                let body = &bytes[start + 1..];
                let Some(length) = body.iter().position(|byte| *byte == END_OF_EXCLUSIVE) else {
                    return Err(TrackError::UnterminatedSysEx { offset: start });
                };
                self.push(delta, MessageKind::SystemExclusive { length }, start);
                self.running_status = None;
                self.advance_to(start + 1 + length + 1);
                Ok(Flow::Continue)
            }
            END_OF_EXCLUSIVE => {
                // escaped packet: F7 <len> <bytes>
                let body = &bytes[start + 1..];
                let Ok((length, length_size)) = vlq::read(body) else {
                    return Ok(self.truncated("escaped packet", start));
                };
                let end = start + 1 + length_size + length as usize;
                if end > bytes.len() {
                    return Ok(self.truncated("escaped packet", start));
                }
                self.push(
                    delta,
                    MessageKind::SystemExclusive {
                        length: length as usize,
                    },
                    start,
                );
                self.running_status = None;
                self.advance_to(end);
                Ok(Flow::Continue)
            }
            _ => {
                let Some(status) = SystemStatus::from_status_byte(byte) else {
                    self.track.skipped_bytes += 1;
                    self.advance_to(start + 1);
                    return Ok(Flow::Continue);
                };
                let data_end = start + 1 + status.data_byte_count();
                let Some(data) = bytes.get(start + 1..data_end) else {
                    return Ok(self.truncated("system message", start));
                };
                self.push(
                    delta,
                    MessageKind::SystemCommon(SystemMessage::new(status, data)),
                    start,
                );
                if !status.is_realtime() {
                    self.running_status = None;
                }
                self.advance_to(data_end);
                Ok(Flow::Continue)
            }
        }
    }
}

#[cfg(test)]
fn kinds(track: &Track) -> Vec<&MessageKind> {
    track.events().iter().map(RawEvent::kind).collect()
}

#[test]
fn decodes_explicit_and_running_status() {
    use crate::{Note, message::Channel};
    use pretty_assertions::assert_eq;

    let track = decode_track(&[
        0x00, 0x91, 60, 100, //
        0x10, 64, 90, //
        0x00, 0xFF, 0x2F, 0x00,
    ])
    .unwrap();

    assert_eq!(
        kinds(&track),
        [
            &MessageKind::NoteOn {
                channel: Channel::Two,
                note: Note::from_byte(60),
                velocity: 100
            },
            &MessageKind::NoteOn {
                channel: Channel::Two,
                note: Note::from_byte(64),
                velocity: 90
            },
        ]
    );
    assert_eq!(track.events()[1].delta(), 0x10);
    assert_eq!(track.events()[1].offset(), 5);
    assert_eq!(track.skipped_bytes(), 0);
}

#[test]
fn meta_events_keep_their_delta() {
    let track = decode_track(&[
        0x81, 0x00, 0xFF, 0x06, 0x01, b'A', // marker after 128 ticks
        0x00, 0xFF, 0x2F, 0x00,
    ])
    .unwrap();

    let (delta, meta) = track.meta_events().next().unwrap();
    assert_eq!(delta, 128);
    assert_eq!(
        meta,
        &MetaEvent::Text {
            kind: crate::file::TextKind::Marker,
            text: "A".into()
        }
    );
}

#[test]
fn end_of_track_stops_decoding() {
    let track = decode_track(&[
        0x00, 0xFF, 0x2F, 0x00, //
        0x00, 0x90, 60, 100,
    ])
    .unwrap();
    assert!(track.ended());
    assert!(track.events().is_empty());
}

#[test]
fn unterminated_sysex_is_an_error() {
    let err = decode_track(&[0x00, 0x90, 60, 100, 0x00, 0xF0, 0x03, 0x43, 0x12, 0x00]).unwrap_err();
    assert_eq!(err, TrackError::UnterminatedSysEx { offset: 5 });
}

#[test]
fn sysex_is_skipped_and_cancels_running_status() {
    let track = decode_track(&[
        0x00, 0x90, 60, 100, //
        0x00, 0xF0, 0x03, 0x43, 0x12, 0xF7, //
        0x00, 62, 100, // no status to run on
        0x00, 0x80, 60, 0,
    ])
    .unwrap();

    assert_eq!(track.events().len(), 3);
    assert_eq!(
        track.events()[1].kind(),
        &MessageKind::SystemExclusive { length: 3 }
    );
    assert!(track.events()[2].kind().is_note_off());
    assert!(track.skipped_bytes() > 0);
}

#[test]
fn stray_data_without_running_status_is_skipped() {
    // the stray byte is retried as a delta-time, which is skipped in turn
    let track = decode_track(&[0x00, 0x3C, 0x00, 0x90, 60, 100]).unwrap();
    assert_eq!(track.events().len(), 1);
    assert_eq!(track.skipped_bytes(), 2);
    assert!(track.events()[0].kind().is_note_on());
}

#[test]
fn truncated_message_ends_the_track() {
    let track = decode_track(&[0x00, 0x90, 60, 100, 0x00, 0x90, 61]).unwrap();
    assert_eq!(track.events().len(), 1);
    assert!(!track.ended());
}

#[test]
fn long_delta_may_start_with_ff() {
    let cases: [(&[u8], u32); 2] = [(&[0xFF, 0xFF, 0x7F], 2_097_151), (&[0xFF, 0x80, 0x00], 0x1F_C000)];
    for (delta, ticks) in cases {
        let mut data = delta.to_vec();
        data.extend_from_slice(&[0x90, 60, 64, 0x10, 0x80, 60, 0, 0x00, 0xFF, 0x2F, 0x00]);
        let track = decode_track(&data).unwrap();

        assert!(track.ended());
        assert_eq!(track.skipped_bytes(), 0);
        assert_eq!(track.events().len(), 2);
        assert!(track.events()[0].kind().is_note_on());
        assert_eq!(track.events()[0].delta(), ticks);
        assert!(track.events()[1].kind().is_note_off());
        assert_eq!(track.events()[1].delta(), 0x10);
    }
}

#[test]
fn system_messages_and_running_status() {
    use crate::message::SystemStatus;

    let track = decode_track(&[
        0x00, 0x90, 60, 64, //
        0x00, 0xF7, 0x02, 0x01, 0x02, // escaped packet
        0x00, 0x90, 62, 64, //
        0x00, 0xF8, // timing clock keeps running status
        0x00, 63, 64, //
        0x00, 0xF2, 0x10, 0x01, // song position cancels it
        0x00, 0xFF, 0x2F, 0x00,
    ])
    .unwrap();

    assert_eq!(track.skipped_bytes(), 0);
    assert_eq!(track.events().len(), 6);
    assert_eq!(
        track.events()[1].kind(),
        &MessageKind::SystemExclusive { length: 2 }
    );
    let MessageKind::SystemCommon(clock) = track.events()[3].kind() else {
        panic!("expected a timing clock");
    };
    assert_eq!(clock.status(), SystemStatus::TimingClock);
    assert!(track.events()[4].kind().is_note_on());
    assert_eq!(track.events()[4].offset(), 16);
    let MessageKind::SystemCommon(position) = track.events()[5].kind() else {
        panic!("expected a song position");
    };
    assert_eq!(position.song_position(), Some(0x90));

    let cancelled = decode_track(&[
        0x00, 0x90, 60, 64, //
        0x00, 0xF2, 0x10, 0x01, //
        0x00, 62, 64,
    ])
    .unwrap();
    assert_eq!(cancelled.events().len(), 2);
    assert!(cancelled.skipped_bytes() > 0);
}

#[test]
fn meta_length_is_a_vlq() {
    let mut data = alloc::vec![0x00, 0xFF, 0x01, 0x81, 0x00];
    data.extend_from_slice(&[b'a'; 128]);
    data.extend_from_slice(&[0x00, 0x90, 60, 64, 0x00, 0xFF, 0x2F, 0x00]);
    let track = decode_track(&data).unwrap();

    let (_, meta) = track.meta_events().next().unwrap();
    let MetaEvent::Text { text, .. } = meta else {
        panic!("expected a text event");
    };
    assert_eq!(text.len(), 128);
    assert!(track.events()[1].kind().is_note_on());
    assert!(track.ended());
}

#[test]
fn skipped_status_takes_its_delta_along() {
    // 0x90 has a status byte where its velocity should be
    let track = decode_track(&[0x00, 0x90, 60, 0x90, 62, 64]).unwrap();
    assert_eq!(track.skipped_bytes(), 2);
    assert_eq!(track.events().len(), 1);
    // 60 is read as the next delta-time
    assert_eq!(track.events()[0].delta(), 60);
    assert!(track.events()[0].kind().is_note_on());
}
