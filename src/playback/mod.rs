#![doc = r#"
Turning a track's raw events into something a player can schedule.

A track says "key down" and, some time later, "key up". A player wants to know
"play this key, at this time, for this long". [`postprocess`] walks the raw
events keeping a running tick count, pairs every note on with the note off
that releases it, and sorts the result by start time. Everything that is not a
note passes through with its absolute time attached, so the player can still
react to pedals, tempo changes and the like.

```text
raw:      +0 NoteOn 60   +480 NoteOff 60
playable: Note { key 60, start 0, duration 480 }
```
"#]

mod align;
pub use align::*;

use crate::{
    Note,
    file::Track,
    message::{Channel, MessageKind},
};
use alloc::{collections::VecDeque, vec::Vec};

/// What to do when a key is struck again before it was released
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlapPolicy {
    /// Queue the strikes; note offs release them oldest first
    #[default]
    Queue,
    /// The newer strike replaces the older one, which is never released
    Overwrite,
}

/// A note with an absolute start time and a duration, both in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayableNote {
    channel: Channel,
    note: Note,
    velocity: u8,
    start_time: u64,
    duration: u64,
}

impl PlayableNote {
    /// The channel of the note on
    pub const fn channel(&self) -> Channel {
        self.channel
    }
    /// The key
    pub const fn note(&self) -> Note {
        self.note
    }
    /// MIDI note number
    pub const fn midi_note(&self) -> u8 {
        self.note.midi_note()
    }
    /// Piano key number, `midi_note - 20`
    pub const fn piano_key(&self) -> i16 {
        self.note.piano_key()
    }
    /// Velocity of the note on, `1..=127`
    pub const fn velocity(&self) -> u8 {
        self.velocity
    }
    /// Ticks from the start of the track
    pub const fn start_time(&self) -> u64 {
        self.start_time
    }
    /// Length in ticks
    pub const fn duration(&self) -> u64 {
        self.duration
    }
    /// `start_time + duration`
    pub const fn end_time(&self) -> u64 {
        self.start_time + self.duration
    }
}

/// One entry of a [`PlayableTrack`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayableEvent {
    /// A paired note
    Note(PlayableNote),
    /// Any other event, at the absolute time it happened
    Passthrough {
        /// ticks from the start of the track
        start_time: u64,
        /// the event
        kind: MessageKind,
    },
}

impl PlayableEvent {
    /// Ticks from the start of the track
    pub const fn start_time(&self) -> u64 {
        match self {
            Self::Note(note) => note.start_time,
            Self::Passthrough { start_time, .. } => *start_time,
        }
    }

    /// The note, if this is one
    pub const fn note(&self) -> Option<&PlayableNote> {
        match self {
            Self::Note(note) => Some(note),
            Self::Passthrough { .. } => None,
        }
    }

    /// Piano key number of a note event
    pub const fn piano_key(&self) -> Option<i16> {
        match self {
            Self::Note(note) => Some(note.piano_key()),
            Self::Passthrough { .. } => None,
        }
    }
}

#[doc = r#"
The time-ordered, playable form of a track.
"#]
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayableTrack {
    music: Vec<PlayableEvent>,
    start_time: u64,
    end_time: Option<u64>,
}

impl PlayableTrack {
    fn new(music: Vec<PlayableEvent>) -> Self {
        let start_time = music.first().map_or(0, PlayableEvent::start_time);
        // the last note in start order, not necessarily the last to finish
        let end_time = music
            .iter()
            .rev()
            .find_map(PlayableEvent::note)
            .map(PlayableNote::end_time);
        Self {
            music,
            start_time,
            end_time,
        }
    }

    /// Events sorted by start time
    pub fn music(&self) -> &[PlayableEvent] {
        &self.music
    }

    /// Iterate over the notes only
    pub fn notes(&self) -> impl Iterator<Item = &PlayableNote> {
        self.music.iter().filter_map(PlayableEvent::note)
    }

    /// Start time of the first event, 0 for an empty track
    pub const fn start_time(&self) -> u64 {
        self.start_time
    }

    /// End of the last note to start. `None` if the track has no notes.
    pub const fn end_time(&self) -> Option<u64> {
        self.end_time
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.music.len()
    }

    /// True if there are no events
    pub fn is_empty(&self) -> bool {
        self.music.is_empty()
    }
}

/// Counts collected while pairing notes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PostprocessStats {
    /// Paired notes emitted
    pub notes: usize,
    /// Non-note events passed through
    pub passthrough: usize,
    /// Note offs with no open note to close
    pub spurious_note_offs: usize,
    /// Note ons replaced under [`OverlapPolicy::Overwrite`]
    pub overwritten_notes: usize,
    /// Note ons still open when the track ended
    pub unclosed_notes: usize,
}

/// A [`PlayableTrack`] with the counts gathered while building it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Playback {
    /// the playable form of the track
    pub track: PlayableTrack,
    /// what happened on the way
    pub stats: PostprocessStats,
}

#[derive(Debug, Clone, Copy)]
struct OpenNote {
    channel: Channel,
    start_time: u64,
    velocity: u8,
}

#[doc = r#"
Pair the note ons and note offs of a track and sort everything by start time.

A note on with a velocity of zero counts as a note off. A note off with no
open note of the same key is discarded and counted. The sort is stable: events
with the same start time stay in the order they were produced, which for notes
is the order of their note offs.

# Example
```rust
# use midiroll::prelude::*;
let track = decode_track(&[
    0x00, 0x90, 60, 64,
    0x83, 0x60, 0x90, 60, 0, // zero velocity: note off
    0x00, 0x80, 61, 0,       // nothing to release
]).unwrap();

let Playback { track, stats } = postprocess(&track, OverlapPolicy::Queue);
assert_eq!(stats.notes, 1);
assert_eq!(stats.spurious_note_offs, 1);

let note = track.notes().next().unwrap();
assert_eq!((note.start_time(), note.duration()), (0, 480));
assert_eq!(track.end_time(), Some(480));
```
"#]
pub fn postprocess(track: &Track, policy: OverlapPolicy) -> Playback {
    let mut open: [VecDeque<OpenNote>; 128] = core::array::from_fn(|_| VecDeque::new());
    let mut music = Vec::with_capacity(track.events().len() / 2);
    let mut stats = PostprocessStats::default();
    let mut running_time = 0u64;

    for event in track.events() {
        running_time += u64::from(event.delta());
        let kind = event.kind();

        match kind {
            MessageKind::NoteOn {
                channel,
                note,
                velocity,
            } if *velocity > 0 => {
                let queue = &mut open[usize::from(note.midi_note())];
                if policy == OverlapPolicy::Overwrite && !queue.is_empty() {
                    stats.overwritten_notes += queue.len();
                    queue.clear();
                }
                queue.push_back(OpenNote {
                    channel: *channel,
                    start_time: running_time,
                    velocity: *velocity,
                });
            }
            MessageKind::NoteOn { note, .. } | MessageKind::NoteOff { note, .. } => {
                let Some(opened) = open[usize::from(note.midi_note())].pop_front() else {
                    stats.spurious_note_offs += 1;
                    continue;
                };
                stats.notes += 1;
                music.push(PlayableEvent::Note(PlayableNote {
                    channel: opened.channel,
                    note: *note,
                    velocity: opened.velocity,
                    start_time: opened.start_time,
                    duration: running_time - opened.start_time,
                }));
            }
            _ => {
                stats.passthrough += 1;
                music.push(PlayableEvent::Passthrough {
                    start_time: running_time,
                    kind: kind.clone(),
                });
            }
        }
    }

    stats.unclosed_notes = open.iter().map(VecDeque::len).sum();
    if stats.unclosed_notes > 0 {
        log::debug!("{} notes were never released", stats.unclosed_notes);
    }

    music.sort_by_key(PlayableEvent::start_time);

    Playback {
        track: PlayableTrack::new(music),
        stats,
    }
}

#[cfg(test)]
fn note_track(events: &[(u32, MessageKind)]) -> Track {
    use crate::file::decode_track;
    use alloc::vec;

    let mut bytes = vec![];
    for (delta, kind) in events {
        let (status, a, b) = match kind {
            MessageKind::NoteOn { note, velocity, .. } => (0x90, note.midi_note(), *velocity),
            MessageKind::NoteOff { note, velocity, .. } => (0x80, note.midi_note(), *velocity),
            MessageKind::ControlChange {
                controller, value, ..
            } => (0xB0, controller.number(), *value),
            _ => unreachable!(),
        };
        let mut delta_bytes = vec![(*delta & 0x7F) as u8];
        let mut rest = delta >> 7;
        while rest > 0 {
            delta_bytes.insert(0, (rest & 0x7F) as u8 | 0x80);
            rest >>= 7;
        }
        bytes.extend(delta_bytes);
        bytes.extend([status, a, b]);
    }
    decode_track(&bytes).unwrap()
}

#[cfg(test)]
fn on(note: u8, velocity: u8) -> MessageKind {
    MessageKind::NoteOn {
        channel: Channel::One,
        note: Note::from_byte(note),
        velocity,
    }
}

#[cfg(test)]
fn off(note: u8) -> MessageKind {
    MessageKind::NoteOff {
        channel: Channel::One,
        note: Note::from_byte(note),
        velocity: 0,
    }
}

#[test]
fn pairs_notes_and_discards_spurious_offs() {
    let track = note_track(&[
        (0, on(60, 80)),
        (10, off(62)),
        (10, on(64, 70)),
        (20, off(60)),
        (5, on(64, 0)),
        (0, off(64)),
    ]);

    let Playback { track, stats } = postprocess(&track, OverlapPolicy::Queue);
    assert_eq!(stats.notes, 2);
    assert_eq!(stats.spurious_note_offs, 2);

    let notes: Vec<_> = track
        .notes()
        .map(|n| (n.midi_note(), n.velocity(), n.start_time(), n.duration()))
        .collect();
    assert_eq!(notes, [(60, 80, 0, 40), (64, 70, 20, 25)]);
    assert_eq!(track.start_time(), 0);
    assert_eq!(track.end_time(), Some(45));
}

#[test]
fn overlapping_strikes_by_policy() {
    let events = [
        (0, on(60, 100)),
        (10, on(60, 50)),
        (10, off(60)),
        (10, off(60)),
    ];

    let queued = postprocess(&note_track(&events), OverlapPolicy::Queue);
    let spans: Vec<_> = queued
        .track
        .notes()
        .map(|n| (n.start_time(), n.duration(), n.velocity()))
        .collect();
    assert_eq!(spans, [(0, 20, 100), (10, 20, 50)]);
    assert_eq!(queued.stats.unclosed_notes, 0);

    let overwritten = postprocess(&note_track(&events), OverlapPolicy::Overwrite);
    let spans: Vec<_> = overwritten
        .track
        .notes()
        .map(|n| (n.start_time(), n.duration(), n.velocity()))
        .collect();
    assert_eq!(spans, [(10, 10, 50)]);
    assert_eq!(overwritten.stats.overwritten_notes, 1);
    assert_eq!(overwritten.stats.spurious_note_offs, 1);
}

#[test]
fn passthrough_keeps_absolute_time() {
    use crate::message::Controller;

    let pedal = MessageKind::ControlChange {
        channel: Channel::One,
        controller: Controller::new(64),
        value: 127,
    };
    let track = note_track(&[(0, on(60, 80)), (30, pedal.clone()), (30, off(60))]);
    let Playback { track, stats } = postprocess(&track, OverlapPolicy::Queue);

    assert_eq!(stats.passthrough, 1);
    assert_eq!(
        track.music()[1],
        PlayableEvent::Passthrough {
            start_time: 30,
            kind: pedal
        }
    );
    assert_eq!(track.music()[0].start_time(), 0);
}

#[test]
fn empty_track_has_no_end() {
    let Playback { track, stats } = postprocess(&Track::default(), OverlapPolicy::Queue);
    assert!(track.is_empty());
    assert_eq!(track.start_time(), 0);
    assert_eq!(track.end_time(), None);
    assert_eq!(stats, PostprocessStats::default());
}

#[test]
fn unreleased_notes_are_counted() {
    let track = note_track(&[(0, on(60, 80)), (0, on(61, 80)), (10, off(61))]);
    let Playback { stats, .. } = postprocess(&track, OverlapPolicy::Queue);
    assert_eq!(stats.notes, 1);
    assert_eq!(stats.unclosed_notes, 1);
}
