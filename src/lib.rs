#![doc = r#"
Decode Standard MIDI Files into something a player can schedule.

`midiroll` takes the raw bytes of a Standard MIDI File (SMF) and produces, per
track, a time-ordered list of notes that each carry an absolute start time and
a duration in ticks, together with a [`Header`](prelude::Header) that knows how
many ticks make a second.

# Overview

```text
bytes ──► MidiFile::parse ──► header + track chunks
                                   │
                                   ▼
                          decode_track (per chunk) ──► Track { raw events }
                                   │
                                   ▼
                          postprocess ──► PlayableTrack { notes with durations }
```

# Example
```rust
# use midiroll::prelude::*;
let bytes: &[u8] = &[
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0,
    b'M', b'T', b'r', b'k', 0, 0, 0, 20,
    0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 120 bpm
    0x00, 0x90, 60, 64,                       // note on
    0x83, 0x60, 0x80, 60, 0,                  // note off, 480 ticks later
    0x00, 0xFF, 0x2F, 0x00,
];

let file = MidiFile::parse(bytes).unwrap();
assert_eq!(file.header().ticks_per_second(), 960.);

let track = file.tracks()[0].playable();
let PlayableEvent::Note(note) = &track.music()[1] else {
    panic!("expected a note");
};
assert_eq!(note.piano_key(), 40);
assert_eq!(note.duration(), 480);
```
"#]
#![no_std]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod error;
pub use error::*;

pub mod file;
pub mod message;
pub mod playback;
pub mod reader;
pub mod vlq;

mod micros;
pub use micros::*;

mod note;
pub use note::*;

/// Commonly used types
pub mod prelude {
    pub use crate::{
        FileError, Micros, Note, SmpteError, TrackError, UMicros, VlqError,
        file::*,
        message::*,
        playback::*,
        reader::{DecodeError, DecodeErrorKind, DecodeResult},
    };
}
