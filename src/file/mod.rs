#![doc = r#"
Rusty representation of a [`MidiFile`]

A file is a header chunk followed by chunks of track data:

```text
MThd <6> <format> <tracks> <division>
MTrk <length> <events...>
MTrk <length> <events...>
```

[`MidiFile::parse`] reads the header, decodes every `MTrk` chunk, derives the
tick rate from the first tempo event and pairs the notes of every track.
"#]

mod format;
pub use format::*;

mod header;
pub use header::*;

mod meta;
pub use meta::*;

mod options;
pub use options::*;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

use crate::{
    FileError,
    playback::{Alignment, PlayableTrack, Playback, PostprocessStats, align_tracks, postprocess},
    reader::{ChunkKind, DecodeError, DecodeErrorKind, DecodeResult, Reader},
};
use alloc::vec::Vec;

/// Check the tracks found against what the header declared.
pub fn validate_container(header: &Header, found_tracks: usize) -> Result<(), FileError> {
    if usize::from(header.track_count()) != found_tracks {
        return Err(FileError::TrackCountMismatch {
            declared: header.track_count(),
            found: found_tracks,
        });
    }
    Ok(())
}

/// A track in both of its forms
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTrack {
    raw: Track,
    playable: PlayableTrack,
    stats: PostprocessStats,
}

impl DecodedTrack {
    /// The events as they appear in the chunk
    pub const fn raw(&self) -> &Track {
        &self.raw
    }

    /// Paired notes and pass-through events, sorted by start time
    pub const fn playable(&self) -> &PlayableTrack {
        &self.playable
    }

    /// Counts from pairing the notes
    pub const fn stats(&self) -> PostprocessStats {
        self.stats
    }

    /// Where the track sits in the file
    pub const fn metadata(&self) -> TrackMetadata {
        self.raw.metadata()
    }
}

#[doc = r#"
A decoded Standard MIDI File.

# Example
```rust
# use midiroll::prelude::*;
let err = MidiFile::parse(b"RIFF....WAVE").unwrap_err();
assert!(err.is_invalid_file());
```
"#]
#[derive(Debug, Clone, PartialEq)]
pub struct MidiFile {
    header: Header,
    tracks: Vec<DecodedTrack>,
}

impl MidiFile {
    /// Parse a set of bytes with the default [`DecodeOptions`]
    pub fn parse(bytes: &[u8]) -> DecodeResult<Self> {
        Self::parse_with(bytes, &DecodeOptions::default())
    }

    /// Parse a set of bytes
    pub fn parse_with(bytes: &[u8], options: &DecodeOptions) -> DecodeResult<Self> {
        if let Some(limit) = options.max_file_size() {
            if bytes.len() > limit {
                return Err(DecodeError::new(
                    0,
                    DecodeErrorKind::FileTooLarge {
                        size: bytes.len(),
                        limit,
                    },
                ));
            }
        }

        let mut reader = Reader::from_byte_slice(bytes);
        let header = Header::read(&mut reader)?;
        log::trace!(
            "Header: {:?}, {} tracks, {:?}",
            header.format(),
            header.track_count(),
            header.timing()
        );

        let raw_tracks = read_tracks(&mut reader)?;
        validate_container(&header, raw_tracks.len())
            .map_err(|e| DecodeError::invalid_file(reader.buffer_position(), e))?;

        let tempo = raw_tracks.iter().find_map(Track::first_tempo);
        let header = header.with_tempo(tempo, options.default_tempo());

        let tracks = raw_tracks
            .into_iter()
            .map(|raw| {
                let Playback { track, stats } = postprocess(&raw, options.overlap_policy());
                DecodedTrack {
                    raw,
                    playable: track,
                    stats,
                }
            })
            .collect();

        Ok(Self { header, tracks })
    }

    /// Returns header info
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the tracks in file order
    pub fn tracks(&self) -> &[DecodedTrack] {
        &self.tracks
    }

    /// Iterate over the playable form of every track
    pub fn playable_tracks(&self) -> impl Iterator<Item = &PlayableTrack> {
        self.tracks.iter().map(DecodedTrack::playable)
    }

    /// Align every track to event `k` of the busiest track.
    ///
    /// See [`align_tracks`].
    pub fn align_at(&self, k: usize) -> Vec<Option<Alignment>> {
        align_tracks(self.playable_tracks(), k)
    }
}

fn read_tracks(reader: &mut Reader<'_>) -> DecodeResult<Vec<Track>> {
    let mut tracks = Vec::new();

    while !reader.is_empty() {
        let chunk_start = reader.buffer_position();
        if reader.remaining() < 8 {
            log::debug!(
                "Ignoring {} trailing bytes at {chunk_start}",
                reader.remaining()
            );
            break;
        }
        let magic = reader.read_magic()?;
        let length = reader.read_u32()?;
        let data_start = reader.buffer_position();
        let data = reader.read_slice(length as usize).map_err(|_| {
            DecodeError::invalid_file(
                chunk_start,
                FileError::ChunkOverrun {
                    offset: chunk_start,
                    length,
                },
            )
        })?;

        match ChunkKind::from_magic(magic) {
            ChunkKind::Track => {
                let index = tracks.len();
                let track = decode_track(data).map_err(|source| {
                    DecodeError::new(
                        data_start,
                        DecodeErrorKind::MalformedSysEx {
                            track: index,
                            source,
                        },
                    )
                })?;
                log::trace!(
                    "Track {index}: {} events from {length} bytes",
                    track.events().len()
                );
                tracks.push(track.at_offset(data_start));
            }
            ChunkKind::Header | ChunkKind::Unknown(_) => {
                log::debug!("Skipping {length} byte chunk {magic:?} at {chunk_start}");
            }
        }
    }

    Ok(tracks)
}
