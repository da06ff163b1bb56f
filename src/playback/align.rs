use crate::{Micros, file::Header, playback::PlayableTrack};
use alloc::vec::Vec;

/// Where to resume a track so that it lines up with a target time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alignment {
    /// Index into [`PlayableTrack::music`]
    pub start_index: usize,
    /// `target - music[start_index].start_time()`, in ticks.
    ///
    /// Negative when every event of the track starts after the target.
    pub offset: i64,
}

impl Alignment {
    /// The offset as a signed duration
    pub fn offset_micros(&self, header: &Header) -> Micros {
        Micros::from_ticks(self.offset, header.ticks_per_second())
    }

    /// The offset in milliseconds, `1000 * offset / ticks_per_second`
    pub fn offset_millis(&self, header: &Header) -> f64 {
        1000. * self.offset as f64 / header.ticks_per_second()
    }
}

#[doc = r#"
Find the last event of `track` that starts at or before `target`.

Returns `None` for an empty track.

# Example
```rust
# use midiroll::prelude::*;
let raw = decode_track(&[
    0x00, 0x90, 60, 64, 0x0A, 0x80, 60, 0, // 0..10
    0x0A, 0x90, 62, 64, 0x0A, 0x80, 62, 0, // 20..30
]).unwrap();
let track = postprocess(&raw, OverlapPolicy::Queue).track;

let found = search_for_corresponding_start_index(&track, 25).unwrap();
assert_eq!(found, Alignment { start_index: 1, offset: 5 });
```
"#]
pub fn search_for_corresponding_start_index(
    track: &PlayableTrack,
    target: u64,
) -> Option<Alignment> {
    let music = track.music();
    if music.is_empty() {
        return None;
    }

    let after = music.partition_point(|event| event.start_time() <= target);
    let start_index = after.saturating_sub(1);
    let start_time = music[start_index].start_time();

    Some(Alignment {
        start_index,
        offset: target as i64 - start_time as i64,
    })
}

/// Align every track to event `k` of the track with the most events.
///
/// Returns one entry per track, or all `None` if there is no event `k`.
pub fn align_tracks<'a>(
    tracks: impl IntoIterator<Item = &'a PlayableTrack>,
    k: usize,
) -> Vec<Option<Alignment>> {
    let tracks: Vec<&PlayableTrack> = tracks.into_iter().collect();

    // first of the longest on ties
    let target = tracks
        .iter()
        .rev()
        .max_by_key(|track| track.len())
        .and_then(|longest| longest.music().get(k))
        .map(|event| event.start_time());

    let Some(target) = target else {
        return tracks.iter().map(|_| None).collect();
    };

    tracks
        .iter()
        .map(|track| search_for_corresponding_start_index(track, target))
        .collect()
}

#[cfg(test)]
fn track_with_notes(spans: &[(u8, u32, u32)]) -> PlayableTrack {
    use crate::{file::decode_track, playback::{OverlapPolicy, postprocess}};

    // (note, gap before the note on, duration), one note at a time
    let mut bytes = alloc::vec![];
    for &(note, gap, duration) in spans {
        assert!(gap < 0x80 && duration < 0x80);
        bytes.extend([gap as u8, 0x90, note, 64, duration as u8, 0x80, note, 0]);
    }
    postprocess(&decode_track(&bytes).unwrap(), OverlapPolicy::Queue).track
}

#[test]
fn finds_greatest_start_not_after_target() {
    // starts at 0, 15, 40
    let track = track_with_notes(&[(60, 0, 10), (61, 5, 10), (62, 15, 5)]);

    assert_eq!(
        search_for_corresponding_start_index(&track, 15),
        Some(Alignment {
            start_index: 1,
            offset: 0
        })
    );
    assert_eq!(
        search_for_corresponding_start_index(&track, 39),
        Some(Alignment {
            start_index: 1,
            offset: 24
        })
    );
    assert_eq!(
        search_for_corresponding_start_index(&track, 100),
        Some(Alignment {
            start_index: 2,
            offset: 60
        })
    );
}

#[test]
fn target_before_first_event() {
    let track = track_with_notes(&[(60, 20, 10)]);
    assert_eq!(
        search_for_corresponding_start_index(&track, 5),
        Some(Alignment {
            start_index: 0,
            offset: -15
        })
    );
    assert_eq!(
        search_for_corresponding_start_index(&PlayableTrack::default(), 5),
        None
    );
}

#[test]
fn aligns_to_the_busiest_track() {
    // starts at 0, 10, 20, 30
    let busy = track_with_notes(&[(60, 0, 5), (61, 5, 5), (62, 5, 5), (63, 5, 5)]);
    // starts at 3, 25
    let sparse = track_with_notes(&[(48, 3, 10), (50, 12, 10)]);

    let aligned = align_tracks([&sparse, &busy], 2);
    assert_eq!(
        aligned,
        [
            Some(Alignment {
                start_index: 0,
                offset: 17
            }),
            Some(Alignment {
                start_index: 2,
                offset: 0
            }),
        ]
    );

    assert_eq!(align_tracks(&[sparse, busy], 9), [None, None]);
    assert!(align_tracks(&[] as &[PlayableTrack], 0).is_empty());
}
