use midiroll::prelude::*;
use pretty_assertions::assert_eq;

fn midi_file(division: u16, tracks: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&1u16.to_be_bytes());
    bytes.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    for track in tracks {
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(track.len() as u32).to_be_bytes());
        bytes.extend_from_slice(track);
    }
    bytes
}

/// Notes struck one after another, `(gap before the note, duration)` in ticks
fn melody(note: u8, spans: &[(u8, u8)]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for &(gap, duration) in spans {
        bytes.extend_from_slice(&[gap, 0x90, note, 80, duration, 0x80, note, 0]);
    }
    bytes.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);
    bytes
}

#[test]
fn seek_keeps_tracks_in_step() {
    // starts at 0, 24, 48, 72, 96
    let right_hand = melody(72, &[(0, 24), (0, 24), (0, 24), (0, 24), (0, 24)]);
    // starts at 10, 60
    let left_hand = melody(48, &[(10, 40), (10, 40)]);
    let bytes = midi_file(48, &[left_hand, right_hand]);

    let file = MidiFile::parse(&bytes).unwrap();
    let aligned = file.align_at(3);

    assert_eq!(
        aligned,
        [
            Some(Alignment {
                start_index: 1,
                offset: 12
            }),
            Some(Alignment {
                start_index: 3,
                offset: 0
            }),
        ]
    );

    // 48 ticks per quarter note at 120 bpm is 96 ticks per second
    let left = aligned[0].unwrap();
    assert_eq!(left.offset_millis(file.header()), 125.);
    assert_eq!(left.offset_micros(file.header()), Micros::new(125_000));
}

#[test]
fn every_target_maps_to_the_latest_earlier_event() {
    let bytes = midi_file(96, &[melody(60, &[(5, 10), (20, 10), (0, 30)])]);
    let file = MidiFile::parse(&bytes).unwrap();
    // starts at 5, 35, 45
    let track = file.tracks()[0].playable();

    for target in 0..80u64 {
        let found = search_for_corresponding_start_index(track, target).unwrap();
        let start = track.music()[found.start_index].start_time();
        assert_eq!(found.offset, target as i64 - start as i64);

        if target >= 5 {
            assert!(start <= target);
            if let Some(next) = track.music().get(found.start_index + 1) {
                assert!(next.start_time() > target);
            }
        } else {
            assert_eq!(found.start_index, 0);
            assert!(found.offset < 0);
        }
    }
}
