use midiroll::prelude::*;
use pretty_assertions::assert_eq;

/// Wrap track bodies in a header and `MTrk` chunks
fn midi_file(format: u16, division: [u8; 2], tracks: &[&[u8]]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&(tracks.len() as u16).to_be_bytes());
    bytes.extend_from_slice(&division);

    for track in tracks {
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&(track.len() as u32).to_be_bytes());
        bytes.extend_from_slice(track);
    }
    bytes
}

const TEMPO_120: [u8; 7] = [0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20];
const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

fn track(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

#[test]
fn single_note_at_120_bpm() {
    let body = track(&[
        &TEMPO_120,
        &[0x00, 0x90, 60, 64],
        &[0x83, 0x60, 0x80, 60, 0x40],
        &END_OF_TRACK,
    ]);
    let bytes = midi_file(0, 480u16.to_be_bytes(), &[&body]);
    let file = MidiFile::parse(&bytes).unwrap();

    assert_eq!(file.header().format(), FormatType::SingleMultiChannel);
    assert_eq!(file.header().ticks_per_second(), 960.);
    assert_eq!(file.header().tempo(), Tempo::new(500_000));
    assert_eq!(file.tracks().len(), 1);

    let decoded = &file.tracks()[0];
    assert!(decoded.raw().ended());
    assert_eq!(decoded.metadata().byte_offset, 22);
    assert_eq!(decoded.metadata().byte_length, body.len());

    let notes: Vec<_> = decoded.playable().notes().collect();
    assert_eq!(notes.len(), 1);
    let note = notes[0];
    assert_eq!(note.piano_key(), 40);
    assert_eq!(note.velocity(), 64);
    assert_eq!(note.start_time(), 0);
    assert_eq!(note.duration(), 480);
    assert_eq!(file.header().ticks_to_millis(note.duration()), 500.);

    // the tempo change passes through ahead of the note
    assert!(matches!(
        decoded.playable().music()[0],
        PlayableEvent::Passthrough {
            start_time: 0,
            kind: MessageKind::Meta(MetaEvent::Tempo(_))
        }
    ));
    assert_eq!(decoded.stats().notes, 1);
    assert_eq!(decoded.stats().passthrough, 1);
}

#[test]
fn rejects_missing_signature() {
    let mut bytes = midi_file(0, [0x00, 0x60], &[&END_OF_TRACK]);
    bytes[..4].copy_from_slice(b"RIFF");

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &DecodeErrorKind::InvalidFile(FileError::BadSignature)
    );
    assert_eq!(err.position(), 0);
}

#[test]
fn rejects_track_count_mismatch() {
    let mut bytes = midi_file(1, [0x00, 0x60], &[&END_OF_TRACK, &END_OF_TRACK]);
    // claim three tracks
    bytes[11] = 3;

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &DecodeErrorKind::InvalidFile(FileError::TrackCountMismatch {
            declared: 3,
            found: 2
        })
    );
}

#[test]
fn rejects_invalid_format() {
    let bytes = midi_file(7, [0x00, 0x60], &[&END_OF_TRACK]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_invalid_file());
    assert_eq!(
        err.error_kind(),
        &DecodeErrorKind::InvalidFile(FileError::InvalidFormat(7))
    );
}

#[test]
fn rejects_zero_division() {
    let bytes = midi_file(0, [0x00, 0x00], &[&END_OF_TRACK]);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &DecodeErrorKind::InvalidFile(FileError::ZeroDivision)
    );
}

#[test]
fn rejects_chunk_overrun() {
    let mut bytes = midi_file(0, [0x00, 0x60], &[&END_OF_TRACK]);
    // claim one byte more than the file holds
    bytes[21] = END_OF_TRACK.len() as u8 + 1;

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &DecodeErrorKind::InvalidFile(FileError::ChunkOverrun {
            offset: 14,
            length: 5
        })
    );
}

#[test]
fn unterminated_sysex_corrupts_the_file() {
    let good = track(&[&[0x00, 0x90, 60, 64, 0x10, 0x80, 60, 0], &END_OF_TRACK]);
    let bad = track(&[&[0x00, 0xF0, 0x05, 0x7E, 0x7F, 0x09, 0x01]]);
    let bytes = midi_file(1, [0x00, 0x60], &[&good, &bad]);

    let err = MidiFile::parse(&bytes).unwrap_err();
    assert!(err.is_malformed_sysex());
    assert_eq!(
        err.error_kind(),
        &DecodeErrorKind::MalformedSysEx {
            track: 1,
            source: TrackError::UnterminatedSysEx { offset: 1 }
        }
    );
}

#[test]
fn enforces_the_size_limit() {
    let body = track(&[&[0x00, 0x90, 60, 64, 0x10, 0x80, 60, 0], &END_OF_TRACK]);
    let bytes = midi_file(0, [0x00, 0x60], &[&body]);

    let strict = DecodeOptions::new().with_max_file_size(Some(16));
    let err = MidiFile::parse_with(&bytes, &strict).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &DecodeErrorKind::FileTooLarge {
            size: bytes.len(),
            limit: 16
        }
    );

    let unlimited = DecodeOptions::new().with_max_file_size(None);
    assert!(MidiFile::parse_with(&bytes, &unlimited).is_ok());
}

#[test]
fn running_status_across_the_file() {
    let body = track(&[
        &[0x00, 0x92, 60, 100],
        &[0x00, 64, 100],
        &[0x60, 60, 0],
        &[0x00, 64, 0],
        &END_OF_TRACK,
    ]);
    let bytes = midi_file(0, [0x00, 0x60], &[&body]);
    let file = MidiFile::parse(&bytes).unwrap();
    let playable = file.tracks()[0].playable();

    let notes: Vec<_> = playable
        .notes()
        .map(|note| (note.channel(), note.midi_note(), note.duration()))
        .collect();
    assert_eq!(
        notes,
        [(Channel::Three, 60, 0x60), (Channel::Three, 64, 0x60)]
    );
    assert_eq!(playable.end_time(), Some(0x60));
}

#[test]
fn falls_back_to_the_default_tempo() {
    let body = track(&[&[0x00, 0x90, 60, 64, 0x10, 0x80, 60, 0], &END_OF_TRACK]);
    let bytes = midi_file(0, [0x00, 0x60], &[&body]);

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.header().tempo(), None);
    // 96 ticks per quarter note at 120 bpm
    assert_eq!(file.header().ticks_per_second(), 192.);

    let slow = DecodeOptions::new().with_default_tempo(Tempo::new(1_000_000).unwrap());
    let file = MidiFile::parse_with(&bytes, &slow).unwrap();
    assert_eq!(file.header().ticks_per_second(), 96.);
}

#[test]
fn tempo_comes_from_any_track() {
    let conductor = track(&[&[0x00, 0xFF, 0x51, 0x03, 0x03, 0xD0, 0x90], &END_OF_TRACK]);
    let music = track(&[&[0x00, 0x90, 60, 64, 0x10, 0x80, 60, 0], &END_OF_TRACK]);
    let bytes = midi_file(1, 480u16.to_be_bytes(), &[&music, &conductor]);

    let file = MidiFile::parse(&bytes).unwrap();
    // 250000 us per quarter note
    assert_eq!(file.header().ticks_per_second(), 1920.);
}

#[test]
fn smpte_division_sets_the_tick_rate() {
    let body = track(&[&TEMPO_120, &END_OF_TRACK]);
    // -25 fps, 40 ticks per frame
    let bytes = midi_file(0, [0xE7, 40], &[&body]);

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.header().timing_mode(), TimingMode::FramesPerSecond);
    assert_eq!(file.header().ticks_per_second(), 1000.);
    let Timing::Smpte(smpte) = file.header().timing() else {
        panic!("expected SMPTE timing");
    };
    assert_eq!(smpte.fps(), Some(SmpteFps::TwentyFive));
}

#[test]
fn unknown_meta_is_kept_and_decoding_continues() {
    let body = track(&[
        &[0x00, 0xFF, 0x60, 0x02, 0xAB, 0xCD],
        &[0x00, 0x90, 60, 64, 0x10, 0x80, 60, 0],
        &END_OF_TRACK,
    ]);
    let bytes = midi_file(0, [0x00, 0x60], &[&body]);
    let file = MidiFile::parse(&bytes).unwrap();
    let raw = file.tracks()[0].raw();

    assert_eq!(
        raw.meta_events().next(),
        Some((
            0,
            &MetaEvent::Opaque {
                subtype: 0x60,
                data: vec![0xAB, 0xCD]
            }
        ))
    );
    assert_eq!(file.tracks()[0].stats().notes, 1);
}

#[test]
fn meta_delta_counts_toward_time() {
    let body = track(&[
        &[0x81, 0x00, 0xFF, 0x06, 0x01, b'X'], // marker at 128
        &[0x10, 0x90, 60, 64],                   // note on at 144
        &[0x10, 0x80, 60, 0],
        &END_OF_TRACK,
    ]);
    let bytes = midi_file(0, [0x00, 0x60], &[&body]);
    let file = MidiFile::parse(&bytes).unwrap();
    let playable = file.tracks()[0].playable();

    assert_eq!(playable.start_time(), 128);
    let note = playable.notes().next().unwrap();
    assert_eq!((note.start_time(), note.duration()), (144, 16));
}

#[test]
fn unknown_chunks_are_skipped() {
    let body = track(&[&[0x00, 0x90, 60, 64, 0x10, 0x80, 60, 0], &END_OF_TRACK]);
    let mut bytes = midi_file(0, [0x00, 0x60], &[]);
    bytes[11] = 1;
    bytes.extend_from_slice(b"XFIH");
    bytes.extend_from_slice(&3u32.to_be_bytes());
    bytes.extend_from_slice(&[1, 2, 3]);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&body);

    let file = MidiFile::parse(&bytes).unwrap();
    assert_eq!(file.tracks().len(), 1);
    assert_eq!(file.tracks()[0].metadata().byte_offset, 14 + 11 + 8);
}

#[test]
fn overlap_policy_is_configurable() {
    let body = track(&[
        &[0x00, 0x90, 60, 100],
        &[0x10, 0x90, 60, 50],
        &[0x10, 0x80, 60, 0],
        &[0x10, 0x80, 60, 0],
        &END_OF_TRACK,
    ]);
    let bytes = midi_file(0, [0x00, 0x60], &[&body]);

    let queued = MidiFile::parse(&bytes).unwrap();
    assert_eq!(queued.tracks()[0].stats().notes, 2);

    let overwrite = DecodeOptions::new().with_overlap_policy(OverlapPolicy::Overwrite);
    let overwritten = MidiFile::parse_with(&bytes, &overwrite).unwrap();
    let stats = overwritten.tracks()[0].stats();
    assert_eq!(stats.notes, 1);
    assert_eq!(stats.overwritten_notes, 1);
    assert_eq!(stats.spurious_note_offs, 1);
}

#[test]
fn note_after_a_delta_starting_with_ff() {
    let body = track(&[
        &[0xFF, 0xFF, 0x7F, 0x90, 60, 64],
        &[0x10, 0x80, 60, 0],
        &END_OF_TRACK,
    ]);
    let bytes = midi_file(0, [0x00, 0x60], &[&body]);
    let file = MidiFile::parse(&bytes).unwrap();

    let decoded = &file.tracks()[0];
    assert!(decoded.raw().ended());
    assert_eq!(decoded.raw().skipped_bytes(), 0);
    let notes: Vec<_> = decoded
        .playable()
        .notes()
        .map(|note| (note.start_time(), note.duration()))
        .collect();
    assert_eq!(notes, [(2_097_151, 16)]);
}
