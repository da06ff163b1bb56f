use crate::{
    FileError, UMicros,
    file::{FormatType, Tempo, Timing, TimingMode},
    reader::{DecodeError, DecodeResult, HEADER_MAGIC, Reader, is_valid_signature},
};

#[doc = r#"
The decoded `MThd` chunk, plus the tick rate derived once the tracks are read.

Created once by [`MidiFile::parse`](crate::file::MidiFile::parse) and never
changed afterwards.
"#]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    format: FormatType,
    track_count: u16,
    division: i16,
    timing: Timing,
    tempo: Option<Tempo>,
    ticks_per_second: f64,
}

impl Header {
    /// `MThd`, length, format, track count, division
    pub const MIN_SIZE: usize = 14;

    const FIELDS_LEN: u32 = 6;

    /// Read the header chunk from the start of the file.
    ///
    /// The tick rate is not known yet; see [`Header::with_tempo`].
    pub(crate) fn read(reader: &mut Reader<'_>) -> DecodeResult<Self> {
        let bytes = reader.bytes();
        if !is_valid_signature(bytes) {
            return Err(DecodeError::invalid_file(0, FileError::BadSignature));
        }
        if bytes.len() < Self::MIN_SIZE {
            return Err(DecodeError::invalid_file(
                bytes.len(),
                FileError::Truncated {
                    needed: Self::MIN_SIZE,
                    available: bytes.len(),
                },
            ));
        }

        let magic = reader.read_magic()?;
        debug_assert_eq!(magic, HEADER_MAGIC);

        let length = reader.read_u32()?;
        if length < Self::FIELDS_LEN {
            return Err(DecodeError::invalid_file(
                reader.buffer_position(),
                FileError::Truncated {
                    needed: Self::FIELDS_LEN as usize,
                    available: length as usize,
                },
            ));
        }

        let format_position = reader.buffer_position();
        let raw_format = reader.read_u16()?;
        let format = FormatType::try_from(raw_format).map_err(|_| {
            DecodeError::invalid_file(format_position, FileError::InvalidFormat(raw_format))
        })?;
        let track_count = reader.read_u16()?;
        let division = reader.read_i16()?;

        // some writers append extra header fields
        reader.skip((length - Self::FIELDS_LEN) as usize);

        let timing = Timing::from_division(division);
        if timing.is_zero() {
            return Err(DecodeError::invalid_file(
                format_position + 4,
                FileError::ZeroDivision,
            ));
        }

        Ok(Self {
            format,
            track_count,
            division,
            timing,
            tempo: None,
            ticks_per_second: 0.,
        })
    }

    /// Derive the tick rate.
    ///
    /// SMPTE timing fixes the rate on its own. Otherwise the rate comes from
    /// `tempo`, or from `fallback` when the file never sets one.
    pub(crate) fn with_tempo(mut self, tempo: Option<Tempo>, fallback: Tempo) -> Self {
        self.tempo = tempo;
        self.ticks_per_second = match self.timing {
            Timing::Smpte(smpte) => f64::from(smpte.ticks_per_second()),
            Timing::TicksPerQuarterNote(tpqn) => {
                let tempo = tempo.unwrap_or_else(|| {
                    log::warn!(
                        "No tempo event found, assuming {} bpm",
                        fallback.beats_per_minute()
                    );
                    fallback
                });
                tempo.ticks_per_second(tpqn)
            }
        };
        self
    }

    /// The file format
    pub const fn format(&self) -> FormatType {
        self.format
    }

    /// The number of tracks the header declares
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }

    /// The raw division field
    pub const fn division(&self) -> i16 {
        self.division
    }

    /// The decoded division field
    pub const fn timing(&self) -> Timing {
        self.timing
    }

    /// Whether ticks count quarter notes or SMPTE frames
    pub const fn timing_mode(&self) -> TimingMode {
        self.timing.mode()
    }

    /// The tempo the tick rate was derived from, if the file set one
    pub const fn tempo(&self) -> Option<Tempo> {
        self.tempo
    }

    /// Ticks per second of playback
    pub const fn ticks_per_second(&self) -> f64 {
        self.ticks_per_second
    }

    /// `1000 * ticks / ticks_per_second`
    pub fn ticks_to_millis(&self, ticks: u64) -> f64 {
        1000. * ticks as f64 / self.ticks_per_second
    }

    /// A tick count as a position on the playback timeline
    pub fn ticks_to_micros(&self, ticks: u64) -> UMicros {
        UMicros::from_ticks(ticks, self.ticks_per_second)
    }
}

#[cfg(test)]
fn header_bytes(format: u16, tracks: u16, division: i16) -> alloc::vec::Vec<u8> {
    let mut bytes = alloc::vec::Vec::new();
    bytes.extend_from_slice(&HEADER_MAGIC);
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&format.to_be_bytes());
    bytes.extend_from_slice(&tracks.to_be_bytes());
    bytes.extend_from_slice(&division.to_be_bytes());
    bytes
}

#[test]
fn reads_header_fields() {
    let bytes = header_bytes(1, 3, 96);
    let header = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap();

    assert_eq!(header.format(), FormatType::Simultaneous);
    assert_eq!(header.track_count(), 3);
    assert_eq!(header.timing(), Timing::TicksPerQuarterNote(96));
    assert_eq!(header.timing_mode(), TimingMode::TicksPerQuarterNote);
}

#[test]
fn rejects_bad_format_and_signature() {
    let bytes = header_bytes(3, 1, 96);
    let err = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap_err();
    assert_eq!(
        err.error_kind(),
        &crate::reader::DecodeErrorKind::InvalidFile(FileError::InvalidFormat(3))
    );
    assert_eq!(err.position(), 8);

    let bytes = b"RIFF\x00\x00\x00\x06\x00\x00\x00\x01\x00\x60";
    let err = Header::read(&mut Reader::from_byte_slice(bytes)).unwrap_err();
    assert!(err.is_invalid_file());

    let bytes = &header_bytes(0, 1, 96)[..12];
    let err = Header::read(&mut Reader::from_byte_slice(bytes)).unwrap_err();
    assert!(err.is_invalid_file());
}

#[test]
fn tick_rate_from_tempo_or_smpte() {
    let bytes = header_bytes(0, 1, 480);
    let header = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    let fast = header.with_tempo(Tempo::new(250_000), Tempo::DEFAULT);
    assert_eq!(fast.ticks_per_second(), 1920.);
    assert_eq!(fast.ticks_to_millis(960), 500.);

    let fallback = header.with_tempo(None, Tempo::DEFAULT);
    assert_eq!(fallback.ticks_per_second(), 960.);
    assert_eq!(fallback.tempo(), None);

    let bytes = header_bytes(0, 1, i16::from_be_bytes([0xE2, 80]));
    let header = Header::read(&mut Reader::from_byte_slice(&bytes)).unwrap();
    // tempo is ignored with SMPTE timing
    let smpte = header.with_tempo(Tempo::new(250_000), Tempo::DEFAULT);
    assert_eq!(smpte.ticks_per_second(), 2400.);
}
