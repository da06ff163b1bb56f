use thiserror::Error;

/// Errors produced while decoding a variable-length quantity.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VlqError {
    /// No bytes were provided
    #[error("Variable-length quantity is empty")]
    Empty,
    /// More than four bytes, which cannot encode a value up to `0x0FFFFFFF`
    #[error("Variable-length quantity is {0} bytes long (at most 4 are allowed)")]
    TooLong(usize),
    /// The bytes ran out before a byte with a clear high bit was found
    #[error("Variable-length quantity is not terminated")]
    Unterminated,
}

/// Errors that invalidate the file container as a whole.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FileError {
    /// The file does not begin with `MThd`
    #[error("Not a valid MIDI file: missing MThd signature")]
    BadSignature,
    /// The header chunk is shorter than the fixed header fields
    #[error("Not a valid MIDI file: header needs {needed} bytes, found {available}")]
    Truncated {
        /// bytes required
        needed: usize,
        /// bytes present
        available: usize,
    },
    /// Format code outside of 0, 1, 2
    #[error("Invalid header format {0}, must be 0, 1 or 2")]
    InvalidFormat(u16),
    /// The header declares a different number of tracks than were found
    #[error("Header declared {declared} tracks but found {found}")]
    TrackCountMismatch {
        /// track count from the header
        declared: u16,
        /// `MTrk` chunks actually present
        found: usize,
    },
    /// A chunk claims more bytes than the file holds
    #[error("Chunk at {offset} declares {length} bytes, past the end of the file")]
    ChunkOverrun {
        /// byte offset of the chunk's magic string
        offset: usize,
        /// declared length
        length: u32,
    },
    /// The division field resolves to zero ticks
    #[error("Header division resolves to zero ticks")]
    ZeroDivision,
}

/// Hard failures within a single track chunk.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TrackError {
    /// A System Exclusive message was never closed with `0xF7`
    #[error("System exclusive message at {offset} has no end-of-exclusive byte")]
    UnterminatedSysEx {
        /// offset of the `0xF0` status within the track data
        offset: usize,
    },
}

/// Errors for SMPTE offset payloads.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SmpteError {
    /// Payload must be five bytes
    #[error("SMPTE offset needs 5 bytes, got {0}")]
    Length(usize),
    /// Frame rate bits out of range
    #[error("Invalid SMPTE frame type {0}")]
    TrackFrame(u8),
    /// Hour above 23
    #[error("Invalid SMPTE hour offset {0}")]
    HourOffset(u8),
    /// Minute above 59
    #[error("Invalid SMPTE minute offset {0}")]
    MinuteOffset(u8),
    /// Second above 59
    #[error("Invalid SMPTE second offset {0}")]
    SecondOffset(u8),
    /// Subframe above 99
    #[error("Invalid SMPTE subframe {0}")]
    Subframe(u8),
}
