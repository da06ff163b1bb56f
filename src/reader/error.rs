use crate::{FileError, TrackError};
use thiserror::Error;

#[doc = r#"
The error returned when a MIDI file cannot be decoded.

Only container-level problems, oversized input and unterminated system
exclusive messages end up here. Everything else the decoder meets is skipped
or preserved and decoding carries on.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Decoding at position {position}, {kind}")]
pub struct DecodeError {
    position: usize,
    pub(crate) kind: DecodeErrorKind,
}

/// A kind of error that decoding a file can produce
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The container is malformed
    #[error("{0}")]
    InvalidFile(#[from] FileError),
    /// A track holds a system exclusive message that is never terminated.
    ///
    /// The file is corrupted; no tracks are returned.
    #[error("File is corrupted, track {track}: {source}")]
    MalformedSysEx {
        /// index of the track chunk
        track: usize,
        /// the track failure
        source: TrackError,
    },
    /// The buffer is larger than the configured limit
    #[error("File is {size} bytes, larger than the limit of {limit} bytes")]
    FileTooLarge {
        /// size of the buffer
        size: usize,
        /// configured limit
        limit: usize,
    },
    /// Reading out of bounds.
    #[error("Read out of bounds!")]
    OutOfBounds,
}

impl DecodeError {
    /// Create a decode error from a position and kind
    pub const fn new(position: usize, kind: DecodeErrorKind) -> Self {
        Self { position, kind }
    }

    /// Create a new invalid file error
    pub const fn invalid_file(position: usize, error: FileError) -> Self {
        Self {
            position,
            kind: DecodeErrorKind::InvalidFile(error),
        }
    }

    /// Create a new out of bounds error
    pub const fn oob(position: usize) -> Self {
        Self {
            position,
            kind: DecodeErrorKind::OutOfBounds,
        }
    }

    /// True if the container itself was rejected
    pub const fn is_invalid_file(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::InvalidFile(_))
    }

    /// True if a track held an unterminated system exclusive message
    pub const fn is_malformed_sysex(&self) -> bool {
        matches!(self.kind, DecodeErrorKind::MalformedSysEx { .. })
    }

    /// Returns the error kind.
    pub fn error_kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Returns the position in the file where the error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The decode result type (see [`DecodeError`])
pub type DecodeResult<T> = Result<T, DecodeError>;
