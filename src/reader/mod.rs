#![doc = r#"
Byte-stream utilities for reading the MIDI container.

All multi-byte integers in a MIDI file are big-endian. Chunks are identified
by a four byte ASCII magic string followed by a 32-bit length:

```text
"MThd" 00 00 00 06 <format: u16> <tracks: u16> <division: i16>
"MTrk" <length: u32> <length bytes of events>
```
"#]

mod error;
pub use error::*;

/// Magic string that starts every MIDI file
pub const HEADER_MAGIC: [u8; 4] = *b"MThd";

/// Magic string that starts every track chunk
pub const TRACK_MAGIC: [u8; 4] = *b"MTrk";

/// Returns true if the buffer begins with the `MThd` signature.
///
/// # Example
/// ```rust
/// # use midiroll::reader::is_valid_signature;
/// assert!(is_valid_signature(b"MThd\x00\x00\x00\x06"));
/// assert!(!is_valid_signature(b"RIFF"));
/// assert!(!is_valid_signature(b"MT"));
/// ```
pub fn is_valid_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(&HEADER_MAGIC)
}

/// Reads the four byte magic string at `offset`.
///
/// Returns `None` if fewer than four bytes remain.
pub fn read_magic_string(bytes: &[u8], offset: usize) -> Option<[u8; 4]> {
    bytes
        .get(offset..offset.checked_add(4)?)
        .and_then(|slice| slice.try_into().ok())
}

/// The kind of chunk named by a magic string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// `MThd`
    Header,
    /// `MTrk`
    Track,
    /// Anything else. These chunks are skipped.
    Unknown([u8; 4]),
}

impl ChunkKind {
    /// Identify a chunk from its magic string
    pub const fn from_magic(magic: [u8; 4]) -> Self {
        match &magic {
            b"MThd" => Self::Header,
            b"MTrk" => Self::Track,
            _ => Self::Unknown(magic),
        }
    }
}

#[doc = r#"
A cursor over a byte slice.

Every read advances the position. Failed reads leave the position untouched
and report it in the [`DecodeError`].
"#]
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader positioned at the start of `bytes`
    pub const fn from_byte_slice(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// The whole buffer, regardless of position
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The current offset into the buffer
    pub const fn buffer_position(&self) -> usize {
        self.position
    }

    /// Bytes left to read
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// True if nothing is left to read
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read `len` bytes
    pub fn read_slice(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        let end = self
            .position
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(DecodeError::oob(self.position))?;
        let slice = &self.bytes[self.position..end];
        self.position = end;
        Ok(slice)
    }

    /// Read an array of `N` bytes
    pub fn read_exact_size<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let position = self.position;
        self.read_slice(N)?
            .try_into()
            .map_err(|_| DecodeError::oob(position))
    }

    /// Read a chunk's magic string
    pub fn read_magic(&mut self) -> DecodeResult<[u8; 4]> {
        self.read_exact_size()
    }

    /// Read a big-endian `u16`
    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Read a big-endian `i16`
    pub fn read_i16(&mut self) -> DecodeResult<i16> {
        self.read_exact_size().map(i16::from_be_bytes)
    }

    /// Read a big-endian `u32`
    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Move forward `len` bytes, stopping at the end of the buffer
    pub fn skip(&mut self, len: usize) {
        self.position = self.position.saturating_add(len).min(self.bytes.len());
    }
}

#[test]
fn reads_big_endian_fields() {
    let bytes = [0x00, 0x01, 0xE7, 0x28, 0x00, 0x00, 0x01, 0x00];
    let mut reader = Reader::from_byte_slice(&bytes);

    assert_eq!(reader.read_u16().unwrap(), 1);
    assert_eq!(reader.read_i16().unwrap(), -6360);
    assert_eq!(reader.read_u32().unwrap(), 256);
    assert!(reader.is_empty());

    let err = reader.read_u16().unwrap_err();
    assert_eq!(err.position(), 8);
    assert!(matches!(err.error_kind(), DecodeErrorKind::OutOfBounds));
}

#[test]
fn identifies_chunks() {
    let bytes = b"xxMTrkMThdJUNK";
    assert_eq!(read_magic_string(bytes, 2), Some(TRACK_MAGIC));
    assert_eq!(
        read_magic_string(bytes, 2).map(ChunkKind::from_magic),
        Some(ChunkKind::Track)
    );
    assert_eq!(
        read_magic_string(bytes, 6).map(ChunkKind::from_magic),
        Some(ChunkKind::Header)
    );
    assert_eq!(
        read_magic_string(bytes, 10).map(ChunkKind::from_magic),
        Some(ChunkKind::Unknown(*b"JUNK"))
    );
    assert_eq!(read_magic_string(bytes, 11), None);
}
