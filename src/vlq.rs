#![doc = r#"
Variable-length quantities

Delta-times (and a few length fields) in a MIDI file are stored as
variable-length quantities: seven bits of value per byte, most significant
group first, with the high bit of every byte but the last set.

```text
value        bytes
0x00000000   00
0x00000080   81 00
0x00002000   C0 00
0x001FFFFF   FF FF 7F
0x0FFFFFFF   FF FF FF 7F
```

At most four bytes are allowed, so the largest value is `0x0FFFFFFF`.
"#]

use crate::VlqError;

/// The maximum number of bytes in a variable-length quantity.
pub const MAX_LEN: usize = 4;

/// The largest value representable as a variable-length quantity.
pub const MAX_VALUE: u32 = 0x0FFF_FFFF;

/// Decode a complete variable-length quantity.
///
/// Each byte contributes its low seven bits. The first byte is read before
/// any shifting happens, so a single byte decodes to itself.
///
/// # Example
/// ```rust
/// # use midiroll::vlq;
/// assert_eq!(vlq::decode(&[0x00]), Ok(0));
/// assert_eq!(vlq::decode(&[0x81, 0x00]), Ok(128));
/// assert_eq!(vlq::decode(&[0xFF, 0xFF, 0xFF, 0x7F]), Ok(0x0FFF_FFFF));
/// ```
pub fn decode(bytes: &[u8]) -> Result<u32, VlqError> {
    if bytes.is_empty() {
        return Err(VlqError::Empty);
    }
    if bytes.len() > MAX_LEN {
        return Err(VlqError::TooLong(bytes.len()));
    }

    Ok(bytes
        .iter()
        .fold(0u32, |acc, byte| (acc << 7) | u32::from(byte & 0x7F)))
}

/// Read a variable-length quantity from the front of `bytes`.
///
/// Returns the value and the number of bytes it occupied.
pub fn read(bytes: &[u8]) -> Result<(u32, usize), VlqError> {
    let Some(end) = bytes.iter().position(|byte| byte & 0x80 == 0) else {
        if bytes.is_empty() {
            return Err(VlqError::Empty);
        }
        return Err(if bytes.len() >= MAX_LEN {
            VlqError::TooLong(bytes.len())
        } else {
            VlqError::Unterminated
        });
    };

    let len = end + 1;
    decode(&bytes[..len]).map(|value| (value, len))
}

/// Returns true if this byte ends a variable-length quantity.
#[inline]
pub const fn is_terminator(byte: u8) -> bool {
    byte & 0x80 == 0
}

#[test]
fn decode_spec_values() {
    assert_eq!(decode(&[0x00]), Ok(0));
    assert_eq!(decode(&[0x40]), Ok(0x40));
    assert_eq!(decode(&[0x7F]), Ok(0x7F));
    assert_eq!(decode(&[0x81, 0x00]), Ok(128));
    assert_eq!(decode(&[0xC0, 0x00]), Ok(8192));
    assert_eq!(decode(&[0xFF, 0xFF, 0x7F]), Ok(2_097_151));
    assert_eq!(decode(&[0xC0, 0x80, 0x80, 0x00]), Ok(134_217_728));
    assert_eq!(decode(&[0xFF, 0xFF, 0xFF, 0x7F]), Ok(MAX_VALUE));
}

#[test]
fn decode_rejects_bad_lengths() {
    assert_eq!(decode(&[]), Err(VlqError::Empty));
    assert_eq!(
        decode(&[0x81, 0x80, 0x80, 0x80, 0x00]),
        Err(VlqError::TooLong(5))
    );
}

#[test]
fn read_stops_at_terminator() {
    assert_eq!(read(&[0x83, 0x60, 0x90, 0x3C]), Ok((480, 2)));
    assert_eq!(read(&[0x05, 0x01]), Ok((5, 1)));
    assert_eq!(read(&[0x81, 0x81]), Err(VlqError::Unterminated));
    assert_eq!(read(&[]), Err(VlqError::Empty));
    assert_eq!(
        read(&[0x81, 0x81, 0x81, 0x81, 0x00]),
        Err(VlqError::TooLong(5))
    );
}
