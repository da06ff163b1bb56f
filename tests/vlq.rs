use midiroll::vlq;

/// Big-endian groups of seven bits, high bit set on all but the last
fn encode(mut value: u32) -> Vec<u8> {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    bytes.reverse();
    bytes
}

#[test]
fn known_encodings() {
    let cases: &[(&[u8], u32)] = &[
        (&[0x00], 0),
        (&[0x40], 0x40),
        (&[0x7F], 0x7F),
        (&[0x81, 0x00], 128),
        (&[0xC0, 0x00], 8192),
        (&[0xFF, 0x7F], 0x3FFF),
        (&[0xFF, 0xFF, 0x7F], 2_097_151),
        (&[0xC0, 0x80, 0x80, 0x00], 134_217_728),
        (&[0xFF, 0xFF, 0xFF, 0x7F], 268_435_455),
    ];

    for (bytes, value) in cases {
        assert_eq!(vlq::decode(bytes), Ok(*value), "decoding {bytes:02X?}");
        assert_eq!(encode(*value), *bytes);
    }
}

#[test]
fn boundaries_round_trip() {
    for value in [
        0,
        0x7F,
        0x80,
        0x3FFF,
        0x4000,
        0x1F_FFFF,
        0x20_0000,
        vlq::MAX_VALUE,
    ] {
        let bytes = encode(value);
        assert_eq!(vlq::decode(&bytes), Ok(value));
        assert_eq!(vlq::read(&bytes), Ok((value, bytes.len())));
    }
}
