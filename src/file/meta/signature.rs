/// A `FF 58 04 nn dd cc bb` time signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per bar
    pub numerator: u8,
    /// Power of two of the beat unit, `2` means a quarter note
    pub denominator_exponent: u8,
    /// MIDI clocks in a metronome click
    pub clocks_per_metronome_tick: u8,
    /// Notated 32nd notes in a MIDI quarter note (24 clocks)
    pub thirty_seconds_per_quarter_note: u8,
}

impl TimeSignature {
    /// Decode the four byte payload
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let &[numerator, denominator_exponent, clocks, thirty_seconds] = data else {
            return None;
        };
        // the denominator must fit a u32
        if denominator_exponent > 31 {
            return None;
        }
        Some(Self {
            numerator,
            denominator_exponent,
            clocks_per_metronome_tick: clocks,
            thirty_seconds_per_quarter_note: thirty_seconds,
        })
    }

    /// The beat unit, e.g. `4` for 3/4
    pub const fn denominator(&self) -> u32 {
        1 << self.denominator_exponent
    }
}

/// A `FF 59 02 sf mi` key signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    /// Negative for flats, positive for sharps, `-7..=7`
    pub sharps_flats: i8,
    /// Minor key if true
    pub minor: bool,
}

impl KeySignature {
    /// Decode the two byte payload
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let &[sf, mi] = data else {
            return None;
        };
        let sharps_flats = sf as i8;
        if !(-7..=7).contains(&sharps_flats) || mi > 1 {
            return None;
        }
        Some(Self {
            sharps_flats,
            minor: mi == 1,
        })
    }
}

#[test]
fn three_four_time() {
    let sig = TimeSignature::from_bytes(&[3, 2, 24, 8]).unwrap();
    assert_eq!(sig.numerator, 3);
    assert_eq!(sig.denominator(), 4);
    assert_eq!(sig.clocks_per_metronome_tick, 24);
    assert_eq!(sig.thirty_seconds_per_quarter_note, 8);
    assert!(TimeSignature::from_bytes(&[3, 2, 24]).is_none());
}

#[test]
fn key_signatures() {
    assert_eq!(
        KeySignature::from_bytes(&[0xFD, 1]),
        Some(KeySignature {
            sharps_flats: -3,
            minor: true
        })
    );
    assert_eq!(KeySignature::from_bytes(&[8, 0]), None);
    assert_eq!(KeySignature::from_bytes(&[0, 2]), None);
}
