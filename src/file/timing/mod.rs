mod smpte;
pub use smpte::*;

#[doc = r#"
How delta-times in the file are to be read, decoded from the header's
division field.

```text
bit 15 = 0   0ttttttt tttttttt   ticks per quarter note (1-32767)
bit 15 = 1   1fffffff tttttttt   -frames per second (as i8), ticks per frame
```

# Example
```rust
# use midiroll::prelude::*;
let metrical = Timing::from_division(480);
assert_eq!(metrical.ticks_per_quarter_note(), Some(480));

// 0xE728: -25 frames per second, 40 ticks per frame
let smpte = Timing::from_division(0xE728u16 as i16);
assert_eq!(smpte.mode(), TimingMode::FramesPerSecond);
assert_eq!(smpte.smpte_ticks_per_second(), Some(1000));
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// The midi file's delta times are defined using a tick rate per quarter note
    TicksPerQuarterNote(u16),

    /// The midi file's delta times are defined using SMPTE frames
    Smpte(SmpteHeader),
}

/// The two ways a division field can be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimingMode {
    /// Ticks are a fraction of a quarter note; seconds depend on the tempo
    TicksPerQuarterNote,
    /// Ticks are a fraction of an SMPTE frame; seconds are fixed
    FramesPerSecond,
}

impl Timing {
    /// Decode the raw division field of the header
    pub const fn from_division(division: i16) -> Self {
        let [high, low] = division.to_be_bytes();
        if high & 0x80 == 0 {
            return Self::TicksPerQuarterNote((division as u16) & 0x7FFF);
        }
        // bits 15-8 hold the frame rate as a negative 8-bit number
        let frames_per_second = (high as i8).unsigned_abs();
        Self::Smpte(SmpteHeader {
            frames_per_second,
            ticks_per_frame: low,
        })
    }

    /// Which of the two encodings is in use
    pub const fn mode(&self) -> TimingMode {
        match self {
            Self::TicksPerQuarterNote(_) => TimingMode::TicksPerQuarterNote,
            Self::Smpte(_) => TimingMode::FramesPerSecond,
        }
    }

    /// Returns Some if the midi timing is defined
    /// as ticks per quarter note
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(*t),
            _ => None,
        }
    }

    /// Returns Some if the timing is SMPTE based.
    ///
    /// The tick rate is `frames_per_second * ticks_per_frame`.
    pub const fn smpte_ticks_per_second(&self) -> Option<u32> {
        match self {
            Self::Smpte(s) => Some(s.ticks_per_second()),
            _ => None,
        }
    }

    /// True if no tick rate can be derived from this division
    pub const fn is_zero(&self) -> bool {
        match self {
            Self::TicksPerQuarterNote(t) => *t == 0,
            Self::Smpte(s) => s.ticks_per_second() == 0,
        }
    }
}

#[test]
fn metrical_division() {
    assert_eq!(
        Timing::from_division(96),
        Timing::TicksPerQuarterNote(96)
    );
    assert_eq!(Timing::from_division(0x7FFF).ticks_per_quarter_note(), Some(0x7FFF));
    assert!(Timing::from_division(0).is_zero());
}

#[test]
fn smpte_division_is_sign_extended() {
    for (high, fps) in [(0xE8u8, 24u8), (0xE7, 25), (0xE3, 29), (0xE2, 30)] {
        let division = i16::from_be_bytes([high, 4]);
        let Timing::Smpte(smpte) = Timing::from_division(division) else {
            panic!("expected smpte timing for {high:#X}");
        };
        assert_eq!(smpte.frames_per_second(), fps);
        assert_eq!(smpte.ticks_per_frame(), 4);
        assert_eq!(smpte.ticks_per_second(), u32::from(fps) * 4);
    }
}
