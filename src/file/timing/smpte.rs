#![doc = r#"
SMPTE (Society of Motion Picture and Television Engineers) time code support

MIDI files may count time in one of two ways:

1. **Musical Time** - ticks per quarter note, so seconds depend on the tempo
2. **Absolute Time** - ticks per SMPTE frame, so seconds are fixed

The MIDI specification names four frame rates, but the division field can
hold any negative 7-bit value. Non-standard rates are accepted and used at
face value.
"#]

/// The standard SMPTE frame rates
///
/// - 24 fps: Standard film rate
/// - 25 fps: PAL/SECAM television standard
/// - 29.97 fps: NTSC color television (drop-frame timecode)
/// - 30 fps: NTSC black & white, some digital video formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// 24 frames per second
    TwentyFour,
    /// 25 frames per second
    TwentyFive,
    /// 29.97 frames per second (30000/1001), drop-frame
    TwentyNine,
    /// 30 frames per second
    Thirty,
}

impl SmpteFps {
    /// The nominal frame rate as written in the division field
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine => 29,
            Self::Thirty => 30,
        }
    }

    /// The actual frame rate, including the fractional drop-frame rate
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }
}

/// The precise value for NTSC drop-frame rate: 29.97002997... fps
const DROP_FRAME: f64 = 30_000. / 1001.;

/// A representation of the `smpte` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteHeader {
    pub(crate) frames_per_second: u8,
    pub(crate) ticks_per_frame: u8,
}

impl SmpteHeader {
    /// Returns the magnitude of the frame rate field
    pub const fn frames_per_second(&self) -> u8 {
        self.frames_per_second
    }

    /// Returns the standard frame rate, if the field names one
    pub const fn fps(&self) -> Option<SmpteFps> {
        match self.frames_per_second {
            24 => Some(SmpteFps::TwentyFour),
            25 => Some(SmpteFps::TwentyFive),
            29 => Some(SmpteFps::TwentyNine),
            30 => Some(SmpteFps::Thirty),
            _ => None,
        }
    }

    /// Returns the ticks per frame
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }

    /// `frames_per_second * ticks_per_frame`
    pub const fn ticks_per_second(&self) -> u32 {
        self.frames_per_second as u32 * self.ticks_per_frame as u32
    }
}
