/// Microseconds per quarter note, from a `FF 51 03 tt tt tt` event.
///
/// # Example
/// ```rust
/// # use midiroll::prelude::*;
/// let tempo = Tempo::from_bytes(&[0x07, 0xA1, 0x20]).unwrap();
/// assert_eq!(tempo.micros_per_quarter_note(), 500_000);
/// assert_eq!(tempo.beats_per_minute(), 120.);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Tempo {
    /// The tempo a file has until told otherwise: 120 beats per minute
    pub const DEFAULT: Self = Self(500_000);

    const MICROS_PER_MINUTE: f64 = 60_000_000.;

    /// Create a tempo. Returns `None` for zero, which has no meaning.
    pub const fn new(micros_per_quarter_note: u32) -> Option<Self> {
        if micros_per_quarter_note == 0 {
            return None;
        }
        Some(Self(micros_per_quarter_note))
    }

    /// Decode the three byte big-endian payload
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let &[a, b, c] = data else {
            return None;
        };
        Self::new(u32::from_be_bytes([0, a, b, c]))
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Quarter notes per minute
    pub fn beats_per_minute(&self) -> f64 {
        Self::MICROS_PER_MINUTE / f64::from(self.0)
    }

    /// Ticks per second for a file counting `ticks_per_quarter_note`
    pub fn ticks_per_second(&self, ticks_per_quarter_note: u16) -> f64 {
        f64::from(ticks_per_quarter_note) * 1_000_000. / f64::from(self.0)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[test]
fn tempo_rejects_wrong_payloads() {
    assert_eq!(Tempo::from_bytes(&[0, 0, 0]), None);
    assert_eq!(Tempo::from_bytes(&[0x07, 0xA1]), None);
    assert_eq!(Tempo::from_bytes(&[0x07, 0xA1, 0x20, 0x00]), None);
}

#[test]
fn tempo_tick_rate() {
    let tempo = Tempo::from_bytes(&[0x0F, 0x42, 0x40]).unwrap();
    assert_eq!(tempo.micros_per_quarter_note(), 1_000_000);
    assert_eq!(tempo.beats_per_minute(), 60.);
    assert_eq!(tempo.ticks_per_second(96), 96.);
    assert_eq!(Tempo::DEFAULT.ticks_per_second(480), 960.);
}
