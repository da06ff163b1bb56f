use core::ops::{Add, Sub};

/// A signed span of playback time, such as an alignment offset
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Micros(i64);

impl Micros {
    /// No offset
    pub const ZERO: Self = Self(0);

    /// Wrap a microsecond count
    pub const fn new(micros: i64) -> Self {
        Self(micros)
    }

    /// Convert a signed tick count at `ticks_per_second`
    pub fn from_ticks(ticks: i64, ticks_per_second: f64) -> Self {
        Self((ticks as f64 * 1_000_000. / ticks_per_second) as i64)
    }

    /// The raw count
    pub const fn us(&self) -> i64 {
        self.0
    }

    /// In milliseconds
    pub const fn as_millis_f64(&self) -> f64 {
        self.0 as f64 / 1_000.
    }
}

/// A point on the playback timeline, counted from the start of the file
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UMicros(u64);

impl UMicros {
    /// The start of the file
    pub const ZERO: Self = Self(0);

    /// Wrap a microsecond count
    #[inline]
    pub const fn new(micros: u64) -> Self {
        Self(micros)
    }

    /// Convert a tick count at `ticks_per_second`
    pub fn from_ticks(ticks: u64, ticks_per_second: f64) -> Self {
        Self((ticks as f64 * 1_000_000. / ticks_per_second) as u64)
    }

    /// The raw count
    #[inline]
    pub const fn us(&self) -> u64 {
        self.0
    }

    /// In milliseconds
    pub const fn as_millis_f64(&self) -> f64 {
        self.0 as f64 / 1_000.
    }

    /// In seconds
    pub const fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.
    }
}

/// Shift a position by an offset, stopping at the start of the file
impl Add<Micros> for UMicros {
    type Output = UMicros;
    fn add(self, rhs: Micros) -> Self::Output {
        UMicros(self.0.saturating_add_signed(rhs.0))
    }
}

/// The offset from `rhs` to `self`
impl Sub for UMicros {
    type Output = Micros;
    fn sub(self, rhs: Self) -> Self::Output {
        Micros(self.0 as i64 - rhs.0 as i64)
    }
}

#[test]
fn ticks_to_time() {
    assert_eq!(UMicros::from_ticks(960, 960.), UMicros::new(1_000_000));
    assert_eq!(UMicros::from_ticks(480, 960.).as_millis_f64(), 500.);
    assert_eq!(Micros::from_ticks(-240, 960.), Micros::new(-250_000));
    // one tick at 96 ticks per second
    assert_eq!(UMicros::from_ticks(1, 96.), UMicros::new(10_416));
}

#[test]
fn shifting_positions() {
    let position = UMicros::new(10);
    assert_eq!(position + Micros::new(5), UMicros::new(15));
    assert_eq!(position + Micros::new(-25), UMicros::ZERO);
    assert_eq!(position - UMicros::new(25), Micros::new(-15));
}
