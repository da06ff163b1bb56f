use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
System common and system realtime messages, keyed by the low nibble of a
`0xF_` status byte.

`0xF0` (system exclusive) and `0xF7` (end of exclusive) are framing bytes
rather than fixed-size messages; the track decoder handles them separately.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SystemStatus {
    /// `0xF0`, variable length, terminated by `0xF7`
    SystemExclusive = 0x0,
    /// `0xF1`
    TimeCodeQuarterFrame = 0x1,
    /// `0xF2`
    SongPositionPointer = 0x2,
    /// `0xF3`
    SongSelect = 0x3,
    /// `0xF4`, reserved
    Undefined4 = 0x4,
    /// `0xF5`, reserved
    Undefined5 = 0x5,
    /// `0xF6`
    TuneRequest = 0x6,
    /// `0xF7`
    EndOfExclusive = 0x7,
    /// `0xF8`
    TimingClock = 0x8,
    /// `0xF9`, reserved
    Undefined9 = 0x9,
    /// `0xFA`
    Start = 0xA,
    /// `0xFB`
    Continue = 0xB,
    /// `0xFC`
    Stop = 0xC,
    /// `0xFD`, reserved
    UndefinedD = 0xD,
    /// `0xFE`
    ActiveSensing = 0xE,
    /// `0xFF`. In a file this byte introduces a meta event instead.
    Reset = 0xF,
}

impl SystemStatus {
    /// Look up a system status byte (`0xF0..=0xFF`)
    pub fn from_status_byte(status: u8) -> Option<Self> {
        if status & 0xF0 != 0xF0 {
            return None;
        }
        Self::try_from(status & 0x0F).ok()
    }

    /// Data bytes following the status byte, for the fixed-size messages
    pub const fn data_byte_count(&self) -> usize {
        match self {
            Self::TimeCodeQuarterFrame | Self::SongSelect => 1,
            Self::SongPositionPointer => 2,
            _ => 0,
        }
    }

    /// Realtime messages (`0xF8..=0xFF`) may appear anywhere and leave
    /// running status alone
    pub fn is_realtime(&self) -> bool {
        u8::from(*self) >= 0x8
    }

    /// The full status byte
    pub fn status_byte(self) -> u8 {
        0xF0 | u8::from(self)
    }
}

/// A decoded system common or realtime message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemMessage {
    status: SystemStatus,
    data: [u8; 2],
}

impl SystemMessage {
    pub(crate) fn new(status: SystemStatus, data: &[u8]) -> Self {
        let mut buf = [0; 2];
        for (slot, byte) in buf.iter_mut().zip(data) {
            *slot = *byte;
        }
        Self { status, data: buf }
    }

    /// The kind of message
    pub const fn status(&self) -> SystemStatus {
        self.status
    }

    /// The data bytes, as many as [`SystemStatus::data_byte_count`]
    pub fn data(&self) -> &[u8] {
        &self.data[..self.status.data_byte_count()]
    }

    /// The 14-bit song position, for [`SystemStatus::SongPositionPointer`]
    pub fn song_position(&self) -> Option<u16> {
        (self.status == SystemStatus::SongPositionPointer)
            .then(|| u16::from(self.data[0]) | (u16::from(self.data[1]) << 7))
    }
}

#[test]
fn system_table() {
    assert_eq!(
        SystemStatus::from_status_byte(0xF2).map(|s| s.data_byte_count()),
        Some(2)
    );
    assert_eq!(
        SystemStatus::from_status_byte(0xF3).map(|s| s.data_byte_count()),
        Some(1)
    );
    assert_eq!(
        SystemStatus::from_status_byte(0xF8).map(|s| s.data_byte_count()),
        Some(0)
    );
    assert_eq!(SystemStatus::from_status_byte(0x90), None);
    assert_eq!(SystemStatus::EndOfExclusive.status_byte(), 0xF7);

    let spp = SystemMessage::new(SystemStatus::SongPositionPointer, &[0x10, 0x01]);
    assert_eq!(spp.song_position(), Some(0x90));
}
