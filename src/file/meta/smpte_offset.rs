#![doc = r#"
The `FF 54` meta event: when, in SMPTE time, a track should begin.

```text
FF 54 05 hr mn se fr ff
         0rrhhhhh       rr = frame rate, hhhhh = hours
```
"#]

use crate::{SmpteError, UMicros, file::SmpteFps};

/// Track start position as `hour:minute:second:frame.subframe`
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// frame rate the frame fields count in
    pub fps: SmpteFps,
    /// `0..=23`
    pub hour: u8,
    /// `0..=59`
    pub minute: u8,
    /// `0..=59`
    pub second: u8,
    /// frame within the second
    pub frame: u8,
    /// hundredths of a frame, `0..=99`
    pub subframe: u8,
}

impl SmpteOffset {
    const RATES: [SmpteFps; 4] = [
        SmpteFps::TwentyFour,
        SmpteFps::TwentyFive,
        SmpteFps::TwentyNine,
        SmpteFps::Thirty,
    ];

    /// Decode the five byte payload
    pub fn parse(data: &[u8]) -> Result<Self, SmpteError> {
        let &[rate_hour, minute, second, frame, subframe] = data else {
            return Err(SmpteError::Length(data.len()));
        };

        let rate = rate_hour >> 5;
        let fps = *Self::RATES
            .get(usize::from(rate))
            .ok_or(SmpteError::TrackFrame(rate))?;
        let hour = rate_hour & 0x1F;

        match () {
            _ if hour > 23 => Err(SmpteError::HourOffset(hour)),
            _ if minute > 59 => Err(SmpteError::MinuteOffset(minute)),
            _ if second > 59 => Err(SmpteError::SecondOffset(second)),
            _ if subframe > 99 => Err(SmpteError::Subframe(subframe)),
            _ => Ok(Self {
                fps,
                hour,
                minute,
                second,
                frame,
                subframe,
            }),
        }
    }

    /// Where the track starts on the playback timeline
    pub fn as_micros(&self) -> UMicros {
        let seconds =
            u64::from(self.hour) * 3600 + u64::from(self.minute) * 60 + u64::from(self.second);
        let frames = f64::from(self.frame) + f64::from(self.subframe) / 100.;
        UMicros::new(seconds * 1_000_000 + (frames * 1_000_000. / self.fps.as_f64()) as u64)
    }
}

#[test]
fn decodes_drop_frame_offset() {
    use pretty_assertions::assert_eq;

    assert_eq!(
        SmpteOffset::parse(&[0x41, 23, 45, 12, 34]),
        Ok(SmpteOffset {
            fps: SmpteFps::TwentyNine,
            hour: 1,
            minute: 23,
            second: 45,
            frame: 12,
            subframe: 34,
        })
    );
}

#[test]
fn rejects_out_of_range_fields() {
    assert_eq!(
        SmpteOffset::parse(&[0x1F, 0, 0, 0, 0]),
        Err(SmpteError::HourOffset(31))
    );
    assert_eq!(
        SmpteOffset::parse(&[0x01, 80, 0, 0, 0]),
        Err(SmpteError::MinuteOffset(80))
    );
    assert_eq!(
        SmpteOffset::parse(&[0x01, 0, 0, 0, 100]),
        Err(SmpteError::Subframe(100))
    );
    assert_eq!(
        SmpteOffset::parse(&[0x81, 0, 0, 0, 0]),
        Err(SmpteError::TrackFrame(4))
    );
    assert_eq!(SmpteOffset::parse(&[0x41]), Err(SmpteError::Length(1)));
}

#[test]
fn offset_on_the_timeline() {
    // 25 fps, 00:00:01 frame 5
    let offset = SmpteOffset::parse(&[0x20, 0, 1, 5, 0]).unwrap();
    assert_eq!(offset.as_micros(), UMicros::new(1_200_000));
}
