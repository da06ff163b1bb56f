use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The format code of a MIDI file, from the header chunk.

```text
0  one track holding every channel
1  several tracks played together
2  several independent single-track patterns
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

impl FormatType {
    /// The numeric format code
    pub fn code(self) -> u16 {
        self.into()
    }
}

#[test]
fn only_three_formats() {
    assert_eq!(FormatType::try_from(1u16).ok(), Some(FormatType::Simultaneous));
    assert!(FormatType::try_from(3u16).is_err());
    assert_eq!(FormatType::SequentiallyIndependent.code(), 2);
}
