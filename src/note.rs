use core::fmt;

#[doc = r#"
Identifies the key of a note message.

The MIDI note number is a 7-bit value. `0` is `C(-1)`, `60` is middle C and
`127` is `G9`. A standard 88-key piano covers notes `21` (A0) to `108` (C8);
[`Note::piano_key`] numbers those keys 1 to 88.

# Example
```rust
# use midiroll::prelude::*;
let middle_c = Note::from_byte(60);

assert_eq!(middle_c.piano_key(), 40);
assert_eq!(middle_c.to_string(), "C4");
assert!(middle_c.is_on_piano());
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note(u8);

impl Note {
    /// Offset between a MIDI note number and a piano key number
    pub const PIANO_KEY_OFFSET: i16 = 20;

    /// Create a note from a data byte. The high bit is ignored.
    pub const fn from_byte(byte: u8) -> Self {
        Self(byte & 0x7F)
    }

    /// The MIDI note number, `0..=127`
    #[inline]
    pub const fn midi_note(&self) -> u8 {
        self.0
    }

    /// The piano key number, `midi_note - 20`.
    ///
    /// Notes below A0 give zero or a negative number.
    #[inline]
    pub const fn piano_key(&self) -> i16 {
        self.0 as i16 - Self::PIANO_KEY_OFFSET
    }

    /// True if the note is one of the 88 keys of a piano
    pub const fn is_on_piano(&self) -> bool {
        let key = self.piano_key();
        key >= 1 && key <= 88
    }

    /// The note name with its octave, e.g. `C4` for middle C
    fn name(&self) -> (&'static str, i8) {
        const NAMES: [&str; 12] = [
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];
        (NAMES[usize::from(self.0 % 12)], (self.0 / 12) as i8 - 1)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, octave) = self.name();
        write!(f, "{name}{octave}")
    }
}

#[test]
fn piano_key_numbers() {
    assert_eq!(Note::from_byte(21).piano_key(), 1);
    assert_eq!(Note::from_byte(108).piano_key(), 88);
    assert_eq!(Note::from_byte(0).piano_key(), -20);
    assert!(!Note::from_byte(109).is_on_piano());
    assert!(!Note::from_byte(20).is_on_piano());
}

#[test]
fn display_note() {
    use alloc::string::ToString;
    assert_eq!(Note::from_byte(60).to_string(), "C4");
    assert_eq!(Note::from_byte(61).to_string(), "C#4");
    assert_eq!(Note::from_byte(0).to_string(), "C-1");
    assert_eq!(Note::from_byte(127).to_string(), "G9");
}
