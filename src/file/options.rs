use crate::{file::Tempo, playback::OverlapPolicy};

#[doc = r#"
Knobs for [`MidiFile::parse_with`](crate::file::MidiFile::parse_with).

# Example
```rust
# use midiroll::prelude::*;
let options = DecodeOptions::new()
    .with_max_file_size(None)
    .with_overlap_policy(OverlapPolicy::Overwrite);
assert_eq!(options.max_file_size(), None);
assert_eq!(options.default_tempo(), Tempo::DEFAULT);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodeOptions {
    max_file_size: Option<usize>,
    default_tempo: Tempo,
    overlap: OverlapPolicy,
}

impl DecodeOptions {
    /// 5 MiB
    pub const DEFAULT_MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

    /// The defaults: a 5 MiB limit, 120 bpm when no tempo is set, queued overlaps
    pub const fn new() -> Self {
        Self {
            max_file_size: Some(Self::DEFAULT_MAX_FILE_SIZE),
            default_tempo: Tempo::DEFAULT,
            overlap: OverlapPolicy::Queue,
        }
    }

    /// Reject buffers larger than `limit` bytes. `None` accepts any size.
    pub const fn with_max_file_size(mut self, limit: Option<usize>) -> Self {
        self.max_file_size = limit;
        self
    }

    /// The tempo to assume when no track sets one
    pub const fn with_default_tempo(mut self, tempo: Tempo) -> Self {
        self.default_tempo = tempo;
        self
    }

    /// How repeated strikes of a held key are paired
    pub const fn with_overlap_policy(mut self, overlap: OverlapPolicy) -> Self {
        self.overlap = overlap;
        self
    }

    /// Largest accepted buffer
    pub const fn max_file_size(&self) -> Option<usize> {
        self.max_file_size
    }

    /// Fallback tempo
    pub const fn default_tempo(&self) -> Tempo {
        self.default_tempo
    }

    /// Overlap policy used by the postprocessor
    pub const fn overlap_policy(&self) -> OverlapPolicy {
        self.overlap
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}
