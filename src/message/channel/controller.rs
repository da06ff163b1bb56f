use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
What a control change number means, for the controllers a piano player cares
about. Any other number is still carried by [`Controller`], it just has no
function attached.

# Example
```rust
# use midiroll::prelude::*;
let pedal = Controller::new(64);
assert_eq!(pedal.function(), Some(ControlFunction::DamperPedal));
assert!(pedal.is_pedal());

assert_eq!(Controller::new(20).function(), None);
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ControlFunction {
    /// 0
    BankSelect = 0,
    /// 1
    ModulationWheel = 1,
    /// 7
    ChannelVolume = 7,
    /// 10
    Pan = 10,
    /// 11
    Expression = 11,
    /// 64, sustain
    DamperPedal = 64,
    /// 65
    Portamento = 65,
    /// 66
    Sostenuto = 66,
    /// 67, una corda
    SoftPedal = 67,
    /// 68
    LegatoFootswitch = 68,
    /// 121
    ResetAllControllers = 121,
    /// 122
    LocalControl = 122,
    /// 123
    AllNotesOff = 123,
    /// 124, also ends all notes
    OmniModeOff = 124,
    /// 125, also ends all notes
    OmniModeOn = 125,
    /// 126, also ends all notes
    MonoModeOn = 126,
    /// 127, also ends all notes
    PolyModeOn = 127,
}

impl ControlFunction {
    /// Channel mode messages (120-127) silence every sounding note
    pub const fn ends_all_notes(&self) -> bool {
        matches!(
            self,
            Self::AllNotesOff
                | Self::OmniModeOff
                | Self::OmniModeOn
                | Self::MonoModeOn
                | Self::PolyModeOn
        )
    }
}

/// The controller number of a control change message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Controller(u8);

impl Controller {
    /// Wrap a controller number. The high bit is ignored.
    pub const fn new(number: u8) -> Self {
        Self(number & 0x7F)
    }

    /// The raw controller number, `0..=127`
    pub const fn number(&self) -> u8 {
        self.0
    }

    /// The function of this controller, if it is one we know about
    pub fn function(&self) -> Option<ControlFunction> {
        ControlFunction::try_from(self.0).ok()
    }

    /// True for the damper, sostenuto and soft pedals
    pub fn is_pedal(&self) -> bool {
        matches!(
            self.function(),
            Some(ControlFunction::DamperPedal | ControlFunction::Sostenuto | ControlFunction::SoftPedal)
        )
    }
}

#[test]
fn mode_messages_end_all_notes() {
    assert!(Controller::new(123).function().unwrap().ends_all_notes());
    assert!(Controller::new(127).function().unwrap().ends_all_notes());
    assert!(!Controller::new(121).function().unwrap().ends_all_notes());
}
