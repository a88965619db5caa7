//! Two-word generator state

use std::fmt;

/// Word 0 of the demonstration state
pub const DEMO_STATE0: u64 = 0x1234_5678_8765_4321;

/// Word 1 of the demonstration state
pub const DEMO_STATE1: u64 = 0x0000_0000_FFFF_FFFF;

/// Opaque seed material of a two-word generator.
///
/// Any bit pattern is valid for either word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeneratorState {
    pub state0: u64,
    pub state1: u64,
}

impl GeneratorState {
    pub const fn new(state0: u64, state1: u64) -> Self {
        Self { state0, state1 }
    }

    /// The fixed state every demonstration run starts from
    pub const fn demo() -> Self {
        Self::new(DEMO_STATE0, DEMO_STATE1)
    }

    /// Words reinterpreted as signed 64-bit integers (the structured form)
    pub const fn signed_words(&self) -> (i64, i64) {
        (self.state0 as i64, self.state1 as i64)
    }
}

impl Default for GeneratorState {
    fn default() -> Self {
        Self::demo()
    }
}

impl fmt::Display for GeneratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (s0, s1) = self.signed_words();
        write!(f, "{}, {}", s0, s1)
    }
}
