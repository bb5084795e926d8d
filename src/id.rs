//! Identity type for pipeline stages.
//!
//! A `StageId` is a newtype over `u32` that serves as a direct array index
//! into the pipeline's stage arena, providing O(1) lookup.

use std::fmt;

/// Index into the pipeline's stage arena.
///
/// Slot 0 is always the pipeline itself acting as the source adapter.
/// The terminal stage lives outside the arena and is addressed by the
/// `TERMINAL` sentinel when it appears as an event origin.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StageId(pub u32);

impl StageId {
    /// The pipeline's own slot, acting as the source adapter.
    pub const SOURCE: StageId = StageId(0);

    /// Sentinel for the terminal stage, which is stored outside the arena.
    pub const TERMINAL: StageId = StageId(u32::MAX);

    #[inline]
    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::TERMINAL {
            write!(f, "StageId(TERMINAL)")
        } else {
            write!(f, "StageId({})", self.0)
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
