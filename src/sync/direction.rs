use std::fmt;

use super::pane::PaneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Cheat code to disassembly.
    SourceToDerived,
    /// Disassembly back to cheat code.
    DerivedToSource,
}

impl Direction {
    pub fn from_source(pane: PaneId) -> Self {
        match pane {
            PaneId::Source => Direction::SourceToDerived,
            PaneId::Derived => Direction::DerivedToSource,
        }
    }

    pub fn source(self) -> PaneId {
        match self {
            Direction::SourceToDerived => PaneId::Source,
            Direction::DerivedToSource => PaneId::Derived,
        }
    }

    pub fn target(self) -> PaneId {
        self.source().other()
    }

    pub fn index(self) -> usize {
        self.source().index()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::SourceToDerived => write!(f, "asm -> dism"),
            Direction::DerivedToSource => write!(f, "dism -> asm"),
        }
    }
}

/// Remembers which pane the user last edited.
///
/// That pane is authoritative: the next translation reads from it and writes
/// into the other one.
#[derive(Debug, Clone, Copy)]
pub struct FocusTracker {
    active: Direction,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self {
            active: Direction::SourceToDerived,
        }
    }

    pub fn record_activity(&mut self, pane: PaneId) {
        self.active = Direction::from_source(pane);
    }

    pub fn active_direction(&self) -> Direction {
        self.active
    }

    pub fn active_pane(&self) -> PaneId {
        self.active.source()
    }
}

impl Default for FocusTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_source_to_derived() {
        let tracker = FocusTracker::new();
        assert_eq!(tracker.active_direction(), Direction::SourceToDerived);
    }

    #[test]
    fn activity_selects_direction_from_pane() {
        let mut tracker = FocusTracker::new();
        tracker.record_activity(PaneId::Derived);
        assert_eq!(tracker.active_direction(), Direction::DerivedToSource);
        assert_eq!(tracker.active_pane(), PaneId::Derived);
        tracker.record_activity(PaneId::Source);
        assert_eq!(tracker.active_direction(), Direction::SourceToDerived);
    }

    #[test]
    fn target_is_opposite_of_source() {
        assert_eq!(Direction::SourceToDerived.target(), PaneId::Derived);
        assert_eq!(Direction::DerivedToSource.target(), PaneId::Source);
    }
}
