//! Shared component rendering context
//!
//! `ComponentContext` carries the UI state a component may need while
//! rendering or handling input, so the `Component` trait does not grow a new
//! boolean parameter for every concern.

/// - `focused`: the component receives keyboard input.
/// - `authoritative`: the component shows the pane the next translation reads
///   from (the pane the user last edited). Focus alone does not make a pane
///   authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentContext {
    focused: bool,
    authoritative: bool,
}

impl ComponentContext {
    pub const fn new(focused: bool) -> Self {
        Self {
            focused,
            authoritative: false,
        }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn authoritative(&self) -> bool {
        self.authoritative
    }

    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub const fn with_authoritative(mut self, authoritative: bool) -> Self {
        self.authoritative = authoritative;
        self
    }
}
