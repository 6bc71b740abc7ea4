use std::fmt;
use std::time::Instant;

/// Identity of one of the two linked buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PaneId {
    /// Assembled cheat text (`[Title]` headers and opcode words).
    Source,
    /// Human-readable disassembly.
    Derived,
}

impl PaneId {
    pub const ALL: [PaneId; 2] = [PaneId::Source, PaneId::Derived];

    pub fn other(self) -> PaneId {
        match self {
            PaneId::Source => PaneId::Derived,
            PaneId::Derived => PaneId::Source,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PaneId::Source => 0,
            PaneId::Derived => 1,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PaneId::Source => "Cheat code",
            PaneId::Derived => "Disassembly",
        }
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaneId::Source => write!(f, "source"),
            PaneId::Derived => write!(f, "derived"),
        }
    }
}

/// Who caused a content change.
///
/// Only `User` writes count as activity. A `Programmatic` write (an applied
/// translation result, a restored session, the example seed) replaces the
/// text and nothing else, which is what keeps the two panes from
/// re-translating each other forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Programmatic,
}

#[derive(Debug, Clone)]
pub struct Pane {
    id: PaneId,
    content: String,
    last_requested: String,
    last_edit: Option<Instant>,
}

impl Pane {
    pub fn new(id: PaneId) -> Self {
        Self {
            id,
            content: String::new(),
            last_requested: String::new(),
            last_edit: None,
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn last_requested(&self) -> &str {
        &self.last_requested
    }

    /// Instant of the most recent user-originated change, if any.
    pub fn last_edit(&self) -> Option<Instant> {
        self.last_edit
    }

    pub fn set_content(&mut self, text: impl Into<String>, origin: Origin, now: Instant) {
        self.content = text.into();
        if origin == Origin::User {
            self.last_edit = Some(now);
        }
    }

    /// True when the pane no longer holds `requested`.
    pub fn is_stale(&self, requested: &str) -> bool {
        self.content != requested
    }

    /// Whether the current content still needs to be sent out.
    pub fn needs_request(&self) -> bool {
        !self.content.is_empty() && self.content != self.last_requested
    }

    pub(crate) fn mark_requested(&mut self) -> String {
        self.last_requested = self.content.clone();
        self.last_requested.clone()
    }

    /// Undo `mark_requested` for a request that failed, unless a newer
    /// request has already replaced the marker.
    pub(crate) fn rollback_request(&mut self, failed: &str) -> bool {
        if self.last_requested == failed {
            self.last_requested.clear();
            true
        } else {
            false
        }
    }
}
