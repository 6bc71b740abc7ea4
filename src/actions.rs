use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    // Pane focus
    FocusNext,
    FocusPrev,
    // Clipboard paste into the focused pane
    Paste,
    // Translate the focused pane right away
    TranslateNow,
    // Write the focused pane to the export directory
    Save,
    ToggleDebugLog,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Quit,
        Action::FocusNext,
        Action::FocusPrev,
        Action::Paste,
        Action::TranslateNow,
        Action::Save,
        Action::ToggleDebugLog,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "quit",
            Action::FocusNext => "next pane",
            Action::FocusPrev => "previous pane",
            Action::Paste => "paste",
            Action::TranslateNow => "translate",
            Action::Save => "save",
            Action::ToggleDebugLog => "log",
        };
        write!(f, "{s}")
    }
}
