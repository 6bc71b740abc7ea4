use crate::sync::PaneId;

/// View state that lives outside the sync controller.
#[derive(Debug, Clone)]
pub struct AppState {
    focused: PaneId,
    debug_log_visible: bool,
    status: Option<String>,
    quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            focused: PaneId::Source,
            debug_log_visible: false,
            status: None,
            quit: false,
        }
    }

    pub fn focused(&self) -> PaneId {
        self.focused
    }

    pub fn set_focused(&mut self, pane: PaneId) {
        self.focused = pane;
    }

    pub fn cycle_focus(&mut self) {
        self.focused = self.focused.other();
    }

    pub fn debug_log_visible(&self) -> bool {
        self.debug_log_visible
    }

    pub fn toggle_debug_log_visible(&mut self) {
        self.debug_log_visible = !self.debug_log_visible;
    }

    /// One-shot message for the status line (save results, import errors).
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
