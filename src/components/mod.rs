use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod debug_log;
pub mod diagnostics_panel;
pub mod editor_pane;
pub mod status_bar;

pub use debug_log::{DebugLogComponent, DebugLogHandle};
pub use diagnostics_panel::{DiagnosticsHandle, DiagnosticsPanel};
pub use editor_pane::{EditOutcome, EditorPane};
pub use status_bar::StatusBar;

pub use crate::component_context::ComponentContext;

pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}
