use std::sync::{Arc, Mutex};

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::components::{Component, ComponentContext};
use crate::sync::DiagnosticsSink;
use crate::theme;
use crate::ui::UiFrame;

/// Shared slot holding the text the diagnostics panel shows.
///
/// The controller writes through the [`DiagnosticsSink`] impl; the panel
/// reads the same slot when it draws.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticsHandle {
    inner: Arc<Mutex<String>>,
}

impl DiagnosticsHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.inner
            .lock()
            .map(|text| text.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticsSink for DiagnosticsHandle {
    fn show(&mut self, text: &str) {
        if let Ok(mut slot) = self.inner.lock() {
            text.clone_into(&mut slot);
        }
    }
}

#[derive(Debug)]
pub struct DiagnosticsPanel {
    handle: DiagnosticsHandle,
}

impl DiagnosticsPanel {
    pub fn new() -> (Self, DiagnosticsHandle) {
        let handle = DiagnosticsHandle::new();
        (
            Self {
                handle: handle.clone(),
            },
            handle,
        )
    }
}

impl Component for DiagnosticsPanel {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let text = self.handle.text();
        let (title, style) = if text.is_empty() {
            (" Diagnostics ", Style::default().fg(theme::idle_border()))
        } else {
            (" Diagnostics (!) ", Style::default().fg(theme::warning()))
        };
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(style)
            .title(title);
        let lines: Vec<Line> = text.lines().map(|l| Line::raw(l.to_string())).collect();
        let paragraph = Paragraph::new(lines)
            .block(block)
            .style(Style::default().fg(theme::warning()))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    #[test]
    fn sink_writes_are_visible_through_handle() {
        let (_panel, handle) = DiagnosticsPanel::new();
        let mut sink = handle.clone();
        sink.show("line 2: unknown opcode");
        assert_eq!(handle.text(), "line 2: unknown opcode");
        sink.show("");
        assert_eq!(handle.text(), "");
    }

    #[test]
    fn renders_diagnostic_text() {
        let (mut panel, handle) = DiagnosticsPanel::new();
        let mut sink = handle.clone();
        sink.show("bad opcode");
        let area = Rect::new(0, 0, 30, 3);
        let mut buffer = Buffer::empty(area);
        {
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            panel.render(&mut frame, area, &ComponentContext::default());
        }
        let row: String = (0..10)
            .map(|x| buffer.cell((x, 1)).unwrap().symbol().to_string())
            .collect();
        assert_eq!(row, "bad opcode");
    }
}
