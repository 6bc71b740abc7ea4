//! A plain multi-line text editor bound to one pane.
//!
//! The editor owns the cursor and the visible line buffer; the sync
//! controller owns the authoritative text. After every edit the app copies
//! `text()` into the controller, and after a translation lands it pushes the
//! controller's text back with `set_text`.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::components::{Component, ComponentContext};
use crate::constants::INDENT;
use crate::sync::PaneId;
use crate::theme;
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The key meant nothing to the editor.
    Ignored,
    /// Cursor or viewport moved; text unchanged.
    Moved,
    /// Text changed.
    Edited,
}

#[derive(Debug)]
pub struct EditorPane {
    id: PaneId,
    lines: Vec<String>,
    row: usize,
    col: usize,
    top: usize,
    left: usize,
    last_area: Rect,
}

impl EditorPane {
    pub fn new(id: PaneId) -> Self {
        Self {
            id,
            lines: vec![String::new()],
            row: 0,
            col: 0,
            top: 0,
            left: 0,
            last_area: Rect::default(),
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    /// Replace the whole buffer, keeping the cursor as close as possible to
    /// where it was.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.row = self.row.min(self.lines.len() - 1);
        self.clamp_col();
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.last_area.contains(Position::new(column, row))
    }

    pub fn insert_str(&mut self, text: &str) {
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            self.insert_inline(first);
        }
        for part in parts {
            self.split_line();
            self.insert_inline(part);
        }
    }

    pub fn apply_key(&mut self, key: &KeyEvent) -> EditOutcome {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return EditOutcome::Ignored;
        }
        match key.code {
            KeyCode::Char(c) => {
                let mut buf = [0u8; 4];
                self.insert_inline(c.encode_utf8(&mut buf));
                EditOutcome::Edited
            }
            KeyCode::Tab => {
                self.insert_inline(INDENT);
                EditOutcome::Edited
            }
            KeyCode::Enter => {
                self.split_line();
                EditOutcome::Edited
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = self.line_len(self.row);
                }
                EditOutcome::Moved
            }
            KeyCode::Right => {
                if self.col < self.line_len(self.row) {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
                EditOutcome::Moved
            }
            KeyCode::Up => {
                self.row = self.row.saturating_sub(1);
                self.clamp_col();
                EditOutcome::Moved
            }
            KeyCode::Down => {
                self.row = (self.row + 1).min(self.lines.len() - 1);
                self.clamp_col();
                EditOutcome::Moved
            }
            KeyCode::Home => {
                self.col = 0;
                EditOutcome::Moved
            }
            KeyCode::End => {
                self.col = self.line_len(self.row);
                EditOutcome::Moved
            }
            KeyCode::PageUp => {
                self.row = self.row.saturating_sub(self.page());
                self.clamp_col();
                EditOutcome::Moved
            }
            KeyCode::PageDown => {
                self.row = (self.row + self.page()).min(self.lines.len() - 1);
                self.clamp_col();
                EditOutcome::Moved
            }
            _ => EditOutcome::Ignored,
        }
    }

    fn page(&self) -> usize {
        (self.last_area.height.saturating_sub(2) as usize).max(1)
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn clamp_col(&mut self) {
        self.col = self.col.min(self.line_len(self.row));
    }

    fn byte_index(&self, row: usize, col: usize) -> usize {
        let line = &self.lines[row];
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    fn insert_inline(&mut self, text: &str) {
        let at = self.byte_index(self.row, self.col);
        self.lines[self.row].insert_str(at, text);
        self.col += text.chars().count();
    }

    fn split_line(&mut self) {
        let at = self.byte_index(self.row, self.col);
        let tail = self.lines[self.row].split_off(at);
        self.lines.insert(self.row + 1, tail);
        self.row += 1;
        self.col = 0;
    }

    fn backspace(&mut self) -> EditOutcome {
        if self.col > 0 {
            let end = self.byte_index(self.row, self.col);
            let start = self.byte_index(self.row, self.col - 1);
            self.lines[self.row].replace_range(start..end, "");
            self.col -= 1;
            EditOutcome::Edited
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&line);
            EditOutcome::Edited
        } else {
            EditOutcome::Moved
        }
    }

    fn delete(&mut self) -> EditOutcome {
        if self.col < self.line_len(self.row) {
            let start = self.byte_index(self.row, self.col);
            let end = self.byte_index(self.row, self.col + 1);
            self.lines[self.row].replace_range(start..end, "");
            EditOutcome::Edited
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
            EditOutcome::Edited
        } else {
            EditOutcome::Moved
        }
    }

    fn scroll_into_view(&mut self, height: usize, width: usize) {
        if height > 0 {
            if self.row < self.top {
                self.top = self.row;
            } else if self.row >= self.top + height {
                self.top = self.row + 1 - height;
            }
        }
        if width > 0 {
            if self.col < self.left {
                self.left = self.col;
            } else if self.col >= self.left + width {
                self.left = self.col + 1 - width;
            }
        }
    }
}

impl Component for EditorPane {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.last_area = area;
        if area.width < 3 || area.height < 3 {
            return;
        }
        let mut title = vec![Span::raw(format!(" {} ", self.id.title()))];
        if ctx.authoritative() {
            title.push(Span::styled(
                "[sync source] ",
                Style::default().fg(theme::accent()),
            ));
        }
        let border = if ctx.focused() {
            Style::default().fg(theme::focus_border())
        } else {
            Style::default().fg(theme::idle_border())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(Line::from(title).style(Style::default().add_modifier(Modifier::BOLD)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let height = inner.height as usize;
        let width = inner.width as usize;
        self.scroll_into_view(height, width);

        let visible: Vec<Line> = self
            .lines
            .iter()
            .skip(self.top)
            .take(height)
            .map(|line| Line::raw(line.chars().skip(self.left).take(width).collect::<String>()))
            .collect();
        frame.render_widget(Paragraph::new(visible), inner);

        if ctx.focused() {
            let x = inner.x + (self.col - self.left) as u16;
            let y = inner.y + (self.row - self.top) as u16;
            frame.set_cursor(Position::new(x, y));
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) => self.apply_key(key) != EditOutcome::Ignored,
            Event::Mouse(mouse) => {
                if !self.contains(mouse.column, mouse.row) {
                    return false;
                }
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        let inner_x = mouse.column.saturating_sub(self.last_area.x + 1) as usize;
                        let inner_y = mouse.row.saturating_sub(self.last_area.y + 1) as usize;
                        self.row = (self.top + inner_y).min(self.lines.len() - 1);
                        self.col = self.left + inner_x;
                        self.clamp_col();
                        true
                    }
                    MouseEventKind::ScrollUp => {
                        self.row = self.row.saturating_sub(3);
                        self.clamp_col();
                        true
                    }
                    MouseEventKind::ScrollDown => {
                        self.row = (self.row + 3).min(self.lines.len() - 1);
                        self.clamp_col();
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }
}
