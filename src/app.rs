//! Wires terminal input to the sync controller and draws the two panes.

use std::fs;
use std::path::{Path, PathBuf};

use crossterm::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Direction as Axis, Layout, Rect};
use tracing::{info, warn};

use crate::actions::Action;
use crate::clipboard;
use crate::clock::{Clock, SystemClock};
use crate::components::{
    Component, ComponentContext, DebugLogComponent, DiagnosticsPanel, EditOutcome, EditorPane,
    StatusBar,
};
use crate::constants::{DERIVED_EXPORT_NAME, DIAGNOSTICS_HEIGHT, EXAMPLE_CHEATS, SOURCE_EXPORT_NAME};
use crate::drivers::keyboard::normalize_newlines;
use crate::error::{AppError, AppResult};
use crate::event_loop::ControlFlow;
use crate::keybindings::KeyBindings;
use crate::state::AppState;
use crate::sync::{Direction, Dispatcher, PaneId, SyncController, SyncOutcome};
use crate::theme;
use crate::ui::UiFrame;

/// What to load before the first frame.
#[derive(Debug, Clone, Default)]
pub struct Startup {
    pub source_import: Option<PathBuf>,
    pub derived_import: Option<PathBuf>,
    pub seed_example: bool,
}

pub struct App<D, K = SystemClock> {
    controller: SyncController<D, K>,
    editors: [EditorPane; 2],
    diagnostics: DiagnosticsPanel,
    status: StatusBar,
    debug_log: Option<DebugLogComponent>,
    state: AppState,
    keys: KeyBindings,
    export_dir: PathBuf,
}

impl<D: Dispatcher, K: Clock> App<D, K> {
    pub fn new(
        controller: SyncController<D, K>,
        diagnostics: DiagnosticsPanel,
        debug_log: Option<DebugLogComponent>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            controller,
            editors: [EditorPane::new(PaneId::Source), EditorPane::new(PaneId::Derived)],
            diagnostics,
            status: StatusBar::new(),
            debug_log,
            state: AppState::new(),
            keys: KeyBindings::default(),
            export_dir,
        }
    }

    /// Restore the saved session, then apply start-up imports or the example
    /// seed. Imports win over restored text.
    pub fn start(&mut self, startup: &Startup) -> AppResult<()> {
        let snapshot = self.controller.restore();
        let mut imported = false;
        for (pane, path) in [
            (PaneId::Source, &startup.source_import),
            (PaneId::Derived, &startup.derived_import),
        ] {
            if let Some(path) = path {
                let text = read_document(path)?;
                self.controller.on_import(pane, &text);
                imported = true;
            }
        }
        if !imported && snapshot.is_empty() && startup.seed_example {
            info!("empty session, loading example cheats");
            self.controller
                .load_programmatic(PaneId::Source, EXAMPLE_CHEATS);
            self.controller
                .trigger_translation(Direction::SourceToDerived);
        }
        self.sync_editors();
        Ok(())
    }

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Paste(text) => {
                self.handle_paste(text);
                ControlFlow::Continue
            }
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> ControlFlow {
        if let Some(action) = self.keys.action_for_key(key) {
            return self.run_action(action);
        }
        if self.state.debug_log_visible()
            && matches!(key.code, KeyCode::PageUp | KeyCode::PageDown)
            && let Some(log) = self.debug_log.as_mut()
            && log.handle_event(&Event::Key(*key), &ComponentContext::new(true))
        {
            return ControlFlow::Continue;
        }
        let focused = self.state.focused();
        let editor = &mut self.editors[focused.index()];
        if editor.apply_key(key) == EditOutcome::Edited {
            let text = editor.text();
            self.controller.on_user_edit(focused, &text);
            self.state.clear_status();
        }
        ControlFlow::Continue
    }

    fn run_action(&mut self, action: Action) -> ControlFlow {
        let focused = self.state.focused();
        match action {
            Action::Quit => return ControlFlow::Quit,
            Action::FocusNext | Action::FocusPrev => self.state.cycle_focus(),
            Action::Paste => match clipboard::get() {
                Ok(text) => self.paste_into(focused, &text),
                Err(err) => {
                    warn!("paste failed: {err}");
                    self.state.set_status(err.to_string());
                }
            },
            Action::TranslateNow => {
                let direction = Direction::from_source(focused);
                if self.controller.trigger_translation(direction).is_none() {
                    self.state.set_status("nothing new to translate");
                }
            }
            Action::Save => match self.save_pane(focused) {
                Ok(path) => self.state.set_status(format!("saved {}", path.display())),
                Err(err) => {
                    warn!("save failed: {err}");
                    self.state.set_status(err.to_string());
                }
            },
            Action::ToggleDebugLog => {
                if self.debug_log.is_some() {
                    self.state.toggle_debug_log_visible();
                }
            }
        }
        ControlFlow::Continue
    }

    /// A bracketed paste naming an existing file is a drop of that file.
    fn handle_paste(&mut self, text: &str) {
        let focused = self.state.focused();
        if let Some(path) = dropped_path(text) {
            if let Err(err) = self.import(focused, &path) {
                warn!("import failed: {err}");
                self.state.set_status(err.to_string());
            }
            return;
        }
        self.paste_into(focused, text);
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind
            && let Some(pane) = PaneId::ALL
                .into_iter()
                .find(|id| self.editors[id.index()].contains(mouse.column, mouse.row))
        {
            self.state.set_focused(pane);
        }
        let ctx = ComponentContext::new(true);
        for editor in &mut self.editors {
            if editor.handle_event(&Event::Mouse(*mouse), &ctx) {
                break;
            }
        }
    }

    fn paste_into(&mut self, pane: PaneId, text: &str) {
        let editor = &mut self.editors[pane.index()];
        editor.insert_str(text);
        let content = editor.text();
        self.controller.on_paste(pane, &content);
    }

    pub fn import(&mut self, pane: PaneId, path: &Path) -> AppResult<()> {
        let text = read_document(path)?;
        self.editors[pane.index()].set_text(&text);
        self.controller.on_import(pane, &text);
        self.state.set_status(format!("imported {}", path.display()));
        Ok(())
    }

    pub fn save_pane(&self, pane: PaneId) -> AppResult<PathBuf> {
        let name = match pane {
            PaneId::Source => SOURCE_EXPORT_NAME,
            PaneId::Derived => DERIVED_EXPORT_NAME,
        };
        let path = self.export_dir.join(name);
        fs::write(&path, self.controller.pane(pane).content())?;
        info!(%pane, path = %path.display(), "pane saved");
        Ok(path)
    }

    /// Idle step: poll the scheduler, apply finished translations and copy
    /// programmatic writes into the editors.
    pub fn idle_step(&mut self) -> Vec<SyncOutcome> {
        self.controller.tick();
        let outcomes = self.controller.pump();
        if !outcomes.is_empty() {
            self.sync_editors();
        }
        outcomes
    }

    fn sync_editors(&mut self) {
        for id in PaneId::ALL {
            let content = self.controller.pane(id).content();
            let editor = &mut self.editors[id.index()];
            if editor.text() != content {
                editor.set_text(content);
            }
        }
    }

    pub fn draw(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        let rows = Layout::default()
            .direction(Axis::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(DIAGNOSTICS_HEIGHT),
                Constraint::Length(1),
            ])
            .split(area);
        let panes = Layout::default()
            .direction(Axis::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        let authoritative = self.controller.active_direction().source();
        for id in PaneId::ALL {
            let ctx = ComponentContext::new(self.state.focused() == id)
                .with_authoritative(authoritative == id);
            self.editors[id.index()].render(frame, panes[id.index()], &ctx);
        }
        self.diagnostics
            .render(frame, rows[1], &ComponentContext::default());

        self.refresh_status();
        self.status.render(frame, rows[2], &ComponentContext::default());

        if self.state.debug_log_visible()
            && let Some(log) = self.debug_log.as_mut()
        {
            log.render(frame, lower_half(rows[0]), &ComponentContext::new(true));
        }
    }

    fn refresh_status(&mut self) {
        let in_flight = self.controller.in_flight();
        let mut left = format!(
            " {}  [{}]",
            self.controller.active_direction(),
            self.state.focused().title()
        );
        if in_flight > 0 {
            left.push_str(&format!("  translating ({in_flight})"));
        } else if let Some(message) = self.state.status() {
            left.push_str("  ");
            left.push_str(message);
        } else if let Some(outcome) = self.controller.last_outcome() {
            left.push_str("  ");
            left.push_str(describe(outcome));
        }
        self.status.set_left(left);
        self.status.set_right(format!(
            "{} ",
            self.keys.hints(&[
                Action::TranslateNow,
                Action::Save,
                Action::FocusNext,
                Action::ToggleDebugLog,
                Action::Quit,
            ])
        ));
        self.status.set_style(if in_flight > 0 {
            theme::status_bar_busy()
        } else {
            theme::status_bar()
        });
    }

    pub fn shutdown(&mut self) {
        self.controller.shutdown();
    }

    pub fn controller(&self) -> &SyncController<D, K> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut SyncController<D, K> {
        &mut self.controller
    }

    pub fn editor(&self, pane: PaneId) -> &EditorPane {
        &self.editors[pane.index()]
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}

fn describe(outcome: SyncOutcome) -> &'static str {
    match outcome {
        SyncOutcome::Applied { .. } => "in sync",
        SyncOutcome::Discarded { .. } => "stale answer dropped",
        SyncOutcome::Failed { .. } => "translation failed",
    }
}

fn lower_half(area: Rect) -> Rect {
    let height = area.height / 2;
    Rect::new(area.x, area.y + area.height - height, area.width, height)
}

fn read_document(path: &Path) -> AppResult<String> {
    fs::read_to_string(path)
        .map(|text| normalize_newlines(&text))
        .map_err(|source| AppError::Import {
            path: path.to_path_buf(),
            source,
        })
}

/// Terminals deliver a dropped file as its path, sometimes quoted.
fn dropped_path(text: &str) -> Option<PathBuf> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.contains('\n') {
        return None;
    }
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .or_else(|| trimmed.strip_prefix('"').and_then(|t| t.strip_suffix('"')))
        .unwrap_or(trimmed);
    let path = PathBuf::from(unquoted);
    path.is_file().then_some(path)
}
