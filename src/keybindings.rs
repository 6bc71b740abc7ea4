use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::actions::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    /// Compact form for the status line, e.g. `^Q` or `F12`.
    pub fn short(&self) -> String {
        let code = match self.code {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::BackTab => "S-Tab".to_string(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        };
        if self.mods.contains(KeyModifiers::CONTROL) {
            format!("^{code}")
        } else {
            code
        }
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|action| self.matches(*action, key))
    }

    pub fn first_combo(&self, action: Action) -> Option<KeyCombo> {
        self.map.get(&action).and_then(|list| list.first().cloned())
    }

    /// Hint string such as `^R translate  ^S save`, in `actions` order.
    pub fn hints(&self, actions: &[Action]) -> String {
        actions
            .iter()
            .filter_map(|action| {
                self.first_combo(*action)
                    .map(|combo| format!("{} {}", combo.short(), action))
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(Quit, KeyCombo::ctrl('q'));
        kb.add(Quit, KeyCombo::ctrl('c'));
        // Tab stays an editing key; focus moves with F6 / Shift+Tab.
        kb.add(FocusNext, KeyCombo::plain(KeyCode::F(6)));
        kb.add(FocusPrev, KeyCombo::plain(KeyCode::BackTab));
        kb.add(FocusPrev, KeyCombo::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        kb.add(Paste, KeyCombo::ctrl('v'));
        kb.add(TranslateNow, KeyCombo::ctrl('r'));
        kb.add(Save, KeyCombo::ctrl('s'));
        kb.add(ToggleDebugLog, KeyCombo::plain(KeyCode::F(12)));
        kb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_quit() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(kb.matches(Action::Quit, &ev));
        assert_eq!(kb.action_for_key(&ev), Some(Action::Quit));
    }

    #[test]
    fn plain_tab_is_not_bound() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(kb.action_for_key(&ev), None);
    }

    #[test]
    fn backtab_with_shift_moves_focus() {
        let kb = KeyBindings::default();
        let ev = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(kb.action_for_key(&ev), Some(Action::FocusPrev));
    }

    #[test]
    fn hints_follow_requested_order() {
        let kb = KeyBindings::default();
        assert_eq!(
            kb.hints(&[Action::TranslateNow, Action::Quit]),
            "^R translate  ^Q quit"
        );
    }
}
