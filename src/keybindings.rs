use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    // Tree list navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Home,
    End,
    // Selection
    SelectParent,
    ClearSelection,
    // Inspected program
    Rescan,
    DestroyWidget,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::MoveUp => "Previous widget",
            Action::MoveDown => "Next widget",
            Action::PageUp => "Page up",
            Action::PageDown => "Page down",
            Action::Home => "First widget",
            Action::End => "Last widget",
            Action::SelectParent => "Select parent",
            Action::ClearSelection => "Clear selection",
            Action::Rescan => "Rescan widget tree",
            Action::DestroyWidget => "Destroy selected widget",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        key.code == self.code && key.modifiers == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(Quit, KeyCombo::plain(KeyCode::Char('q')));
        kb.add(
            Quit,
            KeyCombo::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        kb.add(MoveUp, KeyCombo::plain(KeyCode::Up));
        kb.add(MoveUp, KeyCombo::plain(KeyCode::Char('k')));
        kb.add(MoveDown, KeyCombo::plain(KeyCode::Down));
        kb.add(MoveDown, KeyCombo::plain(KeyCode::Char('j')));
        kb.add(PageUp, KeyCombo::plain(KeyCode::PageUp));
        kb.add(PageDown, KeyCombo::plain(KeyCode::PageDown));
        kb.add(Home, KeyCombo::plain(KeyCode::Home));
        kb.add(End, KeyCombo::plain(KeyCode::End));
        kb.add(SelectParent, KeyCombo::plain(KeyCode::Backspace));
        kb.add(SelectParent, KeyCombo::plain(KeyCode::Char('p')));
        kb.add(ClearSelection, KeyCombo::plain(KeyCode::Esc));
        kb.add(Rescan, KeyCombo::plain(KeyCode::Char('r')));
        kb.add(DestroyWidget, KeyCombo::plain(KeyCode::Delete));
        kb.add(DestroyWidget, KeyCombo::plain(KeyCode::Char('x')));
        kb
    }
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
        if let Some(list) = self.map.get(&action) {
            list.iter().any(|c| c.matches(key))
        } else {
            false
        }
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        for (act, list) in &self.map {
            if list.iter().any(|c| c.matches(key)) {
                return Some(*act);
            }
        }
        None
    }

    /// Return the display strings for all combos mapped to `action`.
    pub fn combos_for(&self, action: Action) -> Vec<String> {
        self.map
            .get(&action)
            .map(|list| list.iter().map(|c| c.display()).collect())
            .unwrap_or_default()
    }

    /// One-line summary of `actions`, e.g. `Up/k Previous widget`. Actions
    /// without a binding are left out.
    pub fn hint_line(&self, actions: &[Action]) -> String {
        actions
            .iter()
            .filter_map(|&action| {
                let combos = self.combos_for(action);
                (!combos.is_empty()).then(|| format!("{} {}", combos.join("/"), action))
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}
