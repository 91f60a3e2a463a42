// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Keyboard shortcut handling.
//!
//! Provides configurable keyboard bindings for navigation, arranging,
//! renaming and saving. While a sequence is being renamed, keys are read
//! as text instead.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use tracing::{debug, warn};

use super::EditorAction;

/// A keyboard shortcut definition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcut {
    /// Key code
    pub code: KeyCode,
    /// Required modifiers
    pub modifiers: KeyModifiers,
}

impl Shortcut {
    /// Create a new shortcut
    ///
    /// Shift is dropped for characters and back-tab since the key code
    /// already carries it and terminals disagree about reporting it.
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let modifiers = match code {
            KeyCode::Char(_) | KeyCode::BackTab => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        Self { code, modifiers }
    }

    /// Create a shortcut with no modifiers
    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Create a shortcut with Ctrl modifier
    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    /// Create a shortcut with Shift modifier
    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }

    /// Check if this shortcut matches a key event
    pub fn matches(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        *self == Self::new(code, modifiers)
    }
}

/// A keyboard binding (shortcut to action)
#[derive(Debug, Clone)]
pub struct KeyBinding {
    /// The shortcut
    pub shortcut: Shortcut,
    /// The action to perform
    pub action: EditorAction,
    /// Description for help display
    pub description: String,
    /// Category for grouping in help
    pub category: String,
}

impl KeyBinding {
    /// Create a new key binding
    pub fn new(shortcut: Shortcut, action: EditorAction, description: impl Into<String>) -> Self {
        let category = action.category().to_string();
        Self {
            shortcut,
            action,
            description: description.into(),
            category,
        }
    }

    /// Set the category
    pub fn category(mut self, cat: impl Into<String>) -> Self {
        self.category = cat.into();
        self
    }
}

/// Keyboard controller with configurable bindings
#[derive(Debug, Clone)]
pub struct KeyboardController {
    bindings: HashMap<Shortcut, KeyBinding>,
}

impl KeyboardController {
    /// Create an empty keyboard controller
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create a keyboard controller with default bindings
    pub fn with_defaults() -> Self {
        let mut controller = Self::new();
        controller.add_default_bindings();
        controller
    }

    /// Create a keyboard controller with defaults plus overrides
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut controller = Self::with_defaults();
        controller.apply_overrides(overrides);
        controller
    }

    /// Add default keyboard bindings
    fn add_default_bindings(&mut self) {
        // Navigation
        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Up),
            EditorAction::NavigateUp,
            "Select previous",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Down),
            EditorAction::NavigateDown,
            "Select next",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Left),
            EditorAction::FocusSequences,
            "Sequences pane",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Right),
            EditorAction::FocusSong,
            "Song pane",
        ));

        // Arrange
        self.add(KeyBinding::new(
            Shortcut::shift(KeyCode::Up),
            EditorAction::MoveUp,
            "Move up",
        ));

        self.add(KeyBinding::new(
            Shortcut::shift(KeyCode::Down),
            EditorAction::MoveDown,
            "Move down",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Enter),
            EditorAction::CloneToSong,
            "Add sequence to song",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Char('d')),
            EditorAction::DeleteEntry,
            "Remove song slot",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Delete),
            EditorAction::DeleteEntry,
            "Remove song slot",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Char('+')),
            EditorAction::RepeatUp,
            "Repeat +1",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Char('=')),
            EditorAction::RepeatUp,
            "Repeat +1",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Char('-')),
            EditorAction::RepeatDown,
            "Repeat -1",
        ));

        // Rename
        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Char('e')),
            EditorAction::StartRename,
            "Rename sequence",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::F(2)),
            EditorAction::StartRename,
            "Rename sequence",
        ));

        // Project
        self.add(KeyBinding::new(
            Shortcut::ctrl(KeyCode::Char('s')),
            EditorAction::Save,
            "Save",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Char('s')),
            EditorAction::Save,
            "Save",
        ));

        self.add(KeyBinding::new(
            Shortcut::ctrl(KeyCode::Char('r')),
            EditorAction::Reload,
            "Reload project",
        ));

        // UI
        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Char('?')),
            EditorAction::ToggleHelp,
            "Toggle help",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Char('h')),
            EditorAction::ToggleHelp,
            "Toggle help",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Esc),
            EditorAction::Cancel,
            "Close help / cancel",
        ));

        self.add(KeyBinding::new(
            Shortcut::key(KeyCode::Char('q')),
            EditorAction::Quit,
            "Quit",
        ));

        self.add(KeyBinding::new(
            Shortcut::ctrl(KeyCode::Char('c')),
            EditorAction::Quit,
            "Quit",
        ));
    }

    /// Apply `key -> action name` overrides from configuration
    ///
    /// Entries with an unknown key or action are skipped with a warning.
    /// Returns the number applied.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> usize {
        let mut applied = 0;
        for (key, name) in overrides {
            let Some(shortcut) = parse_shortcut(key) else {
                warn!("Ignoring keyboard override: unknown key '{}'", key);
                continue;
            };
            let Some(action) = EditorAction::from_name(name) else {
                warn!("Ignoring keyboard override: unknown action '{}'", name);
                continue;
            };
            debug!("Binding {} to {:?}", format_shortcut(&shortcut), action);
            let description = action.description();
            self.add(KeyBinding::new(shortcut, action, description));
            applied += 1;
        }
        applied
    }

    /// Add a key binding
    pub fn add(&mut self, binding: KeyBinding) {
        self.bindings.insert(binding.shortcut.clone(), binding);
    }

    /// Remove a key binding
    pub fn remove(&mut self, shortcut: &Shortcut) -> Option<KeyBinding> {
        self.bindings.remove(shortcut)
    }

    /// Get action for a key event
    pub fn get_action(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<&EditorAction> {
        let shortcut = Shortcut::new(code, modifiers);
        self.bindings.get(&shortcut).map(|b| &b.action)
    }

    /// Process a key event and return the action
    pub fn process_key(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<EditorAction> {
        self.get_action(code, modifiers).cloned()
    }

    /// Process a key event while a name is being edited
    pub fn process_text_key(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<EditorAction> {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return match code {
                KeyCode::Char('c') => Some(EditorAction::Quit),
                KeyCode::Char('s') => Some(EditorAction::Save),
                _ => None,
            };
        }

        match code {
            KeyCode::Enter | KeyCode::Esc => Some(EditorAction::EndRename),
            KeyCode::Tab => Some(EditorAction::NextRename),
            KeyCode::BackTab => Some(EditorAction::PreviousRename),
            KeyCode::Backspace => Some(EditorAction::DeleteChar),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::ALT) => {
                Some(EditorAction::InsertChar(c))
            }
            _ => None,
        }
    }

    /// Get all bindings for help display
    pub fn bindings(&self) -> impl Iterator<Item = &KeyBinding> {
        self.bindings.values()
    }

    /// Get bindings grouped by category
    pub fn bindings_by_category(&self) -> HashMap<String, Vec<&KeyBinding>> {
        let mut grouped: HashMap<String, Vec<&KeyBinding>> = HashMap::new();

        for binding in self.bindings.values() {
            grouped
                .entry(binding.category.clone())
                .or_default()
                .push(binding);
        }

        grouped
    }

    /// Get binding for a shortcut
    pub fn get_binding(&self, shortcut: &Shortcut) -> Option<&KeyBinding> {
        self.bindings.get(shortcut)
    }
}

impl Default for KeyboardController {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Parse a key name such as `ctrl+s`, `shift+up`, `space` or `x`
pub fn parse_shortcut(text: &str) -> Option<Shortcut> {
    let text = text.trim();
    let (prefix, key) = if let Some(prefix) = text.strip_suffix("++") {
        (Some(prefix), "+")
    } else if text == "+" {
        (None, "+")
    } else {
        match text.rsplit_once('+') {
            Some((prefix, key)) => (Some(prefix), key.trim()),
            None => (None, text),
        }
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in prefix.into_iter().flat_map(|prefix| prefix.split('+')) {
        match part.trim().to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return None,
        }
    }

    let lower = key.to_ascii_lowercase();
    let code = match lower.as_str() {
        "space" => KeyCode::Char(' '),
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        f if f.len() > 1 && f.starts_with('f') => KeyCode::F(f[1..].parse().ok()?),
        _ => {
            let mut chars = key.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            KeyCode::Char(c)
        }
    };

    Some(Shortcut::new(code, modifiers))
}

/// Format a shortcut for display
pub fn format_shortcut(shortcut: &Shortcut) -> String {
    let mut parts = Vec::new();

    if shortcut.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl");
    }
    if shortcut.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt");
    }
    if shortcut.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift");
    }

    let key = match shortcut.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_uppercase().to_string(),
        KeyCode::F(n) => format!("F{}", n),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        _ => "?".to_string(),
    };

    parts.push(&key);
    parts.join("+")
}
