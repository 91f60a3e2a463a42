// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Control system for keyboard input.
//!
//! This module provides:
//! - Editor actions that keys resolve to
//! - Keyboard shortcut handling with configurable overrides

pub mod keyboard;

pub use keyboard::{format_shortcut, parse_shortcut, KeyBinding, KeyboardController, Shortcut};

/// Action that can be triggered by controls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    // Navigation
    /// Move selection up
    NavigateUp,
    /// Move selection down
    NavigateDown,
    /// Focus the sequences pane
    FocusSequences,
    /// Focus the song pane
    FocusSong,

    // Arrange
    /// Drag the selected item up one place
    MoveUp,
    /// Drag the selected item down one place
    MoveDown,
    /// Clone the selected sequence into the song
    CloneToSong,
    /// Remove the selected song slot
    DeleteEntry,
    /// Raise the selected slot's repeat count
    RepeatUp,
    /// Lower the selected slot's repeat count
    RepeatDown,

    // Rename
    /// Start renaming the selected sequence
    StartRename,
    /// Finish renaming
    EndRename,
    /// Rename the next sequence
    NextRename,
    /// Rename the previous sequence
    PreviousRename,
    /// Type a character into the name
    InsertChar(char),
    /// Delete the last character of the name
    DeleteChar,

    // Project
    /// Renumber and save
    Save,
    /// Reopen the project from disk
    Reload,

    // UI
    /// Toggle help display
    ToggleHelp,
    /// Dismiss overlay or prompt
    Cancel,
    /// Quit application
    Quit,
}

impl EditorAction {
    /// Action for a configuration name (e.g. `move_up`)
    pub fn from_name(name: &str) -> Option<Self> {
        let action = match name.trim().to_ascii_lowercase().as_str() {
            "navigate_up" | "up" => EditorAction::NavigateUp,
            "navigate_down" | "down" => EditorAction::NavigateDown,
            "focus_sequences" => EditorAction::FocusSequences,
            "focus_song" => EditorAction::FocusSong,
            "move_up" => EditorAction::MoveUp,
            "move_down" => EditorAction::MoveDown,
            "clone_to_song" | "clone" => EditorAction::CloneToSong,
            "delete" | "delete_entry" => EditorAction::DeleteEntry,
            "repeat_up" => EditorAction::RepeatUp,
            "repeat_down" => EditorAction::RepeatDown,
            "rename" | "start_rename" => EditorAction::StartRename,
            "end_rename" => EditorAction::EndRename,
            "next_rename" => EditorAction::NextRename,
            "previous_rename" => EditorAction::PreviousRename,
            "save" => EditorAction::Save,
            "reload" | "reopen" => EditorAction::Reload,
            "help" | "toggle_help" => EditorAction::ToggleHelp,
            "cancel" => EditorAction::Cancel,
            "quit" => EditorAction::Quit,
            _ => return None,
        };
        Some(action)
    }

    /// Description for help display
    pub fn description(&self) -> String {
        match self {
            EditorAction::NavigateUp => "Select previous".to_string(),
            EditorAction::NavigateDown => "Select next".to_string(),
            EditorAction::FocusSequences => "Focus sequences".to_string(),
            EditorAction::FocusSong => "Focus song".to_string(),
            EditorAction::MoveUp => "Move up".to_string(),
            EditorAction::MoveDown => "Move down".to_string(),
            EditorAction::CloneToSong => "Add to song".to_string(),
            EditorAction::DeleteEntry => "Remove from song".to_string(),
            EditorAction::RepeatUp => "Repeat +1".to_string(),
            EditorAction::RepeatDown => "Repeat -1".to_string(),
            EditorAction::StartRename => "Rename".to_string(),
            EditorAction::EndRename => "Finish rename".to_string(),
            EditorAction::NextRename => "Rename next".to_string(),
            EditorAction::PreviousRename => "Rename previous".to_string(),
            EditorAction::InsertChar(c) => format!("Type '{}'", c),
            EditorAction::DeleteChar => "Delete character".to_string(),
            EditorAction::Save => "Save".to_string(),
            EditorAction::Reload => "Reload project".to_string(),
            EditorAction::ToggleHelp => "Toggle help".to_string(),
            EditorAction::Cancel => "Cancel".to_string(),
            EditorAction::Quit => "Quit".to_string(),
        }
    }

    /// Help category
    pub fn category(&self) -> &'static str {
        match self {
            EditorAction::NavigateUp
            | EditorAction::NavigateDown
            | EditorAction::FocusSequences
            | EditorAction::FocusSong => "Navigation",
            EditorAction::MoveUp
            | EditorAction::MoveDown
            | EditorAction::CloneToSong
            | EditorAction::DeleteEntry
            | EditorAction::RepeatUp
            | EditorAction::RepeatDown => "Arrange",
            EditorAction::StartRename
            | EditorAction::EndRename
            | EditorAction::NextRename
            | EditorAction::PreviousRename
            | EditorAction::InsertChar(_)
            | EditorAction::DeleteChar => "Rename",
            EditorAction::Save | EditorAction::Reload => "Project",
            EditorAction::ToggleHelp | EditorAction::Cancel | EditorAction::Quit => "UI",
        }
    }

    /// Check if this action changes the lists
    pub fn is_edit(&self) -> bool {
        matches!(self.category(), "Arrange" | "Rename")
    }
}
