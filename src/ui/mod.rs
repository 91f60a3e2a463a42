// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal UI for the seqsort editor.
//!
//! Provides a ratatui-based terminal interface with the sequence list and
//! the song side by side. Dragging is done from the keyboard: items move
//! one place at a time and sequences are cloned into the song.

mod sequences;
mod song;

pub use sequences::SequencesWidget;
pub use song::SongWidget;

use std::io::{self, Stdout};
use std::ops::Range;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::{error, info};

use crate::control::{format_shortcut, EditorAction, KeyboardController};
use crate::editor::{Direction, Editor};
use crate::project::ProjectStore;

/// Which list has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    /// Sequence list
    #[default]
    Sequences,
    /// Song list
    Song,
}

/// UI state for the editor screen
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Focused pane
    pub focus: Pane,
    /// Selected row in the sequence list
    pub sequence_selected: usize,
    /// Selected row in the song
    pub song_selected: usize,
    /// Help text visible
    pub show_help: bool,
    /// Quit was requested with unsaved changes
    pub confirm_quit: bool,
    /// Reload was requested with unsaved changes
    pub confirm_reload: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
}

impl UiState {
    /// Set a status message that will be displayed temporarily
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_time = Some(Instant::now());
    }

    /// Clear expired status message
    pub fn clear_expired_status(&mut self) {
        if let Some(time) = self.status_time {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_time = None;
            }
        }
    }

    /// Keep both selections inside their lists
    pub fn clamp_selection(&mut self, editor: &Editor) {
        self.sequence_selected = clamp_index(self.sequence_selected, editor.sequences().len());
        self.song_selected = clamp_index(self.song_selected, editor.song().len());
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Rows of a list that fit in `height`, scrolled to keep `selected` visible
pub(crate) fn visible_range(len: usize, selected: Option<usize>, height: usize) -> Range<usize> {
    if len == 0 || height == 0 {
        return 0..0;
    }
    let selected = selected.unwrap_or(0).min(len - 1);
    let start = (selected + 1).saturating_sub(height);
    start..(start + height).min(len)
}

/// Apply one action to the editor
///
/// Returns false when the application should exit.
pub fn handle_action(
    state: &mut UiState,
    editor: &mut Editor,
    store: &mut dyn ProjectStore,
    action: EditorAction,
) -> bool {
    if action != EditorAction::Quit {
        state.confirm_quit = false;
    }
    if action != EditorAction::Reload {
        state.confirm_reload = false;
    }

    match action {
        EditorAction::NavigateUp => match state.focus {
            Pane::Sequences => state.sequence_selected = state.sequence_selected.saturating_sub(1),
            Pane::Song => state.song_selected = state.song_selected.saturating_sub(1),
        },
        EditorAction::NavigateDown => match state.focus {
            Pane::Sequences => state.sequence_selected += 1,
            Pane::Song => state.song_selected += 1,
        },
        EditorAction::FocusSequences => state.focus = Pane::Sequences,
        EditorAction::FocusSong => state.focus = Pane::Song,

        EditorAction::MoveUp | EditorAction::MoveDown => {
            let up = action == EditorAction::MoveUp;
            let (from, len) = match state.focus {
                Pane::Sequences => (state.sequence_selected, editor.sequences().len()),
                Pane::Song => (state.song_selected, editor.song().len()),
            };
            let to = if up { from.checked_sub(1) } else { Some(from + 1).filter(|&to| to < len) };
            if let Some(to) = to {
                let moved = match state.focus {
                    Pane::Sequences => editor.move_sequence(from, to),
                    Pane::Song => editor.move_song_entry(from, to),
                };
                if moved {
                    match state.focus {
                        Pane::Sequences => state.sequence_selected = to,
                        Pane::Song => state.song_selected = to,
                    }
                } else if state.focus == Pane::Sequences && editor.cursor().is_active() {
                    state.set_status("Finish renaming before moving this sequence");
                }
            }
        }

        EditorAction::CloneToSong => {
            if state.focus != Pane::Sequences {
                state.set_status("Select a sequence to add it to the song");
            } else if let Some(item) = editor.sequences().get_at(state.sequence_selected) {
                let id = item.id().clone();
                let at = if editor.song().is_empty() {
                    0
                } else {
                    state.song_selected + 1
                };
                match editor.insert_from_clone(&id, at) {
                    Ok(entry) => {
                        if let Some(position) = editor.song().position(entry) {
                            state.song_selected = position;
                        }
                        state.set_status(format!("Added {} to song", id));
                    }
                    Err(err) => state.set_status(err.to_string()),
                }
            }
        }

        EditorAction::DeleteEntry | EditorAction::RepeatUp | EditorAction::RepeatDown => {
            if state.focus != Pane::Song {
                state.set_status("Focus the song to change slots");
                return true;
            }
            let Some(entry) = editor.song().get_at(state.song_selected).map(|entry| entry.id()) else {
                state.set_status("Song is empty");
                state.clamp_selection(editor);
                return true;
            };
            let result = match action {
                EditorAction::DeleteEntry => editor.delete_song_entry(entry).map(|removed| {
                    format!("Removed {} from song", removed.name())
                }),
                EditorAction::RepeatUp => editor
                    .adjust_repeat(entry, 1)
                    .map(|repeat| format!("Repeat x{}", repeat)),
                _ => editor
                    .adjust_repeat(entry, -1)
                    .map(|repeat| format!("Repeat x{}", repeat)),
            };
            match result {
                Ok(message) => state.set_status(message),
                Err(err) => state.set_status(err.to_string()),
            }
        }

        EditorAction::StartRename => {
            if state.focus != Pane::Sequences {
                state.set_status("Select a sequence to rename it");
            } else if let Some(item) = editor.sequences().get_at(state.sequence_selected) {
                let id = item.id().clone();
                if let Err(err) = editor.start_editing(&id) {
                    state.set_status(err.to_string());
                }
            }
        }
        EditorAction::EndRename => {
            editor.end_editing();
        }
        EditorAction::NextRename | EditorAction::PreviousRename => {
            let direction = if action == EditorAction::NextRename {
                Direction::Forward
            } else {
                Direction::Backward
            };
            if let Some(id) = editor.advance_editing(direction) {
                if let Some(position) = editor.sequences().position(&id) {
                    state.sequence_selected = position;
                }
            }
        }
        EditorAction::InsertChar(_) | EditorAction::DeleteChar => {
            let Some(id) = editor.cursor().editing().cloned() else {
                return true;
            };
            let Some(mut name) = editor.sequences().get(&id).map(|item| item.name().to_string())
            else {
                return true;
            };
            match action {
                EditorAction::InsertChar(c) => name.push(c),
                _ => {
                    name.pop();
                }
            }
            if let Err(err) = editor.rename_sequence(&id, &name) {
                state.set_status(err.to_string());
            }
        }

        EditorAction::Save => match editor.save(store) {
            Ok(()) => state.set_status("Saved"),
            Err(err) => {
                error!("Save failed: {}", err);
                state.set_status(format!("Save failed: {}", err));
            }
        },

        EditorAction::Reload => {
            // A stale session already matches what is on disk
            if editor.is_dirty() && !editor.is_stale() && !state.confirm_reload {
                state.confirm_reload = true;
                state.set_status("Unsaved changes: reload again to discard them");
            } else {
                state.confirm_reload = false;
                let Some(path) = editor.project().map(|project| project.file_path().to_path_buf())
                else {
                    state.set_status("No project loaded");
                    return true;
                };
                match editor.open(store, &path) {
                    Ok(()) => {
                        info!("Reloaded {:?}", path);
                        state.set_status("Reloaded");
                    }
                    Err(err) => {
                        error!("Reload failed: {}", err);
                        state.set_status(format!("Reload failed: {}", err));
                    }
                }
            }
        }

        EditorAction::ToggleHelp => state.show_help = !state.show_help,
        EditorAction::Cancel => {
            state.show_help = false;
            state.status_message = None;
        }
        EditorAction::Quit => {
            if editor.is_dirty() && !state.confirm_quit {
                state.confirm_quit = true;
                state.set_status("Unsaved changes: quit again to discard them");
            } else {
                return false;
            }
        }
    }

    state.clamp_selection(editor);
    true
}

/// Terminal UI application
pub struct App {
    /// UI state
    state: UiState,
    /// Key bindings
    keyboard: KeyboardController,
    /// Terminal handle
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Target frame rate
    frame_rate: u32,
}

impl App {
    /// Create a new app
    pub fn new(keyboard: KeyboardController) -> io::Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            state: UiState::default(),
            keyboard,
            terminal,
            frame_rate: 30,
        })
    }

    /// Set frame rate
    pub fn set_frame_rate(&mut self, fps: u32) {
        self.frame_rate = fps.clamp(1, 120);
    }

    /// Get UI state
    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Run until the user quits
    pub fn run(&mut self, editor: &mut Editor, store: &mut dyn ProjectStore) -> io::Result<()> {
        info!("UI started");
        loop {
            self.draw(editor)?;

            if let Some(Event::Key(key)) = self.poll_event()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = if editor.cursor().is_active() {
                    self.keyboard.process_text_key(key.code, key.modifiers)
                } else {
                    self.keyboard.process_key(key.code, key.modifiers)
                };
                if let Some(action) = action {
                    if !handle_action(&mut self.state, editor, store, action) {
                        break;
                    }
                }
            }

            self.state.clear_expired_status();
        }
        info!("UI stopped");
        Ok(())
    }

    /// Poll for events with timeout
    pub fn poll_event(&self) -> io::Result<Option<Event>> {
        let timeout = Duration::from_millis(1000 / self.frame_rate as u64);
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, editor: &Editor) -> io::Result<()> {
        let state = &self.state;
        let keyboard = &self.keyboard;

        self.terminal.draw(|frame| {
            let area = frame.area();

            // Main layout: header, panes, status
            let chunks = Layout::default()
                .direction(LayoutDirection::Vertical)
                .constraints([
                    Constraint::Length(3), // Project
                    Constraint::Min(5),    // Lists
                    Constraint::Length(1), // Status bar
                ])
                .split(area);

            render_header(frame, chunks[0], editor);

            let panes = Layout::default()
                .direction(LayoutDirection::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[1]);

            let sequences = SequencesWidget::new(editor.sequences().items())
                .selected(Some(state.sequence_selected))
                .editing(editor.cursor().editing())
                .block(pane_block(" Sequences ", state.focus == Pane::Sequences));
            frame.render_widget(sequences, panes[0]);

            let song = SongWidget::new(editor.song().entries())
                .selected(Some(state.song_selected))
                .block(pane_block(" Song ", state.focus == Pane::Song));
            frame.render_widget(song, panes[1]);

            render_status_bar(frame, chunks[2], state, editor);

            // Help overlay
            if state.show_help {
                render_help_overlay(frame, area, keyboard);
            }
        })?;

        Ok(())
    }

    /// Cleanup terminal on drop
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn pane_block(title: &'static str, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

/// Render project header
fn render_header(frame: &mut Frame, area: Rect, editor: &Editor) {
    let block = Block::default().borders(Borders::ALL).title(" seqsort ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let path = editor
        .project()
        .map(|project| project.file_path().display().to_string())
        .unwrap_or_else(|| "No project".to_string());

    let mut spans = vec![
        Span::styled(path, Style::default().fg(Color::Cyan)),
        Span::raw(format!(
            "  {} sequences, {} song slots",
            editor.sequences().len(),
            editor.song().len()
        )),
    ];
    if editor.is_stale() {
        spans.push(Span::styled(
            "  [reopen needed]",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    } else if editor.is_dirty() {
        spans.push(Span::styled(
            "  [modified]",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// Render status bar
fn render_status_bar(frame: &mut Frame, area: Rect, state: &UiState, editor: &Editor) {
    let text = if let Some(ref msg) = state.status_message {
        Span::styled(msg, Style::default().fg(Color::Yellow))
    } else if editor.cursor().is_active() {
        Span::styled(
            " Type to rename | Tab/Shift+Tab: Next/Previous | Enter/Esc: Done",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(
            " Shift+↑/↓: Move | Enter: Add to song | +/-: Repeat | e: Rename | s: Save | h: Help | q: Quit",
            Style::default().fg(Color::DarkGray),
        )
    };

    frame.render_widget(Paragraph::new(text), area);
}

/// Render help overlay from the active key bindings
fn render_help_overlay(frame: &mut Frame, area: Rect, keyboard: &KeyboardController) {
    let grouped = keyboard.bindings_by_category();
    let mut categories: Vec<_> = grouped.into_iter().collect();
    categories.sort_by(|a, b| a.0.cmp(&b.0));

    let mut help_text = Vec::new();
    for (category, mut bindings) in categories {
        bindings.sort_by_key(|binding| format_shortcut(&binding.shortcut));
        if !help_text.is_empty() {
            help_text.push(Line::from(""));
        }
        help_text.push(Line::from(Span::styled(
            category,
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for binding in bindings {
            help_text.push(Line::from(format!(
                "  {:<12} {}",
                format_shortcut(&binding.shortcut),
                binding.description
            )));
        }
    }

    // Calculate centered area
    let width = 50.min(area.width.saturating_sub(4));
    let height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    let help_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);
    frame.render_widget(Paragraph::new(help_text), inner);
}
