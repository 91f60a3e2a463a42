// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song list widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use super::visible_range;
use crate::editor::SongEntry;

/// Widget for displaying the song's slots in play order
pub struct SongWidget<'a> {
    entries: &'a [SongEntry],
    selected: Option<usize>,
    block: Option<Block<'a>>,
}

impl<'a> SongWidget<'a> {
    /// Create a new song widget
    pub fn new(entries: &'a [SongEntry]) -> Self {
        Self {
            entries,
            selected: None,
            block: None,
        }
    }

    /// Set selected row
    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for SongWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if self.entries.is_empty() {
            Paragraph::new("Song is empty")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }

        let rows = visible_range(self.entries.len(), self.selected, area.height as usize);
        for (row, index) in rows.enumerate() {
            let row_area = Rect::new(area.x, area.y + row as u16, area.width, 1);
            let selected = self.selected == Some(index);
            render_song_row(row_area, buf, index, &self.entries[index], selected);
        }
    }
}

/// Render a single song slot
fn render_song_row(area: Rect, buf: &mut Buffer, step: usize, entry: &SongEntry, selected: bool) {
    let (marker, marker_style) = if selected {
        (">", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    } else {
        (" ", Style::default().fg(Color::DarkGray))
    };

    let name_style = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let repeat_style = if entry.repeat() > 1 {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let line = Line::from(vec![
        Span::styled(marker, marker_style),
        Span::styled(format!("{:>3} ", step + 1), Style::default().fg(Color::Cyan)),
        Span::styled(entry.name().to_string(), name_style),
        Span::styled(format!(" x{}", entry.repeat()), repeat_style),
    ]);
    Paragraph::new(line).render(area, buf);
}
