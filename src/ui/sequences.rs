// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sequence list widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use super::visible_range;
use crate::editor::{DisplayId, SequenceListItem};

/// Widget for displaying the sequence list in display order
pub struct SequencesWidget<'a> {
    items: &'a [SequenceListItem],
    selected: Option<usize>,
    editing: Option<&'a DisplayId>,
    block: Option<Block<'a>>,
}

impl<'a> SequencesWidget<'a> {
    /// Create a new sequences widget
    pub fn new(items: &'a [SequenceListItem]) -> Self {
        Self {
            items,
            selected: None,
            editing: None,
            block: None,
        }
    }

    /// Set selected row
    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    /// Set the sequence being renamed
    pub fn editing(mut self, id: Option<&'a DisplayId>) -> Self {
        self.editing = id;
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for SequencesWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if self.items.is_empty() {
            Paragraph::new("No sequences")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }

        let rows = visible_range(self.items.len(), self.selected, area.height as usize);
        for (row, index) in rows.enumerate() {
            let item = &self.items[index];
            let row_area = Rect::new(area.x, area.y + row as u16, area.width, 1);
            let selected = self.selected == Some(index);
            let editing = self.editing == Some(item.id());
            render_sequence_row(row_area, buf, index, item, selected, editing);
        }
    }
}

/// Render a single sequence row
fn render_sequence_row(
    area: Rect,
    buf: &mut Buffer,
    position: usize,
    item: &SequenceListItem,
    selected: bool,
    editing: bool,
) {
    let marker = if selected { ">" } else { " " };
    let marker_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let name_style = if editing {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if !item.is_active() {
        Style::default().fg(Color::DarkGray)
    } else if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let name = if editing {
        format!("{}_", item.name())
    } else {
        item.name().to_string()
    };

    // New number on the left, number as loaded on the right
    let line = Line::from(vec![
        Span::styled(marker, marker_style),
        Span::styled(format!("{:>3} ", position + 1), Style::default().fg(Color::Cyan)),
        Span::styled(name, name_style),
        Span::styled(
            format!("  (was {})", item.number()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    Paragraph::new(line).render(area, buf);
}
