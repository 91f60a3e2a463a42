// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Inline rename cursor.

use tracing::warn;

use super::{DisplayId, SequenceListItem};

/// Direction for moving the rename cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Next item, wrapping to the first
    Forward,
    /// Previous item, wrapping to the last
    Backward,
}

/// Tracks which sequence, if any, is being renamed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditCursor {
    editing: Option<DisplayId>,
}

impl EditCursor {
    /// Create an idle cursor
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence being renamed
    pub fn editing(&self) -> Option<&DisplayId> {
        self.editing.as_ref()
    }

    /// Check if any sequence is being renamed
    pub fn is_active(&self) -> bool {
        self.editing.is_some()
    }

    /// Check if this sequence is being renamed
    pub fn is_editing(&self, id: &DisplayId) -> bool {
        self.editing.as_ref() == Some(id)
    }

    /// Start renaming a sequence, ending any other rename
    pub fn start(&mut self, id: DisplayId) {
        self.editing = Some(id);
    }

    /// Stop renaming, returning the sequence that was being edited
    pub fn end(&mut self) -> Option<DisplayId> {
        self.editing.take()
    }

    /// Move the rename to the next or previous sequence in display order
    ///
    /// Does nothing if idle or the list is empty. If the edited sequence is
    /// no longer in the list the cursor is reset instead.
    pub fn advance(&mut self, direction: Direction, items: &[SequenceListItem]) -> Option<&DisplayId> {
        let current = self.editing.as_ref()?;
        let len = items.len();
        if len == 0 {
            return None;
        }

        let Some(index) = items.iter().position(|item| item.id() == current) else {
            warn!("Rename cursor lost sequence {}, resetting", current);
            self.editing = None;
            return None;
        };

        let next = match direction {
            Direction::Forward => (index + 1) % len,
            Direction::Backward => (index + len - 1) % len,
        };
        self.editing = Some(items[next].id().clone());
        self.editing.as_ref()
    }
}
