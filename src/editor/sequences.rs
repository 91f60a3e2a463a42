// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sequence list model.
//!
//! Ordered collection of the project's sequences as the user arranges
//! them. Each item keeps the sequence it was loaded with (including its
//! pre-edit number) plus the `DisplayId` song slots refer to it by.

use std::collections::HashSet;

use super::{apply_order, move_item, DisplayId, EditorError};
use crate::project::Sequence;

/// A sequence in the editor's list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceListItem {
    id: DisplayId,
    sequence: Sequence,
}

impl SequenceListItem {
    /// Wrap a loaded sequence; its identity comes from its number
    pub fn new(sequence: Sequence) -> Self {
        Self {
            id: DisplayId::for_number(sequence.number),
            sequence,
        }
    }

    /// Get identity
    pub fn id(&self) -> &DisplayId {
        &self.id
    }

    /// Get the wrapped sequence
    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Number the sequence had when the project was loaded
    pub fn number(&self) -> u32 {
        self.sequence.number
    }

    /// Get name
    pub fn name(&self) -> &str {
        &self.sequence.name
    }

    /// Check if active
    pub fn is_active(&self) -> bool {
        self.sequence.active
    }
}

/// Ordered list of sequences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceList {
    items: Vec<SequenceListItem>,
}

impl SequenceList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the list from persisted sequences, keeping their order
    pub fn from_sequences(sequences: &[Sequence]) -> Result<Self, EditorError> {
        let mut seen = HashSet::with_capacity(sequences.len());
        for sequence in sequences {
            if !seen.insert(sequence.number) {
                return Err(EditorError::DuplicateSequenceNumber(sequence.number));
            }
        }

        Ok(Self {
            items: sequences.iter().cloned().map(SequenceListItem::new).collect(),
        })
    }

    /// Items in display order
    pub fn items(&self) -> &[SequenceListItem] {
        &self.items
    }

    /// Number of sequences
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by identity
    pub fn get(&self, id: &DisplayId) -> Option<&SequenceListItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Get item at display position
    pub fn get_at(&self, index: usize) -> Option<&SequenceListItem> {
        self.items.get(index)
    }

    /// Display position of an item
    pub fn position(&self, id: &DisplayId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    /// Identities in display order
    pub fn ids(&self) -> Vec<DisplayId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Rearrange to the given order
    ///
    /// `order` must name every current item exactly once; otherwise the
    /// list is left untouched.
    pub fn reorder(&mut self, order: &[DisplayId]) -> Result<(), EditorError> {
        if apply_order(&mut self.items, order, |item| item.id.clone()) {
            Ok(())
        } else {
            Err(EditorError::InvalidReorder { list: "sequence" })
        }
    }

    /// Move one item to a new position
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        move_item(&mut self.items, from, to)
    }

    /// Set a sequence's name
    ///
    /// Only reachable through the editor, which propagates the new name
    /// to the song in the same call.
    pub(super) fn set_name(&mut self, id: &DisplayId, name: &str) -> Result<(), EditorError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| EditorError::UnknownSequence(id.clone()))?;
        item.sequence.name = name.to_string();
        Ok(())
    }
}
