// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song list model.
//!
//! Ordered arrangement of song slots. Each slot references a sequence by
//! its `DisplayId` and carries a repeat count; one sequence may fill any
//! number of slots.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::{
    apply_order, move_item, DisplayId, DragItem, EditorError, EntryId, IdAllocator,
    SequenceList, SequenceListItem,
};
use crate::project::SeqIndex;

/// What a song slot knows about the sequence it plays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRef {
    /// Identity of the referenced sequence
    pub display_id: DisplayId,
    /// Name shown for the slot
    pub name: String,
    /// Pre-edit number of the referenced sequence
    pub number: u32,
}

impl SequenceRef {
    /// Snapshot a sequence list item
    pub fn from_item(item: &SequenceListItem) -> Self {
        Self {
            display_id: item.id().clone(),
            name: item.name().to_string(),
            number: item.number(),
        }
    }
}

/// One slot of the song
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongEntry {
    pub(super) id: EntryId,
    pub(super) repeat: u32,
    pub(super) sequence: SequenceRef,
}

impl SongEntry {
    fn new(id: EntryId, repeat: u32, sequence: SequenceRef) -> Self {
        Self {
            id,
            repeat: repeat.max(1),
            sequence,
        }
    }

    /// Get slot identity
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Get repeat count (always at least 1)
    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    /// Get the referenced sequence
    pub fn sequence(&self) -> &SequenceRef {
        &self.sequence
    }

    /// Get display name
    pub fn name(&self) -> &str {
        &self.sequence.name
    }
}

/// Ordered list of song slots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongList {
    entries: Vec<SongEntry>,
}

impl SongList {
    /// Create an empty song
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the song from persisted steps
    ///
    /// Each step's index is resolved against the sequence list as loaded.
    /// Repeat counts below 1 are raised to 1.
    pub fn from_records(
        records: &[SeqIndex],
        sequences: &SequenceList,
        ids: &mut IdAllocator,
    ) -> Result<Self, EditorError> {
        let mut entries = Vec::with_capacity(records.len());

        for (step, record) in records.iter().enumerate() {
            let item = sequences
                .get_at(record.value)
                .ok_or(EditorError::InvalidSongIndex {
                    step,
                    index: record.value,
                    count: sequences.len(),
                })?;
            if record.repeat == 0 {
                debug!("Song step {} has repeat 0, using 1", step);
            }
            entries.push(SongEntry::new(
                ids.allocate(),
                record.repeat,
                SequenceRef::from_item(item),
            ));
        }

        Ok(Self { entries })
    }

    /// Slots in song order
    pub fn entries(&self) -> &[SongEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [SongEntry] {
        &mut self.entries
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a slot
    pub fn get(&self, id: EntryId) -> Option<&SongEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Get slot at position
    pub fn get_at(&self, index: usize) -> Option<&SongEntry> {
        self.entries.get(index)
    }

    /// Position of a slot
    pub fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Slot identities in song order
    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    /// Slots that play the given sequence
    pub fn references<'a>(&'a self, id: &'a DisplayId) -> impl Iterator<Item = &'a SongEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| &entry.sequence.display_id == id)
    }

    /// Rearrange to the given order
    ///
    /// `order` must name every current slot exactly once; otherwise the
    /// song is left untouched.
    pub fn reorder(&mut self, order: &[EntryId]) -> Result<(), EditorError> {
        if apply_order(&mut self.entries, order, |entry| entry.id) {
            Ok(())
        } else {
            Err(EditorError::InvalidReorder { list: "song" })
        }
    }

    /// Move one slot to a new position
    pub fn move_entry(&mut self, from: usize, to: usize) -> bool {
        move_item(&mut self.entries, from, to)
    }

    /// Clone a sequence into a new slot at `at` (clamped to the end)
    pub fn insert_from_clone(
        &mut self,
        source: &SequenceListItem,
        at: usize,
        ids: &mut IdAllocator,
    ) -> EntryId {
        let entry = SongEntry::new(ids.allocate(), 1, SequenceRef::from_item(source));
        let id = entry.id;
        let at = at.min(self.entries.len());
        self.entries.insert(at, entry);
        debug!("Cloned sequence {} into {} at {}", source.id(), id, at);
        id
    }

    /// Replace the song with the result of a drop
    ///
    /// `SongSlot` items keep their existing slot, `SequenceRef` items
    /// become fresh clones. Items naming nothing that exists are dropped.
    /// Returns the identities of the slots created.
    pub fn apply_drop(
        &mut self,
        items: Vec<DragItem>,
        sequences: &SequenceList,
        ids: &mut IdAllocator,
    ) -> Vec<EntryId> {
        let mut existing: HashMap<EntryId, SongEntry> =
            self.entries.drain(..).map(|entry| (entry.id, entry)).collect();
        let mut created = Vec::new();

        for item in items {
            match item {
                DragItem::SongSlot(id) => match existing.remove(&id) {
                    Some(entry) => self.entries.push(entry),
                    None => warn!("Dropped unknown or repeated song slot {}", id),
                },
                DragItem::SequenceRef(display_id) => match sequences.get(&display_id) {
                    Some(source) => {
                        let entry =
                            SongEntry::new(ids.allocate(), 1, SequenceRef::from_item(source));
                        created.push(entry.id);
                        self.entries.push(entry);
                    }
                    None => warn!("Dropped unknown sequence {}", display_id),
                },
            }
        }

        if !existing.is_empty() {
            debug!("Drop removed {} song slots", existing.len());
        }
        created
    }

    /// Remove exactly one slot
    pub fn delete(&mut self, id: EntryId) -> Option<SongEntry> {
        let index = self.position(id)?;
        Some(self.entries.remove(index))
    }

    /// Change a slot's repeat count, never going below 1
    pub fn adjust_repeat(&mut self, id: EntryId, delta: i32) -> Result<u32, EditorError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(EditorError::UnknownEntry(id))?;

        let repeat = (i64::from(entry.repeat) + i64::from(delta)).clamp(1, i64::from(u32::MAX));
        entry.repeat = repeat as u32;
        Ok(entry.repeat)
    }
}
