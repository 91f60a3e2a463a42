// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sequence and song editor.
//!
//! This module provides:
//! - Sequence list: reorder and rename sequences
//! - Song list: arrange slots cloned from sequences, with repeat counts
//! - Rename cursor with wraparound
//! - Save-time renumbering and the editing session that ties them together

pub mod cursor;
pub mod error;
pub mod ids;
pub mod propagate;
pub mod renumber;
pub mod sequences;
pub mod song;

pub use cursor::{Direction, EditCursor};
pub use error::EditorError;
pub use ids::{DisplayId, DragItem, EntryId, IdAllocator};
pub use propagate::propagate_rename;
pub use renumber::compute_save;
pub use sequences::{SequenceList, SequenceListItem};
pub use song::{SequenceRef, SongEntry, SongList};

use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::project::{Project, ProjectStore, ProjectUpdate};

/// Rearrange `items` so their keys follow `order`
///
/// Returns false and leaves `items` alone unless `order` names every
/// item exactly once.
pub(crate) fn apply_order<T, K, F>(items: &mut Vec<T>, order: &[K], key: F) -> bool
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    if order.len() != items.len() {
        return false;
    }

    let index: HashMap<K, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (key(item), i))
        .collect();

    let mut taken = vec![false; items.len()];
    let mut positions = Vec::with_capacity(items.len());
    for k in order {
        match index.get(k) {
            Some(&i) if !taken[i] => {
                taken[i] = true;
                positions.push(i);
            }
            _ => return false,
        }
    }

    let mut slots: Vec<Option<T>> = items.drain(..).map(Some).collect();
    items.extend(positions.into_iter().filter_map(|i| slots[i].take()));
    true
}

/// Move the item at `from` so it ends up at `to`
pub(crate) fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    true
}

/// An editing session over one project
///
/// Owns both lists, the rename cursor and the slot allocator. Every
/// mutation goes through here so renames reach the song in the same call
/// and a reload replaces everything at once.
#[derive(Debug, Default)]
pub struct Editor {
    project: Option<Project>,
    sequences: SequenceList,
    song: SongList,
    cursor: EditCursor,
    ids: IdAllocator,
    /// Bumped on every successful (re)load
    generation: u64,
    /// Set when a save reached disk but the reload failed
    stale: bool,
}

impl Editor {
    /// Create an editor with no project
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor for a loaded project
    pub fn from_project(project: Project) -> Result<Self, EditorError> {
        let mut editor = Self::new();
        editor.reset(project)?;
        Ok(editor)
    }

    /// Load a project through the store and start editing it
    pub fn open<S: ProjectStore + ?Sized>(
        &mut self,
        store: &mut S,
        path: &Path,
    ) -> Result<(), EditorError> {
        let project = store.load(path)?;
        self.reset(project)
    }

    /// Replace both lists with the given project's
    ///
    /// Nothing changes if the project's song references sequences it does
    /// not have. Clears the rename cursor.
    pub fn reset(&mut self, project: Project) -> Result<(), EditorError> {
        let sequences = SequenceList::from_sequences(project.sequences())?;
        let song = SongList::from_records(project.song(), &sequences, &mut self.ids)?;

        self.sequences = sequences;
        self.song = song;
        self.cursor = EditCursor::new();
        self.project = Some(project);
        self.generation += 1;
        self.stale = false;

        info!(
            "Editing {} sequences, {} song slots (generation {})",
            self.sequences.len(),
            self.song.len(),
            self.generation
        );
        Ok(())
    }

    /// Get loaded project
    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// Get sequence list
    pub fn sequences(&self) -> &SequenceList {
        &self.sequences
    }

    /// Get song list
    pub fn song(&self) -> &SongList {
        &self.song
    }

    /// Get rename cursor
    pub fn cursor(&self) -> &EditCursor {
        &self.cursor
    }

    /// Load counter, bumped by every successful reset
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Check if the last save needs a reopen before saving again
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    // Sequence list

    /// Rearrange sequences to the given order
    ///
    /// The sequence being renamed must keep its position.
    pub fn reorder_sequences(&mut self, order: &[DisplayId]) -> Result<(), EditorError> {
        if let Some(id) = self.cursor.editing() {
            let target = order.iter().position(|other| other == id);
            if target.is_some() && target != self.sequences.position(id) {
                debug!("Sequence {} is being renamed, reorder refused", id);
                return Err(EditorError::RenameInProgress(id.clone()));
            }
        }
        self.sequences.reorder(order)
    }

    /// Drag one sequence to a new position
    ///
    /// Refused for the sequence being renamed.
    pub fn move_sequence(&mut self, from: usize, to: usize) -> bool {
        let Some(item) = self.sequences.get_at(from) else {
            return false;
        };
        if self.cursor.is_editing(item.id()) {
            debug!("Sequence {} is being renamed, not draggable", item.id());
            return false;
        }
        self.sequences.move_item(from, to)
    }

    /// Rename a sequence and every song slot that plays it
    ///
    /// Returns the number of song slots updated.
    pub fn rename_sequence(&mut self, id: &DisplayId, name: &str) -> Result<usize, EditorError> {
        self.sequences.set_name(id, name)?;
        Ok(propagate_rename(self.song.entries_mut(), id, name))
    }

    // Song list

    /// Rearrange song slots to the given order
    pub fn reorder_song(&mut self, order: &[EntryId]) -> Result<(), EditorError> {
        self.song.reorder(order)
    }

    /// Drag one song slot to a new position
    pub fn move_song_entry(&mut self, from: usize, to: usize) -> bool {
        self.song.move_entry(from, to)
    }

    /// Clone a sequence into the song at `at`
    pub fn insert_from_clone(&mut self, id: &DisplayId, at: usize) -> Result<EntryId, EditorError> {
        let source = self
            .sequences
            .get(id)
            .ok_or_else(|| EditorError::UnknownSequence(id.clone()))?;
        Ok(self.song.insert_from_clone(source, at, &mut self.ids))
    }

    /// Replace the song with the outcome of a drop
    ///
    /// Returns the identities of newly cloned slots.
    pub fn drop_into_song(&mut self, items: Vec<DragItem>) -> Vec<EntryId> {
        self.song.apply_drop(items, &self.sequences, &mut self.ids)
    }

    /// Remove one song slot
    pub fn delete_song_entry(&mut self, id: EntryId) -> Result<SongEntry, EditorError> {
        self.song.delete(id).ok_or(EditorError::UnknownEntry(id))
    }

    /// Change a slot's repeat count (never below 1)
    pub fn adjust_repeat(&mut self, id: EntryId, delta: i32) -> Result<u32, EditorError> {
        self.song.adjust_repeat(id, delta)
    }

    // Rename cursor

    /// Start renaming a sequence
    pub fn start_editing(&mut self, id: &DisplayId) -> Result<(), EditorError> {
        if self.sequences.get(id).is_none() {
            return Err(EditorError::UnknownSequence(id.clone()));
        }
        self.cursor.start(id.clone());
        Ok(())
    }

    /// Finish renaming
    pub fn end_editing(&mut self) -> Option<DisplayId> {
        self.cursor.end()
    }

    /// Move the rename to the next or previous sequence
    pub fn advance_editing(&mut self, direction: Direction) -> Option<DisplayId> {
        self.cursor
            .advance(direction, self.sequences.items())
            .cloned()
    }

    // Saving

    /// Compute what a save would write
    pub fn compute_save(&self) -> Result<ProjectUpdate, EditorError> {
        compute_save(self.sequences.items(), self.song.entries())
    }

    /// Check if the lists differ from the loaded project
    pub fn is_dirty(&self) -> bool {
        let Some(project) = &self.project else {
            return false;
        };
        match self.compute_save() {
            Ok(update) => {
                !update.mapping.is_identity()
                    || update.sequences.as_slice() != project.sequences()
                    || update.song.as_slice() != project.song()
            }
            Err(_) => true,
        }
    }

    /// Renumber, persist through the store, then reload
    ///
    /// On any failure the lists are left exactly as they were.
    pub fn save<S: ProjectStore + ?Sized>(&mut self, store: &mut S) -> Result<(), EditorError> {
        if self.stale {
            return Err(EditorError::StaleProject);
        }
        let project = self.project.as_ref().ok_or(EditorError::NoProject)?;

        let update = self.compute_save().map_err(|err| {
            error!("Save aborted: {}", err);
            err
        })?;
        if !update.mapping.is_identity() {
            info!("Renumbering {} sequences", update.mapping.len());
        }

        store.save(project, &update)?;

        let path = project.file_path().to_path_buf();
        let reloaded = match store.load(&path) {
            Ok(reloaded) => reloaded,
            Err(err) => {
                warn!("Saved {:?} but reload failed: {}", path, err);
                self.stale = true;
                return Err(err.into());
            }
        };
        self.reset(reloaded)
    }
}
