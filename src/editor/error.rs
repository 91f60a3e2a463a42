// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for the sequence/song editor.

use thiserror::Error;

use super::{DisplayId, EntryId};
use crate::project::StoreError;

/// Errors that can occur while editing or saving
#[derive(Debug, Error)]
pub enum EditorError {
    /// A song slot references a sequence number missing from the mapping
    #[error("Song slot {entry} references sequence {number}, which is not in the number mapping")]
    BrokenReference { entry: EntryId, number: u32 },

    /// Two sequences share a number
    #[error("Sequence number {0} appears more than once")]
    DuplicateSequenceNumber(u32),

    /// A persisted song step points past the sequence array
    #[error("Song step {step} points at sequence index {index}, but there are only {count} sequences")]
    InvalidSongIndex {
        step: usize,
        index: usize,
        count: usize,
    },

    /// Reorder payload is not a permutation of the current list
    #[error("Reorder does not match the current {list} list")]
    InvalidReorder { list: &'static str },

    /// The sequence being renamed cannot change position
    #[error("Sequence {0} is being renamed and cannot be moved")]
    RenameInProgress(DisplayId),

    /// No sequence with this identity
    #[error("Unknown sequence {0}")]
    UnknownSequence(DisplayId),

    /// No song slot with this identity
    #[error("Unknown song slot {0}")]
    UnknownEntry(EntryId),

    /// Operation needs a loaded project
    #[error("No project loaded")]
    NoProject,

    /// Project on disk changed but could not be reloaded
    #[error("Project was saved but not reloaded; reopen it before saving again")]
    StaleProject,

    /// Saving or reloading failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),
}

impl EditorError {
    /// Check if this is an internal consistency failure rather than I/O
    pub fn is_consistency(&self) -> bool {
        matches!(
            self,
            EditorError::BrokenReference { .. } | EditorError::DuplicateSequenceNumber(_)
        )
    }
}
