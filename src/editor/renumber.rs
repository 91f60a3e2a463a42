// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Save-time renumbering.
//!
//! Sequences are numbered 1..=N in display order. Every pre-edit number
//! maps to its new number (identity entries included) so sequence files
//! can be moved in lockstep, and every song slot is translated to the
//! zero-based index of its sequence in the final order.

use super::{EditorError, SequenceListItem, SongEntry};
use crate::project::{NumberMapping, ProjectUpdate, SeqIndex, Sequence};

/// Compute the renumbered sequences, song steps and number mapping
///
/// Fails without producing anything if two items share a pre-edit number
/// or a song slot references a number no item had.
pub fn compute_save(
    sequences: &[SequenceListItem],
    song: &[SongEntry],
) -> Result<ProjectUpdate, EditorError> {
    let mut mapping = NumberMapping::new();
    let mut final_sequences = Vec::with_capacity(sequences.len());

    for (position, item) in sequences.iter().enumerate() {
        let number = position as u32 + 1;
        if mapping.insert(item.number(), number).is_some() {
            return Err(EditorError::DuplicateSequenceNumber(item.number()));
        }
        final_sequences.push(Sequence {
            number,
            active: item.is_active(),
            name: item.name().to_string(),
        });
    }

    let final_song = song
        .iter()
        .map(|entry| {
            let old = entry.sequence().number;
            let new = mapping.get(old).ok_or(EditorError::BrokenReference {
                entry: entry.id(),
                number: old,
            })?;
            // 1-based number to 0-based index
            Ok(SeqIndex::new(entry.repeat(), (new - 1) as usize))
        })
        .collect::<Result<Vec<_>, EditorError>>()?;

    Ok(ProjectUpdate {
        sequences: final_sequences,
        song: final_song,
        mapping,
    })
}
