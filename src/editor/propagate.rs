// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Keeps song slot names in step with sequence renames.

use super::{DisplayId, SongEntry};

/// Copy a sequence's new name into every slot that references it
///
/// Returns the number of slots updated. Slots referencing other sequences
/// are untouched, and applying the same rename twice changes nothing.
pub fn propagate_rename(entries: &mut [SongEntry], id: &DisplayId, name: &str) -> usize {
    let mut updated = 0;
    for entry in entries.iter_mut().filter(|entry| &entry.sequence.display_id == id) {
        if entry.sequence.name != name {
            entry.sequence.name = name.to_string();
        }
        updated += 1;
    }
    updated
}
