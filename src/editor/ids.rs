// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Identities used by the editor.
//!
//! Sequences and song slots live in disjoint identifier spaces:
//! a `DisplayId` is derived from a sequence's number at load time, an
//! `EntryId` is issued by the `IdAllocator` when a song slot is created.
//! Neither can be built from the other.

use std::fmt;

/// Stable handle for a sequence within one loaded session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayId(String);

impl DisplayId {
    /// Identity for the sequence loaded with this number
    pub fn for_number(number: u32) -> Self {
        Self(number.to_string())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one slot in the song list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    /// Raw allocator value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot-{}", self.0)
    }
}

/// Issues song slot identities
///
/// Identities are never reused, including across project reloads, so a
/// stale `EntryId` can never address a slot of a newer session.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create a new allocator
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh identity
    pub fn allocate(&mut self) -> EntryId {
        self.next += 1;
        EntryId(self.next)
    }

    /// Number of identities issued so far
    pub fn issued(&self) -> u64 {
        self.next
    }
}

/// Payload of a drag into the song list
///
/// Tags whether the dragged item is a sequence (to be cloned into a new
/// slot) or an existing song slot (to be kept as is).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragItem {
    /// A sequence dragged from the sequence list
    SequenceRef(DisplayId),
    /// A slot already in the song list
    SongSlot(EntryId),
}
