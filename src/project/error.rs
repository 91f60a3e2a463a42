// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for loading and persisting projects.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while reading or writing project files
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Path does not name an `.xpj` project file
    #[error("Not a project file: {0:?}")]
    InvalidProjectPath(PathBuf),

    /// Sequences & songs document is missing from the data directory
    #[error("Sequences & songs document not found: {0:?}")]
    MissingDocument(PathBuf),

    /// Document could not be parsed or written
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    /// Sequence file is not a valid MIDI file
    #[error("MIDI error in sequence file: {0}")]
    Midi(#[from] midly::Error),

    /// Sequence file has no track to carry the name
    #[error("Sequence file has no tracks")]
    EmptySequenceFile,

    /// Sequence file could not be re-encoded
    #[error("Failed to encode sequence file: {0}")]
    Encode(#[source] io::Error),

    /// Mapping targets a number the update has no sequence for
    #[error("No sequence numbered {0} in the update")]
    MissingSequence(u32),
}

impl StoreError {
    /// Attach a path to an I/O error
    pub fn io(path: impl AsRef<Path>) -> impl FnOnce(io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        move |source| StoreError::Io { path, source }
    }
}
