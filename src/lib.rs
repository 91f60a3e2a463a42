// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! seqsort - sequence and song arranger for MPC projects.
//!
//! Reorders a project's sequences, renames them, arranges the song from
//! sequence clones and writes everything back renumbered: the sequences &
//! songs document and every `.sxq` sequence file move together.

pub mod config;
pub mod control;
pub mod editor;
pub mod project;
pub mod ui;

pub use config::EditorConfig;
pub use editor::{Editor, EditorError};
pub use project::{FsProjectStore, Project, ProjectStore, StoreError};
