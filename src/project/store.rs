// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Loading and persisting projects.
//!
//! `ProjectStore` is the seam the editor saves through. `FsProjectStore`
//! is the on-disk implementation: it backs up the document and every
//! sequence file, writes the renumbered document, moves each sequence
//! file to its new number (retitled with the sequence's final name) and
//! restores the backup if any step fails.

use std::fs;
use std::path::{Path, PathBuf};

use rand::{distributions::Alphanumeric, thread_rng, Rng};
use tracing::{debug, error, info, warn};

use super::{sxq, Project, ProjectUpdate, Sequence, StoreError, MpcDocument};

/// Default name of the sequences & songs document
pub const DEFAULT_DOCUMENT_NAME: &str = "All Sequences & Songs.xal";

const PROJECT_EXTENSION: &str = "xpj";
const DATA_DIR_SUFFIX: &str = "_[ProjectData]";

/// Loads and persists projects for the editor
pub trait ProjectStore {
    /// Load the project whose `.xpj` file is at `path`
    fn load(&mut self, path: &Path) -> Result<Project, StoreError>;

    /// Persist an update computed against `project`
    ///
    /// Must be all-or-nothing: on error the project on disk is left as it
    /// was before the call.
    fn save(&mut self, project: &Project, update: &ProjectUpdate) -> Result<(), StoreError>;
}

/// Locations that make up a project on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Directory containing the `.xpj` file
    pub root: PathBuf,
    /// `<name>_[ProjectData]` directory next to the `.xpj` file
    pub data_dir: PathBuf,
    /// The `.xpj` file itself
    pub file_path: PathBuf,
}

impl ProjectPaths {
    /// Derive project locations from the path of a `.xpj` file
    pub fn from_project_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file_path = path.as_ref().to_path_buf();
        let invalid = || StoreError::InvalidProjectPath(file_path.clone());

        let is_project = file_path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case(PROJECT_EXTENSION))
            .unwrap_or(false);
        if !is_project {
            return Err(invalid());
        }

        let stem = file_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(invalid)?;
        let root = file_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let data_dir = root.join(format!("{}{}", stem, DATA_DIR_SUFFIX));

        Ok(Self {
            root,
            data_dir,
            file_path,
        })
    }

    /// Path of a sequence file
    pub fn sequence_file(&self, number: u32) -> PathBuf {
        self.data_dir.join(sxq::file_name(number))
    }
}

/// Filesystem-backed project store
#[derive(Debug, Clone)]
pub struct FsProjectStore {
    /// Name of the sequences & songs document inside the data directory
    document_name: String,
    /// Where backup directories are created (None = system temp dir)
    backup_root: Option<PathBuf>,
    /// Keep the backup after a successful save
    keep_backup: bool,
}

impl FsProjectStore {
    /// Create a store with default settings
    pub fn new() -> Self {
        Self {
            document_name: DEFAULT_DOCUMENT_NAME.to_string(),
            backup_root: None,
            keep_backup: false,
        }
    }

    /// Builder: set document name
    pub fn with_document_name(mut self, name: impl Into<String>) -> Self {
        self.document_name = name.into();
        self
    }

    /// Builder: set backup root directory
    pub fn with_backup_root(mut self, root: Option<PathBuf>) -> Self {
        self.backup_root = root;
        self
    }

    /// Builder: keep backups after successful saves
    pub fn keep_backup(mut self, keep: bool) -> Self {
        self.keep_backup = keep;
        self
    }

    /// Get document name
    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    /// Path of the document for a project
    pub fn document_path(&self, paths: &ProjectPaths) -> PathBuf {
        paths.data_dir.join(&self.document_name)
    }

    fn backup_root(&self) -> PathBuf {
        self.backup_root.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Write the new document and move sequence files to their new numbers
    fn write_update(
        &self,
        project: &Project,
        xml: &str,
        update: &ProjectUpdate,
        backup: &Backup,
        written: &mut Vec<PathBuf>,
    ) -> Result<(), StoreError> {
        let paths = &project.paths;

        for &number in &backup.sequence_numbers {
            let path = paths.sequence_file(number);
            fs::remove_file(&path).map_err(StoreError::io(&path))?;
        }

        let document_path = self.document_path(paths);
        fs::write(&document_path, xml).map_err(StoreError::io(&document_path))?;
        debug!("Wrote {:?}", document_path);

        for (old, new) in update.mapping.iter() {
            if !backup.has_sequence(old) {
                warn!("Sequence {} has no {} file, skipping", old, sxq::file_name(old));
                continue;
            }

            let sequence = find_sequence(&update.sequences, new)?;
            let source = backup.sequence_file(old);
            let bytes = fs::read(&source).map_err(StoreError::io(&source))?;
            let retitled = sxq::retitle(&bytes, &sequence.name)?;

            let target = paths.sequence_file(new);
            fs::write(&target, retitled).map_err(StoreError::io(&target))?;
            written.push(target);
            debug!(
                "Moved {} -> {} as '{}'",
                sxq::file_name(old),
                sxq::file_name(new),
                sequence.name
            );
        }

        Ok(())
    }
}

impl Default for FsProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectStore for FsProjectStore {
    fn load(&mut self, path: &Path) -> Result<Project, StoreError> {
        let paths = ProjectPaths::from_project_file(path)?;
        let document_path = self.document_path(&paths);
        if !document_path.is_file() {
            return Err(StoreError::MissingDocument(document_path));
        }

        let xml = fs::read_to_string(&document_path).map_err(StoreError::io(&document_path))?;
        let document = MpcDocument::from_xml(&xml)?;
        info!(
            "Loaded {:?}: {} sequences, {} song steps",
            paths.file_path,
            document.sequences().len(),
            document.song().len()
        );

        Ok(Project::new(paths, document))
    }

    fn save(&mut self, project: &Project, update: &ProjectUpdate) -> Result<(), StoreError> {
        // Serialize first so a bad document never touches the disk
        let xml = project.document.with_update(update).to_xml()?;

        let backup = Backup::create(
            &self.backup_root(),
            &self.document_path(&project.paths),
            project,
            update,
        )?;
        info!("Backed up project to {:?}", backup.dir);

        let mut written = Vec::new();
        match self.write_update(project, &xml, update, &backup, &mut written) {
            Ok(()) => {
                info!(
                    "Saved {:?}: {} sequences renumbered",
                    project.file_path(),
                    update.mapping.len()
                );
                // The project is already renumbered; a leftover backup must not fail the save
                backup.finish(self.keep_backup);
                Ok(())
            }
            Err(err) => {
                error!("Save failed, restoring backup: {}", err);
                if let Err(restore_err) = backup.restore(&written) {
                    error!(
                        "Restore failed, backup left at {:?}: {}",
                        backup.dir, restore_err
                    );
                }
                Err(err)
            }
        }
    }
}

fn find_sequence(sequences: &[Sequence], number: u32) -> Result<&Sequence, StoreError> {
    sequences
        .iter()
        .find(|sequence| sequence.number == number)
        .ok_or(StoreError::MissingSequence(number))
}

fn random_dir_name() -> String {
    let name: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(20)
        .map(char::from)
        .collect();

    format!("seqsort-{}", name)
}

/// Copy of a project's document and sequence files taken before a save
struct Backup {
    dir: PathBuf,
    document_path: PathBuf,
    data_dir: PathBuf,
    sequence_numbers: Vec<u32>,
    /// Files outside the document that the save will overwrite
    stray_numbers: Vec<u32>,
}

impl Backup {
    fn create(
        root: &Path,
        document_path: &Path,
        project: &Project,
        update: &ProjectUpdate,
    ) -> Result<Self, StoreError> {
        let dir = root.join(random_dir_name());
        fs::create_dir_all(&dir).map_err(StoreError::io(&dir))?;

        let mut backup = Self {
            dir,
            document_path: document_path.to_path_buf(),
            data_dir: project.paths.data_dir.clone(),
            sequence_numbers: Vec::new(),
            stray_numbers: Vec::new(),
        };

        if let Err(err) = backup.copy_in(project, update) {
            let _ = fs::remove_dir_all(&backup.dir);
            return Err(err);
        }
        Ok(backup)
    }

    fn copy_in(&mut self, project: &Project, update: &ProjectUpdate) -> Result<(), StoreError> {
        let document_copy = self.document_copy();
        fs::copy(&self.document_path, &document_copy).map_err(StoreError::io(&self.document_path))?;

        for sequence in project.sequences() {
            let source = project.paths.sequence_file(sequence.number);
            if !source.is_file() {
                continue;
            }
            let target = self.sequence_file(sequence.number);
            fs::copy(&source, &target).map_err(StoreError::io(&source))?;
            self.sequence_numbers.push(sequence.number);
        }

        for (_, new) in update.mapping.iter() {
            let source = project.paths.sequence_file(new);
            if self.has_sequence(new) || self.stray_numbers.contains(&new) || !source.is_file() {
                continue;
            }
            warn!(
                "{:?} is not part of the project and will be overwritten",
                source
            );
            fs::copy(&source, self.sequence_file(new)).map_err(StoreError::io(&source))?;
            self.stray_numbers.push(new);
        }
        Ok(())
    }

    fn document_copy(&self) -> PathBuf {
        let name = self
            .document_path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| DEFAULT_DOCUMENT_NAME.into());
        self.dir.join(name)
    }

    fn sequence_file(&self, number: u32) -> PathBuf {
        self.dir.join(sxq::file_name(number))
    }

    fn has_sequence(&self, number: u32) -> bool {
        self.sequence_numbers.contains(&number)
    }

    /// Put the project back the way it was before the save started
    fn restore(&self, written: &[PathBuf]) -> Result<(), StoreError> {
        for path in written {
            if path.exists() {
                fs::remove_file(path).map_err(StoreError::io(path))?;
            }
        }

        let document_copy = self.document_copy();
        fs::copy(&document_copy, &self.document_path).map_err(StoreError::io(&document_copy))?;

        for &number in self.sequence_numbers.iter().chain(&self.stray_numbers) {
            let source = self.sequence_file(number);
            let target = self.data_dir.join(sxq::file_name(number));
            fs::copy(&source, &target).map_err(StoreError::io(&source))?;
        }

        info!("Restored project from {:?}", self.dir);
        Ok(())
    }

    /// Drop the backup after a successful save
    ///
    /// Returns false if the backup is still on disk.
    fn finish(self, keep: bool) -> bool {
        if keep {
            info!("Backup kept at {:?}", self.dir);
            return false;
        }
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => true,
            Err(err) => {
                warn!("Could not remove backup {:?}: {}", self.dir, err);
                false
            }
        }
    }
}
