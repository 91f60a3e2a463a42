// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for seqsort
//!
//! These tests drive the editor through its public API, against an
//! in-memory store and against real project files on disk.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use midly::num::{u15, u28};
use midly::{Format, Header, MetaMessage, Smf, Timing, TrackEvent, TrackEventKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use seqsort::editor::{DisplayId, DragItem};
use seqsort::project::store::DEFAULT_DOCUMENT_NAME;
use seqsort::project::{
    sxq, MpcDocument, ProjectPaths, ProjectUpdate, SeqIndex, Sequence,
};
use seqsort::{Editor, EditorConfig, EditorError, FsProjectStore, Project, ProjectStore, StoreError};

/// Store that keeps the project in memory
#[derive(Default)]
struct MemoryStore {
    project: Option<Project>,
    fail_save: bool,
    saves: Vec<ProjectUpdate>,
}

impl MemoryStore {
    fn with(project: Project) -> Self {
        Self {
            project: Some(project),
            ..Default::default()
        }
    }
}

impl ProjectStore for MemoryStore {
    fn load(&mut self, path: &Path) -> Result<Project, StoreError> {
        self.project
            .clone()
            .ok_or_else(|| StoreError::MissingDocument(path.to_path_buf()))
    }

    fn save(&mut self, project: &Project, update: &ProjectUpdate) -> Result<(), StoreError> {
        if self.fail_save {
            return Err(StoreError::EmptySequenceFile);
        }
        self.saves.push(update.clone());
        self.project = Some(Project::new(
            project.paths.clone(),
            project.document.with_update(update),
        ));
        Ok(())
    }
}

fn project(sequences: Vec<Sequence>, song: Vec<SeqIndex>) -> Project {
    Project::new(
        ProjectPaths::from_project_file("/projects/Demo.xpj").unwrap(),
        MpcDocument::new(sequences, song),
    )
}

fn open(store: &mut MemoryStore) -> Editor {
    let mut editor = Editor::new();
    editor.open(store, Path::new("/projects/Demo.xpj")).unwrap();
    editor
}

fn names(editor: &Editor) -> Vec<String> {
    editor
        .sequences()
        .items()
        .iter()
        .map(|item| item.name().to_string())
        .collect()
}

fn sequence_file(name: &str) -> Vec<u8> {
    let title = format!("{}\0", name);
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(96)),
    ));
    smf.tracks.push(vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(title.as_bytes())),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        },
    ]);
    let mut bytes = Vec::new();
    smf.write_std(&mut bytes).unwrap();
    bytes
}

/// Lay out a project on disk with one `.sxq` per sequence
fn write_project(dir: &Path, sequences: &[Sequence], song: Vec<SeqIndex>) -> PathBuf {
    let file_path = dir.join("Live Set.xpj");
    fs::write(&file_path, "").unwrap();

    let paths = ProjectPaths::from_project_file(&file_path).unwrap();
    fs::create_dir_all(&paths.data_dir).unwrap();

    let document = MpcDocument::new(sequences.to_vec(), song);
    fs::write(
        paths.data_dir.join(DEFAULT_DOCUMENT_NAME),
        document.to_xml().unwrap(),
    )
    .unwrap();

    for sequence in sequences {
        fs::write(
            paths.sequence_file(sequence.number),
            sequence_file(&sequence.name),
        )
        .unwrap();
    }
    file_path
}

fn track_name(paths: &ProjectPaths, number: u32) -> Option<String> {
    let bytes = fs::read(paths.sequence_file(number)).unwrap();
    sxq::track_name(&bytes).unwrap()
}

#[test]
fn test_reorder_scenario() {
    let mut store = MemoryStore::with(project(
        vec![
            Sequence::new(1, "Intro"),
            Sequence::new(2, "Verse"),
            Sequence::new(3, "Chorus"),
        ],
        vec![SeqIndex::new(2, 1)],
    ));
    let mut editor = open(&mut store);

    editor
        .reorder_sequences(&[
            DisplayId::for_number(2),
            DisplayId::for_number(1),
            DisplayId::for_number(3),
        ])
        .unwrap();
    editor.save(&mut store).unwrap();

    let update = &store.saves[0];
    let mapping: Vec<(u32, u32)> = update.mapping.iter().collect();
    assert_eq!(mapping, vec![(1, 2), (2, 1), (3, 3)]);
    assert_eq!(
        update.sequences,
        vec![
            Sequence::new(1, "Verse"),
            Sequence::new(2, "Intro"),
            Sequence::new(3, "Chorus"),
        ]
    );
    assert_eq!(update.song, vec![SeqIndex::new(2, 0)]);

    // Reloaded lists reflect the saved state
    assert_eq!(names(&editor), vec!["Verse", "Intro", "Chorus"]);
    assert_eq!(editor.song().get_at(0).unwrap().name(), "Verse");
    assert!(!editor.is_dirty());
}

#[test]
fn test_random_edits_keep_references() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let count = rng.gen_range(1..12u32);
        let sequences: Vec<Sequence> = (1..=count)
            .map(|n| Sequence::new(n, format!("Seq {}", n)))
            .collect();
        let song: Vec<SeqIndex> = (0..rng.gen_range(0..20))
            .map(|_| SeqIndex::new(rng.gen_range(1..5), rng.gen_range(0..count as usize)))
            .collect();
        let mut store = MemoryStore::with(project(sequences, song));
        let mut editor = open(&mut store);

        // Shuffle sequences, then the song, then clone a few more in
        let mut order = editor.sequences().ids();
        order.shuffle(&mut rng);
        editor.reorder_sequences(&order).unwrap();

        let mut slots = editor.song().ids();
        slots.shuffle(&mut rng);
        editor.reorder_song(&slots).unwrap();

        for _ in 0..rng.gen_range(0..4) {
            let source = order.choose(&mut rng).unwrap().clone();
            let at = rng.gen_range(0..=editor.song().len());
            editor.insert_from_clone(&source, at).unwrap();
        }

        let played: Vec<String> = editor
            .song()
            .entries()
            .iter()
            .map(|entry| entry.name().to_string())
            .collect();
        let update = editor.compute_save().unwrap();

        // Dense numbering in display order
        let numbers: Vec<u32> = update.sequences.iter().map(|s| s.number).collect();
        assert_eq!(numbers, (1..=count).collect::<Vec<_>>());

        // Mapping is a bijection over the loaded numbers
        let targets: HashSet<u32> = update.mapping.iter().map(|(_, new)| new).collect();
        assert_eq!(update.mapping.len(), count as usize);
        assert_eq!(targets.len(), count as usize);

        // Every slot still plays the sequence it played before
        assert_eq!(update.song.len(), played.len());
        for (record, name) in update.song.iter().zip(&played) {
            assert_eq!(&update.sequences[record.value].name, name);
        }

        editor.save(&mut store).unwrap();
        assert!(!editor.is_dirty());
    }
}

#[test]
fn test_rename_reaches_song_and_survives_save() {
    let mut store = MemoryStore::with(project(
        vec![Sequence::new(1, "Intro"), Sequence::new(2, "Verse")],
        vec![SeqIndex::new(1, 1), SeqIndex::new(1, 0), SeqIndex::new(3, 1)],
    ));
    let mut editor = open(&mut store);

    let updated = editor
        .rename_sequence(&DisplayId::for_number(2), "Hook")
        .unwrap();
    assert_eq!(updated, 2);

    editor.save(&mut store).unwrap();
    let saved = store.project.as_ref().unwrap();
    assert_eq!(saved.sequences()[1].name, "Hook");

    let song: Vec<&str> = editor.song().entries().iter().map(|e| e.name()).collect();
    assert_eq!(song, vec!["Hook", "Intro", "Hook"]);
}

#[test]
fn test_drop_clones_without_touching_sequences() {
    let mut store = MemoryStore::with(project(
        vec![Sequence::new(1, "Intro"), Sequence::new(2, "Verse")],
        vec![SeqIndex::new(1, 0)],
    ));
    let mut editor = open(&mut store);
    let before = editor.sequences().clone();
    let existing = editor.song().ids()[0];

    let created = editor.drop_into_song(vec![
        DragItem::SongSlot(existing),
        DragItem::SequenceRef(DisplayId::for_number(2)),
        DragItem::SequenceRef(DisplayId::for_number(2)),
    ]);

    assert_eq!(created.len(), 2);
    assert_ne!(created[0], created[1]);
    assert_eq!(editor.sequences(), &before);
    assert_eq!(editor.song().len(), 3);

    editor.save(&mut store).unwrap();
    assert_eq!(
        store.saves[0].song,
        vec![SeqIndex::new(1, 0), SeqIndex::new(1, 1), SeqIndex::new(1, 1)]
    );
}

#[test]
fn test_failed_save_leaves_editor_unchanged() {
    let mut store = MemoryStore::with(project(
        vec![Sequence::new(1, "Intro"), Sequence::new(2, "Verse")],
        vec![SeqIndex::new(1, 0)],
    ));
    let mut editor = open(&mut store);
    editor.move_sequence(1, 0);
    editor.rename_sequence(&DisplayId::for_number(1), "Opening").unwrap();

    let sequences = editor.sequences().clone();
    let song = editor.song().clone();
    let generation = editor.generation();

    store.fail_save = true;
    let err = editor.save(&mut store).unwrap_err();
    assert!(matches!(err, EditorError::Persistence(_)));

    assert_eq!(editor.sequences(), &sequences);
    assert_eq!(editor.song(), &song);
    assert_eq!(editor.generation(), generation);
    assert!(editor.is_dirty());

    // The same edit goes through once the store recovers
    store.fail_save = false;
    editor.save(&mut store).unwrap();
    assert_eq!(names(&editor), vec!["Verse", "Opening"]);
}

#[test]
fn test_slot_identities_survive_reload() {
    let mut store = MemoryStore::with(project(
        vec![Sequence::new(1, "Intro")],
        vec![SeqIndex::new(1, 0), SeqIndex::new(1, 0)],
    ));
    let mut editor = open(&mut store);
    let first: HashSet<_> = editor.song().ids().into_iter().collect();

    editor.move_song_entry(0, 1);
    editor.adjust_repeat(editor.song().ids()[0], 1).unwrap();
    editor.save(&mut store).unwrap();

    // Fresh slots never reuse identities from before the reload
    let second: HashSet<_> = editor.song().ids().into_iter().collect();
    assert!(first.is_disjoint(&second));
}

#[test]
fn test_disk_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let backups = tempfile::tempdir().unwrap();
    let file_path = write_project(
        dir.path(),
        &[
            Sequence::new(1, "Intro"),
            Sequence::new(2, "Verse"),
            Sequence::new(3, "Chorus"),
        ],
        vec![SeqIndex::new(2, 1), SeqIndex::new(1, 2)],
    );

    let mut store = FsProjectStore::new().with_backup_root(Some(backups.path().to_path_buf()));
    let mut editor = Editor::new();
    editor.open(&mut store, &file_path).unwrap();

    // Chorus first, then rename Intro
    editor.move_sequence(2, 0);
    editor
        .rename_sequence(&DisplayId::for_number(1), "Opening")
        .unwrap();
    editor.save(&mut store).unwrap();

    let paths = ProjectPaths::from_project_file(&file_path).unwrap();
    assert_eq!(track_name(&paths, 1), Some("Chorus".to_string()));
    assert_eq!(track_name(&paths, 2), Some("Opening".to_string()));
    assert_eq!(track_name(&paths, 3), Some("Verse".to_string()));

    let xml = fs::read_to_string(paths.data_dir.join(DEFAULT_DOCUMENT_NAME)).unwrap();
    let document = MpcDocument::from_xml(&xml).unwrap();
    assert_eq!(
        document.sequences(),
        &[
            Sequence::new(1, "Chorus"),
            Sequence::new(2, "Opening"),
            Sequence::new(3, "Verse"),
        ]
    );
    assert_eq!(document.song(), &[SeqIndex::new(2, 2), SeqIndex::new(1, 0)]);

    // Backup removed after a successful save
    assert_eq!(fs::read_dir(backups.path()).unwrap().count(), 0);

    // A second editor sees the same thing
    let mut reopened = Editor::new();
    reopened.open(&mut store, &file_path).unwrap();
    assert_eq!(names(&reopened), vec!["Chorus", "Opening", "Verse"]);
    assert_eq!(reopened.song().get_at(0).unwrap().name(), "Verse");
    assert_eq!(reopened.song().get_at(0).unwrap().repeat(), 2);
}

#[test]
fn test_disk_save_failure_restores_project() {
    let dir = tempfile::tempdir().unwrap();
    let backups = tempfile::tempdir().unwrap();
    let file_path = write_project(
        dir.path(),
        &[Sequence::new(1, "Intro"), Sequence::new(2, "Verse")],
        vec![SeqIndex::new(1, 1)],
    );
    let paths = ProjectPaths::from_project_file(&file_path).unwrap();
    let document_path = paths.data_dir.join(DEFAULT_DOCUMENT_NAME);
    let original_xml = fs::read_to_string(&document_path).unwrap();

    // Sequence 2's file is not MIDI, so retitling it fails mid-save
    fs::write(paths.sequence_file(2), b"not a midi file").unwrap();

    let mut store = FsProjectStore::new().with_backup_root(Some(backups.path().to_path_buf()));
    let mut editor = Editor::new();
    editor.open(&mut store, &file_path).unwrap();
    editor.move_sequence(1, 0);
    let sequences = editor.sequences().clone();

    assert!(editor.save(&mut store).is_err());
    assert_eq!(editor.sequences(), &sequences);

    assert_eq!(fs::read_to_string(&document_path).unwrap(), original_xml);
    assert_eq!(track_name(&paths, 1), Some("Intro".to_string()));
    assert_eq!(fs::read(paths.sequence_file(2)).unwrap(), b"not a midi file");
}

#[test]
fn test_config_selects_document() {
    let dir = tempfile::tempdir().unwrap();
    let file_path = write_project(dir.path(), &[Sequence::new(1, "Intro")], Vec::new());
    let paths = ProjectPaths::from_project_file(&file_path).unwrap();
    fs::rename(
        paths.data_dir.join(DEFAULT_DOCUMENT_NAME),
        paths.data_dir.join("Other.xal"),
    )
    .unwrap();

    let mut editor = Editor::new();
    let mut default_store = EditorConfig::default().store();
    assert!(editor.open(&mut default_store, &file_path).is_err());
    assert!(editor.project().is_none());

    let config = EditorConfig::from_yaml("project:\n  document_name: Other.xal\n").unwrap();
    let mut store = config.store();
    editor.open(&mut store, &file_path).unwrap();
    assert_eq!(names(&editor), vec!["Intro"]);
}
