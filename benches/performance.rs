// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for seqsort
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Save-time renumbering over large projects
//! - Rename propagation through long songs
//! - Drag reorders
//! - Document and sequence file encoding

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use midly::num::{u15, u28};
use midly::{Format, Header, MetaMessage, Smf, Timing, TrackEvent, TrackEventKind};

use seqsort::editor::DisplayId;
use seqsort::project::{sxq, MpcDocument, ProjectPaths, SeqIndex, Sequence};
use seqsort::{Editor, Project};

/// Project with `count` sequences and a song four times as long
fn build_editor(count: u32) -> Editor {
    let sequences: Vec<Sequence> = (1..=count)
        .map(|n| Sequence::new(n, format!("Sequence {}", n)))
        .collect();
    let song: Vec<SeqIndex> = (0..count as usize * 4)
        .map(|step| SeqIndex::new(1 + (step % 3) as u32, (step * 7) % count as usize))
        .collect();
    let project = Project::new(
        ProjectPaths::from_project_file("/bench/Bench.xpj").unwrap(),
        MpcDocument::new(sequences, song),
    );
    Editor::from_project(project).unwrap()
}

/// Benchmark renumbering (the core of every save)
fn bench_compute_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_save");

    for size in [16u32, 128, 999].iter() {
        let mut editor = build_editor(*size);
        let mut order = editor.sequences().ids();
        order.reverse();
        editor.reorder_sequences(&order).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &editor, |b, editor| {
            b.iter(|| black_box(editor.compute_save().unwrap()))
        });
    }

    group.finish();
}

/// Benchmark renaming a sequence referenced throughout the song
fn bench_rename_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("rename");

    for size in [16u32, 128, 999].iter() {
        let mut editor = build_editor(*size);
        let id = DisplayId::for_number(1);
        let mut flip = false;

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                flip = !flip;
                let name = if flip { "Hook" } else { "Chorus" };
                black_box(editor.rename_sequence(&id, name).unwrap())
            })
        });
    }

    group.finish();
}

/// Benchmark a full-list drag reorder
fn bench_reorder(c: &mut Criterion) {
    let mut editor = build_editor(999);
    let mut order = editor.sequences().ids();

    c.bench_function("reorder_sequences_999", |b| {
        b.iter(|| {
            order.rotate_left(1);
            editor.reorder_sequences(black_box(&order)).unwrap();
        })
    });
}

/// Benchmark document serialization
fn bench_document_xml(c: &mut Criterion) {
    let editor = build_editor(128);
    let document = editor.project().unwrap().document.clone();
    let xml = document.to_xml().unwrap();

    c.bench_function("document_to_xml", |b| {
        b.iter(|| black_box(document.to_xml().unwrap()))
    });

    c.bench_function("document_from_xml", |b| {
        b.iter(|| black_box(MpcDocument::from_xml(black_box(&xml)).unwrap()))
    });
}

/// Benchmark retitling a sequence file
fn bench_retitle(c: &mut Criterion) {
    let title = "Verse\0";
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(96)),
    ));
    let mut track = vec![TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(title.as_bytes())),
    }];
    for tick in 0..2000u32 {
        track.push(TrackEvent {
            delta: u28::new(tick % 48),
            kind: TrackEventKind::Meta(MetaMessage::Marker(b"beat")),
        });
    }
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);

    let mut bytes = Vec::new();
    smf.write_std(&mut bytes).unwrap();

    c.bench_function("sxq_retitle", |b| {
        b.iter(|| black_box(sxq::retitle(black_box(&bytes), "Chorus").unwrap()))
    });
}

criterion_group!(
    benches,
    bench_compute_save,
    bench_rename_propagation,
    bench_reorder,
    bench_document_xml,
    bench_retitle,
);

criterion_main!(benches);
