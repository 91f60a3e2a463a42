// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sequence (`.sxq`) files.
//!
//! Each sequence is stored as a Standard MIDI File named after its number.
//! The first track carries the sequence name as a NUL-terminated
//! TrackName meta event, which has to follow the sequence when it is
//! renamed or renumbered.

use midly::num::u28;
use midly::{MetaMessage, Smf, TrackEvent, TrackEventKind};

use super::StoreError;

/// File name for a sequence number
pub fn file_name(number: u32) -> String {
    format!("{}.sxq", number)
}

/// Rewrite the name stored in a sequence file
///
/// Replaces the first TrackName event of the first track, or inserts one
/// at the start of the track if there is none.
pub fn retitle(bytes: &[u8], name: &str) -> Result<Vec<u8>, StoreError> {
    let title = format!("{}\0", name);
    let mut smf = Smf::parse(bytes)?;

    let track = smf.tracks.first_mut().ok_or(StoreError::EmptySequenceFile)?;
    let kind = TrackEventKind::Meta(MetaMessage::TrackName(title.as_bytes()));

    match track
        .iter_mut()
        .find(|event| matches!(event.kind, TrackEventKind::Meta(MetaMessage::TrackName(_))))
    {
        Some(event) => event.kind = kind,
        None => track.insert(
            0,
            TrackEvent {
                delta: u28::new(0),
                kind,
            },
        ),
    }

    let mut out = Vec::with_capacity(bytes.len() + title.len());
    smf.write_std(&mut out).map_err(StoreError::Encode)?;
    Ok(out)
}

/// Read the name stored in a sequence file
pub fn track_name(bytes: &[u8]) -> Result<Option<String>, StoreError> {
    let smf = Smf::parse(bytes)?;
    let name = smf.tracks.first().and_then(|track| {
        track.iter().find_map(|event| match event.kind {
            TrackEventKind::Meta(MetaMessage::TrackName(raw)) => Some(
                String::from_utf8_lossy(raw)
                    .trim_end_matches('\0')
                    .to_string(),
            ),
            _ => None,
        })
    });
    Ok(name)
}
