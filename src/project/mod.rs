// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MPC project data model.
//!
//! This module provides:
//! - The sequences & songs document (`MpcDocument`) and its XML form
//! - The number mapping and update produced when the editor saves
//! - The `ProjectStore` seam the editor loads and persists through

pub mod error;
pub mod store;
pub mod sxq;

pub use error::StoreError;
pub use store::{FsProjectStore, ProjectPaths, ProjectStore};

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Root element name of the sequences & songs document
pub const DOCUMENT_ROOT: &str = "MPCVObject";

const XML_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// A sequence as persisted in the project document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Sequence {
    /// 1-based sequence number, also the `.sxq` file name
    #[serde(rename = "@number")]
    pub number: u32,
    /// Whether the sequence is active
    #[serde(with = "mpc_bool")]
    pub active: bool,
    /// Display name
    pub name: String,
}

impl Sequence {
    /// Create an active sequence
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            active: true,
            name: name.into(),
        }
    }
}

/// A song step: zero-based index into the sequence array plus repeat count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqIndex {
    /// How many times the sequence plays
    #[serde(rename = "@repeat")]
    pub repeat: u32,
    /// Zero-based index into the sequence array
    #[serde(rename = "$text")]
    pub value: usize,
}

impl SeqIndex {
    /// Create a song step
    pub fn new(repeat: u32, value: usize) -> Self {
        Self { repeat, value }
    }
}

/// Sequence collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Sequences {
    #[serde(default)]
    pub count: usize,
    #[serde(rename = "Sequence", default)]
    pub items: Vec<Sequence>,
}

/// A song arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Song {
    #[serde(rename = "@number")]
    pub number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "mpc_bool")]
    pub tempo_ignore: bool,
    #[serde(default)]
    pub seq_index: Vec<SeqIndex>,
}

impl Song {
    /// Create an empty song
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
            tempo_ignore: false,
            seq_index: Vec::new(),
        }
    }
}

/// Song collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Songs {
    #[serde(default)]
    pub count: usize,
    #[serde(rename = "Song", default)]
    pub items: Vec<Song>,
}

/// Timeline locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    #[serde(rename = "LocatorBar")]
    pub bar: u32,
    #[serde(rename = "LocatorBeat")]
    pub beat: u32,
    #[serde(rename = "LocatorPulse")]
    pub pulse: u32,
}

/// Locator collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Locators {
    #[serde(rename = "Locator", default)]
    pub items: Vec<Locator>,
}

/// Sequences, songs and locators of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AllSeqSamps {
    #[serde(default)]
    pub sequences: Sequences,
    #[serde(default)]
    pub songs: Songs,
    #[serde(default)]
    pub locators: Locators,
}

/// Application version block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Version {
    #[serde(rename = "File_Version", default)]
    pub file_version: String,
    #[serde(default)]
    pub application: String,
    #[serde(rename = "Application_Version", default)]
    pub application_version: String,
    #[serde(default)]
    pub platform: String,
}

impl Default for Version {
    fn default() -> Self {
        Self {
            file_version: "2.1".to_string(),
            application: "MPC-V".to_string(),
            application_version: "2.10.1".to_string(),
            platform: "Linux".to_string(),
        }
    }
}

/// The sequences & songs document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MpcDocument {
    #[serde(default)]
    pub version: Version,
    pub all_seq_samps: AllSeqSamps,
}

impl MpcDocument {
    /// Create a document with the given sequences and a single song
    pub fn new(sequences: Vec<Sequence>, song: Vec<SeqIndex>) -> Self {
        let mut first = Song::new(1, "Song 1");
        first.seq_index = song;
        Self {
            version: Version::default(),
            all_seq_samps: AllSeqSamps {
                sequences: Sequences {
                    count: sequences.len(),
                    items: sequences,
                },
                songs: Songs {
                    count: 1,
                    items: vec![first],
                },
                locators: Locators::default(),
            },
        }
    }

    /// Parse a document from XML
    pub fn from_xml(xml: &str) -> Result<Self, StoreError> {
        Ok(quick_xml::de::from_str(xml)?)
    }

    /// Serialize to indented XML with declaration header
    pub fn to_xml(&self) -> Result<String, StoreError> {
        let mut body = String::new();
        let mut serializer = quick_xml::se::Serializer::with_root(&mut body, Some(DOCUMENT_ROOT))?;
        serializer.indent(' ', 2);
        self.serialize(serializer)?;
        Ok(format!("{}\n\n{}\n", XML_HEADER, body))
    }

    /// Sequences in document order
    pub fn sequences(&self) -> &[Sequence] {
        &self.all_seq_samps.sequences.items
    }

    /// Steps of the editable (first) song
    pub fn song(&self) -> &[SeqIndex] {
        self.all_seq_samps
            .songs
            .items
            .first()
            .map(|song| song.seq_index.as_slice())
            .unwrap_or(&[])
    }

    /// Copy of this document with the update applied
    ///
    /// Replaces the sequence list and the first song's steps and refreshes
    /// both `Count` fields. A song is created if the document had none.
    pub fn with_update(&self, update: &ProjectUpdate) -> Self {
        let mut document = self.clone();
        let all = &mut document.all_seq_samps;

        all.sequences.items = update.sequences.clone();
        all.sequences.count = all.sequences.items.len();

        if all.songs.items.is_empty() {
            all.songs.items.push(Song::new(1, "Song 1"));
        }
        all.songs.items[0].seq_index = update.song.clone();
        all.songs.count = all.songs.items.len();

        document
    }
}

/// A loaded project: where it lives plus its document
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    /// Project locations
    pub paths: ProjectPaths,
    /// Sequences & songs document
    pub document: MpcDocument,
}

impl Project {
    /// Create a project
    pub fn new(paths: ProjectPaths, document: MpcDocument) -> Self {
        Self { paths, document }
    }

    /// Path of the `.xpj` file the project was opened from
    pub fn file_path(&self) -> &Path {
        &self.paths.file_path
    }

    /// Sequences in persisted order
    pub fn sequences(&self) -> &[Sequence] {
        self.document.sequences()
    }

    /// Steps of the editable song
    pub fn song(&self) -> &[SeqIndex] {
        self.document.song()
    }
}

/// Old sequence number to new sequence number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberMapping(BTreeMap<u32, u32>);

impl NumberMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mapping, returning the previous target for `old` if any
    pub fn insert(&mut self, old: u32, new: u32) -> Option<u32> {
        self.0.insert(old, new)
    }

    /// New number for an old number
    pub fn get(&self, old: u32) -> Option<u32> {
        self.0.get(&old).copied()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries ordered by old number
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().map(|(&old, &new)| (old, new))
    }

    /// Check if every sequence keeps its number
    pub fn is_identity(&self) -> bool {
        self.0.iter().all(|(old, new)| old == new)
    }
}

impl FromIterator<(u32, u32)> for NumberMapping {
    fn from_iter<I: IntoIterator<Item = (u32, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Everything a save hands to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectUpdate {
    /// Renumbered sequences in final order
    pub sequences: Vec<Sequence>,
    /// Song steps pointing into `sequences`
    pub song: Vec<SeqIndex>,
    /// Old to new sequence numbers
    pub mapping: NumberMapping,
}

/// MPC documents spell booleans `True` / `False`
mod mpc_bool {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "True" } else { "False" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.trim() {
            s if s.eq_ignore_ascii_case("true") || s == "1" => Ok(true),
            s if s.eq_ignore_ascii_case("false") || s == "0" => Ok(false),
            other => Err(de::Error::invalid_value(
                de::Unexpected::Str(other),
                &"True or False",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>

<MPCVObject>
  <Version>
    <File_Version>2.1</File_Version>
    <Application>MPC-V</Application>
    <Application_Version>2.10.1</Application_Version>
    <Platform>OSX</Platform>
  </Version>
  <AllSeqSamps>
    <Sequences>
      <Count>3</Count>
      <Sequence number="1">
        <Active>True</Active>
        <Name>Intro</Name>
      </Sequence>
      <Sequence number="2">
        <Active>False</Active>
        <Name>Verse</Name>
      </Sequence>
      <Sequence number="3">
        <Active>True</Active>
        <Name>Chorus</Name>
      </Sequence>
    </Sequences>
    <Songs>
      <Count>1</Count>
      <Song number="1">
        <Name>Song 1</Name>
        <TempoIgnore>False</TempoIgnore>
        <SeqIndex repeat="2">1</SeqIndex>
        <SeqIndex repeat="1">2</SeqIndex>
      </Song>
    </Songs>
    <Locators>
      <Locator>
        <LocatorBar>1</LocatorBar>
        <LocatorBeat>1</LocatorBeat>
        <LocatorPulse>0</LocatorPulse>
      </Locator>
    </Locators>
  </AllSeqSamps>
</MPCVObject>
"#;

    #[test]
    fn test_parse_document() {
        let document = MpcDocument::from_xml(DOCUMENT).unwrap();
        assert_eq!(document.version.platform, "OSX");
        assert_eq!(document.all_seq_samps.sequences.count, 3);

        let sequences = document.sequences();
        assert_eq!(sequences.len(), 3);
        assert_eq!(sequences[0].name, "Intro");
        assert!(sequences[0].active);
        assert!(!sequences[1].active);
        assert_eq!(sequences[2].number, 3);

        assert_eq!(document.song(), &[SeqIndex::new(2, 1), SeqIndex::new(1, 2)]);
        assert_eq!(document.all_seq_samps.locators.items.len(), 1);
    }

    #[test]
    fn test_written_document_reads_back() {
        let document = MpcDocument::from_xml(DOCUMENT).unwrap();
        let xml = document.to_xml().unwrap();

        assert!(xml.starts_with(XML_HEADER));
        assert!(xml.contains("<Active>True</Active>"));
        assert!(xml.contains("<Active>False</Active>"));
        assert!(xml.contains("<Sequence number=\"2\">"));

        let parsed = MpcDocument::from_xml(&xml).unwrap();
        assert_eq!(parsed, document);
    }

    #[test]
    fn test_song_without_steps() {
        let xml = r#"<MPCVObject>
  <AllSeqSamps>
    <Sequences>
      <Count>1</Count>
      <Sequence number="1"><Active>True</Active><Name>Only</Name></Sequence>
    </Sequences>
    <Songs>
      <Count>1</Count>
      <Song number="1"><Name>Empty</Name><TempoIgnore>True</TempoIgnore></Song>
    </Songs>
  </AllSeqSamps>
</MPCVObject>"#;

        let document = MpcDocument::from_xml(xml).unwrap();
        assert!(document.song().is_empty());
        assert!(document.all_seq_samps.songs.items[0].tempo_ignore);
        assert!(document.all_seq_samps.locators.items.is_empty());
    }

    #[test]
    fn test_with_update_refreshes_counts() {
        let document = MpcDocument::from_xml(DOCUMENT).unwrap();
        let update = ProjectUpdate {
            sequences: vec![Sequence::new(1, "Verse"), Sequence::new(2, "Intro")],
            song: vec![SeqIndex::new(4, 0)],
            mapping: [(2, 1), (1, 2)].into_iter().collect(),
        };

        let updated = document.with_update(&update);
        assert_eq!(updated.all_seq_samps.sequences.count, 2);
        assert_eq!(updated.sequences()[0].name, "Verse");
        assert_eq!(updated.song(), &[SeqIndex::new(4, 0)]);
        assert_eq!(updated.all_seq_samps.songs.items[0].name, "Song 1");
        assert_eq!(updated.version, document.version);
    }

    #[test]
    fn test_with_update_creates_missing_song() {
        let mut document = MpcDocument::new(vec![Sequence::new(1, "A")], Vec::new());
        document.all_seq_samps.songs = Songs::default();

        let update = ProjectUpdate {
            sequences: vec![Sequence::new(1, "A")],
            song: vec![SeqIndex::new(1, 0)],
            mapping: [(1, 1)].into_iter().collect(),
        };

        let updated = document.with_update(&update);
        assert_eq!(updated.all_seq_samps.songs.count, 1);
        assert_eq!(updated.song(), &[SeqIndex::new(1, 0)]);
    }

    #[test]
    fn test_number_mapping() {
        let mut mapping = NumberMapping::new();
        assert!(mapping.is_empty());
        assert!(mapping.insert(2, 1).is_none());
        mapping.insert(1, 2);
        mapping.insert(3, 3);

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.get(2), Some(1));
        assert_eq!(mapping.get(4), None);
        assert!(!mapping.is_identity());
        assert_eq!(mapping.iter().collect::<Vec<_>>(), vec![(1, 2), (2, 1), (3, 3)]);

        let identity: NumberMapping = [(1, 1), (2, 2)].into_iter().collect();
        assert!(identity.is_identity());
    }
}
