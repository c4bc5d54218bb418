//! Persisted standards — record shapes, snapshot repository, batch passes.
//!
//! A standard is a song entry in the persisted collection, keyed by title.
//! The collection is always handled as a whole snapshot: read fully, mutated
//! in memory, written back atomically.

pub mod defaults;
pub mod reconcile;
pub mod repository;

pub use defaults::{DefaultsNormalizer, DEFAULT_LOOPS};
pub use reconcile::{prefer_richer_structure, StructureReconciler};
pub use repository::{default_standards_path, RepositoryError, StandardsRepository};

use serde::{Deserialize, Serialize};

use crate::song::{Section, Song};

/// One persisted song entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardEntry {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Sections", default)]
    pub sections: Vec<SectionRecord>,
    /// Playback loop default; `None` or `Some(0)` means "unset".
    #[serde(rename = "DefaultLoops", default, skip_serializing_if = "Option::is_none")]
    pub default_loops: Option<u32>,
}

/// Persisted form of one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRecord {
    #[serde(rename = "Label", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "Measures", default)]
    pub measures: Vec<Vec<String>>,
    #[serde(rename = "Repeats", default, skip_serializing_if = "Option::is_none")]
    pub repeats: Option<RepeatSpec>,
    #[serde(rename = "Endings", default, skip_serializing_if = "Option::is_none")]
    pub endings: Option<Vec<EndingRecord>>,
}

/// Persisted form of one alternate ending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndingRecord {
    #[serde(rename = "Number")]
    pub number: u32,
    #[serde(rename = "Measures", default)]
    pub measures: Vec<Vec<String>>,
}

/// A section's repeat marker as it appears on disk: older snapshots store
/// a bare flag, newer ones an explicit count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RepeatSpec {
    Count(u32),
    Flag(bool),
}

impl RepeatSpec {
    /// Whether the marker denotes "this section repeats at all".
    pub fn is_set(&self) -> bool {
        match self {
            RepeatSpec::Count(n) => *n != 0,
            RepeatSpec::Flag(b) => *b,
        }
    }
}

/// Title match key: case-insensitive, whitespace-trimmed.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

impl From<&Section> for SectionRecord {
    fn from(section: &Section) -> Self {
        SectionRecord {
            label: section.label.map(String::from),
            measures: section
                .measures
                .iter()
                .map(|m| m.chords.clone())
                .collect(),
            repeats: (section.repeats > 1).then_some(RepeatSpec::Count(section.repeats)),
            endings: (!section.endings.is_empty()).then(|| {
                section
                    .endings
                    .iter()
                    .map(|e| EndingRecord {
                        number: e.number,
                        measures: e.measures.iter().map(|m| m.chords.clone()).collect(),
                    })
                    .collect()
            }),
        }
    }
}

impl StandardEntry {
    /// Build a fresh entry from a decoded song. Playback default is left
    /// unset; the normalizer pass fills it in.
    pub fn from_song(song: &Song) -> Self {
        StandardEntry {
            title: song.title.clone(),
            sections: song.sections.iter().map(SectionRecord::from).collect(),
            default_loops: None,
        }
    }
}
