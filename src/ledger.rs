//! The BookWash change ledger.
//!
//! A ledger is the persisted record of proposed per-paragraph edits: one
//! entry per chapter, each holding an ordered list of changes with a review
//! status. It is the single source of truth for review state; the parsed
//! [`crate::Book`] is never mutated. Serialized as a single JSON document
//! with camelCase keys; unknown fields are ignored on load for forward
//! compatibility.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Euphemism vocabulary for the language-softening heuristic. A candidate
/// that introduces one of these words (absent from the original) is treated
/// as a mild-profanity softening edit for bulk-accept purposes.
const SOFTENED_WORDS: &[&str] = &[
    "darn", "dang", "heck", "gosh", "shoot", "shucks", "jerk", "idiot", "rear", "blast", "crud",
];

/// Review status of a single proposed change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ChangeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeStatus::Pending => "pending",
            ChangeStatus::Accepted => "accepted",
            ChangeStatus::Rejected => "rejected",
        }
    }
}

/// One proposed paragraph-level edit.
///
/// `id`, `original`, and `candidate` are immutable after creation; only
/// `status` changes, and only through the review engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Canonical form `"<chapterIndex>.<changeIndex>"`, unique per ledger.
    pub id: String,
    pub original: String,
    pub candidate: String,
    pub status: ChangeStatus,
}

impl Change {
    pub fn new(
        id: impl Into<String>,
        original: impl Into<String>,
        candidate: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            original: original.into(),
            candidate: candidate.into(),
            status: ChangeStatus::Pending,
        }
    }

    /// Best-effort classification as a mild-language softening edit: the
    /// candidate contains a euphemism word, case-insensitively, that the
    /// original does not. A heuristic, not an authoritative label.
    pub fn is_language_softening(&self) -> bool {
        let original = self.original.to_lowercase();
        let candidate = self.candidate.to_lowercase();

        SOFTENED_WORDS
            .iter()
            .any(|word| candidate.contains(word) && !original.contains(word))
    }
}

/// Per-chapter slice of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerChapter {
    pub chapter_index: usize,
    pub chapter_title: String,
    pub changes: Vec<Change>,
}

impl LedgerChapter {
    pub fn new(chapter_index: usize, chapter_title: impl Into<String>) -> Self {
        Self {
            chapter_index,
            chapter_title: chapter_title.into(),
            changes: Vec::new(),
        }
    }

    /// Record a proposed edit with the next canonical id for this chapter.
    pub fn add_change(&mut self, original: impl Into<String>, candidate: impl Into<String>) {
        let id = format!("{}.{}", self.chapter_index, self.changes.len());
        self.changes.push(Change::new(id, original, candidate));
    }
}

/// The persisted review artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub chapters: Vec<LedgerChapter>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialize a ledger from disk.
    ///
    /// Fails with [`Error::LedgerCorrupt`] when the file is not valid JSON
    /// or any change is missing a required field. Unknown fields are
    /// ignored.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::LedgerCorrupt(e.to_string()))
    }

    /// Persist the ledger.
    ///
    /// Writes to a temporary file in the destination directory and renames
    /// it over `path`, so a crash mid-save never leaves a truncated ledger.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let mut staging = NamedTempFile::new_in(dir)?;
        std::io::Write::write_all(&mut staging, json.as_bytes())?;
        staging.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// All changes across all chapters, in encounter order.
    pub fn changes(&self) -> impl Iterator<Item = &Change> {
        self.chapters.iter().flat_map(|c| c.changes.iter())
    }

    /// (pending, accepted, rejected) counts.
    pub fn status_counts(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for change in self.changes() {
            match change.status {
                ChangeStatus::Pending => counts.0 += 1,
                ChangeStatus::Accepted => counts.1 += 1,
                ChangeStatus::Rejected => counts.2 += 1,
            }
        }
        counts
    }
}
