//! Filtering configuration and the classifier seam.
//!
//! The word-selection table is an explicit configuration value built from a
//! constant default table, not mutable global state. The actual content
//! classification/rewriting is an external collaborator reached through
//! [`ParagraphRewriter`]; this core only consumes its output.

use std::collections::BTreeMap;

/// Informal severity grouping of profanity terms, used to organize the
/// selection table. Presentation-level only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Mild,
    Moderate,
    Strong,
    Severe,
    /// Religious invocations used as exclamations.
    Invocation,
    Slur,
}

/// One row of the default word-selection table.
#[derive(Debug, Clone, Copy)]
pub struct WordEntry {
    pub term: &'static str,
    pub severity: Severity,
    pub default_selected: bool,
}

const fn entry(term: &'static str, severity: Severity, default_selected: bool) -> WordEntry {
    WordEntry {
        term,
        severity,
        default_selected,
    }
}

/// Default filter vocabulary. Mild terms default to unselected so light
/// profanity survives unless the reader opts in; stronger groups default to
/// selected. Slur filtering is handled by the external classifier's own
/// vocabulary, so that group carries no built-in terms.
pub const DEFAULT_WORD_TABLE: &[WordEntry] = &[
    entry("darn", Severity::Mild, false),
    entry("dang", Severity::Mild, false),
    entry("heck", Severity::Mild, false),
    entry("crap", Severity::Mild, false),
    entry("damn", Severity::Moderate, true),
    entry("hell", Severity::Moderate, true),
    entry("ass", Severity::Moderate, true),
    entry("piss", Severity::Moderate, true),
    entry("bastard", Severity::Moderate, true),
    entry("bloody", Severity::Moderate, true),
    entry("shit", Severity::Strong, true),
    entry("bitch", Severity::Strong, true),
    entry("fuck", Severity::Severe, true),
    entry("god", Severity::Invocation, true),
    entry("jesus", Severity::Invocation, true),
    entry("christ", Severity::Invocation, true),
    entry("lord", Severity::Invocation, false),
];

/// A caller-owned per-term filter selection, seeded from
/// [`DEFAULT_WORD_TABLE`] and toggled per term.
#[derive(Debug, Clone, Default)]
pub struct WordSelection {
    selected: BTreeMap<String, bool>,
}

impl WordSelection {
    /// Build the default selection from the constant table.
    pub fn from_defaults() -> Self {
        let selected = DEFAULT_WORD_TABLE
            .iter()
            .map(|e| (e.term.to_string(), e.default_selected))
            .collect();
        Self { selected }
    }

    pub fn is_selected(&self, term: &str) -> bool {
        self.selected
            .get(&term.to_lowercase())
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, term: &str, selected: bool) {
        self.selected.insert(term.to_lowercase(), selected);
    }

    /// Terms currently selected for filtering, in stable order.
    pub fn selected_terms(&self) -> impl Iterator<Item = &str> {
        self.selected
            .iter()
            .filter(|&(_, &on)| on)
            .map(|(term, _)| term.as_str())
    }
}

/// Per-category intensity levels, each 1 (strictest) to 4 (most permissive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterLevels {
    pub profanity: u8,
    pub sexual_content: u8,
    pub violence: u8,
}

impl FilterLevels {
    /// Build levels, clamping each to the 1..=4 range.
    pub fn new(profanity: u8, sexual_content: u8, violence: u8) -> Self {
        Self {
            profanity: profanity.clamp(1, 4),
            sexual_content: sexual_content.clamp(1, 4),
            violence: violence.clamp(1, 4),
        }
    }
}

impl Default for FilterLevels {
    fn default() -> Self {
        Self::new(2, 2, 2)
    }
}

/// Display label for a 1-4 content level. Presentational only; out-of-range
/// levels clamp to the nearest bound.
pub fn rating_label(level: u8) -> &'static str {
    match level.clamp(1, 4) {
        1 => "G",
        2 => "PG",
        3 => "PG-13",
        _ => "R",
    }
}

/// The upstream classifier boundary.
///
/// Given a paragraph and the configured levels, returns the cleaned
/// replacement text and the words that were removed or softened. This core
/// never implements a real rewriter; it only consumes the resulting
/// `(original, candidate)` pairs to build ledger entries.
pub trait ParagraphRewriter {
    fn rewrite(&self, paragraph: &str, levels: &FilterLevels) -> (String, Vec<String>);
}
