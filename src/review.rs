//! Review engine: deterministic ordering, a navigation cursor, and status
//! transitions over a [`Ledger`].
//!
//! Single-writer by design: the host serializes calls (one GUI event or one
//! request at a time), so there is no internal locking. Accepting or
//! rejecting is terminal per change; re-review requires regenerating the
//! ledger.

use crate::ledger::{Change, ChangeStatus, Ledger};

/// An interactive review session over a ledger.
pub struct Review {
    ledger: Ledger,
    /// Index into the current pending-changes view.
    cursor: usize,
}

impl Review {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger, cursor: 0 }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Consume the session, returning the reviewed ledger for persistence.
    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    /// All pending changes across all chapters, sorted ascending by
    /// `(chapterIndex, changeIndex)` parsed from the id. The sort is stable,
    /// so ids with colliding keys keep encounter order.
    pub fn pending_changes(&self) -> Vec<&Change> {
        self.pending_locs()
            .into_iter()
            .map(|(ci, xi)| &self.ledger.chapters[ci].changes[xi])
            .collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The change the cursor points at, if any are pending.
    pub fn current(&self) -> Option<&Change> {
        let (ci, xi) = *self.pending_locs().get(self.cursor)?;
        Some(&self.ledger.chapters[ci].changes[xi])
    }

    /// Accept the current change and advance to the next pending one.
    pub fn accept_current(&mut self) -> bool {
        self.resolve_current(ChangeStatus::Accepted)
    }

    /// Reject the current change and advance to the next pending one.
    pub fn reject_current(&mut self) -> bool {
        self.resolve_current(ChangeStatus::Rejected)
    }

    /// Move the cursor forward without mutating status. No wraparound.
    pub fn go_to_next(&mut self) {
        if self.cursor + 1 < self.pending_locs().len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor backward without mutating status. No wraparound.
    pub fn go_to_previous(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Accept every currently-pending change, independent of the cursor.
    pub fn accept_all(&mut self) {
        for chapter in &mut self.ledger.chapters {
            for change in &mut chapter.changes {
                if change.status == ChangeStatus::Pending {
                    change.status = ChangeStatus::Accepted;
                }
            }
        }
        self.cursor = 0;
    }

    /// Accept every pending change classified as a language-softening edit.
    pub fn accept_all_language_changes(&mut self) {
        for chapter in &mut self.ledger.chapters {
            for change in &mut chapter.changes {
                if change.status == ChangeStatus::Pending && change.is_language_softening() {
                    change.status = ChangeStatus::Accepted;
                }
            }
        }
        self.clamp_cursor();
    }

    fn resolve_current(&mut self, status: ChangeStatus) -> bool {
        let locs = self.pending_locs();
        let Some(&(ci, xi)) = locs.get(self.cursor) else {
            return false;
        };
        self.ledger.chapters[ci].changes[xi].status = status;

        // The removed entry's successor now occupies the same index; only
        // the last entry wraps to the first remaining one.
        let remaining = locs.len() - 1;
        if self.cursor >= remaining {
            self.cursor = 0;
        }
        true
    }

    fn clamp_cursor(&mut self) {
        if self.cursor >= self.pending_locs().len() {
            self.cursor = 0;
        }
    }

    /// Locations of pending changes as (chapter, change) indexes into the
    /// ledger vectors, in review order.
    fn pending_locs(&self) -> Vec<(usize, usize)> {
        let mut locs: Vec<(usize, usize)> = Vec::new();
        for (ci, chapter) in self.ledger.chapters.iter().enumerate() {
            for (xi, change) in chapter.changes.iter().enumerate() {
                if change.status == ChangeStatus::Pending {
                    locs.push((ci, xi));
                }
            }
        }
        // Stable: encounter order breaks ties.
        locs.sort_by_key(|&(ci, xi)| sort_key(&self.ledger.chapters[ci].changes[xi].id));
        locs
    }
}

/// Parse a change id into its numeric sort key.
///
/// Canonical ids are `"<chapter>.<change>"` with digits on both sides.
/// Anything else is a legacy/malformed id and falls back to the first run
/// of digits found anywhere in it, used as the change index with chapter
/// index 0; ids with no digits sort as (0, 0).
fn sort_key(id: &str) -> (u64, u64) {
    if let Some((chapter, change)) = id.split_once('.')
        && !chapter.is_empty()
        && !change.is_empty()
        && chapter.bytes().all(|b| b.is_ascii_digit())
        && change.bytes().all(|b| b.is_ascii_digit())
        && let (Ok(chapter), Ok(change)) = (chapter.parse(), change.parse())
    {
        return (chapter, change);
    }

    let digits: String = id
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    (0, digits.parse().unwrap_or(0))
}
