//! Pipeline glue between the document model, the classifier boundary, and
//! the ledger.
//!
//! `build_ledger` runs an external [`ParagraphRewriter`] over every
//! paragraph and records a pending change wherever the candidate differs.
//! `apply` produces a new [`Book`] substituting candidate text for accepted
//! changes only; rejected and still-pending changes keep the original text.

use crate::book::Book;
use crate::error::Result;
use crate::filter::{FilterLevels, ParagraphRewriter};
use crate::ledger::{ChangeStatus, Ledger, LedgerChapter};

/// Build a fresh all-pending ledger for `book` by running `rewriter` over
/// every paragraph. Paragraphs the rewriter returns unchanged produce no
/// ledger entry.
pub fn build_ledger<R: ParagraphRewriter>(
    book: &Book,
    rewriter: &R,
    levels: &FilterLevels,
) -> Ledger {
    let mut ledger = Ledger::new();

    for (index, chapter) in book.chapters.iter().enumerate() {
        let mut entry = LedgerChapter::new(index, chapter.title.clone());
        for paragraph in &chapter.paragraphs {
            let (cleaned, _removed) = rewriter.rewrite(paragraph, levels);
            if cleaned != *paragraph {
                entry.add_change(paragraph.clone(), cleaned);
            }
        }
        ledger.chapters.push(entry);
    }

    ledger
}

/// Produce a new book reflecting the reviewed ledger.
///
/// Each chapter's paragraphs substitute the candidate text of *accepted*
/// changes, matched by original text within the chapter (first unconsumed
/// occurrence, so duplicated paragraphs pair 1:1 with duplicated changes).
/// The chapter source is re-serialized through the chapter writer; the
/// input book is left untouched.
pub fn apply(book: &Book, ledger: &Ledger) -> Result<Book> {
    let mut washed = Book::new();
    washed.metadata = book.metadata.clone();
    washed.resources = book.resources.clone();

    for (index, chapter) in book.chapters.iter().enumerate() {
        let entry = ledger.chapters.iter().find(|c| c.chapter_index == index);
        let paragraphs = match entry {
            Some(entry) => substituted_paragraphs(&chapter.paragraphs, entry),
            None => chapter.paragraphs.clone(),
        };
        washed.chapters.push(chapter.with_paragraphs(paragraphs)?);
    }

    Ok(washed)
}

fn substituted_paragraphs(paragraphs: &[String], entry: &LedgerChapter) -> Vec<String> {
    let mut result: Vec<String> = paragraphs.to_vec();
    let mut consumed = vec![false; paragraphs.len()];

    for change in &entry.changes {
        if change.status != ChangeStatus::Accepted {
            continue;
        }
        // Match against the original paragraph text, not already-substituted
        // slots.
        let matched = paragraphs
            .iter()
            .enumerate()
            .find(|(i, p)| !consumed[*i] && p.as_str() == change.original)
            .map(|(i, _)| i);

        if let Some(i) = matched {
            result[i] = change.candidate.clone();
            consumed[i] = true;
        }
    }

    result
}
