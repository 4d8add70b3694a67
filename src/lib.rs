//! # bookwash
//!
//! A library for reviewing per-paragraph content edits to EPUB ebooks.
//!
//! bookwash parses an EPUB into ordered chapter paragraphs, tracks proposed
//! edits in a persistent ledger that a reviewer accepts or rejects one by
//! one, and regenerates a structurally valid EPUB that substitutes only the
//! accepted edits while preserving each chapter's original document shell
//! (head, styles, metadata) and the package's static assets.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bookwash::{read_epub, write_epub, Ledger, Review, wash};
//!
//! // Read a book and a previously built ledger of proposed edits.
//! let book = read_epub("input.epub")?;
//! let ledger = Ledger::load("input.bookwash")?;
//!
//! // Review: accept everything that softens mild language.
//! let mut review = Review::new(ledger);
//! review.accept_all_language_changes();
//! let ledger = review.into_ledger();
//! ledger.save("input.bookwash")?;
//!
//! // Regenerate the EPUB with accepted edits only.
//! let washed = wash::apply(&book, &ledger)?;
//! write_epub(&washed, "output.epub")?;
//! # Ok::<(), bookwash::Error>(())
//! ```
//!
//! The content classifier that proposes candidate replacements is an
//! external collaborator behind [`filter::ParagraphRewriter`];
//! [`wash::build_ledger`] turns its output into ledger entries.

pub mod book;
pub mod epub;
pub mod error;
pub mod filter;
pub mod ledger;
pub mod review;
pub(crate) mod util;
pub mod wash;

pub use book::{Book, Chapter, Metadata, Resource};
pub use epub::{read_epub, write_epub};
pub use error::{Error, Result};
pub use ledger::{Change, ChangeStatus, Ledger, LedgerChapter};
pub use review::Review;
