use std::collections::BTreeMap;

use crate::epub::{extract_paragraphs, rewrite_chapter};
use crate::error::Result;

/// In-memory representation of a parsed ebook.
///
/// Produced by the reading path and treated as read-only afterwards: review
/// edits flow through the ledger, and applying a reviewed ledger builds a
/// *new* `Book` rather than mutating this one.
#[derive(Debug, Clone, Default)]
pub struct Book {
    pub metadata: Metadata,
    pub chapters: Vec<Chapter>,
    /// Static assets (images, stylesheets, fonts) carried through to the
    /// regenerated container unchanged, keyed by opf-relative href.
    pub resources: BTreeMap<String, Resource>,
}

/// Book metadata (Dublin Core subset)
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub title: String,
    pub authors: Vec<String>,
    pub language: String,
    pub identifier: String,
}

/// One spine chapter: its extracted paragraph texts plus the original XHTML
/// document, retained as the shell for regeneration.
#[derive(Debug, Clone)]
pub struct Chapter {
    /// Manifest id of the chapter item.
    pub id: String,
    /// Href relative to the package document.
    pub href: String,
    pub title: String,
    /// Paragraph texts in document order. Order and count are fixed for a
    /// given source document.
    pub paragraphs: Vec<String>,
    /// The decoded original XHTML document.
    pub source: String,
}

/// A carried-through resource (image, CSS, font, etc.)
#[derive(Debug, Clone)]
pub struct Resource {
    pub data: Vec<u8>,
    pub media_type: String,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total paragraph count across all chapters.
    pub fn total_paragraphs(&self) -> usize {
        self.chapters.iter().map(|c| c.paragraphs.len()).sum()
    }

    pub fn add_resource(
        &mut self,
        href: impl Into<String>,
        data: Vec<u8>,
        media_type: impl Into<String>,
    ) {
        self.resources.insert(
            href.into(),
            Resource {
                data,
                media_type: media_type.into(),
            },
        );
    }
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }
}

impl Chapter {
    /// Build a chapter from an XHTML document, extracting its paragraphs.
    pub fn from_xhtml(
        id: impl Into<String>,
        href: impl Into<String>,
        title: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self> {
        let source = source.into();
        let href = href.into();
        let paragraphs = extract_paragraphs(&source, &href)?;
        Ok(Self {
            id: id.into(),
            href,
            title: title.into(),
            paragraphs,
            source,
        })
    }

    /// Produce a new chapter whose body holds `paragraphs`, re-serialized
    /// into this chapter's original document shell.
    pub fn with_paragraphs(&self, paragraphs: Vec<String>) -> Result<Self> {
        let source = rewrite_chapter(&self.source, &paragraphs, &self.href)?;
        Ok(Self {
            id: self.id.clone(),
            href: self.href.clone(),
            title: self.title.clone(),
            paragraphs,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAPTER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>One</title></head>
<body><p>First.</p><p>Second.</p></body>
</html>"#;

    #[test]
    fn test_total_paragraphs() {
        let mut book = Book::new();
        book.chapters
            .push(Chapter::from_xhtml("c1", "c1.xhtml", "One", CHAPTER).unwrap());
        book.chapters
            .push(Chapter::from_xhtml("c2", "c2.xhtml", "Two", CHAPTER).unwrap());
        assert_eq!(book.total_paragraphs(), 4);
    }

    #[test]
    fn test_with_paragraphs_replaces_body() {
        let chapter = Chapter::from_xhtml("c1", "c1.xhtml", "One", CHAPTER).unwrap();
        let replaced = chapter
            .with_paragraphs(vec!["Only one now.".to_string()])
            .unwrap();

        assert_eq!(replaced.paragraphs, vec!["Only one now."]);
        assert!(replaced.source.contains("<title>One</title>"));
        assert!(replaced.source.contains("Only one now."));
        assert!(!replaced.source.contains("First."));
    }
}
